//! The queryable model of a package header
//!
//! A [`PackageHeader`] is built from already-decoded headers and never looks
//! at the package bytes again.

use crate::evr::{Evr, NamedEvr};
use crate::header::tags::*;
use crate::header::{DecodedHeader, DecodedHeaders, DecodedPackage, TagLookup, TagValue};
use crate::signature::{RawSignatureTags, SignatureRecord};
use serde::Serialize;
use std::fmt;

/// Hash algorithm used for file digests
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ChecksumAlgorithm {
    Md5,
    Sha1,
    Ripemd160,
    Md2,
    Tiger192,
    Haval5160,
    Sha256,
    Sha384,
    Sha512,
}

impl Default for ChecksumAlgorithm {
    fn default() -> Self {
        ChecksumAlgorithm::Md5
    }
}

impl ChecksumAlgorithm {
    /// Look up an OpenPGP hash algorithm number, as stored in the
    /// file digest algorithm tag
    pub fn from_id(id: u32) -> Option<Self> {
        Some(match id {
            1 => ChecksumAlgorithm::Md5,
            2 => ChecksumAlgorithm::Sha1,
            3 => ChecksumAlgorithm::Ripemd160,
            5 => ChecksumAlgorithm::Md2,
            6 => ChecksumAlgorithm::Tiger192,
            7 => ChecksumAlgorithm::Haval5160,
            8 => ChecksumAlgorithm::Sha256,
            9 => ChecksumAlgorithm::Sha384,
            10 => ChecksumAlgorithm::Sha512,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ChecksumAlgorithm::Md5 => "md5",
            ChecksumAlgorithm::Sha1 => "sha1",
            ChecksumAlgorithm::Ripemd160 => "ripemd160",
            ChecksumAlgorithm::Md2 => "md2",
            ChecksumAlgorithm::Tiger192 => "tiger192",
            ChecksumAlgorithm::Haval5160 => "haval-5-160",
            ChecksumAlgorithm::Sha256 => "sha256",
            ChecksumAlgorithm::Sha384 => "sha384",
            ChecksumAlgorithm::Sha512 => "sha512",
        }
    }
}

impl fmt::Display for ChecksumAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ChecksumAlgorithm {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

fn string_tag(header: &dyn TagLookup, tag: u32) -> Option<String> {
    header.tag_value(tag).and_then(TagValue::as_str).map(str::to_owned)
}

/// A package header, along with the signatures found in its signature header
#[derive(Clone, Debug)]
pub struct PackageHeader<H: DecodedHeaders = DecodedPackage> {
    is_source_package: bool,
    checksum_algorithm: ChecksumAlgorithm,
    signatures: Vec<SignatureRecord>,
    signed: bool,
    name: String,
    version: String,
    release: String,
    epoch: Option<u32>,
    arch: Option<String>,
    raw_header: H,
}

impl<H: DecodedHeaders> PackageHeader<H> {
    /// Build the model from decoded headers
    pub fn new(raw_header: H) -> Self {
        let main = raw_header.main_tags();
        let is_source_package = main
            .tag_value(RPMTAG_SOURCEPACKAGE)
            .and_then(TagValue::as_u32)
            .map_or(false, |v| v != 0);
        let checksum_algorithm = main
            .tag_value(RPMTAG_FILEDIGESTALGO)
            .and_then(TagValue::as_u32)
            .and_then(ChecksumAlgorithm::from_id)
            .unwrap_or_default();
        let raw_signatures = RawSignatureTags::from_header(raw_header.signature_tags());
        let signatures = raw_signatures.extract();
        let signed = raw_signatures.is_signed();
        let name = string_tag(main, RPMTAG_NAME).unwrap_or_default();
        let version = string_tag(main, RPMTAG_VERSION).unwrap_or_default();
        let release = string_tag(main, RPMTAG_RELEASE).unwrap_or_default();
        let epoch = main.tag_value(RPMTAG_EPOCH).and_then(TagValue::as_u32);
        let arch = string_tag(main, RPMTAG_ARCH);
        Self {
            is_source_package,
            checksum_algorithm,
            signatures,
            signed,
            name,
            version,
            release,
            epoch,
            arch,
            raw_header,
        }
    }

    pub fn is_source_package(&self) -> bool {
        self.is_source_package
    }

    /// The file digest algorithm, [`ChecksumAlgorithm::Md5`] if the header
    /// does not say
    pub fn checksum_algorithm(&self) -> ChecksumAlgorithm {
        self.checksum_algorithm
    }

    /// Signatures long enough to carry a key ID, in the order DSA, RSA, GPG,
    /// PGP
    pub fn signatures(&self) -> &[SignatureRecord] {
        &self.signatures
    }

    /// Does the package carry a GPG, PGP, or DSA signature?
    pub fn is_signed(&self) -> bool {
        self.signed
    }

    /// The package name, empty if the header has none
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn release(&self) -> &str {
        &self.release
    }

    pub fn epoch(&self) -> Option<u32> {
        self.epoch
    }

    pub fn arch(&self) -> Option<&str> {
        self.arch.as_deref()
    }

    /// The EVR, for ordering builds of this package
    pub fn evr(&self) -> Evr {
        Evr::new(
            self.epoch.map(|e| e.to_string()),
            &*self.version,
            &*self.release,
        )
    }

    pub fn named_evr(&self) -> NamedEvr {
        NamedEvr::new(&*self.name, self.evr())
    }

    /// The decoded headers this model was built from
    pub fn raw_header(&self) -> &H {
        &self.raw_header
    }

    pub fn into_raw_header(self) -> H {
        self.raw_header
    }
}

impl PackageHeader {
    /// Build the model from a bare main header, with no signature header.
    /// The result has no signatures.
    pub fn from_main_header(main: DecodedHeader) -> Self {
        Self::new(DecodedPackage {
            signature: DecodedHeader::default(),
            main,
        })
    }
}
