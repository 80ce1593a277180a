//! Signature key ID extraction
//!
//! Key IDs are read from fixed offsets chosen by the length of the raw
//! signature.  The OpenPGP packet is never parsed, so a key ID says which key
//! claims to have signed the package, not that the signature is valid.

use crate::header::tags::{RPMSIGTAG_DSA, RPMSIGTAG_GPG, RPMSIGTAG_PGP, RPMSIGTAG_RSA};
use crate::header::{TagLookup, TagValue};
use serde::Serialize;
use std::fmt;
use std::ops::Range;

/// Shortest signature that can hold a key ID
pub const MIN_SIGNATURE_LEN: usize = 17;

/// The signature header tag a signature came from
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SignatureKind {
    /// DSA header-only signature
    Dsa,
    /// RSA header-only signature
    Rsa,
    /// GPG header+payload signature
    Gpg,
    /// PGP header+payload signature
    Pgp,
}

impl SignatureKind {
    /// All kinds, in extraction order
    pub const ALL: [SignatureKind; 4] = [
        SignatureKind::Dsa,
        SignatureKind::Rsa,
        SignatureKind::Gpg,
        SignatureKind::Pgp,
    ];

    /// The signature header tag holding this kind of signature
    pub fn tag(self) -> u32 {
        match self {
            SignatureKind::Dsa => RPMSIGTAG_DSA,
            SignatureKind::Rsa => RPMSIGTAG_RSA,
            SignatureKind::Gpg => RPMSIGTAG_GPG,
            SignatureKind::Pgp => RPMSIGTAG_PGP,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SignatureKind::Dsa => "dsa",
            SignatureKind::Rsa => "rsa",
            SignatureKind::Gpg => "gpg",
            SignatureKind::Pgp => "pgp",
        }
    }
}

impl fmt::Display for SignatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A signature found in a package
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize)]
pub struct SignatureRecord {
    /// Where the signature came from
    pub signature_type: SignatureKind,
    /// Lowercase hex key ID, 16 digits
    pub key_id: String,
    /// The signature itself
    #[serde(skip)]
    pub raw_bytes: Vec<u8>,
}

/// Byte range of the key ID in a signature of `len` bytes.
///
/// - up to 65 bytes: V3 DSA
/// - up to 72 bytes: V4 DSA
/// - up to 536 bytes: V3 RSA
/// - otherwise: V4 RSA
///
/// Returns [`None`] for signatures too short to hold a key ID.
pub fn key_id_range(len: usize) -> Option<Range<usize>> {
    Some(match len {
        _ if len < MIN_SIGNATURE_LEN => return None,
        0..=65 => 9..17,
        66..=72 => 18..26,
        73..=536 => 10..18,
        _ => 19..27,
    })
}

/// The raw signature values of one package, one per kind
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct RawSignatureTags<'a> {
    pub dsa: Option<&'a [u8]>,
    pub rsa: Option<&'a [u8]>,
    pub gpg: Option<&'a [u8]>,
    pub pgp: Option<&'a [u8]>,
}

impl<'a> RawSignatureTags<'a> {
    /// Collect the signature values from a signature header.  Values that are
    /// not binary are ignored.
    pub fn from_header(header: &'a dyn TagLookup) -> Self {
        let get = |kind: SignatureKind| header.tag_value(kind.tag()).and_then(TagValue::as_bytes);
        Self {
            dsa: get(SignatureKind::Dsa),
            rsa: get(SignatureKind::Rsa),
            gpg: get(SignatureKind::Gpg),
            pgp: get(SignatureKind::Pgp),
        }
    }

    /// The value for `kind`
    pub fn get(&self, kind: SignatureKind) -> Option<&'a [u8]> {
        match kind {
            SignatureKind::Dsa => self.dsa,
            SignatureKind::Rsa => self.rsa,
            SignatureKind::Gpg => self.gpg,
            SignatureKind::Pgp => self.pgp,
        }
    }

    /// Extract a record for every signature long enough to hold a key ID, in
    /// the order DSA, RSA, GPG, PGP.
    pub fn extract(&self) -> Vec<SignatureRecord> {
        SignatureKind::ALL
            .iter()
            .filter_map(|&kind| {
                let raw = self.get(kind)?;
                let range = key_id_range(raw.len())?;
                Some(SignatureRecord {
                    signature_type: kind,
                    key_id: hex::encode(&raw[range]),
                    raw_bytes: raw.to_vec(),
                })
            })
            .collect()
    }

    /// Is the package signed?  Only GPG, PGP, and DSA signatures count; an RSA
    /// signature alone does not.
    pub fn is_signed(&self) -> bool {
        [self.gpg, self.pgp, self.dsa]
            .iter()
            .any(|sig| sig.map_or(false, |s| !s.is_empty()))
    }
}
