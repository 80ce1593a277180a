//! A library for inspecting RPM packages without the RPM C library.
//!
//! It finds the byte ranges of the signature and main headers, decodes them,
//! extracts signature key IDs, and orders packages by epoch, version, and
//! release the way RPM does.
//!
//! All interfaces of `rpm_inspect` are safe for use on untrusted packages.
//! Signatures are never verified: a key ID only says which key a signature
//! claims to be from.

macro_rules! bad_data {
    ($($i:expr),*) => {
        return Err($crate::Error::MalformedHeader(format!($($i),*)))
    };
    ($($i:expr),*,) => {
        bad_data!($($i),*)
    };
}

macro_rules! fail_if {
    ($c:expr, $($i:expr),*,) => {
        if $c {
            bad_data!($($i),*)
        }
    };
    ($c:expr, $($i:expr),*) => {
        if $c {
            bad_data!($($i),*)
        }
    };
}

macro_rules! fail_lead_if {
    ($c:expr, $($i:expr),*,) => {
        fail_lead_if!($c, $($i),*)
    };
    ($c:expr, $($i:expr),*) => {
        if $c {
            return Err($crate::Error::InvalidLead(format!($($i),*)))
        }
    };
}

pub mod context;
mod error;
pub mod evr;
pub mod header;
pub mod lead;
pub mod package;
pub mod range;
pub mod signature;
mod tagdata;
pub use crate::context::{InspectContext, InspectOptions};
pub use crate::error::{Error, Result};
pub use crate::evr::{compare_evr, label_compare, rpmvercmp, Evr, NamedEvr};
pub use crate::header::{
    load_immutable, load_signature, parse_header_magic, read_header_magic, DecodedHeader,
    DecodedHeaders, DecodedPackage, TagLookup, TagType, TagValue, DEFAULT_MAX_DATA_LENGTH,
    RPM_HDRMAGIC,
};
pub use crate::lead::{read_lead, RpmLead, RPM_LEADMAGIC};
pub use crate::package::{ChecksumAlgorithm, PackageHeader};
pub use crate::range::{
    header_struct_size, locate, padded_header_size, read_header_region, HeaderByteRanges,
    HeaderStructLocation, INDEX_ENTRY_SIZE, LEAD_SIZE, PREAMBLE_SIZE,
};
pub use crate::signature::{
    key_id_range, RawSignatureTags, SignatureKind, SignatureRecord, MIN_SIGNATURE_LEN,
};
pub use crate::tagdata::TagData;
