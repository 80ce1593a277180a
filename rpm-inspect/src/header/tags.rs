//! Tag numbers used by this crate
//!
//! Signature header tags live in their own namespace: tag 1002 is the PGP
//! signature in a signature header, but the release in a main header.

pub const RPMTAG_HEADERSIGNATURES: u32 = 62;
pub const RPMTAG_HEADERIMMUTABLE: u32 = 63;

/// DSA signature of the main header
pub const RPMSIGTAG_DSA: u32 = 256 + 11;
/// RSA signature of the main header
pub const RPMSIGTAG_RSA: u32 = 256 + 12;
/// Hex SHA1 hash of the main header
pub const RPMSIGTAG_SHA1: u32 = 256 + 13;
/// Hex SHA256 hash of the main header
pub const RPMSIGTAG_SHA256: u32 = 256 + 17;
/// 32 bit header+payload size
pub const RPMSIGTAG_SIZE: u32 = 1000;
/// Header+payload PGP signature
pub const RPMSIGTAG_PGP: u32 = 1002;
/// Header+payload MD5 digest
pub const RPMSIGTAG_MD5: u32 = 1004;
/// Header+payload GPG signature
pub const RPMSIGTAG_GPG: u32 = 1005;

pub const RPMTAG_NAME: u32 = 1000;
pub const RPMTAG_VERSION: u32 = 1001;
pub const RPMTAG_RELEASE: u32 = 1002;
pub const RPMTAG_EPOCH: u32 = 1003;
pub const RPMTAG_OS: u32 = 1021;
pub const RPMTAG_ARCH: u32 = 1022;
/// Present (and non-zero) only in source packages
pub const RPMTAG_SOURCEPACKAGE: u32 = 1106;
/// OpenPGP hash algorithm used for file digests
pub const RPMTAG_FILEDIGESTALGO: u32 = 5011;
