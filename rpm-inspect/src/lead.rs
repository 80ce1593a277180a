//! Routines for parsing RPM package leads
//!
//! The lead is a 96-byte data structure at the start of every RPM package.
//! Most of its functionality has been replaced by the header, so locating
//! headers never looks at it; [`read_lead`] is only used for strict checks.

use crate::error::{read_exact, Result};
use crate::range::LEAD_SIZE;
use std::convert::TryInto;
use std::io::Read;

/// Magic number at the start of every lead
pub const RPM_LEADMAGIC: [u8; 4] = [0xed, 0xab, 0xee, 0xdb];

/// The only signature type in use: a header-style signature header
const HEADER_SIGNATURE_TYPE: u16 = 5;

/// An RPM lead
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct RpmLead {
    major: u8,
    minor: u8,
    ty: u16,
    archnum: u16,
    name: [u8; 66],
    osnum: u16,
    signature_type: u16,
}

impl RpmLead {
    /// Create a version 3.0 lead.  `name` is truncated to 65 bytes so that
    /// it is always NUL-terminated.
    pub fn new(is_source: bool, archnum: u16, osnum: u16, name: &[u8]) -> Self {
        let mut name_dup = [0u8; 66];
        let bytes_to_copy = name.len().min(65);
        name_dup[..bytes_to_copy].copy_from_slice(&name[..bytes_to_copy]);
        Self {
            major: 3,
            minor: 0,
            ty: is_source as u16,
            archnum,
            name: name_dup,
            osnum,
            signature_type: HEADER_SIGNATURE_TYPE,
        }
    }

    /// Parse and validate a lead
    pub fn from_bytes(bytes: &[u8; LEAD_SIZE as usize]) -> Result<Self> {
        let half = |i: usize| u16::from_be_bytes([bytes[i], bytes[i + 1]]);
        fail_lead_if!(bytes[..4] != RPM_LEADMAGIC, "not an RPM package");
        let lead = Self {
            major: bytes[4],
            minor: bytes[5],
            ty: half(6),
            archnum: half(8),
            name: bytes[10..76].try_into().expect("66 bytes; qed"),
            osnum: half(76),
            signature_type: half(78),
        };
        fail_lead_if!(
            lead.major != 3 && lead.major != 4,
            "unsupported RPM package version {}.{}",
            lead.major,
            lead.minor
        );
        fail_lead_if!(lead.ty > 1, "unknown package type {}", lead.ty);
        fail_lead_if!(
            !lead.name.contains(&0),
            "package name not NUL-terminated"
        );
        fail_lead_if!(
            lead.signature_type != HEADER_SIGNATURE_TYPE,
            "unsupported signature type {}",
            lead.signature_type
        );
        Ok(lead)
    }

    /// The on-disk form of this lead
    pub fn to_bytes(&self) -> [u8; LEAD_SIZE as usize] {
        let mut out = [0u8; LEAD_SIZE as usize];
        out[..4].copy_from_slice(&RPM_LEADMAGIC);
        out[4] = self.major;
        out[5] = self.minor;
        out[6..8].copy_from_slice(&self.ty.to_be_bytes());
        out[8..10].copy_from_slice(&self.archnum.to_be_bytes());
        out[10..76].copy_from_slice(&self.name);
        out[76..78].copy_from_slice(&self.osnum.to_be_bytes());
        out[78..80].copy_from_slice(&self.signature_type.to_be_bytes());
        out
    }

    pub fn major(&self) -> u8 {
        self.major
    }

    pub fn minor(&self) -> u8 {
        self.minor
    }

    pub fn ty(&self) -> u16 {
        self.ty
    }

    /// Does the lead claim this is a source package?
    pub fn is_source(&self) -> bool {
        self.ty == 1
    }

    pub fn archnum(&self) -> u16 {
        self.archnum
    }

    pub fn osnum(&self) -> u16 {
        self.osnum
    }

    pub fn signature_type(&self) -> u16 {
        self.signature_type
    }

    /// The package name, up to the first NUL
    pub fn name(&self) -> &[u8] {
        let end = self.name.iter().position(|&c| c == 0).unwrap_or(self.name.len());
        &self.name[..end]
    }
}

/// Read and validate a lead from `r`
pub fn read_lead(r: &mut dyn Read) -> Result<RpmLead> {
    let mut bytes = [0u8; LEAD_SIZE as usize];
    read_exact(r, &mut bytes, "lead")?;
    RpmLead::from_bytes(&bytes)
}
