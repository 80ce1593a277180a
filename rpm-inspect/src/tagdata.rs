//! Routines for handling RPM index entries

use std::convert::TryInto;

/// An RPM index entry, as stored on disk: four big-endian `u32`s
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct TagData {
    tag: u32,
    ty: u32,
    offset: u32,
    count: u32,
}

impl TagData {
    /// Creates a single [`TagData`] entry
    pub fn new(tag: u32, ty: u32, offset: u32, count: u32) -> Self {
        Self {
            tag,
            ty,
            offset,
            count,
        }
    }

    /// Parse an entry from its on-disk form
    pub fn from_bytes(bytes: &[u8; 16]) -> Self {
        let word = |i: usize| u32::from_be_bytes(bytes[i..i + 4].try_into().expect("4 bytes; qed"));
        Self::new(word(0), word(4), word(8), word(12))
    }

    /// The on-disk form of this entry
    pub fn to_bytes(&self) -> [u8; 16] {
        let mut out = [0u8; 16];
        out[..4].copy_from_slice(&self.tag.to_be_bytes());
        out[4..8].copy_from_slice(&self.ty.to_be_bytes());
        out[8..12].copy_from_slice(&self.offset.to_be_bytes());
        out[12..].copy_from_slice(&self.count.to_be_bytes());
        out
    }

    /// Parse a packed array of entries.  `bytes.len()` must be a multiple of 16.
    pub fn parse_index(bytes: &[u8]) -> Vec<Self> {
        assert_eq!(bytes.len() & 15, 0, "index length not a multiple of 16");
        bytes
            .chunks_exact(16)
            .map(|chunk| Self::from_bytes(chunk.try_into().expect("chunks are 16 bytes; qed")))
            .collect()
    }
}

impl TagData {
    /// The tag
    pub fn tag(&self) -> u32 {
        self.tag
    }
    /// The type
    pub fn ty(&self) -> u32 {
        self.ty
    }
    /// The offset
    pub fn offset(&self) -> u32 {
        self.offset
    }
    /// The count
    pub fn count(&self) -> u32 {
        self.count
    }
}
