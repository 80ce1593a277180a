//! Locating header structures inside an RPM package
//!
//! An RPM package starts with a 96-byte lead, followed by the signature
//! header, the main header, and the payload.  Each header structure begins
//! with a 16-byte preamble: 8 bytes of magic and reserved space, a big-endian
//! count of 16-byte index entries, and a big-endian count of data store bytes.
//! None of this code looks at the magic, so it works (and produces garbage)
//! on anything at all.

use crate::error::{read_exact, Error, Result};
use serde::Serialize;
use std::io::{Read, Seek, SeekFrom};

/// Size of the lead, which is never parsed here
pub const LEAD_SIZE: u64 = 96;

/// Size of the preamble at the start of every header structure
pub const PREAMBLE_SIZE: u64 = 16;

/// Size of a single index entry
pub const INDEX_ENTRY_SIZE: u64 = 16;

/// Byte offsets of one header structure within a package
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize)]
pub struct HeaderStructLocation {
    /// Offset of the first byte of the preamble
    pub start: u64,
    /// Offset one past the last byte, including alignment padding
    pub end: u64,
}

impl HeaderStructLocation {
    /// Number of bytes covered, or 0 if `end` is before `start`
    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    /// Is the region empty?  Never true for a located region.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Locations of the signature header and the main header
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize)]
pub struct HeaderByteRanges {
    /// The signature header
    pub signature: HeaderStructLocation,
    /// The main header
    pub header: HeaderStructLocation,
}

/// Size of a header structure with `index_count` entries and `store_bytes`
/// bytes of data, rounded up to a multiple of 8.  Returns [`None`] on
/// overflow.
pub fn padded_header_size(index_count: u32, store_bytes: u32) -> Option<u64> {
    u64::from(index_count)
        .checked_mul(INDEX_ENTRY_SIZE)?
        .checked_add(PREAMBLE_SIZE)?
        .checked_add(store_bytes.into())?
        .checked_add(7)
        .map(|size| size & !7)
}

/// Compute the size of the header structure whose preamble starts at
/// `position`, including padding to an 8-byte boundary.
///
/// On success the cursor of `source` is left just past the preamble, at
/// `position + 16`.
pub fn header_struct_size<R: Read + Seek + ?Sized>(source: &mut R, position: u64) -> Result<u64> {
    source.seek(SeekFrom::Start(position))?;
    let mut preamble = [0u8; PREAMBLE_SIZE as usize];
    read_exact(source, &mut preamble, "header preamble")?;
    let index_count = u32::from_be_bytes([preamble[8], preamble[9], preamble[10], preamble[11]]);
    let store_bytes = u32::from_be_bytes([preamble[12], preamble[13], preamble[14], preamble[15]]);
    match padded_header_size(index_count, store_bytes) {
        Some(size) => Ok(size),
        None => bad_data!(
            "header at offset {} with {} entries and {} data bytes is too large",
            position,
            index_count,
            store_bytes
        ),
    }
}

fn region_at<R: Read + Seek + ?Sized>(source: &mut R, start: u64) -> Result<HeaderStructLocation> {
    let size = header_struct_size(source, start)?;
    match start.checked_add(size) {
        Some(end) => Ok(HeaderStructLocation { start, end }),
        None => bad_data!("header at offset {} ends past the end of any file", start),
    }
}

/// Find the signature header and main header of the package in `source`.
///
/// The lead is skipped, not validated.
pub fn locate<R: Read + Seek + ?Sized>(source: &mut R) -> Result<HeaderByteRanges> {
    let signature = region_at(source, LEAD_SIZE)?;
    let header = region_at(source, signature.end)?;
    Ok(HeaderByteRanges { signature, header })
}

/// Read the raw bytes of a located region.
///
/// The buffer grows only as fast as `source` yields data, so counts in a
/// hostile preamble cannot force a huge allocation.  A region may stop short
/// of `location.end` only inside its trailing alignment: the main header is
/// not padded, and in a package with an empty payload the file ends first.
pub fn read_header_region<R: Read + Seek + ?Sized>(
    source: &mut R,
    location: HeaderStructLocation,
) -> Result<Vec<u8>> {
    source.seek(SeekFrom::Start(location.start))?;
    let mut buf = Vec::new();
    source.take(location.len()).read_to_end(&mut buf)?;
    if buf.len() as u64 == location.len() {
        return Ok(buf);
    }
    if buf.len() < PREAMBLE_SIZE as usize {
        return Err(Error::TruncatedInput { what: "header region" });
    }
    let index_count = u32::from_be_bytes([buf[8], buf[9], buf[10], buf[11]]);
    let store_bytes = u32::from_be_bytes([buf[12], buf[13], buf[14], buf[15]]);
    let unpadded = PREAMBLE_SIZE + INDEX_ENTRY_SIZE * u64::from(index_count) + u64::from(store_bytes);
    if (buf.len() as u64) < unpadded {
        return Err(Error::TruncatedInput { what: "header region" });
    }
    Ok(buf)
}

impl From<HeaderStructLocation> for std::ops::Range<u64> {
    fn from(location: HeaderStructLocation) -> Self {
        location.start..location.end
    }
}
