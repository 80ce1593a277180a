//! Generic RPM header parsing routines
//!
//! This contains code common to signature and main headers.

#![forbid(unsafe_code)]

use super::value::{TagType, TagValue};
use super::DecodedHeader;
use crate::error::{read_exact, Result};
use crate::TagData;
use std::collections::BTreeMap;
use std::convert::TryInto;
use std::io::Read;

pub const RPM_HDRMAGIC: [u8; 8] = [0x8e, 0xad, 0xe8, 0x01, 0x00, 0x00, 0x00, 0x00];

/// Largest data store accepted unless the caller asks otherwise
pub const DEFAULT_MAX_DATA_LENGTH: u32 = 256 * 1024 * 1024;

/// Region tags: header image, signatures, immutable
const REGION_TAGS: std::ops::RangeInclusive<u32> = 61..=63;

/// Validate a header preamble, returning the index length and data length.
pub fn parse_header_magic(data: &[u8; 16], max_data_length: u32) -> Result<(u32, u32)> {
    fail_if!(data[..8] != RPM_HDRMAGIC[..], "wrong header magic");
    let index_length = u32::from_be_bytes(data[8..12].try_into().expect("correct number of bytes"));
    let data_length = u32::from_be_bytes(data[12..].try_into().expect("correct number of bytes"));
    fail_if!(index_length > 0xFFFF, "index too long");
    fail_if!(
        data_length >= max_data_length,
        "data too long ({} bytes, limit {})",
        data_length,
        max_data_length
    );
    Ok((index_length, data_length))
}

/// Read and validate a header preamble from `r`.
pub fn read_header_magic(r: &mut dyn Read, max_data_length: u32) -> Result<(u32, u32)> {
    let mut magic = [0; 16];
    read_exact(r, &mut magic, "header preamble")?;
    parse_header_magic(&magic, max_data_length)
}

fn decode_fixed(ty: TagType, body: &[u8]) -> TagValue {
    fn words<const N: usize>(body: &[u8]) -> impl Iterator<Item = [u8; N]> + '_ {
        body.chunks_exact(N)
            .map(|c| c.try_into().expect("chunks_exact yields N bytes; qed"))
    }
    match ty {
        TagType::Char => TagValue::Char(body.to_vec()),
        TagType::Int8 => TagValue::Int8(body.to_vec()),
        TagType::Bin => TagValue::Bin(body.to_vec()),
        TagType::Int16 => TagValue::Int16(words(body).map(u16::from_be_bytes).collect()),
        TagType::Int32 => TagValue::Int32(words(body).map(u32::from_be_bytes).collect()),
        TagType::Int64 => TagValue::Int64(words(body).map(u64::from_be_bytes).collect()),
        TagType::String | TagType::StringArray | TagType::I18NString => {
            unreachable!("strings have no fixed size")
        }
    }
}

fn decode_strings(entry: &TagData, ty: TagType, count: usize, body: &[u8]) -> Result<TagValue> {
    if ty == TagType::String && count != 1 {
        bad_data!("Entry {:?} is a string with nonunit count", entry)
    }
    let mut strings = Vec::with_capacity(count.min(body.len()));
    let mut rest = body;
    for _ in 0..count {
        let nul = match rest.iter().position(|&i| i == 0) {
            Some(nul) => nul,
            None => bad_data!("Entry {:?} is a too long string array", entry),
        };
        match std::str::from_utf8(&rest[..nul]) {
            Ok(s) => strings.push(s.to_owned()),
            Err(e) => bad_data!("String entry is not valid UTF-8: {}", e),
        }
        rest = &rest[nul + 1..];
    }
    Ok(match ty {
        TagType::String => TagValue::String(strings.pop().expect("count is 1; qed")),
        TagType::StringArray => TagValue::StringArray(strings),
        _ => TagValue::I18NString(strings),
    })
}

/// Decode one header structure, returning it along with its data length.
pub(super) fn load_header(r: &mut dyn Read, max_data_length: u32) -> Result<(DecodedHeader, u32)> {
    let (index_length, data_length) = read_header_magic(r, max_data_length)?;
    let mut index_bytes = vec![0u8; 16 * index_length as usize];
    let mut data = vec![0u8; data_length as usize];
    read_exact(r, &mut index_bytes, "header index")?;
    read_exact(r, &mut data, "header data store")?;
    let index = TagData::parse_index(&index_bytes);
    let mut region_tag = None;
    let mut entries = BTreeMap::new();
    for (position, entry) in index.iter().enumerate() {
        let tag = entry.tag();
        if position == 0
            && REGION_TAGS.contains(&tag)
            && entry.ty() == TagType::Bin as u32
            && entry.count() == 16
        {
            region_tag = Some(tag);
            continue;
        }
        let ty = match TagType::from_raw(entry.ty()) {
            None => bad_data!("Entry {:?} has an invalid type {}", entry, entry.ty()),
            Some(s) => s,
        };
        let offset = entry.offset();
        fail_if!(offset > data_length, "Entry {:?} has bad offset", entry);
        let offset = offset as usize;
        let count = entry.count();
        // data_length is less than 4GiB and every element takes at least one
        // byte, so this bounds “count” without risking overflow below
        if count == 0 || count > data_length {
            bad_data!("Entry {:?} has invalid count", entry)
        }
        let count = count as usize;
        if offset & (ty.alignment() - 1) != 0 {
            bad_data!("Entry {:?} is not properly aligned", entry)
        }
        let body = &data[offset..];
        let value = match ty.element_size() {
            Some(size) => match size.checked_mul(count) {
                Some(len) if len <= body.len() => decode_fixed(ty, &body[..len]),
                _ => bad_data!("Entry {:?} extends past the data store", entry),
            },
            None => decode_strings(entry, ty, count, body)?,
        };
        if entries.insert(tag, value).is_some() {
            bad_data!("duplicate tag {}", tag)
        }
    }
    Ok((
        DecodedHeader {
            region_tag,
            entries,
        },
        data_length,
    ))
}
