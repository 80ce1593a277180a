//! Functions for decoding RPM headers
//!
//! RPM headers use an undocumented binary format: a 16-byte preamble, an
//! index of 16-byte entries, and a data store the entries point into.

mod common;
mod immutable;
mod signature;
pub mod tags;
mod value;
use self::common::load_header;
pub use self::immutable::load_immutable;
pub use self::signature::load_signature;
pub use self::common::{
    parse_header_magic, read_header_magic, DEFAULT_MAX_DATA_LENGTH, RPM_HDRMAGIC,
};
pub use self::value::{TagType, TagValue};
use crate::error::Result;
use std::collections::{BTreeMap, HashMap};
use std::io::Read;

/// Anything that can look up header values by tag.
///
/// The built-in decoder produces [`DecodedHeader`]s, but any other decoder
/// can feed [`crate::PackageHeader`] by implementing this trait.
pub trait TagLookup {
    /// The value of `tag`, if present
    fn tag_value(&self, tag: u32) -> Option<&TagValue>;
}

impl TagLookup for BTreeMap<u32, TagValue> {
    fn tag_value(&self, tag: u32) -> Option<&TagValue> {
        self.get(&tag)
    }
}

impl TagLookup for HashMap<u32, TagValue> {
    fn tag_value(&self, tag: u32) -> Option<&TagValue> {
        self.get(&tag)
    }
}

/// A decoded signature header together with its main header
pub trait DecodedHeaders {
    /// Tags from the signature header
    fn signature_tags(&self) -> &dyn TagLookup;
    /// Tags from the main header
    fn main_tags(&self) -> &dyn TagLookup;
}

/// A decoded RPM header
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DecodedHeader {
    region_tag: Option<u32>,
    entries: BTreeMap<u32, TagValue>,
}

impl DecodedHeader {
    /// Decode one header structure from `r`, rejecting data stores of
    /// `max_data_length` bytes or more.  Trailing alignment padding is not
    /// consumed.
    pub fn read(r: &mut dyn Read, max_data_length: u32) -> Result<Self> {
        load_header(r, max_data_length).map(|(header, _)| header)
    }

    /// Decode a header structure from a byte slice
    pub fn parse(mut bytes: &[u8]) -> Result<Self> {
        Self::read(&mut bytes, DEFAULT_MAX_DATA_LENGTH)
    }

    /// Build a header from already-decoded entries
    pub fn from_entries<I>(region_tag: Option<u32>, entries: I) -> Self
    where
        I: IntoIterator<Item = (u32, TagValue)>,
    {
        Self {
            region_tag,
            entries: entries.into_iter().collect(),
        }
    }

    /// The region tag (62 for signature headers, 63 for main headers), if
    /// the header has a region
    pub fn region_tag(&self) -> Option<u32> {
        self.region_tag
    }

    /// The value of `tag`
    pub fn get(&self, tag: u32) -> Option<&TagValue> {
        self.entries.get(&tag)
    }

    /// All entries, in tag order
    pub fn iter(&self) -> impl Iterator<Item = (u32, &TagValue)> + '_ {
        self.entries.iter().map(|(&tag, value)| (tag, value))
    }

    /// Number of entries, not counting the region
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TagLookup for DecodedHeader {
    fn tag_value(&self, tag: u32) -> Option<&TagValue> {
        self.get(tag)
    }
}

/// The two decoded headers of a package
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DecodedPackage {
    /// The signature header
    pub signature: DecodedHeader,
    /// The main header
    pub main: DecodedHeader,
}

impl DecodedHeaders for DecodedPackage {
    fn signature_tags(&self) -> &dyn TagLookup {
        &self.signature
    }

    fn main_tags(&self) -> &dyn TagLookup {
        &self.main
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups_agree() {
        let header = DecodedHeader::from_entries(
            Some(63),
            vec![
                (tags::RPMTAG_NAME, TagValue::String("lua".to_owned())),
                (tags::RPMTAG_EPOCH, TagValue::Int32(vec![2])),
            ],
        );
        let map: HashMap<_, _> = header.iter().map(|(t, v)| (t, v.clone())).collect();
        for lookup in &[&header as &dyn TagLookup, &map] {
            assert_eq!(
                lookup.tag_value(tags::RPMTAG_NAME).and_then(TagValue::as_str),
                Some("lua")
            );
            assert_eq!(
                lookup.tag_value(tags::RPMTAG_EPOCH).and_then(TagValue::as_u32),
                Some(2)
            );
            assert!(lookup.tag_value(tags::RPMTAG_VERSION).is_none());
        }
        assert_eq!(header.region_tag(), Some(63));
        assert_eq!(header.iter().map(|(t, _)| t).collect::<Vec<_>>(), vec![1000, 1003]);
    }

    #[test]
    fn parses_from_slice() {
        let mut bytes = RPM_HDRMAGIC.to_vec();
        bytes.extend_from_slice(&[0, 0, 0, 0, 0, 0, 0, 0]);
        let header = DecodedHeader::parse(&bytes).unwrap();
        assert!(header.is_empty());
        assert_eq!(header.region_tag(), None);
    }
}
