//! Functions for parsing RPM main headers

use super::tags::RPMTAG_HEADERIMMUTABLE;
use super::{load_header, DecodedHeader};
use crate::error::Result;
use std::io::Read;

/// Decode a main header from `r`.  The main header is not followed by
/// padding, so nothing past its data store is consumed.
pub fn load_immutable(r: &mut dyn Read, max_data_length: u32) -> Result<DecodedHeader> {
    let (header, _) = load_header(r, max_data_length)?;
    match header.region_tag() {
        None | Some(RPMTAG_HEADERIMMUTABLE) => Ok(header),
        Some(tag) => bad_data!("bad region kind {}, expected {}", tag, RPMTAG_HEADERIMMUTABLE),
    }
}
