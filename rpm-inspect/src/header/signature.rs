use super::tags::RPMTAG_HEADERSIGNATURES;
use super::{load_header, DecodedHeader};
use crate::error::{read_exact, Result};
use std::io::Read;

/// Decode a signature header from `r`, along with the padding that aligns
/// the main header to 8 bytes.  The padding must be zeroed.
pub fn load_signature(r: &mut dyn Read, max_data_length: u32) -> Result<DecodedHeader> {
    let (header, data_length) = load_header(r, max_data_length)?;
    match header.region_tag() {
        None | Some(RPMTAG_HEADERSIGNATURES) => {}
        Some(tag) => bad_data!("bad region kind {}, expected {}", tag, RPMTAG_HEADERSIGNATURES),
    }
    let remainder = data_length as usize & 7;
    if remainder != 0 {
        let mut s = [0u8; 7];
        let s = &mut s[..8 - remainder];
        read_exact(r, s, "signature header padding")?;
        for &mut i in s {
            if i != 0 {
                bad_data!("nonzero padding after signature header")
            }
        }
    }
    Ok(header)
}

#[cfg(test)]
mod tests {
    use super::super::common::RPM_HDRMAGIC;
    use super::*;
    use crate::{Error, TagData, TagType};

    fn sig_header(region: u32, pad: &[u8]) -> Vec<u8> {
        let mut v = RPM_HDRMAGIC.to_vec();
        v.extend_from_slice(&[0, 0, 0, 2, 0, 0, 0, 19]);
        v.extend_from_slice(&TagData::new(region, TagType::Bin as _, 3, 16).to_bytes());
        v.extend_from_slice(&TagData::new(1005, TagType::Bin as _, 0, 3).to_bytes());
        v.extend_from_slice(b"sig");
        v.extend_from_slice(&TagData::new(region, TagType::Bin as _, (-32i32) as u32, 16).to_bytes());
        v.extend_from_slice(pad);
        v.extend_from_slice(b"main header");
        v
    }

    #[test]
    fn consumes_padding() {
        let bytes = sig_header(62, &[0; 5]);
        let mut r = &bytes[..];
        let header = load_signature(&mut r, 1024).unwrap();
        assert_eq!(header.region_tag(), Some(62));
        assert_eq!(header.get(1005).and_then(|v| v.as_bytes()), Some(&b"sig"[..]));
        assert_eq!(r, b"main header");
    }

    #[test]
    fn rejects_dirty_padding() {
        match load_signature(&mut &sig_header(62, &[0, 0, 1, 0, 0])[..], 1024) {
            Err(Error::MalformedHeader(msg)) => {
                assert_eq!(msg, "nonzero padding after signature header")
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn rejects_main_header_region() {
        match load_signature(&mut &sig_header(63, &[0; 5])[..], 1024) {
            Err(Error::MalformedHeader(msg)) => assert_eq!(msg, "bad region kind 63, expected 62"),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn missing_padding() {
        match load_signature(&mut &sig_header(62, &[0; 2])[..19 + 16 * 3 + 2], 1024) {
            Err(Error::TruncatedInput { what }) => assert_eq!(what, "signature header padding"),
            other => panic!("unexpected result {:?}", other),
        }
    }
}
