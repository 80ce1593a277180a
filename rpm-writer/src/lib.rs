//! RPMv4 header and package emitter
//!
//! Headers are written from [`TagValue`]s, the same values `rpm_inspect`
//! decodes, so a decoded header can be emitted again unchanged.  Packages
//! are written with a lead, a signature header, a main header, and an opaque
//! payload.

use rpm_inspect::header::tags::{RPMTAG_HEADERIMMUTABLE, RPMTAG_HEADERSIGNATURES};
use rpm_inspect::{DecodedHeader, RpmLead, TagData, TagType, TagValue, RPM_HDRMAGIC};
use std::collections::BTreeMap;
use std::convert::TryFrom;
use std::io::{Error, ErrorKind, Result, Write};

/// What kind of header is this?
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum HeaderKind {
    /// Signature header
    Signature,
    /// Main header
    Main,
}

impl HeaderKind {
    /// The tag of the region entry for this kind of header
    pub fn region_tag(self) -> u32 {
        match self {
            HeaderKind::Signature => RPMTAG_HEADERSIGNATURES,
            HeaderKind::Main => RPMTAG_HEADERIMMUTABLE,
        }
    }
}

fn invalid(msg: String) -> Error {
    Error::new(ErrorKind::InvalidInput, msg)
}

/// The number of bytes `value` takes in the data store
fn encoded_len(value: &TagValue) -> usize {
    match value {
        TagValue::Char(e) | TagValue::Int8(e) | TagValue::Bin(e) => e.len(),
        TagValue::Int16(e) => e.len() << 1,
        TagValue::Int32(e) => e.len() << 2,
        TagValue::Int64(e) => e.len() << 3,
        TagValue::String(e) => e.len() + 1,
        TagValue::StringArray(e) | TagValue::I18NString(e) => {
            e.iter().fold(0, |y, x| x.len() + 1 + y)
        }
    }
}

fn advance_length(ty: TagType, len: usize) -> usize {
    let alignment_delta = ty.alignment() - 1;
    (len + alignment_delta) & !alignment_delta
}

fn write_bytes(value: &TagValue, w: &mut dyn Write) -> Result<()> {
    match value {
        TagValue::Char(e) | TagValue::Int8(e) | TagValue::Bin(e) => w.write_all(e),
        TagValue::Int16(e) => e.iter().try_for_each(|i| w.write_all(&i.to_be_bytes())),
        TagValue::Int32(e) => e.iter().try_for_each(|i| w.write_all(&i.to_be_bytes())),
        TagValue::Int64(e) => e.iter().try_for_each(|i| w.write_all(&i.to_be_bytes())),
        TagValue::String(e) => w.write_all(e.as_bytes()).and_then(|()| w.write_all(b"\0")),
        TagValue::StringArray(e) | TagValue::I18NString(e) => {
            for i in e {
                w.write_all(i.as_bytes())?;
                w.write_all(b"\0")?
            }
            Ok(())
        }
    }
}

/// Check that `value` can be stored and read back
fn check_value(tag: u32, value: &TagValue) -> Result<()> {
    if value.count() == 0 {
        return Err(invalid(format!("tag {} has no elements", tag)));
    }
    let has_nul = match value {
        TagValue::String(s) => s.contains('\0'),
        TagValue::StringArray(e) | TagValue::I18NString(e) => e.iter().any(|s| s.contains('\0')),
        _ => false,
    };
    if has_nul {
        return Err(invalid(format!("tag {} has a string with an embedded NUL", tag)));
    }
    Ok(())
}

/// A header builder
#[derive(Clone, Debug)]
pub struct HeaderBuilder {
    kind: HeaderKind,
    data: BTreeMap<u32, TagValue>,
}

impl HeaderBuilder {
    pub fn new(kind: HeaderKind) -> Self {
        Self {
            kind,
            data: Default::default(),
        }
    }

    /// Start from the entries of a decoded header.  Its region, if any, is
    /// replaced by one matching `kind`.
    pub fn from_decoded(kind: HeaderKind, header: &DecodedHeader) -> Self {
        Self {
            kind,
            data: header.iter().map(|(tag, value)| (tag, value.clone())).collect(),
        }
    }

    pub fn kind(&self) -> HeaderKind {
        self.kind
    }

    /// Add an entry, returning the one it replaced
    pub fn push(&mut self, tag: u32, value: TagValue) -> Option<TagValue> {
        assert!(value.count() < u32::max_value() as _, "overflow");
        self.data.insert(tag, value)
    }

    pub fn remove(&mut self, tag: u32) -> Option<TagValue> {
        self.data.remove(&tag)
    }

    /// Length of the data store, including the region trailer
    fn len(&self) -> usize {
        self.data
            .values()
            .fold(0, |len, value| advance_length(value.ty(), len) + encoded_len(value))
            + 16
    }

    /// Write the header: preamble, region entry, index, data store, and
    /// region trailer.  The output is not padded.
    pub fn emit(&self, t: &mut dyn Write) -> Result<()> {
        for (&tag, value) in &self.data {
            check_value(tag, value)?;
        }
        let (dl, il) = (self.len(), self.data.len() + 1);
        let dl32 = u32::try_from(dl).map_err(|_| invalid(format!("header data too long ({} bytes)", dl)))?;
        let il32 = u32::try_from(il).map_err(|_| invalid(format!("too many entries ({})", il)))?;
        let region_tag = self.kind.region_tag();
        t.write_all(&RPM_HDRMAGIC)?;
        t.write_all(&il32.to_be_bytes())?;
        t.write_all(&dl32.to_be_bytes())?;
        t.write_all(&TagData::new(region_tag, TagType::Bin as _, dl32 - 16, 16).to_bytes())?;
        let mut rdl1 = 0;
        for (&tag, value) in &self.data {
            let offset = advance_length(value.ty(), rdl1);
            t.write_all(&TagData::new(tag, value.ty() as _, offset as _, value.count() as _).to_bytes())?;
            rdl1 = offset + encoded_len(value);
        }
        let mut rdl = 0;
        for value in self.data.values() {
            let offset = advance_length(value.ty(), rdl);
            t.write_all(&[0u8; 8][..offset - rdl])?;
            write_bytes(value, t)?;
            rdl = offset + encoded_len(value)
        }
        debug_assert_eq!(rdl1, rdl);
        debug_assert_eq!(rdl + 16, dl);
        let trailer_offset = (il32 as i32).wrapping_mul(-16) as u32;
        t.write_all(&TagData::new(region_tag, TagType::Bin as _, trailer_offset, 16).to_bytes())
    }

    /// The emitted header as a byte vector
    pub fn to_vec(&self) -> Result<Vec<u8>> {
        let mut v = vec![];
        self.emit(&mut v)?;
        Ok(v)
    }
}

/// Writes complete packages
#[derive(Clone, Debug)]
pub struct PackageWriter {
    pub lead: RpmLead,
    pub signature: HeaderBuilder,
    pub main: HeaderBuilder,
}

impl PackageWriter {
    pub fn new(lead: RpmLead, signature: HeaderBuilder, main: HeaderBuilder) -> Self {
        Self {
            lead,
            signature,
            main,
        }
    }

    /// Write the lead, the signature header padded to 8 bytes, the main
    /// header, and `payload`
    pub fn write(&self, dest: &mut dyn Write, payload: &[u8]) -> Result<()> {
        if self.signature.kind != HeaderKind::Signature || self.main.kind != HeaderKind::Main {
            return Err(invalid("header kinds do not match their positions".to_owned()));
        }
        let signature = self.signature.to_vec()?;
        let fixup = (signature.len() + 7 & !7) - signature.len();
        dest.write_all(&self.lead.to_bytes())?;
        dest.write_all(&signature)?;
        dest.write_all(&[0u8; 7][..fixup])?;
        self.main.emit(dest)?;
        dest.write_all(payload)
    }

    pub fn to_vec(&self, payload: &[u8]) -> Result<Vec<u8>> {
        let mut v = vec![];
        self.write(&mut v, payload)?;
        Ok(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_works() {
        let mut builder = HeaderBuilder::new(HeaderKind::Signature);
        let entry = TagValue::String("0000000000000000000000000000000000000000".to_owned());
        assert!(builder.push(256 + 13, entry.clone()).is_none());
        assert_eq!(builder.push(256 + 13, entry.clone()), Some(entry));
        assert!(builder.push(1005, TagValue::Bin(b"abc".to_vec())).is_none());
        let v = builder.to_vec().unwrap();
        // preamble, three index entries, 41 + 3 data bytes, trailer
        assert_eq!(v.len(), 16 + 3 * 16 + 44 + 16);
        assert_eq!(&v[8..16], &[0, 0, 0, 3, 0, 0, 0, 60]);
        assert_eq!(&v[16..20], &62u32.to_be_bytes());
        assert_eq!(&v[v.len() - 8..v.len() - 4], &(-48i32).to_be_bytes());
    }

    #[test]
    fn aligns_integers() {
        let mut builder = HeaderBuilder::new(HeaderKind::Main);
        builder.push(1000, TagValue::String("a".to_owned()));
        builder.push(1003, TagValue::Int32(vec![7]));
        builder.push(1004, TagValue::Int64(vec![1]));
        let v = builder.to_vec().unwrap();
        let store = &v[16 + 4 * 16..];
        // "a\0", pad to 4, u32, pad to 8, u64, trailer
        assert_eq!(&store[..2], b"a\0");
        assert_eq!(&store[2..4], &[0, 0]);
        assert_eq!(&store[4..8], &7u32.to_be_bytes());
        assert_eq!(&store[8..16], &1u64.to_be_bytes());
        assert_eq!(store.len(), 16 + 16);
    }

    #[test]
    fn rejects_unreadable_values() {
        let mut builder = HeaderBuilder::new(HeaderKind::Main);
        builder.push(1000, TagValue::String("a\0b".to_owned()));
        assert_eq!(builder.to_vec().unwrap_err().kind(), ErrorKind::InvalidInput);
        builder.push(1000, TagValue::Bin(vec![]));
        assert_eq!(builder.to_vec().unwrap_err().kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn pads_signature_header() {
        let mut signature = HeaderBuilder::new(HeaderKind::Signature);
        signature.push(1005, TagValue::Bin(vec![1; 3]));
        let main = HeaderBuilder::new(HeaderKind::Main);
        let writer = PackageWriter::new(RpmLead::new(false, 1, 1, b"x"), signature, main.clone());
        let v = writer.to_vec(b"payload").unwrap();
        let signature_len = 16 + 2 * 16 + 3 + 16;
        assert_eq!(v.len(), 96 + signature_len + 5 + 48 + 7);
        assert_eq!(&v[96 + signature_len..96 + signature_len + 5], &[0; 5]);
        assert!(v.ends_with(b"payload"));
        let swapped = PackageWriter::new(RpmLead::new(false, 1, 1, b"x"), main.clone(), main);
        assert!(swapped.to_vec(b"").is_err());
    }
}
