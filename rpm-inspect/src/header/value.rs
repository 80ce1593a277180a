//! Decoded header values

/// The type of an RPM header entry, as stored in the index
#[repr(u32)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum TagType {
    Char = 1,
    Int8 = 2,
    Int16 = 3,
    Int32 = 4,
    Int64 = 5,
    String = 6,
    Bin = 7,
    StringArray = 8,
    I18NString = 9,
}

impl TagType {
    /// Look up a type by its on-disk number
    pub fn from_raw(ty: u32) -> Option<Self> {
        Some(match ty {
            1 => TagType::Char,
            2 => TagType::Int8,
            3 => TagType::Int16,
            4 => TagType::Int32,
            5 => TagType::Int64,
            6 => TagType::String,
            7 => TagType::Bin,
            8 => TagType::StringArray,
            9 => TagType::I18NString,
            _ => return None,
        })
    }

    /// Required alignment of the data, in bytes
    pub fn alignment(self) -> usize {
        match self {
            TagType::Int16 => 2,
            TagType::Int32 => 4,
            TagType::Int64 => 8,
            _ => 1,
        }
    }

    /// Size of one element, or [`None`] for NUL-terminated strings
    pub fn element_size(self) -> Option<usize> {
        match self {
            TagType::Char | TagType::Int8 | TagType::Bin => Some(1),
            TagType::Int16 => Some(2),
            TagType::Int32 => Some(4),
            TagType::Int64 => Some(8),
            TagType::String | TagType::StringArray | TagType::I18NString => None,
        }
    }
}

/// The value of one header entry
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum TagValue {
    /// Array of characters
    Char(Vec<u8>),
    /// Array of [`u8`]
    Int8(Vec<u8>),
    /// Array of [`u16`]
    Int16(Vec<u16>),
    /// Array of [`u32`]
    Int32(Vec<u32>),
    /// Array of [`u64`]
    Int64(Vec<u64>),
    /// A single string
    String(String),
    /// Binary blob
    Bin(Vec<u8>),
    /// Array of strings
    StringArray(Vec<String>),
    /// Internationalized string, one entry per locale
    I18NString(Vec<String>),
}

impl TagValue {
    /// The type of this value
    pub fn ty(&self) -> TagType {
        match self {
            TagValue::Char(_) => TagType::Char,
            TagValue::Int8(_) => TagType::Int8,
            TagValue::Int16(_) => TagType::Int16,
            TagValue::Int32(_) => TagType::Int32,
            TagValue::Int64(_) => TagType::Int64,
            TagValue::String(_) => TagType::String,
            TagValue::Bin(_) => TagType::Bin,
            TagValue::StringArray(_) => TagType::StringArray,
            TagValue::I18NString(_) => TagType::I18NString,
        }
    }

    /// The number of elements, as recorded in the index
    pub fn count(&self) -> usize {
        match self {
            TagValue::String(_) => 1,
            TagValue::Char(e) | TagValue::Int8(e) | TagValue::Bin(e) => e.len(),
            TagValue::Int16(e) => e.len(),
            TagValue::Int32(e) => e.len(),
            TagValue::Int64(e) => e.len(),
            TagValue::StringArray(e) | TagValue::I18NString(e) => e.len(),
        }
    }

    /// Does this value hold no data at all?
    pub fn is_empty(&self) -> bool {
        match self {
            TagValue::String(s) => s.is_empty(),
            _ => self.count() == 0,
        }
    }

    /// Raw bytes of a binary, character, or 8-bit integer value
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            TagValue::Bin(e) | TagValue::Char(e) | TagValue::Int8(e) => Some(e),
            _ => None,
        }
    }

    /// The first element of an integer value
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            TagValue::Int32(e) => e.first().copied(),
            TagValue::Int16(e) => e.first().map(|&i| i.into()),
            TagValue::Int8(e) | TagValue::Char(e) => e.first().map(|&i| i.into()),
            _ => None,
        }
    }

    /// A string value.  For internationalized strings, this is the entry for
    /// the default locale.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TagValue::String(s) => Some(s),
            TagValue::I18NString(e) => e.first().map(|s| &**s),
            _ => None,
        }
    }
}
