use std::fmt;

use crate::error::{MapError, Result};

/// Caller-chosen key of an entry. Unique within a map, no ordering semantics.
pub type FieldId = i32;

/// Wire tag of the value stored under a field id.
///
/// `Empty` is the "no such field" answer of [`crate::FieldMap::get_type`]
/// and never appears on the wire.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Empty = 0,
    Int64 = 1,
    String = 2,
    Int64List = 3,
    StringList = 4,
}

/// First tag value past the known range. Any decoded tag at or above this
/// bound is rejected.
pub const TYPE_MAX: u32 = 5;

impl FieldType {
    /// Resolve a tag read from the wire.
    pub fn from_wire(tag: u32) -> Result<Self> {
        match tag {
            1 => Ok(Self::Int64),
            2 => Ok(Self::String),
            3 => Ok(Self::Int64List),
            4 => Ok(Self::StringList),
            _ => Err(MapError::UnknownType(tag)),
        }
    }

    /// The tag written to the wire.
    pub fn wire_tag(self) -> u32 {
        self as u32
    }

    /// Upper-case name used by the debug formatter.
    pub fn name(self) -> &'static str {
        match self {
            Self::Empty => "EMPTY",
            Self::Int64 => "INT64",
            Self::String => "STRING",
            Self::Int64List => "INT64_LIST",
            Self::StringList => "STRING_LIST",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A value owned by a map. The variant is the type tag.
///
/// Strings are byte blobs: they may carry embedded zero bytes and are not
/// required to be UTF-8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Int64(i64),
    String(Vec<u8>),
    Int64List(Vec<i64>),
    StringList(Vec<Vec<u8>>),
}

impl FieldValue {
    pub fn field_type(&self) -> FieldType {
        match self {
            Self::Int64(_) => FieldType::Int64,
            Self::String(_) => FieldType::String,
            Self::Int64List(_) => FieldType::Int64List,
            Self::StringList(_) => FieldType::StringList,
        }
    }

    /// Reject values the decoder would refuse to read back.
    ///
    /// The wire forbids non-positive string lengths, so empty strings and
    /// empty string-list elements cannot be stored.
    pub(crate) fn validate(&self) -> Result<()> {
        match self {
            Self::String(bytes) if bytes.is_empty() => Err(MapError::InvalidArgs(
                "string values must not be empty".to_string(),
            )),
            Self::StringList(items) => match items.iter().position(Vec::is_empty) {
                Some(index) => Err(MapError::InvalidArgs(format!(
                    "string list element {index} must not be empty"
                ))),
                None => Ok(()),
            },
            _ => Ok(()),
        }
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Int64(value)
    }
}

impl From<Vec<u8>> for FieldValue {
    fn from(value: Vec<u8>) -> Self {
        Self::String(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::String(value.as_bytes().to_vec())
    }
}

impl From<Vec<i64>> for FieldValue {
    fn from(value: Vec<i64>) -> Self {
        Self::Int64List(value)
    }
}

impl From<Vec<Vec<u8>>> for FieldValue {
    fn from(value: Vec<Vec<u8>>) -> Self {
        Self::StringList(value)
    }
}
