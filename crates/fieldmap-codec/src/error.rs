use std::collections::TryReserveError;

use crate::value::{FieldId, FieldType};

/// Errors reported by map operations, encoding, decoding and formatting.
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    /// No entry is stored under the requested field id.
    #[error("field {0} not found")]
    NotFound(FieldId),

    /// A set without `replace` targeted an id that already has an entry.
    #[error("field {0} already exists")]
    AlreadyExist(FieldId),

    /// A decoded buffer carries the same field id more than once.
    #[error("field id {0} appears more than once in the buffer")]
    DuplicatedFieldIds(FieldId),

    /// An allocation could not be satisfied.
    #[error("insufficient memory: {0}")]
    InsufficientMem(#[from] TryReserveError),

    /// The field exists but holds a different type than requested.
    #[error("field {field} holds {actual}, not {expected}")]
    TypeMismatch {
        field: FieldId,
        expected: FieldType,
        actual: FieldType,
    },

    /// An argument was rejected at the API boundary.
    #[error("invalid argument: {0}")]
    InvalidArgs(String),

    /// A type tag outside the known range.
    #[error("unknown type tag {0}")]
    UnknownType(u32),

    /// A declared length runs past the end of the input.
    #[error("truncated data ({needed} bytes needed, {remaining} remaining)")]
    TruncatedData { needed: usize, remaining: usize },

    /// The fixed-size text output was exhausted.
    #[error("output buffer too small")]
    BufferTooSmall,

    /// A size computation wrapped or left the representable wire range.
    #[error("integer overflow while sizing encoded output")]
    IntegerOverflow,

    /// A decoded value is structurally invalid.
    #[error("bad data: {0}")]
    BadData(String),
}

pub type Result<T> = std::result::Result<T, MapError>;
