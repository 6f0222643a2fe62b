//! Self-describing binary encoding of typed fields keyed by integer ids.
//!
//! A [`FieldMap`] stores up to four value shapes under caller-chosen `i32`
//! ids:
//! - 64-bit signed integers
//! - byte strings (embedded zero bytes allowed)
//! - lists of 64-bit integers
//! - lists of byte strings
//!
//! Maps serialize to a flat big-endian buffer prefixed with its payload
//! length, decode back with every length checked against the remaining input,
//! deep-copy, and render to bounded debug text.

pub mod config;
pub mod copy;
pub mod decode;
pub mod encode;
pub mod error;
pub mod format;
pub mod map;
mod store;
pub mod value;

pub use config::{FieldNames, FormatConfig, DEFAULT_MAX_TEXT_SIZE};
pub use encode::HEADER_SIZE;
pub use error::{MapError, Result};
pub use format::{render_value, RenderedText, ELLIPSIS, TRUNCATION_MARKER};
pub use map::FieldMap;
pub use value::{FieldId, FieldType, FieldValue, TYPE_MAX};
