//! Typed field maps with a compact self-describing binary encoding.
//!
//! A map stores 64-bit integers, byte strings, integer lists and string
//! lists under caller-chosen integer ids, and converts to and from a flat
//! big-endian wire buffer.
//!
//! # Crate Structure
//!
//! - [`codec`] — the map, its wire encoding, deep copy and debug rendering
//!
//! The `fieldmap` command-line tool (behind the `cli` feature) encodes maps
//! from JSON descriptions and inspects serialized buffers.

/// Re-export codec types.
pub mod codec {
    pub use fieldmap_codec::*;
}

pub use fieldmap_codec::{FieldId, FieldMap, FieldType, FieldValue, MapError};
