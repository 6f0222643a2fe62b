use bytes::Buf;
use tracing::debug;

use crate::encode::HEADER_SIZE;
use crate::error::{MapError, Result};
use crate::map::FieldMap;
use crate::value::{FieldId, FieldType, FieldValue};

/// Bytes taken by one encoded 64-bit integer.
const INT64_WIRE_SIZE: usize = 8;

/// Minimum bytes taken by one string-list element (its length word).
const STRING_LEN_WIRE_SIZE: usize = 4;

impl FieldMap {
    /// Decode a buffer produced by [`FieldMap::serialize`].
    ///
    /// The declared payload length must fit in the bytes that follow the
    /// header; anything past the declared payload is ignored.
    pub fn deserialize(src: &[u8]) -> Result<Self> {
        let mut buf = src;
        ensure_remaining(buf, HEADER_SIZE)?;
        let declared = buf.get_u32() as usize;
        ensure_remaining(buf, declared)?;
        Self::deserialize_content(&buf[..declared])
    }

    /// Decode a raw payload (no length header) into a new map.
    ///
    /// Every length is checked against the remaining input before anything
    /// is allocated for it. On error the partially built map is dropped.
    pub fn deserialize_content(src: &[u8]) -> Result<Self> {
        let mut buf = src;
        let mut map = FieldMap::new();

        while buf.has_remaining() {
            ensure_remaining(buf, 8)?;
            let tag = buf.get_u32();
            let id: FieldId = buf.get_i32();

            let field_type = FieldType::from_wire(tag).inspect_err(|_| {
                debug!(tag, field_id = id, "rejecting unknown type tag");
            })?;
            if map.contains(id) {
                debug!(field_id = id, "rejecting duplicated field id");
                return Err(MapError::DuplicatedFieldIds(id));
            }

            let value = decode_value(&mut buf, field_type).inspect_err(|err| {
                debug!(field_id = id, error = %err, "failed decoding field value");
            })?;
            map.insert_unique(id, value)?;
        }

        Ok(map)
    }
}

fn decode_value(buf: &mut &[u8], field_type: FieldType) -> Result<FieldValue> {
    match field_type {
        FieldType::Int64 => decode_int64(buf).map(FieldValue::Int64),
        FieldType::String => decode_string(buf).map(FieldValue::String),
        FieldType::Int64List => decode_int64_list(buf).map(FieldValue::Int64List),
        FieldType::StringList => decode_string_list(buf).map(FieldValue::StringList),
        FieldType::Empty => Err(MapError::UnknownType(field_type.wire_tag())),
    }
}

fn decode_int64(buf: &mut &[u8]) -> Result<i64> {
    ensure_remaining(buf, INT64_WIRE_SIZE)?;
    let low = u64::from(buf.get_u32());
    let high = u64::from(buf.get_u32());
    Ok(((high << 32) | low) as i64)
}

fn decode_string(buf: &mut &[u8]) -> Result<Vec<u8>> {
    ensure_remaining(buf, 4)?;
    let len = buf.get_i32();
    if len <= 0 {
        return Err(MapError::BadData(format!("invalid string length {len}")));
    }
    let len = len as usize;
    ensure_remaining(buf, len)?;

    let mut bytes = Vec::new();
    bytes.try_reserve_exact(len)?;
    bytes.extend_from_slice(&buf[..len]);
    buf.advance(len);
    Ok(bytes)
}

fn decode_int64_list(buf: &mut &[u8]) -> Result<Vec<i64>> {
    let count = decode_count(buf, INT64_WIRE_SIZE)?;

    let mut values = Vec::new();
    values.try_reserve_exact(count)?;
    for _ in 0..count {
        values.push(decode_int64(buf)?);
    }
    Ok(values)
}

fn decode_string_list(buf: &mut &[u8]) -> Result<Vec<Vec<u8>>> {
    let count = decode_count(buf, STRING_LEN_WIRE_SIZE)?;

    let mut items = Vec::new();
    items.try_reserve_exact(count)?;
    for _ in 0..count {
        items.push(decode_string(buf)?);
    }
    Ok(items)
}

/// Read an element count and bound it by what the remaining input could
/// possibly hold, given the smallest encoding of one element.
fn decode_count(buf: &mut &[u8], min_element_size: usize) -> Result<usize> {
    ensure_remaining(buf, 4)?;
    let count = buf.get_i32();
    if count < 0 {
        return Err(MapError::BadData(format!("negative element count {count}")));
    }
    let count = count as usize;
    if count > buf.remaining() / min_element_size {
        return Err(MapError::BadData(format!(
            "element count {count} exceeds remaining {} bytes",
            buf.remaining()
        )));
    }
    Ok(count)
}

fn ensure_remaining(buf: &[u8], needed: usize) -> Result<()> {
    let remaining = buf.len();
    if needed > remaining {
        return Err(MapError::TruncatedData { needed, remaining });
    }
    Ok(())
}
