use bytes::BufMut;
use tracing::trace;

use crate::error::{MapError, Result};
use crate::map::FieldMap;
use crate::value::{FieldId, FieldValue};

/// Serialized header: big-endian payload length (4 bytes).
pub const HEADER_SIZE: usize = 4;

/// Destination of one encoding pass. The sizing pass and the writing pass
/// walk entries through the same code.
trait WireSink {
    fn write_u32(&mut self, value: u32) -> Result<()>;
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()>;
}

/// Sizing pass: accumulates the payload length, failing as soon as the
/// running total would wrap.
#[derive(Debug, Default)]
struct SizeCounter {
    total: u32,
}

impl SizeCounter {
    #[cfg(test)]
    fn starting_at(total: u32) -> Self {
        Self { total }
    }

    fn add(&mut self, len: usize) -> Result<()> {
        let len = u32::try_from(len).map_err(|_| MapError::IntegerOverflow)?;
        self.total = self
            .total
            .checked_add(len)
            .ok_or(MapError::IntegerOverflow)?;
        Ok(())
    }
}

impl WireSink for SizeCounter {
    fn write_u32(&mut self, _value: u32) -> Result<()> {
        self.add(4)
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.add(bytes.len())
    }
}

impl WireSink for Vec<u8> {
    fn write_u32(&mut self, value: u32) -> Result<()> {
        self.put_u32(value);
        Ok(())
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.put_slice(bytes);
        Ok(())
    }
}

impl FieldMap {
    /// Encode the map as `u32(payload_len) payload`.
    ///
    /// Wire format (all integers big-endian):
    /// ```text
    /// payload            ::= entry*
    /// entry              ::= u32(type_tag) i32(field_id) value
    /// value(Int64)       ::= u32(low) u32(high)
    /// value(String)      ::= u32(len) byte[len]
    /// value(Int64List)   ::= u32(count) value(Int64){count}
    /// value(StringList)  ::= u32(count) (u32(len) byte[len]){count}
    /// ```
    /// Entries appear in storage order.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        encode(self, true)
    }

    /// Encode only the payload, without the length header.
    pub fn serialize_content(&self) -> Result<Vec<u8>> {
        encode(self, false)
    }
}

fn encode(map: &FieldMap, with_header: bool) -> Result<Vec<u8>> {
    let mut counter = SizeCounter::default();
    for (id, value) in map.iter() {
        write_entry(&mut counter, id, value)?;
    }
    let payload_len = counter.total;

    let header_len = if with_header { HEADER_SIZE } else { 0 };
    let expected = usize::try_from(payload_len)
        .ok()
        .and_then(|len| len.checked_add(header_len))
        .ok_or(MapError::IntegerOverflow)?;
    trace!(entries = map.len(), payload_len, "sized map payload");

    let mut dst = Vec::new();
    dst.try_reserve_exact(expected)?;
    if with_header {
        dst.put_u32(payload_len);
    }
    for (id, value) in map.iter() {
        write_entry(&mut dst, id, value)?;
    }

    if dst.len() != expected {
        return Err(MapError::BadData(format!(
            "encoded {} bytes but sized {expected}",
            dst.len()
        )));
    }
    Ok(dst)
}

fn write_entry<S: WireSink>(sink: &mut S, id: FieldId, value: &FieldValue) -> Result<()> {
    sink.write_u32(value.field_type().wire_tag())?;
    sink.write_u32(id as u32)?;
    match value {
        FieldValue::Int64(value) => write_int64(sink, *value),
        FieldValue::String(bytes) => write_string(sink, bytes),
        FieldValue::Int64List(values) => {
            sink.write_u32(wire_len(values.len())?)?;
            for value in values {
                write_int64(sink, *value)?;
            }
            Ok(())
        }
        FieldValue::StringList(items) => {
            sink.write_u32(wire_len(items.len())?)?;
            for item in items {
                write_string(sink, item)?;
            }
            Ok(())
        }
    }
}

/// 64-bit values go out as two big-endian words, low word first.
fn write_int64<S: WireSink>(sink: &mut S, value: i64) -> Result<()> {
    let bits = value as u64;
    sink.write_u32(bits as u32)?;
    sink.write_u32((bits >> 32) as u32)
}

fn write_string<S: WireSink>(sink: &mut S, bytes: &[u8]) -> Result<()> {
    sink.write_u32(wire_len(bytes.len())?)?;
    sink.write_bytes(bytes)
}

/// Lengths and counts are read back as signed 32-bit values.
fn wire_len(len: usize) -> Result<u32> {
    i32::try_from(len)
        .map(|len| len as u32)
        .map_err(|_| MapError::IntegerOverflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_map_is_header_only() {
        let map = FieldMap::new();
        assert_eq!(map.serialize().unwrap(), vec![0, 0, 0, 0]);
        assert!(map.serialize_content().unwrap().is_empty());
    }

    #[test]
    fn int64_is_low_word_first() {
        let mut map = FieldMap::new();
        map.set_int64(7, 0x0102_0304_0506_0708, false).unwrap();

        let wire = map.serialize().unwrap();
        assert_eq!(
            wire,
            vec![
                0, 0, 0, 16, // payload length
                0, 0, 0, 1, // tag
                0, 0, 0, 7, // field id
                0x05, 0x06, 0x07, 0x08, // low word
                0x01, 0x02, 0x03, 0x04, // high word
            ]
        );
    }

    #[test]
    fn minus_one_sets_every_bit() {
        let mut map = FieldMap::new();
        map.set_int64(-2, -1, false).unwrap();

        let wire = map.serialize_content().unwrap();
        assert_eq!(&wire[4..8], &[0xFF, 0xFF, 0xFF, 0xFE]);
        assert_eq!(&wire[8..], &[0xFF; 8]);
    }

    #[test]
    fn string_and_lists_layout() {
        let mut map = FieldMap::new();
        map.set_string(1, "hi", false).unwrap();
        let wire = map.serialize_content().unwrap();
        assert_eq!(wire, vec![0, 0, 0, 2, 0, 0, 0, 1, 0, 0, 0, 2, b'h', b'i']);

        let mut map = FieldMap::new();
        map.set_int64_list(2, vec![5], false).unwrap();
        let wire = map.serialize_content().unwrap();
        assert_eq!(
            wire,
            vec![0, 0, 0, 3, 0, 0, 0, 2, 0, 0, 0, 1, 0, 0, 0, 5, 0, 0, 0, 0]
        );

        let mut map = FieldMap::new();
        map.set_string_list(3, ["a", "bc"], false).unwrap();
        let wire = map.serialize_content().unwrap();
        assert_eq!(
            wire,
            vec![
                0, 0, 0, 4, 0, 0, 0, 3, 0, 0, 0, 2, // header + count
                0, 0, 0, 1, b'a', // "a"
                0, 0, 0, 2, b'b', b'c', // "bc"
            ]
        );
    }

    #[test]
    fn empty_string_list_has_zero_count() {
        let mut map = FieldMap::new();
        map.set_string_list(4, Vec::<Vec<u8>>::new(), false).unwrap();
        let wire = map.serialize().unwrap();
        assert_eq!(wire, vec![0, 0, 0, 12, 0, 0, 0, 4, 0, 0, 0, 4, 0, 0, 0, 0]);
    }

    #[test]
    fn header_matches_payload_length() {
        let mut map = FieldMap::new();
        map.set_int64(1, 1, false).unwrap();
        map.set_string(2, "hello", false).unwrap();
        map.set_int64_list(3, vec![1, 2, 3], false).unwrap();
        map.set_string_list(4, ["a", "bb"], false).unwrap();

        let wire = map.serialize().unwrap();
        let declared = u32::from_be_bytes(wire[..4].try_into().unwrap()) as usize;
        assert_eq!(declared, wire.len() - HEADER_SIZE);
        assert_eq!(&wire[HEADER_SIZE..], map.serialize_content().unwrap());
    }

    #[test]
    fn sizing_pass_detects_overflow() {
        let mut counter = SizeCounter::starting_at(u32::MAX - 12);
        let value = FieldValue::Int64(1);
        let err = write_entry(&mut counter, 1, &value).unwrap_err();
        assert!(matches!(err, MapError::IntegerOverflow));
    }

    #[test]
    fn sizing_pass_detects_overflow_across_entries() {
        let mut counter = SizeCounter::starting_at(u32::MAX - 40);
        let value = FieldValue::String(vec![b'x'; 8]);
        write_entry(&mut counter, 1, &value).unwrap();
        write_entry(&mut counter, 2, &value).unwrap();
        let err = write_entry(&mut counter, 3, &value).unwrap_err();
        assert!(matches!(err, MapError::IntegerOverflow));
    }

    #[test]
    fn lengths_beyond_signed_range_overflow() {
        assert!(matches!(
            wire_len(i32::MAX as usize + 1),
            Err(MapError::IntegerOverflow)
        ));
        assert_eq!(wire_len(i32::MAX as usize).unwrap(), i32::MAX as u32);
    }
}
