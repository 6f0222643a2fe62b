use fieldmap_codec::{FieldMap, FieldNames, FieldType, FormatConfig, MapError};

fn build_sample() -> FieldMap {
    let mut map = FieldMap::new();
    map.set_int64(1, 123, false).unwrap();
    map.set_string(2, "hello", false).unwrap();
    map.set_int64_list(3, vec![1, 2, 3], false).unwrap();
    map.set_string_list(4, ["a", "bb"], false).unwrap();
    map
}

#[test]
fn serialize_decode_and_render() {
    let map = build_sample();
    let wire = map.serialize().unwrap();
    let decoded = FieldMap::deserialize(&wire).unwrap();

    assert_eq!(decoded.field_ids(), vec![1, 2, 3, 4]);
    for id in decoded.field_ids() {
        assert_eq!(decoded.get_type(id), map.get_type(id));
    }
    assert_eq!(decoded.get_type(1), FieldType::Int64);
    assert_eq!(decoded.get_int64(1).unwrap(), 123);
    assert_eq!(decoded.get_string(2).unwrap(), b"hello");
    assert_eq!(decoded.get_int64_list(3).unwrap(), &[1, 2, 3]);
    assert_eq!(
        decoded.get_string_list(4).unwrap(),
        &[b"a".to_vec(), b"bb".to_vec()]
    );

    let rendered = decoded.to_text(&FieldNames::new(), &FormatConfig::default());
    assert!(!rendered.truncated);
    assert!(rendered.text.contains("123"));
    assert!(rendered.text.contains("\"hello\""));
    assert!(rendered.text.contains("1,2,3"));
    assert!(rendered.text.contains("\"a\",\"bb\""));
}

#[test]
fn copy_then_roundtrip_both() {
    let src = build_sample();
    let mut copy = src.deep_copy().unwrap();
    copy.set_string(2, "jello", true).unwrap();

    let src_again = FieldMap::deserialize(&src.serialize().unwrap()).unwrap();
    let copy_again = FieldMap::deserialize(&copy.serialize().unwrap()).unwrap();

    assert_eq!(src_again, build_sample());
    assert_eq!(copy_again.get_string(2).unwrap(), b"jello");
    assert_ne!(src_again, copy_again);
}

#[test]
fn decode_errors_leave_nothing_behind() {
    let mut wire = build_sample().serialize().unwrap();
    // Make the declared payload one byte longer than what follows.
    let declared = u32::from_be_bytes(wire[..4].try_into().unwrap()) + 1;
    wire[..4].copy_from_slice(&declared.to_be_bytes());

    let err = FieldMap::deserialize(&wire).unwrap_err();
    assert!(matches!(err, MapError::TruncatedData { .. }));
}
