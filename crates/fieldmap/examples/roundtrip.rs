//! Build a map, serialize it, decode it back and print the debug text.
//!
//! Run with `cargo run -p fieldmap --example roundtrip`.

use fieldmap::codec::{FieldNames, FormatConfig};
use fieldmap::{FieldMap, MapError};

fn main() -> Result<(), MapError> {
    let mut map = FieldMap::new();
    map.set_int64(1, 123, false)?;
    map.set_string(2, "hello", false)?;
    map.set_int64_list(3, vec![1, 2, 3, 4, 5], false)?;
    map.set_string_list(4, ["alpha", "beta"], false)?;

    let bytes = map.serialize()?;
    println!("serialized {} fields into {} bytes", map.len(), bytes.len());

    let decoded = FieldMap::deserialize(&bytes)?;
    assert_eq!(decoded, map);

    let names: FieldNames = [(1, "counter"), (2, "greeting"), (3, "samples"), (4, "tags")]
        .into_iter()
        .collect();
    let config = FormatConfig::default().with_max_elems(Some(3));
    print!("{}", decoded.to_text(&names, &config).text);

    let copy = decoded.deep_copy()?;
    println!("copy equal: {}", copy == decoded);
    Ok(())
}
