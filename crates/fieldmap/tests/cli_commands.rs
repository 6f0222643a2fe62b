#![cfg(feature = "cli")]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "fieldmap-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

fn fieldmap(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_fieldmap"))
        .arg("--log-level")
        .arg("error")
        .args(args)
        .output()
        .expect("fieldmap should run")
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("temp path should be utf-8")
}

fn write_field_list(dir: &Path) -> PathBuf {
    let fields = dir.join("fields.json");
    std::fs::write(
        &fields,
        r#"[
            {"id": 1, "type": "int64", "value": 123},
            {"id": 2, "type": "string", "value": "hello"},
            {"id": 3, "type": "int64_list", "value": [1, 2, 3]},
            {"id": 4, "type": "string_list", "value": ["a", "bb"]}
        ]"#,
    )
    .expect("field list should be writable");
    fields
}

#[test]
fn encode_then_inspect_as_json() {
    let dir = unique_temp_dir("json");
    let fields = write_field_list(&dir);
    let bin = dir.join("map.bin");

    let output = fieldmap(&[
        "--format",
        "json",
        "encode",
        path_str(&fields),
        "-o",
        path_str(&bin),
    ]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"fields\":4"));
    assert!(stdout.contains("\"header\":true"));

    let bytes = std::fs::read(&bin).expect("encoded map should exist");
    let declared = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    assert_eq!(declared as usize, bytes.len() - 4);

    let output = fieldmap(&["--format", "json", "inspect", path_str(&bin)]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"field_count\":4"));
    assert!(stdout.contains("\"type\":\"STRING\",\"value\":\"hello\""));
    assert!(stdout.contains("\"value\":[1,2,3]"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn inspect_pretty_uses_name_table_and_limits() {
    let dir = unique_temp_dir("pretty");
    let fields = write_field_list(&dir);
    let bin = dir.join("map.bin");
    let names = dir.join("names.json");
    std::fs::write(&names, r#"{"1": "counter", "3": "samples"}"#).expect("names writable");

    let output = fieldmap(&[
        "--format",
        "json",
        "encode",
        path_str(&fields),
        "-o",
        path_str(&bin),
        "--content",
    ]);
    assert!(output.status.success());

    let output = fieldmap(&[
        "--format",
        "pretty",
        "inspect",
        path_str(&bin),
        "--content",
        "--names",
        path_str(&names),
        "--max-elems",
        "2",
    ]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("id=1 name=counter type=INT64\n  [123]\n"));
    assert!(stdout.contains("id=3 name=samples type=INT64_LIST\n  [1,2,...]\n"));
    assert!(stdout.contains("id=2 name= type=STRING\n  [\"hello\"]\n"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn truncated_input_returns_60() {
    let dir = unique_temp_dir("truncated");
    let fields = write_field_list(&dir);
    let bin = dir.join("map.bin");

    let output = fieldmap(&["encode", path_str(&fields), "-o", path_str(&bin)]);
    assert!(output.status.success());

    let bytes = std::fs::read(&bin).expect("encoded map should exist");
    std::fs::write(&bin, &bytes[..bytes.len() - 3]).expect("truncate should work");

    let output = fieldmap(&["inspect", path_str(&bin)]);
    assert_eq!(output.status.code(), Some(60));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("truncated data"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn oversized_input_returns_60() {
    let dir = unique_temp_dir("oversized");
    let fields = write_field_list(&dir);
    let bin = dir.join("map.bin");

    let output = fieldmap(&["encode", path_str(&fields), "-o", path_str(&bin)]);
    assert!(output.status.success());

    let output = fieldmap(&["inspect", path_str(&bin), "--max-input", "8"]);
    assert_eq!(output.status.code(), Some(60));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn duplicate_field_ids_return_64() {
    let dir = unique_temp_dir("dup");
    let fields = dir.join("fields.json");
    std::fs::write(
        &fields,
        r#"[{"id": 7, "type": "int64", "value": 1}, {"id": 7, "type": "string", "value": "x"}]"#,
    )
    .expect("field list should be writable");

    let output = fieldmap(&["encode", path_str(&fields), "-o", path_str(&dir.join("out.bin"))]);
    assert_eq!(output.status.code(), Some(64));
    assert!(!dir.join("out.bin").exists());

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn missing_input_returns_1() {
    let dir = unique_temp_dir("missing");
    let output = fieldmap(&["inspect", path_str(&dir.join("absent.bin"))]);
    assert_eq!(output.status.code(), Some(1));
    let _ = std::fs::remove_dir_all(&dir);
}
