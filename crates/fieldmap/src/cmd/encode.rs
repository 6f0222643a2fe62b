use std::fs;

use fieldmap_codec::{FieldId, FieldMap, FieldValue, MapError};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::cmd::EncodeArgs;
use crate::exit::{io_error, map_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_json, OutputFormat};

/// One field of an encode field list.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldDef {
    Int64 { id: FieldId, value: i64 },
    String { id: FieldId, value: String },
    Int64List { id: FieldId, value: Vec<i64> },
    StringList { id: FieldId, value: Vec<String> },
}

impl FieldDef {
    fn into_entry(self) -> (FieldId, FieldValue) {
        match self {
            FieldDef::Int64 { id, value } => (id, FieldValue::Int64(value)),
            FieldDef::String { id, value } => (id, FieldValue::String(value.into_bytes())),
            FieldDef::Int64List { id, value } => (id, FieldValue::Int64List(value)),
            FieldDef::StringList { id, value } => (
                id,
                FieldValue::StringList(value.into_iter().map(String::into_bytes).collect()),
            ),
        }
    }
}

#[derive(Serialize)]
struct EncodeOutput<'a> {
    output: &'a str,
    fields: usize,
    bytes: usize,
    header: bool,
}

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let text = fs::read_to_string(&args.input).map_err(|err| {
        io_error(&format!("failed reading {}", args.input.display()), err)
    })?;
    let fields: Vec<FieldDef> = serde_json::from_str(&text).map_err(|err| {
        CliError::new(USAGE, format!("{} is not a valid field list: {err}", args.input.display()))
    })?;

    let map = build_map(fields).map_err(|err| map_error("invalid field list", err))?;
    let bytes = if args.content {
        map.serialize_content()
    } else {
        map.serialize()
    }
    .map_err(|err| map_error("encode failed", err))?;
    debug!(fields = map.len(), bytes = bytes.len(), "encoded map");

    fs::write(&args.output, &bytes).map_err(|err| {
        io_error(&format!("failed writing {}", args.output.display()), err)
    })?;
    info!(path = %args.output.display(), bytes = bytes.len(), "wrote serialized map");

    let output = args.output.display().to_string();
    let out = EncodeOutput {
        output: &output,
        fields: map.len(),
        bytes: bytes.len(),
        header: !args.content,
    };
    match format {
        OutputFormat::Json => print_json(&out),
        OutputFormat::Table | OutputFormat::Pretty => {
            println!("wrote {} fields ({} bytes) to {}", out.fields, out.bytes, out.output);
        }
        OutputFormat::Raw => println!("{}", out.bytes),
    }
    Ok(SUCCESS)
}

/// Build a map from field definitions. Repeated ids are rejected.
pub fn build_map(fields: Vec<FieldDef>) -> Result<FieldMap, MapError> {
    let mut map = FieldMap::with_capacity(fields.len());
    for field in fields {
        let (id, value) = field.into_entry();
        map.set(id, value, false)?;
    }
    Ok(map)
}
