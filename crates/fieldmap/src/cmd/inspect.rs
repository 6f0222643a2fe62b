use std::collections::HashMap;
use std::fs;
use std::path::Path;

use fieldmap_codec::{FieldId, FieldMap, FieldNames, FormatConfig};
use tracing::debug;

use crate::cmd::InspectArgs;
use crate::exit::{io_error, map_error, CliError, CliResult, DATA_INVALID, SUCCESS, USAGE};
use crate::output::{print_map, OutputFormat};

pub fn run(args: InspectArgs, format: OutputFormat) -> CliResult<i32> {
    let bytes = read_input(&args.path, args.max_input)?;
    let map = if args.content {
        FieldMap::deserialize_content(&bytes)
    } else {
        FieldMap::deserialize(&bytes)
    }
    .map_err(|err| map_error(&format!("failed decoding {}", args.path.display()), err))?;
    debug!(fields = map.len(), bytes = bytes.len(), "decoded map");

    let names = match &args.names {
        Some(path) => load_names(path)?,
        None => FieldNames::new(),
    };
    let config = FormatConfig::default()
        .with_max_elems(args.max_elems)
        .with_max_str_len(args.max_str_len)
        .with_max_size(args.max_size);

    print_map(&map, &names, &config, format);
    Ok(SUCCESS)
}

fn read_input(path: &Path, max_input: u64) -> CliResult<Vec<u8>> {
    let context = format!("failed reading {}", path.display());
    let metadata = fs::metadata(path).map_err(|err| io_error(&context, err))?;
    if metadata.len() > max_input {
        return Err(CliError::new(
            DATA_INVALID,
            format!(
                "{} is too large ({} bytes, max {max_input})",
                path.display(),
                metadata.len()
            ),
        ));
    }
    fs::read(path).map_err(|err| io_error(&context, err))
}

/// Load a JSON object such as `{"1": "counter", "2": "greeting"}`.
fn load_names(path: &Path) -> CliResult<FieldNames> {
    let text = fs::read_to_string(path)
        .map_err(|err| io_error(&format!("failed reading {}", path.display()), err))?;
    parse_names(&text).map_err(|err| {
        CliError::new(
            USAGE,
            format!("{} is not a valid name table: {err}", path.display()),
        )
    })
}

fn parse_names(text: &str) -> Result<FieldNames, serde_json::Error> {
    let names: HashMap<FieldId, String> = serde_json::from_str(text)?;
    Ok(FieldNames::from(names))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_name_table() {
        let names = parse_names(r#"{"1": "counter", "-2": "negative"}"#).unwrap();
        assert_eq!(names.get(1), "counter");
        assert_eq!(names.get(-2), "negative");
        assert_eq!(names.get(3), "");
    }

    #[test]
    fn rejects_non_numeric_ids() {
        assert!(parse_names(r#"{"one": "counter"}"#).is_err());
    }
}
