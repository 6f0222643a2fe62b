use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use fieldmap_codec::{render_value, FieldId, FieldMap, FieldNames, FieldValue, FormatConfig};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::warn;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct FieldOutput<'a> {
    id: FieldId,
    name: &'a str,
    #[serde(rename = "type")]
    field_type: &'static str,
    value: Value,
}

#[derive(Serialize)]
struct MapOutput<'a> {
    field_count: usize,
    fields: Vec<FieldOutput<'a>>,
}

pub fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

pub fn print_map(map: &FieldMap, names: &FieldNames, config: &FormatConfig, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let fields = map
                .field_ids()
                .into_iter()
                .filter_map(|id| map.get(id).map(|value| (id, value)))
                .map(|(id, value)| FieldOutput {
                    id,
                    name: names.get(id),
                    field_type: value.field_type().name(),
                    value: json_value(value),
                })
                .collect();
            print_json(&MapOutput {
                field_count: map.len(),
                fields,
            });
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["ID", "NAME", "TYPE", "VALUE"]);
            for id in map.field_ids() {
                if let Some(value) = map.get(id) {
                    table.add_row(vec![
                        id.to_string(),
                        names.get(id).to_string(),
                        value.field_type().name().to_string(),
                        render_value(value, config),
                    ]);
                }
            }
            println!("{table}");
        }
        OutputFormat::Pretty | OutputFormat::Raw => {
            let rendered = map.to_text(names, config);
            if rendered.truncated {
                warn!(max_size = config.max_size, "output truncated; raise --max-size");
                println!("{}", rendered.text);
            } else {
                print!("{}", rendered.text);
            }
        }
    }
}

fn json_value(value: &FieldValue) -> Value {
    match value {
        FieldValue::Int64(value) => json!(value),
        FieldValue::String(bytes) => json!(String::from_utf8_lossy(bytes)),
        FieldValue::Int64List(values) => json!(values),
        FieldValue::StringList(items) => Value::Array(
            items
                .iter()
                .map(|item| json!(String::from_utf8_lossy(item)))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_values_follow_field_type() {
        assert_eq!(json_value(&FieldValue::Int64(-1)), json!(-1));
        assert_eq!(json_value(&FieldValue::from("hi")), json!("hi"));
        assert_eq!(
            json_value(&FieldValue::Int64List(vec![1, 2])),
            json!([1, 2])
        );
        assert_eq!(
            json_value(&FieldValue::StringList(vec![b"a".to_vec(), b"bb".to_vec()])),
            json!(["a", "bb"])
        );
    }
}
