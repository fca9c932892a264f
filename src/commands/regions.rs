use crate::api::ApiClient;
use crate::cli::{OutputFormat, RegionsCommands};
use crate::error::{Error, Result};
use crate::format::{format_json, format_table};
use crate::ui;
use serde_json::{json, Map, Value};

const NOT_AVAILABLE: &str = "N/A";

pub fn run(api: &ApiClient, cmd: RegionsCommands) -> anyhow::Result<()> {
    match cmd {
        RegionsCommands::List {
            format,
            limit,
            filter,
        } => list(api, format, limit, filter.as_deref()),
        RegionsCommands::Get { id, format } => get(api, &id, format),
    }
}

fn list(
    api: &ApiClient,
    format: OutputFormat,
    limit: Option<u32>,
    filter: Option<&str>,
) -> anyhow::Result<()> {
    let params = query_params(limit, filter)?;

    let spinner = ui::spinner("Fetching regions...");
    let data = match api.get_regions(&params) {
        Ok(data) => {
            ui::spinner_success(&spinner, "Regions fetched successfully");
            data
        }
        Err(e) => {
            ui::spinner_failure(&spinner, "Failed to fetch regions");
            return Err(e.into());
        }
    };

    print!("{}", render_list(&data, format));
    Ok(())
}

fn get(api: &ApiClient, id: &str, format: OutputFormat) -> anyhow::Result<()> {
    let spinner = ui::spinner(format!("Fetching region {}...", id));
    let data = match api.get_region_by_id(id) {
        Ok(data) => {
            ui::spinner_success(&spinner, format!("Region {} fetched successfully", id));
            data
        }
        Err(e) => {
            ui::spinner_failure(&spinner, format!("Failed to fetch region {}", id));
            return Err(e.into());
        }
    };

    print!("{}", render_item(&data, format));
    Ok(())
}

/// Query string for `regions list`. A filter must look like `field:value`;
/// everything after the first colon is the value.
pub fn query_params(limit: Option<u32>, filter: Option<&str>) -> Result<Vec<(String, String)>> {
    let mut params = Vec::new();
    if let Some(limit) = limit {
        params.push(("limit".to_string(), limit.to_string()));
    }
    if let Some(filter) = filter {
        match filter.split_once(':') {
            Some((field, value)) if !field.is_empty() => {
                params.push((field.to_string(), value.to_string()));
            }
            _ => {
                return Err(Error::InvalidArgument(format!(
                    "Invalid filter \"{}\", expected field:value (e.g. status:active)",
                    filter
                )))
            }
        }
    }
    Ok(params)
}

pub fn render_list(data: &Value, format: OutputFormat) -> String {
    if format == OutputFormat::Json {
        return format!("{}\n", format_json(data));
    }

    let regions = unwrap_list(data);
    if regions.is_empty() {
        return "\nNo regions found.\n\n".to_string();
    }
    let rows: Vec<Value> = regions.iter().map(region_row).collect();
    format!(
        "\n{}\nTotal: {} region(s)\n\n",
        format_table(&rows),
        regions.len()
    )
}

pub fn render_item(data: &Value, format: OutputFormat) -> String {
    if format == OutputFormat::Json {
        return format!("{}\n", format_json(data));
    }

    let region = data
        .get("data")
        .or_else(|| data.get("region"))
        .filter(|v| !v.is_null())
        .unwrap_or(data);
    let rows: Vec<Value> = match region.as_object() {
        Some(map) => map
            .iter()
            .map(|(k, v)| {
                let value = match v {
                    Value::Object(_) | Value::Array(_) => Value::String(v.to_string()),
                    other => other.clone(),
                };
                json!({ "Field": k, "Value": value })
            })
            .collect(),
        None => Vec::new(),
    };
    format!("\n{}\n", format_table(&rows))
}

/// The API wraps lists as `{ data: [...] }`; older responses use
/// `regions` or a bare array.
fn unwrap_list(data: &Value) -> Vec<Value> {
    if let Some(items) = data.as_array() {
        return items.clone();
    }
    ["data", "regions"]
        .iter()
        .find_map(|k| data.get(*k).and_then(Value::as_array))
        .cloned()
        .unwrap_or_default()
}

fn region_row(region: &Value) -> Value {
    let mut row = Map::new();
    for (label, key) in [("ID", "id"), ("Name", "name"), ("Title", "title"), ("Code", "code")] {
        let value = match region.get(key) {
            None | Some(Value::Null) => Value::String(NOT_AVAILABLE.to_string()),
            Some(Value::String(s)) if s.is_empty() => Value::String(NOT_AVAILABLE.to_string()),
            Some(v) => v.clone(),
        };
        row.insert(label.to_string(), value);
    }
    Value::Object(row)
}
