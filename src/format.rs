//! Plain-text renderers for command output. Nothing here prints or fails.

use serde_json::Value;
use unicode_width::UnicodeWidthStr;

pub const NO_DATA: &str = "No data to display";

const SENSITIVE_KEYS: &[&str] = &["apikey", "api_key", "token", "password", "secret"];

/// Render an array of JSON objects as a box-drawn table. Headers come from
/// the first row's keys, in order.
pub fn format_table(rows: &[Value]) -> String {
    let headers: Vec<&str> = match rows.first().and_then(Value::as_object) {
        Some(first) => first.keys().map(String::as_str).collect(),
        None => return NO_DATA.to_string(),
    };
    if headers.is_empty() {
        return NO_DATA.to_string();
    }

    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            headers
                .iter()
                .map(|h| row.get(*h).map(cell_text).unwrap_or_default())
                .collect()
        })
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            cells
                .iter()
                .map(|r| r[i].width())
                .chain(std::iter::once(h.width()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    out.push_str(&border('┌', '┬', '┐', &widths));
    out.push_str(&table_row(&headers, &widths));
    out.push_str(&border('├', '┼', '┤', &widths));
    for row in &cells {
        let row: Vec<&str> = row.iter().map(String::as_str).collect();
        out.push_str(&table_row(&row, &widths));
    }
    out.push_str(&border('└', '┴', '┘', &widths));
    out
}

/// Pretty-printed JSON with two-space indentation.
pub fn format_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// `key: value` lines for an object; anything else renders as plain text.
pub fn format_key_value(value: &Value) -> String {
    match value {
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| {
                let v = match v {
                    Value::Object(_) | Value::Array(_) => v.to_string(),
                    other => cell_text(other),
                };
                format!("{}: {}\n", k, v)
            })
            .collect(),
        other => cell_text(other),
    }
}

/// Hide all but the last four characters of values stored under sensitive
/// keys. Empty values render as `(not set)`.
pub fn mask_sensitive(key: &str, value: &str) -> String {
    if value.is_empty() {
        return "(not set)".to_string();
    }
    let key = key.to_lowercase();
    if SENSITIVE_KEYS.iter().any(|k| key.contains(k)) {
        let tail: String = {
            let chars: Vec<char> = value.chars().collect();
            chars[chars.len().saturating_sub(4)..].iter().collect()
        };
        return format!("***{}", tail);
    }
    value.to_string()
}

/// Text for a single value: strings unquoted, null empty, the rest as JSON.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn border(left: char, mid: char, right: char, widths: &[usize]) -> String {
    let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
    format!("{}{}{}\n", left, segments.join(&mid.to_string()), right)
}

fn table_row(cells: &[&str], widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(c, w)| format!(" {}{} ", c, " ".repeat(w.saturating_sub(c.width()))))
        .collect();
    format!("│{}│\n", padded.join("│"))
}
