use serde_json::{Map, Number, Value};
use std::fmt::Write;

use super::{parse_json, to_json_text};
use crate::error::{Error, Result, SourcePosition};
use crate::utils::parser;

const MIN_YAML_INDENT: usize = 2;
const MAX_YAML_INDENT: usize = 8;
/// Implicit keys must end within 1024 characters of where they start.
const MAX_IMPLICIT_KEY_LEN: usize = 1024;

const RESERVED_WORDS: &[&str] = &[
    "true", "false", "null", "yes", "no", "on", "off", "y", "n", "~",
];

const INDICATORS: &[char] = &[
    '-', '?', ':', ',', '[', ']', '{', '}', '#', '&', '*', '!', '|', '>', '\'', '"', '%', '@',
    '`',
];

/// Convert JSON text to block-style YAML.
pub fn json_to_yaml(input: &str, indent: usize) -> Result<String> {
    if !(MIN_YAML_INDENT..=MAX_YAML_INDENT).contains(&indent) {
        return Err(Error::validation_invalid_argument(
            "indent",
            format!(
                "YAML indent must be between {} and {}",
                MIN_YAML_INDENT, MAX_YAML_INDENT
            ),
            Some(indent.to_string()),
            None,
        ));
    }

    let value = parse_json(input)?;
    Ok(value_to_yaml(&value, indent))
}

/// Render an already-parsed JSON value as YAML. Output ends with a newline.
pub fn value_to_yaml(value: &Value, indent: usize) -> String {
    let mut lines = Vec::new();
    emit_node(value, 0, indent, &mut lines);
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn emit_node(value: &Value, depth: usize, indent: usize, out: &mut Vec<String>) {
    let pad = " ".repeat(depth * indent);
    match value {
        Value::Object(map) if !map.is_empty() => {
            for (key, child) in map {
                let key = format_string(key);
                if key.len() >= MAX_IMPLICIT_KEY_LEN {
                    emit_explicit_entry(&key, child, &pad, depth, indent, out);
                } else if is_block(child) {
                    out.push(format!("{}{}:", pad, key));
                    emit_node(child, depth + 1, indent, out);
                } else {
                    out.push(format!("{}{}: {}", pad, key, format_scalar(child)));
                }
            }
        }
        Value::Array(items) if !items.is_empty() => {
            for item in items {
                emit_item(item, &pad, depth, indent, out);
            }
        }
        _ => out.push(format!("{}{}", pad, format_scalar(value))),
    }
}

/// `? key` / `: value` form for keys too long to be implicit.
fn emit_explicit_entry(
    key: &str,
    child: &Value,
    pad: &str,
    depth: usize,
    indent: usize,
    out: &mut Vec<String>,
) {
    out.push(format!("{}? {}", pad, key));
    if is_block(child) {
        out.push(format!("{}:", pad));
        emit_node(child, depth + 1, indent, out);
    } else {
        out.push(format!("{}: {}", pad, format_scalar(child)));
    }
}

fn emit_item(item: &Value, pad: &str, depth: usize, indent: usize, out: &mut Vec<String>) {
    if !is_block(item) {
        out.push(format!("{}- {}", pad, format_scalar(item)));
        return;
    }

    // Nested block is rendered one level deeper, then its first line is
    // pulled up onto the dash.
    let mut nested = Vec::new();
    emit_node(item, depth + 1, indent, &mut nested);
    let inner = (depth + 1) * indent;
    for (i, line) in nested.into_iter().enumerate() {
        if i == 0 {
            out.push(format!("{}-{}{}", pad, " ".repeat(indent - 1), &line[inner..]));
        } else {
            out.push(line);
        }
    }
}

fn is_block(value: &Value) -> bool {
    match value {
        Value::Object(map) => !map.is_empty(),
        Value::Array(items) => !items.is_empty(),
        _ => false,
    }
}

fn format_scalar(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => format_string(s),
        Value::Object(_) => "{}".to_string(),
        Value::Array(_) => "[]".to_string(),
    }
}

fn format_string(s: &str) -> String {
    if needs_quotes(s) {
        double_quoted(s)
    } else {
        s.to_string()
    }
}

/// YAML double-quoted scalar. Line separators and non-printable characters
/// are escaped so the parser cannot fold them.
fn double_quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{85}' => out.push_str("\\N"),
            '\u{2028}' => out.push_str("\\L"),
            '\u{2029}' => out.push_str("\\P"),
            c if c.is_control() || c == '\u{feff}' => {
                let _ = write!(out, "\\u{:04X}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn needs_quotes(s: &str) -> bool {
    let Some(first) = s.chars().next() else {
        return true;
    };

    if s.trim() != s {
        return true;
    }

    let lower = s.to_lowercase();
    if RESERVED_WORDS.contains(&lower.as_str()) {
        return true;
    }

    if looks_numeric(s) {
        return true;
    }

    if INDICATORS.contains(&first)
        || s.contains(": ")
        || s.contains(" #")
        || s.ends_with(':')
        || s.chars().any(|c| c.is_control() || matches!(c, '\u{2028}' | '\u{2029}' | '\u{feff}'))
    {
        return true;
    }

    !reads_back_as_itself(s)
}

fn looks_numeric(s: &str) -> bool {
    let lower = s.to_lowercase();
    s.parse::<f64>().is_ok()
        || lower.starts_with("0x")
        || lower.starts_with("0o")
        || lower.starts_with("0b")
        || matches!(lower.as_str(), ".inf" | "-.inf" | "+.inf" | ".nan")
}

/// Final check for a plain scalar: the YAML parser must resolve it to the
/// same string rather than a number, boolean, timestamp or structure.
fn reads_back_as_itself(s: &str) -> bool {
    matches!(
        serde_yml::from_str::<serde_yml::Value>(s),
        Ok(serde_yml::Value::String(parsed)) if parsed == s
    )
}

/// Convert YAML text to JSON with `indent` spaces per level (0 = minified).
pub fn yaml_to_json(input: &str, indent: usize) -> Result<String> {
    let yaml: serde_yml::Value = serde_yml::from_str(input).map_err(|e| {
        let message = e.to_string();
        Error::input_parse_failed("yaml", message.clone(), yaml_error_position(&message))
    })?;

    to_json_text(&yaml_to_value(yaml), indent)
}

/// Location is only exposed in the error text ("at line N column M").
fn yaml_error_position(message: &str) -> Option<SourcePosition> {
    Some(SourcePosition {
        line: parser::extract_number(message, r"line (\d+)")?,
        column: parser::extract_number(message, r"column (\d+)")?,
    })
}

fn yaml_to_value(yaml: serde_yml::Value) -> Value {
    match yaml {
        serde_yml::Value::Null => Value::Null,
        serde_yml::Value::Bool(b) => Value::Bool(b),
        serde_yml::Value::Number(n) => yaml_number(&n),
        serde_yml::Value::String(s) => Value::String(s),
        serde_yml::Value::Sequence(items) => {
            Value::Array(items.into_iter().map(yaml_to_value).collect())
        }
        serde_yml::Value::Mapping(mapping) => {
            let mut map = Map::new();
            for (key, value) in mapping {
                map.insert(yaml_key(&key), yaml_to_value(value));
            }
            Value::Object(map)
        }
        serde_yml::Value::Tagged(tagged) => yaml_to_value(tagged.value),
    }
}

fn yaml_number(n: &serde_yml::Number) -> Value {
    if let Some(i) = n.as_i64() {
        Value::Number(i.into())
    } else if let Some(u) = n.as_u64() {
        Value::Number(u.into())
    } else {
        n.as_f64()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

fn yaml_key(key: &serde_yml::Value) -> String {
    match key {
        serde_yml::Value::String(s) => s.clone(),
        serde_yml::Value::Null => "null".to_string(),
        serde_yml::Value::Bool(b) => b.to_string(),
        serde_yml::Value::Number(n) => n.to_string(),
        other => serde_yml::to_string(other)
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
    }
}
