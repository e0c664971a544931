//! Structured-format conversion.
//!
//! Each conversion parses its input into a tree and walks it once to emit
//! the target format:
//!
//! - `json_yaml` - JSON to block YAML, YAML to JSON
//! - `xml` - standalone XML reader and escaping helpers
//! - `xml_json` - XML element trees to JSON objects and back

mod json_yaml;
pub mod xml;
mod xml_json;

pub use json_yaml::{json_to_yaml, value_to_yaml, yaml_to_json};
pub use xml_json::{json_to_xml, xml_to_json};

use serde::Serialize;
use serde_json::Value;

use crate::defaults::ConvertDefaults;
use crate::error::{Error, Result, SourcePosition};

/// Conversion direction, one per converter page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    JsonToYaml,
    YamlToJson,
    XmlToJson,
    JsonToXml,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::JsonToYaml => "json-to-yaml",
            Direction::YamlToJson => "yaml-to-json",
            Direction::XmlToJson => "xml-to-json",
            Direction::JsonToXml => "json-to-xml",
        }
    }
}

/// Options shared by all converters. Each direction reads only what it
/// needs.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    pub yaml_indent: usize,
    pub json_indent: usize,
    pub xml_indent: usize,
    pub xml_declaration: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            yaml_indent: 2,
            json_indent: 2,
            xml_indent: 2,
            xml_declaration: true,
        }
    }
}

impl From<&ConvertDefaults> for ConvertOptions {
    fn from(defaults: &ConvertDefaults) -> Self {
        Self {
            yaml_indent: defaults.yaml_indent,
            json_indent: defaults.json_indent,
            xml_indent: defaults.xml_indent,
            xml_declaration: defaults.xml_declaration,
        }
    }
}

/// Run a conversion in the given direction.
pub fn convert(input: &str, direction: Direction, options: &ConvertOptions) -> Result<String> {
    match direction {
        Direction::JsonToYaml => json_to_yaml(input, options.yaml_indent),
        Direction::YamlToJson => yaml_to_json(input, options.json_indent),
        Direction::XmlToJson => xml_to_json(input, options.json_indent),
        Direction::JsonToXml => json_to_xml(input, options.xml_indent, options.xml_declaration),
    }
}

/// Parse JSON input, mapping failures to `input.parse_failed` with location.
pub(crate) fn parse_json(input: &str) -> Result<Value> {
    serde_json::from_str(input).map_err(|e| {
        Error::input_parse_failed(
            "json",
            e.to_string(),
            Some(SourcePosition {
                line: e.line(),
                column: e.column(),
            }),
        )
    })
}

/// Serialize a JSON value with `indent` spaces per level (0 = minified).
pub fn to_json_text(value: &Value, indent: usize) -> Result<String> {
    if indent == 0 {
        return serde_json::to_string(value)
            .map_err(|e| Error::internal_json(e.to_string(), Some("serialize json".to_string())));
    }

    let indent_str = " ".repeat(indent);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(indent_str.as_bytes());
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut serializer)
        .map_err(|e| Error::internal_json(e.to_string(), Some("serialize json".to_string())))?;

    String::from_utf8(buf)
        .map_err(|e| Error::internal_unexpected(format!("JSON output is not UTF-8: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_json_text_respects_indent() {
        let value = serde_json::json!({"a": [1, 2]});
        let text = to_json_text(&value, 4).unwrap();
        assert!(text.contains("\n    \"a\": [\n        1,"));
    }

    #[test]
    fn to_json_text_zero_indent_is_minified() {
        let value = serde_json::json!({"a": {"b": true}});
        assert_eq!(to_json_text(&value, 0).unwrap(), r#"{"a":{"b":true}}"#);
    }

    #[test]
    fn parse_json_reports_line_and_column() {
        let err = parse_json("{\n  \"a\": 1,\n  oops\n}").unwrap_err();
        assert_eq!(err.code.as_str(), "input.parse_failed");
        assert_eq!(err.details["line"], 3);
    }

    #[test]
    fn convert_dispatches_by_direction() {
        let options = ConvertOptions::default();
        let yaml = convert(r#"{"name":"demo"}"#, Direction::JsonToYaml, &options).unwrap();
        assert_eq!(yaml, "name: demo\n");
    }
}
