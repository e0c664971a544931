use serde_json::{Map, Value};

use super::xml::{self, XmlElement};
use super::{parse_json, to_json_text};
use crate::error::{Error, Result};
use crate::utils::parser;

const ATTRIBUTES_KEY: &str = "@attributes";
const TEXT_KEY: &str = "#text";
const WRAPPER_ROOT: &str = "root";
const ARRAY_ITEM: &str = "item";

/// Convert an XML document to JSON: `{ rootName: value }`.
pub fn xml_to_json(input: &str, indent: usize) -> Result<String> {
    let root = xml::parse(input)?;
    let mut map = Map::new();
    map.insert(root.name.clone(), element_to_value(&root));
    to_json_text(&Value::Object(map), indent)
}

fn element_to_value(element: &XmlElement) -> Value {
    let text = element.text();
    let text = text.trim();
    let mut children = element.child_elements().peekable();

    if element.attributes.is_empty() && children.peek().is_none() {
        return Value::String(text.to_string());
    }

    let mut map = Map::new();

    if !element.attributes.is_empty() {
        let attrs: Map<String, Value> = element
            .attributes
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        map.insert(ATTRIBUTES_KEY.to_string(), Value::Object(attrs));
    }

    for child in children {
        let value = element_to_value(child);
        match map.get_mut(&child.name) {
            // element_to_value never yields an array, so an existing array
            // means the name already repeated.
            Some(Value::Array(items)) => items.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                map.insert(child.name.clone(), value);
            }
        }
    }

    if !text.is_empty() {
        map.insert(TEXT_KEY.to_string(), Value::String(text.to_string()));
    }

    Value::Object(map)
}

/// Convert JSON to an XML document.
pub fn json_to_xml(input: &str, indent: usize, declaration: bool) -> Result<String> {
    let value = parse_json(input)?;
    let (root_name, root_value) = pick_root(value);

    let mut out = String::new();
    if declaration {
        out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    }
    write_element(&mut out, &root_name, &root_value, 0, indent)?;
    Ok(out)
}

fn pick_root(value: Value) -> (String, Value) {
    match value {
        Value::Object(mut map) if map.len() == 1 => {
            let single_key = map
                .iter()
                .next()
                .filter(|(k, v)| !is_special_key(k) && !v.is_array())
                .map(|(k, _)| k.clone());
            match single_key {
                Some(key) => {
                    let inner = map.remove(&key).unwrap_or(Value::Null);
                    (xml::sanitize_name(&key), inner)
                }
                None => (WRAPPER_ROOT.to_string(), Value::Object(map)),
            }
        }
        Value::Array(items) => {
            let mut map = Map::new();
            map.insert(ARRAY_ITEM.to_string(), Value::Array(items));
            (WRAPPER_ROOT.to_string(), Value::Object(map))
        }
        other => (WRAPPER_ROOT.to_string(), other),
    }
}

fn is_special_key(key: &str) -> bool {
    key == ATTRIBUTES_KEY || key == TEXT_KEY
}

fn write_element(
    out: &mut String,
    name: &str,
    value: &Value,
    depth: usize,
    indent: usize,
) -> Result<()> {
    let pad = " ".repeat(depth * indent);

    match value {
        Value::Array(items) => {
            for item in items {
                write_element(out, name, item, depth, indent)?;
            }
        }
        Value::Null => {
            out.push_str(&format!("{}<{}/>\n", pad, name));
        }
        Value::Object(map) => {
            let attrs = render_attributes(map.get(ATTRIBUTES_KEY))?;
            let text = map.get(TEXT_KEY).map(scalar_text);
            let children: Vec<(&String, &Value)> =
                map.iter().filter(|(k, _)| !is_special_key(k)).collect();

            if children.is_empty() {
                match text {
                    Some(text) => out.push_str(&format!(
                        "{}<{}{}>{}</{}>\n",
                        pad,
                        name,
                        attrs,
                        xml::escape_text(&text),
                        name
                    )),
                    None => out.push_str(&format!("{}<{}{}/>\n", pad, name, attrs)),
                }
                return Ok(());
            }

            out.push_str(&format!("{}<{}{}>\n", pad, name, attrs));
            if let Some(text) = text {
                let inner_pad = " ".repeat((depth + 1) * indent);
                out.push_str(&format!("{}{}\n", inner_pad, xml::escape_text(&text)));
            }
            for (key, child) in children {
                write_element(out, &xml::sanitize_name(key), child, depth + 1, indent)?;
            }
            out.push_str(&format!("{}</{}>\n", pad, name));
        }
        scalar => {
            out.push_str(&format!(
                "{}<{}>{}</{}>\n",
                pad,
                name,
                xml::escape_text(&scalar_text(scalar)),
                name
            ));
        }
    }
    Ok(())
}

/// Attribute names that collide after sanitizing get a numeric suffix.
fn render_attributes(attrs: Option<&Value>) -> Result<String> {
    let attrs = match attrs {
        None => return Ok(String::new()),
        Some(Value::Object(attrs)) => attrs,
        Some(other) => {
            return Err(Error::validation_invalid_argument(
                ATTRIBUTES_KEY,
                "\"@attributes\" must be an object of name/value pairs",
                Some(parser::truncate_chars(&other.to_string(), 200)),
                None,
            ))
        }
    };

    let mut used: Vec<String> = Vec::with_capacity(attrs.len());
    let mut out = String::new();
    for (key, value) in attrs {
        let base = xml::sanitize_name(key);
        let mut name = base.clone();
        let mut n = 2;
        while used.contains(&name) {
            name = format!("{}_{}", base, n);
            n += 1;
        }
        out.push_str(&format!(" {}=\"{}\"", name, xml::escape_attr(&scalar_text(value))));
        used.push(name);
    }
    Ok(out)
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}
