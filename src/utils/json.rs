//! JSON pointer writes for `config set`.

use crate::error::{Error, Result};
use serde_json::{Map, Value};

/// Set `new_value` at an RFC 6901 `pointer`, creating intermediate objects.
/// An empty pointer replaces the whole document.
pub fn set_pointer(root: &mut Value, pointer: &str, new_value: Value) -> Result<()> {
    if pointer.is_empty() {
        *root = new_value;
        return Ok(());
    }

    if pointer == "/" || !pointer.starts_with('/') {
        return Err(Error::validation_invalid_argument(
            "pointer",
            format!("JSON pointer must start with '/' and name a key: {}", pointer),
            None,
            None,
        ));
    }

    let tokens: Vec<String> = pointer.split('/').skip(1).map(unescape_token).collect();
    let Some((last, parents)) = tokens.split_last() else {
        *root = new_value;
        return Ok(());
    };

    let mut current = root;
    for token in parents {
        if current.is_null() {
            *current = Value::Object(Map::new());
        }
        current = match current {
            Value::Object(map) => map
                .entry(token.clone())
                .or_insert_with(|| Value::Object(Map::new())),
            Value::Array(items) => {
                let index = parse_index(token, items.len())?;
                &mut items[index]
            }
            other => return Err(not_a_container(pointer, other)),
        };
    }

    match current {
        Value::Object(map) => {
            map.insert(last.clone(), new_value);
            Ok(())
        }
        Value::Array(items) => {
            let index = parse_index(last, items.len())?;
            items[index] = new_value;
            Ok(())
        }
        other => Err(not_a_container(pointer, other)),
    }
}

fn parse_index(token: &str, len: usize) -> Result<usize> {
    match token.parse::<usize>() {
        Ok(index) if index < len => Ok(index),
        _ => Err(Error::validation_invalid_argument(
            "pointer",
            format!("Array index '{}' is invalid or out of bounds", token),
            None,
            None,
        )),
    }
}

fn not_a_container(pointer: &str, value: &Value) -> Error {
    Error::config_invalid_value(
        pointer,
        Some(type_name(value).to_string()),
        "Expected object or array at pointer",
    )
}

fn unescape_token(token: &str) -> String {
    token.replace("~1", "/").replace("~0", "~")
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn creates_missing_objects() {
        let mut doc = json!({});
        set_pointer(&mut doc, "/defaults/convert/yaml_indent", json!(4)).unwrap();
        assert_eq!(doc, json!({"defaults": {"convert": {"yaml_indent": 4}}}));
    }

    #[test]
    fn replaces_array_element() {
        let mut doc = json!({"list": ["a", "b"]});
        set_pointer(&mut doc, "/list/1", json!("c")).unwrap();
        assert_eq!(doc["list"], json!(["a", "c"]));
        assert!(set_pointer(&mut doc, "/list/5", json!("x")).is_err());
    }

    #[test]
    fn escaped_tokens_are_decoded() {
        let mut doc = json!({});
        set_pointer(&mut doc, "/a~1b", json!(true)).unwrap();
        assert_eq!(doc["a/b"], json!(true));
    }

    #[test]
    fn rejects_relative_pointer_and_scalars() {
        let mut doc = json!({"n": 1});
        assert_eq!(
            set_pointer(&mut doc, "n", json!(2)).unwrap_err().code.as_str(),
            "validation.invalid_argument"
        );
        assert_eq!(
            set_pointer(&mut doc, "/n/x", json!(2)).unwrap_err().code.as_str(),
            "config.invalid_value"
        );
    }
}
