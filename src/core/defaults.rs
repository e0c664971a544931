use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::paths;
use crate::utils::io;

/// Root configuration structure for textkit.json
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TextkitConfig {
    #[serde(default)]
    pub defaults: Defaults,
}

/// All configurable defaults that can be overridden via textkit.json
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Defaults {
    #[serde(default)]
    pub convert: ConvertDefaults,

    #[serde(default)]
    pub audit: AuditDefaults,
}

/// Output formatting for the converters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertDefaults {
    #[serde(default = "default_indent")]
    pub yaml_indent: usize,

    #[serde(default = "default_indent")]
    pub json_indent: usize,

    #[serde(default = "default_indent")]
    pub xml_indent: usize,

    #[serde(default = "default_true")]
    pub xml_declaration: bool,
}

impl Default for ConvertDefaults {
    fn default() -> Self {
        Self {
            yaml_indent: default_indent(),
            json_indent: default_indent(),
            xml_indent: default_indent(),
            xml_declaration: default_true(),
        }
    }
}

/// A forbidden term added on top of the built-in rule table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TermConfig {
    pub term: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// Terminology audit scope and rule overrides, keyed by tool type slug
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditDefaults {
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    #[serde(default = "default_exclude_dirs")]
    pub exclude_dirs: Vec<String>,

    #[serde(default)]
    pub extra_terms: BTreeMap<String, Vec<TermConfig>>,

    #[serde(default)]
    pub allowed_terms: BTreeMap<String, Vec<String>>,
}

impl Default for AuditDefaults {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            exclude_dirs: default_exclude_dirs(),
            extra_terms: BTreeMap::new(),
            allowed_terms: BTreeMap::new(),
        }
    }
}

fn default_indent() -> usize {
    2
}

fn default_true() -> bool {
    true
}

fn default_extensions() -> Vec<String> {
    ["html", "htm", "js", "jsx", "ts", "tsx", "vue", "svelte", "md"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_exclude_dirs() -> Vec<String> {
    ["node_modules", ".git", "dist", "build", "vendor"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

// =============================================================================
// Loading functions
// =============================================================================

/// Load defaults, merging file config with built-in defaults.
/// If textkit.json is missing or invalid, silently returns built-in defaults.
pub fn load_defaults() -> Defaults {
    load_config().defaults
}

/// Load the full textkit.json config, falling back to defaults on any error.
pub fn load_config() -> TextkitConfig {
    try_load_config().ok().flatten().unwrap_or_default()
}

/// Load textkit.json, surfacing read/parse errors. `Ok(None)` when the
/// file does not exist.
pub fn try_load_config() -> crate::Result<Option<TextkitConfig>> {
    let path = paths::textkit_json()?;
    if !path.exists() {
        return Ok(None);
    }
    load_config_from_path(&path).map(Some)
}

pub fn load_config_from_path(path: &Path) -> crate::Result<TextkitConfig> {
    let content = io::read_file(path, &format!("read {}", path.display()))?;
    serde_json::from_str(&content)
        .map_err(|e| crate::Error::config_invalid_json(path.display().to_string(), e))
}

/// Save config to textkit.json (creates the directory if missing).
pub fn save_config(config: &TextkitConfig) -> crate::Result<()> {
    let path = paths::textkit_json()?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            crate::Error::internal_io(e.to_string(), Some(format!("create {}", parent.display())))
        })?;
    }

    let content = serde_json::to_string_pretty(config).map_err(|e| {
        crate::Error::internal_json(e.to_string(), Some("serialize config".to_string()))
    })?;

    io::write_file_atomic(&path, content.as_bytes(), "write textkit.json")
}

pub fn config_exists() -> bool {
    paths::textkit_json().map(|p| p.exists()).unwrap_or(false)
}

/// Delete textkit.json. Returns whether a file was removed.
pub fn reset_config() -> crate::Result<bool> {
    let path = paths::textkit_json()?;
    if !path.exists() {
        return Ok(false);
    }
    fs::remove_file(&path).map_err(|e| {
        crate::Error::internal_io(e.to_string(), Some(format!("remove {}", path.display())))
    })?;
    Ok(true)
}

pub fn config_path() -> crate::Result<String> {
    Ok(paths::textkit_json()?.display().to_string())
}

pub fn builtin_defaults() -> Defaults {
    Defaults::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_uses_builtin_defaults() {
        let config: TextkitConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.defaults.convert.yaml_indent, 2);
        assert!(config.defaults.convert.xml_declaration);
        assert!(config.defaults.audit.extensions.contains(&"html".to_string()));
        assert!(config.defaults.audit.exclude_dirs.contains(&"node_modules".to_string()));
    }

    #[test]
    fn partial_override_keeps_other_fields() {
        let config: TextkitConfig = serde_json::from_str(
            r#"{"defaults":{"convert":{"yaml_indent":4},"audit":{"extra_terms":{"url-encode":[{"term":"hex dump"}]}}}}"#,
        )
        .unwrap();

        assert_eq!(config.defaults.convert.yaml_indent, 4);
        assert_eq!(config.defaults.convert.json_indent, 2);
        assert_eq!(
            config.defaults.audit.extra_terms["url-encode"][0],
            TermConfig {
                term: "hex dump".to_string(),
                suggestion: None
            }
        );
        assert_eq!(config.defaults.audit.extensions.len(), 9);
    }

    #[test]
    fn load_from_path_reports_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("textkit.json");
        fs::write(&path, "{ not json").unwrap();

        let err = load_config_from_path(&path).unwrap_err();
        assert_eq!(err.code.as_str(), "config.invalid_json");
    }
}
