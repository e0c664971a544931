use clap::{Args, Subcommand};
use serde::Serialize;
use serde_json::Value;

use textkit::defaults::{self, Defaults, TextkitConfig};

use super::CmdResult;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Display configuration (merged defaults + file)
    Show {
        /// Show only built-in defaults (ignore textkit.json)
        #[arg(long)]
        builtin: bool,
    },
    /// Set a configuration value at a JSON pointer path
    Set {
        /// JSON pointer path (e.g., /defaults/convert/yaml_indent)
        pointer: String,
        /// Value to set (JSON)
        value: String,
    },
    /// Reset configuration to built-in defaults (deletes textkit.json)
    Reset,
    /// Show the path to textkit.json
    Path,
}

#[derive(Debug, Default, Serialize)]
pub struct ConfigOutput {
    command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    config: Option<TextkitConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    defaults: Option<Defaults>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    exists: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pointer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    deleted: Option<bool>,
}

pub fn run(args: ConfigArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<ConfigOutput> {
    match args.command {
        ConfigCommand::Show { builtin } => show(builtin),
        ConfigCommand::Set { pointer, value } => set(&pointer, &value),
        ConfigCommand::Reset => reset(),
        ConfigCommand::Path => path(),
    }
}

fn show(builtin: bool) -> CmdResult<ConfigOutput> {
    if builtin {
        return Ok((
            ConfigOutput {
                command: "config.show".to_string(),
                defaults: Some(defaults::builtin_defaults()),
                ..Default::default()
            },
            0,
        ));
    }

    // Unlike other commands, show surfaces a broken textkit.json.
    let loaded = defaults::try_load_config()?;
    Ok((
        ConfigOutput {
            command: "config.show".to_string(),
            exists: Some(loaded.is_some()),
            config: Some(loaded.unwrap_or_default()),
            path: Some(defaults::config_path()?),
            ..Default::default()
        },
        0,
    ))
}

fn set(pointer: &str, value_str: &str) -> CmdResult<ConfigOutput> {
    let value: Value = serde_json::from_str(value_str).map_err(|e| {
        textkit::Error::validation_invalid_json(
            e,
            Some("parse value".to_string()),
            Some(textkit::utils::parser::truncate_chars(value_str, 200)),
        )
    })?;

    let config = defaults::load_config();
    let mut config_json = serde_json::to_value(&config).map_err(|e| {
        textkit::Error::internal_json(e.to_string(), Some("serialize config".to_string()))
    })?;

    textkit::utils::json::set_pointer(&mut config_json, pointer, value.clone())?;

    let config: TextkitConfig = serde_json::from_value(config_json).map_err(|e| {
        textkit::Error::config_invalid_value(pointer, Some(value.to_string()), e.to_string())
    })?;

    defaults::save_config(&config)?;

    Ok((
        ConfigOutput {
            command: "config.set".to_string(),
            config: Some(config),
            pointer: Some(pointer.to_string()),
            value: Some(value),
            ..Default::default()
        },
        0,
    ))
}

fn reset() -> CmdResult<ConfigOutput> {
    let deleted = defaults::reset_config()?;

    Ok((
        ConfigOutput {
            command: "config.reset".to_string(),
            defaults: Some(defaults::builtin_defaults()),
            path: Some(defaults::config_path()?),
            deleted: Some(deleted),
            ..Default::default()
        },
        0,
    ))
}

fn path() -> CmdResult<ConfigOutput> {
    Ok((
        ConfigOutput {
            command: "config.path".to_string(),
            path: Some(defaults::config_path()?),
            exists: Some(defaults::config_exists()),
            ..Default::default()
        },
        0,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::use_config_file;
    use std::fs;

    #[test]
    fn show_reports_invalid_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("textkit.json");
        fs::write(&path, "{ not json").unwrap();
        let _config = use_config_file(&path);

        let err = show(false).unwrap_err();
        assert_eq!(err.code.as_str(), "config.invalid_json");
        assert_eq!(err.details["path"], path.display().to_string());
    }

    #[test]
    fn show_without_file_reports_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("textkit.json");
        let _config = use_config_file(&path);

        let (output, _) = show(false).unwrap();
        assert_eq!(output.exists, Some(false));
        assert_eq!(output.path, Some(path.display().to_string()));
        assert_eq!(output.config.unwrap().defaults.convert.yaml_indent, 2);
    }

    #[test]
    fn set_writes_then_reset_removes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("textkit.json");
        let _config = use_config_file(&path);

        set("/defaults/convert/yaml_indent", "4").unwrap();
        let (output, _) = show(false).unwrap();
        assert_eq!(output.exists, Some(true));
        assert_eq!(output.config.unwrap().defaults.convert.yaml_indent, 4);

        let err = set("/defaults/convert/yaml_indent", "\"wide\"").unwrap_err();
        assert_eq!(err.code.as_str(), "config.invalid_value");

        let (output, _) = reset().unwrap();
        assert_eq!(output.deleted, Some(true));
        assert!(!path.exists());
    }
}
