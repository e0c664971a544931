use crate::error::{Error, Result};
use std::env;
use std::path::PathBuf;

/// Environment variable that points at an alternate config file.
pub const CONFIG_ENV: &str = "TEXTKIT_CONFIG";

/// Base textkit config directory (~/.config/textkit/ on Unix-like systems)
pub fn textkit() -> Result<PathBuf> {
    #[cfg(windows)]
    {
        let appdata = env::var("APPDATA").map_err(|_| {
            Error::internal_unexpected("APPDATA environment variable not set on Windows")
        })?;
        Ok(PathBuf::from(appdata).join("textkit"))
    }

    #[cfg(not(windows))]
    {
        let home = env::var("HOME").map_err(|_| {
            Error::internal_unexpected("HOME environment variable not set on Unix-like system")
        })?;
        Ok(PathBuf::from(home).join(".config").join("textkit"))
    }
}

/// Global textkit.json config file path (TEXTKIT_CONFIG wins when set)
pub fn textkit_json() -> Result<PathBuf> {
    match env::var_os(CONFIG_ENV) {
        Some(path) if !path.is_empty() => Ok(PathBuf::from(path)),
        _ => Ok(textkit()?.join("textkit.json")),
    }
}
