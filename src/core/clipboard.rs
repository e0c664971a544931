//! System clipboard delivery for `--copy`.

use crate::error::{Error, Result};

/// Replace the clipboard contents with `text`.
pub fn copy_text(text: &str) -> Result<()> {
    let mut clipboard =
        arboard::Clipboard::new().map_err(|e| Error::clipboard_unavailable(e.to_string()))?;
    clipboard
        .set_text(text.to_string())
        .map_err(|e| Error::clipboard_unavailable(e.to_string()))?;
    log_status!("copy", "Copied {} characters to clipboard", text.chars().count());
    Ok(())
}
