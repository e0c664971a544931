//! Terminology audit for tool pages.
//!
//! Scans page sources for wording that belongs to a different tool,
//! usually left behind when one page is cloned into another. Works by:
//!
//! 1. Resolving the page's tool type (explicit, file name, or parent dir)
//! 2. Looking up that tool's forbidden terms (built-in table + config)
//! 3. Scanning the text line by line for each term
//! 4. Summarizing issues per file or across a directory tree

mod batch;
pub mod report;
mod rules;
mod scanner;
mod tool;

use serde::Serialize;
use std::path::Path;

pub use batch::{audit_dir, BatchAudit, BatchOptions, BatchSummary, FileError, TermCount};
pub use rules::{builtin_terms, ForbiddenTerm, RuleSet};
pub use scanner::{scan_text, TermIssue};
pub use tool::ToolType;

use crate::error::{Error, Result};
use crate::utils::io;

/// Result of auditing a single page.
#[derive(Debug, Clone, Serialize)]
pub struct FileAudit {
    pub path: String,
    pub tool: ToolType,
    pub issue_count: usize,
    pub issues: Vec<TermIssue>,
}

impl FileAudit {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Audit one file. When `tool` is `None` the type is detected from the path.
pub fn audit_file(path: &Path, tool: Option<ToolType>, rules: &RuleSet) -> Result<FileAudit> {
    if !path.is_file() {
        return Err(Error::audit_file_not_found(path.display().to_string()));
    }

    let tool = match tool {
        Some(tool) => tool,
        None => ToolType::detect(path).ok_or_else(|| {
            Error::audit_unknown_tool_type(
                path.file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default(),
                ToolType::valid_slugs(),
            )
            .with_hint("The tool type could not be detected from the file name")
        })?,
    };

    let content = io::read_file(path, &format!("read {}", path.display()))?;
    log_status!("audit", "Scanning {} as {}", path.display(), tool.slug());

    Ok(audit_text(path.display().to_string(), &content, tool, rules))
}

/// Audit already-loaded text.
pub fn audit_text(path: String, content: &str, tool: ToolType, rules: &RuleSet) -> FileAudit {
    let issues = scan_text(content, rules.terms_for(tool));
    FileAudit {
        path,
        tool,
        issue_count: issues.len(),
        issues,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn audit_file_detects_tool_and_reports_issues() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("base64-encode.html");
        fs::write(
            &path,
            "<title>Base64 Encoder</title>\n<p>Paste text into the decoder.</p>\n",
        )
        .unwrap();

        let audit = audit_file(&path, None, &RuleSet::builtin()).unwrap();
        assert_eq!(audit.tool, ToolType::Base64Encode);
        assert_eq!(audit.issue_count, 1);
        assert_eq!(audit.issues[0].line, 2);
        assert_eq!(audit.issues[0].term, "decoder");
    }

    #[test]
    fn explicit_tool_overrides_detection() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.html");
        fs::write(&path, "Convert YAML to JSON or XML").unwrap();

        let audit = audit_file(&path, Some(ToolType::YamlToJson), &RuleSet::builtin()).unwrap();
        assert_eq!(audit.issue_count, 1);
        assert_eq!(audit.issues[0].matched, "XML");
    }

    #[test]
    fn missing_file_is_reported() {
        let err = audit_file(Path::new("/nonexistent/base64-encode.html"), None, &RuleSet::builtin())
            .unwrap_err();
        assert_eq!(err.code.as_str(), "audit.file_not_found");
    }

    #[test]
    fn undetectable_tool_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("about.html");
        fs::write(&path, "hello").unwrap();

        let err = audit_file(&path, None, &RuleSet::builtin()).unwrap_err();
        assert_eq!(err.code.as_str(), "audit.unknown_tool_type");
        assert_eq!(err.details["toolType"], "about.html");
    }
}
