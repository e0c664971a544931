use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{audit_text, FileAudit, RuleSet, ToolType};
use crate::defaults::AuditDefaults;
use crate::error::{Error, Result};
use crate::utils::io;

const TOP_TERMS_LIMIT: usize = 10;

/// Directory scan scope.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub extensions: Vec<String>,
    pub exclude_dirs: Vec<String>,
    /// Only files whose root-relative path matches this glob.
    pub glob: Option<String>,
    /// Force one tool type for every file instead of detecting per file.
    pub tool: Option<ToolType>,
}

impl From<&AuditDefaults> for BatchOptions {
    fn from(defaults: &AuditDefaults) -> Self {
        Self {
            extensions: defaults.extensions.clone(),
            exclude_dirs: defaults.exclude_dirs.clone(),
            glob: None,
            tool: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TermCount {
    pub term: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub files_scanned: usize,
    pub files_with_issues: usize,
    pub total_issues: usize,
    pub issues_by_tool: BTreeMap<String, usize>,
    pub top_terms: Vec<TermCount>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileError {
    pub path: String,
    pub error: String,
}

/// Result of auditing a directory tree. `files` holds only files with issues.
#[derive(Debug, Clone, Serialize)]
pub struct BatchAudit {
    pub root: String,
    pub generated_at: String,
    pub summary: BatchSummary,
    pub files: Vec<FileAudit>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FileError>,
}

impl BatchAudit {
    pub fn has_issues(&self) -> bool {
        self.summary.total_issues > 0
    }
}

/// Audit every matching page under `root`.
pub fn audit_dir(root: &Path, options: &BatchOptions, rules: &RuleSet) -> Result<BatchAudit> {
    if !root.is_dir() {
        return Err(Error::validation_invalid_argument(
            "path",
            format!("Not a directory: {}", root.display()),
            None,
            None,
        ));
    }

    log_status!("audit", "Scanning {} for tool pages...", root.display());

    let mut audits = Vec::new();
    let mut skipped = Vec::new();
    let mut errors = Vec::new();

    for path in collect_files(root, options) {
        let relative = relative_path(root, &path);

        let tool = match options.tool.or_else(|| ToolType::detect(&path)) {
            Some(tool) => tool,
            None => {
                skipped.push(relative);
                continue;
            }
        };

        match io::read_file(&path, &format!("read {}", relative)) {
            Ok(content) => audits.push(audit_text(relative, &content, tool, rules)),
            Err(err) => errors.push(FileError {
                path: relative,
                error: err.details["error"]
                    .as_str()
                    .map(str::to_string)
                    .unwrap_or(err.message),
            }),
        }
    }

    let summary = summarize(&audits);

    log_status!(
        "audit",
        "Complete: {} files, {} with issues, {} issues total",
        summary.files_scanned,
        summary.files_with_issues,
        summary.total_issues
    );

    Ok(BatchAudit {
        root: root.display().to_string(),
        generated_at: chrono::Utc::now().to_rfc3339(),
        summary,
        files: audits.into_iter().filter(|a| !a.is_clean()).collect(),
        skipped,
        errors,
    })
}

fn collect_files(root: &Path, options: &BatchOptions) -> Vec<PathBuf> {
    let extensions: Vec<String> = options
        .extensions
        .iter()
        .map(|e| e.trim_start_matches('.').to_lowercase())
        .collect();

    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0
                || !entry.file_type().is_dir()
                || !options
                    .exclude_dirs
                    .iter()
                    .any(|d| entry.file_name().to_string_lossy() == d.as_str())
        })
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .map(|ext| extensions.contains(&ext.to_string_lossy().to_lowercase()))
                .unwrap_or(false)
        })
        .filter(|path| match &options.glob {
            Some(pattern) => glob_match::glob_match(pattern, &relative_path(root, path)),
            None => true,
        })
        .collect()
}

/// Root-relative path with `/` separators.
fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect::<Vec<_>>()
        .join("/")
}

fn summarize(audits: &[FileAudit]) -> BatchSummary {
    let mut issues_by_tool: BTreeMap<String, usize> = BTreeMap::new();
    let mut term_counts: BTreeMap<String, usize> = BTreeMap::new();

    for audit in audits.iter().filter(|a| !a.is_clean()) {
        *issues_by_tool.entry(audit.tool.slug().to_string()).or_default() += audit.issue_count;
        for issue in &audit.issues {
            *term_counts.entry(issue.term.to_lowercase()).or_default() += 1;
        }
    }

    let mut top_terms: Vec<TermCount> = term_counts
        .into_iter()
        .map(|(term, count)| TermCount { term, count })
        .collect();
    // BTreeMap order breaks ties alphabetically; stable sort keeps it.
    top_terms.sort_by(|a, b| b.count.cmp(&a.count));
    top_terms.truncate(TOP_TERMS_LIMIT);

    BatchSummary {
        files_scanned: audits.len(),
        files_with_issues: audits.iter().filter(|a| !a.is_clean()).count(),
        total_issues: audits.iter().map(|a| a.issue_count).sum(),
        issues_by_tool,
        top_terms,
    }
}
