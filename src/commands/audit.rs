use clap::{Args, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::{Path, PathBuf};

use textkit::defaults;
use textkit::log_status;
use textkit::terminology::report::{render_batch_text, render_file_text};
use textkit::terminology::{self, BatchAudit, BatchOptions, FileAudit, RuleSet, ToolType};
use textkit::utils::io;

use super::{CmdResult, RawText};

#[derive(Args)]
pub struct AuditArgs {
    #[command(subcommand)]
    command: AuditCommand,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Json,
    Text,
}

#[derive(Args)]
struct ReportArgs {
    /// Tool type (detected from the path when omitted)
    #[arg(long)]
    tool: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "json")]
    format: ReportFormat,

    /// Also write the JSON report to this file
    #[arg(long, value_name = "PATH")]
    save: Option<PathBuf>,
}

#[derive(Subcommand)]
enum AuditCommand {
    /// Scan one tool page for terminology that belongs to another tool
    File {
        path: PathBuf,

        #[command(flatten)]
        report: ReportArgs,
    },
    /// Scan every tool page under a directory
    Dir {
        path: PathBuf,

        /// Only files whose relative path matches this glob
        #[arg(long)]
        glob: Option<String>,

        /// File extensions to scan (replaces the configured list)
        #[arg(long = "ext", value_name = "EXT")]
        extensions: Vec<String>,

        /// Additional directory names to skip
        #[arg(long = "exclude", value_name = "DIR")]
        exclude_dirs: Vec<String>,

        #[command(flatten)]
        report: ReportArgs,
    },
}

impl AuditArgs {
    pub fn is_text_format(&self) -> bool {
        let report = match &self.command {
            AuditCommand::File { report, .. } | AuditCommand::Dir { report, .. } => report,
        };
        report.format == ReportFormat::Text
    }
}

#[derive(Debug, Serialize)]
pub struct AuditOutput {
    command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    file: Option<FileAudit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    batch: Option<BatchAudit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    saved_to: Option<String>,
    #[serde(skip)]
    report: String,
}

impl RawText for AuditOutput {
    fn raw_text(&self) -> &str {
        &self.report
    }
}

pub fn run(args: AuditArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<AuditOutput> {
    let config = defaults::load_defaults().audit;
    let rules = RuleSet::from_config(&config)?;

    match args.command {
        AuditCommand::File { path, report } => {
            let tool = parse_tool(report.tool.as_deref())?;
            let audit = terminology::audit_file(&path, tool, &rules)?;

            let saved_to = save_report(report.save.as_deref(), &audit)?;
            let text = render(&report, || render_file_text(&audit, color()));
            let exit_code = if audit.is_clean() { 0 } else { 1 };

            Ok((
                AuditOutput {
                    command: "audit.file".to_string(),
                    file: Some(audit),
                    batch: None,
                    saved_to,
                    report: text,
                },
                exit_code,
            ))
        }
        AuditCommand::Dir {
            path,
            glob,
            extensions,
            exclude_dirs,
            report,
        } => {
            let mut options = BatchOptions::from(&config);
            options.tool = parse_tool(report.tool.as_deref())?;
            options.glob = glob;
            if !extensions.is_empty() {
                options.extensions = extensions;
            }
            options.exclude_dirs.extend(exclude_dirs);

            if !path.exists() {
                return Err(textkit::Error::audit_file_not_found(
                    path.display().to_string(),
                ));
            }
            let batch = terminology::audit_dir(&path, &options, &rules)?;

            let saved_to = save_report(report.save.as_deref(), &batch)?;
            let text = render(&report, || render_batch_text(&batch, color()));
            let exit_code = if batch.has_issues() { 1 } else { 0 };

            Ok((
                AuditOutput {
                    command: "audit.dir".to_string(),
                    file: None,
                    batch: Some(batch),
                    saved_to,
                    report: text,
                },
                exit_code,
            ))
        }
    }
}

fn parse_tool(tool: Option<&str>) -> textkit::Result<Option<ToolType>> {
    tool.map(ToolType::parse).transpose()
}

fn color() -> bool {
    crate::tty::is_stdout_tty()
}

fn render(args: &ReportArgs, build: impl FnOnce() -> String) -> String {
    match args.format {
        ReportFormat::Text => build(),
        ReportFormat::Json => String::new(),
    }
}

fn save_report<T: Serialize>(path: Option<&Path>, report: &T) -> textkit::Result<Option<String>> {
    let Some(path) = path else {
        return Ok(None);
    };

    let content = serde_json::to_string_pretty(report).map_err(|e| {
        textkit::Error::internal_json(e.to_string(), Some("serialize audit report".to_string()))
    })?;
    io::write_file_atomic(path, content.as_bytes(), &format!("write {}", path.display()))?;
    log_status!("audit", "Report saved to {}", path.display());

    Ok(Some(path.display().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::use_config_file;
    use crate::commands::GlobalArgs;
    use std::fs;

    fn report_args(save: Option<PathBuf>) -> ReportArgs {
        ReportArgs {
            tool: None,
            format: ReportFormat::Json,
            save,
        }
    }

    fn audit_file(path: PathBuf, save: Option<PathBuf>) -> CmdResult<AuditOutput> {
        let args = AuditArgs {
            command: AuditCommand::File {
                path,
                report: report_args(save),
            },
        };
        run(args, &GlobalArgs {})
    }

    fn audit_dir(path: PathBuf) -> CmdResult<AuditOutput> {
        let args = AuditArgs {
            command: AuditCommand::Dir {
                path,
                glob: None,
                extensions: Vec::new(),
                exclude_dirs: Vec::new(),
                report: report_args(None),
            },
        };
        run(args, &GlobalArgs {})
    }

    #[test]
    fn file_with_issues_exits_one_and_saves_json_report() {
        let dir = tempfile::tempdir().unwrap();
        let _config = use_config_file(&dir.path().join("textkit.json"));
        let page = dir.path().join("base64-encode.html");
        fs::write(&page, "Paste into the decoder").unwrap();
        let saved = dir.path().join("audit.json");

        let (output, exit_code) = audit_file(page, Some(saved.clone())).unwrap();
        assert_eq!(exit_code, 1);
        assert_eq!(output.saved_to, Some(saved.display().to_string()));
        assert!(output.report.is_empty());

        let report: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&saved).unwrap()).unwrap();
        assert_eq!(report["issue_count"], 1);
        assert_eq!(report["issues"][0]["term"], "decoder");
    }

    #[test]
    fn clean_file_exits_zero_without_saving() {
        let dir = tempfile::tempdir().unwrap();
        let _config = use_config_file(&dir.path().join("textkit.json"));
        let page = dir.path().join("base64-encode.html");
        fs::write(&page, "Base64 encoder").unwrap();

        let (output, exit_code) = audit_file(page, None).unwrap();
        assert_eq!(exit_code, 0);
        assert!(output.saved_to.is_none());
        assert!(output.file.unwrap().is_clean());
    }

    #[test]
    fn dir_exit_code_follows_issue_count() {
        let dir = tempfile::tempdir().unwrap();
        let _config = use_config_file(&dir.path().join("textkit.json"));
        let site = dir.path().join("site");
        fs::create_dir(&site).unwrap();
        fs::write(site.join("url-decode.html"), "URL decoder").unwrap();

        let (_, exit_code) = audit_dir(site.clone()).unwrap();
        assert_eq!(exit_code, 0);

        fs::write(site.join("base64-encode.html"), "Base64 decoder").unwrap();
        let (output, exit_code) = audit_dir(site).unwrap();
        assert_eq!(exit_code, 1);
        assert_eq!(output.batch.unwrap().summary.total_issues, 1);
    }

    #[test]
    fn missing_dir_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let _config = use_config_file(&dir.path().join("textkit.json"));
        let err = audit_dir(dir.path().join("nope")).unwrap_err();
        assert_eq!(err.code.as_str(), "audit.file_not_found");
    }
}
