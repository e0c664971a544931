//! Human-readable audit reports (`--format text`).

use crossterm::style::{Color, Stylize};
use std::fmt::Write;

use super::{BatchAudit, FileAudit};

fn paint(text: &str, color: Color, enabled: bool) -> String {
    if enabled {
        text.to_string().with(color).bold().to_string()
    } else {
        text.to_string()
    }
}

fn push_issues(out: &mut String, audit: &FileAudit, color: bool) {
    for issue in &audit.issues {
        let _ = writeln!(
            out,
            "  {}:{}  {}  \"{}\"",
            issue.line,
            issue.column,
            paint(&issue.term, Color::Red, color),
            issue.context
        );
        let _ = writeln!(out, "      -> {}", issue.suggestion);
    }
}

/// Report for a single file.
pub fn render_file_text(audit: &FileAudit, color: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", audit.path, audit.tool.slug());

    if audit.is_clean() {
        let _ = writeln!(out, "  {}", paint("No terminology issues", Color::Green, color));
        return out;
    }

    push_issues(&mut out, audit, color);
    let _ = writeln!(
        out,
        "{}",
        paint(&format!("{} issue(s) found", audit.issue_count), Color::Yellow, color)
    );
    out
}

/// Report for a directory audit: per-file issues followed by a summary.
pub fn render_batch_text(batch: &BatchAudit, color: bool) -> String {
    let mut out = String::new();
    let summary = &batch.summary;

    let _ = writeln!(out, "Terminology audit: {}", batch.root);
    let _ = writeln!(out, "Generated: {}", batch.generated_at);
    let _ = writeln!(out);

    for audit in &batch.files {
        let _ = writeln!(
            out,
            "{} ({}, {} issue(s))",
            paint(&audit.path, Color::Cyan, color),
            audit.tool.slug(),
            audit.issue_count
        );
        push_issues(&mut out, audit, color);
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "Summary");
    let _ = writeln!(out, "  Files scanned:     {}", summary.files_scanned);
    let _ = writeln!(out, "  Files with issues: {}", summary.files_with_issues);
    let total = format!("{}", summary.total_issues);
    let total = if summary.total_issues == 0 {
        paint(&total, Color::Green, color)
    } else {
        paint(&total, Color::Red, color)
    };
    let _ = writeln!(out, "  Total issues:      {}", total);

    if !summary.issues_by_tool.is_empty() {
        let _ = writeln!(out, "  By tool:");
        for (tool, count) in &summary.issues_by_tool {
            let _ = writeln!(out, "    {:<18} {}", tool, count);
        }
    }

    if !summary.top_terms.is_empty() {
        let _ = writeln!(out, "  Top terms:");
        for entry in &summary.top_terms {
            let _ = writeln!(out, "    {:<18} {}", entry.term, entry.count);
        }
    }

    if !batch.skipped.is_empty() {
        let _ = writeln!(
            out,
            "  Skipped ({} file(s), tool type not detected):",
            batch.skipped.len()
        );
        for path in &batch.skipped {
            let _ = writeln!(out, "    {}", path);
        }
    }

    for error in &batch.errors {
        let _ = writeln!(out, "  {} {}: {}", paint("error", Color::Red, color), error.path, error.error);
    }

    out
}
