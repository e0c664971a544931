use serde::Serialize;

use super::rules::ForbiddenTerm;

const CONTEXT_MAX_CHARS: usize = 120;

/// One forbidden term found in a page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TermIssue {
    pub line: usize,
    pub column: usize,
    pub term: String,
    pub matched: String,
    pub context: String,
    pub suggestion: String,
}

/// Scan `text` line by line for every forbidden term.
pub fn scan_text(text: &str, terms: &[ForbiddenTerm]) -> Vec<TermIssue> {
    let mut issues = Vec::new();

    for (index, line) in text.lines().enumerate() {
        for term in terms {
            for m in term.pattern().find_iter(line) {
                issues.push(TermIssue {
                    line: index + 1,
                    column: line[..m.start()].chars().count() + 1,
                    term: term.term.clone(),
                    matched: m.as_str().to_string(),
                    context: context_excerpt(line),
                    suggestion: term.suggestion.clone(),
                });
            }
        }
    }

    issues.sort_by(|a, b| (a.line, a.column).cmp(&(b.line, b.column)));
    issues
}

fn context_excerpt(line: &str) -> String {
    let trimmed = line.trim();
    if trimmed.chars().count() <= CONTEXT_MAX_CHARS {
        return trimmed.to_string();
    }
    let mut excerpt: String = trimmed.chars().take(CONTEXT_MAX_CHARS - 3).collect();
    excerpt.push_str("...");
    excerpt
}
