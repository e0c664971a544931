use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::error::{Error, Result};

const EMAIL_PATTERN: &str =
    r"(?i)\b[a-z0-9._%+-]+@(?:[a-z0-9](?:[a-z0-9-]*[a-z0-9])?\.)+[a-z]{2,}\b";

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern is valid"))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Separator {
    #[default]
    Newline,
    Comma,
    Semicolon,
    Space,
}

impl Separator {
    fn as_str(&self) -> &'static str {
        match self {
            Separator::Newline => "\n",
            Separator::Comma => ", ",
            Separator::Semicolon => "; ",
            Separator::Space => " ",
        }
    }

    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "newline" | "line" => Ok(Separator::Newline),
            "comma" => Ok(Separator::Comma),
            "semicolon" => Ok(Separator::Semicolon),
            "space" => Ok(Separator::Space),
            _ => Err(Error::validation_invalid_argument(
                "separator",
                format!("Unknown separator '{}'", value),
                None,
                Some(vec![
                    "newline".to_string(),
                    "comma".to_string(),
                    "semicolon".to_string(),
                    "space".to_string(),
                ]),
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EmailOptions {
    pub unique: bool,
    pub sort: bool,
    pub lowercase: bool,
    pub domain: Option<String>,
    pub separator: Separator,
}

impl Default for EmailOptions {
    fn default() -> Self {
        Self {
            unique: true,
            sort: false,
            lowercase: false,
            domain: None,
            separator: Separator::Newline,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EmailExtraction {
    pub emails: Vec<String>,
    pub count: usize,
    pub total_found: usize,
    pub text: String,
}

pub fn extract_emails(input: &str, options: &EmailOptions) -> EmailExtraction {
    let found: Vec<&str> = email_regex().find_iter(input).map(|m| m.as_str()).collect();
    let total_found = found.len();

    let domain_filter = options
        .domain
        .as_deref()
        .map(|d| d.trim().trim_start_matches('@').to_lowercase())
        .filter(|d| !d.is_empty());

    let mut seen = HashSet::new();
    let mut emails: Vec<String> = found
        .into_iter()
        .filter(|email| match &domain_filter {
            Some(domain) => matches_domain(email, domain),
            None => true,
        })
        .filter(|email| !options.unique || seen.insert(email.to_lowercase()))
        .map(|email| {
            if options.lowercase {
                email.to_lowercase()
            } else {
                email.to_string()
            }
        })
        .collect();

    if options.sort {
        emails.sort_by_key(|e| e.to_lowercase());
    }

    let text = emails.join(options.separator.as_str());
    EmailExtraction {
        count: emails.len(),
        emails,
        total_found,
        text,
    }
}

fn matches_domain(email: &str, domain: &str) -> bool {
    let Some((_, email_domain)) = email.rsplit_once('@') else {
        return false;
    };
    let email_domain = email_domain.to_lowercase();
    email_domain == domain || email_domain.ends_with(&format!(".{}", domain))
}
