//! Forbidden-term tables per tool type.
//!
//! Terms name a sibling or inverse tool, or a format the page does not
//! handle. They catch wording left behind when one page is cloned into
//! another.

use regex::Regex;
use std::collections::HashMap;

use super::tool::ToolType;
use crate::defaults::AuditDefaults;
use crate::error::{Error, Result};

type TermTable = &'static [(&'static str, &'static str)];

const BASE64_ENCODE: TermTable = &[
    ("decoder", "This page encodes; call it an encoder"),
    ("decode from base64", "Say \"encode to Base64\""),
    ("URL encode", "Base64 is not URL encoding"),
    ("URL encoder", "Base64 is not URL encoding"),
    ("percent-encoding", "Base64 is not percent-encoding"),
    ("encodeURIComponent", "Reference btoa or a Base64 API instead"),
];

const BASE64_DECODE: TermTable = &[
    ("encoder", "This page decodes; call it a decoder"),
    ("encode to base64", "Say \"decode from Base64\""),
    ("URL decode", "Base64 is not URL decoding"),
    ("URL decoder", "Base64 is not URL decoding"),
    ("percent-decoding", "Base64 is not percent-decoding"),
    ("decodeURIComponent", "Reference atob or a Base64 API instead"),
];

const URL_ENCODE: TermTable = &[
    ("decoder", "This page encodes; call it an encoder"),
    ("URL decode", "Say \"URL encode\""),
    ("decodeURIComponent", "Use encodeURIComponent"),
    ("base64", "URL encoding is percent-encoding, not Base64"),
    ("btoa", "btoa is a Base64 API; use encodeURIComponent"),
];

const URL_DECODE: TermTable = &[
    ("encoder", "This page decodes; call it a decoder"),
    ("URL encode", "Say \"URL decode\""),
    ("encodeURIComponent", "Use decodeURIComponent"),
    ("base64", "URL decoding is percent-decoding, not Base64"),
    ("atob", "atob is a Base64 API; use decodeURIComponent"),
];

const JSON_TO_YAML: TermTable = &[
    ("XML", "This page converts JSON to YAML"),
    ("YAML to JSON", "Direction is JSON to YAML"),
    ("YAML-to-JSON", "Direction is JSON-to-YAML"),
    ("JSON to XML", "This page converts JSON to YAML"),
];

const YAML_TO_JSON: TermTable = &[
    ("XML", "This page converts YAML to JSON"),
    ("JSON to YAML", "Direction is YAML to JSON"),
    ("JSON-to-YAML", "Direction is YAML-to-JSON"),
    ("XML to JSON", "This page converts YAML to JSON"),
];

const XML_TO_JSON: TermTable = &[
    ("YAML", "This page converts XML to JSON"),
    ("JSON to XML", "Direction is XML to JSON"),
    ("JSON-to-XML", "Direction is XML-to-JSON"),
    ("YAML to JSON", "This page converts XML to JSON"),
];

const JSON_TO_XML: TermTable = &[
    ("YAML", "This page converts JSON to XML"),
    ("XML to JSON", "Direction is JSON to XML"),
    ("XML-to-JSON", "Direction is JSON-to-XML"),
    ("JSON to YAML", "This page converts JSON to XML"),
];

const CASE_CONVERTER: TermTable = &[
    ("remove spaces", "Belongs to the space remover page"),
    ("space remover", "Belongs to the space remover page"),
    ("whitespace remover", "Belongs to the space remover page"),
    ("email extractor", "Belongs to the email extractor page"),
    ("base64", "Belongs to the Base64 pages"),
];

const SPACE_REMOVER: TermTable = &[
    ("case converter", "Belongs to the case converter page"),
    ("uppercase", "Case changes belong to the case converter page"),
    ("lowercase", "Case changes belong to the case converter page"),
    ("email extractor", "Belongs to the email extractor page"),
    ("base64", "Belongs to the Base64 pages"),
];

const EMAIL_EXTRACTOR: TermTable = &[
    ("case converter", "Belongs to the case converter page"),
    ("space remover", "Belongs to the space remover page"),
    ("remove spaces", "Belongs to the space remover page"),
    ("URL encode", "Belongs to the URL encoder page"),
    ("base64", "Belongs to the Base64 pages"),
];

/// Built-in (term, suggestion) pairs for a tool type.
pub fn builtin_terms(tool: ToolType) -> TermTable {
    match tool {
        ToolType::Base64Encode => BASE64_ENCODE,
        ToolType::Base64Decode => BASE64_DECODE,
        ToolType::UrlEncode => URL_ENCODE,
        ToolType::UrlDecode => URL_DECODE,
        ToolType::JsonToYaml => JSON_TO_YAML,
        ToolType::YamlToJson => YAML_TO_JSON,
        ToolType::XmlToJson => XML_TO_JSON,
        ToolType::JsonToXml => JSON_TO_XML,
        ToolType::CaseConverter => CASE_CONVERTER,
        ToolType::SpaceRemover => SPACE_REMOVER,
        ToolType::EmailExtractor => EMAIL_EXTRACTOR,
    }
}

/// A compiled forbidden term.
#[derive(Debug, Clone)]
pub struct ForbiddenTerm {
    pub term: String,
    pub suggestion: String,
    pattern: Regex,
}

impl ForbiddenTerm {
    pub fn new(term: &str, suggestion: &str) -> Result<Self> {
        let trimmed = term.trim();
        if trimmed.is_empty() {
            return Err(Error::config_invalid_value(
                "audit.extra_terms",
                Some(term.to_string()),
                "Forbidden term cannot be empty",
            ));
        }

        Ok(Self {
            term: trimmed.to_string(),
            suggestion: suggestion.to_string(),
            pattern: term_pattern(trimmed)?,
        })
    }

    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }
}

/// Case-insensitive match with word boundaries on the sides where the term
/// starts/ends with a word character.
fn term_pattern(term: &str) -> Result<Regex> {
    let is_word = |c: Option<char>| c.is_some_and(|c| c.is_alphanumeric() || c == '_');
    let lead = if is_word(term.chars().next()) { r"\b" } else { "" };
    let tail = if is_word(term.chars().last()) { r"\b" } else { "" };
    let pattern = format!("(?i){}{}{}", lead, regex::escape(term), tail);

    Regex::new(&pattern).map_err(|e| {
        Error::config_invalid_value("audit.extra_terms", Some(term.to_string()), e.to_string())
    })
}

/// Effective rules: built-in tables plus configured extras, minus allowed terms.
#[derive(Debug, Clone)]
pub struct RuleSet {
    terms: HashMap<ToolType, Vec<ForbiddenTerm>>,
}

impl RuleSet {
    pub fn builtin() -> Self {
        let mut terms = HashMap::new();
        for tool in ToolType::ALL {
            let compiled = builtin_terms(*tool)
                .iter()
                .filter_map(|(term, suggestion)| ForbiddenTerm::new(term, suggestion).ok())
                .collect();
            terms.insert(*tool, compiled);
        }
        Self { terms }
    }

    /// Apply `extra_terms` and `allowed_terms` from configuration. Keys are
    /// tool type slugs; unknown keys are an error.
    pub fn from_config(audit: &AuditDefaults) -> Result<Self> {
        let mut rules = Self::builtin();

        for (tool_key, extras) in &audit.extra_terms {
            let tool = ToolType::parse(tool_key)?;
            let list = rules.terms.entry(tool).or_default();
            for extra in extras {
                if list.iter().any(|t| t.term.eq_ignore_ascii_case(extra.term.trim())) {
                    continue;
                }
                let suggestion = extra
                    .suggestion
                    .clone()
                    .unwrap_or_else(|| format!("Remove \"{}\" from {} pages", extra.term.trim(), tool.slug()));
                list.push(ForbiddenTerm::new(&extra.term, &suggestion)?);
            }
        }

        for (tool_key, allowed) in &audit.allowed_terms {
            let tool = ToolType::parse(tool_key)?;
            if let Some(list) = rules.terms.get_mut(&tool) {
                list.retain(|t| !allowed.iter().any(|a| a.trim().eq_ignore_ascii_case(&t.term)));
            }
        }

        Ok(rules)
    }

    pub fn terms_for(&self, tool: ToolType) -> &[ForbiddenTerm] {
        self.terms.get(&tool).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::TermConfig;

    #[test]
    fn every_tool_has_builtin_terms() {
        let rules = RuleSet::builtin();
        for tool in ToolType::ALL {
            assert!(!rules.terms_for(*tool).is_empty(), "{} has no terms", tool.slug());
        }
    }

    #[test]
    fn word_boundaries_respect_term_edges() {
        let term = ForbiddenTerm::new("decode", "x").unwrap();
        assert!(term.pattern().is_match("Click Decode now"));
        assert!(!term.pattern().is_match("decoded"));

        let hyphenated = ForbiddenTerm::new("-to-", "x").unwrap();
        assert!(hyphenated.pattern().is_match("json-to-xml"));
    }

    #[test]
    fn config_adds_and_allows_terms() {
        let mut audit = AuditDefaults::default();
        audit.extra_terms.insert(
            "url-encode".to_string(),
            vec![TermConfig {
                term: "hex dump".to_string(),
                suggestion: None,
            }],
        );
        audit
            .allowed_terms
            .insert("url_encode".to_string(), vec!["BASE64".to_string()]);

        let rules = RuleSet::from_config(&audit).unwrap();
        let terms: Vec<&str> = rules
            .terms_for(ToolType::UrlEncode)
            .iter()
            .map(|t| t.term.as_str())
            .collect();

        assert!(terms.contains(&"hex dump"));
        assert!(!terms.contains(&"base64"));
    }

    #[test]
    fn config_with_unknown_tool_is_rejected() {
        let mut audit = AuditDefaults::default();
        audit
            .allowed_terms
            .insert("pdf-merge".to_string(), vec!["x".to_string()]);
        let err = RuleSet::from_config(&audit).unwrap_err();
        assert_eq!(err.code.as_str(), "audit.unknown_tool_type");
    }

    #[test]
    fn empty_extra_term_is_rejected() {
        assert!(ForbiddenTerm::new("  ", "x").is_err());
    }
}
