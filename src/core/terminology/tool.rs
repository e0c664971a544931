use serde::Serialize;
use std::path::Path;

use crate::error::{Error, Result};

/// Tool page category. Each category has its own forbidden-term table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolType {
    Base64Encode,
    Base64Decode,
    UrlEncode,
    UrlDecode,
    JsonToYaml,
    YamlToJson,
    XmlToJson,
    JsonToXml,
    CaseConverter,
    SpaceRemover,
    EmailExtractor,
}

impl ToolType {
    pub const ALL: &'static [ToolType] = &[
        ToolType::Base64Encode,
        ToolType::Base64Decode,
        ToolType::UrlEncode,
        ToolType::UrlDecode,
        ToolType::JsonToYaml,
        ToolType::YamlToJson,
        ToolType::XmlToJson,
        ToolType::JsonToXml,
        ToolType::CaseConverter,
        ToolType::SpaceRemover,
        ToolType::EmailExtractor,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            ToolType::Base64Encode => "base64-encode",
            ToolType::Base64Decode => "base64-decode",
            ToolType::UrlEncode => "url-encode",
            ToolType::UrlDecode => "url-decode",
            ToolType::JsonToYaml => "json-to-yaml",
            ToolType::YamlToJson => "yaml-to-json",
            ToolType::XmlToJson => "xml-to-json",
            ToolType::JsonToXml => "json-to-xml",
            ToolType::CaseConverter => "case-converter",
            ToolType::SpaceRemover => "space-remover",
            ToolType::EmailExtractor => "email-extractor",
        }
    }

    /// File/directory name fragments that identify the tool.
    fn aliases(&self) -> &'static [&'static str] {
        match self {
            ToolType::Base64Encode => &["base64-encode", "base64-encoder", "base64encode", "b64-encode"],
            ToolType::Base64Decode => &["base64-decode", "base64-decoder", "base64decode", "b64-decode"],
            ToolType::UrlEncode => &["url-encode", "url-encoder", "urlencode", "percent-encode"],
            ToolType::UrlDecode => &["url-decode", "url-decoder", "urldecode", "percent-decode"],
            ToolType::JsonToYaml => &["json-to-yaml", "json2yaml", "json-yaml"],
            ToolType::YamlToJson => &["yaml-to-json", "yaml2json", "yaml-json"],
            ToolType::XmlToJson => &["xml-to-json", "xml2json", "xml-json"],
            ToolType::JsonToXml => &["json-to-xml", "json2xml", "json-xml"],
            ToolType::CaseConverter => &["case-converter", "case-convert", "text-case", "change-case"],
            ToolType::SpaceRemover => &["space-remover", "remove-spaces", "whitespace-remover", "remove-whitespace"],
            ToolType::EmailExtractor => &["email-extractor", "extract-emails", "email-extract"],
        }
    }

    pub fn valid_slugs() -> Vec<String> {
        Self::ALL.iter().map(|t| t.slug().to_string()).collect()
    }

    /// Parse a user-supplied tool type (case-insensitive, `_`/space as `-`).
    pub fn parse(value: &str) -> Result<Self> {
        let wanted = normalize(value);
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.slug() == wanted || t.aliases().contains(&wanted.as_str()))
            .ok_or_else(|| Error::audit_unknown_tool_type(value, Self::valid_slugs()))
    }

    /// Infer the tool type from a file name, falling back to its parent
    /// directory (e.g. `base64-encode/index.html`).
    pub fn detect(path: &Path) -> Option<Self> {
        let stem = path.file_stem().map(|s| s.to_string_lossy().to_string());
        let parent = path
            .parent()
            .and_then(|p| p.file_name())
            .map(|s| s.to_string_lossy().to_string());

        stem.as_deref()
            .and_then(Self::detect_name)
            .or_else(|| parent.as_deref().and_then(Self::detect_name))
    }

    /// Longest alias contained in the normalized name wins.
    fn detect_name(name: &str) -> Option<Self> {
        let name = normalize(name);
        Self::ALL
            .iter()
            .flat_map(|t| t.aliases().iter().map(move |alias| (*t, *alias)))
            .filter(|(_, alias)| name.contains(alias))
            .max_by_key(|(_, alias)| alias.len())
            .map(|(t, _)| t)
    }
}

fn normalize(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == '_' || c.is_whitespace() { '-' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn parse_accepts_slug_variants() {
        assert_eq!(ToolType::parse("Base64_Encode").unwrap(), ToolType::Base64Encode);
        assert_eq!(ToolType::parse("json to yaml").unwrap(), ToolType::JsonToYaml);
        assert_eq!(ToolType::parse("urlencode").unwrap(), ToolType::UrlEncode);
    }

    #[test]
    fn parse_rejects_unknown_with_valid_list() {
        let err = ToolType::parse("pdf-merge").unwrap_err();
        assert_eq!(err.code.as_str(), "audit.unknown_tool_type");
        assert_eq!(err.details["valid"].as_array().unwrap().len(), ToolType::ALL.len());
    }

    #[test]
    fn detect_from_file_stem() {
        assert_eq!(
            ToolType::detect(&PathBuf::from("site/tools/base64-decoder.html")),
            Some(ToolType::Base64Decode)
        );
        assert_eq!(
            ToolType::detect(&PathBuf::from("Yaml_To_JSON.tsx")),
            Some(ToolType::YamlToJson)
        );
    }

    #[test]
    fn detect_falls_back_to_parent_directory() {
        assert_eq!(
            ToolType::detect(&PathBuf::from("pages/email-extractor/index.html")),
            Some(ToolType::EmailExtractor)
        );
        assert_eq!(ToolType::detect(&PathBuf::from("pages/about/index.html")), None);
    }

    #[test]
    fn slugs_serialize_as_kebab_case() {
        let json = serde_json::to_string(&ToolType::JsonToXml).unwrap();
        assert_eq!(json, "\"json-to-xml\"");
    }
}
