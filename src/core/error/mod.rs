mod codes;
mod help;

pub use codes::{all_codes, parse_code};
pub use help::{explain, list, ErrorHelp, ErrorHelpSummary};

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigInvalidJson,
    ConfigInvalidValue,

    ValidationMissingArgument,
    ValidationInvalidArgument,
    ValidationInvalidJson,
    ValidationUnknownErrorCode,

    InputParseFailed,
    InputDecodeFailed,

    AuditFileNotFound,
    AuditUnknownToolType,

    ClipboardUnavailable,

    InternalIoError,
    InternalJsonError,
    InternalUnexpected,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ConfigInvalidJson => "config.invalid_json",
            ErrorCode::ConfigInvalidValue => "config.invalid_value",

            ErrorCode::ValidationMissingArgument => "validation.missing_argument",
            ErrorCode::ValidationInvalidArgument => "validation.invalid_argument",
            ErrorCode::ValidationInvalidJson => "validation.invalid_json",
            ErrorCode::ValidationUnknownErrorCode => "validation.unknown_error_code",

            ErrorCode::InputParseFailed => "input.parse_failed",
            ErrorCode::InputDecodeFailed => "input.decode_failed",

            ErrorCode::AuditFileNotFound => "audit.file_not_found",
            ErrorCode::AuditUnknownToolType => "audit.unknown_tool_type",

            ErrorCode::ClipboardUnavailable => "clipboard.unavailable",

            ErrorCode::InternalIoError => "internal.io_error",
            ErrorCode::InternalJsonError => "internal.json_error",
            ErrorCode::InternalUnexpected => "internal.unexpected",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigInvalidJsonDetails {
    pub path: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigInvalidValueDetails {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub problem: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingArgumentDetails {
    pub args: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidArgumentDetails {
    pub field: String,
    pub problem: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tried: Option<Vec<String>>,
}

/// Where in the input a parse error was detected (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SourcePosition {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputParseFailedDetails {
    pub format: String,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDecodeFailedDetails {
    pub encoding: String,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditFileNotFoundDetails {
    pub path: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditUnknownToolTypeDetails {
    pub tool_type: String,
    pub valid: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalIoErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalJsonErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    pub details: Value,
    pub hints: Vec<Hint>,
    pub retryable: Option<bool>,
}

pub type Result<T> = std::result::Result<T, Error>;

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

fn details_value<T: Serialize>(details: T) -> Value {
    serde_json::to_value(details).unwrap_or_else(|_| Value::Object(serde_json::Map::new()))
}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            hints: Vec::new(),
            retryable: None,
        }
    }

    pub fn validation_missing_argument(args: Vec<String>) -> Self {
        Self::new(
            ErrorCode::ValidationMissingArgument,
            "Missing required argument",
            details_value(MissingArgumentDetails { args }),
        )
    }

    pub fn validation_invalid_argument(
        field: impl Into<String>,
        problem: impl Into<String>,
        id: Option<String>,
        tried: Option<Vec<String>>,
    ) -> Self {
        let details = details_value(InvalidArgumentDetails {
            field: field.into(),
            problem: problem.into(),
            id,
            tried,
        });

        Self::new(
            ErrorCode::ValidationInvalidArgument,
            "Invalid argument",
            details,
        )
    }

    pub fn validation_invalid_json(
        err: serde_json::Error,
        context: Option<String>,
        content: Option<String>,
    ) -> Self {
        let details = serde_json::json!({
            "error": err.to_string(),
            "context": context,
            "content": content,
        });

        Self::new(ErrorCode::ValidationInvalidJson, "Invalid JSON", details)
    }

    pub fn validation_unknown_error_code(code: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ValidationUnknownErrorCode,
            "Unknown error code",
            serde_json::json!({ "code": code.into() }),
        )
        .with_hint("Run 'textkit error codes' to list available codes")
    }

    /// Input text could not be parsed as `format` (json, yaml, xml).
    pub fn input_parse_failed(
        format: impl Into<String>,
        error: impl Into<String>,
        position: Option<SourcePosition>,
    ) -> Self {
        let format = format.into();
        let details = details_value(InputParseFailedDetails {
            format: format.clone(),
            error: error.into(),
            line: position.map(|p| p.line),
            column: position.map(|p| p.column),
        });

        Self::new(
            ErrorCode::InputParseFailed,
            format!("Invalid {} input", format.to_uppercase()),
            details,
        )
    }

    pub fn input_decode_failed(
        encoding: impl Into<String>,
        error: impl Into<String>,
        position: Option<usize>,
    ) -> Self {
        let encoding = encoding.into();
        let details = details_value(InputDecodeFailedDetails {
            encoding: encoding.clone(),
            error: error.into(),
            position,
        });

        Self::new(
            ErrorCode::InputDecodeFailed,
            format!("Input is not valid {}", encoding),
            details,
        )
    }

    pub fn audit_file_not_found(path: impl Into<String>) -> Self {
        let path = path.into();
        Self::new(
            ErrorCode::AuditFileNotFound,
            format!("File not found: {}", path),
            details_value(AuditFileNotFoundDetails { path }),
        )
    }

    pub fn audit_unknown_tool_type(tool_type: impl Into<String>, valid: Vec<String>) -> Self {
        let tool_type = tool_type.into();
        Self::new(
            ErrorCode::AuditUnknownToolType,
            format!("Unknown tool type: {}", tool_type),
            details_value(AuditUnknownToolTypeDetails { tool_type, valid }),
        )
        .with_hint("Pass --tool with one of the valid tool types")
    }

    pub fn clipboard_unavailable(error: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ClipboardUnavailable,
            "Clipboard is not available",
            serde_json::json!({ "error": error.into() }),
        )
        .with_hint("Use --output <path> to save the result to a file instead")
    }

    pub fn config_invalid_json(path: impl Into<String>, err: serde_json::Error) -> Self {
        let details = details_value(ConfigInvalidJsonDetails {
            path: path.into(),
            error: err.to_string(),
        });

        Self::new(
            ErrorCode::ConfigInvalidJson,
            "Invalid JSON in configuration",
            details,
        )
    }

    pub fn config_invalid_value(
        key: impl Into<String>,
        value: Option<String>,
        problem: impl Into<String>,
    ) -> Self {
        let details = details_value(ConfigInvalidValueDetails {
            key: key.into(),
            value,
            problem: problem.into(),
        });

        Self::new(
            ErrorCode::ConfigInvalidValue,
            "Invalid configuration value",
            details,
        )
    }

    pub fn internal_io(error: impl Into<String>, context: Option<String>) -> Self {
        let details = details_value(InternalIoErrorDetails {
            error: error.into(),
            context,
        });

        Self::new(ErrorCode::InternalIoError, "IO error", details)
    }

    pub fn internal_json(error: impl Into<String>, context: Option<String>) -> Self {
        let details = details_value(InternalJsonErrorDetails {
            error: error.into(),
            context,
        });

        Self::new(ErrorCode::InternalJsonError, "JSON error", details)
    }

    pub fn internal_unexpected(error: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::InternalUnexpected,
            "Unexpected error",
            serde_json::json!({ "error": error.into() }),
        )
    }

    pub fn with_hint(mut self, message: impl Into<String>) -> Self {
        self.hints.push(Hint {
            message: message.into(),
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_failed_carries_position() {
        let err = Error::input_parse_failed(
            "xml",
            "unexpected end of input",
            Some(SourcePosition { line: 3, column: 7 }),
        );

        assert_eq!(err.code, ErrorCode::InputParseFailed);
        assert_eq!(err.message, "Invalid XML input");
        assert_eq!(err.details["line"], 3);
        assert_eq!(err.details["column"], 7);
        assert_eq!(err.details["format"], "xml");
    }

    #[test]
    fn parse_failed_omits_missing_position() {
        let err = Error::input_parse_failed("yaml", "bad indent", None);
        assert!(err.details.get("line").is_none());
    }

    #[test]
    fn unknown_tool_type_lists_valid_types() {
        let err = Error::audit_unknown_tool_type(
            "pdf-merger",
            vec!["base64-encode".to_string(), "url-encode".to_string()],
        );

        assert_eq!(err.code.as_str(), "audit.unknown_tool_type");
        assert_eq!(err.details["toolType"], "pdf-merger");
        assert_eq!(err.details["valid"][1], "url-encode");
        assert_eq!(err.hints.len(), 1);
    }
}
