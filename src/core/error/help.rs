use super::{codes, ErrorCode, Hint};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorHelpSummary {
    pub code: String,
    pub summary: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorHelp {
    pub code: String,
    pub summary: String,
    pub details_schema: serde_json::Value,
    pub hints: Vec<Hint>,
}

pub fn list() -> Vec<ErrorHelpSummary> {
    codes::all_codes()
        .iter()
        .copied()
        .map(|code| {
            let help = explain(code);
            ErrorHelpSummary {
                code: help.code,
                summary: help.summary,
            }
        })
        .collect()
}

fn help(code: ErrorCode, summary: &str, schema: serde_json::Value, hint: &str) -> ErrorHelp {
    ErrorHelp {
        code: code.as_str().to_string(),
        summary: summary.to_string(),
        details_schema: schema,
        hints: vec![Hint {
            message: hint.to_string(),
        }],
    }
}

pub fn explain(code: ErrorCode) -> ErrorHelp {
    match code {
        ErrorCode::ConfigInvalidJson => help(
            code,
            "Configuration JSON is invalid",
            serde_json::json!({"path":"string","error":"string"}),
            "Fix JSON syntax in textkit.json or run `textkit config reset`",
        ),
        ErrorCode::ConfigInvalidValue => help(
            code,
            "Configuration value is invalid",
            serde_json::json!({"key":"string","value":"string?","problem":"string"}),
            "Correct the config value to match expected type/format",
        ),
        ErrorCode::ValidationMissingArgument => help(
            code,
            "Missing required CLI argument",
            serde_json::json!({"args":"string[]"}),
            "Pass the input as an argument, @file, or pipe it on stdin",
        ),
        ErrorCode::ValidationInvalidArgument => help(
            code,
            "Invalid CLI argument",
            serde_json::json!({"field":"string","problem":"string","id":"string?","tried":"string[]?"}),
            "Verify the argument value and try again",
        ),
        ErrorCode::ValidationInvalidJson => help(
            code,
            "Invalid JSON argument",
            serde_json::json!({"error":"string","context":"string?","content":"string?"}),
            "Validate the JSON you passed to the command",
        ),
        ErrorCode::ValidationUnknownErrorCode => help(
            code,
            "Unknown error code",
            serde_json::json!({"code":"string"}),
            "Run `textkit error codes` to list available codes",
        ),
        ErrorCode::InputParseFailed => help(
            code,
            "Input could not be parsed in the requested format",
            serde_json::json!({"format":"string","error":"string","line":"number?","column":"number?"}),
            "Check the input near the reported line and column",
        ),
        ErrorCode::InputDecodeFailed => help(
            code,
            "Input is not valid for the requested decoding",
            serde_json::json!({"encoding":"string","error":"string","position":"number?"}),
            "Make sure the whole value was copied, including padding",
        ),
        ErrorCode::AuditFileNotFound => help(
            code,
            "File to audit does not exist",
            serde_json::json!({"path":"string"}),
            "Check the path, or use `textkit audit dir` for a directory",
        ),
        ErrorCode::AuditUnknownToolType => help(
            code,
            "Tool type is unknown or could not be detected",
            serde_json::json!({"toolType":"string","valid":"string[]"}),
            "Pass --tool with one of the listed tool types",
        ),
        ErrorCode::ClipboardUnavailable => help(
            code,
            "System clipboard could not be accessed",
            serde_json::json!({"error":"string","output":"string?","savedTo":"string?"}),
            "Use --output <path> to save the result instead",
        ),
        ErrorCode::InternalIoError => help(
            code,
            "Filesystem or stream I/O failed",
            serde_json::json!({"error":"string","context":"string?"}),
            "Check paths and permissions",
        ),
        ErrorCode::InternalJsonError => help(
            code,
            "Failed to serialize output",
            serde_json::json!({"error":"string","context":"string?"}),
            "Report this as a bug with the command you ran",
        ),
        ErrorCode::InternalUnexpected => help(
            code,
            "Unexpected internal error",
            serde_json::json!({"error":"string"}),
            "Report this as a bug with the command you ran",
        ),
    }
}
