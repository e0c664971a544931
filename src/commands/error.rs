use clap::{Args, Subcommand};
use serde::Serialize;

use textkit::error::{self, ErrorHelp, ErrorHelpSummary};

use super::CmdResult;

#[derive(Args)]
pub struct ErrorArgs {
    #[command(subcommand)]
    command: ErrorCommand,
}

#[derive(Subcommand)]
enum ErrorCommand {
    /// List available textkit error codes
    Codes,
    /// Explain an error code
    Explain {
        /// Error code (example: `input.parse_failed`)
        code: String,
    },
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ErrorOutput {
    Codes {
        command: String,
        codes: Vec<ErrorHelpSummary>,
    },
    Explain {
        command: String,
        help: ErrorHelp,
    },
}

pub fn run(args: ErrorArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<ErrorOutput> {
    match args.command {
        ErrorCommand::Codes => Ok((
            ErrorOutput::Codes {
                command: "error.codes".to_string(),
                codes: error::list(),
            },
            0,
        )),
        ErrorCommand::Explain { code } => {
            let Some(code_enum) = error::parse_code(&code) else {
                return Err(textkit::Error::validation_unknown_error_code(code));
            };

            Ok((
                ErrorOutput::Explain {
                    command: "error.explain".to_string(),
                    help: error::explain(code_enum),
                },
                0,
            ))
        }
    }
}
