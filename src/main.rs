use clap::{Parser, Subcommand};

use commands::GlobalArgs;

#[derive(Debug, Clone, Copy)]
enum ResponseMode {
    Json,
    Raw,
}

mod commands;
mod output;
mod tty;

use commands::{audit, base64, case, config, convert, email, error, spaces, url};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "textkit")]
#[command(version = VERSION)]
#[command(about = "Format converters, text tools, encoders and a terminology auditor for tool pages")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert between JSON, YAML and XML
    Convert(convert::ConvertArgs),
    /// Change the case of text
    Case(case::CaseArgs),
    /// Remove or normalize whitespace
    Spaces(spaces::SpacesArgs),
    /// Extract email addresses from text
    Emails(email::EmailArgs),
    /// Base64 encode and decode
    Base64(base64::Base64Args),
    /// URL percent-encoding
    Url(url::UrlArgs),
    /// Audit tool pages for terminology from other tools
    Audit(audit::AuditArgs),
    /// Manage global textkit configuration
    Config(config::ConfigArgs),
    /// List and explain error codes
    Error(error::ErrorArgs),
}

fn response_mode(command: &Commands) -> ResponseMode {
    if commands::wants_raw(command) {
        ResponseMode::Raw
    } else {
        ResponseMode::Json
    }
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let global = GlobalArgs {};

    match response_mode(&cli.command) {
        ResponseMode::Raw => match commands::run_raw(cli.command, &global) {
            Ok((content, exit_code)) => {
                if let Err(err) = output::print_raw(&content) {
                    let _ = output::print_result::<serde_json::Value>(Err(err));
                    return std::process::ExitCode::from(1);
                }
                std::process::ExitCode::from(exit_code_to_u8(exit_code))
            }
            Err(err) => {
                let exit_code = output::exit_code_for_error(err.code);
                let _ = output::print_result::<serde_json::Value>(Err(err));
                std::process::ExitCode::from(exit_code_to_u8(exit_code))
            }
        },
        ResponseMode::Json => {
            let (json_result, exit_code) = commands::run_json(cli.command, &global);
            if output::print_json_result(json_result).is_err() {
                return std::process::ExitCode::from(1);
            }
            std::process::ExitCode::from(exit_code_to_u8(exit_code))
        }
    }
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
