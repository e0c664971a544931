use clap::{Args, Subcommand, ValueEnum};
use serde::Serialize;

use textkit::encoding::{self, QueryParam, UrlMode};

use super::{CmdResult, Delivery, DeliveryArgs, InputArgs, RawText};

#[derive(Args)]
pub struct UrlArgs {
    #[command(subcommand)]
    command: UrlCommand,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    /// A single query value or path segment
    Component,
    /// A whole URL (reserved delimiters kept)
    Full,
    /// Form data (space as +)
    Form,
}

impl From<ModeArg> for UrlMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Component => UrlMode::Component,
            ModeArg::Full => UrlMode::Full,
            ModeArg::Form => UrlMode::Form,
        }
    }
}

#[derive(Subcommand)]
enum UrlCommand {
    /// Percent-encode text
    Encode {
        #[command(flatten)]
        input: InputArgs,
        #[arg(long, value_enum, default_value = "component")]
        mode: ModeArg,
        #[command(flatten)]
        delivery: DeliveryArgs,
    },
    /// Decode percent-encoded text
    Decode {
        #[command(flatten)]
        input: InputArgs,
        #[arg(long, value_enum, default_value = "component")]
        mode: ModeArg,
        #[command(flatten)]
        delivery: DeliveryArgs,
    },
    /// Split a query string or URL into decoded key/value pairs
    Parse {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        delivery: DeliveryArgs,
    },
}

impl UrlArgs {
    pub fn delivery(&self) -> &DeliveryArgs {
        match &self.command {
            UrlCommand::Encode { delivery, .. }
            | UrlCommand::Decode { delivery, .. }
            | UrlCommand::Parse { delivery, .. } => delivery,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UrlOutput {
    command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    mode: Option<UrlMode>,
    output: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    params: Option<Vec<QueryParam>>,
    #[serde(flatten)]
    delivery: Delivery,
}

impl RawText for UrlOutput {
    fn raw_text(&self) -> &str {
        &self.output
    }
}

pub fn run(args: UrlArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<UrlOutput> {
    let (command, mode, output, params, delivery_args) = match args.command {
        UrlCommand::Encode {
            input,
            mode,
            delivery,
        } => {
            let mode = UrlMode::from(mode);
            let output = encoding::url_encode(&input.read()?, mode);
            ("url.encode", Some(mode), output, None, delivery)
        }
        UrlCommand::Decode {
            input,
            mode,
            delivery,
        } => {
            let mode = UrlMode::from(mode);
            let output = encoding::url_decode(&input.read()?, mode)?;
            ("url.decode", Some(mode), output, None, delivery)
        }
        UrlCommand::Parse { input, delivery } => {
            let params = encoding::url_parse_query(&input.read()?)?;
            let output = params
                .iter()
                .map(|p| format!("{}={}", p.key, p.value))
                .collect::<Vec<_>>()
                .join("\n");
            ("url.parse", None, output, Some(params), delivery)
        }
    };

    let delivery = super::deliver(&output, &delivery_args)?;

    Ok((
        UrlOutput {
            command: command.to_string(),
            mode,
            output,
            params,
            delivery,
        },
        0,
    ))
}
