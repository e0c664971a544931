use clap::{Args, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

use textkit::encoding::{self, DecodeOptions, EncodeOptions};
use textkit::log_status;
use textkit::utils::io;

use super::{CmdResult, Delivery, DeliveryArgs, InputArgs, RawText};

#[derive(Args)]
pub struct Base64Args {
    #[command(subcommand)]
    command: Base64Command,
}

#[derive(Subcommand)]
enum Base64Command {
    /// Encode text or a binary file to Base64
    Encode {
        #[command(flatten)]
        input: InputArgs,

        /// Encode the raw bytes of this file instead of INPUT
        #[arg(long, value_name = "PATH", conflicts_with = "input")]
        binary_file: Option<PathBuf>,

        /// Use the URL-safe alphabet (- and _)
        #[arg(long)]
        url_safe: bool,

        /// Omit trailing = padding
        #[arg(long)]
        no_padding: bool,

        /// Wrap output lines at this length (76 for MIME)
        #[arg(long, default_value_t = 0)]
        wrap: usize,

        /// Emit a data URI with this MIME type
        #[arg(long, value_name = "MIME")]
        data_uri: Option<String>,

        #[command(flatten)]
        delivery: DeliveryArgs,
    },
    /// Decode Base64 (data URIs, URL-safe alphabet and missing padding accepted)
    Decode {
        #[command(flatten)]
        input: InputArgs,

        /// Replace invalid UTF-8 instead of failing
        #[arg(long)]
        lossy: bool,

        /// Write the decoded bytes verbatim to this file
        #[arg(long, value_name = "PATH")]
        binary_output: Option<PathBuf>,

        #[command(flatten)]
        delivery: DeliveryArgs,
    },
}

impl Base64Args {
    pub fn delivery(&self) -> &DeliveryArgs {
        match &self.command {
            Base64Command::Encode { delivery, .. } | Base64Command::Decode { delivery, .. } => {
                delivery
            }
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Base64Output {
    command: String,
    output: String,
    byte_length: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    binary_saved_to: Option<String>,
    #[serde(flatten)]
    delivery: Delivery,
}

impl RawText for Base64Output {
    fn raw_text(&self) -> &str {
        &self.output
    }
}

pub fn run(args: Base64Args, _global: &crate::commands::GlobalArgs) -> CmdResult<Base64Output> {
    match args.command {
        Base64Command::Encode {
            input,
            binary_file,
            url_safe,
            no_padding,
            wrap,
            data_uri,
            delivery,
        } => {
            let bytes = match &binary_file {
                Some(path) => io::read_bytes(path, &format!("read {}", path.display()))?,
                None => input.read()?.into_bytes(),
            };
            let options = EncodeOptions {
                url_safe,
                no_padding,
                wrap,
                data_uri,
            };

            let output = encoding::base64_encode(&bytes, &options);
            let delivery = super::deliver(&output, &delivery)?;

            Ok((
                Base64Output {
                    command: "base64.encode".to_string(),
                    output,
                    byte_length: bytes.len(),
                    mime_type: options.data_uri,
                    binary_saved_to: None,
                    delivery,
                },
                0,
            ))
        }
        Base64Command::Decode {
            input,
            lossy,
            binary_output,
            delivery,
        } => {
            let text = input.read()?;
            // Binary output keeps the exact bytes, so the text view may be lossy.
            let options = DecodeOptions {
                lossy: lossy || binary_output.is_some(),
            };
            let decoded = encoding::base64_decode(&text, &options)?;

            let binary_saved_to = match &binary_output {
                Some(path) => {
                    io::write_file_atomic(path, &decoded.bytes, &format!("write {}", path.display()))?;
                    log_status!("base64", "Wrote {} bytes to {}", decoded.bytes.len(), path.display());
                    Some(path.display().to_string())
                }
                None => None,
            };
            let delivery = super::deliver(&decoded.text, &delivery)?;

            Ok((
                Base64Output {
                    command: "base64.decode".to_string(),
                    output: decoded.text,
                    byte_length: decoded.byte_length,
                    mime_type: decoded.mime_type,
                    binary_saved_to,
                    delivery,
                },
                0,
            ))
        }
    }
}
