use clap::Args;
use serde::Serialize;

use textkit::log_status;
use textkit::text::{self, EmailExtraction, EmailOptions, Separator};

use super::{CmdResult, Delivery, DeliveryArgs, InputArgs, RawText};

#[derive(Args)]
pub struct EmailArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Keep duplicate addresses
    #[arg(long)]
    keep_duplicates: bool,

    /// Sort addresses alphabetically
    #[arg(long)]
    sort: bool,

    /// Lowercase every address
    #[arg(long)]
    lowercase: bool,

    /// Only addresses at this domain or its subdomains
    #[arg(long)]
    domain: Option<String>,

    /// Join results with: newline, comma, semicolon, space
    #[arg(long, default_value = "newline")]
    separator: String,

    #[command(flatten)]
    pub delivery: DeliveryArgs,
}

#[derive(Debug, Serialize)]
pub struct EmailOutput {
    command: String,
    #[serde(flatten)]
    extraction: EmailExtraction,
    #[serde(flatten)]
    delivery: Delivery,
}

impl RawText for EmailOutput {
    fn raw_text(&self) -> &str {
        &self.extraction.text
    }
}

pub fn run(args: EmailArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<EmailOutput> {
    let options = EmailOptions {
        unique: !args.keep_duplicates,
        sort: args.sort,
        lowercase: args.lowercase,
        domain: args.domain.clone(),
        separator: Separator::parse(&args.separator)?,
    };
    let input = args.input.read()?;

    let extraction = text::extract_emails(&input, &options);
    log_status!(
        "emails",
        "Found {} address(es), kept {}",
        extraction.total_found,
        extraction.count
    );
    let delivery = super::deliver(&extraction.text, &args.delivery)?;

    Ok((
        EmailOutput {
            command: "emails".to_string(),
            extraction,
            delivery,
        },
        0,
    ))
}
