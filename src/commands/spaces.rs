use clap::Args;
use serde::Serialize;

use textkit::text::{self, SpaceOptions};

use super::{CmdResult, Delivery, DeliveryArgs, InputArgs, RawText};

/// With no switches, runs of spaces are collapsed and lines are trimmed.
#[derive(Args)]
pub struct SpacesArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Replace tabs with single spaces
    #[arg(long)]
    tabs: bool,

    /// Trim leading and trailing whitespace on every line
    #[arg(long)]
    trim: bool,

    /// Collapse runs of spaces and tabs into one space
    #[arg(long)]
    collapse: bool,

    /// Drop blank lines
    #[arg(long)]
    remove_empty_lines: bool,

    /// Join all lines with single spaces
    #[arg(long)]
    remove_line_breaks: bool,

    /// Delete every whitespace character
    #[arg(long)]
    all: bool,

    #[command(flatten)]
    pub delivery: DeliveryArgs,
}

#[derive(Debug, Serialize)]
pub struct SpacesOutput {
    command: String,
    output: String,
    removed: usize,
    #[serde(flatten)]
    delivery: Delivery,
}

impl RawText for SpacesOutput {
    fn raw_text(&self) -> &str {
        &self.output
    }
}

pub fn run(args: SpacesArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<SpacesOutput> {
    let input = args.input.read()?;
    let options = SpaceOptions {
        tabs_to_spaces: args.tabs,
        trim_lines: args.trim,
        collapse: args.collapse,
        remove_empty_lines: args.remove_empty_lines,
        remove_line_breaks: args.remove_line_breaks,
        remove_all: args.all,
    };

    let result = text::remove_spaces(&input, options);
    let delivery = super::deliver(&result.output, &args.delivery)?;

    Ok((
        SpacesOutput {
            command: "spaces".to_string(),
            output: result.output,
            removed: result.removed,
            delivery,
        },
        0,
    ))
}
