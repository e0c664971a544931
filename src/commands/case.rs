use clap::Args;
use serde::Serialize;

use textkit::text::{self, CaseMode, TextStats};

use super::{CmdResult, Delivery, DeliveryArgs, InputArgs, RawText};

#[derive(Args)]
pub struct CaseArgs {
    /// Target case: upper, lower, title, sentence, alternating, inverse,
    /// camel, pascal, snake, kebab, constant, train
    mode: String,

    #[command(flatten)]
    input: InputArgs,

    #[command(flatten)]
    pub delivery: DeliveryArgs,
}

#[derive(Debug, Serialize)]
pub struct CaseOutput {
    command: String,
    mode: CaseMode,
    output: String,
    stats: TextStats,
    #[serde(flatten)]
    delivery: Delivery,
}

impl RawText for CaseOutput {
    fn raw_text(&self) -> &str {
        &self.output
    }
}

pub fn run(args: CaseArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<CaseOutput> {
    let mode = CaseMode::parse(&args.mode)?;
    let input = args.input.read()?;

    let output = text::convert_case(&input, mode);
    let delivery = super::deliver(&output, &args.delivery)?;

    Ok((
        CaseOutput {
            command: "case".to_string(),
            mode,
            stats: text::text_stats(&input),
            output,
            delivery,
        },
        0,
    ))
}
