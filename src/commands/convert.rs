use clap::{Args, Subcommand};
use serde::Serialize;

use textkit::convert::{self, ConvertOptions, Direction};
use textkit::defaults;
use textkit::log_status;

use super::{CmdResult, Delivery, DeliveryArgs, InputArgs, RawText};

#[derive(Args)]
pub struct ConvertArgs {
    #[command(subcommand)]
    command: ConvertCommand,
}

#[derive(Subcommand)]
enum ConvertCommand {
    /// Convert JSON to YAML
    JsonToYaml(ConvertInput),
    /// Convert YAML to JSON
    YamlToJson(ConvertInput),
    /// Convert XML to JSON
    XmlToJson(ConvertInput),
    /// Convert JSON to XML
    JsonToXml(ConvertInput),
}

#[derive(Args)]
struct ConvertInput {
    #[command(flatten)]
    input: InputArgs,

    /// Spaces per indent level of the output (JSON: 0 minifies)
    #[arg(long)]
    indent: Option<usize>,

    /// Omit the <?xml ...?> declaration (json-to-xml)
    #[arg(long)]
    no_declaration: bool,

    #[command(flatten)]
    delivery: DeliveryArgs,
}

impl ConvertArgs {
    pub fn delivery(&self) -> &DeliveryArgs {
        let (_, input) = self.split();
        &input.delivery
    }

    fn split(&self) -> (Direction, &ConvertInput) {
        match &self.command {
            ConvertCommand::JsonToYaml(args) => (Direction::JsonToYaml, args),
            ConvertCommand::YamlToJson(args) => (Direction::YamlToJson, args),
            ConvertCommand::XmlToJson(args) => (Direction::XmlToJson, args),
            ConvertCommand::JsonToXml(args) => (Direction::JsonToXml, args),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ConvertOutput {
    command: String,
    direction: Direction,
    output: String,
    #[serde(flatten)]
    delivery: Delivery,
}

impl RawText for ConvertOutput {
    fn raw_text(&self) -> &str {
        &self.output
    }
}

pub fn run(args: ConvertArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<ConvertOutput> {
    let (direction, input_args) = args.split();
    let input = input_args.input.read()?;
    let options = options_for(direction, input_args);

    log_status!("convert", "{} ({} bytes)", direction.as_str(), input.len());
    let output = convert::convert(&input, direction, &options)?;
    let delivery = super::deliver(&output, &input_args.delivery)?;

    Ok((
        ConvertOutput {
            command: format!("convert.{}", direction.as_str()),
            direction,
            output,
            delivery,
        },
        0,
    ))
}

/// Configured defaults, with `--indent` applied to the output format only.
fn options_for(direction: Direction, args: &ConvertInput) -> ConvertOptions {
    let mut options = ConvertOptions::from(&defaults::load_defaults().convert);

    if let Some(indent) = args.indent {
        match direction {
            Direction::JsonToYaml => options.yaml_indent = indent,
            Direction::YamlToJson | Direction::XmlToJson => options.json_indent = indent,
            Direction::JsonToXml => options.xml_indent = indent,
        }
    }
    if args.no_declaration {
        options.xml_declaration = false;
    }

    options
}
