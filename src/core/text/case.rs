use heck::{
    ToKebabCase, ToLowerCamelCase, ToShoutySnakeCase, ToSnakeCase, ToTrainCase, ToUpperCamelCase,
};
use serde::Serialize;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseMode {
    Upper,
    Lower,
    Title,
    Sentence,
    Alternating,
    Inverse,
    Camel,
    Pascal,
    Snake,
    Kebab,
    Constant,
    Train,
}

impl CaseMode {
    pub const ALL: &'static [CaseMode] = &[
        CaseMode::Upper,
        CaseMode::Lower,
        CaseMode::Title,
        CaseMode::Sentence,
        CaseMode::Alternating,
        CaseMode::Inverse,
        CaseMode::Camel,
        CaseMode::Pascal,
        CaseMode::Snake,
        CaseMode::Kebab,
        CaseMode::Constant,
        CaseMode::Train,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CaseMode::Upper => "upper",
            CaseMode::Lower => "lower",
            CaseMode::Title => "title",
            CaseMode::Sentence => "sentence",
            CaseMode::Alternating => "alternating",
            CaseMode::Inverse => "inverse",
            CaseMode::Camel => "camel",
            CaseMode::Pascal => "pascal",
            CaseMode::Snake => "snake",
            CaseMode::Kebab => "kebab",
            CaseMode::Constant => "constant",
            CaseMode::Train => "train",
        }
    }

    pub fn parse(value: &str) -> Result<Self> {
        let wanted = value.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|mode| mode.as_str() == wanted)
            .ok_or_else(|| {
                Error::validation_invalid_argument(
                    "mode",
                    format!("Unknown case mode '{}'", value),
                    None,
                    Some(Self::ALL.iter().map(|m| m.as_str().to_string()).collect()),
                )
            })
    }
}

/// Convert `input` to the requested case.
pub fn convert_case(input: &str, mode: CaseMode) -> String {
    match mode {
        CaseMode::Upper => input.to_uppercase(),
        CaseMode::Lower => input.to_lowercase(),
        CaseMode::Title => title_case(input),
        CaseMode::Sentence => sentence_case(input),
        CaseMode::Alternating => alternating_case(input),
        CaseMode::Inverse => inverse_case(input),
        CaseMode::Camel => per_line(input, |l| l.to_lower_camel_case()),
        CaseMode::Pascal => per_line(input, |l| l.to_upper_camel_case()),
        CaseMode::Snake => per_line(input, |l| l.to_snake_case()),
        CaseMode::Kebab => per_line(input, |l| l.to_kebab_case()),
        CaseMode::Constant => per_line(input, |l| l.to_shouty_snake_case()),
        CaseMode::Train => per_line(input, |l| l.to_train_case()),
    }
}

/// Identifier cases would otherwise swallow line breaks as word separators.
/// A trailing `\r` is kept so CRLF input stays CRLF.
fn per_line(input: &str, f: impl Fn(&str) -> String) -> String {
    input
        .split('\n')
        .map(|line| match line.strip_suffix('\r') {
            Some(body) => format!("{}\r", f(body)),
            None => f(line),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut at_word_start = true;
    for c in input.chars() {
        if c.is_whitespace() {
            at_word_start = true;
            out.push(c);
        } else if at_word_start {
            out.extend(c.to_uppercase());
            at_word_start = false;
        } else {
            out.extend(c.to_lowercase());
        }
    }
    out
}

fn sentence_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut capitalize_next = true;
    let mut after_terminator = false;

    for c in input.chars() {
        if after_terminator && c.is_whitespace() {
            capitalize_next = true;
        }
        after_terminator = matches!(c, '.' | '!' | '?') || (after_terminator && c.is_whitespace());

        if capitalize_next && c.is_alphabetic() {
            out.extend(c.to_uppercase());
            capitalize_next = false;
        } else {
            out.extend(c.to_lowercase());
        }
    }
    out
}

fn alternating_case(input: &str) -> String {
    let mut upper = false;
    input
        .chars()
        .flat_map(|c| {
            let mapped: Vec<char> = if !c.is_alphabetic() {
                vec![c]
            } else if upper {
                c.to_uppercase().collect()
            } else {
                c.to_lowercase().collect()
            };
            if c.is_alphabetic() {
                upper = !upper;
            }
            mapped
        })
        .collect()
}

fn inverse_case(input: &str) -> String {
    input
        .chars()
        .flat_map(|c| -> Vec<char> {
            if c.is_uppercase() {
                c.to_lowercase().collect()
            } else if c.is_lowercase() {
                c.to_uppercase().collect()
            } else {
                vec![c]
            }
        })
        .collect()
}
