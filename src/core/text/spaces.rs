use serde::Serialize;

/// Whitespace cleanup switches. With nothing set, `collapse` and
/// `trim_lines` are applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpaceOptions {
    pub tabs_to_spaces: bool,
    pub trim_lines: bool,
    pub collapse: bool,
    pub remove_empty_lines: bool,
    pub remove_line_breaks: bool,
    pub remove_all: bool,
}

impl SpaceOptions {
    fn is_empty(&self) -> bool {
        *self == SpaceOptions::default()
    }

    fn effective(self) -> Self {
        if self.is_empty() {
            SpaceOptions {
                trim_lines: true,
                collapse: true,
                ..SpaceOptions::default()
            }
        } else {
            self
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SpaceResult {
    pub output: String,
    pub removed: usize,
}

pub fn remove_spaces(input: &str, options: SpaceOptions) -> SpaceResult {
    let options = options.effective();
    let output = if options.remove_all {
        input.chars().filter(|c| !c.is_whitespace()).collect()
    } else {
        apply_line_options(input, options)
    };

    let removed = input.chars().count().saturating_sub(output.chars().count());
    SpaceResult { output, removed }
}

fn apply_line_options(input: &str, options: SpaceOptions) -> String {
    let mut text = input.replace("\r\n", "\n");

    if options.tabs_to_spaces {
        text = text.replace('\t', " ");
    }

    let mut lines: Vec<String> = text.split('\n').map(str::to_string).collect();

    if options.trim_lines || options.remove_line_breaks {
        lines = lines.into_iter().map(|l| l.trim().to_string()).collect();
    }

    if options.collapse {
        lines = lines.into_iter().map(|l| collapse_runs(&l)).collect();
    }

    if options.remove_empty_lines || options.remove_line_breaks {
        lines.retain(|l| !l.trim().is_empty());
    }

    if options.remove_line_breaks {
        lines.join(" ")
    } else {
        lines.join("\n")
    }
}

/// Collapse runs of spaces/tabs into a single space.
fn collapse_runs(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut in_run = false;
    for c in line.chars() {
        if c == ' ' || c == '\t' {
            if !in_run {
                out.push(' ');
            }
            in_run = true;
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_collapses_and_trims() {
        let result = remove_spaces("  hello   world \n\tnext\t\tline  ", SpaceOptions::default());
        assert_eq!(result.output, "hello world\nnext line");
        assert_eq!(result.removed, 9);
    }

    #[test]
    fn remove_all_strips_every_whitespace_char() {
        let options = SpaceOptions {
            remove_all: true,
            collapse: true,
            ..SpaceOptions::default()
        };
        let result = remove_spaces("a b\tc\nd \r\n e", options);
        assert_eq!(result.output, "abcde");
    }

    #[test]
    fn remove_empty_lines_keeps_content_lines() {
        let options = SpaceOptions {
            remove_empty_lines: true,
            ..SpaceOptions::default()
        };
        let result = remove_spaces("one\n\n   \ntwo\n", options);
        assert_eq!(result.output, "one\ntwo");
    }

    #[test]
    fn remove_line_breaks_joins_with_single_space() {
        let options = SpaceOptions {
            remove_line_breaks: true,
            ..SpaceOptions::default()
        };
        let result = remove_spaces("first  \r\n  second\n\nthird", options);
        assert_eq!(result.output, "first second third");
    }

    #[test]
    fn tabs_to_spaces_alone_keeps_runs() {
        let options = SpaceOptions {
            tabs_to_spaces: true,
            ..SpaceOptions::default()
        };
        let result = remove_spaces("a\t\tb", options);
        assert_eq!(result.output, "a  b");
        assert_eq!(result.removed, 0);
    }
}
