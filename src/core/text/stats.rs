use serde::Serialize;

/// Counters shown next to the text tools' output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TextStats {
    pub characters: usize,
    pub characters_no_spaces: usize,
    pub words: usize,
    pub lines: usize,
    pub sentences: usize,
}

pub fn text_stats(input: &str) -> TextStats {
    if input.is_empty() {
        return TextStats::default();
    }

    TextStats {
        characters: input.chars().count(),
        characters_no_spaces: input.chars().filter(|c| !c.is_whitespace()).count(),
        words: input.split_whitespace().count(),
        lines: input.lines().count().max(1),
        sentences: count_sentences(input),
    }
}

fn count_sentences(input: &str) -> usize {
    let mut count = 0;
    let mut in_terminator = false;
    let mut pending_text = false;

    for c in input.chars() {
        if matches!(c, '.' | '!' | '?') {
            if !in_terminator && pending_text {
                count += 1;
                pending_text = false;
            }
            in_terminator = true;
        } else {
            in_terminator = false;
            if !c.is_whitespace() {
                pending_text = true;
            }
        }
    }

    if pending_text {
        count += 1;
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_has_zero_counts() {
        assert_eq!(text_stats(""), TextStats::default());
    }

    #[test]
    fn counts_words_lines_and_characters() {
        let stats = text_stats("one two\nthree  four\n");
        assert_eq!(stats.words, 4);
        assert_eq!(stats.lines, 2);
        assert_eq!(stats.characters, 20);
        assert_eq!(stats.characters_no_spaces, 15);
    }

    #[test]
    fn terminator_runs_count_once_and_tail_counts() {
        assert_eq!(text_stats("Wait... what?! Yes. and then").sentences, 4);
        assert_eq!(text_stats("...").sentences, 0);
    }
}
