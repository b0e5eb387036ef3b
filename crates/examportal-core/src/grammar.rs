//! Grammar-error counting.
//!
//! This is a coarse heuristic, not grammar checking: the "error count" is the
//! number of tokens the tagger put in the catch-all [`PosTag::X`] category.
//! Misspellings and gibberish tend to land there; real grammatical mistakes
//! made of valid words do not.

use crate::traits::{PosTag, PosTagger};

/// Count tokens in `text` tagged as unrecognized.
pub fn count_errors(tagger: &dyn PosTagger, text: &str) -> usize {
    if text.is_empty() {
        return 0;
    }
    tagger
        .tag(text)
        .iter()
        .filter(|t| t.tag == PosTag::X)
        .count()
}

/// Count errors for each answer in order.
pub fn count_errors_all<S: AsRef<str>>(tagger: &dyn PosTagger, answers: &[S]) -> Vec<usize> {
    let counts: Vec<usize> = answers
        .iter()
        .map(|a| count_errors(tagger, a.as_ref()))
        .collect();
    tracing::debug!(tagger = tagger.name(), ?counts, "counted grammar errors");
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::TaggedToken;

    /// Tags every whitespace-separated word starting with `?` as X.
    struct MarkerTagger;

    impl PosTagger for MarkerTagger {
        fn name(&self) -> &str {
            "marker"
        }

        fn tag(&self, text: &str) -> Vec<TaggedToken> {
            text.split_whitespace()
                .map(|w| {
                    let tag = if w.starts_with('?') {
                        PosTag::X
                    } else {
                        PosTag::Noun
                    };
                    TaggedToken::new(w, tag)
                })
                .collect()
        }
    }

    #[test]
    fn empty_text_has_no_errors() {
        assert_eq!(count_errors(&MarkerTagger, ""), 0);
    }

    #[test]
    fn counts_only_x_tags() {
        assert_eq!(count_errors(&MarkerTagger, "valid ?bad words ?worse"), 2);
        assert_eq!(count_errors(&MarkerTagger, "all fine here"), 0);
    }

    #[test]
    fn counts_per_answer() {
        let counts = count_errors_all(&MarkerTagger, &["?a b", "", "?x ?y ?z"]);
        assert_eq!(counts, vec![1, 0, 3]);
    }
}
