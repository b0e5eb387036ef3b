//! Scripted tagger for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use examportal_core::traits::{PosTag, PosTagger, TaggedToken};

/// A tagger that splits on whitespace and looks every word up in a fixed
/// table, for exercising the scoring pipeline without the heuristics.
pub struct FixedTagger {
    /// Map of word → tag.
    tags: HashMap<String, PosTag>,
    /// Tag for words not in the table.
    default_tag: PosTag,
    /// Number of calls made.
    call_count: AtomicU32,
    /// Last text received.
    last_text: Mutex<Option<String>>,
}

impl FixedTagger {
    /// Create a tagger with the given word→tag mappings; other words are nouns.
    pub fn new(tags: HashMap<String, PosTag>) -> Self {
        Self {
            tags,
            default_tag: PosTag::Noun,
            call_count: AtomicU32::new(0),
            last_text: Mutex::new(None),
        }
    }

    /// Create a tagger that gives every word the same tag.
    pub fn with_fixed_tag(tag: PosTag) -> Self {
        Self {
            tags: HashMap::new(),
            default_tag: tag,
            call_count: AtomicU32::new(0),
            last_text: Mutex::new(None),
        }
    }

    /// Get the number of calls made to this tagger.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Get the last text passed to this tagger.
    pub fn last_text(&self) -> Option<String> {
        self.last_text
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl PosTagger for FixedTagger {
    fn name(&self) -> &str {
        "fixed"
    }

    fn tag(&self, text: &str) -> Vec<TaggedToken> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self
            .last_text
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(text.to_string());

        text.split_whitespace()
            .map(|word| {
                let tag = self.tags.get(word).copied().unwrap_or(self.default_tag);
                TaggedToken::new(word, tag)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use examportal_core::grammar::count_errors;

    #[test]
    fn fixed_tag() {
        let tagger = FixedTagger::with_fixed_tag(PosTag::X);
        assert_eq!(count_errors(&tagger, "every word counts"), 3);
        assert_eq!(tagger.call_count(), 1);
        assert_eq!(tagger.last_text().as_deref(), Some("every word counts"));
    }

    #[test]
    fn table_lookup() {
        let mut table = HashMap::new();
        table.insert("teh".to_string(), PosTag::X);
        let tagger = FixedTagger::new(table);
        assert_eq!(count_errors(&tagger, "teh cat sat on teh mat"), 2);
    }

    #[test]
    fn empty_text_skips_tagger() {
        let tagger = FixedTagger::with_fixed_tag(PosTag::X);
        assert_eq!(count_errors(&tagger, ""), 0);
        assert_eq!(tagger.call_count(), 0);
    }
}
