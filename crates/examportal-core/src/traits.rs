//! Core trait definitions for the NLP collaborator.
//!
//! The tagger is an opaque tokenizer + part-of-speech tagger. Implementations
//! live in the `examportal-nlp` crate.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Part-of-speech tags
// ---------------------------------------------------------------------------

/// Universal part-of-speech tags, plus `Space` for whitespace tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PosTag {
    Adj,
    Adp,
    Adv,
    Aux,
    Cconj,
    Det,
    Intj,
    Noun,
    Num,
    Part,
    Pron,
    Propn,
    Punct,
    Sconj,
    Sym,
    Verb,
    /// Catch-all for tokens the tagger could not assign a category.
    X,
    Space,
}

impl PosTag {
    /// The conventional upper-case label (e.g. `"NOUN"`).
    pub fn label(&self) -> &'static str {
        match self {
            PosTag::Adj => "ADJ",
            PosTag::Adp => "ADP",
            PosTag::Adv => "ADV",
            PosTag::Aux => "AUX",
            PosTag::Cconj => "CCONJ",
            PosTag::Det => "DET",
            PosTag::Intj => "INTJ",
            PosTag::Noun => "NOUN",
            PosTag::Num => "NUM",
            PosTag::Part => "PART",
            PosTag::Pron => "PRON",
            PosTag::Propn => "PROPN",
            PosTag::Punct => "PUNCT",
            PosTag::Sconj => "SCONJ",
            PosTag::Sym => "SYM",
            PosTag::Verb => "VERB",
            PosTag::X => "X",
            PosTag::Space => "SPACE",
        }
    }
}

impl fmt::Display for PosTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A token with its assigned tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedToken {
    pub text: String,
    pub tag: PosTag,
}

impl TaggedToken {
    pub fn new(text: impl Into<String>, tag: PosTag) -> Self {
        Self {
            text: text.into(),
            tag,
        }
    }
}

// ---------------------------------------------------------------------------
// Tagger trait
// ---------------------------------------------------------------------------

/// Tokenizes text and assigns a part-of-speech tag to every token.
pub trait PosTagger: Send + Sync {
    /// Human-readable tagger name (e.g. "lexicon").
    fn name(&self) -> &str;

    /// Tokenize and tag `text`. Empty input yields no tokens.
    fn tag(&self, text: &str) -> Vec<TaggedToken>;
}
