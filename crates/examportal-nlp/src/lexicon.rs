//! Lexicon and suffix-heuristic part-of-speech tagger.
//!
//! Closed-class words (determiners, pronouns, adpositions, conjunctions,
//! auxiliaries, particles, interjections) come from a fixed lexicon. Open
//! classes are guessed from capitalization and suffixes, defaulting to
//! `NOUN`. Tokens that do not look like any word get `X`:
//!
//! - letters mixed with digits (`abc123`)
//! - lowercase letter runs of length four or more with no vowel (`sdfgh`)
//! - characters that are not letters, digits, punctuation, or symbols

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use examportal_core::traits::{PosTag, PosTagger, TaggedToken};

static RE_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\p{N}+(?:[.,]\p{N}+)+|[\p{L}\p{M}\p{N}]+(?:['’\-][\p{L}\p{M}\p{N}]+)*|\S")
        .expect("valid regex")
});
static RE_DECIMAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\p{N}+(?:[.,]\p{N}+)*$").expect("valid regex"));
static RE_PUNCT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\p{P}$").expect("valid regex"));
static RE_SYM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\p{S}$").expect("valid regex"));

static LEXICON: Lazy<HashMap<&'static str, PosTag>> = Lazy::new(|| {
    let classes: [(PosTag, &[&str]); 11] = [
        (
            PosTag::Det,
            &[
                "a", "an", "the", "this", "that", "these", "those", "some", "any", "each",
                "every", "no", "all", "both", "either", "neither", "my", "your", "his", "her",
                "its", "our", "their", "whose", "another", "such",
            ],
        ),
        (
            PosTag::Pron,
            &[
                "i", "me", "you", "he", "him", "she", "it", "we", "us", "they", "them", "myself",
                "yourself", "himself", "herself", "itself", "ourselves", "themselves", "who",
                "whom", "what", "which", "mine", "yours", "hers", "ours", "theirs", "someone",
                "something", "anyone", "anything", "everyone", "everything", "nobody",
                "nothing",
            ],
        ),
        (
            PosTag::Adp,
            &[
                "in", "on", "at", "by", "for", "with", "about", "against", "between", "into",
                "through", "during", "before", "after", "above", "below", "from", "up", "down",
                "of", "off", "over", "under", "than", "since", "without", "within", "along",
                "across", "behind", "beyond", "upon", "via", "per", "among", "around", "like",
            ],
        ),
        (PosTag::Cconj, &["and", "or", "but", "nor", "yet", "plus"]),
        (
            PosTag::Sconj,
            &[
                "because", "although", "though", "while", "if", "unless", "whether", "whereas",
                "until", "so",
            ],
        ),
        (
            PosTag::Aux,
            &[
                "am", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had",
                "having", "do", "does", "did", "will", "would", "shall", "should", "can",
                "could", "may", "might", "must", "isn't", "aren't", "wasn't", "weren't",
                "don't", "doesn't", "didn't", "won't", "wouldn't", "can't", "couldn't",
                "shouldn't", "i'm", "you're", "he's", "she's", "it's", "we're", "they're",
                "that's", "there's", "i've", "you've", "we've", "they've", "i'll", "you'll",
                "he'll", "she'll", "we'll", "they'll", "i'd", "you'd",
            ],
        ),
        (PosTag::Part, &["not", "to", "'s", "n't"]),
        (
            PosTag::Adv,
            &[
                "very", "too", "also", "just", "only", "then", "there", "here", "now", "never",
                "always", "often", "sometimes", "quite", "rather", "really", "almost",
                "already", "still", "even", "again", "soon", "however", "therefore", "thus",
                "hence", "when", "where", "why", "how", "perhaps", "maybe", "well",
            ],
        ),
        (
            PosTag::Intj,
            &["yes", "oh", "ah", "hello", "hi", "hey", "wow", "ok", "okay", "oops", "alas", "please"],
        ),
        (
            PosTag::Num,
            &[
                "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine",
                "ten", "eleven", "twelve", "twenty", "hundred", "thousand", "million", "billion",
            ],
        ),
        (
            PosTag::Adj,
            &[
                "good", "bad", "new", "old", "big", "small", "large", "long", "short", "high",
                "low", "great", "little", "own", "other", "same", "different", "true", "false",
                "right", "wrong", "best", "better", "worse", "worst", "simple", "easy", "hard",
                "fast", "slow", "first", "last", "next",
            ],
        ),
    ];

    let mut lexicon = HashMap::new();
    for (tag, words) in classes {
        for &word in words {
            lexicon.insert(word, tag);
        }
    }
    lexicon
});

const ADJ_SUFFIXES: [&str; 8] = ["ous", "ful", "able", "ible", "ive", "less", "ical", "ish"];
const VERB_SUFFIXES: [&str; 3] = ["ing", "ed", "ize"];

/// Rule-based English tagger with no model files.
#[derive(Debug, Default, Clone, Copy)]
pub struct LexiconTagger;

impl LexiconTagger {
    pub fn new() -> Self {
        Self
    }
}

impl PosTagger for LexiconTagger {
    fn name(&self) -> &str {
        "lexicon"
    }

    fn tag(&self, text: &str) -> Vec<TaggedToken> {
        let mut tokens = Vec::new();
        let mut sentence_start = true;
        for m in RE_TOKEN.find_iter(text) {
            let token = m.as_str();
            let tag = classify(token, sentence_start);
            sentence_start = matches!(token, "." | "!" | "?");
            tokens.push(TaggedToken::new(token, tag));
        }
        tokens
    }
}

fn classify(token: &str, sentence_start: bool) -> PosTag {
    if RE_DECIMAL.is_match(token) {
        return PosTag::Num;
    }

    let has_alnum = token.chars().any(char::is_alphanumeric);
    if !has_alnum {
        if RE_PUNCT.is_match(token) {
            return PosTag::Punct;
        }
        if RE_SYM.is_match(token) {
            return PosTag::Sym;
        }
        return PosTag::X;
    }

    let has_letter = token.chars().any(char::is_alphabetic);
    let has_digit = token.chars().any(char::is_numeric);
    if has_letter && has_digit {
        return PosTag::X;
    }

    let lower = token.to_lowercase().replace('’', "'");
    if let Some(&tag) = LEXICON.get(lower.as_str()) {
        return tag;
    }

    let letters = token.chars().filter(|c| c.is_alphabetic()).count();
    let all_caps = letters >= 2 && !token.chars().any(char::is_lowercase);
    if all_caps {
        return PosTag::Propn;
    }

    if looks_unpronounceable(&lower) {
        return PosTag::X;
    }

    let capitalized = token.chars().next().is_some_and(char::is_uppercase);
    if capitalized && !sentence_start {
        return PosTag::Propn;
    }

    guess_open_class(&lower)
}

/// Four or more ASCII letters with no vowel (counting `y`).
fn looks_unpronounceable(lower: &str) -> bool {
    lower.len() >= 4
        && lower.chars().all(|c| c.is_ascii_alphabetic())
        && !lower.chars().any(|c| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y'))
}

fn guess_open_class(lower: &str) -> PosTag {
    if lower.chars().count() <= 4 {
        return PosTag::Noun;
    }
    if lower.ends_with("ly") {
        return PosTag::Adv;
    }
    if VERB_SUFFIXES.iter().any(|s| lower.ends_with(s)) {
        return PosTag::Verb;
    }
    if ADJ_SUFFIXES.iter().any(|s| lower.ends_with(s)) {
        return PosTag::Adj;
    }
    PosTag::Noun
}
