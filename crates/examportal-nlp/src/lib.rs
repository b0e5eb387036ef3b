//! examportal-nlp: part-of-speech tagger implementations.
//!
//! Implements the `PosTagger` trait used by grammar-error counting: a
//! rule-based English tagger for real use and a scripted tagger for tests.

pub mod lexicon;
pub mod mock;

pub use lexicon::LexiconTagger;
pub use mock::FixedTagger;

use examportal_core::config::TaggerKind;
use examportal_core::traits::PosTagger;

/// Create a tagger instance from its configured kind.
pub fn create_tagger(kind: TaggerKind) -> Box<dyn PosTagger> {
    let tagger: Box<dyn PosTagger> = match kind {
        TaggerKind::Lexicon => Box::new(LexiconTagger::new()),
    };
    tracing::debug!(tagger = tagger.name(), "created tagger");
    tagger
}
