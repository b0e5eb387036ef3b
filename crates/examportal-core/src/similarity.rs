//! Answer similarity scoring.
//!
//! The score is the indel-normalized edit-distance ratio between two strings,
//! `2 * M / (len(a) + len(b))`, where `M` is the number of characters kept by a
//! minimal character diff. It is scaled to 0..=100 and rounded half to even.

use similar::{Algorithm, DiffOp, TextDiff};

use crate::error::{PortalError, Result};

/// Score how closely `submitted` matches `reference`, from 0 to 100.
///
/// Case- and whitespace-sensitive. Two empty strings score 100; an empty
/// string against a non-empty one scores 0.
pub fn score(submitted: &str, reference: &str) -> u8 {
    let total = submitted.chars().count() + reference.chars().count();
    if total == 0 {
        return 100;
    }
    let diff = TextDiff::configure()
        .algorithm(Algorithm::Myers)
        .diff_chars(submitted, reference);
    let kept: usize = diff
        .ops()
        .iter()
        .map(|op| match op {
            DiffOp::Equal { len, .. } => *len,
            _ => 0,
        })
        .sum();
    let ratio = 2.0 * kept as f64 / total as f64;
    (ratio * 100.0).round_ties_even().clamp(0.0, 100.0) as u8
}

/// Score each answer against the reference at the same position.
pub fn score_all<S: AsRef<str>, R: AsRef<str>>(answers: &[S], references: &[R]) -> Result<Vec<u8>> {
    if answers.len() != references.len() {
        return Err(PortalError::LengthMismatch {
            what: "answers",
            expected: references.len(),
            actual: answers.len(),
        });
    }
    let scores = answers
        .iter()
        .zip(references)
        .map(|(a, r)| score(a.as_ref(), r.as_ref()))
        .collect::<Vec<_>>();
    tracing::debug!(?scores, "scored answers");
    Ok(scores)
}
