//! Performance recording.
//!
//! Combines per-question scores into one record per (subject, student),
//! persists it, and folds the similarity scores into the subject aggregate.
//!
//! Re-submission by the same student replaces the earlier record with no
//! history kept, while the aggregate counts the student again. Both are
//! current behavior, not a guarantee.

use serde::{Deserialize, Serialize};

use crate::aggregate::update_aggregate;
use crate::error::{PortalError, Result};
use crate::model::{validate_identifier, OverallAggregate, PerformanceRecord, QuestionScore};
use crate::store::PortalStore;

/// What `record` stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordOutcome {
    pub record: PerformanceRecord,
    pub aggregate: OverallAggregate,
}

/// Build and persist a performance record, then update the aggregate.
///
/// Fails with a validation error, writing nothing, when the score and
/// grammar-count sequences differ in length. Also writes nothing when the
/// subject's aggregate file has rows that cannot be parsed.
pub fn record(
    store: &PortalStore,
    student_id: &str,
    subject: &str,
    similarity_scores: &[u8],
    grammar_counts: &[usize],
) -> Result<RecordOutcome> {
    validate_identifier("subject", subject)?;
    validate_identifier("student", student_id)?;
    if similarity_scores.len() != grammar_counts.len() {
        return Err(PortalError::LengthMismatch {
            what: "grammar counts",
            expected: similarity_scores.len(),
            actual: grammar_counts.len(),
        });
    }
    if let Some(bad) = similarity_scores.iter().find(|&&s| s > 100) {
        return Err(PortalError::Validation(format!(
            "similarity score {bad} is outside 0..=100"
        )));
    }

    let record = PerformanceRecord {
        subject: subject.to_string(),
        student: student_id.to_string(),
        questions: similarity_scores
            .iter()
            .zip(grammar_counts)
            .map(|(&plagiarism, &grammar_errors)| QuestionScore {
                plagiarism,
                grammar_errors,
            })
            .collect(),
    };

    let aggregate_rows = store.load_aggregates(subject)?.unreadable_rows();
    if aggregate_rows > 0 {
        return Err(PortalError::UnreadableAggregate {
            path: store.aggregate_path(subject)?,
            rows: aggregate_rows,
        });
    }

    match store.load_performance(subject, student_id) {
        Ok(Some(_)) => tracing::warn!(
            subject,
            student = student_id,
            "overwriting existing performance record"
        ),
        Ok(None) => {}
        Err(e) => tracing::warn!(
            subject,
            student = student_id,
            "overwriting unreadable performance record: {e}"
        ),
    }
    store.write_performance(&record)?;

    let aggregate = update_aggregate(store, subject, similarity_scores)?;
    tracing::info!(
        subject,
        student = student_id,
        questions = record.questions.len(),
        total = record.total_plagiarism(),
        "recorded performance"
    );

    Ok(RecordOutcome { record, aggregate })
}
