//! Per-subject running totals.
//!
//! The aggregate file is treated as a table keyed by subject. Lookups go by
//! subject value, never by row position, so a table holding rows for several
//! subjects updates the right one.

use std::collections::BTreeMap;

use crate::error::{PortalError, Result};
use crate::model::{validate_identifier, OverallAggregate};
use crate::store::PortalStore;

/// Aggregates keyed by subject.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateTable {
    rows: BTreeMap<String, OverallAggregate>,
    unreadable: usize,
}

impl AggregateTable {
    pub fn get(&self, subject: &str) -> Option<&OverallAggregate> {
        self.rows.get(subject)
    }

    /// The entry for `subject`, created as `{0, 0}` if absent.
    pub fn entry(&mut self, subject: &str) -> &mut OverallAggregate {
        self.rows
            .entry(subject.to_string())
            .or_insert_with(|| OverallAggregate::empty(subject))
    }

    /// Add a row read from disk. Duplicate subjects are summed.
    pub fn merge_row(&mut self, row: OverallAggregate) {
        match self.rows.get_mut(&row.subject) {
            Some(existing) => {
                tracing::warn!(subject = %row.subject, "duplicate aggregate row, summing");
                existing.total_students += row.total_students;
                existing.total_plagiarism_score += row.total_plagiarism_score;
            }
            None => {
                self.rows.insert(row.subject.clone(), row);
            }
        }
    }

    /// Count a row from disk that could not be parsed.
    pub fn mark_unreadable(&mut self) {
        self.unreadable += 1;
    }

    /// Rows skipped when the table was loaded. Writing such a table back
    /// would drop them.
    pub fn unreadable_rows(&self) -> usize {
        self.unreadable
    }

    pub fn iter(&self) -> impl Iterator<Item = &OverallAggregate> {
        self.rows.values()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Fold one student's similarity scores into the subject's aggregate.
///
/// Loads the table (empty if the file is missing), bumps the student count,
/// adds the summed scores, and writes the table back, all under the
/// subject lock. A table with unreadable rows is left untouched and
/// reported as [`PortalError::UnreadableAggregate`].
pub fn update_aggregate(
    store: &PortalStore,
    subject: &str,
    similarity_scores: &[u8],
) -> Result<OverallAggregate> {
    validate_identifier("subject", subject)?;
    store.with_subject_lock(subject, || {
        let mut table = store.load_aggregates(subject)?;
        if table.unreadable_rows() > 0 {
            return Err(PortalError::UnreadableAggregate {
                path: store.aggregate_path(subject)?,
                rows: table.unreadable_rows(),
            });
        }
        let entry = table.entry(subject);
        entry.add_student(similarity_scores);
        let updated = entry.clone();
        store.save_aggregates(subject, &table)?;

        tracing::info!(
            subject,
            total_students = updated.total_students,
            total_plagiarism_score = updated.total_plagiarism_score,
            "updated aggregate"
        );
        Ok(updated)
    })
}
