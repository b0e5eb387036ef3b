//! Analytics over persisted exam data.
//!
//! Reads what the recorder wrote and computes the per-student figures the
//! analytics view charts. Rendering is left to the caller.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{OverallAggregate, PerformanceRecord, QuestionSet};
use crate::store::PortalStore;

/// Per-student summary of one performance record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentStats {
    pub student: String,
    /// Mean similarity across the student's questions.
    pub average_plagiarism: f64,
    /// Summed similarity across the student's questions.
    pub total_plagiarism: u64,
    pub total_grammar_errors: usize,
    pub record: PerformanceRecord,
}

impl From<PerformanceRecord> for StudentStats {
    fn from(record: PerformanceRecord) -> Self {
        Self {
            student: record.student.clone(),
            average_plagiarism: record.average_plagiarism(),
            total_plagiarism: record.total_plagiarism(),
            total_grammar_errors: record.total_grammar_errors(),
            record,
        }
    }
}

/// Everything known about one subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectDashboard {
    pub subject: String,
    pub question_set: Option<QuestionSet>,
    pub students: Vec<StudentStats>,
    pub aggregate: Option<OverallAggregate>,
}

impl SubjectDashboard {
    pub fn has_data(&self) -> bool {
        self.question_set.is_some() || !self.students.is_empty() || self.aggregate.is_some()
    }

    /// Mean of the per-question similarity averages, one per question index.
    pub fn per_question_average(&self) -> Vec<f64> {
        let width = self
            .students
            .iter()
            .map(|s| s.record.questions.len())
            .max()
            .unwrap_or(0);
        (0..width)
            .map(|i| {
                let scores: Vec<f64> = self
                    .students
                    .iter()
                    .filter_map(|s| s.record.questions.get(i))
                    .map(|q| f64::from(q.plagiarism))
                    .collect();
                if scores.is_empty() {
                    0.0
                } else {
                    scores.iter().sum::<f64>() / scores.len() as f64
                }
            })
            .collect()
    }
}

/// Loads dashboards from a store.
pub struct DashboardReader<'a> {
    store: &'a PortalStore,
}

impl<'a> DashboardReader<'a> {
    pub fn new(store: &'a PortalStore) -> Self {
        Self { store }
    }

    /// Load the dashboard for a subject, optionally narrowed to one student.
    pub fn load(&self, subject: &str, student: Option<&str>) -> Result<SubjectDashboard> {
        let question_set = self.store.load_question_set(subject)?;

        let records = match student {
            Some(id) => self
                .store
                .load_performance(subject, id)?
                .into_iter()
                .collect(),
            None => self.store.load_all_performance(subject)?,
        };

        let aggregate = self.store.load_aggregates(subject)?.get(subject).cloned();

        Ok(SubjectDashboard {
            subject: subject.to_string(),
            question_set,
            students: records.into_iter().map(StudentStats::from).collect(),
            aggregate,
        })
    }

    /// Dashboards for every subject in the store.
    pub fn load_all(&self) -> Result<Vec<SubjectDashboard>> {
        self.store
            .list_subjects()?
            .iter()
            .map(|s| self.load(s, None))
            .collect()
    }
}
