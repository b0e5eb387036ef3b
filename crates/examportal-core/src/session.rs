//! Exam sessions.
//!
//! An [`ExamSession`] holds the question set for one open exam and scores
//! submissions against it. Callers open one explicitly and pass it around;
//! there is no process-wide "current exam".

use crate::error::{PortalError, Result};
use crate::grammar::count_errors_all;
use crate::model::{QuestionSet, Submission};
use crate::recorder::{record, RecordOutcome};
use crate::similarity::score_all;
use crate::store::PortalStore;
use crate::traits::PosTagger;

/// One open exam.
#[derive(Debug, Clone)]
pub struct ExamSession {
    question_set: QuestionSet,
}

impl ExamSession {
    pub fn new(question_set: QuestionSet) -> Result<Self> {
        question_set.validate()?;
        Ok(Self { question_set })
    }

    /// Open the exam for `subject` from its published question set.
    pub fn open(store: &PortalStore, subject: &str) -> Result<Self> {
        let question_set = store
            .load_question_set(subject)?
            .ok_or_else(|| PortalError::NoQuestionSet(subject.to_string()))?;
        Self::new(question_set)
    }

    pub fn subject(&self) -> &str {
        &self.question_set.subject
    }

    pub fn question_set(&self) -> &QuestionSet {
        &self.question_set
    }

    /// Score a submission and record the result.
    ///
    /// The answer count is checked before anything is written. Then the raw
    /// answers are saved, each answer is scored for similarity and grammar
    /// errors, and the performance record and aggregate are persisted.
    pub fn submit(
        &self,
        store: &PortalStore,
        tagger: &dyn PosTagger,
        submission: &Submission,
    ) -> Result<RecordOutcome> {
        submission.check_aligned(&self.question_set)?;
        store.save_answers(self.subject(), submission)?;

        let similarity = score_all(
            &submission.answers,
            &self.question_set.reference_answers(),
        )?;
        let grammar = count_errors_all(tagger, &submission.answers);

        record(
            store,
            &submission.student_id,
            self.subject(),
            &similarity,
            &grammar,
        )
    }
}
