//! Core data model types for examportal.
//!
//! Question sets are published by faculty, submissions come from students,
//! and performance records and aggregates are what scoring produces.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{PortalError, Result};

/// Exam session label chosen by faculty. Not a concurrency concept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Session {
    Morning,
    Afternoon,
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Session::Morning => write!(f, "Morning"),
            Session::Afternoon => write!(f, "Afternoon"),
        }
    }
}

impl FromStr for Session {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "morning" | "am" => Ok(Session::Morning),
            "afternoon" | "pm" => Ok(Session::Afternoon),
            other => Err(format!("unknown session: {other}")),
        }
    }
}

/// One question with its reference answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// The question text shown to students.
    pub text: String,
    /// The answer submissions are compared against.
    pub reference_answer: String,
}

/// An ordered set of questions for one subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionSet {
    pub subject: String,
    pub date: NaiveDate,
    pub session: Session,
    pub questions: Vec<Question>,
}

impl QuestionSet {
    /// Number of questions in the set.
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Reference answers in question order.
    pub fn reference_answers(&self) -> Vec<&str> {
        self.questions
            .iter()
            .map(|q| q.reference_answer.as_str())
            .collect()
    }

    /// Check the set can be published: valid subject and at least one question.
    pub fn validate(&self) -> Result<()> {
        validate_identifier("subject", &self.subject)?;
        if self.questions.is_empty() {
            return Err(PortalError::Validation(format!(
                "question set for {} has no questions",
                self.subject
            )));
        }
        Ok(())
    }
}

/// One student's answers, aligned positionally with a question set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub student_id: String,
    pub answers: Vec<String>,
}

impl Submission {
    pub fn new(student_id: impl Into<String>, answers: Vec<String>) -> Self {
        Self {
            student_id: student_id.into(),
            answers,
        }
    }

    /// Reject submissions whose answer count differs from the question count.
    pub fn check_aligned(&self, question_set: &QuestionSet) -> Result<()> {
        if self.answers.len() != question_set.len() {
            return Err(PortalError::LengthMismatch {
                what: "answers",
                expected: question_set.len(),
                actual: self.answers.len(),
            });
        }
        Ok(())
    }
}

/// Scores for a single question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionScore {
    /// Similarity to the reference answer, 0..=100.
    pub plagiarism: u8,
    /// Number of tokens the tagger could not classify.
    pub grammar_errors: usize,
}

/// One record per (subject, student).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceRecord {
    pub subject: String,
    pub student: String,
    pub questions: Vec<QuestionScore>,
}

impl PerformanceRecord {
    /// Sum of the per-question similarity scores.
    pub fn total_plagiarism(&self) -> u64 {
        self.questions.iter().map(|q| u64::from(q.plagiarism)).sum()
    }

    /// Mean per-question similarity, 0.0 for a record with no questions.
    pub fn average_plagiarism(&self) -> f64 {
        if self.questions.is_empty() {
            return 0.0;
        }
        self.total_plagiarism() as f64 / self.questions.len() as f64
    }

    pub fn total_grammar_errors(&self) -> usize {
        self.questions.iter().map(|q| q.grammar_errors).sum()
    }
}

/// Running per-subject totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverallAggregate {
    pub subject: String,
    pub total_students: u64,
    pub total_plagiarism_score: u64,
}

impl OverallAggregate {
    pub fn empty(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            total_students: 0,
            total_plagiarism_score: 0,
        }
    }

    /// Fold one more student's scores into the totals.
    pub fn add_student(&mut self, similarity_scores: &[u8]) {
        self.total_students += 1;
        self.total_plagiarism_score += similarity_scores
            .iter()
            .map(|&s| u64::from(s))
            .sum::<u64>();
    }

    /// Mean summed similarity per student, `None` before the first student.
    pub fn mean_per_student(&self) -> Option<f64> {
        (self.total_students > 0)
            .then(|| self.total_plagiarism_score as f64 / self.total_students as f64)
    }
}

/// Subjects and student ids become directory and file names, so they must
/// be non-empty single path components.
pub fn validate_identifier(kind: &'static str, value: &str) -> Result<()> {
    let invalid = value.trim().is_empty()
        || value != value.trim()
        || value == "."
        || value == ".."
        || value.contains(['/', '\\', '\0']);
    if invalid {
        return Err(PortalError::InvalidIdentifier {
            kind,
            value: value.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_question_set() -> QuestionSet {
        QuestionSet {
            subject: "CS101".into(),
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            session: Session::Morning,
            questions: vec![
                Question {
                    text: "What is 2+2?".into(),
                    reference_answer: "4".into(),
                },
                Question {
                    text: "Name a sorting algorithm".into(),
                    reference_answer: "quicksort".into(),
                },
            ],
        }
    }

    #[test]
    fn session_display_and_parse() {
        assert_eq!(Session::Morning.to_string(), "Morning");
        assert_eq!("afternoon".parse::<Session>().unwrap(), Session::Afternoon);
        assert_eq!(" Morning ".parse::<Session>().unwrap(), Session::Morning);
        assert!("evening".parse::<Session>().is_err());
    }

    #[test]
    fn submission_alignment() {
        let set = two_question_set();
        assert!(Submission::new("s1", vec!["4".into(), "bubblesort".into()])
            .check_aligned(&set)
            .is_ok());

        let err = Submission::new("s1", vec!["4".into()])
            .check_aligned(&set)
            .unwrap_err();
        assert!(matches!(
            err,
            PortalError::LengthMismatch {
                expected: 2,
                actual: 1,
                ..
            }
        ));
    }

    #[test]
    fn question_set_requires_questions() {
        let mut set = two_question_set();
        assert!(set.validate().is_ok());
        set.questions.clear();
        assert!(set.validate().is_err());
    }

    #[test]
    fn identifiers_reject_path_components() {
        assert!(validate_identifier("subject", "CS101").is_ok());
        assert!(validate_identifier("subject", "Intro to Rust").is_ok());
        assert!(validate_identifier("subject", "").is_err());
        assert!(validate_identifier("subject", "  ").is_err());
        assert!(validate_identifier("subject", "..").is_err());
        assert!(validate_identifier("student", "a/b").is_err());
        assert!(validate_identifier("student", "a\\b").is_err());
        assert!(validate_identifier("student", " padded").is_err());
    }

    #[test]
    fn record_totals() {
        let record = PerformanceRecord {
            subject: "CS101".into(),
            student: "s1".into(),
            questions: vec![
                QuestionScore {
                    plagiarism: 100,
                    grammar_errors: 0,
                },
                QuestionScore {
                    plagiarism: 50,
                    grammar_errors: 2,
                },
            ],
        };
        assert_eq!(record.total_plagiarism(), 150);
        assert!((record.average_plagiarism() - 75.0).abs() < f64::EPSILON);
        assert_eq!(record.total_grammar_errors(), 2);
    }

    #[test]
    fn aggregate_add_student() {
        let mut agg = OverallAggregate::empty("Math");
        assert_eq!(agg.mean_per_student(), None);
        agg.add_student(&[80]);
        agg.add_student(&[60]);
        assert_eq!(agg.total_students, 2);
        assert_eq!(agg.total_plagiarism_score, 140);
        assert_eq!(agg.mean_per_student(), Some(70.0));
    }

    #[test]
    fn question_set_serde_roundtrip() {
        let set = two_question_set();
        let json = serde_json::to_string(&set).unwrap();
        let back: QuestionSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }
}
