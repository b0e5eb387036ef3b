//! TOML question-set parser.
//!
//! Faculty author question sets as TOML files; this module loads and
//! validates them before they are published to the store.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::model::{Question, QuestionSet, Session};

/// Intermediate TOML structure for question-set files.
#[derive(Debug, Deserialize)]
struct TomlQuestionFile {
    question_set: TomlQuestionSetHeader,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlQuestionSetHeader {
    subject: String,
    date: String,
    #[serde(default = "default_session")]
    session: String,
}

fn default_session() -> String {
    "Morning".to_string()
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    question: String,
    answer: String,
}

/// Intermediate TOML structure for a student's answer file.
#[derive(Debug, Deserialize)]
struct TomlAnswerFile {
    #[serde(default)]
    answers: Vec<String>,
}

/// Parse a question-set TOML file.
pub fn parse_question_set(path: &Path) -> Result<QuestionSet> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question set file: {}", path.display()))?;

    parse_question_set_str(&content, path)
}

/// Parse a TOML string into a `QuestionSet` (useful for testing).
pub fn parse_question_set_str(content: &str, source_path: &Path) -> Result<QuestionSet> {
    let parsed: TomlQuestionFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let header = parsed.question_set;
    let date = NaiveDate::parse_from_str(header.date.trim(), "%Y-%m-%d")
        .with_context(|| format!("invalid date {:?}, expected YYYY-MM-DD", header.date))?;
    let session: Session = header
        .session
        .parse()
        .map_err(|e: String| anyhow::anyhow!("{}", e))?;

    let questions = parsed
        .questions
        .into_iter()
        .map(|q| Question {
            text: q.question,
            reference_answer: q.answer,
        })
        .collect();

    Ok(QuestionSet {
        subject: header.subject,
        date,
        session,
        questions,
    })
}

/// Recursively load all `.toml` question-set files from a directory.
///
/// Files that fail to parse are skipped with a warning.
pub fn load_question_directory(dir: &Path) -> Result<Vec<QuestionSet>> {
    let mut sets = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut paths = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    paths.sort();

    for path in paths {
        if path.is_dir() {
            sets.extend(load_question_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_question_set(&path) {
                Ok(set) => sets.push(set),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(sets)
}

/// Parse a student answer file: a top-level `answers = [...]` array.
pub fn parse_answers(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read answers file: {}", path.display()))?;
    let parsed: TomlAnswerFile = toml::from_str(&content)
        .with_context(|| format!("failed to parse TOML: {}", path.display()))?;
    Ok(parsed.answers)
}

/// A warning from question-set validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// 1-based question number (if applicable).
    pub question: Option<usize>,
    /// Warning message.
    pub message: String,
}

/// Validate a question set for common authoring mistakes.
pub fn validate_question_set(set: &QuestionSet) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if let Err(e) = set.validate() {
        warnings.push(ValidationWarning {
            question: None,
            message: e.to_string(),
        });
    }

    let mut seen = std::collections::HashSet::new();
    for (i, q) in set.questions.iter().enumerate() {
        let number = Some(i + 1);
        if q.text.trim().is_empty() {
            warnings.push(ValidationWarning {
                question: number,
                message: "question text is empty".into(),
            });
        } else if !seen.insert(q.text.trim()) {
            warnings.push(ValidationWarning {
                question: number,
                message: format!("duplicate question: {}", q.text.trim()),
            });
        }

        // An empty reference makes every non-empty answer score 0.
        if q.reference_answer.is_empty() {
            warnings.push(ValidationWarning {
                question: number,
                message: "reference answer is empty".into(),
            });
        }
    }

    warnings
}
