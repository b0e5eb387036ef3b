//! Flat-file persistence.
//!
//! Layout under the data root, one directory per subject:
//!
//! ```text
//! data/
//!   CS101/
//!     CS101_questions.csv      Question,Correct Answer,Date,Session
//!     s001_answers.txt         Q1: ...
//!     s001_performance.csv     subject,student,q1_plagiarism,q1_grammar_errors,...
//!     overall_plagiarism.csv   subject,total_students,total_plagiarism_score
//! ```
//!
//! Missing files read as "no data yet". Rows that fail to parse are skipped
//! with a warning. Every write replaces the whole file through a temp file
//! and rename.

use std::collections::HashMap;
use std::fs::File;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

use crate::aggregate::AggregateTable;
use crate::error::{PortalError, Result};
use crate::model::{
    validate_identifier, OverallAggregate, PerformanceRecord, Question, QuestionScore,
    QuestionSet, Session, Submission,
};

/// Header of `{subject}_questions.csv`.
pub const QUESTIONS_HEADER: [&str; 4] = ["Question", "Correct Answer", "Date", "Session"];
/// Header of `overall_plagiarism.csv`.
pub const AGGREGATE_HEADER: [&str; 3] = ["subject", "total_students", "total_plagiarism_score"];
/// File name of the per-subject aggregate table.
pub const AGGREGATE_FILE: &str = "overall_plagiarism.csv";

const PERFORMANCE_SUFFIX: &str = "_performance.csv";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// File-backed store rooted at a data directory.
#[derive(Debug)]
pub struct PortalStore {
    root: PathBuf,
    subject_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl PortalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            subject_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    // -----------------------------------------------------------------------
    // Paths
    // -----------------------------------------------------------------------

    pub fn subject_dir(&self, subject: &str) -> Result<PathBuf> {
        validate_identifier("subject", subject)?;
        Ok(self.root.join(subject))
    }

    pub fn questions_path(&self, subject: &str) -> Result<PathBuf> {
        Ok(self
            .subject_dir(subject)?
            .join(format!("{subject}_questions.csv")))
    }

    pub fn answers_path(&self, subject: &str, student: &str) -> Result<PathBuf> {
        validate_identifier("student", student)?;
        Ok(self.subject_dir(subject)?.join(format!("{student}_answers.txt")))
    }

    pub fn performance_path(&self, subject: &str, student: &str) -> Result<PathBuf> {
        validate_identifier("student", student)?;
        Ok(self
            .subject_dir(subject)?
            .join(format!("{student}{PERFORMANCE_SUFFIX}")))
    }

    pub fn aggregate_path(&self, subject: &str) -> Result<PathBuf> {
        Ok(self.subject_dir(subject)?.join(AGGREGATE_FILE))
    }

    // -----------------------------------------------------------------------
    // Subjects
    // -----------------------------------------------------------------------

    /// Subjects that have a data directory, sorted by name.
    pub fn list_subjects(&self) -> Result<Vec<String>> {
        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(PortalError::io(&self.root, e)),
        };

        let mut subjects = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| PortalError::io(&self.root, e))?;
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if validate_identifier("subject", name).is_ok() {
                    subjects.push(name.to_string());
                }
            }
        }
        subjects.sort();
        Ok(subjects)
    }

    /// Run `f` while holding the subject's lock.
    ///
    /// Read-modify-write cycles on per-subject files go through here so two
    /// submissions in the same process cannot lose an update.
    pub fn with_subject_lock<T>(&self, subject: &str, f: impl FnOnce() -> Result<T>) -> Result<T> {
        let lock = {
            let mut locks = self
                .subject_locks
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            Arc::clone(locks.entry(subject.to_string()).or_default())
        };
        let _guard = lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f()
    }

    // -----------------------------------------------------------------------
    // Question sets
    // -----------------------------------------------------------------------

    /// Save a question set, replacing any previous set for the subject.
    pub fn save_question_set(&self, set: &QuestionSet) -> Result<PathBuf> {
        set.validate()?;
        let path = self.questions_path(&set.subject)?;
        let date = set.date.format(DATE_FORMAT).to_string();
        let session = set.session.to_string();

        let mut rows = vec![to_row(QUESTIONS_HEADER)];
        rows.extend(set.questions.iter().map(|q| {
            vec![
                q.text.clone(),
                q.reference_answer.clone(),
                date.clone(),
                session.clone(),
            ]
        }));

        write_atomic(&path, &csv_bytes(&path, rows)?)?;
        tracing::info!(
            subject = %set.subject,
            questions = set.len(),
            path = %path.display(),
            "saved question set"
        );
        Ok(path)
    }

    /// Load the question set published for `subject`, if any.
    ///
    /// Date and session are taken from the first well-formed row.
    pub fn load_question_set(&self, subject: &str) -> Result<Option<QuestionSet>> {
        let path = self.questions_path(subject)?;
        let Some(file) = open_optional(&path)? else {
            return Ok(None);
        };

        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(file);
        let mut header: Option<(NaiveDate, Session)> = None;
        let mut questions = Vec::new();

        for (line, result) in reader.records().enumerate() {
            let record = match result {
                Ok(r) => r,
                Err(e) => {
                    tracing::warn!("skipping row {} of {}: {}", line + 2, path.display(), e);
                    continue;
                }
            };
            match parse_question_row(&record) {
                Ok((question, date, session)) => {
                    header.get_or_insert((date, session));
                    questions.push(question);
                }
                Err(msg) => {
                    tracing::warn!("skipping row {} of {}: {}", line + 2, path.display(), msg);
                }
            }
        }

        let Some((date, session)) = header else {
            tracing::warn!("{} has no readable questions", path.display());
            return Ok(None);
        };

        Ok(Some(QuestionSet {
            subject: subject.to_string(),
            date,
            session,
            questions,
        }))
    }

    // -----------------------------------------------------------------------
    // Answers
    // -----------------------------------------------------------------------

    /// Save a student's raw answers as `Q{i}: {answer}` lines.
    ///
    /// The format has no escaping. An answer whose own line starts with the
    /// next question's `Q{i+1}:` prefix reads back as two answers, and
    /// trailing line breaks are not preserved. The performance record does
    /// not depend on this file.
    pub fn save_answers(&self, subject: &str, submission: &Submission) -> Result<PathBuf> {
        let path = self.answers_path(subject, &submission.student_id)?;
        let mut content = String::new();
        for (i, answer) in submission.answers.iter().enumerate() {
            content.push_str(&format!("Q{}: {}\n", i + 1, answer));
        }
        write_atomic(&path, content.as_bytes())?;
        tracing::debug!(path = %path.display(), "saved answers");
        Ok(path)
    }

    /// Load a student's saved answers. Lines without the next expected
    /// `Q{i}: ` prefix continue the previous answer. See
    /// [`PortalStore::save_answers`] for what does not round-trip.
    pub fn load_answers(&self, subject: &str, student: &str) -> Result<Option<Vec<String>>> {
        let path = self.answers_path(subject, student)?;
        let Some(content) = read_optional(&path)? else {
            return Ok(None);
        };

        let mut answers: Vec<String> = Vec::new();
        for line in content.lines() {
            match strip_answer_prefix(line, answers.len() + 1) {
                Some(answer) => answers.push(answer.to_string()),
                None => match answers.last_mut() {
                    Some(last) => {
                        last.push('\n');
                        last.push_str(line);
                    }
                    None => tracing::warn!("ignoring stray line in {}", path.display()),
                },
            }
        }
        Ok(Some(answers))
    }

    // -----------------------------------------------------------------------
    // Performance records
    // -----------------------------------------------------------------------

    /// Write a performance record, replacing any earlier record for the
    /// same (subject, student).
    pub fn write_performance(&self, record: &PerformanceRecord) -> Result<PathBuf> {
        let path = self.performance_path(&record.subject, &record.student)?;

        let mut header = vec!["subject".to_string(), "student".to_string()];
        let mut row = vec![record.subject.clone(), record.student.clone()];
        for (i, q) in record.questions.iter().enumerate() {
            header.push(format!("q{}_plagiarism", i + 1));
            header.push(format!("q{}_grammar_errors", i + 1));
            row.push(q.plagiarism.to_string());
            row.push(q.grammar_errors.to_string());
        }

        write_atomic(&path, &csv_bytes(&path, vec![header, row])?)?;
        tracing::debug!(path = %path.display(), "wrote performance record");
        Ok(path)
    }

    /// Load one student's performance record.
    pub fn load_performance(
        &self,
        subject: &str,
        student: &str,
    ) -> Result<Option<PerformanceRecord>> {
        let path = self.performance_path(subject, student)?;
        match open_optional(&path)? {
            Some(file) => read_performance(&path, file),
            None => Ok(None),
        }
    }

    /// Load every performance record in the subject directory, sorted by
    /// student. Unreadable files are skipped.
    pub fn load_all_performance(&self, subject: &str) -> Result<Vec<PerformanceRecord>> {
        let dir = self.subject_dir(subject)?;
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(PortalError::io(&dir, e)),
        };

        let mut records = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| PortalError::io(&dir, e))?.path();
            let is_performance = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(PERFORMANCE_SUFFIX));
            if !is_performance {
                continue;
            }
            let file = match File::open(&path) {
                Ok(f) => f,
                Err(e) => {
                    tracing::warn!("skipping {}: {}", path.display(), e);
                    continue;
                }
            };
            match read_performance(&path, file) {
                Ok(Some(record)) => records.push(record),
                Ok(None) => {}
                Err(e) => tracing::warn!("skipping {}: {}", path.display(), e),
            }
        }
        records.sort_by(|a, b| a.student.cmp(&b.student));
        Ok(records)
    }

    // -----------------------------------------------------------------------
    // Aggregates
    // -----------------------------------------------------------------------

    /// Load the subject's aggregate table, empty if the file does not exist.
    ///
    /// Counts written as `"3.0"` are accepted. Rows that still fail to parse
    /// are skipped and counted in [`AggregateTable::unreadable_rows`].
    pub fn load_aggregates(&self, subject: &str) -> Result<AggregateTable> {
        let path = self.aggregate_path(subject)?;
        let Some(file) = open_optional(&path)? else {
            return Ok(AggregateTable::default());
        };

        let mut table = AggregateTable::default();
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(file);
        let headers = reader
            .headers()
            .map_err(|e| PortalError::csv(&path, e))?
            .clone();
        let column = |name: &str| headers.iter().position(|h| h == name);
        let columns = match AGGREGATE_HEADER.map(column) {
            [Some(s), Some(n), Some(t)] => Some((s, n, t)),
            _ => {
                tracing::warn!("{} is missing aggregate columns", path.display());
                None
            }
        };

        for (line, result) in reader.records().enumerate() {
            let parsed = match (&result, columns) {
                (Ok(record), Some(columns)) => parse_aggregate_row(record, columns),
                (Ok(_), None) => Err("unknown column layout".to_string()),
                (Err(e), _) => Err(e.to_string()),
            };
            match parsed {
                Ok(row) => table.merge_row(row),
                Err(msg) => {
                    tracing::warn!("skipping row {} of {}: {}", line + 2, path.display(), msg);
                    table.mark_unreadable();
                }
            }
        }
        Ok(table)
    }

    /// Replace the subject's aggregate table on disk.
    pub fn save_aggregates(&self, subject: &str, table: &AggregateTable) -> Result<PathBuf> {
        let path = self.aggregate_path(subject)?;
        let mut rows = vec![to_row(AGGREGATE_HEADER)];
        rows.extend(table.iter().map(|agg| {
            vec![
                agg.subject.clone(),
                agg.total_students.to_string(),
                agg.total_plagiarism_score.to_string(),
            ]
        }));
        write_atomic(&path, &csv_bytes(&path, rows)?)?;
        Ok(path)
    }
}

// ---------------------------------------------------------------------------
// Row parsing
// ---------------------------------------------------------------------------

fn parse_question_row(
    record: &csv::StringRecord,
) -> std::result::Result<(Question, NaiveDate, Session), String> {
    if record.len() != QUESTIONS_HEADER.len() {
        return Err(format!(
            "expected {} fields, found {}",
            QUESTIONS_HEADER.len(),
            record.len()
        ));
    }
    let date = NaiveDate::parse_from_str(&record[2], DATE_FORMAT)
        .map_err(|e| format!("bad date {:?}: {e}", &record[2]))?;
    let session: Session = record[3].parse()?;
    let question = Question {
        text: record[0].to_string(),
        reference_answer: record[1].to_string(),
    };
    Ok((question, date, session))
}

fn parse_aggregate_row(
    record: &csv::StringRecord,
    (subject_col, students_col, score_col): (usize, usize, usize),
) -> std::result::Result<OverallAggregate, String> {
    let field = |col: usize| record.get(col).ok_or_else(|| format!("missing field {}", col + 1));
    let count = |col: usize| {
        let value = field(col)?;
        parse_count(value).ok_or_else(|| format!("bad count {value:?}"))
    };
    let subject = field(subject_col)?;
    if subject.is_empty() {
        return Err("empty subject".into());
    }
    Ok(OverallAggregate {
        subject: subject.to_string(),
        total_students: count(students_col)?,
        total_plagiarism_score: count(score_col)?,
    })
}

fn read_performance(path: &Path, file: File) -> Result<Option<PerformanceRecord>> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(file);
    let headers = reader
        .headers()
        .map_err(|e| PortalError::csv(path, e))?
        .clone();
    let column = |name: &str| headers.iter().position(|h| h == name);

    let (Some(subject_col), Some(student_col)) = (column("subject"), column("student")) else {
        tracing::warn!("{} is missing subject/student columns", path.display());
        return Ok(None);
    };

    let mut question_cols = Vec::new();
    for i in 1.. {
        match (
            column(&format!("q{i}_plagiarism")),
            column(&format!("q{i}_grammar_errors")),
        ) {
            (Some(p), Some(g)) => question_cols.push((p, g)),
            _ => break,
        }
    }

    for (line, result) in reader.records().enumerate() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!("skipping row {} of {}: {}", line + 2, path.display(), e);
                continue;
            }
        };
        let parsed = question_cols
            .iter()
            .map(|&(p, g)| {
                Some(QuestionScore {
                    plagiarism: parse_score(record.get(p)?)?,
                    grammar_errors: record.get(g)?.trim().parse().ok()?,
                })
            })
            .collect::<Option<Vec<_>>>();
        match (parsed, record.get(subject_col), record.get(student_col)) {
            (Some(questions), Some(subject), Some(student)) => {
                return Ok(Some(PerformanceRecord {
                    subject: subject.to_string(),
                    student: student.to_string(),
                    questions,
                }));
            }
            _ => tracing::warn!("skipping malformed row {} of {}", line + 2, path.display()),
        }
    }
    Ok(None)
}

/// Accepts `"87"` and pandas-style `"87.0"`; rejects values outside 0..=100.
fn parse_score(value: &str) -> Option<u8> {
    let value = value.trim();
    if let Ok(n) = value.parse::<u8>() {
        return (n <= 100).then_some(n);
    }
    let f: f64 = value.parse().ok()?;
    (f.fract() == 0.0 && (0.0..=100.0).contains(&f)).then_some(f as u8)
}

/// Accepts `"3"` and pandas-style `"3.0"`; rejects negative or fractional values.
fn parse_count(value: &str) -> Option<u64> {
    let value = value.trim();
    if let Ok(n) = value.parse::<u64>() {
        return Some(n);
    }
    let f: f64 = value.parse().ok()?;
    (f.fract() == 0.0 && f >= 0.0 && f <= u64::MAX as f64).then_some(f as u64)
}

fn strip_answer_prefix(line: &str, expected: usize) -> Option<&str> {
    let rest = line.strip_prefix(&format!("Q{expected}:"))?;
    Some(rest.strip_prefix(' ').unwrap_or(rest))
}

// ---------------------------------------------------------------------------
// File helpers
// ---------------------------------------------------------------------------

fn to_row<const N: usize>(header: [&str; N]) -> Vec<String> {
    header.iter().map(|h| h.to_string()).collect()
}

fn csv_bytes(path: &Path, rows: Vec<Vec<String>>) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer
            .write_record(&row)
            .map_err(|e| PortalError::csv(path, e))?;
    }
    writer
        .into_inner()
        .map_err(|e| PortalError::io(path, e.into_error()))
}

/// Missing file is `Ok(None)`; any other failure is an error.
fn open_optional(path: &Path) -> Result<Option<File>> {
    match File::open(path) {
        Ok(f) => Ok(Some(f)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(PortalError::io(path, e)),
    }
}

fn read_optional(path: &Path) -> Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(s) => Ok(Some(s)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(PortalError::io(path, e)),
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir).map_err(|e| PortalError::io(dir, e))?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| PortalError::io(dir, e))?;
    tmp.write_all(bytes).map_err(|e| PortalError::io(path, e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| PortalError::io(path, e))?;
    tmp.persist(path).map_err(|e| PortalError::io(path, e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, PortalStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = PortalStore::new(dir.path());
        (dir, store)
    }

    fn sample_set() -> QuestionSet {
        QuestionSet {
            subject: "CS101".into(),
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            session: Session::Afternoon,
            questions: vec![
                Question {
                    text: "What is 2+2?".into(),
                    reference_answer: "4".into(),
                },
                Question {
                    text: "Name a sorting algorithm, with a comma".into(),
                    reference_answer: "quicksort, \"in place\"".into(),
                },
            ],
        }
    }

    #[test]
    fn question_set_file_layout() {
        let (dir, store) = store();
        let path = store.save_question_set(&sample_set()).unwrap();
        assert_eq!(path, dir.path().join("CS101").join("CS101_questions.csv"));

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("Question,Correct Answer,Date,Session"));
        assert_eq!(lines.next(), Some("What is 2+2?,4,2024-05-01,Afternoon"));
    }

    #[test]
    fn question_set_reload() {
        let (_dir, store) = store();
        store.save_question_set(&sample_set()).unwrap();
        let loaded = store.load_question_set("CS101").unwrap().unwrap();
        assert_eq!(loaded, sample_set());
    }

    #[test]
    fn question_set_save_overwrites() {
        let (_dir, store) = store();
        store.save_question_set(&sample_set()).unwrap();
        let mut smaller = sample_set();
        smaller.questions.truncate(1);
        store.save_question_set(&smaller).unwrap();
        assert_eq!(store.load_question_set("CS101").unwrap().unwrap().len(), 1);
    }

    #[test]
    fn missing_files_are_no_data() {
        let (_dir, store) = store();
        assert!(store.load_question_set("Nope").unwrap().is_none());
        assert!(store.load_answers("Nope", "s1").unwrap().is_none());
        assert!(store.load_performance("Nope", "s1").unwrap().is_none());
        assert!(store.load_all_performance("Nope").unwrap().is_empty());
        assert!(store.load_aggregates("Nope").unwrap().is_empty());
        assert!(store.list_subjects().unwrap().is_empty());
    }

    #[test]
    fn malformed_question_rows_are_skipped() {
        let (dir, store) = store();
        let subject_dir = dir.path().join("Math");
        std::fs::create_dir_all(&subject_dir).unwrap();
        std::fs::write(
            subject_dir.join("Math_questions.csv"),
            "Question,Correct Answer,Date,Session\n\
             only one field\n\
             1+1?,2,not-a-date,Morning\n\
             2+2?,4,2024-01-02,Morning\n\
             3+3?,6,2024-01-02,Evening\n",
        )
        .unwrap();

        let set = store.load_question_set("Math").unwrap().unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.questions[0].reference_answer, "4");
        assert_eq!(set.date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    }

    #[test]
    fn answers_file_format() {
        let (_dir, store) = store();
        let submission = Submission::new("s001", vec!["4".into(), "bubble\nsort".into()]);
        let path = store.save_answers("CS101", &submission).unwrap();
        assert_eq!(
            std::fs::read_to_string(path).unwrap(),
            "Q1: 4\nQ2: bubble\nsort\n"
        );
        assert_eq!(
            store.load_answers("CS101", "s001").unwrap().unwrap(),
            vec!["4".to_string(), "bubble\nsort".to_string()]
        );
    }

    // No escaping: a line that looks like the next prefix starts a new answer.
    #[test]
    fn answer_line_with_next_prefix_splits() {
        let (_dir, store) = store();
        let submission = Submission::new("s001", vec!["first\nQ2: not really".into()]);
        store.save_answers("CS101", &submission).unwrap();
        assert_eq!(
            store.load_answers("CS101", "s001").unwrap().unwrap(),
            vec!["first".to_string(), "not really".to_string()]
        );
    }

    #[test]
    fn performance_file_layout() {
        let (_dir, store) = store();
        let record = PerformanceRecord {
            subject: "CS101".into(),
            student: "s001".into(),
            questions: vec![
                QuestionScore {
                    plagiarism: 100,
                    grammar_errors: 0,
                },
                QuestionScore {
                    plagiarism: 53,
                    grammar_errors: 1,
                },
            ],
        };
        let path = store.write_performance(&record).unwrap();
        assert!(path.ends_with("CS101/s001_performance.csv"));
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "subject,student,q1_plagiarism,q1_grammar_errors,q2_plagiarism,q2_grammar_errors\n\
             CS101,s001,100,0,53,1\n"
        );
        assert_eq!(
            store.load_performance("CS101", "s001").unwrap(),
            Some(record)
        );
    }

    #[test]
    fn performance_accepts_float_scores() {
        let (dir, store) = store();
        let subject_dir = dir.path().join("Bio");
        std::fs::create_dir_all(&subject_dir).unwrap();
        std::fs::write(
            subject_dir.join("s9_performance.csv"),
            "subject,student,q1_plagiarism,q1_grammar_errors\nBio,s9,87.0,2\n",
        )
        .unwrap();
        let record = store.load_performance("Bio", "s9").unwrap().unwrap();
        assert_eq!(record.questions[0].plagiarism, 87);
        assert_eq!(record.questions[0].grammar_errors, 2);
    }

    #[test]
    fn load_all_performance_skips_bad_files() {
        let (dir, store) = store();
        let subject_dir = dir.path().join("Bio");
        std::fs::create_dir_all(&subject_dir).unwrap();
        std::fs::write(
            subject_dir.join("b_performance.csv"),
            "subject,student,q1_plagiarism,q1_grammar_errors\nBio,b,40,0\n",
        )
        .unwrap();
        std::fs::write(
            subject_dir.join("a_performance.csv"),
            "subject,student,q1_plagiarism,q1_grammar_errors\nBio,a,90,1\n",
        )
        .unwrap();
        std::fs::write(
            subject_dir.join("broken_performance.csv"),
            "subject,student,q1_plagiarism,q1_grammar_errors\nBio,broken,lots,0\n",
        )
        .unwrap();
        std::fs::write(subject_dir.join("notes.txt"), "ignored").unwrap();

        let records = store.load_all_performance("Bio").unwrap();
        let students: Vec<_> = records.iter().map(|r| r.student.as_str()).collect();
        assert_eq!(students, vec!["a", "b"]);
    }

    #[test]
    fn aggregate_file_layout() {
        let (_dir, store) = store();
        let mut table = AggregateTable::default();
        table.merge_row(OverallAggregate {
            subject: "Math".into(),
            total_students: 2,
            total_plagiarism_score: 140,
        });
        let path = store.save_aggregates("Math", &table).unwrap();
        assert!(path.ends_with("Math/overall_plagiarism.csv"));
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "subject,total_students,total_plagiarism_score\nMath,2,140\n"
        );
        assert_eq!(store.load_aggregates("Math").unwrap(), table);
    }

    #[test]
    fn malformed_aggregate_rows_are_skipped() {
        let (dir, store) = store();
        let subject_dir = dir.path().join("Math");
        std::fs::create_dir_all(&subject_dir).unwrap();
        std::fs::write(
            subject_dir.join(AGGREGATE_FILE),
            "subject,total_students,total_plagiarism_score\nMath,x,1\nMath,3,210\n",
        )
        .unwrap();
        let table = store.load_aggregates("Math").unwrap();
        assert_eq!(table.get("Math").unwrap().total_students, 3);
        assert_eq!(table.unreadable_rows(), 1);
    }

    #[test]
    fn aggregate_accepts_float_counts() {
        let (dir, store) = store();
        let subject_dir = dir.path().join("Math");
        std::fs::create_dir_all(&subject_dir).unwrap();
        std::fs::write(
            subject_dir.join(AGGREGATE_FILE),
            "subject,total_students,total_plagiarism_score\nMath,3.0,210.0\n",
        )
        .unwrap();
        let table = store.load_aggregates("Math").unwrap();
        let math = table.get("Math").unwrap();
        assert_eq!(math.total_students, 3);
        assert_eq!(math.total_plagiarism_score, 210);
        assert_eq!(table.unreadable_rows(), 0);
    }

    #[test]
    fn count_parsing() {
        assert_eq!(parse_count("7"), Some(7));
        assert_eq!(parse_count(" 7.0 "), Some(7));
        assert_eq!(parse_count("7.5"), None);
        assert_eq!(parse_count("-1"), None);
        assert_eq!(parse_count("x"), None);
    }

    #[test]
    fn list_subjects_sorted() {
        let (dir, store) = store();
        for s in ["Physics", "Art", "CS101"] {
            std::fs::create_dir_all(dir.path().join(s)).unwrap();
        }
        std::fs::write(dir.path().join("stray.csv"), "").unwrap();
        assert_eq!(
            store.list_subjects().unwrap(),
            vec!["Art".to_string(), "CS101".into(), "Physics".into()]
        );
    }

    #[test]
    fn rejects_path_like_identifiers() {
        let (_dir, store) = store();
        assert!(store.questions_path("../etc").is_err());
        assert!(store.performance_path("CS101", "a/b").is_err());
        assert!(store.load_aggregates("").is_err());
    }
}
