//! The `examportal submit` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use examportal_core::config::PortalConfig;
use examportal_core::model::Submission;
use examportal_core::parser;
use examportal_core::recorder::RecordOutcome;
use examportal_core::session::ExamSession;
use examportal_nlp::create_tagger;

use super::open_store;

pub fn execute(
    config: &PortalConfig,
    subject: String,
    student: String,
    answers: Vec<String>,
    answers_file: Option<PathBuf>,
) -> Result<()> {
    let answers = match answers_file {
        Some(path) => parser::parse_answers(&path)?,
        None => answers,
    };

    let store = open_store(config);
    let session = ExamSession::open(&store, &subject)?;
    let tagger = create_tagger(config.tagger);

    let submission = Submission::new(student, answers);
    let outcome = session
        .submit(&store, tagger.as_ref(), &submission)
        .with_context(|| {
            format!(
                "failed to record submission from {} for {}",
                submission.student_id, subject
            )
        })?;

    println!(
        "Answers submitted for {} by {}.",
        outcome.record.subject, outcome.record.student
    );
    print_outcome(&session, &outcome);

    Ok(())
}

fn print_outcome(session: &ExamSession, outcome: &RecordOutcome) {
    let mut table = Table::new();
    table.set_header(vec!["#", "Question", "Similarity", "Grammar Errors"]);

    for (i, (question, score)) in session
        .question_set()
        .questions
        .iter()
        .zip(&outcome.record.questions)
        .enumerate()
    {
        table.add_row(vec![
            Cell::new(format!("Q{}", i + 1)),
            Cell::new(&question.text),
            Cell::new(format!("{}%", score.plagiarism)),
            Cell::new(score.grammar_errors),
        ]);
    }

    println!("{table}");
    println!(
        "Subject totals: {} students, {} summed similarity",
        outcome.aggregate.total_students, outcome.aggregate.total_plagiarism_score
    );
}
