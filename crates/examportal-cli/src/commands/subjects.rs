//! The `examportal subjects` command.

use anyhow::Result;

use examportal_core::config::PortalConfig;

use super::open_store;

pub fn execute(config: &PortalConfig) -> Result<()> {
    let store = open_store(config);
    let subjects = store.list_subjects()?;

    if subjects.is_empty() {
        println!(
            "No subjects in {}. Publish a question set with `examportal publish`.",
            config.data_dir.display()
        );
        return Ok(());
    }

    for subject in &subjects {
        let questions = store
            .load_question_set(subject)?
            .map(|set| set.questions.len())
            .unwrap_or(0);
        let students = store
            .load_aggregates(subject)?
            .get(subject)
            .map(|agg| agg.total_students)
            .unwrap_or(0);
        println!("{subject}  ({questions} questions, {students} submissions)");
    }

    Ok(())
}
