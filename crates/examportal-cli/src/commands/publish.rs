//! The `examportal publish` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use examportal_core::config::PortalConfig;
use examportal_core::parser;

use super::open_store;

pub fn execute(config: &PortalConfig, questions_path: PathBuf) -> Result<()> {
    let set = parser::parse_question_set(&questions_path)?;

    for w in parser::validate_question_set(&set) {
        let prefix = w
            .question
            .map(|n| format!("[Q{n}] "))
            .unwrap_or_default();
        eprintln!("Warning: {prefix}{}", w.message);
    }

    let store = open_store(config);
    let replaced = match store.load_question_set(&set.subject) {
        Ok(previous) => previous.is_some(),
        Err(e) => {
            tracing::warn!(subject = %set.subject, "replacing unreadable question set: {e}");
            true
        }
    };
    let path = store
        .save_question_set(&set)
        .with_context(|| format!("failed to publish question set for {}", set.subject))?;

    if replaced {
        println!("Replaced previous question set for {}.", set.subject);
    }
    println!(
        "Published {} questions for {} ({} {}) to {}",
        set.questions.len(),
        set.subject,
        set.date,
        set.session,
        path.display()
    );

    Ok(())
}
