//! The `examportal init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create examportal.toml
    if std::path::Path::new("examportal.toml").exists() {
        println!("examportal.toml already exists, skipping.");
    } else {
        std::fs::write("examportal.toml", SAMPLE_CONFIG)?;
        println!("Created examportal.toml");
    }

    // Create example question set
    std::fs::create_dir_all("question-sets")?;
    let example_path = std::path::Path::new("question-sets/example.toml");
    if example_path.exists() {
        println!("question-sets/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_QUESTION_SET)?;
        println!("Created question-sets/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit question-sets/example.toml with your questions");
    println!("  2. Run: examportal publish --questions question-sets/example.toml");
    println!("  3. Run: examportal submit --subject CS101 --student s001 --answer 4 --answer quicksort");
    println!("  4. Run: examportal dashboard --subject CS101");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# examportal configuration

# One sub-directory per subject is created under this directory.
data_dir = "data"

# Part-of-speech tagger used for grammar-error counting.
tagger = "lexicon"

# Log filter used when RUST_LOG is unset.
# log_filter = "examportal=debug"
"#;

const EXAMPLE_QUESTION_SET: &str = r#"[question_set]
subject = "CS101"
date = "2024-05-01"
session = "Morning"

[[questions]]
question = "What is 2+2?"
answer = "4"

[[questions]]
question = "Name a sorting algorithm"
answer = "quicksort"
"#;
