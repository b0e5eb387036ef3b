//! The `examportal dashboard` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use examportal_core::config::PortalConfig;
use examportal_core::dashboard::{DashboardReader, SubjectDashboard};

use super::open_store;

pub fn execute(
    config: &PortalConfig,
    subject: Option<String>,
    student: Option<String>,
    format: String,
) -> Result<()> {
    let store = open_store(config);
    let reader = DashboardReader::new(&store);

    let dashboards = match &subject {
        Some(s) => vec![reader.load(s, student.as_deref())?],
        None => reader.load_all()?,
    };

    match format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&dashboards)?);
        }
        "text" => {
            if dashboards.is_empty() {
                println!("No subjects found in {}.", config.data_dir.display());
            }
            for dash in &dashboards {
                print_dashboard(dash);
            }
        }
        other => anyhow::bail!("unknown format: {other} (expected text or json)"),
    }

    Ok(())
}

fn print_dashboard(dash: &SubjectDashboard) {
    println!("== {} ==", dash.subject);

    match &dash.question_set {
        Some(set) => {
            println!(
                "\nQuestions ({} {}):",
                set.date.format("%Y-%m-%d"),
                set.session
            );
            let mut table = Table::new();
            table.set_header(vec!["#", "Question", "Correct Answer"]);
            for (i, q) in set.questions.iter().enumerate() {
                table.add_row(vec![
                    Cell::new(format!("Q{}", i + 1)),
                    Cell::new(&q.text),
                    Cell::new(&q.reference_answer),
                ]);
            }
            println!("{table}");
        }
        None => println!("\nNo questions data available for this subject."),
    }

    if dash.students.is_empty() {
        println!("\nNo performance data available yet.");
    } else {
        println!("\nPerformance:");
        let mut table = Table::new();
        table.set_header(vec![
            "Student",
            "Average Similarity",
            "Total Similarity",
            "Grammar Errors",
        ]);
        for s in &dash.students {
            table.add_row(vec![
                Cell::new(&s.student),
                Cell::new(format!("{:.1}", s.average_plagiarism)),
                Cell::new(s.total_plagiarism),
                Cell::new(s.total_grammar_errors),
            ]);
        }
        println!("{table}");

        let per_question = dash
            .per_question_average()
            .iter()
            .enumerate()
            .map(|(i, avg)| format!("Q{} {avg:.1}", i + 1))
            .collect::<Vec<_>>();
        println!("Per-question average similarity: {}", per_question.join(", "));
    }

    match &dash.aggregate {
        Some(agg) => {
            println!("\nOverall:");
            let mut table = Table::new();
            table.set_header(vec![
                "subject",
                "total_students",
                "total_plagiarism_score",
                "mean_per_student",
            ]);
            let mean = agg
                .mean_per_student()
                .map(|m| format!("{m:.1}"))
                .unwrap_or_else(|| "-".to_string());
            table.add_row(vec![
                Cell::new(&agg.subject),
                Cell::new(agg.total_students),
                Cell::new(agg.total_plagiarism_score),
                Cell::new(mean),
            ]);
            println!("{table}");
        }
        None => println!("\nNo overall plagiarism data available."),
    }
    println!();
}
