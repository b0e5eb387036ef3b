//! examportal CLI: faculty, student, and analytics operations.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use examportal_core::config::load_config_from;

mod commands;

#[derive(Parser)]
#[command(name = "examportal", version, about = "Exam submission scoring and analytics")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Data directory (overrides config and EXAMPORTAL_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Publish a question set for a subject (replaces any previous set)
    Publish {
        /// Path to the question-set .toml file
        #[arg(long)]
        questions: PathBuf,
    },

    /// Submit a student's answers and score them
    Submit {
        /// Subject to submit against
        #[arg(long)]
        subject: String,

        /// Student identifier
        #[arg(long)]
        student: String,

        /// Answer text, one per question in order (repeatable)
        #[arg(long = "answer", conflicts_with = "answers_file")]
        answers: Vec<String>,

        /// TOML file with `answers = [...]`
        #[arg(long)]
        answers_file: Option<PathBuf>,
    },

    /// Show analytics for one subject or all subjects
    Dashboard {
        /// Subject to show (default: all subjects)
        #[arg(long)]
        subject: Option<String>,

        /// Narrow to one student
        #[arg(long, requires = "subject")]
        student: Option<String>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// List subjects with saved data
    Subjects,

    /// Validate question-set TOML files
    Validate {
        /// Path to question-set file or directory
        #[arg(long)]
        questions: PathBuf,
    },

    /// Create starter config and example question set
    Init,
}

fn main() {
    let cli = Cli::parse();

    let config = match load_config_from(cli.config.as_deref()) {
        Ok(mut config) => {
            if let Some(dir) = cli.data_dir {
                config.data_dir = dir;
            }
            config
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(1);
        }
    };

    let default_directive = config
        .log_filter
        .clone()
        .unwrap_or_else(|| "examportal=info".to_string());
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Publish { questions } => commands::publish::execute(&config, questions),
        Commands::Submit {
            subject,
            student,
            answers,
            answers_file,
        } => commands::submit::execute(&config, subject, student, answers, answers_file),
        Commands::Dashboard {
            subject,
            student,
            format,
        } => commands::dashboard::execute(&config, subject, student, format),
        Commands::Subjects => commands::subjects::execute(&config),
        Commands::Validate { questions } => commands::validate::execute(questions),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
