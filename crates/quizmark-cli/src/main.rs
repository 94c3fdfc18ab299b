//! quizmark CLI: the interactive quiz and its bank tooling.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod bank;
mod commands;
mod console;

#[derive(Parser)]
#[command(
    name = "quizmark",
    version,
    about = "Free-text recall quiz with similarity-scored answers"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an interactive quiz session
    Run {
        /// Shuffle the questions on every attempt
        #[arg(short = 'r', long)]
        randomize: bool,

        /// Knowledge mode: accept any answer and show the reference
        #[arg(short = 'k', long)]
        skip: bool,

        /// Question bank file or directory (default: built-in palmistry bank)
        #[arg(long)]
        bank: Option<PathBuf>,

        /// Minimum similarity for an answer to pass (0.0 to 1.0)
        #[arg(long)]
        threshold: Option<f64>,

        /// Seed for a reproducible shuffle
        #[arg(long)]
        seed: Option<u64>,

        /// Only ask questions with one of these tags (comma-separated)
        #[arg(long)]
        tags: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate question bank TOML files
    Validate {
        /// Path to bank file or directory
        #[arg(long)]
        bank: PathBuf,
    },

    /// List the questions in a bank
    List {
        /// Question bank file or directory (default: built-in palmistry bank)
        #[arg(long)]
        bank: Option<PathBuf>,

        /// Only list questions with one of these tags (comma-separated)
        #[arg(long)]
        tags: Option<String>,
    },

    /// Score a single answer against a reference
    Check {
        /// The answer to score
        #[arg(long)]
        answer: String,

        /// The reference answer
        #[arg(long)]
        reference: String,

        /// Minimum similarity for a pass
        #[arg(long)]
        threshold: Option<f64>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create starter config and example question bank
    Init,
}

fn main() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("quizmark=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            randomize,
            skip,
            bank,
            threshold,
            seed,
            tags,
            config,
        } => commands::run::execute(randomize, skip, bank, threshold, seed, tags, config),
        Commands::Validate { bank } => commands::validate::execute(bank),
        Commands::List { bank, tags } => commands::list::execute(bank, tags),
        Commands::Check {
            answer,
            reference,
            threshold,
            json,
        } => commands::check::execute(answer, reference, threshold, json),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
