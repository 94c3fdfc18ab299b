//! The `quizmark init` command.

use std::path::Path;

use anyhow::{Context, Result};

pub fn execute() -> Result<()> {
    if Path::new("quizmark.toml").exists() {
        println!("quizmark.toml already exists, skipping.");
    } else {
        std::fs::write("quizmark.toml", SAMPLE_CONFIG).context("failed to write quizmark.toml")?;
        println!("Created quizmark.toml");
    }

    std::fs::create_dir_all("question-banks")?;
    let example_path = Path::new("question-banks/example.toml");
    if example_path.exists() {
        println!("question-banks/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_BANK)
            .context("failed to write question-banks/example.toml")?;
        println!("Created question-banks/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Add your own questions to question-banks/example.toml");
    println!("  2. Run: quizmark validate --bank question-banks/example.toml");
    println!("  3. Run: quizmark run --bank question-banks/example.toml");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizmark configuration

# Minimum word overlap (0.0 to 1.0) for an answer to pass.
threshold = 0.75

# Shuffle questions on every attempt (same as -r).
randomize = false

# Accept any answer and show the reference (same as -k).
skip = false

# Question bank file or directory. Leave unset for the built-in bank.
# bank = "question-banks"
"#;

const EXAMPLE_BANK: &str = r#"[bank]
id = "example"
name = "Example Bank"
description = "A small bank to get started"

[[questions]]
id = "rust-ownership"
name = "RUST: Ownership"
prompt = "What happens to a value when its owner goes out of scope?"
reference_answer = "The value is dropped and its memory is freed."
tags = ["rust"]

[[questions]]
id = "rust-borrowing"
name = "RUST: Borrowing"
prompt = "How many mutable references to a value can exist at once?"
reference_answer = "Only one mutable reference, and no shared references at the same time."
tags = ["rust"]
"#;
