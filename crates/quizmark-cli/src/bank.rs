//! Question bank selection for the CLI.

use std::path::Path;

use anyhow::Result;

use quizmark_core::model::InMemoryBank;
use quizmark_core::parser::{load_bank, parse_bank_str};

/// The palmistry bank compiled into the binary.
const BUILTIN_BANK: &str = include_str!("../../../question-banks/palmistry.toml");

pub fn builtin() -> Result<InMemoryBank> {
    parse_bank_str(BUILTIN_BANK, Path::new("<built-in>/palmistry.toml"))
}

/// Load the bank at `path`, or the built-in bank when no path is given.
pub fn resolve(path: Option<&Path>) -> Result<InMemoryBank> {
    match path {
        Some(path) => load_bank(path),
        None => builtin(),
    }
}

/// Narrow `bank` to the comma-separated `tags`, if any.
pub fn filter_tags(bank: &mut InMemoryBank, tags: Option<&str>) -> Result<()> {
    let Some(tags) = tags else {
        return Ok(());
    };
    let tags: Vec<&str> = tags
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    anyhow::ensure!(!tags.is_empty(), "--tags needs at least one tag");

    bank.retain_tags(&tags);
    anyhow::ensure!(
        !bank.questions.is_empty(),
        "no questions tagged {}",
        tags.join(", ")
    );
    Ok(())
}
