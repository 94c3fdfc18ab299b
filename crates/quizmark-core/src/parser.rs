//! TOML question bank parser.
//!
//! Loads question banks from TOML files and directories, and validates them.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{InMemoryBank, Question};
use crate::text::normalize;

/// Intermediate TOML structure for parsing bank files.
#[derive(Debug, Deserialize)]
struct TomlBankFile {
    bank: TomlBankHeader,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlBankHeader {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    id: String,
    #[serde(default)]
    name: Option<String>,
    prompt: String,
    reference_answer: String,
    #[serde(default)]
    tags: Vec<String>,
}

/// Parse a single TOML file into a bank.
pub fn parse_bank(path: &Path) -> Result<InMemoryBank> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question bank: {}", path.display()))?;

    parse_bank_str(&content, path)
}

/// Parse a TOML string into a bank (useful for testing and embedded banks).
pub fn parse_bank_str(content: &str, source_path: &Path) -> Result<InMemoryBank> {
    let parsed: TomlBankFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let questions = parsed
        .questions
        .into_iter()
        .map(|q| Question {
            name: q.name.unwrap_or_else(|| q.id.clone()),
            id: q.id,
            prompt: q.prompt,
            reference_answer: q.reference_answer,
            tags: q.tags,
        })
        .collect();

    Ok(InMemoryBank {
        id: parsed.bank.id,
        name: parsed.bank.name,
        description: parsed.bank.description,
        questions,
    })
}

/// Recursively load all `.toml` bank files from a directory, in path order.
pub fn load_bank_directory(dir: &Path) -> Result<Vec<InMemoryBank>> {
    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut paths = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    paths.sort();

    let mut banks = Vec::new();
    for path in paths {
        if path.is_dir() {
            banks.extend(load_bank_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_bank(&path) {
                Ok(bank) => banks.push(bank),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(banks)
}

/// Load a bank file, or every bank in a directory merged into one.
pub fn load_bank(path: &Path) -> Result<InMemoryBank> {
    if !path.is_dir() {
        return parse_bank(path);
    }

    let mut banks = load_bank_directory(path)?;
    anyhow::ensure!(
        !banks.is_empty(),
        "no question banks found in {}",
        path.display()
    );
    if banks.len() == 1 {
        return Ok(banks.remove(0));
    }

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(InMemoryBank::merge(name.clone(), name, banks))
}

/// A warning from bank validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question ID (if applicable).
    pub question_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a bank for common issues.
pub fn validate_bank(bank: &InMemoryBank) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if bank.questions.is_empty() {
        warnings.push(ValidationWarning {
            question_id: None,
            message: "bank has no questions".into(),
        });
    }

    // Check for duplicate question IDs
    let mut seen_ids = std::collections::HashSet::new();
    for question in &bank.questions {
        if !seen_ids.insert(&question.id) {
            warnings.push(ValidationWarning {
                question_id: Some(question.id.clone()),
                message: format!("duplicate question ID: {}", question.id),
            });
        }
    }

    for question in &bank.questions {
        if question.prompt.trim().is_empty() {
            warnings.push(ValidationWarning {
                question_id: Some(question.id.clone()),
                message: "prompt is empty".into(),
            });
        }
    }

    // A reference with no letters left after normalization only matches an
    // answer that also has none.
    for question in &bank.questions {
        let message = if question.reference_answer.trim().is_empty() {
            "reference answer is empty"
        } else if normalize(&question.reference_answer).is_empty() {
            "reference answer has no words after normalization"
        } else {
            continue;
        };
        warnings.push(ValidationWarning {
            question_id: Some(question.id.clone()),
            message: message.into(),
        });
    }

    warnings
}
