//! The `quizmark run` command.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};

use quizmark_core::config::load_config_from;
use quizmark_core::driver::run_session;
use quizmark_core::parser::validate_bank;
use quizmark_core::session::QuizSession;
use quizmark_core::traits::RandomShuffle;

use crate::bank;
use crate::console::ConsoleFrontend;

pub fn execute(
    randomize: bool,
    skip: bool,
    bank_path: Option<PathBuf>,
    threshold: Option<f64>,
    seed: Option<u64>,
    tags: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let session_config = config.session_config(randomize, skip, threshold)?;

    let bank_path = bank_path.or_else(|| config.bank.clone());
    let mut bank = bank::resolve(bank_path.as_deref())?;
    bank::filter_tags(&mut bank, tags.as_deref())?;

    for w in validate_bank(&bank) {
        match &w.question_id {
            Some(id) => tracing::warn!(question = %id, "{}", w.message),
            None => tracing::warn!(bank = %bank.id, "{}", w.message),
        }
    }

    let shuffle = match seed {
        Some(seed) => RandomShuffle::seeded(seed),
        None => RandomShuffle::from_entropy(),
    };
    let mut session = QuizSession::new(&bank, shuffle, session_config)?;

    let mut frontend = ConsoleFrontend::new(io::stdin().lock(), io::stdout().lock(), &bank.name);
    run_session(&mut session, &mut frontend)?;
    frontend
        .finish()
        .context("failed to write quiz output")?;

    Ok(())
}
