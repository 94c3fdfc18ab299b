//! Configuration file loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::evaluator::DEFAULT_THRESHOLD;
use crate::model::SessionConfig;

/// Top-level quizmark configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizmarkConfig {
    /// Minimum similarity for an answer to pass.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Shuffle questions on every attempt.
    #[serde(default)]
    pub randomize: bool,
    /// Accept any answer and reveal the reference.
    #[serde(default)]
    pub skip: bool,
    /// Question bank file or directory. The built-in bank is used when unset.
    #[serde(default)]
    pub bank: Option<PathBuf>,
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

impl Default for QuizmarkConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            randomize: false,
            skip: false,
            bank: None,
        }
    }
}

impl QuizmarkConfig {
    /// Session policy from the file, with command-line switches layered on.
    ///
    /// Flags can only turn a mode on; `threshold` replaces the configured one.
    pub fn session_config(
        &self,
        randomize: bool,
        skip: bool,
        threshold: Option<f64>,
    ) -> Result<SessionConfig> {
        let config = SessionConfig::new(
            self.randomize || randomize,
            self.skip || skip,
            threshold.unwrap_or(self.threshold),
        )?;
        Ok(config)
    }
}

/// Load config from an explicit path, or search the well-known paths.
///
/// Search order without an explicit path:
/// 1. `quizmark.toml` in the current directory
/// 2. `~/.config/quizmark/config.toml`
///
/// Environment variable overrides: `QUIZMARK_THRESHOLD`, `QUIZMARK_BANK`.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizmarkConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizmark.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded config");
            config
        }
        None => QuizmarkConfig::default(),
    };

    apply_env_overrides(&mut config, |name| std::env::var(name).ok())?;

    Ok(config)
}

/// Parse a config file body.
pub fn parse_config(content: &str) -> Result<QuizmarkConfig> {
    let config: QuizmarkConfig = toml::from_str(content)?;
    Ok(config)
}

/// Apply `QUIZMARK_*` overrides using `lookup` to read variables.
fn apply_env_overrides<F>(config: &mut QuizmarkConfig, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = lookup("QUIZMARK_THRESHOLD") {
        config.threshold = raw
            .trim()
            .parse()
            .with_context(|| format!("invalid QUIZMARK_THRESHOLD: '{raw}'"))?;
    }

    if let Some(bank) = lookup("QUIZMARK_BANK").filter(|b| !b.trim().is_empty()) {
        config.bank = Some(PathBuf::from(bank));
    }

    Ok(())
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizmark"))
}
