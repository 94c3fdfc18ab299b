//! Core data model types for quizmark.
//!
//! These are the fundamental types the rest of the crate works with:
//! questions, the banks that hold them, and the session configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::evaluator::DEFAULT_THRESHOLD;
use crate::traits::QuestionBank;

/// A single open-ended question with its reference answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Unique identifier within its bank.
    pub id: String,
    /// Human-readable title shown above the prompt.
    pub name: String,
    /// The text presented to the user.
    pub prompt: String,
    /// The answer the user's input is compared against.
    pub reference_answer: String,
    /// Tags for filtering questions.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A named, ordered collection of questions held in memory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InMemoryBank {
    /// Unique identifier for this bank.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Description of this bank.
    #[serde(default)]
    pub description: String,
    /// The questions, in their natural order.
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl InMemoryBank {
    /// Build a bank from a list of questions.
    pub fn new(id: impl Into<String>, name: impl Into<String>, questions: Vec<Question>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            questions,
        }
    }

    /// Concatenate several banks into one, preserving each bank's order.
    pub fn merge(id: impl Into<String>, name: impl Into<String>, banks: Vec<InMemoryBank>) -> Self {
        let questions = banks.into_iter().flat_map(|b| b.questions).collect();
        Self::new(id, name, questions)
    }

    /// Keep only questions carrying at least one of `tags`.
    pub fn retain_tags(&mut self, tags: &[&str]) {
        self.questions
            .retain(|q| q.tags.iter().any(|t| tags.contains(&t.as_str())));
    }
}

impl QuestionBank for InMemoryBank {
    fn list_questions(&self) -> &[Question] {
        &self.questions
    }
}

/// How a session orders its questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderMode {
    Sequential,
    Randomized,
}

impl fmt::Display for OrderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderMode::Sequential => write!(f, "SEQUENTIAL"),
            OrderMode::Randomized => write!(f, "RANDOMIZED"),
        }
    }
}

/// Session policy, fixed for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Draw a fresh random permutation for every attempt.
    pub randomize_order: bool,
    /// Accept any input as a pass and reveal the reference answer.
    pub skip_mode: bool,
    /// Minimum similarity for an answer to pass.
    pub threshold: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            randomize_order: false,
            skip_mode: false,
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl SessionConfig {
    /// Build a validated configuration.
    pub fn new(randomize_order: bool, skip_mode: bool, threshold: f64) -> Result<Self, ConfigError> {
        let config = Self {
            randomize_order,
            skip_mode,
            threshold,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that the threshold is a finite value in `[0.0, 1.0]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(ConfigError::InvalidThreshold(self.threshold));
        }
        Ok(())
    }

    pub fn order_mode(&self) -> OrderMode {
        if self.randomize_order {
            OrderMode::Randomized
        } else {
            OrderMode::Sequential
        }
    }
}
