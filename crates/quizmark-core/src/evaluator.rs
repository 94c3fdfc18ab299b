//! Pass/fail evaluation of a free-text answer.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::similarity::similarity;
use crate::text::normalize;

/// Similarity required for an answer to pass unless configured otherwise.
pub const DEFAULT_THRESHOLD: f64 = 0.75;

/// Whether an answer was accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Pass,
    Fail,
}

impl Outcome {
    pub fn is_pass(self) -> bool {
        matches!(self, Outcome::Pass)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Pass => write!(f, "pass"),
            Outcome::Fail => write!(f, "fail"),
        }
    }
}

/// The result of scoring one answer against its reference.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub outcome: Outcome,
    /// Similarity score in `[0.0, 1.0]`.
    pub score: f64,
    /// Threshold the score was compared against.
    pub threshold: f64,
}

impl Verdict {
    /// Pass iff `score >= threshold`.
    pub fn from_score(score: f64, threshold: f64) -> Self {
        let outcome = if score >= threshold {
            Outcome::Pass
        } else {
            Outcome::Fail
        };
        Self {
            outcome,
            score,
            threshold,
        }
    }

    pub fn is_pass(&self) -> bool {
        self.outcome.is_pass()
    }
}

/// Score `user_answer` against `reference_answer` and apply `threshold`.
pub fn evaluate(user_answer: &str, reference_answer: &str, threshold: f64) -> Verdict {
    let answer = normalize(user_answer);
    let reference = normalize(reference_answer);
    let score = similarity(answer.as_str(), reference.as_str());

    tracing::debug!(score, threshold, "answer evaluated");

    Verdict::from_score(score, threshold)
}
