//! Session summary produced at the end of a run.
//!
//! Summaries are shown to the user and then dropped; nothing is written to
//! disk.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::OrderMode;

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionOutcome {
    /// Every question of the final attempt passed, or skip mode finished its pass.
    Completed,
    /// The input stream closed while the session was waiting to restart.
    InputClosed,
}

/// One attempt through the ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptRecord {
    /// Attempt number, starting at 1.
    pub attempt: u32,
    /// Questions answered during this attempt, including a failed one.
    pub answered: usize,
    /// Id of the question that ended the attempt, if it failed.
    #[serde(default)]
    pub failed_question: Option<String>,
    /// Score of the failed answer.
    #[serde(default)]
    pub failed_score: Option<f64>,
}

impl AttemptRecord {
    pub fn passed(&self) -> bool {
        self.failed_question.is_none()
    }
}

/// A complete session summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Unique run identifier.
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Wall-clock duration in milliseconds.
    pub duration_ms: u64,
    pub outcome: SessionOutcome,
    /// Number of questions in one attempt.
    pub question_count: usize,
    pub order_mode: OrderMode,
    pub skip_mode: bool,
    pub threshold: f64,
    /// Every attempt, in order.
    pub attempts: Vec<AttemptRecord>,
}

impl SessionSummary {
    /// Number of attempts made.
    pub fn attempt_count(&self) -> u32 {
        self.attempts.last().map(|a| a.attempt).unwrap_or(0)
    }

    /// Number of restarts triggered by failed answers.
    pub fn restarts(&self) -> usize {
        self.attempts.iter().filter(|a| !a.passed()).count()
    }

    pub fn completed(&self) -> bool {
        self.outcome == SessionOutcome::Completed
    }
}
