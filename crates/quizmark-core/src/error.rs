//! Core error types.
//!
//! A failed answer is never an error: it is a `Fail` verdict and drives a
//! restart. These types cover misconfiguration and misuse of the session
//! state machine by a driver.

use thiserror::Error;

use crate::session::PhaseKind;

/// Errors raised while building a session configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// The pass threshold is not a finite number in `[0.0, 1.0]`.
    #[error("threshold must be between 0.0 and 1.0, got {0}")]
    InvalidThreshold(f64),
}

/// Errors raised by the quiz session state machine.
#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    /// The event cannot be applied in the current phase.
    #[error("cannot apply {event} while {phase}")]
    InvalidTransition {
        phase: PhaseKind,
        event: &'static str,
    },

    /// The ordering points at a question the bank no longer holds.
    #[error("question {index} of the current ordering is missing from the bank")]
    MissingQuestion { index: usize },

    /// The session configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl SessionError {
    /// Returns `true` if the session had already completed.
    pub fn is_after_completion(&self) -> bool {
        matches!(
            self,
            SessionError::InvalidTransition {
                phase: PhaseKind::Completed,
                ..
            }
        )
    }
}
