//! quizmark-core: answer matching engine and quiz session state machine.
//!
//! This crate defines the question model, the text normalization and
//! similarity scoring used to judge free-text answers, and the session
//! state machine that sequences a quiz run.

pub mod config;
pub mod driver;
pub mod error;
pub mod evaluator;
pub mod model;
pub mod parser;
pub mod report;
pub mod session;
pub mod similarity;
pub mod text;
pub mod traits;
