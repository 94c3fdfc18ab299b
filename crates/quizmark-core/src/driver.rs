//! Session driver.
//!
//! Feeds a [`QuizSession`] from a [`QuizFrontend`]: renders each prompt,
//! blocks on the frontend for the answer, shows the result, and loops through
//! restarts until the session completes.

use std::time::Instant;

use uuid::Uuid;

use crate::error::SessionError;
use crate::evaluator::Outcome;
use crate::model::SessionConfig;
use crate::report::{AttemptRecord, SessionOutcome, SessionSummary};
use crate::session::{AnswerResult, Event, Phase, QuizSession, RenderRequest};

/// Presentation layer for a quiz run.
///
/// Only `present`, `read_answer` and `show_result` are required; the
/// remaining hooks default to doing nothing.
pub trait QuizFrontend {
    /// Called once before the first attempt.
    fn on_session_start(&mut self, _config: &SessionConfig, _question_count: usize) {}

    /// Called before the first question of every attempt.
    fn on_attempt_start(&mut self, _attempt: u32, _config: &SessionConfig) {}

    /// Render one question.
    fn present(&mut self, request: &RenderRequest);

    /// Block until the user provides an answer. Returns an empty string when
    /// there is no input.
    fn read_answer(&mut self) -> String;

    /// Display the judged answer.
    fn show_result(&mut self, request: &RenderRequest, result: &AnswerResult);

    /// Called when a failed attempt is about to restart.
    fn on_restart(&mut self, _failed_attempt: u32) {}

    /// Called once the session has ended.
    fn on_complete(&mut self, _summary: &SessionSummary) {}

    /// Whether the input source has been exhausted.
    fn input_closed(&self) -> bool {
        false
    }
}

/// Drive `session` to the end and return its summary.
///
/// The loop ends when the session reaches `Completed`, or when the frontend
/// reports closed input while a restart is pending.
pub fn run_session(
    session: &mut QuizSession<'_>,
    frontend: &mut dyn QuizFrontend,
) -> Result<SessionSummary, SessionError> {
    let start = Instant::now();
    let started_at = chrono::Utc::now();
    let run_id = Uuid::new_v4();
    let config = *session.config();

    let span = tracing::info_span!("session", %run_id);
    let _guard = span.enter();
    tracing::info!(
        questions = session.total(),
        randomize = config.randomize_order,
        skip = config.skip_mode,
        threshold = config.threshold,
        "starting quiz session"
    );

    frontend.on_session_start(&config, session.total());

    let mut attempts = Vec::new();
    let mut answered = 0usize;
    let mut current: Option<RenderRequest> = None;

    let outcome = loop {
        match session.phase() {
            Phase::NotStarted => {
                session.apply(Event::Start)?;
            }
            Phase::Presenting { index } => {
                if *index == 0 {
                    answered = 0;
                    frontend.on_attempt_start(session.attempt(), &config);
                }
                if let Some(request) = session.render_request() {
                    frontend.present(&request);
                    current = Some(request);
                }
                session.apply(Event::Presented)?;
            }
            Phase::AwaitingAnswer { .. } => {
                let input = frontend.read_answer();
                session.apply(Event::Answered(input))?;
            }
            Phase::Evaluated { result, .. } => {
                answered += 1;
                if let Some(request) = &current {
                    frontend.show_result(request, result);
                }
                if result.outcome == Outcome::Fail {
                    attempts.push(AttemptRecord {
                        attempt: session.attempt(),
                        answered,
                        failed_question: Some(result.question_id.clone()),
                        failed_score: result.verdict.map(|v| v.score),
                    });
                }
                session.apply(Event::Continue)?;
            }
            Phase::Restarting => {
                frontend.on_restart(session.attempt());
                if frontend.input_closed() {
                    tracing::warn!(attempt = session.attempt(), "input closed, stopping session");
                    break SessionOutcome::InputClosed;
                }
                session.apply(Event::Continue)?;
            }
            Phase::Completed => {
                attempts.push(AttemptRecord {
                    attempt: session.attempt(),
                    answered,
                    failed_question: None,
                    failed_score: None,
                });
                break SessionOutcome::Completed;
            }
        }
    };

    let summary = SessionSummary {
        id: run_id,
        started_at,
        finished_at: chrono::Utc::now(),
        duration_ms: start.elapsed().as_millis() as u64,
        outcome,
        question_count: session.total(),
        order_mode: config.order_mode(),
        skip_mode: config.skip_mode,
        threshold: config.threshold,
        attempts,
    };

    tracing::info!(
        outcome = ?summary.outcome,
        attempts = summary.attempt_count(),
        duration_ms = summary.duration_ms,
        "quiz session finished"
    );

    frontend.on_complete(&summary);
    Ok(summary)
}
