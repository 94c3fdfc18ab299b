//! Quiz session state machine.
//!
//! A session walks an ordering of the bank's questions:
//!
//! ```text
//! NotStarted -> Presenting(i) -> AwaitingAnswer(i) -> Evaluated(i, result)
//! Evaluated(i, pass) -> Presenting(i + 1) | Completed
//! Evaluated(i, fail) -> Restarting -> Presenting(0)
//! ```
//!
//! Every transition is driven by an explicit [`Event`]. The session performs
//! no I/O: rendering prompts and reading answers belong to whoever feeds it
//! events (see [`crate::driver`]).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SessionError;
use crate::evaluator::{evaluate, Outcome, Verdict};
use crate::model::{Question, SessionConfig};
use crate::similarity::{compare, Comparison};
use crate::traits::{QuestionBank, Shuffle};

/// Where the session currently stands.
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    NotStarted,
    /// Question `index` of the current ordering is about to be shown.
    Presenting { index: usize },
    /// Question `index` is shown; waiting for the user's answer.
    AwaitingAnswer { index: usize },
    /// The answer to question `index` has been judged.
    Evaluated { index: usize, result: AnswerResult },
    /// The attempt failed; the next `Continue` starts a new attempt.
    Restarting,
    Completed,
}

impl Phase {
    /// The phase without its payload.
    pub fn kind(&self) -> PhaseKind {
        match self {
            Phase::NotStarted => PhaseKind::NotStarted,
            Phase::Presenting { .. } => PhaseKind::Presenting,
            Phase::AwaitingAnswer { .. } => PhaseKind::AwaitingAnswer,
            Phase::Evaluated { .. } => PhaseKind::Evaluated,
            Phase::Restarting => PhaseKind::Restarting,
            Phase::Completed => PhaseKind::Completed,
        }
    }

    fn label(&self) -> &'static str {
        self.kind().label()
    }
}

/// Fieldless counterpart of [`Phase`], carried by errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhaseKind {
    NotStarted,
    Presenting,
    AwaitingAnswer,
    Evaluated,
    Restarting,
    Completed,
}

impl PhaseKind {
    pub fn label(self) -> &'static str {
        match self {
            PhaseKind::NotStarted => "not started",
            PhaseKind::Presenting => "presenting",
            PhaseKind::AwaitingAnswer => "awaiting answer",
            PhaseKind::Evaluated => "evaluated",
            PhaseKind::Restarting => "restarting",
            PhaseKind::Completed => "completed",
        }
    }
}

impl fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Presenting { index } | Phase::AwaitingAnswer { index } => {
                write!(f, "{}({index})", self.label())
            }
            Phase::Evaluated { index, result } => {
                write!(f, "{}({index}, {})", self.label(), result.outcome)
            }
            _ => f.write_str(self.label()),
        }
    }
}

/// Inputs that move the session forward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Begin the first attempt.
    Start,
    /// The current prompt has been rendered.
    Presented,
    /// The user's raw answer (possibly empty).
    Answered(String),
    /// Acknowledge a result or a restart and move on.
    Continue,
}

impl Event {
    fn label(&self) -> &'static str {
        match self {
            Event::Start => "start",
            Event::Presented => "presented",
            Event::Answered(_) => "answered",
            Event::Continue => "continue",
        }
    }
}

/// What the presentation layer needs to show one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderRequest {
    /// Zero-based position in the current ordering.
    pub index: usize,
    /// Number of questions in the ordering.
    pub total: usize,
    /// Attempt number, starting at 1.
    pub attempt: u32,
    pub question_id: String,
    pub name: String,
    pub prompt: String,
    pub skip_mode: bool,
}

impl RenderRequest {
    /// One-based question number for display.
    pub fn number(&self) -> usize {
        self.index + 1
    }
}

/// The judged answer to one question, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerResult {
    pub question_id: String,
    pub outcome: Outcome,
    /// Score and threshold; absent in skip mode where nothing is compared.
    pub verdict: Option<Verdict>,
    /// Word breakdown, present when a compared answer failed.
    pub comparison: Option<Comparison>,
    /// Revealed on a failure and always in skip mode.
    pub reference_answer: Option<String>,
    /// The raw input as typed.
    pub input: String,
}

/// Mutable state owned by one session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub phase: Phase,
    /// Positions into the bank's natural order, one per question.
    pub ordering: Vec<usize>,
    /// Current attempt, starting at 1 once the session has started.
    pub attempt: u32,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            phase: Phase::NotStarted,
            ordering: Vec::new(),
            attempt: 0,
        }
    }
}

/// A single quiz run over a question bank.
pub struct QuizSession<'a> {
    bank: &'a dyn QuestionBank,
    shuffle: Box<dyn Shuffle + 'a>,
    config: SessionConfig,
    state: SessionState,
}

impl<'a> QuizSession<'a> {
    /// Create a session in the `NotStarted` phase.
    pub fn new(
        bank: &'a dyn QuestionBank,
        shuffle: impl Shuffle + 'a,
        config: SessionConfig,
    ) -> Result<Self, SessionError> {
        config.validate()?;
        Ok(Self {
            bank,
            shuffle: Box::new(shuffle),
            config,
            state: SessionState::default(),
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> &Phase {
        &self.state.phase
    }

    pub fn attempt(&self) -> u32 {
        self.state.attempt
    }

    /// Number of questions in one attempt.
    pub fn total(&self) -> usize {
        self.bank.list_questions().len()
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.state.phase, Phase::Completed)
    }

    /// Question ids in the current attempt's order.
    pub fn ordered_ids(&self) -> Vec<&str> {
        let questions = self.bank.list_questions();
        self.state
            .ordering
            .iter()
            .filter_map(|&pos| questions.get(pos))
            .map(|q| q.id.as_str())
            .collect()
    }

    /// The question at `index` of the current ordering.
    pub fn question_at(&self, index: usize) -> Option<&Question> {
        let pos = *self.state.ordering.get(index)?;
        self.bank.list_questions().get(pos)
    }

    /// The question the session is currently working on, if any.
    pub fn current_question(&self) -> Option<&Question> {
        match self.state.phase {
            Phase::Presenting { index }
            | Phase::AwaitingAnswer { index }
            | Phase::Evaluated { index, .. } => self.question_at(index),
            _ => None,
        }
    }

    /// The render request for the question being presented.
    pub fn render_request(&self) -> Option<RenderRequest> {
        let index = match self.state.phase {
            Phase::Presenting { index } | Phase::AwaitingAnswer { index } => index,
            _ => return None,
        };
        let question = self.question_at(index)?;
        Some(RenderRequest {
            index,
            total: self.state.ordering.len(),
            attempt: self.state.attempt,
            question_id: question.id.clone(),
            name: question.name.clone(),
            prompt: question.prompt.clone(),
            skip_mode: self.config.skip_mode,
        })
    }

    /// The most recent result, while the session is in `Evaluated`.
    pub fn last_result(&self) -> Option<&AnswerResult> {
        match &self.state.phase {
            Phase::Evaluated { result, .. } => Some(result),
            _ => None,
        }
    }

    /// Apply `event` and return the new phase.
    ///
    /// An event that does not fit the current phase is rejected and the state
    /// is left unchanged.
    pub fn apply(&mut self, event: Event) -> Result<&Phase, SessionError> {
        let phase = std::mem::replace(&mut self.state.phase, Phase::NotStarted);

        let next = match (phase, event) {
            (Phase::NotStarted, Event::Start) => {
                self.state.attempt = 1;
                self.begin_attempt()
            }
            (Phase::Presenting { index }, Event::Presented) => Phase::AwaitingAnswer { index },
            (Phase::AwaitingAnswer { index }, Event::Answered(input)) => {
                match self.judge(index, input) {
                    Some(result) => Phase::Evaluated { index, result },
                    None => {
                        self.state.phase = Phase::AwaitingAnswer { index };
                        return Err(SessionError::MissingQuestion { index });
                    }
                }
            }
            (Phase::Evaluated { index, result }, Event::Continue) => match result.outcome {
                Outcome::Pass if index + 1 < self.state.ordering.len() => {
                    Phase::Presenting { index: index + 1 }
                }
                Outcome::Pass => {
                    tracing::info!(attempt = self.state.attempt, "session completed");
                    Phase::Completed
                }
                Outcome::Fail => Phase::Restarting,
            },
            (Phase::Restarting, Event::Continue) => {
                self.state.attempt = self.state.attempt.saturating_add(1);
                tracing::info!(attempt = self.state.attempt, "restarting session");
                self.begin_attempt()
            }
            (phase, event) => {
                let err = SessionError::InvalidTransition {
                    phase: phase.kind(),
                    event: event.label(),
                };
                self.state.phase = phase;
                return Err(err);
            }
        };

        tracing::debug!(attempt = self.state.attempt, phase = %next, "session transition");
        self.state.phase = next;
        Ok(&self.state.phase)
    }

    /// Draw the ordering for a new attempt and point at its first question.
    fn begin_attempt(&mut self) -> Phase {
        self.state.ordering = self.draw_ordering();
        if self.state.ordering.is_empty() {
            Phase::Completed
        } else {
            Phase::Presenting { index: 0 }
        }
    }

    fn draw_ordering(&mut self) -> Vec<usize> {
        let total = self.total();
        let mut order: Vec<usize> = (0..total).collect();
        if !self.config.randomize_order {
            return order;
        }

        self.shuffle.shuffle(&mut order);

        let mut check = order.clone();
        check.sort_unstable();
        if check.len() != total || check.iter().enumerate().any(|(i, &pos)| i != pos) {
            tracing::warn!(total, "shuffle did not return a permutation, using natural order");
            return (0..total).collect();
        }
        order
    }

    /// Judge `input` against question `index`, or `None` if the bank no
    /// longer holds it.
    fn judge(&self, index: usize, input: String) -> Option<AnswerResult> {
        let question = self.question_at(index)?;

        if self.config.skip_mode {
            return Some(AnswerResult {
                question_id: question.id.clone(),
                outcome: Outcome::Pass,
                verdict: None,
                comparison: None,
                reference_answer: Some(question.reference_answer.clone()),
                input,
            });
        }

        let verdict = evaluate(&input, &question.reference_answer, self.config.threshold);
        let (comparison, reference_answer) = if verdict.is_pass() {
            (None, None)
        } else {
            (
                Some(compare(&input, &question.reference_answer)),
                Some(question.reference_answer.clone()),
            )
        };

        tracing::debug!(
            question = %question.id,
            score = verdict.score,
            outcome = %verdict.outcome,
            "answer judged"
        );

        Some(AnswerResult {
            question_id: question.id.clone(),
            outcome: verdict.outcome,
            verdict: Some(verdict),
            comparison,
            reference_answer,
            input,
        })
    }
}

impl fmt::Debug for QuizSession<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("questions", &self.total())
            .field("config", &self.config)
            .field("state", &self.state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::NaturalOrder;

    fn bank(n: usize) -> Vec<Question> {
        (1..=n)
            .map(|i| Question {
                id: format!("q{i}"),
                name: format!("Question {i}"),
                prompt: format!("What is number {i}?"),
                reference_answer: format!("the answer is number {}", word(i)),
                tags: vec![],
            })
            .collect()
    }

    fn word(i: usize) -> &'static str {
        ["zero", "one", "two", "three", "four", "five", "six"][i]
    }

    fn right(i: usize) -> String {
        format!("The answer is number {}!", word(i))
    }

    fn strict() -> SessionConfig {
        SessionConfig::default()
    }

    fn skip() -> SessionConfig {
        SessionConfig {
            skip_mode: true,
            ..SessionConfig::default()
        }
    }

    /// Present the current question and answer it.
    fn answer(session: &mut QuizSession<'_>, input: &str) -> AnswerResult {
        session.apply(Event::Presented).unwrap();
        session.apply(Event::Answered(input.to_string())).unwrap();
        session.last_result().cloned().unwrap()
    }

    #[test]
    fn start_presents_first_question() {
        let questions = bank(3);
        let mut session = QuizSession::new(&questions, NaturalOrder, strict()).unwrap();
        assert_eq!(session.phase(), &Phase::NotStarted);
        assert_eq!(session.attempt(), 0);

        let phase = session.apply(Event::Start).unwrap();
        assert_eq!(phase, &Phase::Presenting { index: 0 });
        assert_eq!(session.attempt(), 1);
        assert_eq!(session.ordered_ids(), vec!["q1", "q2", "q3"]);

        let request = session.render_request().unwrap();
        assert_eq!(request.index, 0);
        assert_eq!(request.number(), 1);
        assert_eq!(request.total, 3);
        assert_eq!(request.name, "Question 1");
        assert_eq!(request.prompt, "What is number 1?");
        assert!(!request.skip_mode);
    }

    #[test]
    fn all_passing_answers_complete_in_one_attempt() {
        let questions = bank(3);
        let mut session = QuizSession::new(&questions, NaturalOrder, strict()).unwrap();
        session.apply(Event::Start).unwrap();

        for i in 1..=3 {
            let result = answer(&mut session, &right(i));
            assert_eq!(result.outcome, Outcome::Pass);
            assert_eq!(result.verdict.unwrap().score, 1.0);
            assert!(result.reference_answer.is_none());
            session.apply(Event::Continue).unwrap();
        }

        assert!(session.is_complete());
        assert_eq!(session.attempt(), 1);
    }

    #[test]
    fn failure_on_third_question_restarts_at_first() {
        let questions = bank(5);
        let mut session = QuizSession::new(&questions, NaturalOrder, strict()).unwrap();
        session.apply(Event::Start).unwrap();

        answer(&mut session, &right(1));
        session.apply(Event::Continue).unwrap();
        answer(&mut session, &right(2));
        session.apply(Event::Continue).unwrap();

        let result = answer(&mut session, "no idea");
        assert_eq!(result.outcome, Outcome::Fail);
        assert_eq!(result.question_id, "q3");
        assert_eq!(
            result.reference_answer.as_deref(),
            Some("the answer is number three")
        );
        assert!(result.comparison.is_some());

        assert_eq!(session.apply(Event::Continue).unwrap(), &Phase::Restarting);
        assert_eq!(session.attempt(), 1);

        assert_eq!(
            session.apply(Event::Continue).unwrap(),
            &Phase::Presenting { index: 0 }
        );
        assert_eq!(session.attempt(), 2);
        assert_eq!(session.current_question().unwrap().id, "q1");
    }

    #[test]
    fn restarts_are_unbounded_until_a_clean_run() {
        let questions = bank(2);
        let mut session = QuizSession::new(&questions, NaturalOrder, strict()).unwrap();
        session.apply(Event::Start).unwrap();

        for _ in 0..10 {
            answer(&mut session, "");
            session.apply(Event::Continue).unwrap();
            session.apply(Event::Continue).unwrap();
        }
        assert_eq!(session.attempt(), 11);

        answer(&mut session, &right(1));
        session.apply(Event::Continue).unwrap();
        answer(&mut session, &right(2));
        session.apply(Event::Continue).unwrap();
        assert!(session.is_complete());
        assert_eq!(session.attempt(), 11);
    }

    #[test]
    fn skip_mode_passes_any_input_in_one_pass() {
        let questions = bank(4);
        let mut session = QuizSession::new(&questions, NaturalOrder, skip()).unwrap();
        session.apply(Event::Start).unwrap();
        assert!(session.render_request().unwrap().skip_mode);

        for (i, input) in ["", "garbage", "???", ""].iter().enumerate() {
            let result = answer(&mut session, input);
            assert_eq!(result.outcome, Outcome::Pass);
            assert!(result.verdict.is_none());
            assert_eq!(
                result.reference_answer.as_deref(),
                Some(questions[i].reference_answer.as_str())
            );
            session.apply(Event::Continue).unwrap();
        }

        assert!(session.is_complete());
        assert_eq!(session.attempt(), 1);
    }

    #[test]
    fn randomized_order_draws_a_new_permutation_each_attempt() {
        let questions = bank(3);
        let mut draws = 0u32;
        let rotate = move |order: &mut [usize]| {
            draws += 1;
            order.rotate_left(draws as usize % order.len());
        };
        let config = SessionConfig {
            randomize_order: true,
            ..SessionConfig::default()
        };
        let mut session = QuizSession::new(&questions, rotate, config).unwrap();

        session.apply(Event::Start).unwrap();
        assert_eq!(session.ordered_ids(), vec!["q2", "q3", "q1"]);
        assert_eq!(session.current_question().unwrap().id, "q2");

        answer(&mut session, "wrong");
        session.apply(Event::Continue).unwrap();
        session.apply(Event::Continue).unwrap();
        assert_eq!(session.ordered_ids(), vec!["q3", "q1", "q2"]);
        assert_eq!(session.state().phase, Phase::Presenting { index: 0 });
    }

    #[test]
    fn sequential_order_is_stable_across_restarts() {
        let questions = bank(3);
        let mut session = QuizSession::new(
            &questions,
            |order: &mut [usize]| order.reverse(),
            strict(),
        )
        .unwrap();
        session.apply(Event::Start).unwrap();
        assert_eq!(session.ordered_ids(), vec!["q1", "q2", "q3"]);

        answer(&mut session, "wrong");
        session.apply(Event::Continue).unwrap();
        session.apply(Event::Continue).unwrap();
        assert_eq!(session.ordered_ids(), vec!["q1", "q2", "q3"]);
    }

    #[test]
    fn broken_shuffle_falls_back_to_natural_order() {
        let questions = bank(3);
        let config = SessionConfig {
            randomize_order: true,
            ..SessionConfig::default()
        };
        let mut session =
            QuizSession::new(&questions, |order: &mut [usize]| order.fill(0), config).unwrap();
        session.apply(Event::Start).unwrap();
        assert_eq!(session.ordered_ids(), vec!["q1", "q2", "q3"]);
    }

    #[test]
    fn empty_bank_completes_immediately() {
        let questions: Vec<Question> = vec![];
        let mut session = QuizSession::new(&questions, NaturalOrder, strict()).unwrap();
        assert_eq!(session.apply(Event::Start).unwrap(), &Phase::Completed);
        assert!(session.render_request().is_none());
    }

    #[test]
    fn invalid_events_leave_state_untouched() {
        let questions = bank(2);
        let mut session = QuizSession::new(&questions, NaturalOrder, strict()).unwrap();

        let err = session.apply(Event::Continue).unwrap_err();
        assert_eq!(
            err,
            SessionError::InvalidTransition {
                phase: PhaseKind::NotStarted,
                event: "continue",
            }
        );
        assert_eq!(session.phase(), &Phase::NotStarted);

        session.apply(Event::Start).unwrap();
        assert!(session.apply(Event::Answered("early".into())).is_err());
        assert_eq!(session.phase(), &Phase::Presenting { index: 0 });
    }

    /// A bank whose questions can be withdrawn mid-session.
    struct WithdrawableBank {
        questions: Vec<Question>,
        withdrawn: std::cell::Cell<bool>,
    }

    impl QuestionBank for WithdrawableBank {
        fn list_questions(&self) -> &[Question] {
            if self.withdrawn.get() {
                &[]
            } else {
                &self.questions
            }
        }
    }

    #[test]
    fn withdrawn_questions_are_an_error_not_a_panic() {
        let bank = WithdrawableBank {
            questions: bank(2),
            withdrawn: std::cell::Cell::new(false),
        };
        let mut session = QuizSession::new(&bank, NaturalOrder, strict()).unwrap();
        session.apply(Event::Start).unwrap();
        session.apply(Event::Presented).unwrap();

        bank.withdrawn.set(true);
        assert!(session.ordered_ids().is_empty());
        assert!(session.render_request().is_none());

        let err = session.apply(Event::Answered(right(1))).unwrap_err();
        assert_eq!(err, SessionError::MissingQuestion { index: 0 });
        assert_eq!(session.phase(), &Phase::AwaitingAnswer { index: 0 });
    }

    #[test]
    fn attempt_counter_saturates() {
        let questions = bank(1);
        let mut session = QuizSession::new(&questions, NaturalOrder, strict()).unwrap();
        session.apply(Event::Start).unwrap();
        session.state.attempt = u32::MAX;

        answer(&mut session, "no idea");
        assert_eq!(session.apply(Event::Continue).unwrap(), &Phase::Restarting);
        session.apply(Event::Continue).unwrap();

        assert_eq!(session.attempt(), u32::MAX);
        assert_eq!(session.phase(), &Phase::Presenting { index: 0 });
    }

    #[test]
    fn events_after_completion_are_rejected() {
        let questions = bank(1);
        let mut session = QuizSession::new(&questions, NaturalOrder, skip()).unwrap();
        session.apply(Event::Start).unwrap();
        answer(&mut session, "");
        session.apply(Event::Continue).unwrap();
        assert!(session.is_complete());

        let err = session.apply(Event::Start).unwrap_err();
        assert!(err.is_after_completion());
        assert!(session.is_complete());
    }

    #[test]
    fn invalid_threshold_is_rejected_at_construction() {
        let questions = bank(1);
        let config = SessionConfig {
            threshold: 2.0,
            ..SessionConfig::default()
        };
        assert!(matches!(
            QuizSession::new(&questions, NaturalOrder, config),
            Err(SessionError::Config(_))
        ));
    }

    #[test]
    fn phase_display_includes_position() {
        assert_eq!(Phase::Presenting { index: 2 }.to_string(), "presenting(2)");
        assert_eq!(Phase::Restarting.to_string(), "restarting");
    }
}
