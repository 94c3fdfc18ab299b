//! Collaborator traits consumed by the quiz session.
//!
//! The session never owns its question data or its randomness: both are
//! injected so that tests can supply synthetic banks and fixed permutations.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::model::Question;

// ---------------------------------------------------------------------------
// Question bank
// ---------------------------------------------------------------------------

/// Read-only source of questions.
pub trait QuestionBank {
    /// All questions in their natural order. Must return the same order on
    /// every call within a process.
    fn list_questions(&self) -> &[Question];

    /// Number of questions in the bank.
    fn len(&self) -> usize {
        self.list_questions().len()
    }

    fn is_empty(&self) -> bool {
        self.list_questions().is_empty()
    }
}

impl QuestionBank for [Question] {
    fn list_questions(&self) -> &[Question] {
        self
    }
}

impl QuestionBank for Vec<Question> {
    fn list_questions(&self) -> &[Question] {
        self
    }
}

// ---------------------------------------------------------------------------
// Shuffle capability
// ---------------------------------------------------------------------------

/// Produces a permutation of question positions for one attempt.
pub trait Shuffle {
    /// Permute `order` in place. `order` holds positions into the bank's
    /// natural order.
    fn shuffle(&mut self, order: &mut [usize]);
}

/// Any `FnMut(&mut [usize])` can stand in for a shuffle.
impl<F> Shuffle for F
where
    F: FnMut(&mut [usize]),
{
    fn shuffle(&mut self, order: &mut [usize]) {
        self(order)
    }
}

/// Shuffle backed by a `rand` generator, seeded once.
#[derive(Debug, Clone)]
pub struct RandomShuffle<R = StdRng> {
    rng: R,
}

impl RandomShuffle<StdRng> {
    /// Seed from the operating system's entropy source.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Seed deterministically, for reproducible question order.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> RandomShuffle<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> Shuffle for RandomShuffle<R> {
    fn shuffle(&mut self, order: &mut [usize]) {
        order.shuffle(&mut self.rng);
    }
}

/// Shuffle that leaves the natural order untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NaturalOrder;

impl Shuffle for NaturalOrder {
    fn shuffle(&mut self, _order: &mut [usize]) {}
}
