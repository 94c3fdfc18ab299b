//! Word-overlap similarity between answers.
//!
//! Scores are the Jaccard index of the two normalized word sets:
//! `|A ∩ B| / |A ∪ B|`. The score is symmetric and lies in `[0.0, 1.0]`.

use serde::{Deserialize, Serialize};

use crate::text::{normalize, tokenize, WordSet};

/// Compute the similarity of two strings, raw or already normalized.
///
/// - both empty after normalization: 1.0
/// - exactly one empty: 0.0
/// - otherwise the Jaccard index of their word sets
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = tokenize(&normalize(a));
    let b = tokenize(&normalize(b));
    jaccard(&a, &b)
}

/// Jaccard index of two word sets with the empty-set rules applied.
pub fn jaccard(a: &WordSet, b: &WordSet) -> f64 {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => return 1.0,
        (true, false) | (false, true) => return 0.0,
        (false, false) => {}
    }

    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;

    if union == 0 {
        return 0.0;
    }

    intersection as f64 / union as f64
}

/// Detailed comparison of an answer against a reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    /// Jaccard similarity of the two word sets.
    pub score: f64,
    /// Words found in both the answer and the reference.
    pub matched: Vec<String>,
    /// Reference words the answer left out.
    pub missing: Vec<String>,
    /// Answer words that are not in the reference.
    pub extra: Vec<String>,
}

impl Comparison {
    /// Size of the union of both word sets.
    pub fn union_size(&self) -> usize {
        self.matched.len() + self.missing.len() + self.extra.len()
    }
}

/// Compare `answer` against `reference`, keeping the word breakdown.
pub fn compare(answer: &str, reference: &str) -> Comparison {
    let answer_words = tokenize(&normalize(answer));
    let reference_words = tokenize(&normalize(reference));

    Comparison {
        score: jaccard(&answer_words, &reference_words),
        matched: answer_words
            .intersection(&reference_words)
            .cloned()
            .collect(),
        missing: reference_words
            .difference(&answer_words)
            .cloned()
            .collect(),
        extra: answer_words
            .difference(&reference_words)
            .cloned()
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: &[&str] = &[
        "",
        "   ",
        "123 !!!",
        "You are warm, friendly, and naturally expressive.",
        "you are warm friendly and naturally expressive",
        "Deep and Clear shows loyalty and lasting commitment",
        "deep and clear shows loyalty",
        "completely unrelated words here",
        "This is the ideal finish, indicating long-term stability.",
    ];

    #[test]
    fn symmetric_for_all_pairs() {
        for a in SAMPLES {
            for b in SAMPLES {
                assert_eq!(similarity(a, b), similarity(b, a), "asymmetric: {a:?} vs {b:?}");
            }
        }
    }

    #[test]
    fn self_match_is_one() {
        for s in SAMPLES.iter().filter(|s| !s.trim().is_empty()) {
            assert_eq!(similarity(s, s), 1.0, "self match failed for {s:?}");
        }
        assert_eq!(similarity("", ""), 1.0);
    }

    #[test]
    fn score_stays_in_unit_interval() {
        for a in SAMPLES {
            for b in SAMPLES {
                let s = similarity(a, b);
                assert!((0.0..=1.0).contains(&s), "{s} out of range for {a:?} vs {b:?}");
            }
        }
    }

    #[test]
    fn one_empty_side_scores_zero() {
        assert_eq!(similarity("", "something"), 0.0);
        assert_eq!(similarity("something", "   "), 0.0);
    }

    #[test]
    fn strings_that_normalize_to_nothing_count_as_empty() {
        assert_eq!(similarity("123", "!!!"), 1.0);
        assert_eq!(similarity("42", "a real answer"), 0.0);
    }

    #[test]
    fn disjoint_sets_score_zero() {
        assert_eq!(similarity("alpha beta", "gamma delta"), 0.0);
    }

    #[test]
    fn exact_match_after_normalization() {
        let score = similarity(
            "You are warm, friendly, and naturally expressive.",
            "you are warm friendly and naturally expressive",
        );
        assert_eq!(score, 1.0);
    }

    #[test]
    fn duplicate_words_count_once() {
        // "and" appears twice in the reference: 7 unique words, 5 shared.
        let score = similarity(
            "deep and clear shows loyalty",
            "Deep and Clear shows loyalty and lasting commitment",
        );
        assert!((score - 5.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn partial_overlap_five_of_eight() {
        let score = similarity(
            "deep and clear shows loyalty",
            "Deep and clear shows strong loyalty, lasting commitment",
        );
        assert_eq!(score, 0.625);
    }

    #[test]
    fn jaccard_guards_empty_union() {
        assert_eq!(jaccard(&WordSet::default(), &WordSet::default()), 1.0);
    }

    #[test]
    fn compare_reports_word_breakdown() {
        let cmp = compare("warm and open heart", "You are warm and expressive");
        assert_eq!(cmp.matched, vec!["and", "warm"]);
        assert_eq!(cmp.missing, vec!["are", "expressive", "you"]);
        assert_eq!(cmp.extra, vec!["heart", "open"]);
        assert_eq!(cmp.union_size(), 7);
        assert!((cmp.score - 2.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn compare_score_matches_similarity() {
        for a in SAMPLES {
            for b in SAMPLES {
                assert_eq!(compare(a, b).score, similarity(a, b));
            }
        }
    }
}
