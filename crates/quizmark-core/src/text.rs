//! Text normalization and word-set tokenization.
//!
//! Answers are compared on a canonical form: lowercase letters and single
//! spaces only. Everything else (digits, punctuation, symbols) is dropped
//! without substitution, so `"don't"` becomes `"dont"` while `"warm, friendly"`
//! keeps its two words.

use std::collections::btree_set;
use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Text reduced to lowercase alphabetic words separated by single spaces.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedText(String);

impl NormalizedText {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for NormalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Canonicalize raw text for word-based comparison.
///
/// Letters are lowercased and kept, whitespace is kept, every other character
/// is discarded. Whitespace runs collapse to one space and the ends are
/// trimmed. Applying this to its own output returns the same string.
pub fn normalize(raw: &str) -> NormalizedText {
    let cleaned: String = raw
        .chars()
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_alphabetic() || c.is_whitespace())
        .collect();

    let mut normalized = String::with_capacity(cleaned.len());
    for word in cleaned.split_whitespace() {
        if !normalized.is_empty() {
            normalized.push(' ');
        }
        normalized.push_str(word);
    }

    NormalizedText(normalized)
}

/// A duplicate-free set of words. Iterates in sorted order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WordSet(BTreeSet<String>);

impl WordSet {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.0.contains(word)
    }

    pub fn iter(&self) -> btree_set::Iter<'_, String> {
        self.0.iter()
    }

    /// Words present in both sets.
    pub fn intersection<'a>(&'a self, other: &'a WordSet) -> impl Iterator<Item = &'a String> {
        self.0.intersection(&other.0)
    }

    /// Words in `self` that are absent from `other`.
    pub fn difference<'a>(&'a self, other: &'a WordSet) -> impl Iterator<Item = &'a String> {
        self.0.difference(&other.0)
    }
}

impl<'a> IntoIterator for &'a WordSet {
    type Item = &'a String;
    type IntoIter = btree_set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<S: Into<String>> FromIterator<S> for WordSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        WordSet(
            iter.into_iter()
                .map(Into::into)
                .filter(|w: &String| !w.is_empty())
                .collect(),
        )
    }
}

/// Split normalized text into its set of unique words.
pub fn tokenize(text: &NormalizedText) -> WordSet {
    text.as_str().split_whitespace().collect()
}
