//! Spelling-correction learner.
//!
//! The indexing pipeline feeds raw file contents through here as a side
//! effect; the accumulated word frequencies power query-time "did you
//! mean" suggestions on the read path. Learning never affects what gets
//! indexed.

use std::collections::HashMap;
use std::sync::Mutex;

use tracing::debug;

/// Word-frequency model with edit-distance-one suggestion.
///
/// Interior mutability so producers can share one instance behind an
/// `Arc` while the pipeline learns from every batch.
#[derive(Debug, Default)]
pub struct SpellingCorrector {
    frequencies: Mutex<HashMap<String, u64>>,
}

impl SpellingCorrector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Learn every word of a source file.
    pub fn add_text(&self, text: &str) {
        let mut frequencies = self
            .frequencies
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        for word in text
            .split(|ch: char| !ch.is_alphanumeric())
            .filter(|w| w.len() >= 2)
        {
            *frequencies.entry(word.to_lowercase()).or_insert(0) += 1;
        }
    }

    /// Suggest the best-known spelling for a word.
    ///
    /// Returns the word itself when it is already known (or nothing close
    /// is), otherwise the most frequent known word within one edit.
    pub fn correct(&self, word: &str) -> String {
        let lowered = word.to_lowercase();
        let frequencies = self
            .frequencies
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if frequencies.contains_key(&lowered) {
            return lowered;
        }

        let best = frequencies
            .iter()
            .filter(|(candidate, _)| within_one_edit(&lowered, candidate))
            .max_by_key(|(_, count)| **count)
            .map(|(candidate, _)| candidate.clone());

        match best {
            Some(candidate) => {
                debug!(word = %word, suggestion = %candidate, "Spelling suggestion");
                candidate
            }
            None => lowered,
        }
    }

    /// Number of distinct words learned so far.
    pub fn word_count(&self) -> usize {
        self.frequencies
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    /// Drop everything learned so far.
    pub fn reset(&self) {
        self.frequencies
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }
}

/// True when `a` and `b` are within Levenshtein distance one.
fn within_one_edit(a: &str, b: &str) -> bool {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    let (shorter, longer) = if a_chars.len() <= b_chars.len() {
        (&a_chars, &b_chars)
    } else {
        (&b_chars, &a_chars)
    };

    match longer.len() - shorter.len() {
        0 => {
            let mismatches = shorter
                .iter()
                .zip(longer.iter())
                .filter(|(x, y)| x != y)
                .count();
            mismatches <= 1
        }
        1 => {
            // One insertion: walk both, allow a single skip in the longer
            let mut i = 0;
            let mut j = 0;
            let mut skipped = false;
            while i < shorter.len() && j < longer.len() {
                if shorter[i] == longer[j] {
                    i += 1;
                    j += 1;
                } else if skipped {
                    return false;
                } else {
                    skipped = true;
                    j += 1;
                }
            }
            true
        }
        _ => false,
    }
}
