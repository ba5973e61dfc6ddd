//! Vocabulary module - accumulated label and relationship-type sets

use serde::{Deserialize, Serialize};

/// The entity labels and relationship types observed so far in a run
///
/// Both sets are ordered by first observation and duplicate-free. The
/// vocabulary is owned by the reconciler and threaded through the
/// pipeline explicitly; callers can feed it back into later extraction
/// prompts as schema hints so the model reuses types it already
/// invented instead of coining near-synonyms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    /// Node labels in first-seen order
    pub labels: Vec<String>,

    /// Relationship types in first-seen order
    pub rel_types: Vec<String>,
}

impl Vocabulary {
    /// Create an empty vocabulary
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a vocabulary from known labels and relationship types
    ///
    /// Duplicates in the input are collapsed, preserving first
    /// occurrence order.
    pub fn seeded(labels: &[String], rel_types: &[String]) -> Self {
        let mut vocabulary = Self::new();
        for label in labels {
            vocabulary.observe_label(label);
        }
        for rel_type in rel_types {
            vocabulary.observe_rel_type(rel_type);
        }
        vocabulary
    }

    /// Record a label; returns true when it was not seen before
    pub fn observe_label(&mut self, label: &str) -> bool {
        if self.labels.iter().any(|l| l == label) {
            return false;
        }
        self.labels.push(label.to_string());
        true
    }

    /// Record a relationship type; returns true when it was not seen before
    pub fn observe_rel_type(&mut self, rel_type: &str) -> bool {
        if self.rel_types.iter().any(|r| r == rel_type) {
            return false;
        }
        self.rel_types.push(rel_type.to_string());
        true
    }

    /// Whether no labels and no relationship types have been observed
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty() && self.rel_types.is_empty()
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: observing the same sequence twice changes nothing
        #[test]
        fn test_observation_idempotence(entries in proptest::collection::vec("[a-zA-Z_]{1,12}", 0..20)) {
            let mut vocabulary = Vocabulary::new();
            for entry in &entries {
                vocabulary.observe_label(entry);
            }
            let once = vocabulary.clone();
            for entry in &entries {
                vocabulary.observe_label(entry);
            }
            prop_assert_eq!(once, vocabulary);
        }
    }
}
