//! Question acquisition boundary
//!
//! This module defines the trait through which the engine obtains raw
//! question records from an external content provider. The trait
//! abstraction keeps transport, retries, and encoding concerns outside
//! the engine; the engine only enforces the batch-size contract when a
//! game is created.

use garde::Validate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::pool::Tier;

/// A raw question record as returned by an external content provider
///
/// Records are validated before a game starts; texts are otherwise
/// opaque and passed through to the presentation layer unmodified
/// (the engine never interprets markup or escape sequences).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RawQuestion {
    /// The question text shown to the player
    #[garde(length(min = 1, max = crate::constants::text::MAX_QUESTION_LENGTH))]
    pub text: String,
    /// The correct answer text
    #[garde(length(min = 1, max = crate::constants::text::MAX_ANSWER_LENGTH))]
    pub correct_answer: String,
    /// The three incorrect answer texts
    #[garde(
        length(min = crate::constants::pool::OPTION_COUNT - 1, max = crate::constants::pool::OPTION_COUNT - 1),
        inner(length(min = 1, max = crate::constants::text::MAX_ANSWER_LENGTH))
    )]
    pub incorrect_answers: Vec<String>,
}

impl RawQuestion {
    /// Checks that the correct answer and the incorrect answers are
    /// pairwise distinct
    ///
    /// Duplicate option texts would make answer submission ambiguous,
    /// so such records are rejected at pool construction.
    pub fn has_distinct_answers(&self) -> bool {
        let mut seen = std::collections::HashSet::new();
        seen.insert(self.correct_answer.as_str());
        self.incorrect_answers
            .iter()
            .all(|answer| seen.insert(answer.as_str()))
    }
}

/// Errors that can occur while obtaining questions from a supplier
#[derive(Error, Serialize, Debug, Clone, PartialEq, Eq)]
pub enum SupplyError {
    /// The supplier returned fewer records than requested for a tier
    #[error("supplier returned {got} records for the {tier} tier, expected {expected}")]
    ShortBatch {
        /// The tier the batch was requested for
        tier: Tier,
        /// The number of records requested
        expected: usize,
        /// The number of records actually returned
        got: usize,
    },
    /// A record failed validation or its option texts were not distinct
    #[error("invalid question record: {reason}")]
    InvalidRecord {
        /// Human-readable description of the defect
        reason: String,
    },
    /// The provider behind the supplier failed
    #[error("question provider failed: {0}")]
    Provider(String),
}

/// Trait for obtaining batches of raw question records
///
/// Implementations might call a trivia API over HTTP, read from a local
/// bank, or serve canned records in tests. The engine requests exactly
/// one batch per tier when a game is created and never retries; a
/// failing supplier is fatal to game creation.
pub trait QuestionSupplier {
    /// Returns a batch of raw records for the given tier
    ///
    /// # Errors
    ///
    /// Returns a `SupplyError` when the provider cannot produce the
    /// batch. Returning fewer than `amount` records is not an error at
    /// this boundary; the engine rejects short batches itself.
    fn batch(&self, tier: Tier, amount: usize) -> Result<Vec<RawQuestion>, SupplyError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> RawQuestion {
        RawQuestion {
            text: "In which year did the Berlin Wall fall?".to_string(),
            correct_answer: "1989".to_string(),
            incorrect_answers: vec!["1987".to_string(), "1990".to_string(), "1991".to_string()],
        }
    }

    #[test]
    fn valid_record_passes_validation() {
        assert!(record().validate().is_ok());
    }

    #[test]
    fn empty_question_text_is_rejected() {
        let mut r = record();
        r.text = String::new();
        assert!(r.validate().is_err());
    }

    #[test]
    fn overlong_question_text_is_rejected() {
        let mut r = record();
        r.text = "a".repeat(crate::constants::text::MAX_QUESTION_LENGTH + 1);
        assert!(r.validate().is_err());
    }

    #[test]
    fn wrong_incorrect_answer_count_is_rejected() {
        let mut r = record();
        r.incorrect_answers.pop();
        assert!(r.validate().is_err());

        let mut r = record();
        r.incorrect_answers.push("1992".to_string());
        assert!(r.validate().is_err());
    }

    #[test]
    fn empty_incorrect_answer_is_rejected() {
        let mut r = record();
        r.incorrect_answers[1] = String::new();
        assert!(r.validate().is_err());
    }

    #[test]
    fn distinctness_check_catches_duplicates() {
        assert!(record().has_distinct_answers());

        let mut r = record();
        r.incorrect_answers[0] = r.correct_answer.clone();
        assert!(!r.has_distinct_answers());

        let mut r = record();
        r.incorrect_answers[2] = r.incorrect_answers[0].clone();
        assert!(!r.has_distinct_answers());
    }
}
