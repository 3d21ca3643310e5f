//! Tier-keyed question pools
//!
//! This module manages the three difficulty-tier pools a game draws
//! from. Each pool is filled exactly once at game start from an
//! external supplier and only ever shrinks: answering a question
//! removes it, jokers never do. Questions are addressed through opaque
//! handles so that the pool's internal layout can change without
//! breaking callers.

use enum_map::{Enum, EnumMap};
use garde::Validate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::{
    constants,
    question::Question,
    supplier::{QuestionSupplier, SupplyError},
};

/// Difficulty bucket determining which pool a round draws from
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Enum,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Questions for rounds 1 through 5
    #[display("easy")]
    Easy,
    /// Questions for rounds 6 through 10
    #[display("medium")]
    Medium,
    /// Questions for rounds 11 through 15
    #[display("hard")]
    Hard,
}

impl Tier {
    /// Maps a 1-indexed round number to its difficulty tier
    pub fn for_round(round: u8) -> Self {
        match round {
            1..=5 => Self::Easy,
            6..=10 => Self::Medium,
            _ => Self::Hard,
        }
    }
}

/// A unique identifier for a question within a game
///
/// Identity-based addressing makes stale handles detectable exactly:
/// once a question is removed, no later pool mutation can make its
/// handle resolve again.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QuestionId(Uuid);

impl QuestionId {
    /// Creates a new random question identifier
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Opaque reference identifying a question in its pool
///
/// Handles are comparison-only values handed out by [`QuestionPools::pick`]
/// and passed back to target the same question for answer resolution or
/// a joker. They carry no usable information beyond identity.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuestionHandle {
    /// The tier whose pool holds the question
    tier: Tier,
    /// The question's identity within that pool
    id: QuestionId,
}

/// Errors that can occur when addressing the question pools
#[derive(Error, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A pool was queried while empty; under correct round sequencing
    /// this is unreachable and signals a defect upstream
    #[error("the {0} question pool is empty")]
    Empty(Tier),
    /// The handle no longer resolves to a live question
    #[error("question handle is stale")]
    Stale,
}

/// The three fixed-size question pools of one game
#[derive(Debug, Default)]
pub struct QuestionPools {
    /// Live questions keyed by difficulty tier
    pools: EnumMap<Tier, Vec<Question>>,
}

impl QuestionPools {
    /// Populates all three pools from the supplier
    ///
    /// Requests exactly [`constants::pool::QUESTIONS_PER_TIER`] records
    /// per tier and constructs one question per record, shuffling each
    /// question's options independently.
    ///
    /// # Errors
    ///
    /// * `SupplyError::ShortBatch` - the supplier returned fewer records
    ///   than requested for a tier
    /// * `SupplyError::InvalidRecord` - a record failed validation or
    ///   its option texts were not distinct
    ///
    /// Any supplier-side error is passed through unchanged. All cases
    /// are fatal to game creation; nothing is retried.
    pub fn from_supplier(supplier: &impl QuestionSupplier) -> Result<Self, SupplyError> {
        let mut pools: EnumMap<Tier, Vec<Question>> = EnumMap::default();
        for (tier, pool) in &mut pools {
            let batch = supplier.batch(tier, constants::pool::QUESTIONS_PER_TIER)?;
            if batch.len() < constants::pool::QUESTIONS_PER_TIER {
                return Err(SupplyError::ShortBatch {
                    tier,
                    expected: constants::pool::QUESTIONS_PER_TIER,
                    got: batch.len(),
                });
            }
            for raw in batch.into_iter().take(constants::pool::QUESTIONS_PER_TIER) {
                raw.validate().map_err(|report| SupplyError::InvalidRecord {
                    reason: report.to_string(),
                })?;
                if !raw.has_distinct_answers() {
                    return Err(SupplyError::InvalidRecord {
                        reason: "answer options are not distinct".to_string(),
                    });
                }
                pool.push(Question::new(raw));
            }
        }
        log::debug!(
            "question pools initialized with {} questions per tier",
            constants::pool::QUESTIONS_PER_TIER
        );
        Ok(Self { pools })
    }

    /// Picks a uniformly random live question from a tier's pool
    ///
    /// The question stays in the pool; the returned handle re-identifies
    /// it for later joker use or removal.
    ///
    /// # Errors
    ///
    /// Returns `Error::Empty` if the pool has no questions left.
    pub fn pick(&self, tier: Tier) -> Result<(QuestionHandle, &Question), Error> {
        let pool = &self.pools[tier];
        if pool.is_empty() {
            return Err(Error::Empty(tier));
        }
        let question = &pool[fastrand::usize(..pool.len())];
        Ok((
            QuestionHandle {
                tier,
                id: question.id(),
            },
            question,
        ))
    }

    /// Resolves a handle to its pool position
    fn position(&self, handle: QuestionHandle) -> Option<usize> {
        self.pools[handle.tier]
            .iter()
            .position(|question| question.id() == handle.id)
    }

    /// Resolves a handle to a shared reference
    ///
    /// # Errors
    ///
    /// Returns `Error::Stale` if the handle no longer resolves.
    pub fn get(&self, handle: QuestionHandle) -> Result<&Question, Error> {
        self.position(handle)
            .map(|index| &self.pools[handle.tier][index])
            .ok_or(Error::Stale)
    }

    /// Resolves a handle to an exclusive reference
    ///
    /// # Errors
    ///
    /// Returns `Error::Stale` if the handle no longer resolves.
    pub fn get_mut(&mut self, handle: QuestionHandle) -> Result<&mut Question, Error> {
        let index = self.position(handle).ok_or(Error::Stale)?;
        Ok(&mut self.pools[handle.tier][index])
    }

    /// Removes and returns the question a handle points at
    ///
    /// # Errors
    ///
    /// Returns `Error::Stale` if the handle no longer resolves, which
    /// includes the double-removal case.
    pub fn remove(&mut self, handle: QuestionHandle) -> Result<Question, Error> {
        let index = self.position(handle).ok_or(Error::Stale)?;
        // Handles address by identity, so compaction order is free.
        Ok(self.pools[handle.tier].swap_remove(index))
    }

    /// Returns the number of live questions in a tier's pool
    pub fn remaining(&self, tier: Tier) -> usize {
        self.pools[tier].len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::supplier::RawQuestion;

    struct FixedSupplier {
        per_tier: usize,
    }

    impl QuestionSupplier for FixedSupplier {
        fn batch(&self, tier: Tier, _amount: usize) -> Result<Vec<RawQuestion>, SupplyError> {
            Ok((0..self.per_tier)
                .map(|index| RawQuestion {
                    text: format!("{tier} question {index}"),
                    correct_answer: format!("right {index}"),
                    incorrect_answers: vec![
                        format!("wrong {index} a"),
                        format!("wrong {index} b"),
                        format!("wrong {index} c"),
                    ],
                })
                .collect())
        }
    }

    struct BrokenSupplier;

    impl QuestionSupplier for BrokenSupplier {
        fn batch(&self, _tier: Tier, _amount: usize) -> Result<Vec<RawQuestion>, SupplyError> {
            Err(SupplyError::Provider("connection refused".to_string()))
        }
    }

    #[test]
    fn tier_for_round_matches_the_round_bands() {
        for round in 1..=5 {
            assert_eq!(Tier::for_round(round), Tier::Easy);
        }
        for round in 6..=10 {
            assert_eq!(Tier::for_round(round), Tier::Medium);
        }
        for round in 11..=15 {
            assert_eq!(Tier::for_round(round), Tier::Hard);
        }
    }

    #[test]
    fn pools_fill_to_five_per_tier() {
        let pools = QuestionPools::from_supplier(&FixedSupplier { per_tier: 5 }).unwrap();

        assert_eq!(pools.remaining(Tier::Easy), 5);
        assert_eq!(pools.remaining(Tier::Medium), 5);
        assert_eq!(pools.remaining(Tier::Hard), 5);
    }

    #[test]
    fn short_batch_is_fatal() {
        let result = QuestionPools::from_supplier(&FixedSupplier { per_tier: 4 });

        assert_eq!(
            result.err(),
            Some(SupplyError::ShortBatch {
                tier: Tier::Easy,
                expected: 5,
                got: 4,
            })
        );
    }

    #[test]
    fn oversized_batch_is_trimmed_to_pool_size() {
        let pools = QuestionPools::from_supplier(&FixedSupplier { per_tier: 7 }).unwrap();

        assert_eq!(pools.remaining(Tier::Easy), 5);
    }

    #[test]
    fn provider_failure_is_passed_through() {
        let result = QuestionPools::from_supplier(&BrokenSupplier);

        assert!(matches!(result, Err(SupplyError::Provider(_))));
    }

    #[test]
    fn invalid_record_is_fatal() {
        struct DuplicateSupplier;

        impl QuestionSupplier for DuplicateSupplier {
            fn batch(&self, _tier: Tier, amount: usize) -> Result<Vec<RawQuestion>, SupplyError> {
                Ok((0..amount)
                    .map(|index| RawQuestion {
                        text: format!("question {index}"),
                        correct_answer: "same".to_string(),
                        incorrect_answers: vec![
                            "same".to_string(),
                            "other".to_string(),
                            "another".to_string(),
                        ],
                    })
                    .collect())
            }
        }

        let result = QuestionPools::from_supplier(&DuplicateSupplier);

        assert!(matches!(result, Err(SupplyError::InvalidRecord { .. })));
    }

    #[test]
    fn pick_returns_a_resolvable_handle() {
        let pools = QuestionPools::from_supplier(&FixedSupplier { per_tier: 5 }).unwrap();
        let (handle, picked) = pools.pick(Tier::Medium).unwrap();

        let resolved = pools.get(handle).unwrap();
        assert_eq!(resolved.text(), picked.text());
        assert_eq!(pools.remaining(Tier::Medium), 5);
    }

    #[test]
    fn remove_makes_the_handle_stale() {
        let mut pools = QuestionPools::from_supplier(&FixedSupplier { per_tier: 5 }).unwrap();
        let (handle, _) = pools.pick(Tier::Easy).unwrap();

        assert!(pools.remove(handle).is_ok());
        assert_eq!(pools.remaining(Tier::Easy), 4);
        assert_eq!(pools.get(handle).err(), Some(Error::Stale));
        assert_eq!(pools.remove(handle).err(), Some(Error::Stale));
    }

    #[test]
    fn pick_on_a_drained_pool_reports_empty() {
        let mut pools = QuestionPools::from_supplier(&FixedSupplier { per_tier: 5 }).unwrap();
        for _ in 0..5 {
            let (handle, _) = pools.pick(Tier::Hard).unwrap();
            pools.remove(handle).unwrap();
        }

        assert_eq!(pools.pick(Tier::Hard).err(), Some(Error::Empty(Tier::Hard)));
    }

    #[test]
    fn pick_eventually_reaches_every_question() {
        fastrand::seed(7);
        let pools = QuestionPools::from_supplier(&FixedSupplier { per_tier: 5 }).unwrap();

        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            let (_, question) = pools.pick(Tier::Easy).unwrap();
            seen.insert(question.text().to_string());
        }

        assert_eq!(seen.len(), 5);
    }
}
