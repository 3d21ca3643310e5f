//! The joker engine
//!
//! This module implements the three one-time hint algorithms. Each
//! operates on a single question and is pure with respect to the rest
//! of the game: the only state a joker ever touches is the question's
//! own elimination marks. Consuming the joker and refreshing the
//! display is the orchestrator's job.

use enum_map::Enum;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use super::{constants, question::Question};

/// The three one-time jokers available in a fresh game
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
pub enum Joker {
    /// Marks two incorrect options as unusable
    #[display("50:50 joker")]
    FiftyFifty,
    /// Produces a simulated crowd-confidence distribution
    #[display("audience joker")]
    Audience,
    /// Simulates calling a friend who is right most of the time
    #[display("phone joker")]
    Phone,
}

/// One entry of the audience vote result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AudienceTally {
    /// The option text the votes refer to
    pub text: String,
    /// Share of the audience backing this option, in whole percent
    pub percent: u8,
}

/// The hint payload a joker produces for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum JokerHint {
    /// Two options were eliminated; the marks show on the options themselves
    FiftyFifty,
    /// Vote shares over the correct and every non-eliminated option,
    /// in display order, summing to exactly 100
    Audience(Vec<AudienceTally>),
    /// The answer text the simulated friend believes in
    Phone(String),
}

impl Joker {
    /// Runs this joker's algorithm against a question
    ///
    /// The question stays in its pool; only the fifty-fifty variant
    /// mutates it, and only its elimination marks.
    pub fn apply(self, question: &mut Question) -> JokerHint {
        match self {
            Self::FiftyFifty => {
                fifty_fifty(question);
                JokerHint::FiftyFifty
            }
            Self::Audience => JokerHint::Audience(audience(question)),
            Self::Phone => JokerHint::Phone(phone(question)),
        }
    }
}

/// Eliminates two incorrect options chosen uniformly without replacement
///
/// Afterwards exactly one incorrect option is standing alongside the
/// correct one.
fn fifty_fifty(question: &mut Question) {
    let standing = question.standing_incorrect_positions();
    for position in
        fastrand::choose_multiple(standing.into_iter(), constants::pool::MAX_ELIMINATED)
    {
        question.mark_eliminated(position);
    }
}

/// Simulates an audience vote over the non-eliminated options
///
/// Three false-mass samples are drawn from fixed ranges; the correct
/// option keeps whatever the false options do not claim. Without
/// elimination each incorrect option receives one sample, paired by
/// random draw rather than by rank. After elimination the single
/// standing incorrect option receives the entire false mass and
/// eliminated options are omitted from the result.
fn audience(question: &Question) -> Vec<AudienceTally> {
    let samples = [
        fastrand::u8(constants::audience::FIRST_SAMPLE_MIN..=constants::audience::FIRST_SAMPLE_MAX),
        fastrand::u8(
            constants::audience::SECOND_SAMPLE_MIN..=constants::audience::SECOND_SAMPLE_MAX,
        ),
        fastrand::u8(constants::audience::THIRD_SAMPLE_MIN..=constants::audience::THIRD_SAMPLE_MAX),
    ];
    let false_mass: u8 = samples.iter().sum();
    let standing = question.standing_incorrect_positions();

    let mut shares = vec![(question.correct_position(), 100 - false_mass)];
    if question.eliminated_count() > 0 {
        shares.extend(standing.iter().map(|position| (*position, false_mass)));
    } else {
        let mut remaining = samples.to_vec();
        for position in standing {
            let sample = remaining.swap_remove(fastrand::usize(..remaining.len()));
            shares.push((position, sample));
        }
    }

    shares.sort_unstable_by_key(|(position, _)| *position);
    shares
        .into_iter()
        .map(|(position, percent)| AudienceTally {
            text: question.option_text(position).to_string(),
            percent,
        })
        .collect_vec()
}

/// Simulates phoning a friend
///
/// Returns the correct answer text with the configured accuracy, and a
/// uniformly random non-eliminated incorrect option's text otherwise.
fn phone(question: &Question) -> String {
    let position = if fastrand::f64() < constants::phone::ACCURACY {
        question.correct_position()
    } else {
        fastrand::choice(question.standing_incorrect_positions())
            .expect("at least one incorrect option is standing")
    };
    question.option_text(position).to_string()
}
