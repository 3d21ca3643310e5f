//! Quiz orchestration and state machine
//!
//! This module contains the main quiz struct and logic for running a
//! single game: resolving the difficulty tier for the current round,
//! handing out questions, consuming jokers, resolving answers, and
//! keeping the payout ledger. The presentation layer drives the game
//! exclusively through [`Quiz::ask_question`], [`Quiz::evaluate_answer`]
//! and [`Quiz::status`]; everything else is internal.

use enum_map::{EnumMap, enum_map};
use garde::Validate;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use thiserror::Error;

use super::{
    constants,
    joker::{Joker, JokerHint},
    pool::{self, QuestionHandle, QuestionPools, Tier},
    question::AnswerOption,
    supplier::{QuestionSupplier, SupplyError},
};

/// The lifecycle state of a game
///
/// A game starts in `Playing` and moves into exactly one of the three
/// terminal states; no transition leaves a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "lowercase")]
pub enum GameState {
    /// The player is still answering questions
    #[display("playing")]
    Playing,
    /// All fifteen questions were answered correctly
    #[display("won")]
    Won,
    /// A question was answered incorrectly
    #[display("lost")]
    Lost,
    /// The player gave up and took the current payout
    #[display("surrendered")]
    Surrendered,
}

impl GameState {
    /// Whether this state admits no further transitions
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Playing)
    }
}

type ValidationResult = garde::Result;

/// Validates that a winnings ladder is strictly increasing and positive
fn validate_winnings(ladder: &[u64; 15]) -> ValidationResult {
    if ladder[0] == 0 {
        return Err(garde::Error::new("winnings must be positive"));
    }
    if ladder.iter().tuple_windows().any(|(a, b)| a >= b) {
        return Err(garde::Error::new("winnings must be strictly increasing"));
    }
    Ok(())
}

/// Validates that secure rounds are strictly increasing non-final rounds
fn validate_secure_rounds(rounds: &[u8]) -> ValidationResult {
    if rounds
        .iter()
        .any(|round| !(1..constants::rounds::FINAL_ROUND).contains(round))
    {
        return Err(garde::Error::new(
            "secure rounds must lie before the final round",
        ));
    }
    if rounds.iter().tuple_windows().any(|(a, b)| a >= b) {
        return Err(garde::Error::new("secure rounds must be strictly increasing"));
    }
    Ok(())
}

/// Configurable parameters of a game
///
/// The defaults reproduce the classic ladder and safety nets; overriding
/// them changes amounts and floor positions but no game semantics.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Options {
    /// Prize amounts, index i holding the prize for completing round i+1
    #[garde(custom(|v, _| validate_winnings(v)))]
    pub winnings: [u64; 15],
    /// Rounds whose completion raises the guaranteed payout floor
    #[garde(custom(|v, _| validate_secure_rounds(v)))]
    pub secure_rounds: Vec<u8>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            winnings: constants::ladder::DEFAULT,
            secure_rounds: constants::rounds::SECURE_ROUNDS.to_vec(),
        }
    }
}

/// A player decision submitted for the in-flight question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Input {
    /// Give up and take the current payout
    Surrender,
    /// Spend a joker on the current question
    Joker(Joker),
    /// Commit to one of the currently displayed option texts
    Answer(String),
}

/// Display data for the in-flight question
///
/// Returned by [`Quiz::ask_question`] when a round begins and again by
/// [`Quiz::evaluate_answer`] after a joker, with the elimination marks
/// and the hint payload refreshed.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    /// Handle re-identifying the question across a joker round-trip
    pub handle: QuestionHandle,
    /// The question text
    pub text: String,
    /// The options in display order with their elimination flags
    pub options: Vec<AnswerOption>,
    /// Hint payload when the view refreshes after a joker
    pub hint: Option<JokerHint>,
}

/// Read-only snapshot of a game for the presentation layer
///
/// Available at any time, including terminal states.
#[derive(Debug, Clone, Serialize)]
pub struct Status {
    /// The current round, 1 through 15
    pub round: u8,
    /// The lifecycle state of the game
    pub state: GameState,
    /// Jokers not yet consumed
    pub jokers: Vec<Joker>,
    /// Amount guaranteed even on a later loss
    pub secured_payout: u64,
    /// Amount taken home on immediate surrender or on winning
    pub current_payout: u64,
    /// The full winnings ladder
    pub winnings: [u64; 15],
    /// Rounds whose completion raises the payout floor
    pub secure_rounds: Vec<u8>,
}

impl Status {
    /// Converts the snapshot to a JSON string for transmission
    ///
    /// # Panics
    ///
    /// This method panics if serialization fails, which should never happen
    /// with the default JSON serializer for well-formed data.
    pub fn to_message(&self) -> String {
        serde_json::to_string(self).expect("default serializer cannot fail")
    }
}

/// Errors that can occur while creating a game
#[derive(Error, Serialize, Debug, Clone, PartialEq, Eq)]
pub enum CreateError {
    /// The supplied options failed validation
    #[error("invalid game options: {0}")]
    Options(String),
    /// The question supplier could not fill the pools
    #[error(transparent)]
    Supply(#[from] SupplyError),
}

/// Errors that can occur while driving a game
#[derive(Error, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The game already reached a terminal state
    #[error("game has concluded")]
    Concluded,
    /// The submitted text is none of the currently displayed options
    #[error("answer is not one of the displayed options")]
    UnknownAnswer,
    /// The joker was already consumed in this game
    #[error("the {0} was already used")]
    JokerUnavailable(Joker),
    /// The pools rejected the operation
    #[error(transparent)]
    Pool(#[from] pool::Error),
}

/// A single game of fifteen questions
///
/// Owns the question pools, the joker availability set, the round
/// counter, and the payout ledger. Each instance is self-contained;
/// nothing is shared between games.
#[derive(Debug)]
pub struct Quiz {
    /// Live questions keyed by difficulty tier
    pools: QuestionPools,
    /// Which jokers are still available
    jokers: EnumMap<Joker, bool>,
    /// Lifecycle state, terminal once left `Playing`
    state: GameState,
    /// The current round, 1 through 15
    round: u8,
    /// Payout floor raised by completing a secure round
    secured_payout: u64,
    /// Payout reflecting the last fully completed round
    current_payout: u64,
    /// Ladder and secure-round configuration
    options: Options,
}

impl Quiz {
    /// Creates a game with the default ladder and safety nets
    ///
    /// # Errors
    ///
    /// Returns a `CreateError` when the supplier cannot fill all three
    /// pools with valid records.
    pub fn new(supplier: &impl QuestionSupplier) -> Result<Self, CreateError> {
        Self::with_options(supplier, Options::default())
    }

    /// Creates a game with a custom ladder and safety nets
    ///
    /// # Errors
    ///
    /// Returns `CreateError::Options` when the options fail validation
    /// and `CreateError::Supply` when the supplier cannot fill the pools.
    pub fn with_options(
        supplier: &impl QuestionSupplier,
        options: Options,
    ) -> Result<Self, CreateError> {
        options
            .validate()
            .map_err(|report| CreateError::Options(report.to_string()))?;
        let pools = QuestionPools::from_supplier(supplier)?;
        Ok(Self {
            pools,
            jokers: enum_map! { _ => true },
            state: GameState::Playing,
            round: 1,
            secured_payout: 0,
            current_payout: 0,
            options,
        })
    }

    /// Selects a random question for the current round
    ///
    /// Resolves the difficulty tier for the round and picks uniformly
    /// from that tier's pool. The question stays in its pool and the
    /// round counter is untouched; only answering moves the game along.
    ///
    /// # Errors
    ///
    /// * `Error::Concluded` - the game reached a terminal state
    /// * `Error::Pool` - the pool for this round is empty, which
    ///   indicates a sequencing defect in the caller
    pub fn ask_question(&self) -> Result<QuestionView, Error> {
        self.ensure_playing()?;
        let tier = Tier::for_round(self.round);
        let (handle, question) = self.pools.pick(tier)?;
        Ok(QuestionView {
            handle,
            text: question.text().to_string(),
            options: question.options(),
            hint: None,
        })
    }

    /// Resolves a player decision for the question behind `handle`
    ///
    /// This is the sole mutator of game state. Surrendering and
    /// answering conclude the round and return `None`; spending a joker
    /// keeps the round open and returns the refreshed question view
    /// with the joker's hint attached.
    ///
    /// # Errors
    ///
    /// * `Error::Concluded` - the game reached a terminal state
    /// * `Error::Pool` - the handle no longer resolves to a live question
    /// * `Error::JokerUnavailable` - the joker was already consumed
    /// * `Error::UnknownAnswer` - the text is none of the displayed options
    ///
    /// A failing call leaves the game state untouched.
    pub fn evaluate_answer(
        &mut self,
        handle: QuestionHandle,
        input: Input,
    ) -> Result<Option<QuestionView>, Error> {
        self.ensure_playing()?;
        // every decision targets a live question, stale handles fail fast
        self.pools.get(handle)?;
        match input {
            Input::Surrender => {
                self.state = GameState::Surrendered;
                log::info!(
                    "player surrendered in round {} taking {}",
                    self.round,
                    self.current_payout
                );
                Ok(None)
            }
            Input::Joker(joker) => {
                if !self.jokers[joker] {
                    return Err(Error::JokerUnavailable(joker));
                }
                self.jokers[joker] = false;
                let question = self.pools.get_mut(handle)?;
                let hint = joker.apply(question);
                log::debug!("{joker} consumed in round {}", self.round);
                Ok(Some(QuestionView {
                    handle,
                    text: question.text().to_string(),
                    options: question.options(),
                    hint: Some(hint),
                }))
            }
            Input::Answer(text) => {
                if !self.pools.get(handle)?.has_option(&text) {
                    return Err(Error::UnknownAnswer);
                }
                let question = self.pools.remove(handle)?;
                if question.is_correct(&text) {
                    self.complete_round();
                } else {
                    self.state = GameState::Lost;
                    log::info!(
                        "player lost in round {} falling back to {}",
                        self.round,
                        self.secured_payout
                    );
                }
                Ok(None)
            }
        }
    }

    /// Returns a read-only snapshot of the game
    pub fn status(&self) -> Status {
        Status {
            round: self.round,
            state: self.state,
            jokers: self
                .jokers
                .iter()
                .filter_map(|(joker, available)| available.then_some(joker))
                .collect_vec(),
            secured_payout: self.secured_payout,
            current_payout: self.current_payout,
            winnings: self.options.winnings,
            secure_rounds: self.options.secure_rounds.clone(),
        }
    }

    /// Rejects operations once the game has concluded
    fn ensure_playing(&self) -> Result<(), Error> {
        if self.state.is_terminal() {
            Err(Error::Concluded)
        } else {
            Ok(())
        }
    }

    /// Books a correctly answered round into the ledger
    ///
    /// The secure-round floor is raised before the round advances so
    /// that the floor always reflects a fully completed round.
    fn complete_round(&mut self) {
        let prize = self.options.winnings[usize::from(self.round) - 1];
        if self.round == constants::rounds::FINAL_ROUND {
            self.state = GameState::Won;
            self.current_payout = prize;
            log::info!("player won {prize}");
        } else {
            if self.options.secure_rounds.contains(&self.round) {
                self.secured_payout = prize;
            }
            self.current_payout = prize;
            self.round += 1;
            log::debug!("round {} completed, payout at {prize}", self.round - 1);
        }
    }
}
