//! # Hotseat Game Engine
//!
//! This library provides the core game logic for a millionaire-style
//! trivia game: fifteen rounds of increasing difficulty, three one-time
//! jokers, and two guaranteed payout floors. The engine owns the
//! question pools, the round and payout state, and the joker
//! algorithms; question acquisition lives behind the
//! [`supplier::QuestionSupplier`] trait and all presentation stays
//! outside, driven by the data the engine returns.
//!
//! A game is one [`quiz::Quiz`] instance. The presentation loop asks
//! for a question, shows it, and submits the player's decision back:
//!
//! ```
//! use hotseat::{
//!     pool::Tier,
//!     quiz::{Input, Quiz},
//!     supplier::{QuestionSupplier, RawQuestion, SupplyError},
//! };
//!
//! struct Bank;
//!
//! impl QuestionSupplier for Bank {
//!     fn batch(&self, tier: Tier, amount: usize) -> Result<Vec<RawQuestion>, SupplyError> {
//!         Ok((0..amount)
//!             .map(|index| RawQuestion {
//!                 text: format!("{tier} question {index}"),
//!                 correct_answer: format!("answer {index}"),
//!                 incorrect_answers: vec![
//!                     format!("guess {index}a"),
//!                     format!("guess {index}b"),
//!                     format!("guess {index}c"),
//!                 ],
//!             })
//!             .collect())
//!     }
//! }
//!
//! let mut quiz = Quiz::new(&Bank)?;
//! let view = quiz.ask_question()?;
//! // the player takes no risk and walks away immediately
//! quiz.evaluate_answer(view.handle, Input::Surrender)?;
//! assert_eq!(quiz.status().current_payout, 0);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]

pub mod constants;

pub mod joker;
pub mod pool;
pub mod question;
pub mod quiz;
pub mod supplier;
