//! The question entity
//!
//! This module implements a single trivia item: its text, its four
//! answer options in a fixed shuffled order, and the elimination marks
//! applied by the fifty-fifty joker. The correct answer is private to
//! the entity; callers check a candidate with [`Question::is_correct`]
//! and never see the stored value.

use std::{collections::HashSet, fmt::Debug};

use itertools::Itertools;
use serde::Serialize;

use super::{constants, pool::QuestionId, supplier::RawQuestion};

/// One answer option as displayed to the player
///
/// The elimination flag tells the presentation layer to render the
/// option as struck out; the text itself is never altered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerOption {
    /// The option text
    pub text: String,
    /// Whether the fifty-fifty joker has marked this option unusable
    pub eliminated: bool,
}

/// A single trivia item with a hidden correct answer
///
/// The option order is fixed by one uniform shuffle at construction and
/// never changes afterwards; only the elimination marks grow, and they
/// never touch the correct option. A question lives in its tier's pool
/// until the player commits to an answer for it.
pub struct Question {
    /// Identity used by handles to re-find this question in its pool
    id: QuestionId,
    /// The question text, passed through unmodified
    text: String,
    /// The correct answer text, never exposed outside the entity
    correct: String,
    /// All four option texts in display order
    options: Vec<String>,
    /// Positions marked unusable by the elimination joker
    eliminated: HashSet<usize>,
}

impl Debug for Question {
    /// Custom debug implementation that avoids leaking the correct answer
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Question")
            .field("id", &self.id)
            .field("text", &self.text)
            .finish_non_exhaustive()
    }
}

impl Question {
    /// Creates a question from a validated raw record
    ///
    /// The correct answer is merged with the incorrect ones and the
    /// combined options are shuffled once, so the correct option's
    /// position carries no information.
    pub(crate) fn new(raw: RawQuestion) -> Self {
        let RawQuestion {
            text,
            correct_answer,
            incorrect_answers,
        } = raw;
        let mut options = std::iter::once(correct_answer.clone())
            .chain(incorrect_answers)
            .collect_vec();
        fastrand::shuffle(&mut options);
        Self {
            id: QuestionId::new(),
            text,
            correct: correct_answer,
            options,
            eliminated: HashSet::new(),
        }
    }

    /// Returns the identity of this question
    pub(crate) fn id(&self) -> QuestionId {
        self.id
    }

    /// Returns the question text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the options in display order with their elimination flags
    pub fn options(&self) -> Vec<AnswerOption> {
        self.options
            .iter()
            .enumerate()
            .map(|(position, text)| AnswerOption {
                text: text.clone(),
                eliminated: self.eliminated.contains(&position),
            })
            .collect_vec()
    }

    /// Checks whether a candidate text is the correct answer
    pub fn is_correct(&self, candidate: &str) -> bool {
        self.correct == candidate
    }

    /// Checks whether a candidate text is one of the displayed options
    pub fn has_option(&self, candidate: &str) -> bool {
        self.options.iter().any(|option| option == candidate)
    }

    /// Returns the number of options currently marked eliminated
    pub fn eliminated_count(&self) -> usize {
        self.eliminated.len()
    }

    /// Returns the position of the correct option
    pub(crate) fn correct_position(&self) -> usize {
        self.options
            .iter()
            .position(|option| *option == self.correct)
            .unwrap_or_default()
    }

    /// Returns the text of the option at a position
    pub(crate) fn option_text(&self, position: usize) -> &str {
        &self.options[position]
    }

    /// Returns the positions of incorrect options not yet eliminated,
    /// in display order
    pub(crate) fn standing_incorrect_positions(&self) -> Vec<usize> {
        let correct = self.correct_position();
        (0..self.options.len())
            .filter(|position| *position != correct && !self.eliminated.contains(position))
            .collect_vec()
    }

    /// Marks an option position as eliminated
    ///
    /// The correct option is never marked, and the mark count never
    /// exceeds the cap; requests violating either are ignored.
    pub(crate) fn mark_eliminated(&mut self, position: usize) {
        if position != self.correct_position()
            && position < self.options.len()
            && self.eliminated.len() < constants::pool::MAX_ELIMINATED
        {
            self.eliminated.insert(position);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw() -> RawQuestion {
        RawQuestion {
            text: "Which planet is known as the red planet?".to_string(),
            correct_answer: "Mars".to_string(),
            incorrect_answers: vec![
                "Venus".to_string(),
                "Jupiter".to_string(),
                "Mercury".to_string(),
            ],
        }
    }

    #[test]
    fn construction_keeps_all_four_options() {
        let question = Question::new(raw());
        let options = question.options();

        assert_eq!(options.len(), 4);
        assert!(options.iter().all(|option| !option.eliminated));
        for text in ["Mars", "Venus", "Jupiter", "Mercury"] {
            assert!(options.iter().any(|option| option.text == text));
        }
    }

    #[test]
    fn is_correct_only_matches_the_correct_text() {
        let question = Question::new(raw());

        assert!(question.is_correct("Mars"));
        assert!(!question.is_correct("Venus"));
        assert!(!question.is_correct("mars"));
        assert!(!question.is_correct(""));
    }

    #[test]
    fn has_option_covers_exactly_the_displayed_texts() {
        let question = Question::new(raw());

        for text in ["Mars", "Venus", "Jupiter", "Mercury"] {
            assert!(question.has_option(text));
        }
        assert!(!question.has_option("Saturn"));
    }

    #[test]
    fn correct_position_points_at_the_correct_text() {
        let question = Question::new(raw());
        let position = question.correct_position();

        assert_eq!(question.option_text(position), "Mars");
    }

    #[test]
    fn mark_eliminated_never_touches_the_correct_option() {
        let mut question = Question::new(raw());
        let correct = question.correct_position();

        question.mark_eliminated(correct);
        assert_eq!(question.eliminated_count(), 0);
    }

    #[test]
    fn mark_eliminated_caps_at_two_marks() {
        let mut question = Question::new(raw());
        for position in 0..4 {
            question.mark_eliminated(position);
        }

        assert_eq!(question.eliminated_count(), 2);
        let standing = question.standing_incorrect_positions();
        assert_eq!(standing.len(), 1);
        assert_ne!(standing[0], question.correct_position());
    }

    #[test]
    fn mark_eliminated_ignores_out_of_range_positions() {
        let mut question = Question::new(raw());
        question.mark_eliminated(7);

        assert_eq!(question.eliminated_count(), 0);
    }

    #[test]
    fn standing_incorrect_positions_shrink_with_marks() {
        let mut question = Question::new(raw());
        assert_eq!(question.standing_incorrect_positions().len(), 3);

        let first = question.standing_incorrect_positions()[0];
        question.mark_eliminated(first);
        let standing = question.standing_incorrect_positions();

        assert_eq!(standing.len(), 2);
        assert!(!standing.contains(&first));
    }

    #[test]
    fn options_reflect_elimination_marks() {
        let mut question = Question::new(raw());
        let marked = question.standing_incorrect_positions()[1];
        question.mark_eliminated(marked);

        let options = question.options();
        assert!(options[marked].eliminated);
        assert_eq!(
            options.iter().filter(|option| option.eliminated).count(),
            1
        );
    }
}
