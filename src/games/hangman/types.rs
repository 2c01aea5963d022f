//! Hangman data structures.
//!
//! One player sets the word, the other guesses letters.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Wrong guesses allowed before the guesser loses.
pub const DEFAULT_MAX_GUESSES: u32 = 6;

/// Full Hangman game state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HangmanState {
    /// Uppercased secret; empty until the setter assigns it
    pub word: String,
    pub setter: Uuid,
    pub guesser: Uuid,
    /// Uppercased letters in guess order, append-only
    pub guessed_letters: Vec<char>,
    /// Monotonically non-decreasing, bounded by `max_guesses`
    pub incorrect_guesses: u32,
    pub max_guesses: u32,
    pub next_turn: Uuid,
    pub winner: Option<Uuid>,
}

impl HangmanState {
    pub fn new(setter: Uuid, guesser: Uuid, max_guesses: u32) -> Self {
        Self {
            word: String::new(),
            setter,
            guesser,
            guessed_letters: Vec::new(),
            incorrect_guesses: 0,
            max_guesses,
            // The setter acts first: the word must exist before guessing
            next_turn: setter,
            winner: None,
        }
    }

    pub fn has_word(&self) -> bool {
        !self.word.is_empty()
    }

    /// Every letter of the word has been guessed.
    pub fn is_revealed(&self) -> bool {
        self.has_word()
            && self
                .word
                .chars()
                .filter(|c| c.is_ascii_alphabetic())
                .all(|c| self.guessed_letters.contains(&c))
    }

    /// Display form: guessed letters shown, the rest masked.
    pub fn masked_word(&self) -> String {
        self.word
            .chars()
            .map(|c| {
                if !c.is_ascii_alphabetic() || self.guessed_letters.contains(&c) {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    }

    /// Fresh round with the roles swapped, as the original host flow
    /// does on rematch.
    pub fn rematch_seed(&self) -> Self {
        Self::new(self.guesser, self.setter, self.max_guesses)
    }
}
