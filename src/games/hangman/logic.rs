//! Hangman rules: word assignment and letter guessing.

use super::HangmanState;
use crate::games::registry::RulesEngine;
use crate::games::{GameMetadata, GameMove, MoveOutcome, RulesError, Terminal};
use uuid::Uuid;

/// The setter assigns the hidden word. Legal once, before any guess.
pub fn apply_set_word(
    state: &HangmanState,
    word: &str,
    actor: Uuid,
) -> Result<MoveOutcome, RulesError> {
    if state.winner.is_some() {
        return Err(RulesError::GameOver);
    }
    if actor != state.setter {
        return Err(RulesError::NotYourTurn);
    }
    if state.has_word() {
        return Err(RulesError::WordAlreadySet);
    }
    let word = word.trim().to_ascii_uppercase();
    if word.is_empty() || !word.chars().any(|c| c.is_ascii_alphabetic()) {
        return Err(RulesError::EmptySubmission);
    }
    if !word.chars().all(|c| c.is_ascii_alphabetic() || c == ' ') {
        return Err(RulesError::NotALetter);
    }

    let mut next = state.clone();
    next.word = word;
    next.next_turn = state.guesser;
    Ok(MoveOutcome::ongoing(GameMetadata::Hangman(next)))
}

/// One letter guess. Correct guesses leave `incorrect_guesses` alone;
/// wrong ones increment it toward `max_guesses`.
pub fn apply_guess(
    state: &HangmanState,
    letter: char,
    actor: Uuid,
) -> Result<MoveOutcome, RulesError> {
    if state.winner.is_some() || state.incorrect_guesses >= state.max_guesses {
        return Err(RulesError::GameOver);
    }
    if !state.has_word() {
        return Err(RulesError::WordNotSet);
    }
    if actor != state.guesser || actor != state.next_turn {
        return Err(RulesError::NotYourTurn);
    }
    if !letter.is_ascii_alphabetic() {
        return Err(RulesError::NotALetter);
    }
    let letter = letter.to_ascii_uppercase();
    if state.guessed_letters.contains(&letter) {
        return Err(RulesError::AlreadyGuessed);
    }

    let mut next = state.clone();
    next.guessed_letters.push(letter);
    if !next.word.contains(letter) {
        next.incorrect_guesses += 1;
    }

    if next.is_revealed() {
        next.winner = Some(state.guesser);
        return Ok(MoveOutcome::ended(
            GameMetadata::Hangman(next),
            Terminal::win(actor),
        ));
    }
    if next.incorrect_guesses >= next.max_guesses {
        // Out of guesses: the word setter takes the round
        next.winner = Some(state.setter);
        return Ok(MoveOutcome::ended(
            GameMetadata::Hangman(next),
            Terminal::win(state.setter),
        ));
    }
    Ok(MoveOutcome::ongoing(GameMetadata::Hangman(next)))
}

/// Rules engine for [`GameMetadata::Hangman`].
pub struct HangmanRules;

impl RulesEngine for HangmanRules {
    fn apply_move(
        &self,
        metadata: &GameMetadata,
        mv: &GameMove,
        actor: Uuid,
    ) -> Result<MoveOutcome, RulesError> {
        let GameMetadata::Hangman(state) = metadata else {
            return Err(RulesError::MetadataMismatch);
        };
        match mv {
            GameMove::SetWord { word } => apply_set_word(state, word, actor),
            GameMove::Guess { letter } => apply_guess(state, *letter, actor),
            _ => Err(RulesError::MoveMismatch),
        }
    }
}
