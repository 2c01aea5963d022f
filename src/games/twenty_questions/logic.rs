//! 21 Questions rules: secret, question/reply alternation, final guess.

use super::types::{normalize, QaExchange, Reply, TwentyQuestionsState};
use crate::games::registry::RulesEngine;
use crate::games::{GameMetadata, GameMove, MoveOutcome, RulesError, Terminal};
use uuid::Uuid;

/// The thinker fixes the secret subject. Legal once.
pub fn apply_set_secret(
    state: &TwentyQuestionsState,
    secret: &str,
    actor: Uuid,
) -> Result<MoveOutcome, RulesError> {
    if state.winner.is_some() {
        return Err(RulesError::GameOver);
    }
    if actor != state.thinker {
        return Err(RulesError::NotYourTurn);
    }
    if state.has_secret() {
        return Err(RulesError::SecretAlreadySet);
    }
    let secret = secret.trim();
    if secret.is_empty() {
        return Err(RulesError::EmptySubmission);
    }

    let mut next = state.clone();
    next.secret = secret.to_string();
    next.next_turn = state.guesser;
    Ok(MoveOutcome::ongoing(GameMetadata::TwentyOneQuestions(next)))
}

/// The guesser asks the next question.
pub fn apply_ask(
    state: &TwentyQuestionsState,
    question: &str,
    actor: Uuid,
) -> Result<MoveOutcome, RulesError> {
    if state.winner.is_some() {
        return Err(RulesError::GameOver);
    }
    if !state.has_secret() {
        return Err(RulesError::SecretNotSet);
    }
    if actor != state.guesser || actor != state.next_turn {
        return Err(RulesError::NotYourTurn);
    }
    if state.pending_question().is_some() {
        return Err(RulesError::QuestionPending);
    }
    if state.questions_asked() >= state.max_questions {
        return Err(RulesError::GameOver);
    }
    let question = question.trim();
    if question.is_empty() {
        return Err(RulesError::EmptySubmission);
    }

    let mut next = state.clone();
    next.questions.push(QaExchange {
        question: question.to_string(),
        reply: None,
    });
    next.next_turn = state.thinker;
    Ok(MoveOutcome::ongoing(GameMetadata::TwentyOneQuestions(next)))
}

/// The thinker answers the pending question. Answering the last allowed
/// question ends the game in the thinker's favor.
pub fn apply_answer(
    state: &TwentyQuestionsState,
    reply: Reply,
    actor: Uuid,
) -> Result<MoveOutcome, RulesError> {
    if state.winner.is_some() {
        return Err(RulesError::GameOver);
    }
    if actor != state.thinker || actor != state.next_turn {
        return Err(RulesError::NotYourTurn);
    }
    if state.pending_question().is_none() {
        return Err(RulesError::NoQuestionPending);
    }

    let mut next = state.clone();
    next.questions
        .last_mut()
        .expect("pending question exists")
        .reply = Some(reply);

    if next.questions_asked() >= next.max_questions {
        // The subject survived every question
        next.winner = Some(state.thinker);
        return Ok(MoveOutcome::ended(
            GameMetadata::TwentyOneQuestions(next),
            Terminal::win(actor),
        ));
    }
    next.next_turn = state.guesser;
    Ok(MoveOutcome::ongoing(GameMetadata::TwentyOneQuestions(next)))
}

/// The guesser commits to a final guess. Correct wins; wrong concedes
/// the round to the thinker.
pub fn apply_final_guess(
    state: &TwentyQuestionsState,
    text: &str,
    actor: Uuid,
) -> Result<MoveOutcome, RulesError> {
    if state.winner.is_some() {
        return Err(RulesError::GameOver);
    }
    if !state.has_secret() {
        return Err(RulesError::SecretNotSet);
    }
    if actor != state.guesser || actor != state.next_turn {
        return Err(RulesError::NotYourTurn);
    }
    if state.pending_question().is_some() {
        return Err(RulesError::QuestionPending);
    }
    let text = text.trim();
    if text.is_empty() {
        return Err(RulesError::EmptySubmission);
    }

    let mut next = state.clone();
    next.final_guess = Some(text.to_string());
    let winner = if normalize(text) == normalize(&state.secret) {
        state.guesser
    } else {
        state.thinker
    };
    next.winner = Some(winner);
    Ok(MoveOutcome::ended(
        GameMetadata::TwentyOneQuestions(next),
        Terminal::win(winner),
    ))
}

/// Rules engine for [`GameMetadata::TwentyOneQuestions`].
pub struct TwentyQuestionsRules;

impl RulesEngine for TwentyQuestionsRules {
    fn apply_move(
        &self,
        metadata: &GameMetadata,
        mv: &GameMove,
        actor: Uuid,
    ) -> Result<MoveOutcome, RulesError> {
        let GameMetadata::TwentyOneQuestions(state) = metadata else {
            return Err(RulesError::MetadataMismatch);
        };
        match mv {
            GameMove::SetSecret { secret } => apply_set_secret(state, secret, actor),
            GameMove::Ask { question } => apply_ask(state, question, actor),
            GameMove::Answer { reply } => apply_answer(state, *reply, actor),
            GameMove::FinalGuess { text } => apply_final_guess(state, text, actor),
            _ => Err(RulesError::MoveMismatch),
        }
    }
}
