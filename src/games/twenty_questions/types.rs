//! 21 Questions data structures.
//!
//! The thinker fixes a secret subject; the guesser asks yes/no
//! questions and may commit to a final guess at any point.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Questions the guesser may ask before the thinker wins.
pub const DEFAULT_MAX_QUESTIONS: u32 = 21;

/// The thinker's reply to one question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reply {
    Yes,
    No,
    Maybe,
}

/// One asked question and its reply, once given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaExchange {
    pub question: String,
    pub reply: Option<Reply>,
}

/// Full 21 Questions game state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TwentyQuestionsState {
    pub thinker: Uuid,
    pub guesser: Uuid,
    /// Empty until the thinker sets it
    pub secret: String,
    /// Asked questions in order; the last may await its reply
    pub questions: Vec<QaExchange>,
    pub max_questions: u32,
    pub next_turn: Uuid,
    pub winner: Option<Uuid>,
    /// The committed final guess, once made
    pub final_guess: Option<String>,
}

impl TwentyQuestionsState {
    pub fn new(thinker: Uuid, guesser: Uuid, max_questions: u32) -> Self {
        Self {
            thinker,
            guesser,
            secret: String::new(),
            questions: Vec::new(),
            max_questions,
            // The thinker acts first: the secret must exist
            next_turn: thinker,
            winner: None,
            final_guess: None,
        }
    }

    pub fn has_secret(&self) -> bool {
        !self.secret.is_empty()
    }

    /// The last question, when it still awaits the thinker's reply.
    pub fn pending_question(&self) -> Option<&QaExchange> {
        self.questions.last().filter(|qa| qa.reply.is_none())
    }

    pub fn questions_asked(&self) -> u32 {
        self.questions.len() as u32
    }

    /// Fresh round with the roles swapped.
    pub fn rematch_seed(&self) -> Self {
        Self::new(self.guesser, self.thinker, self.max_questions)
    }
}

/// Comparison form for guesses: trimmed and case-folded.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  The Moon "), "the moon");
        assert_eq!(normalize("CAT"), normalize("cat"));
    }

    #[test]
    fn test_pending_question() {
        let mut state = TwentyQuestionsState::new(Uuid::new_v4(), Uuid::new_v4(), 21);
        assert!(state.pending_question().is_none());
        state.questions.push(QaExchange {
            question: "Is it alive?".to_string(),
            reply: None,
        });
        assert!(state.pending_question().is_some());
        state.questions[0].reply = Some(Reply::No);
        assert!(state.pending_question().is_none());
    }
}
