//! Question of the Day and Rate This: per-user contribution lists.
//!
//! Contribution order is the list order; wall-clock timestamps live on
//! the event log, not in metadata, so the rules stay pure.

use crate::games::registry::RulesEngine;
use crate::games::{GameMetadata, GameMove, MoveOutcome, RulesError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One free-text answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub user_id: Uuid,
    pub text: String,
}

/// Full Question-of-the-Day game state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponsesState {
    pub prompt: String,
    /// Append-only; a user may answer more than once
    pub responses: Vec<Response>,
}

impl ResponsesState {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            responses: Vec::new(),
        }
    }

    /// Same prompt, answers cleared.
    pub fn rematch_seed(&self) -> Self {
        Self::new(self.prompt.clone())
    }
}

/// Rules engine for [`GameMetadata::QuestionOfTheDay`].
pub struct ResponsesRules;

impl RulesEngine for ResponsesRules {
    fn apply_move(
        &self,
        metadata: &GameMetadata,
        mv: &GameMove,
        actor: Uuid,
    ) -> Result<MoveOutcome, RulesError> {
        let GameMetadata::QuestionOfTheDay(state) = metadata else {
            return Err(RulesError::MetadataMismatch);
        };
        let GameMove::Respond { text } = mv else {
            return Err(RulesError::MoveMismatch);
        };
        let text = text.trim();
        if text.is_empty() {
            return Err(RulesError::EmptySubmission);
        }
        let mut next = state.clone();
        next.responses.push(Response {
            user_id: actor,
            text: text.to_string(),
        });
        Ok(MoveOutcome::ongoing(GameMetadata::QuestionOfTheDay(next)))
    }
}

/// One user's score for the subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    pub user_id: Uuid,
    pub score: u8,
}

/// Full Rate-This game state. One score per user; re-rating replaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateThisState {
    pub subject: String,
    pub ratings: Vec<Rating>,
}

impl RateThisState {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            ratings: Vec::new(),
        }
    }

    /// Mean score, for display.
    pub fn average(&self) -> Option<f64> {
        if self.ratings.is_empty() {
            return None;
        }
        let sum: u32 = self.ratings.iter().map(|r| r.score as u32).sum();
        Some(sum as f64 / self.ratings.len() as f64)
    }

    /// Same subject, scores cleared.
    pub fn rematch_seed(&self) -> Self {
        Self::new(self.subject.clone())
    }
}

/// Rules engine for [`GameMetadata::RateThis`].
pub struct RateThisRules;

impl RulesEngine for RateThisRules {
    fn apply_move(
        &self,
        metadata: &GameMetadata,
        mv: &GameMove,
        actor: Uuid,
    ) -> Result<MoveOutcome, RulesError> {
        let GameMetadata::RateThis(state) = metadata else {
            return Err(RulesError::MetadataMismatch);
        };
        let GameMove::Rate { score } = mv else {
            return Err(RulesError::MoveMismatch);
        };
        if !(1..=10).contains(score) {
            return Err(RulesError::ScoreOutOfRange);
        }
        let mut next = state.clone();
        match next.ratings.iter_mut().find(|r| r.user_id == actor) {
            Some(rating) => rating.score = *score,
            None => next.ratings.push(Rating {
                user_id: actor,
                score: *score,
            }),
        }
        Ok(MoveOutcome::ongoing(GameMetadata::RateThis(next)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_responses_append_per_user() {
        let alice = Uuid::new_v4();
        let metadata = GameMetadata::QuestionOfTheDay(ResponsesState::new("Best snack?"));
        let next = ResponsesRules
            .apply_move(
                &metadata,
                &GameMove::Respond {
                    text: "popcorn".to_string(),
                },
                alice,
            )
            .expect("respond")
            .next;
        let next = ResponsesRules
            .apply_move(
                &next,
                &GameMove::Respond {
                    text: "no wait, pretzels".to_string(),
                },
                alice,
            )
            .expect("respond again")
            .next;
        let GameMetadata::QuestionOfTheDay(state) = next else {
            panic!("expected question-of-the-day metadata");
        };
        assert_eq!(state.responses.len(), 2, "answers accumulate");
    }

    #[test]
    fn test_empty_response_rejected() {
        let metadata = GameMetadata::QuestionOfTheDay(ResponsesState::new("Best snack?"));
        assert!(matches!(
            ResponsesRules.apply_move(
                &metadata,
                &GameMove::Respond {
                    text: "   ".to_string()
                },
                Uuid::new_v4(),
            ),
            Err(RulesError::EmptySubmission)
        ));
    }

    #[test]
    fn test_rerating_replaces() {
        let alice = Uuid::new_v4();
        let metadata = GameMetadata::RateThis(RateThisState::new("My new haircut"));
        let next = RateThisRules
            .apply_move(&metadata, &GameMove::Rate { score: 4 }, alice)
            .expect("rate")
            .next;
        let next = RateThisRules
            .apply_move(&next, &GameMove::Rate { score: 9 }, alice)
            .expect("rate again")
            .next;
        let GameMetadata::RateThis(state) = next else {
            panic!("expected rate-this metadata");
        };
        assert_eq!(state.ratings.len(), 1);
        assert_eq!(state.ratings[0].score, 9);
    }

    #[test]
    fn test_score_bounds() {
        let metadata = GameMetadata::RateThis(RateThisState::new("My new haircut"));
        for score in [0u8, 11] {
            assert!(matches!(
                RateThisRules.apply_move(&metadata, &GameMove::Rate { score }, Uuid::new_v4()),
                Err(RulesError::ScoreOutOfRange)
            ));
        }
    }

    #[test]
    fn test_average() {
        let mut state = RateThisState::new("subject");
        assert_eq!(state.average(), None);
        state.ratings.push(Rating {
            user_id: Uuid::new_v4(),
            score: 4,
        });
        state.ratings.push(Rating {
            user_id: Uuid::new_v4(),
            score: 8,
        });
        assert_eq!(state.average(), Some(6.0));
    }
}
