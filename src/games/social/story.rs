//! Story Chain: a collaboratively written story, one part at a time.

use crate::games::registry::RulesEngine;
use crate::games::{GameMetadata, GameMove, MoveOutcome, RulesError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One appended story part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryPart {
    pub user_id: Uuid,
    pub text: String,
}

/// Full Story-Chain game state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryChainState {
    /// The host's opening line that seeds the story
    pub opening: String,
    /// Append-only parts; no user writes two in a row
    pub parts: Vec<StoryPart>,
}

impl StoryChainState {
    pub fn new(opening: impl Into<String>) -> Self {
        Self {
            opening: opening.into(),
            parts: Vec::new(),
        }
    }

    pub fn last_contributor(&self) -> Option<Uuid> {
        self.parts.last().map(|p| p.user_id)
    }

    /// Same opening, story cleared.
    pub fn rematch_seed(&self) -> Self {
        Self::new(self.opening.clone())
    }
}

/// Rules engine for [`GameMetadata::StoryChain`]. The one hard rule:
/// the same user may not contribute two consecutive parts.
pub struct StoryChainRules;

impl RulesEngine for StoryChainRules {
    fn apply_move(
        &self,
        metadata: &GameMetadata,
        mv: &GameMove,
        actor: Uuid,
    ) -> Result<MoveOutcome, RulesError> {
        let GameMetadata::StoryChain(state) = metadata else {
            return Err(RulesError::MetadataMismatch);
        };
        let GameMove::Contribute { text } = mv else {
            return Err(RulesError::MoveMismatch);
        };
        let text = text.trim();
        if text.is_empty() {
            return Err(RulesError::EmptySubmission);
        }
        if state.last_contributor() == Some(actor) {
            return Err(RulesError::ConsecutiveContribution);
        }
        let mut next = state.clone();
        next.parts.push(StoryPart {
            user_id: actor,
            text: text.to_string(),
        });
        Ok(MoveOutcome::ongoing(GameMetadata::StoryChain(next)))
    }
}
