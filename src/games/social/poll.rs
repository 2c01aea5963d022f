//! Poll and Would-You-Rather: ballots over fixed option lists.

use crate::games::registry::RulesEngine;
use crate::games::{GameMetadata, GameMove, MoveOutcome, RulesError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One poll option and the users currently voting for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollOption {
    pub text: String,
    pub voters: Vec<Uuid>,
}

impl PollOption {
    pub fn new(text: impl Into<String>) -> Self {
        PollOption {
            text: text.into(),
            voters: Vec::new(),
        }
    }

    pub fn vote_count(&self) -> usize {
        self.voters.len()
    }
}

/// Full Poll game state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollState {
    pub question: String,
    pub options: Vec<PollOption>,
    /// When false a ballot is exclusive: re-voting moves it
    pub allow_multiple: bool,
}

impl PollState {
    pub fn new(question: impl Into<String>, options: Vec<String>, allow_multiple: bool) -> Self {
        Self {
            question: question.into(),
            options: options.into_iter().map(PollOption::new).collect(),
            allow_multiple,
        }
    }

    /// Same question and options, ballots cleared.
    pub fn rematch_seed(&self) -> Self {
        Self::new(
            self.question.clone(),
            self.options.iter().map(|o| o.text.clone()).collect(),
            self.allow_multiple,
        )
    }
}

/// Cast a ballot. Single-choice polls move the voter's prior ballot;
/// multi-choice polls never duplicate it within one option.
fn cast_vote(
    options: &[PollOption],
    option: usize,
    allow_multiple: bool,
    voter: Uuid,
) -> Result<Vec<PollOption>, RulesError> {
    if option >= options.len() {
        return Err(RulesError::NoSuchOption);
    }
    let mut options = options.to_vec();
    if !allow_multiple {
        for opt in options.iter_mut() {
            opt.voters.retain(|&v| v != voter);
        }
    }
    if !options[option].voters.contains(&voter) {
        options[option].voters.push(voter);
    }
    Ok(options)
}

/// Rules engine for [`GameMetadata::Poll`]. Accumulation only: no
/// terminal outcome; the host closes the poll.
pub struct PollRules;

impl RulesEngine for PollRules {
    fn apply_move(
        &self,
        metadata: &GameMetadata,
        mv: &GameMove,
        actor: Uuid,
    ) -> Result<MoveOutcome, RulesError> {
        let GameMetadata::Poll(state) = metadata else {
            return Err(RulesError::MetadataMismatch);
        };
        let GameMove::Vote { option } = mv else {
            return Err(RulesError::MoveMismatch);
        };
        let mut next = state.clone();
        next.options = cast_vote(&state.options, *option, state.allow_multiple, actor)?;
        Ok(MoveOutcome::ongoing(GameMetadata::Poll(next)))
    }
}

/// Full Would-You-Rather game state: exactly two options, always an
/// exclusive ballot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WouldYouRatherState {
    pub option_a: PollOption,
    pub option_b: PollOption,
}

impl WouldYouRatherState {
    pub fn new(option_a: impl Into<String>, option_b: impl Into<String>) -> Self {
        Self {
            option_a: PollOption::new(option_a),
            option_b: PollOption::new(option_b),
        }
    }

    /// Same pair, ballots cleared.
    pub fn rematch_seed(&self) -> Self {
        Self::new(self.option_a.text.clone(), self.option_b.text.clone())
    }
}

/// Rules engine for [`GameMetadata::WouldYouRather`].
pub struct WouldYouRatherRules;

impl RulesEngine for WouldYouRatherRules {
    fn apply_move(
        &self,
        metadata: &GameMetadata,
        mv: &GameMove,
        actor: Uuid,
    ) -> Result<MoveOutcome, RulesError> {
        let GameMetadata::WouldYouRather(state) = metadata else {
            return Err(RulesError::MetadataMismatch);
        };
        let GameMove::Vote { option } = mv else {
            return Err(RulesError::MoveMismatch);
        };
        let pair = [state.option_a.clone(), state.option_b.clone()];
        let voted = cast_vote(&pair, *option, false, actor)?;
        let [option_a, option_b] = voted.try_into().expect("two options in, two out");
        Ok(MoveOutcome::ongoing(GameMetadata::WouldYouRather(
            WouldYouRatherState { option_a, option_b },
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poll_metadata(allow_multiple: bool) -> GameMetadata {
        GameMetadata::Poll(PollState::new(
            "Pizza night?",
            vec!["Friday".to_string(), "Saturday".to_string()],
            allow_multiple,
        ))
    }

    fn unwrap_poll(metadata: GameMetadata) -> PollState {
        match metadata {
            GameMetadata::Poll(state) => state,
            other => panic!("expected poll metadata, got {:?}", other.game_type()),
        }
    }

    #[test]
    fn test_revote_moves_ballot() {
        let voter = Uuid::new_v4();
        let metadata = poll_metadata(false);
        let next = PollRules
            .apply_move(&metadata, &GameMove::Vote { option: 0 }, voter)
            .expect("vote A")
            .next;
        let next = PollRules
            .apply_move(&next, &GameMove::Vote { option: 1 }, voter)
            .expect("vote B")
            .next;
        let state = unwrap_poll(next);
        assert_eq!(state.options[0].vote_count(), 0, "ballot moved off A");
        assert_eq!(state.options[1].vote_count(), 1);
    }

    #[test]
    fn test_multi_choice_keeps_both_votes() {
        let voter = Uuid::new_v4();
        let metadata = poll_metadata(true);
        let next = PollRules
            .apply_move(&metadata, &GameMove::Vote { option: 0 }, voter)
            .expect("vote A")
            .next;
        let next = PollRules
            .apply_move(&next, &GameMove::Vote { option: 1 }, voter)
            .expect("vote B")
            .next;
        let state = unwrap_poll(next);
        assert_eq!(state.options[0].vote_count(), 1);
        assert_eq!(state.options[1].vote_count(), 1);
    }

    #[test]
    fn test_double_vote_same_option_never_duplicates() {
        let voter = Uuid::new_v4();
        for allow_multiple in [false, true] {
            let metadata = poll_metadata(allow_multiple);
            let next = PollRules
                .apply_move(&metadata, &GameMove::Vote { option: 0 }, voter)
                .expect("vote")
                .next;
            let next = PollRules
                .apply_move(&next, &GameMove::Vote { option: 0 }, voter)
                .expect("vote again")
                .next;
            assert_eq!(unwrap_poll(next).options[0].vote_count(), 1);
        }
    }

    #[test]
    fn test_unknown_option_rejected() {
        let metadata = poll_metadata(false);
        assert!(matches!(
            PollRules.apply_move(&metadata, &GameMove::Vote { option: 5 }, Uuid::new_v4()),
            Err(RulesError::NoSuchOption)
        ));
    }

    #[test]
    fn test_votes_never_terminate_a_poll() {
        let metadata = poll_metadata(false);
        let outcome = PollRules
            .apply_move(&metadata, &GameMove::Vote { option: 0 }, Uuid::new_v4())
            .expect("vote");
        assert!(outcome.terminal.is_none());
    }

    #[test]
    fn test_would_you_rather_is_exclusive() {
        let voter = Uuid::new_v4();
        let metadata =
            GameMetadata::WouldYouRather(WouldYouRatherState::new("fly", "be invisible"));
        let next = WouldYouRatherRules
            .apply_move(&metadata, &GameMove::Vote { option: 0 }, voter)
            .expect("vote A")
            .next;
        let next = WouldYouRatherRules
            .apply_move(&next, &GameMove::Vote { option: 1 }, voter)
            .expect("vote B")
            .next;
        let GameMetadata::WouldYouRather(state) = next else {
            panic!("expected would-you-rather metadata");
        };
        assert_eq!(state.option_a.vote_count(), 0);
        assert_eq!(state.option_b.vote_count(), 1);
    }
}
