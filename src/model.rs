//! Shared game record model: games, participants, and the event log.

use crate::games::GameMetadata;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sentinel user id for the computer opponent. Never inserted as a
/// participant row; the turn pointer may reference it directly.
pub const COMPUTER_USER_ID: Uuid = Uuid::nil();

/// Returns true if the given user id is the computer sentinel.
pub fn is_computer(user_id: Uuid) -> bool {
    user_id == COMPUTER_USER_ID
}

/// The closed set of game types a wall can host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameType {
    TicTacToe,
    ConnectFour,
    Checkers,
    Chess,
    Hangman,
    TwentyOneQuestions,
    Poll,
    WouldYouRather,
    QuestionOfTheDay,
    StoryChain,
    RateThis,
}

impl GameType {
    pub const ALL: [GameType; 11] = [
        GameType::TicTacToe,
        GameType::ConnectFour,
        GameType::Checkers,
        GameType::Chess,
        GameType::Hangman,
        GameType::TwentyOneQuestions,
        GameType::Poll,
        GameType::WouldYouRather,
        GameType::QuestionOfTheDay,
        GameType::StoryChain,
        GameType::RateThis,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            GameType::TicTacToe => "Tic-Tac-Toe",
            GameType::ConnectFour => "Connect Four",
            GameType::Checkers => "Checkers",
            GameType::Chess => "Chess",
            GameType::Hangman => "Hangman",
            GameType::TwentyOneQuestions => "21 Questions",
            GameType::Poll => "Poll",
            GameType::WouldYouRather => "Would You Rather",
            GameType::QuestionOfTheDay => "Question of the Day",
            GameType::StoryChain => "Story Chain",
            GameType::RateThis => "Rate This",
        }
    }

    /// Classic two-seat board games with a hard turn order.
    pub fn is_board_game(&self) -> bool {
        matches!(
            self,
            GameType::TicTacToe
                | GameType::ConnectFour
                | GameType::Checkers
                | GameType::Chess
        )
    }

    /// Accumulation games: contributions pile up, nobody "wins".
    pub fn is_social_game(&self) -> bool {
        matches!(
            self,
            GameType::Poll
                | GameType::WouldYouRather
                | GameType::QuestionOfTheDay
                | GameType::StoryChain
                | GameType::RateThis
        )
    }
}

/// Lifecycle status of a game record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Waiting,
    InProgress,
    Finished,
    Cancelled,
}

impl GameStatus {
    /// Terminal statuses are absorbing; only rematch leaves them,
    /// and rematch creates a brand-new record.
    pub fn is_terminal(&self) -> bool {
        matches!(self, GameStatus::Finished | GameStatus::Cancelled)
    }
}

/// Role of a participant within one game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantRole {
    Host,
    Player,
    Guest,
}

/// One game record. `metadata` is the full type-specific state; its
/// variant always matches `game_type`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    pub id: Uuid,
    pub circle_id: Uuid,
    pub created_by: Uuid,
    pub game_type: GameType,
    pub status: GameStatus,
    pub title: String,
    pub description: Option<String>,
    pub metadata: GameMetadata,
    pub created_at: DateTime<Utc>,
}

/// Membership row: who may act in a game. Never mutated after insert;
/// removed only with the parent game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameParticipant {
    pub game_id: Uuid,
    pub user_id: Uuid,
    pub role: ParticipantRole,
    pub joined_at: DateTime<Utc>,
}

/// Append-only audit record. One per state-changing action. Events are
/// never updated, deleted, or replayed to reconstruct state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameEvent {
    pub game_id: Uuid,
    pub event_type: String,
    pub payload: serde_json::Value,
    pub actor: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Request to create a new game record.
#[derive(Debug, Clone)]
pub struct NewGame {
    pub circle_id: Uuid,
    pub created_by: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub metadata: GameMetadata,
    /// Explicit status override; `None` picks the default for the type.
    pub status: Option<GameStatus>,
}

impl NewGame {
    /// Default lifecycle entry point: board games start immediately when
    /// both seats are known (second human or the computer), otherwise
    /// they wait for a joiner. Social games accept input from creation.
    pub fn initial_status(&self) -> GameStatus {
        if let Some(status) = self.status {
            return status;
        }
        if self.metadata.game_type().is_board_game() && self.metadata.has_open_seat() {
            GameStatus::Waiting
        } else {
            GameStatus::InProgress
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_computer_sentinel_is_nil() {
        assert!(is_computer(COMPUTER_USER_ID));
        assert!(!is_computer(Uuid::new_v4()));
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(GameStatus::Finished.is_terminal());
        assert!(GameStatus::Cancelled.is_terminal());
        assert!(!GameStatus::Waiting.is_terminal());
        assert!(!GameStatus::InProgress.is_terminal());
    }

    #[test]
    fn test_type_families_cover_all() {
        for game_type in GameType::ALL {
            let classic = game_type.is_board_game();
            let social = game_type.is_social_game();
            // Hangman and 21 Questions are turn games without a board
            let word_game = matches!(
                game_type,
                GameType::Hangman | GameType::TwentyOneQuestions
            );
            assert!(classic || social || word_game, "{:?} unclassified", game_type);
        }
    }
}
