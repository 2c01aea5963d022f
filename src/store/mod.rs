//! Game record store boundary.
//!
//! The hosted backend owns persistence, replication, and delivery; the
//! engine consumes it through this narrow async contract. The in-memory
//! implementation backs tests and the simulator.

pub mod memory;

pub use memory::InMemoryStore;

use crate::games::GameMetadata;
use crate::model::{Game, GameEvent, GameParticipant, NewGame, ParticipantRole};
use crate::model::GameStatus;
use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::broadcast;
use uuid::Uuid;

/// Errors from store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("game not found: {0}")]
    NotFound(Uuid),

    #[error("metadata type does not match the game record")]
    MetadataTypeMismatch,

    #[error("permission denied")]
    PermissionDenied,

    #[error("conflicting write: {0}")]
    Conflict(String),

    #[error("backend error: {0}")]
    Backend(String),
}

/// Everything a session needs about one game, fetched together.
#[derive(Debug, Clone)]
pub struct GameSnapshot {
    pub game: Game,
    pub participants: Vec<GameParticipant>,
    pub events: Vec<GameEvent>,
}

impl GameSnapshot {
    pub fn is_participant(&self, user_id: Uuid) -> bool {
        self.participants.iter().any(|p| p.user_id == user_id)
    }
}

/// One state-changing action: an event append plus optional status and
/// metadata writes, applied together.
///
/// The metadata write replaces the typed union wholesale. Callers never
/// hand-assemble partial objects: the next variant always comes out of
/// a pure rules engine run over the previous state, so sibling fields
/// cannot be dropped on the way through.
#[derive(Debug, Clone)]
pub struct GameAction {
    pub event_type: String,
    pub payload: serde_json::Value,
    pub actor: Option<Uuid>,
    pub new_status: Option<GameStatus>,
    pub metadata: Option<GameMetadata>,
}

/// Async client for the game record store.
#[async_trait]
pub trait GameStore: Send + Sync {
    /// Create a game record; the creator becomes its host participant.
    async fn create_game(&self, new_game: NewGame) -> Result<Game, StoreError>;

    /// Fetch a game with its participant roster and event log.
    async fn get_game(&self, game_id: Uuid) -> Result<GameSnapshot, StoreError>;

    /// Insert a participant row. Idempotent: joining twice is a no-op.
    async fn join_game(
        &self,
        game_id: Uuid,
        user_id: Uuid,
        role: ParticipantRole,
    ) -> Result<(), StoreError>;

    /// Append a [`GameEvent`] and apply the action's status/metadata
    /// writes. Last write wins; there is no version check.
    async fn game_action(&self, game_id: Uuid, action: GameAction) -> Result<(), StoreError>;

    /// All games of a circle, newest first.
    async fn list_games(&self, circle_id: Uuid) -> Result<Vec<Game>, StoreError>;

    /// Remove a game with its participants and events.
    async fn delete_game(&self, game_id: Uuid) -> Result<(), StoreError>;

    /// Change feed for one game: a signal (the game id, no payload
    /// guarantee) on any write to the record or its event log.
    /// Receivers re-fetch via [`GameStore::get_game`].
    fn subscribe(&self, game_id: Uuid) -> broadcast::Receiver<Uuid>;
}
