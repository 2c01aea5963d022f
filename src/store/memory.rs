//! In-memory game record store for tests and the simulator.
//!
//! Mirrors the backend's observable behavior: last-write-wins metadata,
//! append-only events, idempotent joins, and a per-game change feed.

use super::{GameAction, GameSnapshot, GameStore, StoreError};
use crate::model::{Game, GameEvent, GameParticipant, NewGame, ParticipantRole};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Mutex;
use tokio::sync::broadcast;
use uuid::Uuid;

/// Capacity of each per-game change channel. Receivers that fall this
/// far behind miss signals, matching the "no payload guarantee,
/// re-fetch on wake" contract.
const CHANGE_CHANNEL_CAPACITY: usize = 64;

#[derive(Default)]
struct Tables {
    games: HashMap<Uuid, Game>,
    participants: HashMap<Uuid, Vec<GameParticipant>>,
    events: HashMap<Uuid, Vec<GameEvent>>,
    feeds: HashMap<Uuid, broadcast::Sender<Uuid>>,
    /// Test hook: fail the next write with a backend error
    fail_next_write: bool,
}

/// In-memory [`GameStore`].
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `game_action` fail, to exercise the session's
    /// store-failure path.
    pub fn fail_next_write(&self) {
        self.tables.lock().expect("store lock").fail_next_write = true;
    }

    fn notify(tables: &mut Tables, game_id: Uuid) {
        if let Some(sender) = tables.feeds.get(&game_id) {
            // No receivers is fine
            let _ = sender.send(game_id);
        }
    }
}

#[async_trait::async_trait]
impl GameStore for InMemoryStore {
    async fn create_game(&self, new_game: NewGame) -> Result<Game, StoreError> {
        let status = new_game.initial_status();
        let game = Game {
            id: Uuid::new_v4(),
            circle_id: new_game.circle_id,
            created_by: new_game.created_by,
            game_type: new_game.metadata.game_type(),
            status,
            title: new_game.title,
            description: new_game.description,
            metadata: new_game.metadata,
            created_at: Utc::now(),
        };

        let mut tables = self.tables.lock().expect("store lock");
        tables.participants.insert(
            game.id,
            vec![GameParticipant {
                game_id: game.id,
                user_id: game.created_by,
                role: ParticipantRole::Host,
                joined_at: game.created_at,
            }],
        );
        tables.events.insert(game.id, Vec::new());
        tables.games.insert(game.id, game.clone());
        Ok(game)
    }

    async fn get_game(&self, game_id: Uuid) -> Result<GameSnapshot, StoreError> {
        let tables = self.tables.lock().expect("store lock");
        let game = tables
            .games
            .get(&game_id)
            .cloned()
            .ok_or(StoreError::NotFound(game_id))?;
        Ok(GameSnapshot {
            participants: tables.participants.get(&game_id).cloned().unwrap_or_default(),
            events: tables.events.get(&game_id).cloned().unwrap_or_default(),
            game,
        })
    }

    async fn join_game(
        &self,
        game_id: Uuid,
        user_id: Uuid,
        role: ParticipantRole,
    ) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().expect("store lock");
        if !tables.games.contains_key(&game_id) {
            return Err(StoreError::NotFound(game_id));
        }
        let roster = tables.participants.entry(game_id).or_default();
        if roster.iter().any(|p| p.user_id == user_id) {
            return Ok(());
        }
        roster.push(GameParticipant {
            game_id,
            user_id,
            role,
            joined_at: Utc::now(),
        });
        Self::notify(&mut tables, game_id);
        Ok(())
    }

    async fn game_action(&self, game_id: Uuid, action: GameAction) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().expect("store lock");
        if tables.fail_next_write {
            tables.fail_next_write = false;
            return Err(StoreError::Backend("injected write failure".to_string()));
        }
        let game = tables
            .games
            .get_mut(&game_id)
            .ok_or(StoreError::NotFound(game_id))?;
        if let Some(metadata) = &action.metadata {
            if metadata.game_type() != game.game_type {
                return Err(StoreError::MetadataTypeMismatch);
            }
        }

        if let Some(status) = action.new_status {
            game.status = status;
        }
        if let Some(metadata) = action.metadata {
            // Whole-value replacement: the backend column is written
            // blind, last writer wins
            game.metadata = metadata;
        }
        tables.events.entry(game_id).or_default().push(GameEvent {
            game_id,
            event_type: action.event_type,
            payload: action.payload,
            actor: action.actor,
            created_at: Utc::now(),
        });
        Self::notify(&mut tables, game_id);
        Ok(())
    }

    async fn list_games(&self, circle_id: Uuid) -> Result<Vec<Game>, StoreError> {
        let tables = self.tables.lock().expect("store lock");
        let mut games: Vec<Game> = tables
            .games
            .values()
            .filter(|g| g.circle_id == circle_id)
            .cloned()
            .collect();
        games.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(games)
    }

    async fn delete_game(&self, game_id: Uuid) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().expect("store lock");
        if tables.games.remove(&game_id).is_none() {
            return Err(StoreError::NotFound(game_id));
        }
        tables.participants.remove(&game_id);
        tables.events.remove(&game_id);
        Self::notify(&mut tables, game_id);
        tables.feeds.remove(&game_id);
        Ok(())
    }

    fn subscribe(&self, game_id: Uuid) -> broadcast::Receiver<Uuid> {
        let mut tables = self.tables.lock().expect("store lock");
        tables
            .feeds
            .entry(game_id)
            .or_insert_with(|| broadcast::channel(CHANGE_CHANNEL_CAPACITY).0)
            .subscribe()
    }
}
