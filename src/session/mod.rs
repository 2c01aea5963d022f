//! Game session controller: one active game, client-side.
//!
//! Loads the record, applies optimistic local updates, submits actions
//! to the store, reacts to change signals, and schedules the computer
//! opponent. All failures surface as drained [`Notice`] values; nothing
//! here panics or propagates past the session boundary.

pub mod reconcile;

use crate::games::{
    engine_for, selector_for, BotDifficulty, GameMetadata, GameMove, RulesError,
};
use crate::model::{
    is_computer, Game, GameEvent, GameParticipant, GameStatus, NewGame, ParticipantRole,
    COMPUTER_USER_ID,
};
use crate::store::{GameAction, GameSnapshot, GameStore, StoreError};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::broadcast;
use tokio::time::Instant;
use uuid::Uuid;

/// How long the computer "thinks" before moving. Pacing only.
pub const DEFAULT_BOT_DELAY: Duration = Duration::from_millis(1200);

/// Session lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Loading,
    Ready,
    Mutating,
    Terminal,
}

/// User-facing outcome of a session operation, drained by the view
/// layer and rendered as transient toasts.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// A rules engine rejected the move; nothing was written.
    InvalidMove(RulesError),
    /// The store rejected a write; the optimistic state stays until the
    /// next authoritative reload corrects it.
    StoreRejected(String),
    /// Loading the game failed; the caller should navigate away.
    LoadFailed(String),
    /// The computer opponent produced no move; the game stalls.
    BotFailed,
}

/// Programming-level session errors. User-level failures become
/// [`Notice`]s instead.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session has not loaded the game yet")]
    NotLoaded,
    #[error("user is not a participant of this game")]
    NotAParticipant,
    #[error("game is not finished")]
    NotFinished,
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Intent callbacks emitted by a game view. Views never mutate metadata
/// directly; every gesture funnels through the session.
#[derive(Debug, Clone, PartialEq)]
pub enum GameIntent {
    Move(GameMove),
    Join,
    Rematch,
    Close,
    Forfeit,
}

enum Wake {
    Timer,
    Change,
    Closed,
}

/// Controller for one active game session.
pub struct GameSession<S: GameStore> {
    store: Arc<S>,
    game_id: Uuid,
    user_id: Uuid,
    phase: SessionPhase,
    snapshot: Option<GameSnapshot>,
    /// Locally computed next state, shown until the next authoritative
    /// read replaces it
    optimistic: Option<GameMetadata>,
    changes: broadcast::Receiver<Uuid>,
    bot_difficulty: BotDifficulty,
    bot_delay: Duration,
    /// Armed thinking-delay deadline; re-armed or cleared on every
    /// refresh so a stale timer never moves on an outdated board
    bot_deadline: Option<Instant>,
    notices: Vec<Notice>,
    rng: StdRng,
}

impl<S: GameStore> GameSession<S> {
    pub fn new(store: Arc<S>, game_id: Uuid, user_id: Uuid) -> Self {
        let changes = store.subscribe(game_id);
        Self {
            store,
            game_id,
            user_id,
            phase: SessionPhase::Loading,
            snapshot: None,
            optimistic: None,
            changes,
            bot_difficulty: BotDifficulty::Medium,
            bot_delay: DEFAULT_BOT_DELAY,
            bot_deadline: None,
            notices: Vec::new(),
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_bot_difficulty(mut self, difficulty: BotDifficulty) -> Self {
        self.bot_difficulty = difficulty;
        self
    }

    /// Shorten or remove the thinking delay (simulator and tests).
    pub fn with_bot_delay(mut self, delay: Duration) -> Self {
        self.bot_delay = delay;
        self
    }

    /// Deterministic RNG for the bot (simulator and tests).
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn game(&self) -> Option<&Game> {
        self.snapshot.as_ref().map(|s| &s.game)
    }

    pub fn participants(&self) -> &[GameParticipant] {
        self.snapshot
            .as_ref()
            .map(|s| s.participants.as_slice())
            .unwrap_or(&[])
    }

    pub fn events(&self) -> &[GameEvent] {
        self.snapshot
            .as_ref()
            .map(|s| s.events.as_slice())
            .unwrap_or(&[])
    }

    /// The state the view renders: the optimistic overlay when one is
    /// in flight, otherwise the last authoritative read.
    pub fn metadata(&self) -> Option<&GameMetadata> {
        self.optimistic
            .as_ref()
            .or_else(|| self.snapshot.as_ref().map(|s| &s.game.metadata))
    }

    pub fn is_participant(&self) -> bool {
        self.snapshot
            .as_ref()
            .map(|s| s.is_participant(self.user_id))
            .unwrap_or(false)
    }

    /// Accumulated user-facing notices, oldest first.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Initial fetch of game, roster, and event log.
    pub async fn load(&mut self) -> Result<(), SessionError> {
        self.phase = SessionPhase::Loading;
        match self.store.get_game(self.game_id).await {
            Ok(snapshot) => {
                self.install_snapshot(snapshot);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(game_id = %self.game_id, %err, "failed to load game");
                self.notices.push(Notice::LoadFailed(err.to_string()));
                Err(err.into())
            }
        }
    }

    /// Re-fetch authoritative state and discard the optimistic overlay.
    pub async fn refresh(&mut self) -> Result<(), SessionError> {
        match self.store.get_game(self.game_id).await {
            Ok(snapshot) => {
                self.optimistic = reconcile::authoritative_wins(self.optimistic.take(), &snapshot);
                self.install_snapshot(snapshot);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(game_id = %self.game_id, %err, "failed to refresh game");
                self.notices.push(Notice::LoadFailed(err.to_string()));
                Err(err.into())
            }
        }
    }

    fn install_snapshot(&mut self, snapshot: GameSnapshot) {
        self.phase = if snapshot.game.status.is_terminal() {
            SessionPhase::Terminal
        } else {
            SessionPhase::Ready
        };
        self.snapshot = Some(snapshot);
        self.update_bot_timer();
    }

    /// Dispatch one view intent.
    pub async fn handle_intent(&mut self, intent: GameIntent) -> Result<(), SessionError> {
        match intent {
            GameIntent::Move(mv) => self.submit_move(mv).await,
            GameIntent::Join => self.join().await,
            GameIntent::Rematch => self.rematch().await.map(|_| ()),
            GameIntent::Close => self.close().await,
            GameIntent::Forfeit => self.forfeit().await,
        }
    }

    /// Submit a move as the local user.
    pub async fn submit_move(&mut self, mv: GameMove) -> Result<(), SessionError> {
        self.submit_as(self.user_id, mv).await
    }

    /// The shared move pipeline for human and computer actors: rules
    /// check, optimistic overlay, event append + metadata write, then
    /// authoritative reload.
    async fn submit_as(&mut self, actor: Uuid, mv: GameMove) -> Result<(), SessionError> {
        let snapshot = self.snapshot.as_ref().ok_or(SessionError::NotLoaded)?;
        if !is_computer(actor) && !snapshot.is_participant(actor) {
            return Err(SessionError::NotAParticipant);
        }
        let game = &snapshot.game;
        if game.status.is_terminal() {
            self.notices.push(Notice::InvalidMove(RulesError::GameOver));
            return Ok(());
        }

        let engine = engine_for(game.game_type);
        let outcome = match engine.apply_move(&game.metadata, &mv, actor) {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::debug!(game_id = %self.game_id, %err, "move rejected");
                self.notices.push(Notice::InvalidMove(err));
                return Ok(());
            }
        };

        // Immediate feedback: show the engine's next state before the
        // store round-trip settles
        self.optimistic = Some(outcome.next.clone());
        self.phase = SessionPhase::Mutating;

        let action = GameAction {
            event_type: mv.event_type().to_string(),
            payload: serde_json::to_value(&mv).unwrap_or(serde_json::Value::Null),
            actor: if is_computer(actor) { None } else { Some(actor) },
            new_status: outcome.terminal.map(|_| GameStatus::Finished),
            metadata: Some(outcome.next),
        };
        match self.store.game_action(self.game_id, action).await {
            Ok(()) => {
                // Request completion doubles as the change signal
                self.refresh().await
            }
            Err(err) => {
                tracing::warn!(game_id = %self.game_id, %err, "store rejected move");
                self.notices.push(Notice::StoreRejected(err.to_string()));
                // No rollback: the overlay stays until the next
                // authoritative reload self-heals it
                self.phase = SessionPhase::Ready;
                Ok(())
            }
        }
    }

    /// Join the game: insert a participant row and, for board games,
    /// take the open seat (flipping Waiting to InProgress).
    pub async fn join(&mut self) -> Result<(), SessionError> {
        let snapshot = self.snapshot.as_ref().ok_or(SessionError::NotLoaded)?;
        if snapshot.is_participant(self.user_id) {
            return self.refresh().await;
        }
        self.store
            .join_game(self.game_id, self.user_id, ParticipantRole::Player)
            .await?;

        let game = &snapshot.game;
        let mut metadata = game.metadata.clone();
        if metadata.claim_open_seat(self.user_id) {
            let new_status =
                (game.status == GameStatus::Waiting).then_some(GameStatus::InProgress);
            let action = GameAction {
                event_type: "join".to_string(),
                payload: serde_json::json!({ "user_id": self.user_id }),
                actor: Some(self.user_id),
                new_status,
                metadata: Some(metadata),
            };
            if let Err(err) = self.store.game_action(self.game_id, action).await {
                tracing::warn!(game_id = %self.game_id, %err, "failed to claim seat");
                self.notices.push(Notice::StoreRejected(err.to_string()));
            }
        }
        self.refresh().await
    }

    /// Start a fresh game of the same type for the same circle, seeded
    /// with initial metadata. Only allowed once this one is over.
    pub async fn rematch(&mut self) -> Result<Game, SessionError> {
        let snapshot = self.snapshot.as_ref().ok_or(SessionError::NotLoaded)?;
        if !snapshot.game.status.is_terminal() {
            return Err(SessionError::NotFinished);
        }
        let old = &snapshot.game;
        let new_game = self
            .store
            .create_game(NewGame {
                circle_id: old.circle_id,
                created_by: self.user_id,
                title: old.title.clone(),
                description: old.description.clone(),
                metadata: old.metadata.rematch_seed(),
                status: None,
            })
            .await?;
        let note = GameAction {
            event_type: "rematch".to_string(),
            payload: serde_json::json!({ "new_game_id": new_game.id }),
            actor: Some(self.user_id),
            new_status: None,
            metadata: None,
        };
        if let Err(err) = self.store.game_action(self.game_id, note).await {
            // The new game exists either way; the trail entry is best effort
            tracing::warn!(game_id = %self.game_id, %err, "failed to record rematch event");
        }
        Ok(new_game)
    }

    /// Host closes an open-ended social game.
    pub async fn close(&mut self) -> Result<(), SessionError> {
        let snapshot = self.snapshot.as_ref().ok_or(SessionError::NotLoaded)?;
        if snapshot.game.created_by != self.user_id {
            self.notices
                .push(Notice::StoreRejected(StoreError::PermissionDenied.to_string()));
            return Ok(());
        }
        let action = GameAction {
            event_type: "close".to_string(),
            payload: serde_json::Value::Null,
            actor: Some(self.user_id),
            new_status: Some(GameStatus::Finished),
            metadata: None,
        };
        match self.store.game_action(self.game_id, action).await {
            Ok(()) => self.refresh().await,
            Err(err) => {
                tracing::warn!(game_id = %self.game_id, %err, "failed to close game");
                self.notices.push(Notice::StoreRejected(err.to_string()));
                Ok(())
            }
        }
    }

    /// Give up: the game is cancelled for everyone.
    pub async fn forfeit(&mut self) -> Result<(), SessionError> {
        let snapshot = self.snapshot.as_ref().ok_or(SessionError::NotLoaded)?;
        if !snapshot.is_participant(self.user_id) {
            return Err(SessionError::NotAParticipant);
        }
        if snapshot.game.status.is_terminal() {
            self.notices.push(Notice::InvalidMove(RulesError::GameOver));
            return Ok(());
        }
        let action = GameAction {
            event_type: "forfeit".to_string(),
            payload: serde_json::Value::Null,
            actor: Some(self.user_id),
            new_status: Some(GameStatus::Cancelled),
            metadata: None,
        };
        match self.store.game_action(self.game_id, action).await {
            Ok(()) => self.refresh().await,
            Err(err) => {
                tracing::warn!(game_id = %self.game_id, %err, "failed to forfeit");
                self.notices.push(Notice::StoreRejected(err.to_string()));
                Ok(())
            }
        }
    }

    /// Whether the computer owes a move: its sentinel holds the turn
    /// pointer, the game is live, and the type has a selector.
    pub fn bot_turn_pending(&self) -> bool {
        let Some(snapshot) = &self.snapshot else {
            return false;
        };
        snapshot.game.status == GameStatus::InProgress
            && snapshot.game.metadata.next_actor() == Some(COMPUTER_USER_ID)
            && selector_for(snapshot.game.game_type).is_some()
    }

    /// Arm exactly one thinking-delay deadline while the bot owes a
    /// move; clear it otherwise. Called on every snapshot install, so a
    /// state change before the deadline re-arms or cancels it.
    fn update_bot_timer(&mut self) {
        self.bot_deadline = if self.bot_turn_pending() {
            Some(Instant::now() + self.bot_delay)
        } else {
            None
        };
    }

    /// Wait out the armed thinking delay and play the computer's move
    /// through the same pipeline as human moves. A change signal
    /// arriving first wins: the session refreshes and the timer is
    /// re-armed against the new state instead.
    pub async fn run_bot_turn(&mut self) -> Result<(), SessionError> {
        let Some(deadline) = self.bot_deadline else {
            return Ok(());
        };
        let wake = {
            let changes = &mut self.changes;
            tokio::select! {
                _ = tokio::time::sleep_until(deadline) => Wake::Timer,
                result = changes.recv() => match result {
                    Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => Wake::Change,
                    Err(broadcast::error::RecvError::Closed) => Wake::Closed,
                },
            }
        };
        match wake {
            Wake::Timer => self.play_bot_move().await,
            Wake::Change => self.refresh().await,
            Wake::Closed => Ok(()),
        }
    }

    async fn play_bot_move(&mut self) -> Result<(), SessionError> {
        self.bot_deadline = None;
        if !self.bot_turn_pending() {
            return Ok(());
        }
        let mv = {
            let snapshot = self.snapshot.as_ref().expect("bot turn implies snapshot");
            let selector =
                selector_for(snapshot.game.game_type).expect("bot turn implies selector");
            selector.select_move(
                &snapshot.game.metadata,
                self.bot_difficulty,
                &mut self.rng,
            )
        };
        match mv {
            Some(mv) => self.submit_as(COMPUTER_USER_ID, mv).await,
            None => {
                // Selector contract says this means no legal move, which a
                // live game should never reach; log and stall, no retry
                tracing::error!(game_id = %self.game_id, "computer selector returned no move");
                self.notices.push(Notice::BotFailed);
                Ok(())
            }
        }
    }

    /// Block until the store signals a change to this game, then
    /// refresh. Other games' signals are ignored.
    pub async fn wait_for_change(&mut self) -> Result<(), SessionError> {
        loop {
            match self.changes.recv().await {
                Ok(id) if id == self.game_id => break,
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(_)) => break,
                Err(broadcast::error::RecvError::Closed) => return Ok(()),
            }
        }
        self.refresh().await
    }

    /// Drive the session until the game ends, playing computer turns as
    /// they come due and waiting on change signals in between. Returns
    /// early if a human move is required.
    pub async fn run_until_blocked(&mut self) -> Result<(), SessionError> {
        loop {
            match self.phase {
                SessionPhase::Terminal => return Ok(()),
                _ if self.bot_turn_pending() => self.run_bot_turn().await?,
                _ => return Ok(()),
            }
        }
    }
}
