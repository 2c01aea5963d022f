//! Chess metadata: a replayable move log plus derived display fields.
//!
//! Legality, check, checkmate, and stalemate all come from the embedded
//! rules library. The library's board is not serializable, so the move
//! log is the replayable source of truth and `fen` is derived from the
//! rebuilt position for display.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One accepted move: squares as (file, rank) from white's view, plus
/// the algebraic notation computed when it was played.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedChessMove {
    pub from: (u8, u8),
    pub to: (u8, u8),
    pub san: String,
}

/// Derived game status, refreshed after every accepted move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChessStatus {
    Active,
    Check,
    Checkmate,
    Stalemate,
    Draw,
}

impl ChessStatus {
    pub fn is_over(&self) -> bool {
        matches!(
            self,
            ChessStatus::Checkmate | ChessStatus::Stalemate | ChessStatus::Draw
        )
    }
}

/// Full Chess game state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChessState {
    /// Accepted moves in order; replaying them rebuilds the position
    pub moves: Vec<RecordedChessMove>,
    /// FEN snapshot of the current position, for display
    pub fen: String,
    pub game_status: ChessStatus,
    /// White seat (the creator); white moves first
    pub player_white: Uuid,
    /// Black seat: a user, the computer sentinel, or empty until joined
    pub player_black: Option<Uuid>,
    pub next_turn: Uuid,
    pub winner: Option<Uuid>,
}

/// FEN of the standard starting position.
pub const INITIAL_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - - 0 1";

impl ChessState {
    pub fn new(player_white: Uuid, player_black: Option<Uuid>) -> Self {
        Self {
            moves: Vec::new(),
            fen: INITIAL_FEN.to_string(),
            game_status: ChessStatus::Active,
            player_white,
            player_black,
            next_turn: player_white,
            winner: None,
        }
    }

    pub fn is_white(&self, user_id: Uuid) -> bool {
        user_id == self.player_white
    }

    pub fn seated(&self, user_id: Uuid) -> bool {
        user_id == self.player_white || self.player_black == Some(user_id)
    }

    pub fn opponent_of(&self, user_id: Uuid) -> Option<Uuid> {
        if user_id == self.player_white {
            self.player_black
        } else if self.player_black == Some(user_id) {
            Some(self.player_white)
        } else {
            None
        }
    }

    /// Fresh game, same seats.
    pub fn rematch_seed(&self) -> Self {
        Self::new(self.player_white, self.player_black)
    }
}
