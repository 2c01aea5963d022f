//! Connect Four data structures.
//!
//! 6x7 grid; a move names a column and the disc falls to the lowest
//! empty row.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Board height.
pub const ROWS: usize = 6;
/// Board width.
pub const COLS: usize = 7;

/// Disc color in Connect Four.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Disc {
    Red,
    Yellow,
}

impl Disc {
    pub fn opponent(&self) -> Self {
        match self {
            Disc::Red => Disc::Yellow,
            Disc::Yellow => Disc::Red,
        }
    }
}

/// Full Connect Four game state. Row 0 is the top of the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectFourState {
    pub board: [[Option<Disc>; COLS]; ROWS],
    /// Red seat (the creator); red moves first
    pub player_red: Uuid,
    /// Yellow seat: a user, the computer sentinel, or empty until joined
    pub player_yellow: Option<Uuid>,
    pub next_turn: Uuid,
    pub winner: Option<Uuid>,
    /// Cells of the winning run, for board highlighting
    pub winning_run: Option<Vec<(usize, usize)>>,
    /// Cell where the last disc landed
    pub last_drop: Option<(usize, usize)>,
}

impl ConnectFourState {
    pub fn new(player_red: Uuid, player_yellow: Option<Uuid>) -> Self {
        Self {
            board: [[None; COLS]; ROWS],
            player_red,
            player_yellow,
            next_turn: player_red,
            winner: None,
            winning_run: None,
            last_drop: None,
        }
    }

    pub fn disc_of(&self, user_id: Uuid) -> Option<Disc> {
        if user_id == self.player_red {
            Some(Disc::Red)
        } else if self.player_yellow == Some(user_id) {
            Some(Disc::Yellow)
        } else {
            None
        }
    }

    pub fn opponent_of(&self, user_id: Uuid) -> Option<Uuid> {
        if user_id == self.player_red {
            self.player_yellow
        } else if self.player_yellow == Some(user_id) {
            Some(self.player_red)
        } else {
            None
        }
    }

    /// Fresh board, same seats.
    pub fn rematch_seed(&self) -> Self {
        Self::new(self.player_red, self.player_yellow)
    }
}
