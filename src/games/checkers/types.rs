//! Checkers data structures.
//!
//! 8x8 board, play on the dark squares only. Dark moves first and
//! advances toward higher rows; light advances toward lower rows.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Board size.
pub const SIZE: usize = 8;

/// Piece color in Checkers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckersColor {
    Dark,
    Light,
}

impl CheckersColor {
    pub fn opponent(&self) -> Self {
        match self {
            CheckersColor::Dark => CheckersColor::Light,
            CheckersColor::Light => CheckersColor::Dark,
        }
    }

    /// Forward row direction for men of this color.
    pub fn forward(&self) -> i32 {
        match self {
            CheckersColor::Dark => 1,
            CheckersColor::Light => -1,
        }
    }

    /// Back rank that promotes a man of this color.
    pub fn crowning_row(&self) -> usize {
        match self {
            CheckersColor::Dark => SIZE - 1,
            CheckersColor::Light => 0,
        }
    }
}

/// One checkers piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckersPiece {
    pub color: CheckersColor,
    pub king: bool,
}

impl CheckersPiece {
    pub fn man(color: CheckersColor) -> Self {
        CheckersPiece { color, king: false }
    }

    /// Algebraic encoding: uppercase for men, lowercase for kings.
    pub fn glyph(&self) -> char {
        match (self.color, self.king) {
            (CheckersColor::Dark, false) => 'D',
            (CheckersColor::Dark, true) => 'd',
            (CheckersColor::Light, false) => 'L',
            (CheckersColor::Light, true) => 'l',
        }
    }
}

/// Full Checkers game state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckersState {
    pub board: [[Option<CheckersPiece>; SIZE]; SIZE],
    /// Dark seat (the creator); dark moves first
    pub player_dark: Uuid,
    /// Light seat: a user, the computer sentinel, or empty until joined
    pub player_light: Option<Uuid>,
    pub next_turn: Uuid,
    pub winner: Option<Uuid>,
    /// Mid multi-jump: the square of the piece that must keep capturing
    pub chain_square: Option<(usize, usize)>,
    /// Plies since the last capture or promotion (draw rule counter)
    pub quiet_plies: u32,
    pub last_move: Option<((usize, usize), (usize, usize))>,
}

impl CheckersState {
    pub fn new(player_dark: Uuid, player_light: Option<Uuid>) -> Self {
        let mut board = [[None; SIZE]; SIZE];
        for row in 0..3 {
            for col in 0..SIZE {
                if (row + col) % 2 == 1 {
                    board[row][col] = Some(CheckersPiece::man(CheckersColor::Dark));
                }
            }
        }
        for row in SIZE - 3..SIZE {
            for col in 0..SIZE {
                if (row + col) % 2 == 1 {
                    board[row][col] = Some(CheckersPiece::man(CheckersColor::Light));
                }
            }
        }
        Self {
            board,
            player_dark,
            player_light,
            next_turn: player_dark,
            winner: None,
            chain_square: None,
            quiet_plies: 0,
            last_move: None,
        }
    }

    pub fn color_of(&self, user_id: Uuid) -> Option<CheckersColor> {
        if user_id == self.player_dark {
            Some(CheckersColor::Dark)
        } else if self.player_light == Some(user_id) {
            Some(CheckersColor::Light)
        } else {
            None
        }
    }

    pub fn seat_of(&self, color: CheckersColor) -> Option<Uuid> {
        match color {
            CheckersColor::Dark => Some(self.player_dark),
            CheckersColor::Light => self.player_light,
        }
    }

    /// Fresh board, same seats.
    pub fn rematch_seed(&self) -> Self {
        Self::new(self.player_dark, self.player_light)
    }
}
