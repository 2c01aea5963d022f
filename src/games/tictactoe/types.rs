//! Tic-Tac-Toe data structures.
//!
//! 3x3 board, X always moves first.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Board side in Tic-Tac-Toe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub fn opponent(&self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

/// Full Tic-Tac-Toe game state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicTacToeState {
    /// 3x3 board, None = empty
    pub board: [[Option<Mark>; 3]; 3],
    /// X seat (the creator)
    pub player_x: Uuid,
    /// O seat: a user, the computer sentinel, or empty until someone joins
    pub player_o: Option<Uuid>,
    /// Whose turn it is; always a seated player or the computer sentinel
    pub next_turn: Uuid,
    /// Winner, null until the game ends and immutable after
    pub winner: Option<Uuid>,
    /// The completed line, for board highlighting
    pub winning_line: Option<[(usize, usize); 3]>,
    /// Last placed cell
    pub last_move: Option<(usize, usize)>,
}

impl TicTacToeState {
    /// New game. `player_o` may be a second user, the computer sentinel,
    /// or `None` to leave the seat open for a joiner.
    pub fn new(player_x: Uuid, player_o: Option<Uuid>) -> Self {
        Self {
            board: [[None; 3]; 3],
            player_x,
            player_o,
            next_turn: player_x,
            winner: None,
            winning_line: None,
            last_move: None,
        }
    }

    /// The mark a seated user plays, if they are seated.
    pub fn mark_of(&self, user_id: Uuid) -> Option<Mark> {
        if user_id == self.player_x {
            Some(Mark::X)
        } else if self.player_o == Some(user_id) {
            Some(Mark::O)
        } else {
            None
        }
    }

    /// The other seat's occupant, if both seats are filled.
    pub fn opponent_of(&self, user_id: Uuid) -> Option<Uuid> {
        if user_id == self.player_x {
            self.player_o
        } else if self.player_o == Some(user_id) {
            Some(self.player_x)
        } else {
            None
        }
    }

    /// Fresh board, same seats.
    pub fn rematch_seed(&self) -> Self {
        Self::new(self.player_x, self.player_o)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_game_x_moves_first() {
        let x = Uuid::new_v4();
        let o = Uuid::new_v4();
        let state = TicTacToeState::new(x, Some(o));
        assert_eq!(state.next_turn, x);
        assert_eq!(state.mark_of(x), Some(Mark::X));
        assert_eq!(state.mark_of(o), Some(Mark::O));
        assert_eq!(state.mark_of(Uuid::new_v4()), None);
    }

    #[test]
    fn test_opponent_lookup() {
        let x = Uuid::new_v4();
        let o = Uuid::new_v4();
        let state = TicTacToeState::new(x, Some(o));
        assert_eq!(state.opponent_of(x), Some(o));
        assert_eq!(state.opponent_of(o), Some(x));
        assert_eq!(state.opponent_of(Uuid::new_v4()), None);
    }

    #[test]
    fn test_rematch_seed_clears_progress() {
        let x = Uuid::new_v4();
        let o = Uuid::new_v4();
        let mut state = TicTacToeState::new(x, Some(o));
        state.board[1][1] = Some(Mark::X);
        state.winner = Some(x);
        let fresh = state.rematch_seed();
        assert!(fresh.board.iter().flatten().all(|c| c.is_none()));
        assert_eq!(fresh.winner, None);
        assert_eq!(fresh.player_x, x);
        assert_eq!(fresh.player_o, Some(o));
    }
}
