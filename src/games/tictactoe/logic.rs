//! Tic-Tac-Toe rules and bot move selection.

use super::{Mark, TicTacToeState};
use crate::games::registry::{MoveSelector, RulesEngine};
use crate::games::{BotDifficulty, GameMetadata, GameMove, MoveOutcome, RulesError, Terminal};
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use uuid::Uuid;

/// The 8 winning lines: 3 rows, 3 columns, 2 diagonals.
const LINES: [[(usize, usize); 3]; 8] = [
    [(0, 0), (0, 1), (0, 2)],
    [(1, 0), (1, 1), (1, 2)],
    [(2, 0), (2, 1), (2, 2)],
    [(0, 0), (1, 0), (2, 0)],
    [(0, 1), (1, 1), (2, 1)],
    [(0, 2), (1, 2), (2, 2)],
    [(0, 0), (1, 1), (2, 2)],
    [(0, 2), (1, 1), (2, 0)],
];

/// First line with 3 equal non-empty marks, if any.
pub fn find_winning_line(board: &[[Option<Mark>; 3]; 3]) -> Option<(Mark, [(usize, usize); 3])> {
    for line in LINES {
        let [(r0, c0), (r1, c1), (r2, c2)] = line;
        if let Some(mark) = board[r0][c0] {
            if board[r1][c1] == Some(mark) && board[r2][c2] == Some(mark) {
                return Some((mark, line));
            }
        }
    }
    None
}

/// Check if the board is full (draw condition).
pub fn is_board_full(board: &[[Option<Mark>; 3]; 3]) -> bool {
    board.iter().flatten().all(|cell| cell.is_some())
}

/// Apply one placement. Pure: the same inputs always produce the same
/// next state, so the session can run it optimistically and the store
/// write path can run it again without divergence.
pub fn apply_move(
    state: &TicTacToeState,
    row: usize,
    col: usize,
    actor: Uuid,
) -> Result<MoveOutcome, RulesError> {
    if state.winner.is_some() {
        return Err(RulesError::GameOver);
    }
    if row >= 3 || col >= 3 {
        return Err(RulesError::OutOfBounds);
    }
    let mark = state.mark_of(actor).ok_or(RulesError::NotYourTurn)?;
    if actor != state.next_turn {
        return Err(RulesError::NotYourTurn);
    }
    let opponent = state.opponent_of(actor).ok_or(RulesError::IllegalMove)?;
    if state.board[row][col].is_some() {
        return Err(RulesError::Occupied);
    }

    let mut next = state.clone();
    next.board[row][col] = Some(mark);
    next.last_move = Some((row, col));

    if let Some((_, line)) = find_winning_line(&next.board) {
        next.winner = Some(actor);
        next.winning_line = Some(line);
        return Ok(MoveOutcome::ended(
            GameMetadata::TicTacToe(next),
            Terminal::win(actor),
        ));
    }
    if is_board_full(&next.board) {
        return Ok(MoveOutcome::ended(
            GameMetadata::TicTacToe(next),
            Terminal::draw(),
        ));
    }

    next.next_turn = opponent;
    Ok(MoveOutcome::ongoing(GameMetadata::TicTacToe(next)))
}

/// All empty cells.
fn empty_cells(board: &[[Option<Mark>; 3]; 3]) -> Vec<(usize, usize)> {
    let mut cells = Vec::new();
    for (r, row) in board.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            if cell.is_none() {
                cells.push((r, c));
            }
        }
    }
    cells
}

/// Exhaustive minimax score from `to_move`'s perspective relative to
/// `bot`. The 3x3 space is small enough to search completely.
fn minimax(board: &mut [[Option<Mark>; 3]; 3], bot: Mark, to_move: Mark, depth: i32) -> i32 {
    if let Some((mark, _)) = find_winning_line(board) {
        // Prefer quick wins and slow losses
        return if mark == bot { 10 - depth } else { depth - 10 };
    }
    if is_board_full(board) {
        return 0;
    }

    let maximizing = to_move == bot;
    let mut best = if maximizing { i32::MIN } else { i32::MAX };
    for (r, c) in empty_cells(board) {
        board[r][c] = Some(to_move);
        let score = minimax(board, bot, to_move.opponent(), depth + 1);
        board[r][c] = None;
        best = if maximizing {
            best.max(score)
        } else {
            best.min(score)
        };
    }
    best
}

/// Cells that win immediately for `mark`.
fn immediate_wins(board: &[[Option<Mark>; 3]; 3], mark: Mark) -> Vec<(usize, usize)> {
    let mut board = *board;
    let mut wins = Vec::new();
    for (r, c) in empty_cells(&board) {
        board[r][c] = Some(mark);
        if find_winning_line(&board).is_some() {
            wins.push((r, c));
        }
        board[r][c] = None;
    }
    wins
}

/// Pick the bot's cell. Easy plays randomly, Medium takes wins and
/// blocks, Hard searches the full game tree and never loses.
pub fn find_best_move<R: Rng + ?Sized>(
    state: &TicTacToeState,
    difficulty: BotDifficulty,
    rng: &mut R,
) -> Option<(usize, usize)> {
    let candidates = empty_cells(&state.board);
    if candidates.is_empty() || state.winner.is_some() {
        return None;
    }
    let bot_mark = state.mark_of(state.next_turn)?;

    if difficulty == BotDifficulty::Easy {
        return candidates.choose(rng).copied();
    }

    // Take an immediate win, then block the opponent's
    let wins = immediate_wins(&state.board, bot_mark);
    if let Some(&cell) = wins.choose(rng) {
        return Some(cell);
    }
    let blocks = immediate_wins(&state.board, bot_mark.opponent());
    if let Some(&cell) = blocks.choose(rng) {
        return Some(cell);
    }
    if difficulty == BotDifficulty::Medium {
        return candidates.choose(rng).copied();
    }

    // Hard: exhaustive search, random pick among equally good moves
    let mut board = state.board;
    let mut best_moves = Vec::new();
    let mut best_score = i32::MIN;
    for (r, c) in candidates {
        board[r][c] = Some(bot_mark);
        let score = minimax(&mut board, bot_mark, bot_mark.opponent(), 1);
        board[r][c] = None;
        if score > best_score {
            best_score = score;
            best_moves.clear();
            best_moves.push((r, c));
        } else if score == best_score {
            best_moves.push((r, c));
        }
    }
    best_moves.choose(rng).copied()
}

/// Rules engine for [`GameMetadata::TicTacToe`].
pub struct TicTacToeRules;

impl RulesEngine for TicTacToeRules {
    fn apply_move(
        &self,
        metadata: &GameMetadata,
        mv: &GameMove,
        actor: Uuid,
    ) -> Result<MoveOutcome, RulesError> {
        let GameMetadata::TicTacToe(state) = metadata else {
            return Err(RulesError::MetadataMismatch);
        };
        let GameMove::Place { row, col } = mv else {
            return Err(RulesError::MoveMismatch);
        };
        apply_move(state, *row, *col, actor)
    }
}

/// Bot move selection for [`GameMetadata::TicTacToe`].
pub struct TicTacToeSelector;

impl MoveSelector for TicTacToeSelector {
    fn select_move(
        &self,
        metadata: &GameMetadata,
        difficulty: BotDifficulty,
        rng: &mut dyn RngCore,
    ) -> Option<GameMove> {
        let GameMetadata::TicTacToe(state) = metadata else {
            return None;
        };
        find_best_move(state, difficulty, rng).map(|(row, col)| GameMove::Place { row, col })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::COMPUTER_USER_ID;

    fn two_player_state() -> (TicTacToeState, Uuid, Uuid) {
        let x = Uuid::new_v4();
        let o = Uuid::new_v4();
        (TicTacToeState::new(x, Some(o)), x, o)
    }

    fn unwrap_ttt(metadata: GameMetadata) -> TicTacToeState {
        match metadata {
            GameMetadata::TicTacToe(state) => state,
            other => panic!("expected tictactoe metadata, got {:?}", other.game_type()),
        }
    }

    #[test]
    fn test_row_win_detected() {
        let mut board = [[None; 3]; 3];
        board[0] = [Some(Mark::X), Some(Mark::X), Some(Mark::X)];
        let (mark, line) = find_winning_line(&board).expect("row win");
        assert_eq!(mark, Mark::X);
        assert_eq!(line, [(0, 0), (0, 1), (0, 2)]);
    }

    #[test]
    fn test_diagonal_win_detected() {
        let mut board = [[None; 3]; 3];
        board[0][2] = Some(Mark::O);
        board[1][1] = Some(Mark::O);
        board[2][0] = Some(Mark::O);
        let (mark, _) = find_winning_line(&board).expect("diagonal win");
        assert_eq!(mark, Mark::O);
    }

    #[test]
    fn test_no_false_positive() {
        let mut board = [[None; 3]; 3];
        board[0][0] = Some(Mark::X);
        board[0][1] = Some(Mark::O);
        board[0][2] = Some(Mark::X);
        assert!(find_winning_line(&board).is_none());
    }

    #[test]
    fn test_turn_alternates() {
        let (state, x, o) = two_player_state();
        let outcome = apply_move(&state, 0, 0, x).expect("legal move");
        let next = unwrap_ttt(outcome.next);
        assert_eq!(next.next_turn, o);
        assert_eq!(next.board[0][0], Some(Mark::X));
    }

    #[test]
    fn test_rejects_out_of_turn() {
        let (state, _, o) = two_player_state();
        assert_eq!(apply_move(&state, 0, 0, o), Err(RulesError::NotYourTurn));
    }

    #[test]
    fn test_rejects_occupied_cell() {
        let (state, x, o) = two_player_state();
        let outcome = apply_move(&state, 1, 1, x).expect("legal move");
        let next = unwrap_ttt(outcome.next);
        assert_eq!(apply_move(&next, 1, 1, o), Err(RulesError::Occupied));
    }

    #[test]
    fn test_rejects_non_participant() {
        let (state, _, _) = two_player_state();
        let stranger = Uuid::new_v4();
        assert_eq!(
            apply_move(&state, 0, 0, stranger),
            Err(RulesError::NotYourTurn)
        );
    }

    #[test]
    fn test_win_sets_winner_and_line() {
        let (mut state, x, _) = two_player_state();
        state.board[0][0] = Some(Mark::X);
        state.board[0][1] = Some(Mark::X);
        state.board[1][0] = Some(Mark::O);
        state.board[1][1] = Some(Mark::O);
        let outcome = apply_move(&state, 0, 2, x).expect("winning move");
        let terminal = outcome.terminal.expect("terminal");
        assert_eq!(terminal.winner, Some(x));
        let next = unwrap_ttt(outcome.next);
        assert_eq!(next.winner, Some(x));
        assert_eq!(next.winning_line, Some([(0, 0), (0, 1), (0, 2)]));
    }

    #[test]
    fn test_no_move_after_game_over() {
        let (mut state, _, o) = two_player_state();
        state.winner = Some(state.player_x);
        state.next_turn = o;
        assert_eq!(apply_move(&state, 2, 2, o), Err(RulesError::GameOver));
    }

    #[test]
    fn test_purity_same_inputs_same_outputs() {
        let (state, x, _) = two_player_state();
        let a = apply_move(&state, 0, 0, x).expect("legal");
        let b = apply_move(&state, 0, 0, x).expect("legal");
        assert_eq!(a, b);
    }

    #[test]
    fn test_bot_takes_winning_move() {
        let x = Uuid::new_v4();
        let mut state = TicTacToeState::new(x, Some(COMPUTER_USER_ID));
        state.board[1][0] = Some(Mark::O);
        state.board[1][1] = Some(Mark::O);
        state.board[0][0] = Some(Mark::X);
        state.board[0][1] = Some(Mark::X);
        state.board[2][2] = Some(Mark::X);
        state.next_turn = COMPUTER_USER_ID;
        let mut rng = rand::thread_rng();
        let best = find_best_move(&state, BotDifficulty::Hard, &mut rng);
        assert_eq!(best, Some((1, 2)), "bot should complete its row");
    }

    #[test]
    fn test_bot_blocks_opponent_win() {
        let x = Uuid::new_v4();
        let mut state = TicTacToeState::new(x, Some(COMPUTER_USER_ID));
        state.board[0][0] = Some(Mark::X);
        state.board[0][1] = Some(Mark::X);
        state.board[1][1] = Some(Mark::O);
        state.next_turn = COMPUTER_USER_ID;
        let mut rng = rand::thread_rng();
        let best = find_best_move(&state, BotDifficulty::Medium, &mut rng);
        assert_eq!(best, Some((0, 2)), "bot should block the open row");
    }

    #[test]
    fn test_bot_none_on_full_board() {
        let x = Uuid::new_v4();
        let mut state = TicTacToeState::new(x, Some(COMPUTER_USER_ID));
        for r in 0..3 {
            for c in 0..3 {
                state.board[r][c] = Some(if (r + c) % 2 == 0 { Mark::X } else { Mark::O });
            }
        }
        let mut rng = rand::thread_rng();
        assert_eq!(find_best_move(&state, BotDifficulty::Hard, &mut rng), None);
    }
}
