//! Connect Four rules and bot move selection.

use super::{ConnectFourState, Disc, COLS, ROWS};
use crate::games::registry::{MoveSelector, RulesEngine};
use crate::games::{BotDifficulty, GameMetadata, GameMove, MoveOutcome, RulesError, Terminal};
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use uuid::Uuid;

type Board = [[Option<Disc>; COLS]; ROWS];

/// Axes to scan from the just-placed cell: (row_delta, col_delta)
const DIRECTIONS: [(i32, i32); 4] = [
    (0, 1),  // Horizontal
    (1, 0),  // Vertical
    (1, 1),  // Diagonal down-right
    (1, -1), // Diagonal down-left
];

/// Lowest empty row in a column, or None when the column is full.
pub fn landing_row(board: &Board, column: usize) -> Option<usize> {
    (0..ROWS).rev().find(|&row| board[row][column].is_none())
}

/// Cells of a run of 4+ through (row, col), if one exists.
/// Assumes the disc is already placed.
pub fn find_winning_run(board: &Board, row: usize, col: usize) -> Option<Vec<(usize, usize)>> {
    let disc = board[row][col]?;
    for (dr, dc) in DIRECTIONS {
        let mut run = vec![(row, col)];
        collect_direction(board, row, col, dr, dc, disc, &mut run);
        collect_direction(board, row, col, -dr, -dc, disc, &mut run);
        if run.len() >= 4 {
            run.sort_unstable();
            return Some(run);
        }
    }
    None
}

/// Collect contiguous same-color cells in one direction, excluding the
/// center cell.
fn collect_direction(
    board: &Board,
    row: usize,
    col: usize,
    dr: i32,
    dc: i32,
    disc: Disc,
    run: &mut Vec<(usize, usize)>,
) {
    let mut r = row as i32 + dr;
    let mut c = col as i32 + dc;
    while r >= 0 && r < ROWS as i32 && c >= 0 && c < COLS as i32 {
        if board[r as usize][c as usize] == Some(disc) {
            run.push((r as usize, c as usize));
            r += dr;
            c += dc;
        } else {
            break;
        }
    }
}

/// Draw condition: the top row is fully occupied.
pub fn is_board_full(board: &Board) -> bool {
    board[0].iter().all(|cell| cell.is_some())
}

/// Apply one drop. Pure; see the session controller for how this runs
/// both optimistically and authoritatively.
pub fn apply_move(
    state: &ConnectFourState,
    column: usize,
    actor: Uuid,
) -> Result<MoveOutcome, RulesError> {
    if state.winner.is_some() {
        return Err(RulesError::GameOver);
    }
    if column >= COLS {
        return Err(RulesError::OutOfBounds);
    }
    let disc = state.disc_of(actor).ok_or(RulesError::NotYourTurn)?;
    if actor != state.next_turn {
        return Err(RulesError::NotYourTurn);
    }
    let opponent = state.opponent_of(actor).ok_or(RulesError::IllegalMove)?;
    let row = landing_row(&state.board, column).ok_or(RulesError::ColumnFull)?;

    let mut next = state.clone();
    next.board[row][column] = Some(disc);
    next.last_drop = Some((row, column));

    if let Some(run) = find_winning_run(&next.board, row, column) {
        next.winner = Some(actor);
        next.winning_run = Some(run);
        return Ok(MoveOutcome::ended(
            GameMetadata::ConnectFour(next),
            Terminal::win(actor),
        ));
    }
    if is_board_full(&next.board) {
        return Ok(MoveOutcome::ended(
            GameMetadata::ConnectFour(next),
            Terminal::draw(),
        ));
    }

    next.next_turn = opponent;
    Ok(MoveOutcome::ongoing(GameMetadata::ConnectFour(next)))
}

/// Columns that still have room.
fn open_columns(board: &Board) -> Vec<usize> {
    (0..COLS).filter(|&c| board[0][c].is_none()).collect()
}

/// Columns where dropping wins immediately for `disc`.
fn immediate_wins(board: &Board, disc: Disc) -> Vec<usize> {
    let mut board = *board;
    let mut wins = Vec::new();
    for column in open_columns(&board) {
        let row = landing_row(&board, column).expect("open column has room");
        board[row][column] = Some(disc);
        if find_winning_run(&board, row, column).is_some() {
            wins.push(column);
        }
        board[row][column] = None;
    }
    wins
}

// === Position evaluation ===

const SCORE_WIN: i32 = 100_000;
const SCORE_THREE: i32 = 100;
const SCORE_TWO: i32 = 10;
const SCORE_CENTER: i32 = 3;

/// Score a window of 4 cells for `disc`.
fn score_window(window: &[Option<Disc>], disc: Disc) -> i32 {
    let own = window.iter().filter(|&&c| c == Some(disc)).count();
    let empty = window.iter().filter(|&&c| c.is_none()).count();
    let opponent = 4 - own - empty;

    // A blocked window can never complete
    if opponent > 0 {
        return 0;
    }
    match own {
        4 => SCORE_WIN,
        3 => SCORE_THREE,
        2 => SCORE_TWO,
        _ => 0,
    }
}

/// Evaluate the whole board from `bot`'s perspective.
fn evaluate_board(board: &Board, bot: Disc) -> i32 {
    let mut score = 0;

    // Center-column discs open the most lines
    for row in board.iter() {
        if row[COLS / 2] == Some(bot) {
            score += SCORE_CENTER;
        } else if row[COLS / 2] == Some(bot.opponent()) {
            score -= SCORE_CENTER;
        }
    }

    // All windows of 4 along every axis
    for r in 0..ROWS {
        for c in 0..COLS {
            for (dr, dc) in DIRECTIONS {
                let end_r = r as i32 + 3 * dr;
                let end_c = c as i32 + 3 * dc;
                if end_r < 0 || end_r >= ROWS as i32 || end_c < 0 || end_c >= COLS as i32 {
                    continue;
                }
                let window: Vec<Option<Disc>> = (0..4)
                    .map(|i| {
                        board[(r as i32 + i * dr) as usize][(c as i32 + i * dc) as usize]
                    })
                    .collect();
                score += score_window(&window, bot);
                score -= score_window(&window, bot.opponent());
            }
        }
    }
    score
}

/// Minimax with alpha-beta pruning over columns.
fn minimax(
    board: &mut Board,
    bot: Disc,
    to_move: Disc,
    depth: u32,
    mut alpha: i32,
    mut beta: i32,
    last: Option<(usize, usize)>,
) -> i32 {
    if let Some((r, c)) = last {
        if find_winning_run(board, r, c).is_some() {
            // The previous mover just won
            return if to_move == bot {
                -SCORE_WIN - depth as i32
            } else {
                SCORE_WIN + depth as i32
            };
        }
    }
    if is_board_full(board) {
        return 0;
    }
    if depth == 0 {
        return evaluate_board(board, bot);
    }

    let maximizing = to_move == bot;
    let mut best = if maximizing { i32::MIN } else { i32::MAX };
    for column in ordered_columns(board) {
        let row = landing_row(board, column).expect("open column has room");
        board[row][column] = Some(to_move);
        let score = minimax(
            board,
            bot,
            to_move.opponent(),
            depth - 1,
            alpha,
            beta,
            Some((row, column)),
        );
        board[row][column] = None;
        if maximizing {
            best = best.max(score);
            alpha = alpha.max(score);
        } else {
            best = best.min(score);
            beta = beta.min(score);
        }
        if beta <= alpha {
            break;
        }
    }
    best
}

/// Open columns ordered center-out, which tightens pruning.
fn ordered_columns(board: &Board) -> Vec<usize> {
    let mut columns = open_columns(board);
    let center = (COLS / 2) as i32;
    columns.sort_by_key(|&c| (c as i32 - center).abs());
    columns
}

fn search_depth(difficulty: BotDifficulty) -> u32 {
    match difficulty {
        BotDifficulty::Easy => 0,
        BotDifficulty::Medium => 2,
        BotDifficulty::Hard => 6,
    }
}

/// Pick the bot's column. Easy plays randomly; Medium and Hard take
/// immediate wins, block immediate losses, then search.
pub fn find_best_move<R: Rng + ?Sized>(
    state: &ConnectFourState,
    difficulty: BotDifficulty,
    rng: &mut R,
) -> Option<usize> {
    let candidates = open_columns(&state.board);
    if candidates.is_empty() || state.winner.is_some() {
        return None;
    }
    let bot_disc = state.disc_of(state.next_turn)?;

    if difficulty == BotDifficulty::Easy {
        return candidates.choose(rng).copied();
    }

    let wins = immediate_wins(&state.board, bot_disc);
    if let Some(&column) = wins.choose(rng) {
        return Some(column);
    }
    let blocks = immediate_wins(&state.board, bot_disc.opponent());
    if let Some(&column) = blocks.choose(rng) {
        return Some(column);
    }

    let mut board = state.board;
    let depth = search_depth(difficulty);
    let mut best_moves = Vec::new();
    let mut best_score = i32::MIN;
    for column in ordered_columns(&board) {
        let row = landing_row(&board, column).expect("open column has room");
        board[row][column] = Some(bot_disc);
        let score = minimax(
            &mut board,
            bot_disc,
            bot_disc.opponent(),
            depth,
            i32::MIN,
            i32::MAX,
            Some((row, column)),
        );
        board[row][column] = None;
        if score > best_score {
            best_score = score;
            best_moves.clear();
            best_moves.push(column);
        } else if score == best_score {
            best_moves.push(column);
        }
    }
    best_moves.choose(rng).copied()
}

/// Rules engine for [`GameMetadata::ConnectFour`].
pub struct ConnectFourRules;

impl RulesEngine for ConnectFourRules {
    fn apply_move(
        &self,
        metadata: &GameMetadata,
        mv: &GameMove,
        actor: Uuid,
    ) -> Result<MoveOutcome, RulesError> {
        let GameMetadata::ConnectFour(state) = metadata else {
            return Err(RulesError::MetadataMismatch);
        };
        let GameMove::Drop { column } = mv else {
            return Err(RulesError::MoveMismatch);
        };
        apply_move(state, *column, actor)
    }
}

/// Bot move selection for [`GameMetadata::ConnectFour`].
pub struct ConnectFourSelector;

impl MoveSelector for ConnectFourSelector {
    fn select_move(
        &self,
        metadata: &GameMetadata,
        difficulty: BotDifficulty,
        rng: &mut dyn RngCore,
    ) -> Option<GameMove> {
        let GameMetadata::ConnectFour(state) = metadata else {
            return None;
        };
        find_best_move(state, difficulty, rng).map(|column| GameMove::Drop { column })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::COMPUTER_USER_ID;

    fn two_player_state() -> (ConnectFourState, Uuid, Uuid) {
        let red = Uuid::new_v4();
        let yellow = Uuid::new_v4();
        (ConnectFourState::new(red, Some(yellow)), red, yellow)
    }

    fn unwrap_c4(metadata: GameMetadata) -> ConnectFourState {
        match metadata {
            GameMetadata::ConnectFour(state) => state,
            other => panic!("expected connect four metadata, got {:?}", other.game_type()),
        }
    }

    #[test]
    fn test_disc_falls_to_bottom() {
        let (state, red, _) = two_player_state();
        let outcome = apply_move(&state, 3, red).expect("legal drop");
        let next = unwrap_c4(outcome.next);
        assert_eq!(next.board[ROWS - 1][3], Some(Disc::Red));
        assert_eq!(next.last_drop, Some((ROWS - 1, 3)));
    }

    #[test]
    fn test_discs_stack() {
        let (state, red, yellow) = two_player_state();
        let next = unwrap_c4(apply_move(&state, 3, red).expect("legal").next);
        let next = unwrap_c4(apply_move(&next, 3, yellow).expect("legal").next);
        assert_eq!(next.board[ROWS - 1][3], Some(Disc::Red));
        assert_eq!(next.board[ROWS - 2][3], Some(Disc::Yellow));
    }

    #[test]
    fn test_full_column_rejected() {
        let (mut state, red, _) = two_player_state();
        for row in 0..ROWS {
            state.board[row][2] = Some(if row % 2 == 0 { Disc::Red } else { Disc::Yellow });
        }
        assert_eq!(apply_move(&state, 2, red), Err(RulesError::ColumnFull));
    }

    #[test]
    fn test_horizontal_win() {
        let (mut state, red, _) = two_player_state();
        for c in 0..3 {
            state.board[ROWS - 1][c] = Some(Disc::Red);
            state.board[ROWS - 2][c] = Some(Disc::Yellow);
        }
        let outcome = apply_move(&state, 3, red).expect("winning drop");
        let terminal = outcome.terminal.expect("terminal");
        assert_eq!(terminal.winner, Some(red));
        let next = unwrap_c4(outcome.next);
        assert_eq!(
            next.winning_run,
            Some(vec![
                (ROWS - 1, 0),
                (ROWS - 1, 1),
                (ROWS - 1, 2),
                (ROWS - 1, 3)
            ])
        );
    }

    #[test]
    fn test_vertical_win() {
        let (mut state, red, _) = two_player_state();
        for row in (ROWS - 3)..ROWS {
            state.board[row][5] = Some(Disc::Red);
            state.board[row][0] = Some(Disc::Yellow);
        }
        let outcome = apply_move(&state, 5, red).expect("winning drop");
        assert_eq!(outcome.terminal.map(|t| t.winner), Some(Some(red)));
    }

    #[test]
    fn test_diagonal_win() {
        let (mut state, red, _) = two_player_state();
        // Staircase: red on the rising diagonal, yellow filler beneath
        state.board[ROWS - 1][0] = Some(Disc::Red);
        state.board[ROWS - 1][1] = Some(Disc::Yellow);
        state.board[ROWS - 2][1] = Some(Disc::Red);
        state.board[ROWS - 1][2] = Some(Disc::Yellow);
        state.board[ROWS - 2][2] = Some(Disc::Yellow);
        state.board[ROWS - 3][2] = Some(Disc::Red);
        state.board[ROWS - 1][3] = Some(Disc::Yellow);
        state.board[ROWS - 2][3] = Some(Disc::Red);
        state.board[ROWS - 3][3] = Some(Disc::Yellow);
        let outcome = apply_move(&state, 3, red).expect("winning drop");
        assert_eq!(outcome.terminal.map(|t| t.winner), Some(Some(red)));
    }

    #[test]
    fn test_no_win_run_of_three() {
        let (mut state, red, _) = two_player_state();
        state.board[ROWS - 1][0] = Some(Disc::Red);
        state.board[ROWS - 1][1] = Some(Disc::Red);
        let outcome = apply_move(&state, 2, red).expect("legal drop");
        assert!(outcome.terminal.is_none());
    }

    #[test]
    fn test_out_of_turn_rejected() {
        let (state, _, yellow) = two_player_state();
        assert_eq!(apply_move(&state, 0, yellow), Err(RulesError::NotYourTurn));
    }

    #[test]
    fn test_bot_takes_winning_column() {
        let red = Uuid::new_v4();
        let mut state = ConnectFourState::new(red, Some(COMPUTER_USER_ID));
        for row in (ROWS - 3)..ROWS {
            state.board[row][6] = Some(Disc::Yellow);
            state.board[row][0] = Some(Disc::Red);
        }
        state.next_turn = COMPUTER_USER_ID;
        let mut rng = rand::thread_rng();
        let best = find_best_move(&state, BotDifficulty::Hard, &mut rng);
        assert_eq!(best, Some(6), "bot should complete the vertical run");
    }

    #[test]
    fn test_bot_blocks_winning_column() {
        let red = Uuid::new_v4();
        let mut state = ConnectFourState::new(red, Some(COMPUTER_USER_ID));
        for row in (ROWS - 3)..ROWS {
            state.board[row][2] = Some(Disc::Red);
        }
        state.board[ROWS - 1][4] = Some(Disc::Yellow);
        state.next_turn = COMPUTER_USER_ID;
        let mut rng = rand::thread_rng();
        let best = find_best_move(&state, BotDifficulty::Medium, &mut rng);
        assert_eq!(best, Some(2), "bot should block the vertical threat");
    }

    #[test]
    fn test_bot_none_when_board_full() {
        let red = Uuid::new_v4();
        let mut state = ConnectFourState::new(red, Some(COMPUTER_USER_ID));
        for r in 0..ROWS {
            for c in 0..COLS {
                // Column-striped fill with no four in a row anywhere
                let disc = if (c + r / 2) % 2 == 0 { Disc::Red } else { Disc::Yellow };
                state.board[r][c] = Some(disc);
            }
        }
        let mut rng = rand::thread_rng();
        assert_eq!(find_best_move(&state, BotDifficulty::Hard, &mut rng), None);
    }
}
