//! Checkers rules and bot move selection.
//!
//! Standard forced-capture rules: when any jump is available only jumps
//! are legal, and a multi-jump chain is submitted one step at a time;
//! the turn does not pass while the capturing piece can keep jumping.
//! Promotion on the back rank ends a chain.

use super::{CheckersColor, CheckersPiece, CheckersState, SIZE};
use crate::games::registry::{MoveSelector, RulesEngine};
use crate::games::{
    BotDifficulty, GameMetadata, GameMove, MoveOutcome, RulesError, Terminal, TerminalKind,
};
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use uuid::Uuid;

type Board = [[Option<CheckersPiece>; SIZE]; SIZE];

/// Plies without a capture or promotion before the game is drawn
/// (the 40-move convention, counted in half-moves).
pub const QUIET_PLY_DRAW: u32 = 80;

const DIAGONALS: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

fn in_bounds(r: i32, c: i32) -> bool {
    r >= 0 && r < SIZE as i32 && c >= 0 && c < SIZE as i32
}

/// Diagonal directions a piece may move along.
fn directions(piece: CheckersPiece) -> Vec<(i32, i32)> {
    if piece.king {
        DIAGONALS.to_vec()
    } else {
        let f = piece.color.forward();
        vec![(f, 1), (f, -1)]
    }
}

/// Non-capturing steps available to the piece at (r, c).
fn simple_moves_from(board: &Board, r: usize, c: usize) -> Vec<((usize, usize), (usize, usize))> {
    let Some(piece) = board[r][c] else {
        return Vec::new();
    };
    let mut moves = Vec::new();
    for (dr, dc) in directions(piece) {
        let (tr, tc) = (r as i32 + dr, c as i32 + dc);
        if in_bounds(tr, tc) && board[tr as usize][tc as usize].is_none() {
            moves.push(((r, c), (tr as usize, tc as usize)));
        }
    }
    moves
}

/// Jumps available to the piece at (r, c).
fn jumps_from(board: &Board, r: usize, c: usize) -> Vec<((usize, usize), (usize, usize))> {
    let Some(piece) = board[r][c] else {
        return Vec::new();
    };
    let mut jumps = Vec::new();
    for (dr, dc) in directions(piece) {
        let (mr, mc) = (r as i32 + dr, c as i32 + dc);
        let (tr, tc) = (r as i32 + 2 * dr, c as i32 + 2 * dc);
        if !in_bounds(tr, tc) || !in_bounds(mr, mc) {
            continue;
        }
        let over = board[mr as usize][mc as usize];
        let landing = board[tr as usize][tc as usize];
        if landing.is_none() && matches!(over, Some(p) if p.color == piece.color.opponent()) {
            jumps.push(((r, c), (tr as usize, tc as usize)));
        }
    }
    jumps
}

/// All legal moves for `color`, honoring forced capture and a pending
/// capture chain.
pub fn legal_moves(
    board: &Board,
    color: CheckersColor,
    chain_square: Option<(usize, usize)>,
) -> Vec<((usize, usize), (usize, usize))> {
    // Mid-chain only the chained piece may act, and only by jumping
    if let Some((r, c)) = chain_square {
        return jumps_from(board, r, c);
    }

    let mut jumps = Vec::new();
    let mut simple = Vec::new();
    for r in 0..SIZE {
        for c in 0..SIZE {
            if matches!(board[r][c], Some(p) if p.color == color) {
                jumps.extend(jumps_from(board, r, c));
                simple.extend(simple_moves_from(board, r, c));
            }
        }
    }
    if jumps.is_empty() {
        simple
    } else {
        jumps
    }
}

/// Board-level effect of one step or jump.
struct StepEffect {
    captured: bool,
    promoted: bool,
    /// The chain continues: same mover, same piece, must jump again
    chain: Option<(usize, usize)>,
}

/// Apply a legal step to the board in place.
fn apply_step(board: &mut Board, from: (usize, usize), to: (usize, usize)) -> StepEffect {
    let mut piece = board[from.0][from.1].take().expect("validated source piece");
    let captured = from.0.abs_diff(to.0) == 2;
    if captured {
        let mid = ((from.0 + to.0) / 2, (from.1 + to.1) / 2);
        board[mid.0][mid.1] = None;
    }
    let promoted = !piece.king && to.0 == piece.color.crowning_row();
    if promoted {
        piece.king = true;
    }
    board[to.0][to.1] = Some(piece);

    // Promotion ends a chain; otherwise a capture continues while the
    // same piece still has a jump
    let chain = if captured && !promoted && !jumps_from(board, to.0, to.1).is_empty() {
        Some(to)
    } else {
        None
    };
    StepEffect {
        captured,
        promoted,
        chain,
    }
}

fn side_has_pieces(board: &Board, color: CheckersColor) -> bool {
    board
        .iter()
        .flatten()
        .any(|p| matches!(p, Some(p) if p.color == color))
}

/// Apply one submitted step. Pure; chains keep `next_turn` on the mover
/// until the capturing piece runs out of jumps.
pub fn apply_move(
    state: &CheckersState,
    from: (usize, usize),
    to: (usize, usize),
    actor: Uuid,
) -> Result<MoveOutcome, RulesError> {
    if state.winner.is_some() {
        return Err(RulesError::GameOver);
    }
    if from.0 >= SIZE || from.1 >= SIZE || to.0 >= SIZE || to.1 >= SIZE {
        return Err(RulesError::OutOfBounds);
    }
    let color = state.color_of(actor).ok_or(RulesError::NotYourTurn)?;
    if actor != state.next_turn {
        return Err(RulesError::NotYourTurn);
    }
    let opponent_seat = state
        .seat_of(color.opponent())
        .ok_or(RulesError::IllegalMove)?;
    if !matches!(state.board[from.0][from.1], Some(p) if p.color == color) {
        return Err(RulesError::NotYourPiece);
    }

    let legal = legal_moves(&state.board, color, state.chain_square);
    if !legal.contains(&(from, to)) {
        // Distinguish "you must capture" from a plainly bad step
        let is_simple = from.0.abs_diff(to.0) == 1;
        let any_jump = legal.iter().any(|(f, t)| f.0.abs_diff(t.0) == 2);
        if is_simple && any_jump {
            return Err(RulesError::MustCapture);
        }
        return Err(RulesError::IllegalMove);
    }

    let mut next = state.clone();
    let effect = apply_step(&mut next.board, from, to);
    next.last_move = Some((from, to));
    if effect.captured || effect.promoted {
        next.quiet_plies = 0;
    } else {
        next.quiet_plies += 1;
    }

    if let Some(square) = effect.chain {
        // Same player moves again; the chained piece is pinned
        next.chain_square = Some(square);
        return Ok(MoveOutcome::ongoing(GameMetadata::Checkers(next)));
    }
    next.chain_square = None;

    // Opponent loses when wiped out or left without a move
    let opponent = color.opponent();
    if !side_has_pieces(&next.board, opponent)
        || legal_moves(&next.board, opponent, None).is_empty()
    {
        next.winner = Some(actor);
        return Ok(MoveOutcome::ended(
            GameMetadata::Checkers(next),
            Terminal::win(actor),
        ));
    }
    if next.quiet_plies >= QUIET_PLY_DRAW {
        return Ok(MoveOutcome::ended(
            GameMetadata::Checkers(next),
            Terminal {
                winner: None,
                kind: TerminalKind::Draw,
            },
        ));
    }

    next.next_turn = opponent_seat;
    Ok(MoveOutcome::ongoing(GameMetadata::Checkers(next)))
}

// === Search ===

const MAN_VALUE: i32 = 100;
const KING_VALUE: i32 = 160;
const ADVANCE_BONUS: i32 = 2;

/// Material and advancement, from `bot`'s perspective.
fn evaluate_board(board: &Board, bot: CheckersColor) -> i32 {
    let mut score = 0;
    for (r, row) in board.iter().enumerate() {
        for piece in row.iter().flatten() {
            let mut value = if piece.king { KING_VALUE } else { MAN_VALUE };
            if !piece.king {
                // Reward men for closing in on the crowning row
                let advance = match piece.color {
                    CheckersColor::Dark => r as i32,
                    CheckersColor::Light => (SIZE - 1 - r) as i32,
                };
                value += advance * ADVANCE_BONUS;
            }
            if piece.color == bot {
                score += value;
            } else {
                score -= value;
            }
        }
    }
    score
}

/// Alpha-beta over (board, mover, chain) positions. Chain continuations
/// do not flip the mover and do not consume depth.
#[allow(clippy::too_many_arguments)]
fn minimax(
    board: &Board,
    bot: CheckersColor,
    to_move: CheckersColor,
    chain: Option<(usize, usize)>,
    depth: u32,
    mut alpha: i32,
    mut beta: i32,
) -> i32 {
    let moves = legal_moves(board, to_move, chain);
    if moves.is_empty() {
        // Mover is stuck: loss for the side to move
        return if to_move == bot {
            -10_000 - depth as i32
        } else {
            10_000 + depth as i32
        };
    }
    if depth == 0 {
        return evaluate_board(board, bot);
    }

    let maximizing = to_move == bot;
    let mut best = if maximizing { i32::MIN } else { i32::MAX };
    for (from, to) in moves {
        let mut next_board = *board;
        let effect = apply_step(&mut next_board, from, to);
        let score = if effect.chain.is_some() {
            minimax(&next_board, bot, to_move, effect.chain, depth, alpha, beta)
        } else {
            minimax(
                &next_board,
                bot,
                to_move.opponent(),
                None,
                depth - 1,
                alpha,
                beta,
            )
        };
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

fn search_depth(difficulty: BotDifficulty) -> u32 {
    match difficulty {
        BotDifficulty::Easy => 0,
        BotDifficulty::Medium => 2,
        BotDifficulty::Hard => 6,
    }
}

/// Pick the bot's step. Legality already forces captures; Hard searches
/// ahead, the others play among the legal moves directly.
pub fn find_best_move<R: Rng + ?Sized>(
    state: &CheckersState,
    difficulty: BotDifficulty,
    rng: &mut R,
) -> Option<((usize, usize), (usize, usize))> {
    if state.winner.is_some() {
        return None;
    }
    let bot_color = state.color_of(state.next_turn)?;
    let moves = legal_moves(&state.board, bot_color, state.chain_square);
    if moves.is_empty() {
        return None;
    }
    if difficulty == BotDifficulty::Easy {
        return moves.choose(rng).copied();
    }

    let depth = search_depth(difficulty);
    let mut best_moves = Vec::new();
    let mut best_score = i32::MIN;
    for (from, to) in moves {
        let mut next_board = state.board;
        let effect = apply_step(&mut next_board, from, to);
        let score = if effect.chain.is_some() {
            minimax(
                &next_board,
                bot_color,
                bot_color,
                effect.chain,
                depth,
                i32::MIN,
                i32::MAX,
            )
        } else {
            minimax(
                &next_board,
                bot_color,
                bot_color.opponent(),
                None,
                depth,
                i32::MIN,
                i32::MAX,
            )
        };
        if score > best_score {
            best_score = score;
            best_moves.clear();
            best_moves.push((from, to));
        } else if score == best_score {
            best_moves.push((from, to));
        }
    }
    best_moves.choose(rng).copied()
}

/// Rules engine for [`GameMetadata::Checkers`].
pub struct CheckersRules;

impl RulesEngine for CheckersRules {
    fn apply_move(
        &self,
        metadata: &GameMetadata,
        mv: &GameMove,
        actor: Uuid,
    ) -> Result<MoveOutcome, RulesError> {
        let GameMetadata::Checkers(state) = metadata else {
            return Err(RulesError::MetadataMismatch);
        };
        let GameMove::Slide { from, to } = mv else {
            return Err(RulesError::MoveMismatch);
        };
        apply_move(state, *from, *to, actor)
    }
}

/// Bot move selection for [`GameMetadata::Checkers`].
pub struct CheckersSelector;

impl MoveSelector for CheckersSelector {
    fn select_move(
        &self,
        metadata: &GameMetadata,
        difficulty: BotDifficulty,
        rng: &mut dyn RngCore,
    ) -> Option<GameMove> {
        let GameMetadata::Checkers(state) = metadata else {
            return None;
        };
        find_best_move(state, difficulty, rng).map(|(from, to)| GameMove::Slide { from, to })
    }
}
