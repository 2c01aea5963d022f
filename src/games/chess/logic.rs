//! Chess rules: move legality and termination via the embedded rules
//! library, plus FEN/status derivation into the shared metadata shape.

use super::types::{ChessState, ChessStatus, RecordedChessMove};
use crate::games::registry::{MoveSelector, RulesEngine};
use crate::games::{
    BotDifficulty, GameMetadata, GameMove, MoveOutcome, RulesError, Terminal, TerminalKind,
};
use chess_engine::{Color, Evaluate, Move, Position};
use rand::{Rng, RngCore};
use uuid::Uuid;

/// Piece kind for the display grid. The library board itself is not
/// serializable, so FEN and check detection run over this snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PieceKind {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct GridPiece {
    kind: PieceKind,
    white: bool,
}

/// grid[rank][file], rank 0 = white's back rank.
type Grid = [[Option<GridPiece>; 8]; 8];

/// Scan the library board into a plain grid.
fn snapshot_grid(board: &chess_engine::Board) -> Grid {
    let mut grid = [[None; 8]; 8];
    for rank in 0..8 {
        for file in 0..8 {
            let pos = Position::new(rank as i32, file as i32);
            if let Some(piece) = board.get_piece(pos) {
                let kind = if piece.is_king() {
                    PieceKind::King
                } else if piece.is_queen() {
                    PieceKind::Queen
                } else if piece.is_rook() {
                    PieceKind::Rook
                } else if piece.is_bishop() {
                    PieceKind::Bishop
                } else if piece.is_knight() {
                    PieceKind::Knight
                } else {
                    PieceKind::Pawn
                };
                grid[rank][file] = Some(GridPiece {
                    kind,
                    white: piece.get_color() == Color::White,
                });
            }
        }
    }
    grid
}

/// Apply a move on the display grid. Used only when the library reports
/// a terminal result and hands back no board: the final position still
/// needs a FEN.
fn grid_apply(grid: &mut Grid, from: (u8, u8), to: (u8, u8)) {
    let (ff, fr) = (from.0 as usize, from.1 as usize);
    let (tf, tr) = (to.0 as usize, to.1 as usize);
    let Some(mut piece) = grid[fr][ff].take() else {
        return;
    };
    // En passant: a pawn landing diagonally on an empty square takes
    // the pawn it passed
    if piece.kind == PieceKind::Pawn && ff != tf && grid[tr][tf].is_none() {
        grid[fr][tf] = None;
    }
    // Castling: the king's two-square move carries the rook over
    if piece.kind == PieceKind::King && ff.abs_diff(tf) == 2 {
        if tf > ff {
            let rook = grid[fr][7].take();
            grid[fr][5] = rook;
        } else {
            let rook = grid[fr][0].take();
            grid[fr][3] = rook;
        }
    }
    if piece.kind == PieceKind::Pawn && (tr == 7 || tr == 0) {
        piece.kind = PieceKind::Queen;
    }
    grid[tr][tf] = Some(piece);
}

fn glyph(piece: GridPiece) -> char {
    let c = match piece.kind {
        PieceKind::King => 'k',
        PieceKind::Queen => 'q',
        PieceKind::Rook => 'r',
        PieceKind::Bishop => 'b',
        PieceKind::Knight => 'n',
        PieceKind::Pawn => 'p',
    };
    if piece.white {
        c.to_ascii_uppercase()
    } else {
        c
    }
}

/// Write a display FEN for the grid. Castling and en-passant fields are
/// not tracked here and stay "-".
fn write_fen(grid: &Grid, white_to_move: bool, fullmove: usize) -> String {
    let mut fen = String::new();
    for rank in (0..8).rev() {
        let mut empty = 0;
        for file in 0..8 {
            match grid[rank][file] {
                Some(piece) => {
                    if empty > 0 {
                        fen.push(char::from_digit(empty, 10).expect("run <= 8"));
                        empty = 0;
                    }
                    fen.push(glyph(piece));
                }
                None => empty += 1,
            }
        }
        if empty > 0 {
            fen.push(char::from_digit(empty, 10).expect("run <= 8"));
        }
        if rank > 0 {
            fen.push('/');
        }
    }
    let side = if white_to_move { 'w' } else { 'b' };
    fen.push_str(&format!(" {} - - 0 {}", side, fullmove));
    fen
}

const KNIGHT_OFFSETS: [(i32, i32); 8] = [
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
];
const ORTHOGONALS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const DIAGONALS: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

fn on_grid(rank: i32, file: i32) -> bool {
    (0..8).contains(&rank) && (0..8).contains(&file)
}

/// Is the king of the given color attacked? Feeds the derived `Check`
/// status only; legality always comes from the rules library.
fn in_check(grid: &Grid, white: bool) -> bool {
    let Some((kr, kf)) = (0..8).flat_map(|r| (0..8).map(move |f| (r, f))).find(|&(r, f)| {
        grid[r][f]
            == Some(GridPiece {
                kind: PieceKind::King,
                white,
            })
    }) else {
        return false;
    };
    let (kr, kf) = (kr as i32, kf as i32);
    let enemy = |kind: PieceKind, r: i32, f: i32| {
        on_grid(r, f)
            && grid[r as usize][f as usize]
                == Some(GridPiece {
                    kind,
                    white: !white,
                })
    };

    // Pawns attack one rank toward the enemy side
    let pawn_rank = if white { kr + 1 } else { kr - 1 };
    if enemy(PieceKind::Pawn, pawn_rank, kf - 1) || enemy(PieceKind::Pawn, pawn_rank, kf + 1) {
        return true;
    }
    for (dr, df) in KNIGHT_OFFSETS {
        if enemy(PieceKind::Knight, kr + dr, kf + df) {
            return true;
        }
    }
    for dr in -1..=1 {
        for df in -1..=1 {
            if (dr != 0 || df != 0) && enemy(PieceKind::King, kr + dr, kf + df) {
                return true;
            }
        }
    }
    for (rays, kinds) in [
        (ORTHOGONALS, [PieceKind::Rook, PieceKind::Queen]),
        (DIAGONALS, [PieceKind::Bishop, PieceKind::Queen]),
    ] {
        for (dr, df) in rays {
            let (mut r, mut f) = (kr + dr, kf + df);
            while on_grid(r, f) {
                if let Some(piece) = grid[r as usize][f as usize] {
                    if piece.white != white && kinds.contains(&piece.kind) {
                        return true;
                    }
                    break;
                }
                r += dr;
                f += df;
            }
        }
    }
    false
}

/// Find the library move matching a from/to submission, if it is legal.
/// Castling is submitted as the king's two-square move.
fn engine_move_for(board: &chess_engine::Board, from: (u8, u8), to: (u8, u8)) -> Option<Move> {
    let from_pos = Position::new(from.1 as i32, from.0 as i32);
    let to_pos = Position::new(to.1 as i32, to.0 as i32);
    let from_is_king = board.get_piece(from_pos).map(|p| p.is_king()).unwrap_or(false);

    for m in board.get_legal_moves() {
        match m {
            Move::Piece(f, t) => {
                if f == from_pos && t == to_pos {
                    return Some(m);
                }
            }
            Move::KingSideCastle => {
                if from_is_king && to.1 == from.1 && to.0 == from.0.saturating_add(2) {
                    return Some(m);
                }
            }
            Move::QueenSideCastle => {
                if from_is_king && to.1 == from.1 && from.0 >= 2 && to.0 == from.0 - 2 {
                    return Some(m);
                }
            }
            Move::Resign => {}
        }
    }
    None
}

/// Rebuild the position by replaying the accepted move log from the
/// starting position. Only non-terminal histories replay; terminal
/// games never reach the engine again.
fn replay(moves: &[RecordedChessMove]) -> Result<chess_engine::Board, RulesError> {
    let mut board = chess_engine::Board::default();
    for recorded in moves {
        let mv =
            engine_move_for(&board, recorded.from, recorded.to).ok_or(RulesError::IllegalMove)?;
        match board.play_move(mv) {
            chess_engine::GameResult::Continuing(next) => board = next,
            _ => return Err(RulesError::GameOver),
        }
    }
    Ok(board)
}

/// Generate algebraic notation for a move on the given board.
fn move_to_algebraic(board: &chess_engine::Board, chess_move: &Move, is_capture: bool) -> String {
    match chess_move {
        Move::Piece(from, to) => {
            let piece_char = board
                .get_piece(*from)
                .map(|p| {
                    if p.is_king() {
                        "K"
                    } else if p.is_queen() {
                        "Q"
                    } else if p.is_rook() {
                        "R"
                    } else if p.is_bishop() {
                        "B"
                    } else if p.is_knight() {
                        "N"
                    } else {
                        ""
                    }
                })
                .unwrap_or("");

            let to_file = (b'a' + to.get_col() as u8) as char;
            let to_rank = (b'1' + to.get_row() as u8) as char;
            let capture = if is_capture { "x" } else { "" };

            if piece_char.is_empty() {
                // Pawn move - include from file only on captures
                if is_capture {
                    let from_file = (b'a' + from.get_col() as u8) as char;
                    format!("{}x{}{}", from_file, to_file, to_rank)
                } else {
                    format!("{}{}", to_file, to_rank)
                }
            } else {
                format!("{}{}{}{}", piece_char, capture, to_file, to_rank)
            }
        }
        Move::KingSideCastle => "O-O".to_string(),
        Move::QueenSideCastle => "O-O-O".to_string(),
        Move::Resign => "resigns".to_string(),
    }
}

/// Apply one submitted move. Pure given the metadata: the position is
/// rebuilt from the move log on every call.
pub fn apply_move(
    state: &ChessState,
    from: (u8, u8),
    to: (u8, u8),
    actor: Uuid,
) -> Result<MoveOutcome, RulesError> {
    if state.winner.is_some() || state.game_status.is_over() {
        return Err(RulesError::GameOver);
    }
    if from.0 >= 8 || from.1 >= 8 || to.0 >= 8 || to.1 >= 8 {
        return Err(RulesError::OutOfBounds);
    }
    if !state.seated(actor) {
        return Err(RulesError::NotYourTurn);
    }
    if actor != state.next_turn {
        return Err(RulesError::NotYourTurn);
    }
    let opponent = state.opponent_of(actor).ok_or(RulesError::IllegalMove)?;

    let board = replay(&state.moves)?;
    let actor_white = state.is_white(actor);
    if actor_white != (board.get_turn_color() == Color::White) {
        // Turn pointer and move log disagree; refuse to guess
        return Err(RulesError::IllegalMove);
    }

    let mv = engine_move_for(&board, from, to).ok_or(RulesError::IllegalMove)?;
    let to_pos = Position::new(to.1 as i32, to.0 as i32);
    let is_capture = board.get_piece(to_pos).is_some();
    let san = move_to_algebraic(&board, &mv, is_capture);

    let mut next = state.clone();
    next.moves.push(RecordedChessMove { from, to, san });
    let fullmove = next.moves.len() / 2 + 1;

    match board.play_move(mv) {
        chess_engine::GameResult::Continuing(new_board) => {
            let grid = snapshot_grid(&new_board);
            next.game_status = if in_check(&grid, !actor_white) {
                ChessStatus::Check
            } else {
                ChessStatus::Active
            };
            next.fen = write_fen(&grid, !actor_white, fullmove);
            next.next_turn = opponent;
            Ok(MoveOutcome::ongoing(GameMetadata::Chess(next)))
        }
        chess_engine::GameResult::Victory(_) => {
            let mut grid = snapshot_grid(&board);
            grid_apply(&mut grid, from, to);
            next.game_status = ChessStatus::Checkmate;
            next.winner = Some(actor);
            next.fen = write_fen(&grid, !actor_white, fullmove);
            Ok(MoveOutcome::ended(
                GameMetadata::Chess(next),
                Terminal {
                    winner: Some(actor),
                    kind: TerminalKind::Checkmate,
                },
            ))
        }
        chess_engine::GameResult::Stalemate => {
            let mut grid = snapshot_grid(&board);
            grid_apply(&mut grid, from, to);
            next.game_status = ChessStatus::Stalemate;
            next.fen = write_fen(&grid, !actor_white, fullmove);
            Ok(MoveOutcome::ended(
                GameMetadata::Chess(next),
                Terminal {
                    winner: None,
                    kind: TerminalKind::Stalemate,
                },
            ))
        }
        chess_engine::GameResult::IllegalMove(_) => Err(RulesError::IllegalMove),
    }
}

fn search_depth(difficulty: BotDifficulty) -> i32 {
    match difficulty {
        BotDifficulty::Easy => 1,
        BotDifficulty::Medium => 2,
        BotDifficulty::Hard => 3,
    }
}

fn random_move_chance(difficulty: BotDifficulty) -> f64 {
    match difficulty {
        BotDifficulty::Easy => 0.5,
        _ => 0.0,
    }
}

/// Extract from/to squares for a library move, resolving castle squares
/// by the mover's color.
fn move_squares(m: &Move, mover_white: bool) -> Option<((u8, u8), (u8, u8))> {
    match m {
        Move::Piece(from, to) => Some((
            (from.get_col() as u8, from.get_row() as u8),
            (to.get_col() as u8, to.get_row() as u8),
        )),
        Move::KingSideCastle => {
            let rank = if mover_white { 0 } else { 7 };
            Some(((4, rank), (6, rank)))
        }
        Move::QueenSideCastle => {
            let rank = if mover_white { 0 } else { 7 };
            Some(((4, rank), (2, rank)))
        }
        Move::Resign => None,
    }
}

/// Pick the bot's move with difficulty-based weakening: Easy mixes in
/// random legal moves, higher levels search deeper.
pub fn find_best_move<R: Rng + ?Sized>(
    state: &ChessState,
    difficulty: BotDifficulty,
    rng: &mut R,
) -> Option<((u8, u8), (u8, u8))> {
    if state.winner.is_some() || state.game_status.is_over() {
        return None;
    }
    let board = replay(&state.moves).ok()?;
    let legal_moves = board.get_legal_moves();
    if legal_moves.is_empty() {
        return None;
    }
    let mover_white = board.get_turn_color() == Color::White;

    if rng.gen::<f64>() < random_move_chance(difficulty) {
        let idx = rng.gen_range(0..legal_moves.len());
        return move_squares(&legal_moves[idx], mover_white);
    }
    let (best_move, _, _) = board.get_best_next_move(search_depth(difficulty));
    move_squares(&best_move, mover_white)
}

/// Rules engine for [`GameMetadata::Chess`].
pub struct ChessRules;

impl RulesEngine for ChessRules {
    fn apply_move(
        &self,
        metadata: &GameMetadata,
        mv: &GameMove,
        actor: Uuid,
    ) -> Result<MoveOutcome, RulesError> {
        let GameMetadata::Chess(state) = metadata else {
            return Err(RulesError::MetadataMismatch);
        };
        let GameMove::Chess { from, to } = mv else {
            return Err(RulesError::MoveMismatch);
        };
        apply_move(state, *from, *to, actor)
    }
}

/// Bot move selection for [`GameMetadata::Chess`], delegating search to
/// the rules library.
pub struct ChessSelector;

impl MoveSelector for ChessSelector {
    fn select_move(
        &self,
        metadata: &GameMetadata,
        difficulty: BotDifficulty,
        rng: &mut dyn RngCore,
    ) -> Option<GameMove> {
        let GameMetadata::Chess(state) = metadata else {
            return None;
        };
        find_best_move(state, difficulty, rng).map(|(from, to)| GameMove::Chess { from, to })
    }
}
