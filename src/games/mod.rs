//! Game engines: one rules module per game type, plus the shared
//! metadata union, move types, and the engine/selector registry.

pub mod checkers;
pub mod chess;
pub mod connect_four;
pub mod hangman;
pub mod registry;
pub mod social;
pub mod tictactoe;
pub mod twenty_questions;

pub use registry::{engine_for, selector_for, MoveSelector, RulesEngine};

use crate::model::GameType;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use checkers::CheckersState;
use chess::ChessState;
use connect_four::ConnectFourState;
use hangman::HangmanState;
use social::{PollState, RateThisState, ResponsesState, StoryChainState, WouldYouRatherState};
use tictactoe::TicTacToeState;
use twenty_questions::{Reply, TwentyQuestionsState};

/// Bot strength for the classic board games.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BotDifficulty {
    Easy,
    Medium,
    Hard,
}

impl BotDifficulty {
    pub const ALL: [BotDifficulty; 3] = [
        BotDifficulty::Easy,
        BotDifficulty::Medium,
        BotDifficulty::Hard,
    ];

    pub fn from_index(index: usize) -> Self {
        Self::ALL.get(index).copied().unwrap_or(BotDifficulty::Easy)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }
}

/// Full type-specific game state. The variant is the single source of
/// truth for a game's `game_type`; a record never carries a variant
/// from another type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "game", rename_all = "snake_case")]
pub enum GameMetadata {
    TicTacToe(TicTacToeState),
    ConnectFour(ConnectFourState),
    Checkers(CheckersState),
    Chess(ChessState),
    Hangman(HangmanState),
    TwentyOneQuestions(TwentyQuestionsState),
    Poll(PollState),
    WouldYouRather(WouldYouRatherState),
    QuestionOfTheDay(ResponsesState),
    StoryChain(StoryChainState),
    RateThis(RateThisState),
}

impl GameMetadata {
    /// The type tag this metadata variant belongs to.
    pub fn game_type(&self) -> GameType {
        match self {
            GameMetadata::TicTacToe(_) => GameType::TicTacToe,
            GameMetadata::ConnectFour(_) => GameType::ConnectFour,
            GameMetadata::Checkers(_) => GameType::Checkers,
            GameMetadata::Chess(_) => GameType::Chess,
            GameMetadata::Hangman(_) => GameType::Hangman,
            GameMetadata::TwentyOneQuestions(_) => GameType::TwentyOneQuestions,
            GameMetadata::Poll(_) => GameType::Poll,
            GameMetadata::WouldYouRather(_) => GameType::WouldYouRather,
            GameMetadata::QuestionOfTheDay(_) => GameType::QuestionOfTheDay,
            GameMetadata::StoryChain(_) => GameType::StoryChain,
            GameMetadata::RateThis(_) => GameType::RateThis,
        }
    }

    /// Whose move it is, for games with a hard turn order. `None` for
    /// the accumulation games.
    pub fn next_actor(&self) -> Option<Uuid> {
        match self {
            GameMetadata::TicTacToe(s) => Some(s.next_turn),
            GameMetadata::ConnectFour(s) => Some(s.next_turn),
            GameMetadata::Checkers(s) => Some(s.next_turn),
            GameMetadata::Chess(s) => Some(s.next_turn),
            GameMetadata::Hangman(s) => Some(s.next_turn),
            GameMetadata::TwentyOneQuestions(s) => Some(s.next_turn),
            _ => None,
        }
    }

    /// Winner, once a terminal state has been reached. Write-once.
    pub fn winner(&self) -> Option<Uuid> {
        match self {
            GameMetadata::TicTacToe(s) => s.winner,
            GameMetadata::ConnectFour(s) => s.winner,
            GameMetadata::Checkers(s) => s.winner,
            GameMetadata::Chess(s) => s.winner,
            GameMetadata::Hangman(s) => s.winner,
            GameMetadata::TwentyOneQuestions(s) => s.winner,
            _ => None,
        }
    }

    /// True when a two-seat board game still waits for its second player.
    pub fn has_open_seat(&self) -> bool {
        match self {
            GameMetadata::TicTacToe(s) => s.player_o.is_none(),
            GameMetadata::ConnectFour(s) => s.player_yellow.is_none(),
            GameMetadata::Checkers(s) => s.player_light.is_none(),
            GameMetadata::Chess(s) => s.player_black.is_none(),
            _ => false,
        }
    }

    /// Seat a joiner into the open slot. Returns false if no seat is open.
    pub fn claim_open_seat(&mut self, user_id: Uuid) -> bool {
        match self {
            GameMetadata::TicTacToe(s) if s.player_o.is_none() => {
                s.player_o = Some(user_id);
                true
            }
            GameMetadata::ConnectFour(s) if s.player_yellow.is_none() => {
                s.player_yellow = Some(user_id);
                true
            }
            GameMetadata::Checkers(s) if s.player_light.is_none() => {
                s.player_light = Some(user_id);
                true
            }
            GameMetadata::Chess(s) if s.player_black.is_none() => {
                s.player_black = Some(user_id);
                true
            }
            _ => false,
        }
    }

    /// Fresh initial state for a rematch: same seats and setup, no
    /// progress. Accumulation games keep their prompt/options and drop
    /// the collected input.
    pub fn rematch_seed(&self) -> GameMetadata {
        match self {
            GameMetadata::TicTacToe(s) => GameMetadata::TicTacToe(s.rematch_seed()),
            GameMetadata::ConnectFour(s) => GameMetadata::ConnectFour(s.rematch_seed()),
            GameMetadata::Checkers(s) => GameMetadata::Checkers(s.rematch_seed()),
            GameMetadata::Chess(s) => GameMetadata::Chess(s.rematch_seed()),
            GameMetadata::Hangman(s) => GameMetadata::Hangman(s.rematch_seed()),
            GameMetadata::TwentyOneQuestions(s) => {
                GameMetadata::TwentyOneQuestions(s.rematch_seed())
            }
            GameMetadata::Poll(s) => GameMetadata::Poll(s.rematch_seed()),
            GameMetadata::WouldYouRather(s) => GameMetadata::WouldYouRather(s.rematch_seed()),
            GameMetadata::QuestionOfTheDay(s) => {
                GameMetadata::QuestionOfTheDay(s.rematch_seed())
            }
            GameMetadata::StoryChain(s) => GameMetadata::StoryChain(s.rematch_seed()),
            GameMetadata::RateThis(s) => GameMetadata::RateThis(s.rematch_seed()),
        }
    }
}

/// A move intent, as dispatched by a game view. The variant must match
/// the game's metadata variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GameMove {
    /// Tic-Tac-Toe: claim an empty cell.
    Place { row: usize, col: usize },
    /// Connect Four: drop into a column; the piece falls.
    Drop { column: usize },
    /// Checkers: one step or one jump of a capture chain.
    Slide {
        from: (usize, usize),
        to: (usize, usize),
    },
    /// Chess: from/to squares as (file, rank); castling is the king's
    /// two-square move.
    Chess { from: (u8, u8), to: (u8, u8) },
    /// Hangman: the setter assigns the hidden word.
    SetWord { word: String },
    /// Hangman: guess a letter.
    Guess { letter: char },
    /// 21 Questions: the thinker fixes the secret subject.
    SetSecret { secret: String },
    /// 21 Questions: the guesser asks a yes/no question.
    Ask { question: String },
    /// 21 Questions: the thinker replies to the pending question.
    Answer { reply: Reply },
    /// 21 Questions: the guesser commits to a final guess.
    FinalGuess { text: String },
    /// Poll / Would-You-Rather: cast or move a ballot.
    Vote { option: usize },
    /// Question of the Day: add an answer.
    Respond { text: String },
    /// Story Chain: append the next part.
    Contribute { text: String },
    /// Rate This: set or replace the caller's score.
    Rate { score: u8 },
}

impl GameMove {
    /// Event-log type string for this action.
    pub fn event_type(&self) -> &'static str {
        match self {
            GameMove::Place { .. } | GameMove::Drop { .. } | GameMove::Slide { .. } => "move",
            GameMove::Chess { .. } => "move",
            GameMove::SetWord { .. } => "set_word",
            GameMove::Guess { .. } => "guess",
            GameMove::SetSecret { .. } => "set_secret",
            GameMove::Ask { .. } => "question",
            GameMove::Answer { .. } => "answer",
            GameMove::FinalGuess { .. } => "final_guess",
            GameMove::Vote { .. } => "vote",
            GameMove::Respond { .. } => "response",
            GameMove::Contribute { .. } => "contribution",
            GameMove::Rate { .. } => "rating",
        }
    }
}

/// How a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalKind {
    Win,
    Draw,
    Stalemate,
    Checkmate,
}

/// Terminal outcome reported by a rules engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Terminal {
    pub winner: Option<Uuid>,
    pub kind: TerminalKind,
}

impl Terminal {
    pub fn win(winner: Uuid) -> Self {
        Terminal {
            winner: Some(winner),
            kind: TerminalKind::Win,
        }
    }

    pub fn draw() -> Self {
        Terminal {
            winner: None,
            kind: TerminalKind::Draw,
        }
    }
}

/// Result of applying one legal move.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveOutcome {
    pub next: GameMetadata,
    pub terminal: Option<Terminal>,
}

impl MoveOutcome {
    pub fn ongoing(next: GameMetadata) -> Self {
        MoveOutcome {
            next,
            terminal: None,
        }
    }

    pub fn ended(next: GameMetadata, terminal: Terminal) -> Self {
        MoveOutcome {
            next,
            terminal: Some(terminal),
        }
    }
}

/// Why a move was rejected. Engines reject rather than accept an
/// inconsistent board; nothing is written to the store on rejection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RulesError {
    #[error("not your turn")]
    NotYourTurn,
    #[error("game is already over")]
    GameOver,
    #[error("move does not belong to this game type")]
    MoveMismatch,
    #[error("metadata does not belong to this game type")]
    MetadataMismatch,
    #[error("target is outside the board")]
    OutOfBounds,
    #[error("cell is already occupied")]
    Occupied,
    #[error("column is full")]
    ColumnFull,
    #[error("a capture is available and must be taken")]
    MustCapture,
    #[error("no piece of yours on the source square")]
    NotYourPiece,
    #[error("piece cannot move there")]
    IllegalMove,
    #[error("letter was already guessed")]
    AlreadyGuessed,
    #[error("word has not been set yet")]
    WordNotSet,
    #[error("word is already set")]
    WordAlreadySet,
    #[error("guess must be a single letter")]
    NotALetter,
    #[error("secret has not been set yet")]
    SecretNotSet,
    #[error("secret is already set")]
    SecretAlreadySet,
    #[error("a question is awaiting an answer")]
    QuestionPending,
    #[error("no question is awaiting an answer")]
    NoQuestionPending,
    #[error("no such option")]
    NoSuchOption,
    #[error("you wrote the previous part")]
    ConsecutiveContribution,
    #[error("score must be between 1 and 10")]
    ScoreOutOfRange,
    #[error("submission must not be empty")]
    EmptySubmission,
}
