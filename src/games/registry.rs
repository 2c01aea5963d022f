//! Registry mapping a game type to its rules engine and bot selector.
//!
//! Adding a game type is one entry here plus its module; nothing else
//! in the crate branches on the type tag for dispatch.

use super::checkers::{CheckersRules, CheckersSelector};
use super::chess::{ChessRules, ChessSelector};
use super::connect_four::{ConnectFourRules, ConnectFourSelector};
use super::hangman::HangmanRules;
use super::social::{
    PollRules, RateThisRules, ResponsesRules, StoryChainRules, WouldYouRatherRules,
};
use super::tictactoe::{TicTacToeRules, TicTacToeSelector};
use super::twenty_questions::TwentyQuestionsRules;
use super::{BotDifficulty, GameMetadata, GameMove, MoveOutcome, RulesError};
use crate::model::GameType;
use rand::RngCore;
use uuid::Uuid;

/// Pure move application and terminal detection for one game type.
/// Implementations do no I/O and consult no clock or RNG.
pub trait RulesEngine: Send + Sync {
    fn apply_move(
        &self,
        metadata: &GameMetadata,
        mv: &GameMove,
        actor: Uuid,
    ) -> Result<MoveOutcome, RulesError>;
}

/// Computer-opponent move selection for one game type.
///
/// Contract: the returned move is always legal for the given metadata,
/// and `None` is returned only when no legal move exists.
pub trait MoveSelector: Send + Sync {
    fn select_move(
        &self,
        metadata: &GameMetadata,
        difficulty: BotDifficulty,
        rng: &mut dyn RngCore,
    ) -> Option<GameMove>;
}

/// Engine and optional selector for one registered game type.
struct Registration {
    engine: &'static dyn RulesEngine,
    selector: Option<&'static dyn MoveSelector>,
}

/// The single registration point for all game types.
fn registration(game_type: GameType) -> Registration {
    match game_type {
        GameType::TicTacToe => Registration {
            engine: &TicTacToeRules,
            selector: Some(&TicTacToeSelector),
        },
        GameType::ConnectFour => Registration {
            engine: &ConnectFourRules,
            selector: Some(&ConnectFourSelector),
        },
        GameType::Checkers => Registration {
            engine: &CheckersRules,
            selector: Some(&CheckersSelector),
        },
        GameType::Chess => Registration {
            engine: &ChessRules,
            selector: Some(&ChessSelector),
        },
        GameType::Hangman => Registration {
            engine: &HangmanRules,
            selector: None,
        },
        GameType::TwentyOneQuestions => Registration {
            engine: &TwentyQuestionsRules,
            selector: None,
        },
        GameType::Poll => Registration {
            engine: &PollRules,
            selector: None,
        },
        GameType::WouldYouRather => Registration {
            engine: &WouldYouRatherRules,
            selector: None,
        },
        GameType::QuestionOfTheDay => Registration {
            engine: &ResponsesRules,
            selector: None,
        },
        GameType::StoryChain => Registration {
            engine: &StoryChainRules,
            selector: None,
        },
        GameType::RateThis => Registration {
            engine: &RateThisRules,
            selector: None,
        },
    }
}

/// The rules engine for a game type.
pub fn engine_for(game_type: GameType) -> &'static dyn RulesEngine {
    registration(game_type).engine
}

/// The bot selector for a game type, if it has a computer opponent.
pub fn selector_for(game_type: GameType) -> Option<&'static dyn MoveSelector> {
    registration(game_type).selector
}
