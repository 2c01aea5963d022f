//! Wallplay - Turn-Based Multi-Game Engine
//!
//! The game subsystem of a circle wall: a shared record/event model, a
//! pure rules engine per game type, computer-opponent selectors, and
//! the session controller that ties them to the hosted record store.

pub mod build_info;
pub mod games;
pub mod model;
pub mod session;
pub mod store;

pub use games::{
    BotDifficulty, GameMetadata, GameMove, MoveOutcome, RulesError, Terminal, TerminalKind,
};
pub use model::{Game, GameEvent, GameParticipant, GameStatus, GameType, COMPUTER_USER_ID};
pub use session::{GameIntent, GameSession, Notice, SessionPhase};
pub use store::{GameStore, InMemoryStore, StoreError};
