pub mod logic;
pub mod types;

pub use logic::{ChessRules, ChessSelector};
pub use types::{ChessState, ChessStatus, RecordedChessMove};
