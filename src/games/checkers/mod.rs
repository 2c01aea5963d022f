pub mod logic;
pub mod types;

pub use logic::{CheckersRules, CheckersSelector};
pub use types::{CheckersColor, CheckersPiece, CheckersState, SIZE};
