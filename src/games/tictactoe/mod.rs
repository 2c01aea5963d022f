pub mod logic;
pub mod types;

pub use logic::{TicTacToeRules, TicTacToeSelector};
pub use types::{Mark, TicTacToeState};
