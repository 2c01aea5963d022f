pub mod logic;
pub mod types;

pub use logic::HangmanRules;
pub use types::{HangmanState, DEFAULT_MAX_GUESSES};
