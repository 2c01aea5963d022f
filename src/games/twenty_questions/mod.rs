pub mod logic;
pub mod types;

pub use logic::TwentyQuestionsRules;
pub use types::{QaExchange, Reply, TwentyQuestionsState, DEFAULT_MAX_QUESTIONS};
