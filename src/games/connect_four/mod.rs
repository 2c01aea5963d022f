pub mod logic;
pub mod types;

pub use logic::{ConnectFourRules, ConnectFourSelector};
pub use types::{ConnectFourState, Disc, COLS, ROWS};
