//! Social accumulation games: Poll, Would-You-Rather, Question of the
//! Day, Story Chain, Rate This.
//!
//! These collect contributions over append-only lists instead of
//! producing win/loss outcomes; a host closes them explicitly.

pub mod poll;
pub mod responses;
pub mod story;

pub use poll::{PollOption, PollRules, PollState, WouldYouRatherRules, WouldYouRatherState};
pub use responses::{
    RateThisRules, RateThisState, Rating, Response, ResponsesRules, ResponsesState,
};
pub use story::{StoryChainRules, StoryChainState, StoryPart};
