//! Pipeline stages for the watch loop.
//!
//! - `NoveltyTracker`: suppress everything seen before
//! - `AggregationBuffer`: debounce bursts into one payload
//! - `RateLimiter`: cap publish attempts per rolling window
//! - `Watcher`: the state machine tying the stages together

pub mod aggregate;
pub mod novelty;
pub mod rate_limit;
pub mod watch;

pub use aggregate::AggregationBuffer;
pub use novelty::NoveltyTracker;
pub use rate_limit::RateLimiter;
pub use watch::{StopReason, WatchState, WatchSummary, Watcher};
