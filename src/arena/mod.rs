//! Headless games between two agents, with rolling result statistics.

mod episode;
mod metrics;

pub use episode::{match_seed, play_match, MatchRecord, PlayedMove};
pub use metrics::{MatchMetrics, MatchResult, MatchSummary};
