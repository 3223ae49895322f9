//! Computer opponents: threat heuristic, depth-bounded minimax, random play
//! and an off-thread search worker.

mod agent;
mod heuristic;
mod random;
mod search;
pub mod worker;

pub use agent::Agent;
pub use heuristic::{
    center_control, count_threats, score_board, Heuristic, ThreatCount, ThreatHeuristic,
    ThreatWeights,
};
pub use random::{random_move, RandomAgent};
pub use search::{best_move, minimax, opening_move, Difficulty, MinimaxAgent, Searcher};
pub use worker::{fallback_move, spawn_search, SearchHandle};
