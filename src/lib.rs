//! # Gravity Cube
//!
//! Rules engine and computer opponent for connect-N on a cube whose gravity
//! changes when a player turns it.
//!
//! ## Modules
//!
//! - [`game`]: Cube board, gravity and compaction, orientation, move
//!   generation, line detection and the game state machine
//! - [`session`]: Live game with undo history and the computer's turn
//! - [`ai`]: Threat heuristic, minimax search, random agent, search worker
//! - [`arena`]: Headless agent-vs-agent matches and result metrics
//! - [`config`]: TOML configuration loading and validation
//! - [`error`]: Structured error types

pub mod ai;
pub mod arena;
pub mod config;
pub mod error;
pub mod game;
pub mod session;
