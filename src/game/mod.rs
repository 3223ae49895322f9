//! Rules of gravity-shifting 3D connect-N: cube cells, gravity and
//! compaction, cube orientation, move generation, line detection and the
//! game state machine with immutable transitions.

mod board;
mod gravity;
mod moves;
mod orientation;
mod player;
mod state;
mod win;

pub use board::{Board, Cell, Coord};
pub use gravity::{compact, resolve_axis, Axis, Gravity, Sign};
pub use moves::{landing_cell, legal_placements, legal_rotations, Move, ShiftState};
pub use orientation::{Angle, Orientation, Rotation};
pub use player::Player;
pub use state::{GameOutcome, GameState, GameStatus};
pub use win::{find_wins, has_line, Line, WinScan, DIRECTIONS};
