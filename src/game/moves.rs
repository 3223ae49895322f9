use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;

use super::board::{Board, Coord};
use super::gravity::{Gravity, Sign};
use super::orientation::Rotation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Move {
    Place(Coord),
    Rotate(Rotation),
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Place(c) => write!(f, "place {c}"),
            Move::Rotate(r) => write!(f, "rotate {r}"),
        }
    }
}

/// Per-player shift budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShiftState {
    pub shifts_remaining: u32,
    pub cooldown_turns: u32,
}

impl ShiftState {
    pub fn new(shifts: u32) -> Self {
        ShiftState {
            shifts_remaining: shifts,
            cooldown_turns: 0,
        }
    }

    pub fn can_shift(&self) -> bool {
        self.shifts_remaining > 0 && self.cooldown_turns == 0
    }
}

/// First empty cell of the column at transverse position `(u, v)`, scanning
/// from the floor face inward.
pub fn landing_cell(board: &Board, gravity: Gravity, u: usize, v: usize) -> Option<Coord> {
    let n = board.size();
    let (u_axis, v_axis) = gravity.axis.transverse();
    let base = Coord::new(0, 0, 0).with(u_axis, u).with(v_axis, v);
    (0..n)
        .map(|i| match gravity.sign {
            Sign::Negative => i,
            Sign::Positive => n - 1 - i,
        })
        .map(|w| base.with(gravity.axis, w))
        .find(|&c| board.get(c).is_empty())
}

/// One candidate per non-full column, columns enumerated u-major.
pub fn legal_placements(board: &Board, gravity: Gravity) -> Vec<Coord> {
    let n = board.size();
    let mut placements = Vec::with_capacity(n * n);
    for u in 0..n {
        for v in 0..n {
            if let Some(c) = landing_cell(board, gravity, u, v) {
                placements.push(c);
            }
        }
    }
    placements
}

pub fn legal_rotations(shift: &ShiftState, config: &GameConfig) -> Vec<Rotation> {
    if config.shifting_enabled() && shift.can_shift() {
        Rotation::CATALOG.to_vec()
    } else {
        Vec::new()
    }
}
