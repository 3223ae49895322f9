//! Gravity direction and board compaction.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::board::{Board, Cell, Coord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// The two axes spanning a column's cross-section, in enumeration order.
    pub fn transverse(self) -> (Axis, Axis) {
        match self {
            Axis::X => (Axis::Y, Axis::Z),
            Axis::Y => (Axis::X, Axis::Z),
            Axis::Z => (Axis::X, Axis::Y),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sign {
    Negative,
    Positive,
}

impl Sign {
    pub fn as_i8(self) -> i8 {
        match self {
            Sign::Negative => -1,
            Sign::Positive => 1,
        }
    }
}

/// Axis-aligned "down" in the cube's local frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Gravity {
    pub axis: Axis,
    pub sign: Sign,
}

impl Gravity {
    /// Gravity at the start of every game: (0, -1, 0).
    pub const DOWN: Gravity = Gravity {
        axis: Axis::Y,
        sign: Sign::Negative,
    };

    pub const fn new(axis: Axis, sign: Sign) -> Self {
        Gravity { axis, sign }
    }

    pub fn to_vector(self) -> [i8; 3] {
        let mut v = [0; 3];
        v[self.axis.index()] = self.sign.as_i8();
        v
    }

    /// Exact conversion from a unit axis vector.
    pub fn from_unit(v: [i8; 3]) -> Option<Gravity> {
        let mut found = None;
        for axis in Axis::ALL {
            match v[axis.index()] {
                0 => {}
                1 if found.is_none() => found = Some(Gravity::new(axis, Sign::Positive)),
                -1 if found.is_none() => found = Some(Gravity::new(axis, Sign::Negative)),
                _ => return None,
            }
        }
        found
    }
}

impl fmt::Display for Gravity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [x, y, z] = self.to_vector();
        write!(f, "({x}, {y}, {z})")
    }
}

/// Resolve an arbitrary vector to its dominant axis and that component's sign.
///
/// Ties go to x, then y, then z. A zero (or non-finite) vector has no axis.
pub fn resolve_axis(v: [f64; 3]) -> Option<Gravity> {
    let mut best: Option<(Axis, f64)> = None;
    for axis in Axis::ALL {
        let c = v[axis.index()];
        if !c.is_finite() || c == 0.0 {
            continue;
        }
        match best {
            Some((_, b)) if c.abs() <= b.abs() => {}
            _ => best = Some((axis, c)),
        }
    }
    best.map(|(axis, c)| {
        let sign = if c < 0.0 { Sign::Negative } else { Sign::Positive };
        Gravity::new(axis, sign)
    })
}

/// Slide every piece along the gravity axis until it rests against the floor
/// face, keeping the order of pieces within each column.
pub fn compact(board: &Board, gravity: Gravity) -> Board {
    let n = board.size();
    let axis = gravity.axis;
    let (u_axis, v_axis) = axis.transverse();
    let mut out = Board::new(n);

    for u in 0..n {
        for v in 0..n {
            let base = Coord::new(0, 0, 0).with(u_axis, u).with(v_axis, v);
            let column: Vec<Cell> = (0..n)
                .map(|w| board.get(base.with(axis, w)))
                .filter(|c| !c.is_empty())
                .collect();
            let start = match gravity.sign {
                Sign::Negative => 0,
                Sign::Positive => n - column.len(),
            };
            for (i, cell) in column.into_iter().enumerate() {
                out.set(base.with(axis, start + i), cell);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::board::strategy::arb_board;
    use proptest::prelude::*;

    fn all_gravities() -> Vec<Gravity> {
        Axis::ALL
            .iter()
            .flat_map(|&a| [Gravity::new(a, Sign::Negative), Gravity::new(a, Sign::Positive)])
            .collect()
    }

    #[test]
    fn resolve_picks_dominant_axis() {
        assert_eq!(resolve_axis([0.0, -1.0, 0.0]), Some(Gravity::DOWN));
        assert_eq!(
            resolve_axis([0.2, 0.1, -0.9]),
            Some(Gravity::new(Axis::Z, Sign::Negative))
        );
        assert_eq!(
            resolve_axis([0.7, 0.1, 0.3]),
            Some(Gravity::new(Axis::X, Sign::Positive))
        );
    }

    #[test]
    fn resolve_ties_prefer_x_then_y() {
        assert_eq!(
            resolve_axis([-0.5, 0.5, 0.5]),
            Some(Gravity::new(Axis::X, Sign::Negative))
        );
        assert_eq!(
            resolve_axis([0.0, 0.5, -0.5]),
            Some(Gravity::new(Axis::Y, Sign::Positive))
        );
    }

    #[test]
    fn resolve_zero_vector_is_none() {
        assert_eq!(resolve_axis([0.0, 0.0, 0.0]), None);
        assert_eq!(resolve_axis([f64::NAN, 0.0, 0.0]), None);
    }

    #[test]
    fn unit_vector_roundtrip() {
        for g in all_gravities() {
            assert_eq!(Gravity::from_unit(g.to_vector()), Some(g));
        }
        assert_eq!(Gravity::from_unit([1, 1, 0]), None);
        assert_eq!(Gravity::from_unit([0, 0, 0]), None);
        assert_eq!(Gravity::from_unit([0, 2, 0]), None);
    }

    #[test]
    fn compact_down_packs_toward_zero() {
        let mut board = Board::new(3);
        board.set(Coord::new(1, 2, 0), Cell::One);
        board.set(Coord::new(1, 1, 0), Cell::Two);
        let out = compact(&board, Gravity::DOWN);
        // order along the column is preserved: Two was below One
        assert_eq!(out.get(Coord::new(1, 0, 0)), Cell::Two);
        assert_eq!(out.get(Coord::new(1, 1, 0)), Cell::One);
        assert_eq!(out.get(Coord::new(1, 2, 0)), Cell::Empty);
    }

    #[test]
    fn compact_positive_packs_toward_high_end() {
        let mut board = Board::new(4);
        board.set(Coord::new(0, 0, 2), Cell::One);
        board.set(Coord::new(1, 0, 2), Cell::Two);
        let out = compact(&board, Gravity::new(Axis::X, Sign::Positive));
        assert_eq!(out.get(Coord::new(2, 0, 2)), Cell::One);
        assert_eq!(out.get(Coord::new(3, 0, 2)), Cell::Two);
        assert_eq!(out.piece_count(), 2);
    }

    #[test]
    fn compact_leaves_input_untouched() {
        let mut board = Board::new(3);
        board.set(Coord::new(0, 2, 0), Cell::One);
        let before = board.clone();
        let _ = compact(&board, Gravity::DOWN);
        assert_eq!(board, before);
    }

    proptest! {
        #[test]
        fn compact_is_idempotent(board in (2usize..=4).prop_flat_map(arb_board), g in 0usize..6) {
            let gravity = all_gravities()[g];
            let once = compact(&board, gravity);
            prop_assert_eq!(compact(&once, gravity), once);
        }

        #[test]
        fn compact_conserves_pieces(board in (2usize..=4).prop_flat_map(arb_board), g in 0usize..6) {
            let gravity = all_gravities()[g];
            let out = compact(&board, gravity);
            prop_assert_eq!(out.count(crate::game::Player::One), board.count(crate::game::Player::One));
            prop_assert_eq!(out.count(crate::game::Player::Two), board.count(crate::game::Player::Two));
        }
    }
}
