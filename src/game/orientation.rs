//! Cube orientation as an element of the 24-element rotation group.
//!
//! Every orientation reachable by quarter and half turns is a signed
//! permutation matrix, so composing rotations and re-deriving the local
//! "down" is exact integer arithmetic.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::gravity::{Axis, Gravity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Angle {
    #[serde(rename = "+90")]
    Pos90,
    #[serde(rename = "-90")]
    Neg90,
    #[serde(rename = "180")]
    Half,
}

impl Angle {
    pub fn degrees(self) -> i32 {
        match self {
            Angle::Pos90 => 90,
            Angle::Neg90 => -90,
            Angle::Half => 180,
        }
    }

    // (cos, sin)
    fn cos_sin(self) -> (i8, i8) {
        match self {
            Angle::Pos90 => (0, 1),
            Angle::Neg90 => (0, -1),
            Angle::Half => (-1, 0),
        }
    }
}

/// A world-frame turn of the cube.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rotation {
    pub axis: Axis,
    pub angle: Angle,
}

impl Rotation {
    pub const ROLL_LEFT: Rotation = Rotation::new(Axis::Z, Angle::Pos90);
    pub const ROLL_RIGHT: Rotation = Rotation::new(Axis::Z, Angle::Neg90);
    pub const TILT_FORWARD: Rotation = Rotation::new(Axis::X, Angle::Neg90);
    pub const TILT_BACK: Rotation = Rotation::new(Axis::X, Angle::Pos90);
    pub const FLIP: Rotation = Rotation::new(Axis::X, Angle::Half);

    /// The five turns offered to players, in generation order.
    pub const CATALOG: [Rotation; 5] = [
        Rotation::ROLL_LEFT,
        Rotation::ROLL_RIGHT,
        Rotation::TILT_FORWARD,
        Rotation::TILT_BACK,
        Rotation::FLIP,
    ];

    pub const fn new(axis: Axis, angle: Angle) -> Self {
        Rotation { axis, angle }
    }

    pub fn name(self) -> Option<&'static str> {
        match self {
            Rotation::ROLL_LEFT => Some("roll-left"),
            Rotation::ROLL_RIGHT => Some("roll-right"),
            Rotation::TILT_FORWARD => Some("tilt-forward"),
            Rotation::TILT_BACK => Some("tilt-back"),
            Rotation::FLIP => Some("flip"),
            _ => None,
        }
    }

    pub fn is_canonical(self) -> bool {
        Rotation::CATALOG.contains(&self)
    }

    /// The rotation as a matrix acting on world vectors.
    pub fn matrix(self) -> Orientation {
        let (c, s) = self.angle.cos_sin();
        let m = match self.axis {
            Axis::X => [[1, 0, 0], [0, c, -s], [0, s, c]],
            Axis::Y => [[c, 0, s], [0, 1, 0], [-s, 0, c]],
            Axis::Z => [[c, -s, 0], [s, c, 0], [0, 0, 1]],
        };
        Orientation { m }
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "{:?} {:+}", self.axis, self.angle.degrees()),
        }
    }
}

/// Maps local cube coordinates to world coordinates: `world = m · local`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Orientation {
    m: [[i8; 3]; 3],
}

impl Orientation {
    pub const IDENTITY: Orientation = Orientation {
        m: [[1, 0, 0], [0, 1, 0], [0, 0, 1]],
    };

    pub fn matrix(&self) -> [[i8; 3]; 3] {
        self.m
    }

    fn mul(a: &Orientation, b: &Orientation) -> Orientation {
        let mut m = [[0i8; 3]; 3];
        for (i, row) in m.iter_mut().enumerate() {
            for (j, v) in row.iter_mut().enumerate() {
                *v = (0..3).map(|k| a.m[i][k] * b.m[k][j]).sum();
            }
        }
        Orientation { m }
    }

    /// Orientation after turning the cube by `rotation` about a world axis.
    pub fn rotated(&self, rotation: Rotation) -> Orientation {
        Orientation::mul(&rotation.matrix(), self)
    }

    /// Rotation matrices are orthogonal, so the inverse is the transpose.
    pub fn inverse(&self) -> Orientation {
        let mut m = [[0i8; 3]; 3];
        for (i, row) in m.iter_mut().enumerate() {
            for (j, v) in row.iter_mut().enumerate() {
                *v = self.m[j][i];
            }
        }
        Orientation { m }
    }

    pub fn to_world(&self, local: [i8; 3]) -> [i8; 3] {
        let mut out = [0i8; 3];
        for (i, v) in out.iter_mut().enumerate() {
            *v = (0..3).map(|k| self.m[i][k] * local[k]).sum();
        }
        out
    }

    pub fn to_local(&self, world: [i8; 3]) -> [i8; 3] {
        self.inverse().to_world(world)
    }

    /// World "down" (0, -1, 0) seen from inside the cube.
    pub fn gravity(&self) -> Gravity {
        let local = self.to_local([0, -1, 0]);
        // a signed permutation maps a unit axis vector to a unit axis vector
        Gravity::from_unit(local).unwrap_or(Gravity::DOWN)
    }

    pub fn determinant(&self) -> i8 {
        let m = &self.m;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    /// Every orientation reachable from the identity with the catalog turns.
    pub fn all() -> Vec<Orientation> {
        let mut seen = vec![Orientation::IDENTITY];
        let mut frontier = vec![Orientation::IDENTITY];
        while let Some(o) = frontier.pop() {
            for r in Rotation::CATALOG {
                let next = o.rotated(r);
                if !seen.contains(&next) {
                    seen.push(next);
                    frontier.push(next);
                }
            }
        }
        seen
    }
}

impl Default for Orientation {
    fn default() -> Self {
        Orientation::IDENTITY
    }
}
