use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::gravity::Axis;
use super::player::Player;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    One,
    Two,
}

impl Cell {
    pub fn player(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::One => Some(Player::One),
            Cell::Two => Some(Player::Two),
        }
    }

    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    fn symbol(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::One => 'X',
            Cell::Two => 'O',
        }
    }

    fn from_symbol(c: char) -> Option<Cell> {
        match c {
            '.' => Some(Cell::Empty),
            'X' => Some(Cell::One),
            'O' => Some(Cell::Two),
            _ => None,
        }
    }
}

/// A cell position in the cube's local frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub x: usize,
    pub y: usize,
    pub z: usize,
}

impl Coord {
    pub const fn new(x: usize, y: usize, z: usize) -> Self {
        Coord { x, y, z }
    }

    /// Component along `axis`
    pub fn get(self, axis: Axis) -> usize {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// Copy with the component along `axis` replaced
    pub fn with(mut self, axis: Axis, value: usize) -> Self {
        match axis {
            Axis::X => self.x = value,
            Axis::Y => self.y = value,
            Axis::Z => self.z = value,
        }
        self
    }

    /// Step `steps` times along `dir`, staying inside a cube of side `size`.
    pub fn offset(self, dir: [isize; 3], steps: isize, size: usize) -> Option<Coord> {
        let step = |v: usize, d: isize| -> Option<usize> {
            let n = v as isize + d * steps;
            (n >= 0 && (n as usize) < size).then_some(n as usize)
        };
        Some(Coord {
            x: step(self.x, dir[0])?,
            y: step(self.y, dir[1])?,
            z: step(self.z, dir[2])?,
        })
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Cubic board stored flat as `x + y*N + z*N²`.
///
/// The cell buffer is shared copy-on-write, so cloning a board for a history
/// snapshot or a search branch costs a reference bump until one side writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: usize,
    cells: Arc<Vec<Cell>>,
}

impl Board {
    /// Create a new empty board
    pub fn new(size: usize) -> Self {
        Board {
            size,
            cells: Arc::new(vec![Cell::Empty; size * size * size]),
        }
    }

    /// Parse a board from one string per z layer, each holding `/`-separated
    /// rows for y = 0.. with one of `.`, `X`, `O` per x.
    pub fn from_layers(layers: &[&str]) -> Option<Self> {
        let size = layers.len();
        let mut board = Board::new(size);
        for (z, layer) in layers.iter().enumerate() {
            let rows: Vec<&str> = layer.split('/').collect();
            if rows.len() != size {
                return None;
            }
            for (y, row) in rows.iter().enumerate() {
                let cells: Vec<Cell> = row.chars().map(Cell::from_symbol).collect::<Option<_>>()?;
                if cells.len() != size {
                    return None;
                }
                for (x, cell) in cells.into_iter().enumerate() {
                    board.set(Coord::new(x, y, z), cell);
                }
            }
        }
        Some(board)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    fn idx(&self, c: Coord) -> usize {
        c.x + c.y * self.size + c.z * self.size * self.size
    }

    pub fn in_bounds(&self, c: Coord) -> bool {
        c.x < self.size && c.y < self.size && c.z < self.size
    }

    /// Get the cell at a position. Panics when out of bounds.
    pub fn get(&self, c: Coord) -> Cell {
        assert!(self.in_bounds(c), "coordinate {c} outside board of size {}", self.size);
        self.cells[self.idx(c)]
    }

    pub fn try_get(&self, c: Coord) -> Option<Cell> {
        self.in_bounds(c).then(|| self.cells[self.idx(c)])
    }

    /// Write a cell. Panics when out of bounds.
    pub fn set(&mut self, c: Coord, cell: Cell) {
        assert!(self.in_bounds(c), "coordinate {c} outside board of size {}", self.size);
        let i = self.idx(c);
        Arc::make_mut(&mut self.cells)[i] = cell;
    }

    /// All coordinates in storage order
    pub fn coords(&self) -> impl Iterator<Item = Coord> {
        let n = self.size;
        (0..n * n * n).map(move |i| Coord::new(i % n, (i / n) % n, i / (n * n)))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Coord, Cell)> + '_ {
        self.coords().zip(self.cells.iter().copied())
    }

    pub fn piece_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_empty()).count()
    }

    pub fn count(&self, player: Player) -> usize {
        let cell = player.to_cell();
        self.cells.iter().filter(|&&c| c == cell).count()
    }

    /// Check if the board is completely full
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| !c.is_empty())
    }

    /// Copy of the board with every piece handed to the other player.
    pub fn swap_players(&self) -> Board {
        let cells = self
            .cells
            .iter()
            .map(|c| match c {
                Cell::Empty => Cell::Empty,
                Cell::One => Cell::Two,
                Cell::Two => Cell::One,
            })
            .collect();
        Board {
            size: self.size,
            cells: Arc::new(cells),
        }
    }
}

impl fmt::Display for Board {
    /// Layers in z order, rows top (highest y) first.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for z in 0..self.size {
            writeln!(f, "z={z}")?;
            for y in (0..self.size).rev() {
                let row: String = (0..self.size)
                    .map(|x| self.get(Coord::new(x, y, z)).symbol())
                    .collect();
                writeln!(f, "  {row}")?;
            }
        }
        Ok(())
    }
}
