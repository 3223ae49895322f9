//! Line detection over all 13 direction families of a cube.

use std::collections::HashSet;

use super::board::{Board, Coord};
use super::player::Player;
use super::state::GameOutcome;

/// One representative per line direction: 3 axes, 6 face diagonals and 4
/// space diagonals. Negations are omitted since a scan from every cell
/// already covers them.
pub const DIRECTIONS: [[isize; 3]; 13] = [
    [1, 0, 0],
    [0, 1, 0],
    [0, 0, 1],
    [1, 1, 0],
    [1, -1, 0],
    [1, 0, 1],
    [1, 0, -1],
    [0, 1, 1],
    [0, 1, -1],
    [1, 1, 1],
    [1, 1, -1],
    [1, -1, 1],
    [-1, 1, 1],
];

/// Cells of one winning run, in scan order.
pub type Line = Vec<Coord>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WinScan {
    pub player_one: Vec<Line>,
    pub player_two: Vec<Line>,
    /// Board full with no line for anyone.
    pub is_draw: bool,
}

impl WinScan {
    pub fn lines_for(&self, player: Player) -> &[Line] {
        match player {
            Player::One => &self.player_one,
            Player::Two => &self.player_two,
        }
    }

    /// Terminal verdict, if any. More lines wins; an equal nonzero count is a
    /// draw.
    pub fn verdict(&self) -> Option<GameOutcome> {
        let (one, two) = (self.player_one.len(), self.player_two.len());
        if one > two {
            Some(GameOutcome::Winner(Player::One))
        } else if two > one {
            Some(GameOutcome::Winner(Player::Two))
        } else if one > 0 || self.is_draw {
            Some(GameOutcome::Draw)
        } else {
            None
        }
    }

    pub fn all_lines(&self) -> Vec<Line> {
        self.player_one
            .iter()
            .chain(&self.player_two)
            .cloned()
            .collect()
    }
}

/// Cells of the run of `len` starting at `start` along `dir`, if it stays on
/// the board and every cell matches the start cell.
fn run_from(board: &Board, start: Coord, dir: [isize; 3], len: usize) -> Option<Line> {
    let cell = board.get(start);
    let mut line = Vec::with_capacity(len);
    for i in 0..len {
        let c = start.offset(dir, i as isize, board.size())?;
        if board.get(c) != cell {
            return None;
        }
        line.push(c);
    }
    Some(line)
}

/// Full scan: every distinct line of `win_length` for both players.
pub fn find_wins(board: &Board, win_length: usize) -> WinScan {
    let mut scan = WinScan::default();
    let mut seen: HashSet<Line> = HashSet::new();
    let mut any_empty = false;

    for (start, cell) in board.iter() {
        let Some(player) = cell.player() else {
            any_empty = true;
            continue;
        };
        for dir in DIRECTIONS {
            let Some(line) = run_from(board, start, dir, win_length) else {
                continue;
            };
            let mut key = line.clone();
            key.sort();
            if seen.insert(key) {
                match player {
                    Player::One => scan.player_one.push(line),
                    Player::Two => scan.player_two.push(line),
                }
            }
        }
    }

    scan.is_draw = !any_empty && scan.player_one.is_empty() && scan.player_two.is_empty();
    scan
}

/// Whether `player` owns at least one line. Stops at the first hit.
pub fn has_line(board: &Board, player: Player, win_length: usize) -> bool {
    let cell = player.to_cell();
    board
        .iter()
        .filter(|&(_, c)| c == cell)
        .any(|(start, _)| {
            DIRECTIONS
                .iter()
                .any(|&dir| run_from(board, start, dir, win_length).is_some())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::board::Cell;
    use crate::game::board::strategy::arb_board;
    use proptest::prelude::*;

    /// A full 4x4x4 fill that contains no line of four.
    const LINE_FREE_4: [&str; 4] = [
        "XXXO/XXXO/XXOX/OOXO",
        "XXXO/XXXO/XXOX/OOXX",
        "XXOX/XXOX/OOXX/XXXO",
        "OOXO/OOXX/XXXO/XXOO",
    ];

    #[test]
    fn directions_are_distinct_up_to_sign() {
        for (i, a) in DIRECTIONS.iter().enumerate() {
            for b in &DIRECTIONS[i + 1..] {
                assert_ne!(a, b);
                assert_ne!(*a, [-b[0], -b[1], -b[2]]);
            }
        }
    }

    #[test]
    fn empty_board_has_no_lines() {
        let scan = find_wins(&Board::new(4), 4);
        assert!(scan.player_one.is_empty());
        assert!(scan.player_two.is_empty());
        assert!(!scan.is_draw);
        assert_eq!(scan.verdict(), None);
    }

    #[test]
    fn detects_axis_line_once() {
        let board = Board::from_layers(&["XXX/.../...", ".../.../...", ".../.../..."]).unwrap();
        let scan = find_wins(&board, 3);
        assert_eq!(scan.player_one.len(), 1);
        assert_eq!(
            scan.player_one[0],
            vec![Coord::new(0, 0, 0), Coord::new(1, 0, 0), Coord::new(2, 0, 0)]
        );
        assert_eq!(scan.verdict(), Some(GameOutcome::Winner(Player::One)));
    }

    #[test]
    fn detects_space_diagonal_in_negative_family() {
        let board = Board::from_layers(&["..O/.../...", ".../.O./...", ".../.../O.."]).unwrap();
        let scan = find_wins(&board, 3);
        assert_eq!(scan.player_two.len(), 1);
        assert!(has_line(&board, Player::Two, 3));
        assert!(!has_line(&board, Player::One, 3));
    }

    #[test]
    fn longer_run_counts_each_window() {
        // five in a row with win length four holds two distinct lines
        let mut board = Board::new(5);
        for x in 0..5 {
            board.set(Coord::new(x, 0, 0), Cell::Two);
        }
        let scan = find_wins(&board, 4);
        assert_eq!(scan.player_two.len(), 2);
    }

    #[test]
    fn more_lines_wins() {
        let mut board = Board::new(4);
        for x in 0..4 {
            board.set(Coord::new(x, 0, 0), Cell::One);
            board.set(Coord::new(x, 0, 1), Cell::One);
            board.set(Coord::new(x, 0, 3), Cell::Two);
        }
        let scan = find_wins(&board, 4);
        assert_eq!(scan.player_one.len(), 2);
        assert_eq!(scan.player_two.len(), 1);
        assert_eq!(scan.verdict(), Some(GameOutcome::Winner(Player::One)));
        assert_eq!(scan.all_lines().len(), 3);
    }

    #[test]
    fn equal_line_counts_are_a_draw() {
        let mut board = Board::new(4);
        for x in 0..4 {
            board.set(Coord::new(x, 0, 0), Cell::One);
            board.set(Coord::new(x, 0, 3), Cell::Two);
        }
        let scan = find_wins(&board, 4);
        assert!(!scan.is_draw);
        assert_eq!(scan.verdict(), Some(GameOutcome::Draw));
    }

    #[test]
    fn full_line_free_board_is_draw() {
        let board = Board::from_layers(&LINE_FREE_4).unwrap();
        assert!(board.is_full());
        let scan = find_wins(&board, 4);
        assert!(scan.is_draw);
        assert!(scan.player_one.is_empty());
        assert!(scan.player_two.is_empty());
        assert_eq!(scan.verdict(), Some(GameOutcome::Draw));
    }

    /// Walks all 2^27 two-colour fills of the Tiny Cube. Slow in debug
    /// builds; run with `cargo test --release -- --ignored`.
    #[test]
    #[ignore]
    fn every_full_tiny_cube_has_a_line_exhaustive() {
        let mut full = Board::new(3);
        for c in full.coords().collect::<Vec<_>>() {
            full.set(c, Cell::One);
        }
        let masks: Vec<u32> = find_wins(&full, 3)
            .player_one
            .iter()
            .map(|line| {
                line.iter()
                    .fold(0u32, |m, c| m | 1 << (c.x + 3 * c.y + 9 * c.z))
            })
            .collect();
        assert_eq!(masks.len(), 49);

        for fill in 0u32..1 << 27 {
            let empty_side = !fill & ((1 << 27) - 1);
            assert!(
                masks
                    .iter()
                    .any(|&m| fill & m == m || empty_side & m == m),
                "fill {fill:#x} has no line"
            );
        }
    }

    proptest! {
        #[test]
        fn relabeling_players_swaps_winners(
            (board, win) in (3usize..=4).prop_flat_map(|n| (arb_board(n), 3usize..=n))
        ) {
            let scan = find_wins(&board, win);
            let swapped = find_wins(&board.swap_players(), win);
            prop_assert_eq!(&scan.player_one, &swapped.player_two);
            prop_assert_eq!(&scan.player_two, &swapped.player_one);
            prop_assert_eq!(scan.is_draw, swapped.is_draw);
        }

        #[test]
        fn every_full_tiny_cube_has_a_line(cells in prop::collection::vec(any::<bool>(), 27)) {
            let mut board = Board::new(3);
            let coords: Vec<Coord> = board.coords().collect();
            for (c, one) in coords.into_iter().zip(cells) {
                board.set(c, if one { Cell::One } else { Cell::Two });
            }
            let scan = find_wins(&board, 3);
            prop_assert!(!scan.is_draw);
            prop_assert!(scan.verdict().is_some());
        }

        #[test]
        fn has_line_agrees_with_full_scan(board in arb_board(3)) {
            let scan = find_wins(&board, 3);
            prop_assert_eq!(has_line(&board, Player::One, 3), !scan.player_one.is_empty());
            prop_assert_eq!(has_line(&board, Player::Two, 3), !scan.player_two.is_empty());
        }
    }
}
