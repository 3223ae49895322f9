use crate::game::{has_line, Board, Cell, Player, DIRECTIONS};

/// Trait for evaluating a board position from a player's perspective.
pub trait Heuristic: Send + Sync {
    fn evaluate(&self, board: &Board, player: Player, win_length: usize) -> f64;
}

/// Open windows one piece (major) or two pieces (minor) short of a line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThreatCount {
    pub major: usize,
    pub minor: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThreatWeights {
    pub own_major: f64,
    pub own_minor: f64,
    pub opp_major: f64,
    pub opp_minor: f64,
    /// Scale applied to the summed center closeness of own pieces.
    pub center: f64,
}

impl Default for ThreatWeights {
    fn default() -> Self {
        ThreatWeights {
            own_major: 100.0,
            own_minor: 10.0,
            opp_major: 90.0,
            opp_minor: 5.0,
            center: 0.01,
        }
    }
}

/// Count threats for `player`: every cell is a window start in each of the 13
/// directions unless the cell just before it along that direction is already
/// the player's own. A window is dead if it runs off the board or touches an
/// opponent piece, and needs at least one empty cell.
pub fn count_threats(board: &Board, player: Player, win_length: usize) -> ThreatCount {
    let n = board.size();
    let own = player.to_cell();
    let mut threats = ThreatCount::default();

    for start in board.coords() {
        for dir in DIRECTIONS {
            if start
                .offset(dir, -1, n)
                .is_some_and(|prev| board.get(prev) == own)
            {
                continue;
            }

            let mut own_count = 0;
            let mut empty_count = 0;
            let mut blocked = false;
            for i in 0..win_length {
                match start.offset(dir, i as isize, n).map(|c| board.get(c)) {
                    Some(c) if c == own => own_count += 1,
                    Some(Cell::Empty) => empty_count += 1,
                    _ => {
                        blocked = true;
                        break;
                    }
                }
            }

            if blocked || empty_count == 0 {
                continue;
            }
            if own_count + 1 == win_length {
                threats.major += 1;
            } else if own_count + 2 == win_length && empty_count >= 2 {
                threats.minor += 1;
            }
        }
    }

    threats
}

/// Sum over own pieces of how much closer each sits to the cube center than
/// a corner does.
pub fn center_control(board: &Board, player: Player) -> f64 {
    let center = (board.size() as f64 - 1.0) / 2.0;
    let max_dist = (3.0 * center * center).sqrt();
    let own = player.to_cell();
    board
        .iter()
        .filter(|&(_, cell)| cell == own)
        .map(|(c, _)| {
            let dx = c.x as f64 - center;
            let dy = c.y as f64 - center;
            let dz = c.z as f64 - center;
            max_dist - (dx * dx + dy * dy + dz * dz).sqrt()
        })
        .sum()
}

/// Default heuristic: completed lines are decisive, otherwise weighted
/// threat counts plus a small center bonus.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreatHeuristic {
    pub weights: ThreatWeights,
}

impl ThreatHeuristic {
    pub fn new(weights: ThreatWeights) -> Self {
        ThreatHeuristic { weights }
    }
}

impl Heuristic for ThreatHeuristic {
    fn evaluate(&self, board: &Board, player: Player, win_length: usize) -> f64 {
        let opponent = player.other();
        if has_line(board, player, win_length) {
            return f64::INFINITY;
        }
        if has_line(board, opponent, win_length) {
            return f64::NEG_INFINITY;
        }

        let w = &self.weights;
        let own = count_threats(board, player, win_length);
        let opp = count_threats(board, opponent, win_length);
        own.major as f64 * w.own_major + own.minor as f64 * w.own_minor
            - opp.major as f64 * w.opp_major
            - opp.minor as f64 * w.opp_minor
            + center_control(board, player) * w.center
    }
}

/// Static score of `board` for `player` with the default weights.
pub fn score_board(board: &Board, player: Player, win_length: usize) -> f64 {
    ThreatHeuristic::default().evaluate(board, player, win_length)
}
