use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use crate::error::SearchError;
use crate::game::{Coord, GameState, Move, Player};

use super::agent::Agent;
use super::heuristic::{Heuristic, ThreatHeuristic};
use super::random::random_move;
use super::worker::spawn_search;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Uniform random over every legal move.
    Easy,
    /// Best static score after one own move.
    #[default]
    Medium,
    /// Own move followed by the opponent's best reply.
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

/// Legal placement nearest the geometric center of the cube. The first one
/// in generation order wins ties.
pub fn opening_move(state: &GameState) -> Option<Coord> {
    let center = (state.board().size() as f64 - 1.0) / 2.0;
    let mut best = None;
    let mut best_dist = f64::INFINITY;
    for c in state.legal_placements() {
        let dx = c.x as f64 - center;
        let dy = c.y as f64 - center;
        let dz = c.z as f64 - center;
        let dist = (dx * dx + dy * dy + dz * dz).sqrt();
        if dist < best_dist {
            best_dist = dist;
            best = Some(c);
        }
    }
    best
}

/// Successor states for `moves` played by `player`. Moves come from the
/// state's own generator, so a rejection is an engine bug and is skipped.
fn successors<'s>(
    state: &'s GameState,
    moves: &'s [Move],
    player: Player,
) -> impl Iterator<Item = (Move, GameState)> + 's {
    moves
        .iter()
        .filter_map(move |&mv| match state.simulate(mv, player) {
            Ok(next) => Some((mv, next)),
            Err(e) => {
                error!(%mv, error = %e, "generated move rejected by the rules engine");
                None
            }
        })
}

/// Bounded-depth adversarial search with a fixed scoring perspective.
pub struct Searcher<'a> {
    heuristic: &'a dyn Heuristic,
    stop: Option<&'a AtomicBool>,
}

impl<'a> Searcher<'a> {
    pub fn new(heuristic: &'a dyn Heuristic) -> Self {
        Searcher {
            heuristic,
            stop: None,
        }
    }

    /// Abandon remaining branches once `stop` is raised.
    pub fn with_stop_flag(mut self, stop: &'a AtomicBool) -> Self {
        self.stop = Some(stop);
        self
    }

    fn stopped(&self) -> bool {
        self.stop.is_some_and(|s| s.load(Ordering::Relaxed))
    }

    fn evaluate(&self, state: &GameState, player: Player) -> f64 {
        self.heuristic
            .evaluate(state.board(), player, state.config().win_length)
    }

    /// Pick a move for the current player of `state`.
    #[instrument(level = "debug", skip(self, state, rng), fields(player = ?state.current_player()))]
    pub fn best_move<R: Rng + ?Sized>(
        &self,
        state: &GameState,
        difficulty: Difficulty,
        rng: &mut R,
    ) -> Result<Move, SearchError> {
        if difficulty == Difficulty::Easy {
            return random_move(state, rng);
        }

        if state.board().piece_count() < 2 {
            if let Some(c) = opening_move(state) {
                debug!(cell = %c, "opening toward the center");
                return Ok(Move::Place(c));
            }
        }

        let ai = state.current_player();
        let moves = state.legal_moves();
        let Some(&first) = moves.first() else {
            return Err(SearchError::NoLegalMoves);
        };

        let mut best = first;
        let mut best_score = f64::NEG_INFINITY;
        for (mv, next) in successors(state, &moves, ai) {
            if self.stopped() {
                break;
            }
            let score = match difficulty {
                Difficulty::Hard => self.minimax(&next, 1, false, ai, ai.other()),
                _ => self.evaluate(&next, ai),
            };
            if score > best_score {
                best_score = score;
                best = mv;
            }
        }

        debug!(%best, score = best_score, candidates = moves.len(), "selected move");
        Ok(best)
    }

    /// Value of `state` for `perspective`, with `to_move` about to play.
    /// Leaves are depth 0, decided boards (infinite score) and finished games.
    pub fn minimax(
        &self,
        state: &GameState,
        depth: usize,
        maximizing: bool,
        perspective: Player,
        to_move: Player,
    ) -> f64 {
        let score = self.evaluate(state, perspective);
        if depth == 0 || score.is_infinite() || state.is_terminal() {
            return score;
        }

        let moves = state.moves_for(to_move);
        if moves.is_empty() {
            return score;
        }

        let mut best = if maximizing {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
        for (_, next) in successors(state, &moves, to_move) {
            if self.stopped() {
                break;
            }
            let value = self.minimax(&next, depth - 1, !maximizing, perspective, to_move.other());
            best = if maximizing {
                best.max(value)
            } else {
                best.min(value)
            };
        }
        best
    }
}

/// Move choice with the default threat heuristic.
pub fn best_move<R: Rng + ?Sized>(
    state: &GameState,
    difficulty: Difficulty,
    rng: &mut R,
) -> Result<Move, SearchError> {
    Searcher::new(&ThreatHeuristic::default()).best_move(state, difficulty, rng)
}

/// Minimax with the default threat heuristic.
pub fn minimax(
    state: &GameState,
    depth: usize,
    maximizing: bool,
    perspective: Player,
    to_move: Player,
) -> f64 {
    Searcher::new(&ThreatHeuristic::default()).minimax(state, depth, maximizing, perspective, to_move)
}

/// Difficulty-driven agent. With a think budget the search runs on a worker
/// thread under a watchdog.
pub struct MinimaxAgent {
    difficulty: Difficulty,
    heuristic: Arc<dyn Heuristic>,
    rng: StdRng,
    budget: Option<Duration>,
}

impl MinimaxAgent {
    pub fn new(difficulty: Difficulty) -> Self {
        Self::with_heuristic(difficulty, Arc::new(ThreatHeuristic::default()))
    }

    pub fn with_heuristic(difficulty: Difficulty, heuristic: Arc<dyn Heuristic>) -> Self {
        MinimaxAgent {
            difficulty,
            heuristic,
            rng: StdRng::from_os_rng(),
            budget: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn with_budget(mut self, budget: Duration) -> Self {
        self.budget = Some(budget);
        self
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }
}

impl Agent for MinimaxAgent {
    fn select_move(&mut self, state: &GameState) -> Result<Move, SearchError> {
        match self.budget {
            Some(budget) => spawn_search(
                state.clone(),
                self.difficulty,
                Arc::clone(&self.heuristic),
                self.rng.random(),
                budget,
            )
            .wait(),
            None => Searcher::new(self.heuristic.as_ref()).best_move(
                state,
                self.difficulty,
                &mut self.rng,
            ),
        }
    }

    fn name(&self) -> &str {
        match self.difficulty {
            Difficulty::Easy => "Minimax (Easy)",
            Difficulty::Medium => "Minimax (Medium)",
            Difficulty::Hard => "Minimax (Hard)",
        }
    }

    fn clone_agent(&self) -> Box<dyn Agent> {
        Box::new(MinimaxAgent {
            difficulty: self.difficulty,
            heuristic: Arc::clone(&self.heuristic),
            rng: StdRng::from_os_rng(),
            budget: self.budget,
        })
    }
}
