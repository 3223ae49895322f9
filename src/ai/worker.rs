//! Off-thread move search with a wall-clock watchdog.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::warn;

use crate::error::SearchError;
use crate::game::{GameState, Move};

use super::heuristic::Heuristic;
use super::search::{Difficulty, Searcher};

/// Move used when a search overruns: the first placement, else the first
/// rotation.
pub fn fallback_move(state: &GameState) -> Option<Move> {
    state
        .legal_placements()
        .first()
        .map(|&c| Move::Place(c))
        .or_else(|| state.legal_rotations().first().map(|&r| Move::Rotate(r)))
}

/// A search running on its own thread over a snapshot of the game.
///
/// Dropping the handle raises the stop flag so an abandoned search winds
/// down on its own.
pub struct SearchHandle {
    rx: Receiver<Result<Move, SearchError>>,
    stop: Arc<AtomicBool>,
    fallback: Option<Move>,
    deadline: Instant,
    budget: Duration,
}

/// Start searching `state` on a new thread.
pub fn spawn_search(
    state: GameState,
    difficulty: Difficulty,
    heuristic: Arc<dyn Heuristic>,
    seed: u64,
    budget: Duration,
) -> SearchHandle {
    let (tx, rx) = mpsc::channel();
    let stop = Arc::new(AtomicBool::new(false));
    let fallback = fallback_move(&state);
    let flag = Arc::clone(&stop);

    thread::spawn(move || {
        let mut rng = StdRng::seed_from_u64(seed);
        let result = Searcher::new(heuristic.as_ref())
            .with_stop_flag(&flag)
            .best_move(&state, difficulty, &mut rng);
        // the handle may have timed out and been dropped already
        let _ = tx.send(result);
    });

    SearchHandle {
        rx,
        stop,
        fallback,
        deadline: Instant::now() + budget,
        budget,
    }
}

impl SearchHandle {
    /// Non-blocking poll. `None` while the search is still within budget.
    pub fn try_result(&mut self) -> Option<Result<Move, SearchError>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Disconnected) => Some(Err(SearchError::WorkerDisconnected)),
            Err(TryRecvError::Empty) if Instant::now() >= self.deadline => Some(self.expire()),
            Err(TryRecvError::Empty) => None,
        }
    }

    /// Block until the search answers or the budget runs out.
    pub fn wait(self) -> Result<Move, SearchError> {
        let remaining = self.deadline.saturating_duration_since(Instant::now());
        match self.rx.recv_timeout(remaining) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => self.expire(),
            Err(RecvTimeoutError::Disconnected) => Err(SearchError::WorkerDisconnected),
        }
    }

    fn expire(&self) -> Result<Move, SearchError> {
        self.stop.store(true, Ordering::Relaxed);
        warn!(
            budget_ms = self.budget.as_millis() as u64,
            fallback = ?self.fallback,
            "search exceeded its time budget, playing fallback move"
        );
        self.fallback.ok_or(SearchError::NoLegalMoves)
    }
}

impl Drop for SearchHandle {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}
