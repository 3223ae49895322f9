use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::SearchError;
use crate::game::{GameState, Move};

use super::agent::Agent;

/// Uniform pick over every legal placement and rotation.
pub fn random_move<R: Rng + ?Sized>(state: &GameState, rng: &mut R) -> Result<Move, SearchError> {
    let moves = state.legal_moves();
    if moves.is_empty() {
        return Err(SearchError::NoLegalMoves);
    }
    Ok(moves[rng.random_range(0..moves.len())])
}

/// An agent that selects uniformly at random from legal moves.
pub struct RandomAgent {
    rng: StdRng,
}

impl RandomAgent {
    pub fn new() -> Self {
        RandomAgent {
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        RandomAgent {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for RandomAgent {
    fn select_move(&mut self, state: &GameState) -> Result<Move, SearchError> {
        random_move(state, &mut self.rng)
    }

    fn name(&self) -> &str {
        "Random"
    }

    fn clone_agent(&self) -> Box<dyn Agent> {
        Box::new(RandomAgent::new())
    }
}
