use crate::error::SearchError;
use crate::game::{GameState, Move};

/// Universal interface for computer players.
pub trait Agent: Send {
    /// Select a move for the current player of `state`.
    /// Fails only when the position has no legal move at all.
    fn select_move(&mut self, state: &GameState) -> Result<Move, SearchError>;

    /// Return the agent's display name.
    fn name(&self) -> &str;

    /// Clone the agent into a boxed trait object.
    fn clone_agent(&self) -> Box<dyn Agent>;
}
