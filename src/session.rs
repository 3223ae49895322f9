//! Live game owned by one front end: current state, undo history and the
//! computer's turn.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tracing::{debug, error, info};

use crate::ai::{best_move, spawn_search, Difficulty, SearchHandle, ThreatHeuristic};
use crate::config::GameConfig;
use crate::error::{MoveError, SearchError, UndoError};
use crate::game::{
    Board, Coord, GameOutcome, GameState, GameStatus, Gravity, Line, Move, Orientation, Player,
    Rotation, ShiftState,
};

/// What a front end needs to redraw after an accepted move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    pub board: Board,
    pub status: GameStatus,
    pub winning_lines: Vec<Line>,
}

pub struct GameSession {
    state: GameState,
    /// Snapshots taken before each accepted move, oldest first.
    history: Vec<GameState>,
    ai_player: Option<Player>,
    pending: Option<SearchHandle>,
}

impl GameSession {
    /// Two human players.
    pub fn new(config: GameConfig) -> Self {
        GameSession {
            state: GameState::initial(config),
            history: Vec::new(),
            ai_player: None,
            pending: None,
        }
    }

    /// One seat played by the computer; undo rewinds past its replies.
    pub fn with_ai(config: GameConfig, ai_player: Player) -> Self {
        GameSession {
            ai_player: Some(ai_player),
            ..GameSession::new(config)
        }
    }

    /// Start a fresh game under `config`, abandoning any search in flight.
    pub fn init_game(&mut self, config: GameConfig) {
        self.pending = None;
        self.state = GameState::initial(config);
        self.history.clear();
        info!(
            grid = config.grid_size,
            win = config.win_length,
            shifts = config.initial_shifts,
            "new game"
        );
    }

    /// Start over with the same rules.
    pub fn reset(&mut self) {
        let config = *self.state.config();
        self.init_game(config);
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        self.state.config()
    }

    pub fn ai_player(&self) -> Option<Player> {
        self.ai_player
    }

    pub fn board_snapshot(&self) -> Board {
        self.state.board().clone()
    }

    pub fn gravity(&self) -> Gravity {
        self.state.gravity()
    }

    pub fn gravity_vector(&self) -> [i8; 3] {
        self.state.gravity().to_vector()
    }

    pub fn orientation(&self) -> Orientation {
        self.state.orientation()
    }

    pub fn status(&self) -> GameStatus {
        self.state.status()
    }

    pub fn current_player(&self) -> Player {
        self.state.current_player()
    }

    pub fn shift_state(&self, player: Player) -> ShiftState {
        self.state.shift_state(player)
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn legal_placements(&self) -> Vec<Coord> {
        self.state.legal_placements()
    }

    pub fn legal_rotations(&self) -> Vec<Rotation> {
        self.state.legal_rotations()
    }

    pub fn place(&mut self, coord: Coord) -> Result<MoveOutcome, MoveError> {
        self.apply(Move::Place(coord))
    }

    pub fn rotate(&mut self, rotation: Rotation) -> Result<MoveOutcome, MoveError> {
        self.apply(Move::Rotate(rotation))
    }

    /// Apply a move for the current player. A rejected move leaves the state
    /// and the history untouched.
    pub fn apply(&mut self, mv: Move) -> Result<MoveOutcome, MoveError> {
        if self.pending.is_some() {
            return Err(MoveError::AiThinking);
        }
        self.commit(mv)
    }

    fn commit(&mut self, mv: Move) -> Result<MoveOutcome, MoveError> {
        let next = self.state.apply_move(mv)?;
        self.history.push(std::mem::replace(&mut self.state, next));

        match self.state.outcome() {
            Some(GameOutcome::Winner(p)) => {
                info!(winner = p.name(), moves = self.history.len(), "game over")
            }
            Some(GameOutcome::Draw) => info!(moves = self.history.len(), "game drawn"),
            None => {}
        }
        Ok(self.move_outcome())
    }

    fn move_outcome(&self) -> MoveOutcome {
        MoveOutcome {
            board: self.board_snapshot(),
            status: self.status(),
            winning_lines: self.state.winning_lines().to_vec(),
        }
    }

    /// Rewind one move. When that lands on the computer's turn, rewind its
    /// move as well so the human is to play again.
    pub fn undo(&mut self) -> Result<(), UndoError> {
        if self.pending.is_some() {
            return Err(UndoError::AiThinking);
        }
        let previous = self.history.pop().ok_or(UndoError::NoHistoryToUndo)?;
        self.state = previous;

        if Some(self.state.current_player()) == self.ai_player {
            if let Some(earlier) = self.history.pop() {
                self.state = earlier;
            }
        }
        info!(remaining = self.history.len(), "undo");
        Ok(())
    }

    /// Search the current position synchronously. The caller decides whether
    /// to apply the result.
    pub fn request_ai_move(&self, difficulty: Difficulty) -> Result<Move, SearchError> {
        best_move(&self.state, difficulty, &mut rand::rng())
    }

    /// Start searching for the current player on a worker thread. Human moves
    /// and undo are refused until `finish_ai_turn` or `poll_ai_turn` delivers.
    /// With a computer seat set, only that seat's turn can be searched.
    pub fn start_ai_turn(&mut self, difficulty: Difficulty, budget: Duration) -> Result<(), MoveError> {
        if self.pending.is_some() {
            return Err(MoveError::AiThinking);
        }
        if self.state.is_terminal() {
            return Err(MoveError::GameAlreadyOver);
        }
        let to_move = self.state.current_player();
        if self.ai_player.is_some_and(|ai| ai != to_move) {
            return Err(MoveError::NotAiTurn(to_move));
        }
        debug!(?difficulty, budget_ms = budget.as_millis() as u64, "computer thinking");
        self.pending = Some(spawn_search(
            self.state.clone(),
            difficulty,
            Arc::new(ThreatHeuristic::default()),
            rand::rng().random(),
            budget,
        ));
        Ok(())
    }

    pub fn is_ai_thinking(&self) -> bool {
        self.pending.is_some()
    }

    /// Block until the computer's move is ready and apply it. `Ok(None)`
    /// means the search produced nothing to play.
    pub fn finish_ai_turn(&mut self) -> Result<Option<MoveOutcome>, MoveError> {
        let handle = self.pending.take().ok_or(MoveError::NoAiTurnPending)?;
        self.deliver(handle.wait())
    }

    /// Non-blocking variant of `finish_ai_turn`: `Ok(None)` while the
    /// computer is still thinking.
    pub fn poll_ai_turn(&mut self) -> Result<Option<MoveOutcome>, MoveError> {
        let handle = self.pending.as_mut().ok_or(MoveError::NoAiTurnPending)?;
        match handle.try_result() {
            None => Ok(None),
            Some(result) => {
                self.pending = None;
                self.deliver(result)
            }
        }
    }

    fn deliver(&mut self, result: Result<Move, SearchError>) -> Result<Option<MoveOutcome>, MoveError> {
        match result {
            Ok(mv) => {
                debug!(%mv, "computer move");
                self.commit(mv).map(Some)
            }
            Err(e) => {
                error!(error = %e, "computer produced no move");
                Ok(None)
            }
        }
    }
}
