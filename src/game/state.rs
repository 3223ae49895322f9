use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::GameConfig;
use crate::error::MoveError;

use super::board::{Board, Coord};
use super::gravity::{compact, Gravity};
use super::moves::{self, Move, ShiftState};
use super::orientation::{Orientation, Rotation};
use super::player::Player;
use super::win::{find_wins, Line};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameOutcome {
    Winner(Player),
    Draw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    AwaitingMove(Player),
    Won(Player),
    Draw,
}

/// Complete rules state of one game. Transitions either return a new state
/// (`apply_move`) or update in place (`apply_move_mut`); a rejected move never
/// changes anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    config: GameConfig,
    board: Board,
    current_player: Player,
    orientation: Orientation,
    gravity: Gravity,
    shifts: [ShiftState; 2],
    outcome: Option<GameOutcome>,
    winning_lines: Vec<Line>,
}

impl GameState {
    /// Create initial game state
    pub fn initial(config: GameConfig) -> Self {
        GameState {
            config,
            board: Board::new(config.grid_size),
            current_player: Player::One, // Red starts
            orientation: Orientation::IDENTITY,
            gravity: Gravity::DOWN,
            shifts: [ShiftState::new(config.initial_shifts); 2],
            outcome: None,
            winning_lines: Vec::new(),
        }
    }

    /// Start from an arbitrary position under default gravity. The board is
    /// taken as-is (not compacted) and checked for a finished game.
    ///
    /// Panics if the board size differs from `config.grid_size`.
    pub fn from_board(config: GameConfig, board: Board, current_player: Player) -> Self {
        assert_eq!(board.size(), config.grid_size, "board size must match config");
        let mut state = GameState {
            board,
            current_player,
            ..GameState::initial(config)
        };
        state.settle();
        state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Get current player
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// Get reference to board
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn gravity(&self) -> Gravity {
        self.gravity
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn shift_state(&self, player: Player) -> ShiftState {
        self.shifts[player.index()]
    }

    /// Get game outcome if game is over
    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    /// Lines of both players found when the game ended.
    pub fn winning_lines(&self) -> &[Line] {
        &self.winning_lines
    }

    /// Check if game is over
    pub fn is_terminal(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn status(&self) -> GameStatus {
        match self.outcome {
            None => GameStatus::AwaitingMove(self.current_player),
            Some(GameOutcome::Winner(p)) => GameStatus::Won(p),
            Some(GameOutcome::Draw) => GameStatus::Draw,
        }
    }

    /// Landing cells under the current gravity
    pub fn legal_placements(&self) -> Vec<Coord> {
        if self.is_terminal() {
            return Vec::new();
        }
        moves::legal_placements(&self.board, self.gravity)
    }

    /// Rotations open to `player` given their budget and cooldown.
    pub fn rotations_for(&self, player: Player) -> Vec<Rotation> {
        if self.is_terminal() {
            return Vec::new();
        }
        moves::legal_rotations(&self.shifts[player.index()], &self.config)
    }

    pub fn legal_rotations(&self) -> Vec<Rotation> {
        self.rotations_for(self.current_player)
    }

    /// Moves `player` could make here: placements first, then rotations.
    pub fn moves_for(&self, player: Player) -> Vec<Move> {
        let mut moves: Vec<Move> = self
            .legal_placements()
            .into_iter()
            .map(Move::Place)
            .collect();
        moves.extend(self.rotations_for(player).into_iter().map(Move::Rotate));
        moves
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        self.moves_for(self.current_player)
    }

    /// Apply a move and return new state (immutable)
    pub fn apply_move(&self, mv: Move) -> Result<GameState, MoveError> {
        let mut next = self.clone();
        next.apply_move_mut(mv)?;
        Ok(next)
    }

    /// Apply a move on behalf of `player` regardless of whose turn it is.
    /// Search uses this to alternate sides independently of turn rules.
    pub fn simulate(&self, mv: Move, player: Player) -> Result<GameState, MoveError> {
        let mut next = self.clone();
        next.current_player = player;
        next.apply_move_mut(mv)?;
        Ok(next)
    }

    /// Apply move mutably
    pub fn apply_move_mut(&mut self, mv: Move) -> Result<(), MoveError> {
        match mv {
            Move::Place(c) => self.place(c),
            Move::Rotate(r) => self.rotate(r),
        }
    }

    fn check_place(&self, c: Coord) -> Result<(), MoveError> {
        if self.is_terminal() {
            return Err(MoveError::GameAlreadyOver);
        }
        if !self.board.in_bounds(c) {
            return Err(MoveError::OutOfBounds {
                coord: c,
                size: self.board.size(),
            });
        }
        if !self.board.get(c).is_empty() {
            return Err(MoveError::CellOccupied(c));
        }
        let (u_axis, v_axis) = self.gravity.axis.transverse();
        match moves::landing_cell(&self.board, self.gravity, c.get(u_axis), c.get(v_axis)) {
            Some(landing) if landing != c => Err(MoveError::Unsupported { coord: c, landing }),
            _ => Ok(()),
        }
    }

    fn place(&mut self, c: Coord) -> Result<(), MoveError> {
        self.check_place(c)?;
        let player = self.current_player;
        self.board.set(c, player.to_cell());
        debug!(player = player.name(), cell = %c, "placed piece");

        if !self.settle() {
            self.switch_player();
        }
        Ok(())
    }

    fn check_rotate(&self, rotation: Rotation) -> Result<(), MoveError> {
        if self.is_terminal() {
            return Err(MoveError::GameAlreadyOver);
        }
        if !rotation.is_canonical() {
            return Err(MoveError::NotCanonical(rotation));
        }
        let shift = self.shifts[self.current_player.index()];
        if !self.config.shifting_enabled() || shift.shifts_remaining == 0 {
            return Err(MoveError::NoShiftsRemaining);
        }
        if shift.cooldown_turns > 0 {
            return Err(MoveError::ShiftOnCooldown(shift.cooldown_turns));
        }
        Ok(())
    }

    fn rotate(&mut self, rotation: Rotation) -> Result<(), MoveError> {
        self.check_rotate(rotation)?;
        let shift = &mut self.shifts[self.current_player.index()];
        shift.shifts_remaining -= 1;
        shift.cooldown_turns = self.config.shift_cooldown;

        self.orientation = self.orientation.rotated(rotation);
        self.gravity = self.orientation.gravity();
        self.board = compact(&self.board, self.gravity);
        debug!(
            player = self.current_player.name(),
            %rotation,
            gravity = %self.gravity,
            "rotated cube"
        );

        if !self.settle() && self.config.shift_ends_turn {
            self.switch_player();
        }
        Ok(())
    }

    /// Run line detection; records the outcome and returns true if the game
    /// just ended.
    fn settle(&mut self) -> bool {
        let scan = find_wins(&self.board, self.config.win_length);
        match scan.verdict() {
            Some(outcome) => {
                self.outcome = Some(outcome);
                self.winning_lines = scan.all_lines();
                true
            }
            None => false,
        }
    }

    fn switch_player(&mut self) {
        self.current_player = self.current_player.other();
        let shift = &mut self.shifts[self.current_player.index()];
        shift.cooldown_turns = shift.cooldown_turns.saturating_sub(1);
    }
}
