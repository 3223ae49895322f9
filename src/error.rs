use std::path::PathBuf;

use crate::game::{Coord, Move, Player, Rotation};

/// Reasons a placement or rotation is rejected. State is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("cell {coord} is outside a board of size {size}")]
    OutOfBounds { coord: Coord, size: usize },

    #[error("cell {0} is already occupied")]
    CellOccupied(Coord),

    #[error("cell {coord} is not the landing cell of its column (expected {landing})")]
    Unsupported { coord: Coord, landing: Coord },

    #[error("{0} is not one of the offered cube turns")]
    NotCanonical(Rotation),

    #[error("no gravity shifts left")]
    NoShiftsRemaining,

    #[error("shift on cooldown for {0} more turn(s)")]
    ShiftOnCooldown(u32),

    #[error("the game is already over")]
    GameAlreadyOver,

    #[error("the computer is still thinking")]
    AiThinking,

    #[error("no computer turn is in progress")]
    NoAiTurnPending,

    #[error("it is {}'s turn, not the computer's", .0.name())]
    NotAiTurn(Player),
}

/// Errors from rewinding a session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UndoError {
    #[error("there are no moves to undo")]
    NoHistoryToUndo,

    #[error("cannot undo while the computer is thinking")]
    AiThinking,
}

/// Errors from move search.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// Only finished games have zero legal moves.
    #[error("no legal moves available")]
    NoLegalMoves,

    #[error("search worker exited without a result")]
    WorkerDisconnected,
}

/// Errors that can occur while playing arena matches.
#[derive(Debug, thiserror::Error)]
pub enum ArenaError {
    #[error("{player:?} selected illegal move {mv}: {source}")]
    IllegalMove {
        player: Player,
        mv: Move,
        source: MoveError,
    },

    #[error("search failed: {0}")]
    Search(#[from] SearchError),

    #[error("game exceeded {0} moves")]
    MoveLimit(usize),
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Angle, Axis};

    #[test]
    fn test_move_error_display() {
        let err = MoveError::OutOfBounds {
            coord: Coord::new(4, 0, 1),
            size: 4,
        };
        assert_eq!(err.to_string(), "cell (4, 0, 1) is outside a board of size 4");
        assert_eq!(
            MoveError::ShiftOnCooldown(2).to_string(),
            "shift on cooldown for 2 more turn(s)"
        );
        assert_eq!(
            MoveError::NotCanonical(Rotation::new(Axis::Y, Angle::Pos90)).to_string(),
            "Y +90 is not one of the offered cube turns"
        );
        assert_eq!(
            MoveError::NotAiTurn(Player::One).to_string(),
            "it is Red's turn, not the computer's"
        );
    }

    #[test]
    fn test_undo_error_display() {
        assert_eq!(
            UndoError::NoHistoryToUndo.to_string(),
            "there are no moves to undo"
        );
    }

    #[test]
    fn test_arena_error_display() {
        let err = ArenaError::IllegalMove {
            player: Player::Two,
            mv: Move::Place(Coord::new(0, 0, 0)),
            source: MoveError::CellOccupied(Coord::new(0, 0, 0)),
        };
        assert_eq!(
            err.to_string(),
            "Two selected illegal move place (0, 0, 0): cell (0, 0, 0) is already occupied"
        );
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Validation("grid_size must be in [2, 8]".to_string());
        assert_eq!(
            err.to_string(),
            "config validation error: grid_size must be in [2, 8]"
        );
    }
}
