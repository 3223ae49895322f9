use serde::Serialize;
use tracing::debug;

use crate::ai::Agent;
use crate::config::GameConfig;
use crate::error::ArenaError;
use crate::game::{GameOutcome, GameStatus, Move, Player};
use crate::session::GameSession;

use super::metrics::MatchResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayedMove {
    pub player: Player,
    #[serde(rename = "move")]
    pub mv: Move,
}

/// Full transcript of one game between two agents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchRecord {
    pub one: String,
    pub two: String,
    pub moves: Vec<PlayedMove>,
    pub outcome: GameOutcome,
    /// Lines on the board when the game ended, both players together.
    pub lines: usize,
}

impl MatchRecord {
    pub fn winner(&self) -> Option<Player> {
        match self.outcome {
            GameOutcome::Winner(p) => Some(p),
            GameOutcome::Draw => None,
        }
    }

    pub fn result(&self) -> MatchResult {
        MatchResult {
            winner: self.winner(),
            game_length: self.moves.len(),
        }
    }
}

/// Play one game to the end through a `GameSession`, `one` moving first.
pub fn play_match(
    config: GameConfig,
    one: &mut dyn Agent,
    two: &mut dyn Agent,
    max_moves: usize,
) -> Result<MatchRecord, ArenaError> {
    let mut session = GameSession::new(config);
    let mut moves = Vec::new();

    let outcome = loop {
        let player = match session.status() {
            GameStatus::AwaitingMove(p) => p,
            GameStatus::Won(p) => break GameOutcome::Winner(p),
            GameStatus::Draw => break GameOutcome::Draw,
        };
        if moves.len() >= max_moves {
            return Err(ArenaError::MoveLimit(max_moves));
        }

        let mv = match player {
            Player::One => one.select_move(session.state())?,
            Player::Two => two.select_move(session.state())?,
        };
        session
            .apply(mv)
            .map_err(|source| ArenaError::IllegalMove { player, mv, source })?;
        debug!(player = player.name(), %mv, "arena move");
        moves.push(PlayedMove { player, mv });
    };

    Ok(MatchRecord {
        one: one.name().to_string(),
        two: two.name().to_string(),
        moves,
        outcome,
        lines: session.state().winning_lines().len(),
    })
}

/// Derive a deterministic seed for a given match index.
pub fn match_seed(base_seed: u64, match_index: usize) -> u64 {
    // FNV-1a style mixing
    let mut hash = base_seed ^ 0x517cc1b727220a95;
    let index = match_index as u64;
    hash = hash.wrapping_mul(0x100000001b3);
    hash ^= index;
    hash = hash.wrapping_mul(0x100000001b3);
    hash ^= index >> 32;
    hash
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{Difficulty, MinimaxAgent, RandomAgent};
    use crate::error::SearchError;
    use crate::game::{Coord, GameState};

    #[test]
    fn test_random_match_terminates() {
        let mut one = RandomAgent::with_seed(1);
        let mut two = RandomAgent::with_seed(2);
        let record = play_match(GameConfig::CLASSIC, &mut one, &mut two, 1_000).unwrap();
        assert!(!record.moves.is_empty());
        assert_eq!(record.moves[0].player, Player::One);
        assert_eq!(record.result().game_length, record.moves.len());
        if record.winner().is_some() {
            assert!(record.lines > 0);
        }
    }

    #[test]
    fn test_match_against_scripted_agent_terminates() {
        // Blue only ever plays the first legal move
        struct FirstMove;
        impl Agent for FirstMove {
            fn select_move(&mut self, state: &GameState) -> Result<Move, SearchError> {
                state.legal_moves().first().copied().ok_or(SearchError::NoLegalMoves)
            }
            fn name(&self) -> &str {
                "First"
            }
            fn clone_agent(&self) -> Box<dyn Agent> {
                Box::new(FirstMove)
            }
        }

        let mut hard = MinimaxAgent::new(Difficulty::Hard).with_seed(3);
        let record = play_match(GameConfig::TINY_CUBE, &mut hard, &mut FirstMove, 200).unwrap();
        assert_eq!(record.two, "First");
        assert!(record.moves.len() <= 27 + 4);
    }

    #[test]
    fn test_move_limit() {
        let mut one = RandomAgent::with_seed(1);
        let mut two = RandomAgent::with_seed(2);
        let err = play_match(GameConfig::CLASSIC, &mut one, &mut two, 3).unwrap_err();
        assert!(matches!(err, ArenaError::MoveLimit(3)));
    }

    #[test]
    fn test_illegal_move_is_reported() {
        struct Stubborn;
        impl Agent for Stubborn {
            fn select_move(&mut self, _state: &GameState) -> Result<Move, SearchError> {
                Ok(Move::Place(Coord::new(0, 0, 0)))
            }
            fn name(&self) -> &str {
                "Stubborn"
            }
            fn clone_agent(&self) -> Box<dyn Agent> {
                Box::new(Stubborn)
            }
        }

        let err = play_match(GameConfig::CLASSIC, &mut Stubborn, &mut Stubborn, 10).unwrap_err();
        assert!(matches!(
            err,
            ArenaError::IllegalMove {
                player: Player::Two,
                ..
            }
        ));
    }

    #[test]
    fn test_record_serializes() {
        let mut one = RandomAgent::with_seed(5);
        let mut two = RandomAgent::with_seed(6);
        let record = play_match(GameConfig::TINY_CUBE, &mut one, &mut two, 1_000).unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["one"], "Random");
        assert_eq!(json["moves"][0]["player"], "one");
        assert!(json["moves"][0]["move"]["type"].is_string());
    }

    #[test]
    fn test_match_seed_deterministic() {
        assert_eq!(match_seed(42, 100), match_seed(42, 100));
    }

    #[test]
    fn test_match_seed_varies() {
        let s1 = match_seed(42, 0);
        let s2 = match_seed(42, 1);
        let s3 = match_seed(42, 2);
        assert_ne!(s1, s2);
        assert_ne!(s2, s3);
        assert_ne!(s1, s3);
        assert_ne!(match_seed(1, 0), match_seed(2, 0));
    }
}
