use serde::{Deserialize, Serialize};

use super::board::Cell;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    One,
    Two,
}

impl Player {
    pub const ALL: [Player; 2] = [Player::One, Player::Two];

    /// Get the other player
    pub fn other(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Convert player to cell type
    pub fn to_cell(self) -> Cell {
        match self {
            Player::One => Cell::One,
            Player::Two => Cell::Two,
        }
    }

    /// Numeric id (1 or 2)
    pub fn id(self) -> u8 {
        match self {
            Player::One => 1,
            Player::Two => 2,
        }
    }

    pub fn from_id(id: u8) -> Option<Player> {
        match id {
            1 => Some(Player::One),
            2 => Some(Player::Two),
            _ => None,
        }
    }

    /// Slot in per-player arrays
    pub(crate) fn index(self) -> usize {
        usize::from(self.id() - 1)
    }

    /// Get player name for display
    pub fn name(self) -> &'static str {
        match self {
            Player::One => "Red",
            Player::Two => "Blue",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_other_player() {
        assert_eq!(Player::One.other(), Player::Two);
        assert_eq!(Player::Two.other(), Player::One);
    }

    #[test]
    fn test_other_matches_three_minus_id() {
        for p in Player::ALL {
            assert_eq!(p.other().id(), 3 - p.id());
        }
    }

    #[test]
    fn test_id_roundtrip() {
        assert_eq!(Player::from_id(1), Some(Player::One));
        assert_eq!(Player::from_id(2), Some(Player::Two));
        assert_eq!(Player::from_id(0), None);
        assert_eq!(Player::from_id(3), None);
    }

    #[test]
    fn test_player_name() {
        assert_eq!(Player::One.name(), "Red");
        assert_eq!(Player::Two.name(), "Blue");
    }
}
