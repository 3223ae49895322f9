use std::collections::VecDeque;

use serde::Serialize;

use crate::game::Player;

/// Result of a single match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchResult {
    pub winner: Option<Player>,
    pub game_length: usize,
}

/// Rolling match statistics over the most recent results.
pub struct MatchMetrics {
    results: VecDeque<MatchResult>,
    capacity: usize,
    total_matches: usize, // lifetime count, never capped
}

/// Aggregate view for printing or JSON output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchSummary {
    pub matches: usize,
    pub one_win_rate: f32,
    pub two_win_rate: f32,
    pub draw_rate: f32,
    pub average_length: f32,
}

impl MatchMetrics {
    pub fn with_capacity(capacity: usize) -> Self {
        MatchMetrics {
            results: VecDeque::with_capacity(capacity),
            capacity,
            total_matches: 0,
        }
    }

    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    pub fn record_match(&mut self, result: MatchResult) {
        self.total_matches += 1;
        self.results.push_back(result);
        if self.results.len() > self.capacity {
            self.results.pop_front();
        }
    }

    fn last(&self, last_n: usize) -> impl Iterator<Item = &MatchResult> {
        self.results.iter().rev().take(last_n)
    }

    fn rate(&self, last_n: usize, pred: impl Fn(&MatchResult) -> bool) -> f32 {
        let n = self.results.len().min(last_n);
        if n == 0 {
            return 0.0;
        }
        self.last(n).filter(|r| pred(r)).count() as f32 / n as f32
    }

    /// Win rate for `player` in the last N matches.
    pub fn win_rate(&self, player: Player, last_n: usize) -> f32 {
        self.rate(last_n, |r| r.winner == Some(player))
    }

    /// Draw rate in the last N matches.
    pub fn draw_rate(&self, last_n: usize) -> f32 {
        self.rate(last_n, |r| r.winner.is_none())
    }

    /// Average game length over the last N matches.
    pub fn average_game_length(&self, last_n: usize) -> f32 {
        let n = self.results.len().min(last_n);
        if n == 0 {
            return 0.0;
        }
        let total: usize = self.last(n).map(|r| r.game_length).sum();
        total as f32 / n as f32
    }

    pub fn total_matches(&self) -> usize {
        self.total_matches
    }

    /// Summary over every retained result.
    pub fn summary(&self) -> MatchSummary {
        let n = self.results.len();
        MatchSummary {
            matches: self.total_matches,
            one_win_rate: self.win_rate(Player::One, n),
            two_win_rate: self.win_rate(Player::Two, n),
            draw_rate: self.draw_rate(n),
            average_length: self.average_game_length(n),
        }
    }
}

impl Default for MatchMetrics {
    fn default() -> Self {
        Self::new()
    }
}
