//! Per-name score table
//!
//! Entries are created when a name first spawns and are never removed, so
//! eliminated fighters keep their historical score.

use serde::{Deserialize, Serialize};

/// A single leaderboard row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: u64,
}

/// Leaderboard keyed by fighter name, in first-seen order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register a name with a zero score. Existing names keep their score.
    pub fn register(&mut self, name: &str) {
        if self.position(name).is_none() {
            self.entries.push(LeaderboardEntry {
                name: name.to_string(),
                score: 0,
            });
        }
    }

    /// Add points to a name, registering it if needed. Returns the new score.
    pub fn award(&mut self, name: &str, points: u64) -> u64 {
        let idx = match self.position(name) {
            Some(i) => i,
            None => {
                self.register(name);
                self.entries.len() - 1
            }
        };
        let entry = &mut self.entries[idx];
        entry.score = entry.score.saturating_add(points);
        entry.score
    }

    /// Score for a name (None if it never spawned)
    pub fn score(&self, name: &str) -> Option<u64> {
        self.position(name).map(|i| self.entries[i].score)
    }

    /// Top `n` entries, highest score first. Ties keep first-seen order.
    pub fn top(&self, n: usize) -> Vec<LeaderboardEntry> {
        let mut sorted = self.entries.clone();
        // Stable sort keeps insertion order among equal scores
        sorted.sort_by(|a, b| b.score.cmp(&a.score));
        sorted.truncate(n);
        sorted
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_does_not_reset() {
        let mut board = Leaderboard::new();
        board.register("alice");
        board.award("alice", 10);
        board.register("alice");
        assert_eq!(board.score("alice"), Some(10));
        assert_eq!(board.len(), 1);
    }

    #[test]
    fn test_top_orders_by_score_then_first_seen() {
        let mut board = Leaderboard::new();
        for name in ["a", "b", "c", "d"] {
            board.register(name);
        }
        board.award("c", 20);
        board.award("b", 10);
        board.award("d", 10);

        let top: Vec<_> = board.top(3).into_iter().map(|e| e.name).collect();
        assert_eq!(top, vec!["c", "b", "d"]);
    }

    #[test]
    fn test_unknown_name() {
        let board = Leaderboard::new();
        assert!(board.is_empty());
        assert_eq!(board.score("ghost"), None);
        assert!(board.top(5).is_empty());
    }
}
