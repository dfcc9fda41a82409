//! High score leaderboard
//!
//! Keeps each gamertag's best survival time, ten players at most. The
//! game-over screen shows the top 5.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::sim::RoundSummary;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// Entries shown on the game-over screen
pub const SHOWN_HIGH_SCORES: usize = 5;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub gamertag: String,
    /// Seconds survived
    pub score: u64,
    /// Waves reached
    pub waves: u32,
    /// Unix timestamp (seconds) when achieved
    pub timestamp: u64,
}

/// High score leaderboard, sorted by score descending
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a new player's score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Get the rank a new player's score would achieve (1-indexed, None if it
    /// doesn't qualify). Ties rank below existing entries.
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Entry for a gamertag, if it is on the board
    pub fn entry_for(&self, gamertag: &str) -> Option<&HighScoreEntry> {
        self.entries.iter().find(|e| e.gamertag == gamertag)
    }

    /// Record a finished round under its gamertag. A player keeps one entry,
    /// replaced (timestamp included) only when the new score is higher.
    /// Returns the rank achieved (1-indexed), or None if the board did not
    /// change.
    pub fn add_score(&mut self, round: &RoundSummary, timestamp: u64) -> Option<usize> {
        if let Some(i) = self.entries.iter().position(|e| e.gamertag == round.gamertag) {
            if round.score <= self.entries[i].score {
                log::debug!(
                    "'{}' keeps best of {}s over {}s",
                    round.gamertag,
                    self.entries[i].score,
                    round.score
                );
                return None;
            }
            self.entries.remove(i);
        }
        let rank = self.potential_rank(round.score)?;
        self.entries.insert(
            rank - 1,
            HighScoreEntry {
                gamertag: round.gamertag.clone(),
                score: round.score,
                waves: round.waves,
                timestamp,
            },
        );
        self.entries.truncate(MAX_HIGH_SCORES);
        log::info!("'{}' placed #{rank} with {}s", round.gamertag, round.score);
        Some(rank)
    }

    /// Best `n` entries
    pub fn top(&self, n: usize) -> &[HighScoreEntry] {
        &self.entries[..n.min(self.entries.len())]
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Load the leaderboard from a JSON file, starting fresh if it is missing
    /// or unreadable
    pub fn load_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let Ok(json) = fs::read_to_string(path) else {
            log::info!("No high scores found, starting fresh");
            return Self::new();
        };
        match serde_json::from_str::<HighScores>(&json) {
            Ok(mut scores) => {
                scores.entries.sort_by(|a, b| b.score.cmp(&a.score));
                scores.entries.truncate(MAX_HIGH_SCORES);
                log::info!("Loaded {} high scores", scores.entries.len());
                scores
            }
            Err(e) => {
                log::warn!("Ignoring malformed high scores {}: {e}", path.display());
                Self::new()
            }
        }
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(io::Error::other)?;
        fs::write(path.as_ref(), json)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round(tag: &str, score: u64) -> RoundSummary {
        RoundSummary {
            gamertag: tag.into(),
            score,
            waves: (score / 60) as u32,
        }
    }

    #[test]
    fn test_sorted_insert_and_rank() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_score(&round("a", 50), 1), Some(1));
        assert_eq!(scores.add_score(&round("b", 90), 2), Some(1));
        assert_eq!(scores.add_score(&round("c", 70), 3), Some(2));
        let tags: Vec<_> = scores.entries.iter().map(|e| e.gamertag.as_str()).collect();
        assert_eq!(tags, ["b", "c", "a"]);
        assert_eq!(scores.top_score(), Some(90));
    }

    fn board(scores: &HighScores) -> Vec<(&str, u64)> {
        scores
            .entries
            .iter()
            .map(|e| (e.gamertag.as_str(), e.score))
            .collect()
    }

    #[test]
    fn test_zero_second_round_is_recorded() {
        let mut scores = HighScores::new();
        assert!(scores.qualifies(0));
        assert_eq!(scores.add_score(&round("a", 0), 1), Some(1));
        assert_eq!(board(&scores), [("a", 0)]);
        // Ties go below the existing entry
        assert_eq!(scores.add_score(&round("b", 0), 2), Some(2));
        assert_eq!(board(&scores), [("a", 0), ("b", 0)]);
    }

    #[test]
    fn test_one_entry_per_gamertag() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_score(&round("ace", 50), 100), Some(1));
        assert_eq!(scores.add_score(&round("ace", 30), 200), None);
        assert_eq!(scores.add_score(&round("bob", 0), 300), Some(2));
        assert_eq!(board(&scores), [("ace", 50), ("bob", 0)]);
        // A worse round leaves the old timestamp
        assert_eq!(scores.entry_for("ace").map(|e| e.timestamp), Some(100));

        // Equal score is not an improvement
        assert_eq!(scores.add_score(&round("bob", 0), 350), None);
        assert_eq!(scores.entry_for("bob").map(|e| e.timestamp), Some(300));

        assert_eq!(scores.add_score(&round("bob", 70), 400), Some(1));
        assert_eq!(board(&scores), [("bob", 70), ("ace", 50)]);
        let bob = scores.entry_for("bob").unwrap();
        assert_eq!((bob.score, bob.timestamp, bob.waves), (70, 400, 1));
    }

    #[test]
    fn test_improving_on_a_full_board() {
        let mut scores = HighScores::new();
        for s in 1..=10u64 {
            scores.add_score(&round(&format!("p{s}"), s * 10), s);
        }
        // The lowest player improving keeps ten entries and moves up
        assert_eq!(scores.add_score(&round("p1", 55), 11), Some(6));
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.entries.last().map(|e| e.gamertag.as_str()), Some("p2"));
    }

    #[test]
    fn test_keeps_ten_and_top_five() {
        let mut scores = HighScores::new();
        for s in 1..=15 {
            scores.add_score(&round(&format!("p{s}"), s * 10), s);
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.entries.last().map(|e| e.score), Some(60));
        assert!(!scores.qualifies(60));
        assert_eq!(scores.potential_rank(61), Some(10));
        assert_eq!(scores.potential_rank(500), Some(1));

        let shown: Vec<_> = scores.top(SHOWN_HIGH_SCORES).iter().map(|e| e.score).collect();
        assert_eq!(shown, [150, 140, 130, 120, 110]);
        assert_eq!(HighScores::new().top(5).len(), 0);
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!(
            "astro_dodger_{}_scores.json",
            std::process::id()
        ));
        let mut scores = HighScores::new();
        scores.add_score(&round("ace", 42), 1_700_000_000);
        scores.save_to(&path).unwrap();
        let loaded = HighScores::load_from(&path);
        assert_eq!(loaded.entries, scores.entries);
        let _ = fs::remove_file(&path);
    }
}
