//! High score leaderboard system
//!
//! Persisted as JSON in the key-value store, tracks the top 10 scores.

use serde::{Deserialize, Serialize};

use crate::platform::storage::{KeyValueStore, StoreError};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// Names longer than this are truncated
pub const MAX_NAME_LEN: usize = 5;

/// Recorded for a blank name
pub const ANONYMOUS_NAME: &str = "???";

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Player's name (at most `MAX_NAME_LEN` characters)
    pub name: String,
    /// Final score of the run
    pub score: u64,
}

/// High score leaderboard, sorted descending by score
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

/// Trim and truncate a typed name; blank becomes `ANONYMOUS_NAME`
pub fn normalize_name(raw: &str) -> String {
    let name: String = raw.trim().chars().take(MAX_NAME_LEN).collect();
    if name.is_empty() {
        ANONYMOUS_NAME.to_string()
    } else {
        name
    }
}

impl HighScores {
    /// Store key
    pub const STORAGE_KEY: &'static str = "orb_siege_highscores";

    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Check if score beats the lowest entry
        self.entries.last().is_none_or(|e| score > e.score)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add a new score to the leaderboard (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add_score(&mut self, name: &str, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        self.entries.push(HighScoreEntry {
            name: normalize_name(name),
            score,
        });
        // Stable sort: earlier entries win ties
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_HIGH_SCORES);

        self.entries
            .iter()
            .rposition(|e| e.score == score)
            .map(|i| i + 1)
    }

    /// Record the outcome of a name prompt; a cancelled prompt (`None`) records nothing
    pub fn record(&mut self, name: Option<&str>, score: u64) -> Option<usize> {
        name.and_then(|name| self.add_score(name, score))
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// One line per entry: "1. ACE 12500"
    pub fn display_lines(&self) -> Vec<String> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, e)| format!("{}. {} {}", i + 1, e.name, e.score))
            .collect()
    }

    /// Load high scores from the store, starting fresh if missing or unreadable
    pub fn load(store: &dyn KeyValueStore) -> Self {
        if let Some(json) = store.get(Self::STORAGE_KEY) {
            match serde_json::from_str::<HighScores>(&json) {
                Ok(mut scores) => {
                    scores.entries.sort_by(|a, b| b.score.cmp(&a.score));
                    scores.entries.truncate(MAX_HIGH_SCORES);
                    log::info!("Loaded {} high scores", scores.entries.len());
                    return scores;
                }
                Err(e) => log::warn!("Discarding unreadable high scores: {}", e),
            }
        }

        log::info!("No high scores found, starting fresh");
        Self::new()
    }

    /// Save high scores to the store
    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StoreError> {
        let json = serde_json::to_string(self)?;
        store.set(Self::STORAGE_KEY, &json)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}
