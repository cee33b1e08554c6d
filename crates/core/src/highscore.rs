//! High-score table and its persistence seam
//!
//! The controller reads the table once at construction and writes it back at
//! game over. Storage sits behind [`HighScoreStore`] so the engine never touches
//! the filesystem itself.

use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::types::HIGH_SCORE_CAPACITY;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub name: String,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    /// Seconds since the Unix epoch
    pub timestamp: u64,
}

impl HighScoreEntry {
    pub fn new(name: impl Into<String>, score: u32, level: u32, lines: u32) -> Self {
        Self {
            name: name.into(),
            score,
            level,
            lines,
            timestamp: unix_now(),
        }
    }
}

pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Entries sorted by score, highest first, capped at `capacity`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighScoreTable {
    entries: Vec<HighScoreEntry>,
    capacity: usize,
}

impl HighScoreTable {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Build from loaded entries in any order; excess entries are dropped.
    pub fn from_entries(mut entries: Vec<HighScoreEntry>, capacity: usize) -> Self {
        // Stable sort keeps the older entry first on ties.
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(capacity);
        Self { entries, capacity }
    }

    pub fn entries(&self) -> &[HighScoreEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn best(&self) -> Option<u32> {
        self.entries.first().map(|entry| entry.score)
    }

    /// Rank `score` would take, if it makes the table
    pub fn rank_for(&self, score: u32) -> Option<usize> {
        if self.capacity == 0 {
            return None;
        }
        let rank = self
            .entries
            .iter()
            .position(|entry| entry.score < score)
            .unwrap_or(self.entries.len());
        (rank < self.capacity).then_some(rank)
    }

    /// Insert an entry; returns its rank, or `None` if it did not qualify.
    pub fn insert(&mut self, entry: HighScoreEntry) -> Option<usize> {
        let rank = self.rank_for(entry.score)?;
        self.entries.insert(rank, entry);
        self.entries.truncate(self.capacity);
        Some(rank)
    }
}

impl Default for HighScoreTable {
    fn default() -> Self {
        Self::new(HIGH_SCORE_CAPACITY)
    }
}

/// Load/save backend for the high-score list
pub trait HighScoreStore {
    fn load(&mut self) -> Result<Vec<HighScoreEntry>>;
    fn save(&mut self, entries: &[HighScoreEntry]) -> Result<()>;
}

/// In-process store, used when nothing is persisted
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Vec<HighScoreEntry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<HighScoreEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[HighScoreEntry] {
        &self.entries
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&mut self) -> Result<Vec<HighScoreEntry>> {
        Ok(self.entries.clone())
    }

    fn save(&mut self, entries: &[HighScoreEntry]) -> Result<()> {
        self.entries = entries.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, score: u32) -> HighScoreEntry {
        HighScoreEntry {
            name: name.to_string(),
            score,
            level: 1,
            lines: 0,
            timestamp: 0,
        }
    }

    #[test]
    fn test_from_entries_sorts_and_caps() {
        let table = HighScoreTable::from_entries(
            vec![entry("a", 10), entry("b", 30), entry("c", 20)],
            2,
        );
        let scores: Vec<u32> = table.entries().iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![30, 20]);
        assert_eq!(table.best(), Some(30));
    }

    #[test]
    fn test_insert_ranks() {
        let mut table = HighScoreTable::new(3);
        assert_eq!(table.insert(entry("a", 100)), Some(0));
        assert_eq!(table.insert(entry("b", 300)), Some(0));
        assert_eq!(table.insert(entry("c", 200)), Some(1));
        // Ties go below the existing entry.
        assert_eq!(table.insert(entry("d", 100)), None);
        assert_eq!(table.insert(entry("e", 150)), Some(2));

        let names: Vec<&str> = table.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["b", "c", "e"]);
    }

    #[test]
    fn test_zero_capacity_never_qualifies() {
        let mut table = HighScoreTable::new(0);
        assert_eq!(table.insert(entry("a", 1_000)), None);
        assert!(table.is_empty());
    }

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryStore::new();
        store.save(&[entry("a", 5)]).unwrap();
        assert_eq!(store.load().unwrap(), vec![entry("a", 5)]);
    }

    #[test]
    fn test_entry_json_shape() {
        let json = serde_json::to_string(&entry("ann", 42)).unwrap();
        assert_eq!(
            json,
            r#"{"name":"ann","score":42,"level":1,"lines":0,"timestamp":0}"#
        );
    }
}
