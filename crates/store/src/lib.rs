//! JSON file persistence for the high-score table.
//!
//! The file holds a plain JSON array of entries:
//!
//! ```text
//! [{"name":"ANN","score":4200,"level":3,"lines":27,"timestamp":1760000000}]
//! ```
//!
//! A missing file is an empty table. Saves go through a sibling temp file and a
//! rename so a crash mid-write never truncates the existing scores.

use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use prism_tetris_core::highscore::{HighScoreEntry, HighScoreStore};

pub use prism_tetris_core as core;

/// Environment variable overriding the scores file location
pub const SCORES_PATH_ENV: &str = "TETRIS_SCORES_PATH";

/// File name used when no path is configured
pub const DEFAULT_FILE_NAME: &str = "prism-tetris-scores.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `TETRIS_SCORES_PATH` if set, else [`DEFAULT_FILE_NAME`] in the working directory.
    pub fn from_env() -> Self {
        let path = env::var_os(SCORES_PATH_ENV)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_FILE_NAME));
        Self::new(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| DEFAULT_FILE_NAME.into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl HighScoreStore for JsonFileStore {
    fn load(&mut self) -> Result<Vec<HighScoreEntry>> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => {
                return Err(err).with_context(|| format!("read {}", self.path.display()));
            }
        };
        if data.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&data).with_context(|| format!("parse {}", self.path.display()))
    }

    fn save(&mut self, entries: &[HighScoreEntry]) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
        }
        let json = serde_json::to_string_pretty(entries)?;
        let tmp = self.temp_path();
        fs::write(&tmp, json).with_context(|| format!("write {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("replace {}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process;

    fn scratch_dir(test: &str) -> PathBuf {
        let dir = env::temp_dir().join(format!("prism-tetris-store-{}-{}", process::id(), test));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    fn entry(name: &str, score: u32) -> HighScoreEntry {
        HighScoreEntry {
            name: name.to_string(),
            score,
            level: 2,
            lines: 12,
            timestamp: 1_700_000_000,
        }
    }

    #[test]
    fn test_missing_file_is_empty_table() {
        let dir = scratch_dir("missing");
        let mut store = JsonFileStore::new(dir.join("scores.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let dir = scratch_dir("round-trip");
        let mut store = JsonFileStore::new(dir.join("nested").join("scores.json"));

        let entries = vec![entry("ann", 900), entry("bob", 400)];
        store.save(&entries).unwrap();
        assert!(store.path().exists());
        assert!(!store.temp_path().exists());

        let mut reopened = JsonFileStore::new(store.path());
        assert_eq!(reopened.load().unwrap(), entries);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = scratch_dir("corrupt");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("scores.json");
        fs::write(&path, "{ not json").unwrap();

        let mut store = JsonFileStore::new(&path);
        let err = store.load().unwrap_err();
        assert!(format!("{err:#}").contains("parse"));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_temp_path_is_a_sibling() {
        let store = JsonFileStore::new("/tmp/scores.json");
        assert_eq!(store.temp_path(), PathBuf::from("/tmp/scores.json.tmp"));
    }
}
