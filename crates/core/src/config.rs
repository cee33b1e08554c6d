//! Game configuration with environment overrides.

use std::env;

use crate::types::{
    BOARD_WIDTH, COUNTDOWN_MS, HIDDEN_ROWS, LINE_CLEAR_PAUSE_MS, LOCK_DELAY_MS,
    LOCK_RESET_LIMIT, NEXT_PREVIEW, SOFT_DROP_MULTIPLIER, SPAWN_Y, VISIBLE_HEIGHT,
};

/// Tunables for one game session.
///
/// `Default` gives guideline values; [`GameConfig::from_env`] lets a host
/// override the common ones without recompiling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub width: u8,
    pub visible_height: u8,
    pub hidden_rows: u8,
    pub spawn_y: i8,
    pub lock_delay_ms: u32,
    pub max_lock_moves: u8,
    /// Length of the `LineClearing` phase. 0 collapses rows within the locking tick.
    pub line_clear_delay_ms: u32,
    /// Length of the `Countdown` phase. 0 starts play immediately.
    pub countdown_ms: u32,
    pub soft_drop_multiplier: u32,
    pub start_level: u32,
    pub preview_len: usize,
    pub seed: u32,
    pub player_name: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: BOARD_WIDTH,
            visible_height: VISIBLE_HEIGHT,
            hidden_rows: HIDDEN_ROWS,
            spawn_y: SPAWN_Y,
            lock_delay_ms: LOCK_DELAY_MS,
            max_lock_moves: LOCK_RESET_LIMIT,
            line_clear_delay_ms: LINE_CLEAR_PAUSE_MS,
            countdown_ms: COUNTDOWN_MS,
            soft_drop_multiplier: SOFT_DROP_MULTIPLIER,
            start_level: 1,
            preview_len: NEXT_PREVIEW,
            seed: 1,
            player_name: "PLAYER".to_string(),
        }
    }
}

impl GameConfig {
    /// Read overrides from the process environment.
    ///
    /// - `TETRIS_SEED`: bag RNG seed
    /// - `TETRIS_START_LEVEL`: starting level (>= 1)
    /// - `TETRIS_LOCK_DELAY_MS`: lock delay
    /// - `TETRIS_LINE_CLEAR_MS`: line clear phase length
    /// - `TETRIS_COUNTDOWN_MS`: countdown length
    /// - `TETRIS_PREVIEW`: number of next pieces exposed
    /// - `TETRIS_PLAYER`: name recorded in the high-score table
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`GameConfig::from_env`] with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        fn parsed<T: std::str::FromStr>(
            lookup: &impl Fn(&str) -> Option<String>,
            key: &str,
            default: T,
        ) -> T {
            lookup(key)
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(default)
        }

        let defaults = Self::default();
        let player_name = lookup("TETRIS_PLAYER")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.player_name.clone());

        Self {
            seed: parsed(&lookup, "TETRIS_SEED", defaults.seed),
            start_level: parsed(&lookup, "TETRIS_START_LEVEL", defaults.start_level),
            lock_delay_ms: parsed(&lookup, "TETRIS_LOCK_DELAY_MS", defaults.lock_delay_ms),
            line_clear_delay_ms: parsed(
                &lookup,
                "TETRIS_LINE_CLEAR_MS",
                defaults.line_clear_delay_ms,
            ),
            countdown_ms: parsed(&lookup, "TETRIS_COUNTDOWN_MS", defaults.countdown_ms),
            preview_len: parsed(&lookup, "TETRIS_PREVIEW", defaults.preview_len),
            player_name,
            ..defaults
        }
        .sanitized()
    }

    /// Clamp every field into a range the engine can run with.
    pub fn sanitized(mut self) -> Self {
        self.width = self.width.clamp(4, 40);
        self.visible_height = self.visible_height.clamp(4, 60);
        self.hidden_rows = self.hidden_rows.min(8);
        self.spawn_y = self.spawn_y.clamp(0, self.total_height() as i8 - 4);
        self.max_lock_moves = self.max_lock_moves.max(1);
        self.soft_drop_multiplier = self.soft_drop_multiplier.max(1);
        self.start_level = self.start_level.max(1);
        self.preview_len = self.preview_len.min(14);
        self
    }

    /// Rows including the hidden buffer.
    pub fn total_height(&self) -> u8 {
        self.visible_height.saturating_add(self.hidden_rows)
    }

    /// Zero-delay variant used by tests and scripted hosts.
    pub fn instant() -> Self {
        Self {
            line_clear_delay_ms: 0,
            countdown_ms: 0,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = GameConfig::from_lookup(|_| None);
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn overrides_are_parsed() {
        let config = GameConfig::from_lookup(lookup_from(&[
            ("TETRIS_SEED", "42"),
            ("TETRIS_START_LEVEL", "5"),
            ("TETRIS_LINE_CLEAR_MS", "0"),
            ("TETRIS_PLAYER", "  amber  "),
        ]));
        assert_eq!(config.seed, 42);
        assert_eq!(config.start_level, 5);
        assert_eq!(config.line_clear_delay_ms, 0);
        assert_eq!(config.player_name, "amber");
    }

    #[test]
    fn invalid_values_fall_back_and_clamp() {
        let config = GameConfig::from_lookup(lookup_from(&[
            ("TETRIS_SEED", "not-a-number"),
            ("TETRIS_START_LEVEL", "0"),
            ("TETRIS_PLAYER", "   "),
        ]));
        assert_eq!(config.seed, 1);
        assert_eq!(config.start_level, 1);
        assert_eq!(config.player_name, "PLAYER");
    }

    #[test]
    fn total_height_includes_hidden_rows() {
        assert_eq!(GameConfig::default().total_height(), 22);
    }
}
