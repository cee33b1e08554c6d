//! Core game engine - pure, deterministic, and testable
//!
//! Everything that decides what happens in a game lives here. The crate has no
//! UI, terminal or filesystem code: a host feeds commands and elapsed time into
//! a [`GameController`] and reads back snapshots and events.
//!
//! - **Deterministic**: the same seed and the same inputs replay the same game
//! - **Total**: every public command is a no-op returning `false` when it does
//!   not apply; nothing on the command surface panics
//! - **Host-driven time**: nothing runs unless [`GameController::tick`] is called
//!
//! # Module Structure
//!
//! - [`grid`]: matrix of locked cells with collision checks and row compaction
//! - [`pieces`]: tetromino shapes and SRS wall kick tables
//! - [`rng`]: seedable 7-bag piece queue
//! - [`piece`]: the falling piece with gravity and lock bookkeeping
//! - [`lock`]: lock delay state machine
//! - [`line_clear`]: two-phase line clear (score, then collapse)
//! - [`scoring`]: score, level, combo and back-to-back rules
//! - [`controller`]: lifecycle state machine tying everything together
//! - [`events`], [`snapshot`]: push and pull views for front-ends
//! - [`highscore`]: high-score table and its storage seam
//! - [`config`]: tunables with environment overrides
//!
//! # Game Rules
//!
//! - **7-Bag Randomizer**: each bag deals every piece exactly once
//! - **SRS Rotation**: wall kicks for all pieces except O, which never rotates
//! - **Lock Delay**: 500ms once grounded, restarted by moves up to 15 times
//! - **Ghost Piece**: derived on demand from the active piece
//! - **Hold**: once per piece
//! - **Top out**: a blocked spawn or a lock inside the hidden rows ends the game
//!
//! # Example
//!
//! ```
//! use prism_tetris_core::{ControllerState, GameConfig, GameController};
//! use prism_tetris_core::types::GameCommand;
//!
//! let mut game = GameController::new(GameConfig::instant());
//! assert!(game.apply(GameCommand::Start));
//! assert_eq!(game.state(), ControllerState::Playing);
//!
//! game.apply(GameCommand::MoveRight);
//! game.apply(GameCommand::RotateCw);
//! game.apply(GameCommand::HardDrop);
//! game.tick(16);
//!
//! // Hard drop awards two points per row.
//! assert!(game.snapshot().score > 0);
//! ```
//!
//! # Timing
//!
//! - **Tick Rate**: hosts usually step at 16ms
//! - **Gravity**: 1000ms per row at level 1, following the guideline curve
//! - **Soft Drop**: 10x faster than normal gravity
//! - **Line Clear**: 180ms phase before the rows collapse

pub mod config;
pub mod controller;
pub mod events;
pub mod grid;
pub mod highscore;
pub mod line_clear;
pub mod lock;
pub mod piece;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use prism_tetris_types as types;

// Re-export commonly used types for convenience
pub use config::GameConfig;
pub use controller::{ControllerState, GameController};
pub use events::{EventBus, EventSink, GameEvent, GameSummary, TopOut};
pub use grid::Grid;
pub use highscore::{HighScoreEntry, HighScoreStore, HighScoreTable, MemoryStore};
pub use line_clear::{ClearReport, LineClearEngine, PendingClear};
pub use lock::{LockState, LockTimer};
pub use piece::{ActivePiece, GravityStep, SoftDrop, Tetromino};
pub use pieces::{get_shape, try_rotate, wall_kicks};
pub use rng::{PieceQueue, SimpleRng};
pub use scoring::{LineClearAward, ScoreEngine, Statistics};
pub use snapshot::{ActiveSnapshot, GameSnapshot, LastClear};
