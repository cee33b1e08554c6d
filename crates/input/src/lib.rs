//! Terminal input collaborator.
//!
//! Maps `crossterm` key events to [`crate::types::GameCommand`]s and runs the
//! DAS/ARR repeat policy for held keys. The engine never sees raw keys; it
//! only receives commands. Terminals that do not report key releases are
//! handled with an auto-release timeout.

pub mod handler;
pub mod map;

pub use prism_tetris_types as types;

pub use handler::{CommandBatch, InputHandler};
pub use map::{map_key, should_quit};
