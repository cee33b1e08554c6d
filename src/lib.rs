//! Prism Tetris (workspace facade crate).
//!
//! Re-exports the workspace crates as `prism_tetris::{types,core,input,store}`
//! and hosts the text view used by the terminal binary.

pub use prism_tetris_core as core;
pub use prism_tetris_input as input;
pub use prism_tetris_store as store;
pub use prism_tetris_types as types;

pub mod view;
