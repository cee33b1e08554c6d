//! RNG module - 7-bag random piece generation
//!
//! Implements the "7-bag" randomization algorithm used in modern Tetris.
//! Each bag contains one of each piece (I, O, T, S, Z, J, L), shuffled.
//! Bags are appended to a FIFO queue whenever it runs short, so previews never
//! reorder pieces that are already queued.
//!
//! The shuffle runs on a small seedable LCG so a seed replays the same game.

use std::collections::VecDeque;

use crate::types::PieceKind;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod 2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Multiply-shift keeps the high bits; the low bits of an LCG cycle with
    /// a short period.
    pub fn next_range(&mut self, max: u32) -> u32 {
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }

    /// Current internal state
    pub fn state(&self) -> u32 {
        self.state
    }
}

/// 7-bag piece queue
#[derive(Debug, Clone)]
pub struct PieceQueue {
    queue: VecDeque<PieceKind>,
    rng: SimpleRng,
    bags_dealt: u32,
}

impl PieceQueue {
    /// Create a new piece queue with the given seed
    pub fn new(seed: u32) -> Self {
        let mut queue = Self {
            queue: VecDeque::with_capacity(14),
            rng: SimpleRng::new(seed),
            bags_dealt: 0,
        };
        queue.refill();
        queue
    }

    /// Append one freshly shuffled bag
    pub fn refill(&mut self) {
        let mut bag = PieceKind::ALL;
        self.rng.shuffle(&mut bag);
        self.queue.extend(bag);
        self.bags_dealt = self.bags_dealt.wrapping_add(1);
    }

    /// Draw the next piece from the queue
    pub fn next(&mut self) -> PieceKind {
        if self.queue.is_empty() {
            self.refill();
        }
        // Non-empty after refill.
        self.queue.pop_front().unwrap_or(PieceKind::I)
    }

    /// Upcoming `n` pieces in draw order without consuming them.
    pub fn peek(&mut self, n: usize) -> impl Iterator<Item = PieceKind> + '_ {
        while self.queue.len() < n {
            self.refill();
        }
        self.queue.iter().copied().take(n)
    }

    /// Number of pieces currently buffered
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of bags shuffled so far
    pub fn bags_dealt(&self) -> u32 {
        self.bags_dealt
    }

    /// Get the current RNG state (for restarting game with a fresh sequence)
    pub fn seed(&self) -> u32 {
        self.rng.state()
    }
}

impl Default for PieceQueue {
    fn default() -> Self {
        Self::new(1)
    }
}
