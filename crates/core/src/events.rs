//! Game events - one-shot notifications pushed to subscribers
//!
//! Front-ends (rendering, audio, UI) implement [`EventSink`] and subscribe to
//! the controller's [`EventBus`]. Events are delivered synchronously, in
//! subscription order, and never buffered.

use std::fmt;
use std::sync::mpsc::Sender;

use crate::controller::ControllerState;
use crate::scoring::Statistics;
use crate::types::{MinoOffset, PieceKind, Rotation};

/// Why the game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TopOut {
    /// A new piece could not be placed at spawn
    BlockOut,
    /// A locked piece left blocks in the hidden rows
    LockOut,
}

/// Final numbers reported with [`GameEvent::GameOver`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSummary {
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub max_combo: u32,
    pub reason: TopOut,
    pub stats: Statistics,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    StateChanged {
        from: ControllerState,
        to: ControllerState,
    },
    PieceSpawned {
        kind: PieceKind,
        piece_id: u32,
    },
    PieceMoved {
        kind: PieceKind,
        x: i8,
        y: i8,
    },
    PieceRotated {
        kind: PieceKind,
        rotation: Rotation,
        kick: MinoOffset,
    },
    PieceHeld {
        held: PieceKind,
        active: PieceKind,
    },
    PieceLocked {
        kind: PieceKind,
        cells: [MinoOffset; 4],
    },
    LinesCleared {
        rows: Vec<usize>,
        count: u8,
        combo: u32,
        back_to_back: bool,
        points: u32,
    },
    PerfectClear {
        bonus: u32,
    },
    LevelUp {
        level: u32,
    },
    GameOver {
        summary: GameSummary,
    },
    /// The finished game entered the high-score table at `rank` (0 = best)
    HighScore {
        rank: usize,
        score: u32,
    },
}

impl GameEvent {
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::StateChanged { .. } => "stateChanged",
            GameEvent::PieceSpawned { .. } => "pieceSpawned",
            GameEvent::PieceMoved { .. } => "pieceMoved",
            GameEvent::PieceRotated { .. } => "pieceRotated",
            GameEvent::PieceHeld { .. } => "pieceHeld",
            GameEvent::PieceLocked { .. } => "pieceLocked",
            GameEvent::LinesCleared { .. } => "linesCleared",
            GameEvent::PerfectClear { .. } => "perfectClear",
            GameEvent::LevelUp { .. } => "levelUp",
            GameEvent::GameOver { .. } => "gameOver",
            GameEvent::HighScore { .. } => "highScore",
        }
    }
}

/// Receiver of game events
pub trait EventSink {
    fn on_event(&mut self, event: &GameEvent);
}

/// Forward events over a channel. A dropped receiver is ignored.
impl EventSink for Sender<GameEvent> {
    fn on_event(&mut self, event: &GameEvent) {
        let _ = self.send(event.clone());
    }
}

/// Ordered list of subscribers
#[derive(Default)]
pub struct EventBus {
    sinks: Vec<Box<dyn EventSink>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, sink: Box<dyn EventSink>) {
        self.sinks.push(sink);
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub fn emit(&mut self, event: GameEvent) {
        for sink in &mut self.sinks {
            sink.on_event(&event);
        }
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.sinks.len())
            .finish()
    }
}
