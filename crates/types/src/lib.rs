//! Shared types module - plain data structures and tuning constants
//!
//! Everything in here is dependency-free data used by the engine, the input
//! layer and any front-end that renders the game.
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns, x = 0 at the left wall
//! - **Visible height**: 20 rows
//! - **Hidden rows**: 2 buffer rows above the visible playfield
//! - **Total height**: 22 rows (indexed 0-21, row 0 is the top of the buffer)
//!
//! # Timing (milliseconds)
//!
//! | Constant | Value | Meaning |
//! |----------|-------|---------|
//! | `TICK_MS` | 16 | Host step used by the terminal binary |
//! | `SOFT_DROP_MULTIPLIER` | 10 | Soft drop gravity is 10x faster |
//! | `LOCK_DELAY_MS` | 500 | Time before a grounded piece locks |
//! | `LOCK_RESET_LIMIT` | 15 | Max lock timer resets per grounding |
//! | `LINE_CLEAR_PAUSE_MS` | 180 | Clear animation phase before rows collapse |
//! | `COUNTDOWN_MS` | 3000 | Countdown before play starts |
//!
//! # Gravity by Level
//!
//! Milliseconds per row follow the guideline curve
//! `(0.8 - (level - 1) * 0.007) ^ (level - 1)` seconds, precomputed in
//! [`DROP_INTERVALS`] and floored at [`DROP_INTERVAL_MIN_MS`].
//!
//! # Examples
//!
//! ```
//! use prism_tetris_types::{GameCommand, PieceKind, Rotation, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! assert_eq!(PieceKind::from_str("t"), Some(PieceKind::T));
//! assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
//! assert_eq!(GameCommand::from_str("hardDrop"), Some(GameCommand::HardDrop));
//!
//! assert_eq!((BOARD_WIDTH, BOARD_HEIGHT), (10, 22));
//! ```

/// Columns
pub const BOARD_WIDTH: u8 = 10;

/// Visible playfield height (20 rows)
pub const VISIBLE_HEIGHT: u8 = 20;

/// Buffer rows above the visible playfield where pieces spawn
pub const HIDDEN_ROWS: u8 = 2;

/// Total board height including the hidden buffer (22 rows)
pub const BOARD_HEIGHT: u8 = VISIBLE_HEIGHT + HIDDEN_ROWS;

/// Row at which new pieces are spawned (top of the hidden buffer)
pub const SPAWN_Y: i8 = 0;

/// Host step; also the gravity floor
pub const TICK_MS: u32 = 16;

/// Soft drop speed multiplier (10x normal gravity)
pub const SOFT_DROP_MULTIPLIER: u32 = 10;

/// Lock delay when a piece is grounded (500ms)
pub const LOCK_DELAY_MS: u32 = 500;

/// Maximum number of successful moves/rotations while grounded before a forced lock
pub const LOCK_RESET_LIMIT: u8 = 15;

/// Clear animation phase before cleared rows collapse (180ms)
pub const LINE_CLEAR_PAUSE_MS: u32 = 180;

/// Countdown before gameplay begins (3 seconds)
pub const COUNTDOWN_MS: u32 = 3000;

/// Number of upcoming pieces exposed to the UI
pub const NEXT_PREVIEW: usize = 5;

/// Hold time before a held direction starts repeating
pub const DEFAULT_DAS_MS: u32 = 150;

/// Interval between repeats once DAS has charged
pub const DEFAULT_ARR_MS: u32 = 50;

/// Milliseconds per row for levels 1 through 13; later levels sit on [`DROP_INTERVAL_MIN_MS`].
pub const DROP_INTERVALS: [u32; 13] = [1000, 793, 618, 473, 355, 262, 190, 135, 94, 64, 43, 28, 18];

/// Gravity floor: never faster than one row per tick
pub const DROP_INTERVAL_MIN_MS: u32 = TICK_MS;

/// Lines needed per level
pub const LINES_PER_LEVEL: u32 = 10;

/// Base points indexed by lines cleared, multiplied by level
pub const LINE_SCORES: [u32; 5] = [0, 100, 300, 500, 800];

/// Combo bonus per combo step (multiplied by combo count and level)
pub const COMBO_BASE: u32 = 50;

/// Consecutive tetrises pay `B2B_NUMERATOR / B2B_DENOMINATOR` of the base points.
pub const B2B_NUMERATOR: u32 = 3;
pub const B2B_DENOMINATOR: u32 = 2;

/// Perfect clear bonus (multiplied by level)
pub const PERFECT_CLEAR_BONUS: u32 = 2000;

/// Points per cell for a soft drop
pub const SOFT_DROP_POINTS: u32 = 1;

/// Points per cell for a hard drop
pub const HARD_DROP_POINTS: u32 = 2;

/// Number of entries kept in the high-score table
pub const HIGH_SCORE_CAPACITY: usize = 10;


/// Tetromino kinds; locked cells remember theirs so front-ends can colour them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// Canonical bag order
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Look a kind up by its one-letter name, ignoring case.
    ///
    /// ```
    /// use prism_tetris_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("l"), Some(PieceKind::L));
    /// assert_eq!(PieceKind::from_str("Z"), Some(PieceKind::Z));
    /// assert_eq!(PieceKind::from_str("tee"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        let mut chars = s.chars();
        let letter = chars.next()?.to_ascii_uppercase();
        if chars.next().is_some() {
            return None;
        }
        Self::ALL.into_iter().find(|kind| kind.glyph() == letter)
    }

    pub fn as_str(&self) -> &'static str {
        ["i", "o", "t", "s", "z", "j", "l"][*self as usize]
    }

    /// Uppercase letter used by text views and grid fixtures
    pub fn glyph(&self) -> char {
        ['I', 'O', 'T', 'S', 'Z', 'J', 'L'][*self as usize]
    }
}

/// SRS orientation. North is the spawn orientation; each step clockwise is a
/// quarter turn (North, East, South, West).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rotation {
    North,
    East,
    South,
    West,
}

impl Rotation {
    const CYCLE: [Rotation; 4] = [Rotation::North, Rotation::East, Rotation::South, Rotation::West];

    /// ```
    /// use prism_tetris_types::Rotation;
    ///
    /// assert_eq!(Rotation::West.rotate_cw(), Rotation::North);
    /// assert_eq!(Rotation::South.rotate_cw(), Rotation::West);
    /// ```
    pub fn rotate_cw(&self) -> Self {
        Self::CYCLE[(self.index() as usize + 1) % 4]
    }

    /// ```
    /// use prism_tetris_types::Rotation;
    ///
    /// assert_eq!(Rotation::North.rotate_ccw(), Rotation::West);
    /// assert_eq!(Rotation::South.rotate_ccw(), Rotation::East);
    /// ```
    pub fn rotate_ccw(&self) -> Self {
        Self::CYCLE[(self.index() as usize + 3) % 4]
    }

    pub fn rotate(&self, direction: RotationDirection) -> Self {
        match direction {
            RotationDirection::Clockwise => self.rotate_cw(),
            RotationDirection::CounterClockwise => self.rotate_ccw(),
        }
    }

    /// Quarter turns clockwise from North (0-3)
    pub fn index(&self) -> u8 {
        *self as u8
    }

    /// Accepts `north`/`n`, `east`/`e`, `south`/`s`, `west`/`w` in any case.
    pub fn from_str(s: &str) -> Option<Self> {
        let s = s.to_ascii_lowercase();
        Self::CYCLE
            .into_iter()
            .find(|rotation| rotation.as_str() == s || rotation.as_str()[..1] == s)
    }

    pub fn as_str(&self) -> &'static str {
        ["north", "east", "south", "west"][*self as usize]
    }
}

/// Direction of a quarter-turn rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

/// Commands accepted by the game controller
///
/// Both keyboard input and scripted hosts speak this command set. Key repeat
/// (DAS/ARR) is resolved before a command reaches the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameCommand {
    MoveLeft,
    MoveRight,
    /// Drop piece one cell down, locking it if it cannot move
    SoftDrop,
    /// Begin accelerated gravity
    SoftDropStart,
    /// End accelerated gravity
    SoftDropStop,
    /// Instantly drop piece to lowest valid position and lock it
    HardDrop,
    RotateCw,
    RotateCcw,
    /// Hold current piece (once per piece)
    Hold,
    /// Toggle pause state
    Pause,
    /// Leave the menu (or game over screen) and start the countdown
    Start,
    /// Discard the current game and start a fresh one
    Restart,
}

impl GameCommand {
    /// Parse command from string (case-insensitive camelCase names)
    ///
    /// # Examples
    ///
    /// ```
    /// use prism_tetris_types::GameCommand;
    ///
    /// assert_eq!(GameCommand::from_str("moveLeft"), Some(GameCommand::MoveLeft));
    /// assert_eq!(GameCommand::from_str("softDropStart"), Some(GameCommand::SoftDropStart));
    /// assert_eq!(GameCommand::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(GameCommand::MoveLeft),
            "moveright" => Some(GameCommand::MoveRight),
            "softdrop" => Some(GameCommand::SoftDrop),
            "softdropstart" => Some(GameCommand::SoftDropStart),
            "softdropstop" => Some(GameCommand::SoftDropStop),
            "harddrop" => Some(GameCommand::HardDrop),
            "rotatecw" => Some(GameCommand::RotateCw),
            "rotateccw" => Some(GameCommand::RotateCcw),
            "hold" => Some(GameCommand::Hold),
            "pause" => Some(GameCommand::Pause),
            "start" => Some(GameCommand::Start),
            "restart" => Some(GameCommand::Restart),
            _ => None,
        }
    }

    /// camelCase wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            GameCommand::MoveLeft => "moveLeft",
            GameCommand::MoveRight => "moveRight",
            GameCommand::SoftDrop => "softDrop",
            GameCommand::SoftDropStart => "softDropStart",
            GameCommand::SoftDropStop => "softDropStop",
            GameCommand::HardDrop => "hardDrop",
            GameCommand::RotateCw => "rotateCw",
            GameCommand::RotateCcw => "rotateCcw",
            GameCommand::Hold => "hold",
            GameCommand::Pause => "pause",
            GameCommand::Start => "start",
            GameCommand::Restart => "restart",
        }
    }
}

/// One grid cell: `None` when empty, else the kind of the piece locked there
pub type Cell = Option<PieceKind>;

/// Offset of a single mino relative to piece origin, `(dx, dy)` with y down
pub type MinoOffset = (i8, i8);

/// Four mino offsets from the bounding-box origin
pub type PieceShape = [MinoOffset; 4];
