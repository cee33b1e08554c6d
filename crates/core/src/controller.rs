//! Game controller - the one place game state changes
//!
//! The controller owns the grid, the bag, the active piece, the score engine
//! and the high-score table. A host drives it with [`GameController::apply`]
//! for discrete commands and [`GameController::tick`] for elapsed time, then
//! reads [`GameController::snapshot`] or listens to [`GameEvent`]s.
//!
//! ```text
//! Menu --start--> Countdown --elapsed--> Playing <--pause--> Paused
//!                                          |  ^
//!                                    lock  |  | rows collapsed
//!                                          v  |
//!                                       LineClearing
//! Playing --top out--> GameOver --start/restart--> Countdown
//! ```

use crate::config::GameConfig;
use crate::events::{EventBus, EventSink, GameEvent, GameSummary, TopOut};
use crate::grid::Grid;
use crate::highscore::{HighScoreEntry, HighScoreStore, HighScoreTable, MemoryStore};
use crate::line_clear::{LineClearEngine, PendingClear};
use crate::piece::{ActivePiece, SoftDrop};
use crate::rng::PieceQueue;
use crate::scoring::ScoreEngine;
use crate::snapshot::{ActiveSnapshot, GameSnapshot, LastClear, LockSnapshot, TimersSnapshot};
use crate::types::{GameCommand, PieceKind, RotationDirection, HIGH_SCORE_CAPACITY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControllerState {
    Menu,
    Countdown,
    Playing,
    Paused,
    LineClearing,
    GameOver,
}

impl ControllerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControllerState::Menu => "menu",
            ControllerState::Countdown => "countdown",
            ControllerState::Playing => "playing",
            ControllerState::Paused => "paused",
            ControllerState::LineClearing => "lineClearing",
            ControllerState::GameOver => "gameOver",
        }
    }
}

pub struct GameController {
    config: GameConfig,
    state: ControllerState,
    grid: Grid,
    queue: PieceQueue,
    /// Cached preview so snapshots do not need `&mut` access to the queue
    next: Vec<PieceKind>,
    active: Option<ActivePiece>,
    hold: Option<PieceKind>,
    can_hold: bool,
    soft_drop_held: bool,
    score: ScoreEngine,
    pending_clear: Option<PendingClear>,
    last_clear: Option<LastClear>,
    countdown_ms: u32,
    line_clear_ms: u32,
    top_out: Option<TopOut>,
    /// Seed the current game's bag started from
    seed: u32,
    /// Monotonic game counter (increments on every start/restart)
    episode_id: u32,
    /// Monotonic id for spawned pieces, hold swaps included
    piece_id: u32,
    high_scores: HighScoreTable,
    store: Box<dyn HighScoreStore>,
    events: EventBus,
}

impl GameController {
    /// Controller with an in-memory high-score table.
    pub fn new(config: GameConfig) -> Self {
        Self::with_store(config, Box::new(MemoryStore::new()))
    }

    /// Controller backed by `store`; the table is loaded once here.
    ///
    /// A store that fails to load leaves the table empty.
    pub fn with_store(config: GameConfig, mut store: Box<dyn HighScoreStore>) -> Self {
        let config = config.sanitized();
        let high_scores = match store.load() {
            Ok(entries) => HighScoreTable::from_entries(entries, HIGH_SCORE_CAPACITY),
            Err(err) => {
                eprintln!("[HighScores] load failed, starting with an empty table: {err:#}");
                HighScoreTable::new(HIGH_SCORE_CAPACITY)
            }
        };

        let mut queue = PieceQueue::new(config.seed);
        let next = queue.peek(config.preview_len).collect();

        Self {
            grid: Grid::new(config.width, config.visible_height, config.hidden_rows),
            queue,
            next,
            active: None,
            hold: None,
            can_hold: true,
            soft_drop_held: false,
            score: ScoreEngine::new(config.start_level),
            pending_clear: None,
            last_clear: None,
            countdown_ms: 0,
            line_clear_ms: 0,
            top_out: None,
            seed: config.seed,
            episode_id: 0,
            piece_id: 0,
            state: ControllerState::Menu,
            high_scores,
            store,
            events: EventBus::new(),
            config,
        }
    }

    pub fn subscribe(&mut self, sink: Box<dyn EventSink>) {
        self.events.subscribe(sink);
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn active(&self) -> Option<&ActivePiece> {
        self.active.as_ref()
    }

    pub fn hold_piece(&self) -> Option<PieceKind> {
        self.hold
    }

    pub fn can_hold(&self) -> bool {
        self.can_hold
    }

    pub fn next_queue(&self) -> &[PieceKind] {
        &self.next
    }

    pub fn score(&self) -> &ScoreEngine {
        &self.score
    }

    pub fn high_scores(&self) -> &HighScoreTable {
        &self.high_scores
    }

    pub fn top_out(&self) -> Option<TopOut> {
        self.top_out
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn piece_id(&self) -> u32 {
        self.piece_id
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    #[cfg(test)]
    pub(crate) fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    /// Apply one discrete command; returns false when it was rejected or had no effect.
    pub fn apply(&mut self, command: GameCommand) -> bool {
        match command {
            GameCommand::Start => match self.state {
                ControllerState::Menu | ControllerState::GameOver => {
                    self.start_game();
                    true
                }
                _ => false,
            },
            GameCommand::Restart => {
                if self.state == ControllerState::Menu {
                    return false;
                }
                self.start_game();
                true
            }
            GameCommand::Pause => match self.state {
                ControllerState::Playing => {
                    self.set_state(ControllerState::Paused);
                    true
                }
                ControllerState::Paused => {
                    self.set_state(ControllerState::Playing);
                    true
                }
                _ => false,
            },
            // A key release must never be lost, whatever the state.
            GameCommand::SoftDropStop => self.set_soft_drop(false),
            _ if self.state != ControllerState::Playing => false,
            GameCommand::SoftDropStart => self.set_soft_drop(true),
            GameCommand::MoveLeft => self.shift(-1),
            GameCommand::MoveRight => self.shift(1),
            GameCommand::SoftDrop => self.soft_drop_step(),
            GameCommand::HardDrop => self.hard_drop(),
            GameCommand::RotateCw => self.rotate(RotationDirection::Clockwise),
            GameCommand::RotateCcw => self.rotate(RotationDirection::CounterClockwise),
            GameCommand::Hold => self.hold(),
        }
    }

    /// Advance time by `elapsed_ms`. Frozen states ignore the call.
    pub fn tick(&mut self, elapsed_ms: u32) {
        match self.state {
            ControllerState::Menu | ControllerState::Paused | ControllerState::GameOver => {}
            ControllerState::Countdown => {
                self.last_clear = None;
                self.countdown_ms = self.countdown_ms.saturating_sub(elapsed_ms);
                if self.countdown_ms == 0 {
                    self.begin_play();
                }
            }
            ControllerState::LineClearing => {
                self.last_clear = None;
                self.line_clear_ms = self.line_clear_ms.saturating_sub(elapsed_ms);
                if self.line_clear_ms == 0 {
                    self.finish_clear();
                }
            }
            ControllerState::Playing => {
                self.last_clear = None;
                self.step_gravity(elapsed_ms);
            }
        }
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut snapshot = GameSnapshot::default();
        self.snapshot_into(&mut snapshot);
        snapshot
    }

    /// Fill `out`, reusing its buffers.
    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.width = self.grid.width();
        out.height = self.grid.height();
        out.hidden_rows = self.grid.hidden_rows();
        out.cells.clear();
        out.cells.extend_from_slice(self.grid.cells());

        match &self.active {
            Some(active) => {
                out.active = Some(ActiveSnapshot::from(active.piece()));
                out.ghost_y = Some(active.ghost_y(&self.grid));
                out.ghost_cells = Some(active.ghost_cells(&self.grid));
                let timer = active.lock_timer();
                let (elapsed_ms, delay_ms) = timer.progress();
                out.lock = LockSnapshot {
                    grounded: timer.is_grounded(),
                    elapsed_ms,
                    delay_ms,
                    moves: timer.moves(),
                    max_moves: timer.max_moves(),
                };
            }
            None => {
                out.active = None;
                out.ghost_y = None;
                out.ghost_cells = None;
                out.lock = LockSnapshot::default();
            }
        }

        out.hold = self.hold;
        out.can_hold = self.can_hold;
        out.next.clear();
        out.next.extend_from_slice(&self.next);
        out.state = self.state;
        out.score = self.score.score();
        out.level = self.score.level();
        out.lines = self.score.lines();
        out.combo = self.score.combo();
        out.back_to_back = self.score.back_to_back();
        out.best_score = self.high_scores.best();
        out.timers = TimersSnapshot {
            countdown_ms: self.countdown_ms,
            line_clear_ms: self.line_clear_ms,
            drop_interval_ms: self.score.gravity_interval_ms(),
        };
        out.last_clear = self.last_clear.clone();
        out.stats = *self.score.stats();
        out.episode_id = self.episode_id;
        out.piece_id = self.piece_id;
        out.seed = self.seed;
    }

    fn set_state(&mut self, to: ControllerState) {
        let from = self.state;
        if from != to {
            self.state = to;
            self.events.emit(GameEvent::StateChanged { from, to });
        }
    }

    /// Discard the current game and enter the countdown.
    fn start_game(&mut self) {
        // The first game replays the configured seed; later games continue the sequence.
        let seed = if self.episode_id == 0 {
            self.config.seed
        } else {
            self.queue.seed()
        };

        self.grid = Grid::new(
            self.config.width,
            self.config.visible_height,
            self.config.hidden_rows,
        );
        self.queue = PieceQueue::new(seed);
        self.seed = seed;
        self.refresh_preview();
        self.active = None;
        self.hold = None;
        self.can_hold = true;
        self.soft_drop_held = false;
        self.score = ScoreEngine::new(self.config.start_level);
        self.pending_clear = None;
        self.last_clear = None;
        self.line_clear_ms = 0;
        self.top_out = None;
        self.piece_id = 0;
        self.episode_id = self.episode_id.wrapping_add(1);

        if self.config.countdown_ms == 0 {
            self.begin_play();
        } else {
            self.countdown_ms = self.config.countdown_ms;
            self.set_state(ControllerState::Countdown);
        }
    }

    fn begin_play(&mut self) {
        self.countdown_ms = 0;
        self.set_state(ControllerState::Playing);
        self.spawn_next();
    }

    fn refresh_preview(&mut self) {
        self.next.clear();
        self.next.extend(self.queue.peek(self.config.preview_len));
    }

    /// Draw from the bag and spawn; a new piece may be held again.
    fn spawn_next(&mut self) -> bool {
        let kind = self.queue.next();
        self.refresh_preview();
        self.can_hold = true;
        self.spawn_kind(kind)
    }

    fn spawn_kind(&mut self, kind: PieceKind) -> bool {
        match ActivePiece::spawn(kind, &self.grid, &self.config) {
            Some(mut piece) => {
                piece.set_soft_drop(self.soft_drop_held);
                self.active = Some(piece);
                self.piece_id = self.piece_id.wrapping_add(1);
                self.events.emit(GameEvent::PieceSpawned {
                    kind,
                    piece_id: self.piece_id,
                });
                true
            }
            None => {
                self.game_over(TopOut::BlockOut);
                false
            }
        }
    }

    fn set_soft_drop(&mut self, on: bool) -> bool {
        if self.soft_drop_held == on {
            return false;
        }
        self.soft_drop_held = on;
        if let Some(active) = self.active.as_mut() {
            active.set_soft_drop(on);
        }
        true
    }

    fn shift(&mut self, dx: i8) -> bool {
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        let moved = if dx < 0 {
            active.move_left(&self.grid)
        } else {
            active.move_right(&self.grid)
        };
        if moved {
            let (x, y) = active.position();
            let kind = active.kind();
            self.events.emit(GameEvent::PieceMoved { kind, x, y });
        }
        moved
    }

    fn soft_drop_step(&mut self) -> bool {
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        match active.soft_drop(&self.grid) {
            SoftDrop::Moved => {
                let (x, y) = active.position();
                let kind = active.kind();
                self.score.on_soft_drop(1);
                self.events.emit(GameEvent::PieceMoved { kind, x, y });
            }
            SoftDrop::Locked => self.lock_active(),
        }
        true
    }

    fn hard_drop(&mut self) -> bool {
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        let distance = active.hard_drop(&self.grid);
        self.score.on_hard_drop(distance as u32);
        self.lock_active();
        true
    }

    fn rotate(&mut self, direction: RotationDirection) -> bool {
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        match active.rotate_with_kick(&self.grid, direction) {
            Some(kick) => {
                let kind = active.kind();
                let rotation = active.rotation();
                self.events.emit(GameEvent::PieceRotated {
                    kind,
                    rotation,
                    kick,
                });
                true
            }
            None => false,
        }
    }

    /// Stash the active piece; once per piece.
    fn hold(&mut self) -> bool {
        if !self.can_hold {
            return false;
        }
        let Some(active) = self.active.take() else {
            return false;
        };

        let current = active.kind();
        let incoming = match self.hold.replace(current) {
            Some(held) => held,
            None => {
                let kind = self.queue.next();
                self.refresh_preview();
                kind
            }
        };
        self.can_hold = false;
        self.events.emit(GameEvent::PieceHeld {
            held: current,
            active: incoming,
        });
        self.spawn_kind(incoming);
        true
    }

    fn step_gravity(&mut self, elapsed_ms: u32) {
        let interval = self.score.gravity_interval_ms();
        let Some(active) = self.active.as_mut() else {
            return;
        };
        let step = active.update(&self.grid, elapsed_ms, interval);
        if step.soft_rows > 0 {
            self.score.on_soft_drop(step.soft_rows as u32);
        }
        if step.locked {
            self.lock_active();
        }
    }

    /// Write the active piece into the grid and resolve the consequences.
    fn lock_active(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };
        let piece = active.piece();
        self.grid.place(&piece.shape(), piece.x, piece.y, piece.kind);
        self.score.on_piece_locked();
        self.events.emit(GameEvent::PieceLocked {
            kind: piece.kind,
            cells: piece.cells(),
        });

        let Some(pending) = LineClearEngine::resolve(&self.grid, &mut self.score) else {
            self.after_lock();
            return;
        };

        let award = pending.award;
        self.events.emit(GameEvent::LinesCleared {
            rows: pending.rows.clone(),
            count: award.lines,
            combo: award.combo,
            back_to_back: award.back_to_back,
            points: award.total,
        });
        if let Some(level) = award.level_up {
            self.events.emit(GameEvent::LevelUp { level });
        }

        self.pending_clear = Some(pending);
        if self.config.line_clear_delay_ms == 0 {
            self.finish_clear();
        } else {
            self.line_clear_ms = self.config.line_clear_delay_ms;
            self.set_state(ControllerState::LineClearing);
        }
    }

    /// Collapse the pending rows, then continue with the next piece.
    fn finish_clear(&mut self) {
        self.line_clear_ms = 0;
        let Some(pending) = self.pending_clear.take() else {
            return;
        };
        let report = LineClearEngine::commit(&mut self.grid, &pending, &mut self.score);
        if report.perfect_clear {
            self.events.emit(GameEvent::PerfectClear {
                bonus: report.perfect_clear_bonus,
            });
        }
        self.last_clear = Some(LastClear {
            count: report.lines() as u8,
            perfect_clear: report.perfect_clear,
            rows: report.rows,
        });
        if self.state == ControllerState::LineClearing {
            self.set_state(ControllerState::Playing);
        }
        self.after_lock();
    }

    fn after_lock(&mut self) {
        if self.grid.hidden_rows_occupied() {
            self.game_over(TopOut::LockOut);
        } else {
            self.spawn_next();
        }
    }

    fn game_over(&mut self, reason: TopOut) {
        self.active = None;
        self.top_out = Some(reason);
        self.set_state(ControllerState::GameOver);

        let summary = GameSummary {
            score: self.score.score(),
            level: self.score.level(),
            lines: self.score.lines(),
            max_combo: self.score.max_combo(),
            reason,
            stats: *self.score.stats(),
        };
        self.events.emit(GameEvent::GameOver { summary });
        self.record_high_score(summary);
    }

    fn record_high_score(&mut self, summary: GameSummary) {
        if summary.score == 0 {
            return;
        }
        let entry = HighScoreEntry::new(
            self.config.player_name.clone(),
            summary.score,
            summary.level,
            summary.lines,
        );
        let Some(rank) = self.high_scores.insert(entry) else {
            return;
        };
        if let Err(err) = self.store.save(self.high_scores.entries()) {
            eprintln!("[HighScores] save failed, score kept for this session only: {err:#}");
        }
        self.events.emit(GameEvent::HighScore {
            rank,
            score: summary.score,
        });
    }
}

impl Default for GameController {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

impl std::fmt::Debug for GameController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameController")
            .field("state", &self.state)
            .field("episode_id", &self.episode_id)
            .field("piece_id", &self.piece_id)
            .field("score", &self.score.score())
            .field("events", &self.events)
            .finish()
    }
}
