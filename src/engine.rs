use std::collections::HashSet;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::EngineConfig;
use crate::error::ConfigError;
use crate::food::spawn_position;
use crate::input::{direction_change_is_valid, Direction};
use crate::snake::{Position, Snake};

/// Top-level game state machine.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GamePhase {
    NotStarted,
    Running,
    GameOver,
}

/// Why the last game ended.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum DeathReason {
    WallCollision,
    SelfCollision,
}

/// What a single `tick` did.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TickOutcome {
    /// Phase was not `Running`; nothing changed.
    Idle,
    Moved,
    Ate { score: u32 },
    Died(DeathReason),
}

/// Owned, read-only copy of the engine state for renderers.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Snapshot {
    pub grid_size: u16,
    /// Head first.
    pub snake: Vec<Position>,
    pub food: Option<Position>,
    pub direction: Direction,
    pub pending_direction: Direction,
    pub score: u32,
    pub phase: GamePhase,
    pub death_reason: Option<DeathReason>,
    pub ticks: u64,
}

impl Snapshot {
    #[must_use]
    pub fn head(&self) -> Option<Position> {
        self.snake.first().copied()
    }
}

/// Authoritative single-player game state.
///
/// Driven synchronously: the owner calls [`GameEngine::tick`] at the tick
/// interval and [`GameEngine::request_direction`] on input. Both take
/// `&mut self`, so a multi-threaded host has to put the engine behind one
/// lock and can never interleave a turn with a tick.
#[derive(Debug, Clone)]
pub struct GameEngine {
    config: EngineConfig,
    snake: Snake,
    food: Option<Position>,
    direction: Direction,
    pending_direction: Direction,
    score: u32,
    phase: GamePhase,
    death_reason: Option<DeathReason>,
    ticks: u64,
    rng: StdRng,
}

impl GameEngine {
    /// Creates an engine in `NotStarted` seeded from OS entropy.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Creates a deterministic engine for tests and reproducible runs.
    pub fn new_with_seed(config: EngineConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    /// Rebuilds an engine from a previously taken snapshot.
    ///
    /// Rejects snapshots whose grid differs from `config`, whose snake is
    /// empty, leaves the grid or overlaps itself, whose food sits on the
    /// snake, or whose pending direction reverses the committed one.
    pub fn from_snapshot(
        config: EngineConfig,
        snapshot: Snapshot,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        let mut engine = Self::new_with_seed(config, seed)?;
        let grid_size = config.grid_size;
        if snapshot.grid_size != grid_size {
            return Err(ConfigError::GridMismatch {
                snapshot: snapshot.grid_size,
                config: grid_size,
            });
        }

        if let Some(cell) = snapshot
            .snake
            .iter()
            .chain(snapshot.food.iter())
            .find(|cell| !cell.is_within_bounds(grid_size))
        {
            return Err(ConfigError::SnapshotOutOfBounds {
                x: cell.x,
                y: cell.y,
            });
        }

        let mut seen = HashSet::with_capacity(snapshot.snake.len());
        if let Some(cell) = snapshot.snake.iter().find(|cell| !seen.insert(**cell)) {
            return Err(ConfigError::DuplicateSegment {
                x: cell.x,
                y: cell.y,
            });
        }

        if !direction_change_is_valid(snapshot.direction, snapshot.pending_direction) {
            return Err(ConfigError::PendingReversal {
                direction: snapshot.direction,
                pending: snapshot.pending_direction,
            });
        }

        let snake = Snake::from_segments(snapshot.snake).ok_or(ConfigError::EmptySnake)?;
        if let Some(food) = snapshot.food.filter(|food| snake.occupies(*food)) {
            return Err(ConfigError::FoodOnSnake {
                x: food.x,
                y: food.y,
            });
        }

        engine.snake = snake;
        engine.food = snapshot.food;
        engine.direction = snapshot.direction;
        engine.pending_direction = snapshot.pending_direction;
        engine.score = snapshot.score;
        engine.phase = snapshot.phase;
        engine.death_reason = snapshot.death_reason;
        engine.ticks = snapshot.ticks;

        Ok(engine)
    }

    fn with_rng(config: EngineConfig, rng: StdRng) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            config,
            snake: Snake::new(config.start_position()),
            food: None,
            direction: config.start_direction,
            pending_direction: config.start_direction,
            score: 0,
            phase: GamePhase::NotStarted,
            death_reason: None,
            ticks: 0,
            rng,
        })
    }

    /// Begins a fresh game from any phase.
    pub fn start(&mut self) {
        self.restore_initial_snake();
        self.food = spawn_position(&mut self.rng, self.config.grid_size, &self.snake);
        self.phase = GamePhase::Running;
        info!(
            "game started on {0}x{0} grid, food at {1:?}",
            self.config.grid_size, self.food
        );
    }

    /// Returns to the start screen. Leaves no food on the board.
    pub fn reset(&mut self) {
        self.restore_initial_snake();
        self.food = None;
        self.phase = GamePhase::NotStarted;
        info!("game reset");
    }

    fn restore_initial_snake(&mut self) {
        self.snake = Snake::new(self.config.start_position());
        self.direction = self.config.start_direction;
        self.pending_direction = self.config.start_direction;
        self.score = 0;
        self.death_reason = None;
        self.ticks = 0;
    }

    /// Records the direction the next tick moves in.
    ///
    /// Ignored outside `Running` and when `direction` reverses the last
    /// committed direction. Later requests before the same tick overwrite
    /// earlier ones; each is checked against the committed direction only.
    pub fn request_direction(&mut self, direction: Direction) {
        if self.phase != GamePhase::Running {
            return;
        }

        if !direction_change_is_valid(self.direction, direction) {
            debug!("rejected reversal {:?} -> {direction:?}", self.direction);
            return;
        }

        self.pending_direction = direction;
    }

    /// Advances simulation by one cell.
    pub fn tick(&mut self) -> TickOutcome {
        if self.phase != GamePhase::Running {
            return TickOutcome::Idle;
        }

        let next_head = self.snake.head().step(self.pending_direction);

        if !next_head.is_within_bounds(self.config.grid_size) {
            return self.end_game(DeathReason::WallCollision);
        }

        // Checked against the pre-move body, so the tail cell is fatal too.
        if self.snake.occupies(next_head) {
            return self.end_game(DeathReason::SelfCollision);
        }

        self.ticks += 1;
        self.direction = self.pending_direction;
        self.snake.push_head(next_head);

        if self.food == Some(next_head) {
            self.score = self.score.saturating_add(self.config.points_per_food);
            self.food = spawn_position(&mut self.rng, self.config.grid_size, &self.snake);
            debug!(
                "food eaten at {next_head:?}, score {}, next food {:?}",
                self.score, self.food
            );
            return TickOutcome::Ate { score: self.score };
        }

        self.snake.drop_tail();
        TickOutcome::Moved
    }

    fn end_game(&mut self, reason: DeathReason) -> TickOutcome {
        self.phase = GamePhase::GameOver;
        self.death_reason = Some(reason);
        info!(
            "game over ({reason:?}) with score {} after {} ticks",
            self.score, self.ticks
        );
        TickOutcome::Died(reason)
    }

    /// Returns an owned copy of everything a renderer needs.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            grid_size: self.config.grid_size,
            snake: self.snake.segments().copied().collect(),
            food: self.food,
            direction: self.direction,
            pending_direction: self.pending_direction,
            score: self.score,
            phase: self.phase,
            death_reason: self.death_reason,
            ticks: self.ticks,
        }
    }

    #[must_use]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    #[must_use]
    pub fn food(&self) -> Option<Position> {
        self.food
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[must_use]
    pub fn pending_direction(&self) -> Direction {
        self.pending_direction
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
