use std::time::{Duration, Instant};

use log::{debug, info};

use crate::engine::{GameEngine, GamePhase, TickOutcome};
use crate::input::Command;

/// Fixed-period tick source, active only while a game runs.
#[derive(Debug, Clone, Copy)]
pub struct TickTimer {
    interval: Duration,
    last: Option<Instant>,
}

impl TickTimer {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// Arms the timer; the first tick fires one interval after `now`.
    pub fn start(&mut self, now: Instant) {
        self.last = Some(now);
    }

    pub fn stop(&mut self) {
        self.last = None;
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.last.is_some()
    }

    /// Returns true once per elapsed interval. Missed intervals are not replayed.
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(last) = self.last else {
            return false;
        };

        if now.saturating_duration_since(last) < self.interval {
            return false;
        }

        self.last = Some(now);
        true
    }

    /// Time left until the next tick, or `None` when stopped.
    #[must_use]
    pub fn time_until_next(&self, now: Instant) -> Option<Duration> {
        let last = self.last?;
        Some(self.interval.saturating_sub(now.saturating_duration_since(last)))
    }
}

/// Result of feeding one command to the [`App`].
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Run loop state: the engine plus the timer that drives it.
///
/// Starts the timer whenever the engine enters `Running` and stops it on any
/// exit, so a finished or reset game is never ticked.
#[derive(Debug)]
pub struct App {
    engine: GameEngine,
    timer: TickTimer,
}

impl App {
    #[must_use]
    pub fn new(engine: GameEngine) -> Self {
        let timer = TickTimer::new(engine.config().tick_interval());
        Self { engine, timer }
    }

    /// Applies one input command.
    ///
    /// `Start` is honoured from the start screen and after game over; `Reset`
    /// while running or after game over.
    pub fn handle(&mut self, command: Command, now: Instant) -> Flow {
        match command {
            Command::Quit => {
                info!("quit requested");
                return Flow::Quit;
            }
            Command::Start => match self.engine.phase() {
                GamePhase::NotStarted | GamePhase::GameOver => self.engine.start(),
                GamePhase::Running => debug!("start ignored while running"),
            },
            Command::Reset => match self.engine.phase() {
                GamePhase::Running | GamePhase::GameOver => self.engine.reset(),
                GamePhase::NotStarted => debug!("reset ignored on start screen"),
            },
            Command::Turn(direction) => self.engine.request_direction(direction),
        }

        self.sync_timer(now);
        Flow::Continue
    }

    /// Ticks the engine when the timer is due. Returns the tick outcome, if any.
    pub fn update(&mut self, now: Instant) -> Option<TickOutcome> {
        if !self.timer.poll(now) {
            return None;
        }

        let outcome = self.engine.tick();
        self.sync_timer(now);
        Some(outcome)
    }

    fn sync_timer(&mut self, now: Instant) {
        match (self.engine.phase(), self.timer.is_running()) {
            (GamePhase::Running, false) => {
                self.timer.start(now);
                debug!("tick timer started");
            }
            (GamePhase::NotStarted | GamePhase::GameOver, true) => {
                self.timer.stop();
                debug!("tick timer stopped");
            }
            _ => {}
        }
    }

    /// Poll timeout for the input source: the time to the next tick, or
    /// `idle` when no game runs.
    #[must_use]
    pub fn poll_timeout(&self, now: Instant, idle: Duration) -> Duration {
        self.timer.time_until_next(now).unwrap_or(idle)
    }

    #[must_use]
    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    #[must_use]
    pub fn timer(&self) -> &TickTimer {
        &self.timer
    }
}
