use std::error::Error as _;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;
use grid_snake::config::{config_path, load_config_from_path, EngineConfig};
use grid_snake::engine::{GameEngine, TickOutcome};
use grid_snake::error::AppError;
use grid_snake::input::InputHandler;
use grid_snake::logging::{init_file_logger, LogLevel};
use grid_snake::runtime::{App, Flow};
use grid_snake::terminal_runtime::{install_panic_hook, TerminalSession};
use log::{info, warn};

/// Input poll timeout used while no game is running.
const IDLE_POLL: Duration = Duration::from_millis(250);

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Cells per side of the square board. Recenters the start cell.
    #[arg(long)]
    grid_size: Option<u16>,

    /// Milliseconds between simulation ticks.
    #[arg(long = "tick-ms")]
    tick_interval_ms: Option<u64>,

    /// Points awarded per food eaten.
    #[arg(long)]
    points_per_food: Option<u32>,

    /// Fixed RNG seed for reproducible food placement.
    #[arg(long)]
    seed: Option<u64>,

    /// JSON config file. Defaults to the platform config directory.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write logs to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,
}

impl Cli {
    fn apply_overrides(&self, config: &mut EngineConfig) {
        if let Some(grid_size) = self.grid_size {
            config.grid_size = grid_size;
            config.start = None;
        }
        if let Some(tick_interval_ms) = self.tick_interval_ms {
            config.tick_interval_ms = tick_interval_ms;
        }
        if let Some(points) = self.points_per_food {
            config.points_per_food = points;
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("grid-snake: {error}");
            let mut source = error.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), AppError> {
    if let Some(path) = &cli.log_file {
        init_file_logger(path, cli.log_level)?;
    }

    let config = resolve_config(cli)?;
    info!("starting with {config:?}");

    let engine = match cli.seed {
        Some(seed) => GameEngine::new_with_seed(config, seed)?,
        None => GameEngine::new(config)?,
    };
    let mut app = App::new(engine);

    install_panic_hook();
    let mut session = TerminalSession::enter()?;
    let mut input = InputHandler::new();

    session.draw(&app.engine().snapshot())?;
    loop {
        let timeout = app.poll_timeout(Instant::now(), IDLE_POLL);
        let mut dirty = false;

        if let Some(command) = input.poll(timeout)? {
            if app.handle(command, Instant::now()) == Flow::Quit {
                break;
            }
            dirty = true;
        }

        if let Some(outcome) = app.update(Instant::now()) {
            dirty |= outcome != TickOutcome::Idle;
        }

        if dirty {
            session.draw(&app.engine().snapshot())?;
        }
    }

    info!("exiting with score {}", app.engine().score());
    Ok(())
}

/// Defaults, then the config file, then command-line overrides.
fn resolve_config(cli: &Cli) -> Result<EngineConfig, AppError> {
    let mut config = match cli.config.clone().or_else(config_path) {
        Some(path) => load_config_from_path(&path)?,
        None => {
            warn!("no config directory on this platform, using defaults");
            EngineConfig::default()
        }
    };

    cli.apply_overrides(&mut config);
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{Cli, EngineConfig};
    use grid_snake::snake::Position;

    #[test]
    fn cli_overrides_replace_file_values() {
        let cli = Cli::parse_from(["grid-snake", "--grid-size", "12", "--tick-ms", "90"]);
        let mut config = EngineConfig {
            start: Some(Position::new(15, 15)),
            ..EngineConfig::default()
        };

        cli.apply_overrides(&mut config);

        assert_eq!(config.grid_size, 12);
        assert_eq!(config.tick_interval_ms, 90);
        assert_eq!(config.start_position(), Position::new(6, 6));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn no_flags_keep_config() {
        let cli = Cli::parse_from(["grid-snake"]);
        let mut config = EngineConfig::default();

        cli.apply_overrides(&mut config);

        assert_eq!(config, EngineConfig::default());
    }
}
