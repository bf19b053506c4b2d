use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::input::Direction;

/// Rejected engine or file configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("grid size must be at least 1")]
    ZeroGridSize,

    #[error("tick interval must be at least 1 ms")]
    ZeroTickInterval,

    #[error("start cell ({x}, {y}) lies outside the {grid_size}x{grid_size} grid")]
    StartOutOfBounds { x: i32, y: i32, grid_size: u16 },

    #[error("snapshot grid size {snapshot} does not match configured size {config}")]
    GridMismatch { snapshot: u16, config: u16 },

    #[error("snapshot snake has no segments")]
    EmptySnake,

    #[error("snapshot cell ({x}, {y}) lies outside the grid")]
    SnapshotOutOfBounds { x: i32, y: i32 },

    #[error("snapshot snake occupies ({x}, {y}) more than once")]
    DuplicateSegment { x: i32, y: i32 },

    #[error("snapshot pending direction {pending:?} reverses committed direction {direction:?}")]
    PendingReversal {
        direction: Direction,
        pending: Direction,
    },

    #[error("snapshot food at ({x}, {y}) overlaps the snake")]
    FoodOnSnake { x: i32, y: i32 },

    #[error("failed to read config file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Top-level failure of the terminal application.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("terminal I/O failed")]
    Io(#[from] io::Error),

    #[error("failed to install logger")]
    Logger(#[from] log::SetLoggerError),
}
