use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::debug;
use ratatui::style::Color;
use ratatui::symbols::border;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::input::Direction;
use crate::snake::Position;

const APP_DIR_NAME: &str = "grid-snake";
const CONFIG_FILE_NAME: &str = "config.json";

/// Default side length of the square grid.
pub const DEFAULT_GRID_SIZE: u16 = 20;

/// Default tick interval in milliseconds.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 150;

/// Default score reward per food eaten.
pub const DEFAULT_POINTS_PER_FOOD: u32 = 10;

/// Tunables the engine is constructed with.
///
/// Every field may be omitted from a config file; missing fields keep their
/// defaults.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub grid_size: u16,
    pub tick_interval_ms: u64,
    pub points_per_food: u32,
    /// Initial head cell. `None` means the grid center.
    pub start: Option<Position>,
    pub start_direction: Direction,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            points_per_food: DEFAULT_POINTS_PER_FOOD,
            start: None,
            start_direction: Direction::Right,
        }
    }
}

impl EngineConfig {
    /// Checks the values a game cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size == 0 {
            return Err(ConfigError::ZeroGridSize);
        }

        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }

        let start = self.start_position();
        if !start.is_within_bounds(self.grid_size) {
            return Err(ConfigError::StartOutOfBounds {
                x: start.x,
                y: start.y,
                grid_size: self.grid_size,
            });
        }

        Ok(())
    }

    /// Returns the cell the snake starts on.
    #[must_use]
    pub fn start_position(&self) -> Position {
        self.start.unwrap_or_else(|| {
            let center = i32::from(self.grid_size / 2);
            Position::new(center, center)
        })
    }

    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    #[must_use]
    pub fn total_cells(&self) -> usize {
        usize::from(self.grid_size) * usize::from(self.grid_size)
    }
}

/// Returns the platform-correct default config file path.
#[must_use]
pub fn config_path() -> Option<PathBuf> {
    let mut base = dirs::config_dir()?;
    base.push(APP_DIR_NAME);
    base.push(CONFIG_FILE_NAME);
    Some(base)
}

/// Loads engine configuration from a JSON file.
///
/// Returns defaults when the file does not exist. Returns `Err` when the file
/// exists but cannot be read or parsed. The result is not validated.
pub fn load_config_from_path(path: &Path) -> Result<EngineConfig, ConfigError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("no config file at {}, using defaults", path.display());
            return Ok(EngineConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    serde_json::from_str::<EngineConfig>(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Colors applied to all visual elements.
#[derive(Debug)]
pub struct Theme {
    pub snake_head: Color,
    pub snake_body: Color,
    pub food: Color,
    pub border_fg: Color,
    pub hud_score: Color,
    pub hud_muted: Color,
    pub menu_title: Color,
    pub menu_footer: Color,
}

pub const THEME: Theme = Theme {
    snake_head: Color::LightGreen,
    snake_body: Color::Green,
    food: Color::Red,
    border_fg: Color::White,
    hud_score: Color::White,
    hud_muted: Color::DarkGray,
    menu_title: Color::Green,
    menu_footer: Color::DarkGray,
};

/// Terminal columns per logical cell; keeps cells roughly square.
pub const CELL_WIDTH: u16 = 2;

pub const GLYPH_SNAKE_HEAD: &str = "██";
pub const GLYPH_SNAKE_BODY: &str = "▓▓";
pub const GLYPH_FOOD: &str = "()";

pub const BORDER: border::Set = border::ROUNDED;

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    use super::{load_config_from_path, EngineConfig};
    use crate::error::ConfigError;
    use crate::input::Direction;
    use crate::snake::Position;

    #[test]
    fn defaults_match_reference_game() {
        let config = EngineConfig::default();

        assert_eq!(config.grid_size, 20);
        assert_eq!(config.tick_interval(), Duration::from_millis(150));
        assert_eq!(config.points_per_food, 10);
        assert_eq!(config.start_position(), Position::new(10, 10));
        assert_eq!(config.start_direction, Direction::Right);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_grid_is_rejected() {
        let config = EngineConfig {
            grid_size: 0,
            ..EngineConfig::default()
        };

        assert!(matches!(config.validate(), Err(ConfigError::ZeroGridSize)));
    }

    #[test]
    fn zero_tick_interval_is_rejected() {
        let config = EngineConfig {
            tick_interval_ms: 0,
            ..EngineConfig::default()
        };

        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroTickInterval)
        ));
    }

    #[test]
    fn start_outside_grid_is_rejected() {
        let config = EngineConfig {
            grid_size: 5,
            start: Some(Position::new(5, 2)),
            ..EngineConfig::default()
        };

        assert!(matches!(
            config.validate(),
            Err(ConfigError::StartOutOfBounds { x: 5, y: 2, .. })
        ));
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let path = unique_test_path("missing");

        let loaded = load_config_from_path(&path).expect("missing file should return defaults");
        assert_eq!(loaded, EngineConfig::default());
    }

    #[test]
    fn partial_config_file_keeps_other_defaults() {
        let path = unique_test_path("partial");
        write_test_file(
            &path,
            r#"{ "grid_size": 12, "start": { "x": 1, "y": 2 }, "start_direction": "down" }"#,
        );

        let loaded = load_config_from_path(&path).expect("load should succeed");

        assert_eq!(loaded.grid_size, 12);
        assert_eq!(loaded.start_position(), Position::new(1, 2));
        assert_eq!(loaded.start_direction, Direction::Down);
        assert_eq!(loaded.points_per_food, 10);
        cleanup_test_path(&path);
    }

    #[test]
    fn malformed_config_file_returns_error() {
        let path = unique_test_path("malformed");
        write_test_file(&path, "not-json");

        assert!(matches!(
            load_config_from_path(&path),
            Err(ConfigError::Parse { .. })
        ));
        cleanup_test_path(&path);
    }

    fn write_test_file(path: &PathBuf, contents: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("test parent directory should be creatable");
        }
        fs::write(path, contents).expect("test file write should succeed");
    }

    fn unique_test_path(label: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time should be after epoch")
            .as_nanos();

        std::env::temp_dir()
            .join("grid-snake-config-tests")
            .join(format!("{label}-{nanos}"))
            .join("config.json")
    }

    fn cleanup_test_path(path: &PathBuf) {
        let _ = fs::remove_file(path);
        if let Some(parent) = path.parent() {
            let _ = fs::remove_dir(parent);
        }
    }
}
