use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use serde::Deserialize;

/// Canonical movement directions over the grid.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns the opposite direction.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Unit vector `(dx, dy)`; `y` grows downwards.
    #[must_use]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

/// Returns whether a direction change is legal (no immediate 180° turns).
#[must_use]
pub fn direction_change_is_valid(current: Direction, next: Direction) -> bool {
    next != current.opposite()
}

/// Player actions produced by the input surface.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Command {
    Turn(Direction),
    Start,
    Reset,
    Quit,
}

/// Maps one key event to a command, ignoring releases and unbound keys.
#[must_use]
pub fn map_key(key: KeyEvent) -> Option<Command> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Command::Quit);
    }

    let command = match key.code {
        KeyCode::Up | KeyCode::Char('w' | 'W' | 'k') => Command::Turn(Direction::Up),
        KeyCode::Down | KeyCode::Char('s' | 'S' | 'j') => Command::Turn(Direction::Down),
        KeyCode::Left | KeyCode::Char('a' | 'A' | 'h') => Command::Turn(Direction::Left),
        KeyCode::Right | KeyCode::Char('d' | 'D' | 'l') => Command::Turn(Direction::Right),
        KeyCode::Enter | KeyCode::Char(' ') => Command::Start,
        KeyCode::Char('r' | 'R') => Command::Reset,
        KeyCode::Esc | KeyCode::Char('q' | 'Q') => Command::Quit,
        _ => return None,
    };

    Some(command)
}

/// Reads terminal events and translates them into commands.
#[derive(Debug, Default)]
pub struct InputHandler;

impl InputHandler {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Waits up to `timeout` for one event and maps it.
    ///
    /// Returns `Ok(None)` on timeout or when the event carries no command.
    pub fn poll(&mut self, timeout: Duration) -> io::Result<Option<Command>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }

        match event::read()? {
            Event::Key(key) => Ok(map_key(key)),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};

    use super::{direction_change_is_valid, map_key, Command, Direction};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn opposite_direction_is_correct() {
        assert_eq!(Direction::Up.opposite(), Direction::Down);
        assert_eq!(Direction::Down.opposite(), Direction::Up);
        assert_eq!(Direction::Left.opposite(), Direction::Right);
        assert_eq!(Direction::Right.opposite(), Direction::Left);
    }

    #[test]
    fn reversals_are_invalid() {
        assert!(!direction_change_is_valid(Direction::Up, Direction::Down));
        assert!(!direction_change_is_valid(
            Direction::Right,
            Direction::Left
        ));

        assert!(direction_change_is_valid(Direction::Up, Direction::Left));
        assert!(direction_change_is_valid(Direction::Up, Direction::Up));
    }

    #[test]
    fn arrow_and_letter_keys_turn() {
        assert_eq!(
            map_key(press(KeyCode::Up)),
            Some(Command::Turn(Direction::Up))
        );
        assert_eq!(
            map_key(press(KeyCode::Char('a'))),
            Some(Command::Turn(Direction::Left))
        );
        assert_eq!(
            map_key(press(KeyCode::Char('l'))),
            Some(Command::Turn(Direction::Right))
        );
    }

    #[test]
    fn control_keys_map_to_lifecycle_commands() {
        assert_eq!(map_key(press(KeyCode::Enter)), Some(Command::Start));
        assert_eq!(map_key(press(KeyCode::Char('r'))), Some(Command::Reset));
        assert_eq!(map_key(press(KeyCode::Esc)), Some(Command::Quit));
        assert_eq!(
            map_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Command::Quit)
        );
        assert_eq!(map_key(press(KeyCode::Char('x'))), None);
    }

    #[test]
    fn key_release_is_ignored() {
        let release = KeyEvent {
            code: KeyCode::Up,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };

        assert_eq!(map_key(release), None);
    }
}
