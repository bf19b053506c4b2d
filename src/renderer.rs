use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Block;
use ratatui::Frame;

use crate::config::{BORDER, CELL_WIDTH, GLYPH_FOOD, GLYPH_SNAKE_BODY, GLYPH_SNAKE_HEAD, THEME};
use crate::engine::{GamePhase, Snapshot};
use crate::snake::Position;
use crate::ui::hud::render_hud;
use crate::ui::menu::{render_game_over_menu, render_start_menu};

/// Renders the full game frame from an immutable snapshot.
pub fn render(frame: &mut Frame<'_>, snapshot: &Snapshot) {
    let area = frame.area();
    let [hud_area, field_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(area);

    render_hud(frame, hud_area, snapshot);

    let board_area = board_rect(field_area, snapshot.grid_size);
    let block = Block::bordered()
        .border_set(BORDER)
        .border_style(Style::new().fg(THEME.border_fg));

    let inner = block.inner(board_area);
    frame.render_widget(block, board_area);

    if matches!(snapshot.phase, GamePhase::Running | GamePhase::GameOver) {
        render_food(frame, inner, snapshot);
    }
    render_snake(frame, inner, snapshot);

    match snapshot.phase {
        GamePhase::NotStarted => render_start_menu(frame, board_area),
        GamePhase::GameOver => {
            render_game_over_menu(frame, board_area, snapshot.score, snapshot.death_reason);
        }
        GamePhase::Running => {}
    }
}

/// Centers the bordered board inside `area`, clipped to what fits.
fn board_rect(area: Rect, grid_size: u16) -> Rect {
    let width = grid_size.saturating_mul(CELL_WIDTH).saturating_add(2);
    let height = grid_size.saturating_add(2);

    let [column] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(area);
    let [board] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(column);

    board
}

fn render_food(frame: &mut Frame<'_>, inner: Rect, snapshot: &Snapshot) {
    let Some(food) = snapshot.food else {
        return;
    };
    let Some((x, y)) = logical_to_terminal(inner, snapshot.grid_size, food) else {
        return;
    };

    let buffer = frame.buffer_mut();
    buffer.set_string(x, y, GLYPH_FOOD, Style::new().fg(THEME.food));
}

fn render_snake(frame: &mut Frame<'_>, inner: Rect, snapshot: &Snapshot) {
    let buffer = frame.buffer_mut();

    // Tail first so the head is drawn last.
    for (index, segment) in snapshot.snake.iter().enumerate().rev() {
        let Some((x, y)) = logical_to_terminal(inner, snapshot.grid_size, *segment) else {
            continue;
        };

        if index == 0 {
            buffer.set_string(
                x,
                y,
                GLYPH_SNAKE_HEAD,
                Style::new()
                    .fg(THEME.snake_head)
                    .add_modifier(Modifier::BOLD),
            );
        } else {
            buffer.set_string(
                x,
                y,
                GLYPH_SNAKE_BODY,
                Style::new().fg(THEME.snake_body),
            );
        }
    }
}

fn logical_to_terminal(inner: Rect, grid_size: u16, position: Position) -> Option<(u16, u16)> {
    if !position.is_within_bounds(grid_size) {
        return None;
    }

    let x_offset = u16::try_from(position.x).ok()?.checked_mul(CELL_WIDTH)?;
    let y_offset = u16::try_from(position.y).ok()?;

    let x = inner.x.saturating_add(x_offset);
    let y = inner.y.saturating_add(y_offset);
    if x.saturating_add(CELL_WIDTH) > inner.right() || y >= inner.bottom() {
        return None;
    }

    Some((x, y))
}
