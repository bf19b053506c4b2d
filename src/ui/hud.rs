use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use crate::config::THEME;
use crate::engine::{GamePhase, Snapshot};

/// Renders the one-line status bar above the board.
pub fn render_hud(frame: &mut Frame<'_>, area: Rect, snapshot: &Snapshot) {
    frame.render_widget(
        Paragraph::new(hud_line(snapshot, usize::from(area.width))).alignment(Alignment::Center),
        area,
    );
}

/// Builds the status line, dropping the secondary fields when `available_width` is too small.
fn hud_line(snapshot: &Snapshot, available_width: usize) -> Line<'static> {
    let score = format!("Score {}", snapshot.score);
    let details = format!(
        "  Length {}  {}",
        snapshot.snake.len(),
        phase_label(snapshot.phase)
    );

    let score_span = Span::styled(
        score.clone(),
        Style::default()
            .fg(THEME.hud_score)
            .add_modifier(Modifier::BOLD),
    );

    if score.width() + details.width() > available_width {
        return Line::from(score_span);
    }

    Line::from(vec![
        score_span,
        Span::styled(details, Style::default().fg(THEME.hud_muted)),
    ])
}

fn phase_label(phase: GamePhase) -> &'static str {
    match phase {
        GamePhase::NotStarted => "Ready",
        GamePhase::Running => "Running",
        GamePhase::GameOver => "Game over",
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::{GamePhase, Snapshot};
    use crate::input::Direction;
    use crate::snake::Position;

    use super::hud_line;

    fn snapshot() -> Snapshot {
        Snapshot {
            grid_size: 20,
            snake: vec![Position::new(3, 3), Position::new(2, 3)],
            food: None,
            direction: Direction::Right,
            pending_direction: Direction::Right,
            score: 40,
            phase: GamePhase::Running,
            death_reason: None,
            ticks: 12,
        }
    }

    fn plain(line: &ratatui::text::Line<'_>) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn wide_hud_shows_all_fields() {
        assert_eq!(
            plain(&hud_line(&snapshot(), 80)),
            "Score 40  Length 2  Running"
        );
    }

    #[test]
    fn narrow_hud_keeps_only_score() {
        assert_eq!(plain(&hud_line(&snapshot(), 12)), "Score 40");
    }
}
