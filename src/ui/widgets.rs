//! Reusable UI widgets
//!
//! Small building blocks shared by the dashboard panels:
//! - Labelled progress gauges
//! - Flash messages
//! - Status bar

use crate::types::Progress;
use crate::ui::Theme;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Clear, Gauge, Paragraph},
    Frame,
};

/// Width reserved for the row label ("Month ")
const LABEL_WIDTH: u16 = 6;

/// Render one labelled progress row: `Day   [██████      ] 42.3%`
pub fn render_progress_row(
    frame: &mut Frame,
    label: &str,
    progress: Progress,
    theme: &Theme,
    area: Rect,
) {
    let [label_area, gauge_area] =
        Layout::horizontal([Constraint::Length(LABEL_WIDTH), Constraint::Min(1)]).areas(area);

    frame.render_widget(Paragraph::new(label).style(theme.text_dim()), label_area);

    let gauge = Gauge::default()
        .gauge_style(theme.gauge())
        .ratio(progress.ratio())
        .label(Span::styled(progress.label(), theme.text()));
    frame.render_widget(gauge, gauge_area);
}

/// Render a flash message (bottom of screen)
pub fn render_flash_message(
    frame: &mut Frame,
    message: &str,
    is_error: bool,
    theme: &Theme,
    area: Rect,
) {
    let style = if is_error { theme.error() } else { theme.success() };
    let prefix = if is_error { "✗ " } else { "✓ " };

    if area.is_empty() {
        return;
    }

    let flash_area = bottom_line(area);

    frame.render_widget(Clear, flash_area);

    let flash = Paragraph::new(Line::from(vec![
        Span::styled(prefix, style),
        Span::styled(message, style),
    ]))
    .style(theme.text());

    frame.render_widget(flash, flash_area);
}

/// Render status bar at bottom
pub fn render_status_bar(
    frame: &mut Frame,
    left_content: &str,
    right_content: &str,
    theme: &Theme,
    area: Rect,
) {
    if area.is_empty() {
        return;
    }

    let status_area = bottom_line(area);

    frame.render_widget(Clear, status_area);

    let left_widget = Paragraph::new(left_content).style(theme.text_dim());

    let right_len = right_content.chars().count() as u16;
    let right_area = Rect {
        x: status_area.x + status_area.width.saturating_sub(right_len + 1),
        y: status_area.y,
        width: (right_len + 1).min(status_area.width),
        height: 1,
    };
    let right_widget = Paragraph::new(right_content).style(theme.text_dim());

    frame.render_widget(left_widget, status_area);
    frame.render_widget(right_widget, right_area);
}

/// Helper: Last row of a non-empty area
fn bottom_line(area: Rect) -> Rect {
    Rect {
        x: area.x,
        y: area.y + area.height - 1,
        width: area.width,
        height: 1,
    }
}

/// Helper: Create a centered rect of given size
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;
    Rect { x, y, width, height }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect() {
        let area = Rect::new(0, 0, 100, 50);
        let panel = centered_rect(40, 20, area);

        assert_eq!(panel.x, 30);
        assert_eq!(panel.y, 15);
        assert_eq!(panel.width, 40);
        assert_eq!(panel.height, 20);
    }

    #[test]
    fn test_bottom_line() {
        let line = bottom_line(Rect::new(2, 3, 40, 5));
        assert_eq!(line, Rect::new(2, 7, 40, 1));
    }

    #[test]
    fn test_centered_rect_clamps_to_area() {
        let area = Rect::new(5, 5, 30, 10);
        let panel = centered_rect(80, 40, area);

        assert_eq!(panel, area);
    }
}
