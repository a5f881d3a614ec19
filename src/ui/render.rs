//! Main rendering module
//!
//! Handles rendering the complete UI including:
//! - Header with the theme toggle icon
//! - Clock, calendar progress and quote panels
//! - Flash messages and status bar

use crate::app::App;
use crate::ui::widgets;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Widest the dashboard column gets on large terminals
const MAX_CONTENT_WIDTH: u16 = 72;

/// Main render function - entry point for all UI rendering
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Paint the whole screen in the theme background first
    frame.render_widget(Block::default().style(app.theme.block_style()), area);

    // Main layout: header, content, status bar
    let [header, content, status] = Layout::vertical([
        Constraint::Length(2), // Header
        Constraint::Min(0),    // Content
        Constraint::Length(1), // Status bar
    ])
    .areas(area);

    render_header(frame, app, header);

    let column = widgets::centered_rect(MAX_CONTENT_WIDTH, content.height, content);
    render_panels(frame, app, column);

    render_status_bar(frame, app, status);

    if let Some((msg, is_error, _)) = &app.flash_message {
        widgets::render_flash_message(frame, msg, *is_error, &app.theme, area);
    }
}

/// Render header with title and theme toggle
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    let block = Block::default()
        .style(theme.block_style())
        .title(" daybar ")
        .title_style(theme.title())
        .borders(Borders::BOTTOM)
        .border_style(theme.border());
    frame.render_widget(block, area);

    let toggle = Line::from(vec![
        Span::styled("[t] ", theme.text_dim()),
        Span::styled(app.theme_mode.icon(), theme.text()),
        Span::raw(" "),
    ]);
    let toggle_area = Rect { height: area.height.min(1), ..area };
    frame.render_widget(
        Paragraph::new(toggle).alignment(Alignment::Right),
        toggle_area,
    );
}

/// Stack the enabled panels top to bottom
fn render_panels(frame: &mut Frame, app: &App, area: Rect) {
    let display = &app.config.display;
    let show_quote = display.show_quote && app.config.quotes.enabled;

    let clock_height = if display.show_week_number { 5 } else { 4 };
    let mut constraints = vec![Constraint::Length(clock_height)];
    if display.show_progress {
        constraints.push(Constraint::Length(6));
    }
    if show_quote {
        constraints.push(Constraint::Min(4));
    }
    constraints.push(Constraint::Fill(1));

    let panels = Layout::vertical(constraints).split(area);
    let mut next = 0;

    render_clock_panel(frame, app, panels[next]);
    next += 1;

    if display.show_progress {
        render_progress_panel(frame, app, panels[next]);
        next += 1;
    }

    if show_quote {
        render_quote_panel(frame, app, panels[next]);
    }
}

/// Time, date and week number
fn render_clock_panel(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let snapshot = &app.snapshot;

    let mut lines = vec![
        Line::raw(""),
        Line::styled(snapshot.time.as_str(), theme.clock()),
        Line::styled(snapshot.date.as_str(), theme.text()),
    ];
    if app.config.display.show_week_number {
        lines.push(Line::styled(format!("Week {}", snapshot.week), theme.text_dim()));
    }

    let panel = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .style(theme.text());
    frame.render_widget(panel, area);
}

/// Day, week, month and year gauges
fn render_progress_panel(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    let block = Block::default()
        .title(" Progress ")
        .title_style(theme.title())
        .borders(Borders::ALL)
        .border_style(theme.border())
        .style(theme.block_style());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::vertical([Constraint::Length(1); 4]).split(inner);
    for ((label, progress), row) in app.snapshot.progress_rows().into_iter().zip(rows.iter()) {
        widgets::render_progress_row(frame, label, progress, theme, *row);
    }
}

/// Quote text and author
fn render_quote_panel(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    let mut block = Block::default()
        .title(" Quote of the hour ")
        .title_style(theme.title())
        .borders(Borders::ALL)
        .border_style(theme.border())
        .style(theme.block_style());

    let lines = match &app.quote {
        Some(update) => {
            block = block.title_top(
                Line::styled(format!(" {} ", update.origin.as_str()), theme.text_dim())
                    .alignment(Alignment::Right),
            );
            vec![
                Line::styled(update.quote.text_line(), theme.quote()),
                Line::raw(""),
                Line::styled(update.quote.author_line(), theme.author()).alignment(Alignment::Right),
            ]
        }
        None => vec![Line::styled("Fetching a quote…", theme.text_dim())],
    };

    let panel = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(panel, area);
}

/// Render status bar with keybindings
fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let hints = "[t] Theme  [r] Refresh quote  [q] Quit";
    let right = if app.is_fetching() { "fetching…" } else { "" };

    widgets::render_status_bar(frame, hints, right, &app.theme, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::config::Config;
    use crate::quote::QuoteSource;
    use crate::storage::MemoryStorage;
    use crate::types::Quote;
    use anyhow::{bail, Result};
    use chrono::NaiveDate;
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;

    struct Offline;

    impl QuoteSource for Offline {
        fn fetch(&self) -> Result<Quote> {
            bail!("offline")
        }
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_render_dashboard() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let app = App::new(
            Config::default(),
            Box::new(MemoryStorage::new()),
            Arc::new(FixedClock::at(start)),
            Arc::new(Offline),
        );

        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|frame| render(frame, &app)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("12:00:00 AM"));
        assert!(text.contains("Monday, January 1, 2024"));
        assert!(text.contains("Week 1"));
        assert!(text.contains("0.0%"));
        assert!(text.contains("Fetching a quote"));
    }

    fn app_at(year: i32, month: u32, day: u32) -> App {
        let start = NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(18, 30, 0)
            .unwrap();
        App::new(
            Config::default(),
            Box::new(MemoryStorage::new()),
            Arc::new(FixedClock::at(start)),
            Arc::new(Offline),
        )
    }

    #[test]
    fn test_render_tiny_terminal_keeps_status_bar() {
        let app = app_at(2024, 6, 15);

        let mut terminal = Terminal::new(TestBackend::new(20, 6)).unwrap();
        terminal.draw(|frame| render(frame, &app)).unwrap();

        let cells = terminal.backend().buffer().content();
        let last_row: String = cells[20 * 5..].iter().map(|cell| cell.symbol()).collect();
        assert!(last_row.starts_with("[t] Theme"), "status row was {:?}", last_row);
    }

    #[test]
    fn test_render_any_small_size_does_not_panic() {
        let app = app_at(2024, 2, 29);

        for height in 1..=12 {
            for width in [1, 5, 20, 40, 80] {
                let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
                terminal.draw(|frame| render(frame, &app)).unwrap();
            }
        }
    }
}
