//! Theme definitions for daybar
//!
//! Two palettes, one per `ThemeMode`: a Gruvbox light and a Gruvbox dark.

use crate::types::ThemeMode;
use ratatui::style::{Color, Modifier, Style};

/// Complete theme with all required colors
#[derive(Debug, Clone)]
pub struct Theme {
    // Base colors
    pub bg: Color,
    pub fg: Color,
    pub fg_dim: Color,

    // Accent colors
    pub accent: Color,
    pub accent_dim: Color,

    // Status colors
    pub success: Color,
    pub error: Color,

    // UI element colors
    pub border: Color,
    pub gauge_filled: Color,
    pub gauge_empty: Color,
}

impl Theme {
    /// Create a theme for a mode
    pub fn from_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Light => Self::light(),
            ThemeMode::Dark => Self::dark(),
        }
    }

    /// Gruvbox light theme (default)
    pub fn light() -> Self {
        Self {
            // Base
            bg: Color::Rgb(251, 241, 199),        // #fbf1c7
            fg: Color::Rgb(60, 56, 54),           // #3c3836
            fg_dim: Color::Rgb(124, 111, 100),    // #7c6f64

            // Accent (orange)
            accent: Color::Rgb(175, 58, 3),       // #af3a03
            accent_dim: Color::Rgb(214, 93, 14),  // #d65d0e

            // Status
            success: Color::Rgb(121, 116, 14),    // #79740e
            error: Color::Rgb(157, 0, 6),         // #9d0006

            // UI elements
            border: Color::Rgb(189, 174, 147),    // #bdae93
            gauge_filled: Color::Rgb(7, 102, 120),   // #076678
            gauge_empty: Color::Rgb(235, 219, 178),  // #ebdbb2
        }
    }

    /// Gruvbox dark theme
    pub fn dark() -> Self {
        Self {
            // Base
            bg: Color::Rgb(40, 40, 40),           // #282828
            fg: Color::Rgb(235, 219, 178),        // #ebdbb2
            fg_dim: Color::Rgb(146, 131, 116),    // #928374

            // Accent (orange)
            accent: Color::Rgb(254, 128, 25),     // #fe8019
            accent_dim: Color::Rgb(214, 93, 14),  // #d65d0e

            // Status
            success: Color::Rgb(184, 187, 38),    // #b8bb26
            error: Color::Rgb(251, 73, 52),       // #fb4934

            // UI elements
            border: Color::Rgb(80, 73, 69),       // #504945
            gauge_filled: Color::Rgb(131, 165, 152), // #83a598
            gauge_empty: Color::Rgb(60, 56, 54),     // #3c3836
        }
    }

    // Style helpers for common UI patterns

    /// Background fill for blocks
    pub fn block_style(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    /// Default text style
    pub fn text(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    /// Dimmed text style
    pub fn text_dim(&self) -> Style {
        Style::default().fg(self.fg_dim).bg(self.bg)
    }

    /// Title/header style
    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .bg(self.bg)
            .add_modifier(Modifier::BOLD)
    }

    /// The big clock readout
    pub fn clock(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .bg(self.bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border(&self) -> Style {
        Style::default().fg(self.border).bg(self.bg)
    }

    /// Filled part of a progress gauge
    pub fn gauge(&self) -> Style {
        Style::default().fg(self.gauge_filled).bg(self.gauge_empty)
    }

    pub fn quote(&self) -> Style {
        Style::default()
            .fg(self.fg)
            .bg(self.bg)
            .add_modifier(Modifier::ITALIC)
    }

    pub fn author(&self) -> Style {
        Style::default().fg(self.accent_dim).bg(self.bg)
    }

    pub fn success(&self) -> Style {
        Style::default().fg(self.success).bg(self.bg)
    }

    pub fn error(&self) -> Style {
        Style::default().fg(self.error).bg(self.bg)
    }
}
