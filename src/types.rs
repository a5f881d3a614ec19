//! Core data types for daybar
//!
//! This module defines the shared data structures used throughout the application.

use crate::storage::{Storage, THEME_KEY};
use anyhow::Result;

/// Visual mode of the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    /// Read the persisted preference, falling back to light
    pub fn load(storage: &dyn Storage) -> Self {
        storage
            .get(THEME_KEY)
            .and_then(|value| Self::parse(&value))
            .unwrap_or_default()
    }

    /// Write this mode as the persisted preference
    pub fn persist(self, storage: &mut dyn Storage) -> Result<()> {
        storage.set(THEME_KEY, self.as_str())
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(ThemeMode::Light),
            "dark" => Some(ThemeMode::Dark),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    /// Toggle icon: offers the mode you would switch to
    pub fn icon(&self) -> &'static str {
        match self {
            ThemeMode::Light => "🌙",
            ThemeMode::Dark => "☀️",
        }
    }
}

/// A quote as shown on the dashboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub text: String,
    pub author: String,
}

impl Quote {
    pub fn new(text: impl Into<String>, author: impl Into<String>) -> Self {
        Self { text: text.into(), author: author.into() }
    }

    /// Quote text wrapped in double quotes
    pub fn text_line(&self) -> String {
        format!("\"{}\"", self.text)
    }

    /// Author with a leading em dash
    pub fn author_line(&self) -> String {
        format!("— {}", self.author)
    }
}

/// Completion of a calendar period
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    /// Percentage in [0, 100)
    pub percent: f64,
}

impl Progress {
    pub fn from_fraction(fraction: f64) -> Self {
        Self { percent: fraction * 100.0 }
    }

    /// Ratio in [0, 1] for gauge widgets
    pub fn ratio(&self) -> f64 {
        (self.percent / 100.0).clamp(0.0, 1.0)
    }

    /// One-decimal label, e.g. "42.3%"
    pub fn label(&self) -> String {
        format!("{:.1}%", self.percent)
    }
}
