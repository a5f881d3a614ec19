//! User Interface layer
//!
//! This module contains all UI-related code:
//! - Theme palettes for light and dark mode
//! - Reusable widgets
//! - Main render function

pub mod theme;
pub mod render;
pub mod widgets;

pub use theme::Theme;
pub use render::render;
