//! Theme and Colors
//!
//! Tanya's palette - restrained, report-desk colors that hold up on dark
//! terminal backgrounds.

use ratatui::style::Color;

/// Tanya's signature teal (assistant text/accents)
pub const TANYA_TEAL: Color = Color::Rgb(95, 200, 185);

/// User input green
pub const USER_GREEN: Color = Color::Rgb(130, 220, 130);

/// System/dim text
pub const DIM_GRAY: Color = Color::Rgb(100, 100, 100);

/// Error red
pub const ERROR_RED: Color = Color::Rgb(255, 80, 80);

/// Inline/fenced code
pub const CODE_YELLOW: Color = Color::Rgb(230, 200, 120);

/// Sidebar cursor row while the sidebar has focus
pub const CURSOR_BG: Color = Color::Rgb(55, 55, 65);
