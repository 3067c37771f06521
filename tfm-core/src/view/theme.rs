//! src/view/theme.rs
//! ============================================================================
//! # Catppuccin Mocha Theme Color Palette
//!
//! Color constants for the Catppuccin Mocha theme and the styles built from
//! them. Colors are from the official Catppuccin theme specification:
//! https://github.com/catppuccin/catppuccin

use ratatui::style::{Color, Modifier, Style};
use tracing::{debug, instrument};

use crate::model::ui_state::NotificationLevel;

/// Initialize theme colors - logs color palette information
#[instrument(level = "debug")]
pub fn init_theme() {
    debug!("Initializing Catppuccin Mocha theme");
    debug!("Background: {:?}", BACKGROUND);
    debug!("Foreground: {:?}", FOREGROUND);
    debug!("Current line: {:?}", CURRENT_LINE);
}

pub const BACKGROUND: Color = Color::Rgb(30, 30, 46); // Base
pub const CURRENT_LINE: Color = Color::Rgb(69, 71, 90); // Surface1
pub const FOREGROUND: Color = Color::Rgb(205, 214, 244); // Text
pub const COMMENT: Color = Color::Rgb(127, 132, 156); // Overlay1
pub const CYAN: Color = Color::Rgb(137, 220, 235); // Sky
pub const GREEN: Color = Color::Rgb(166, 227, 161); // Green
pub const ORANGE: Color = Color::Rgb(250, 179, 135); // Peach
pub const PINK: Color = Color::Rgb(245, 194, 231); // Pink
pub const PURPLE: Color = Color::Rgb(203, 166, 247); // Mauve
pub const RED: Color = Color::Rgb(243, 139, 168); // Red
pub const YELLOW: Color = Color::Rgb(249, 226, 175); // Yellow

pub fn panel_style() -> Style {
    Style::default().bg(BACKGROUND).fg(FOREGROUND)
}

/// Border of a panel; the focused one stands out.
pub fn border_style(active: bool) -> Style {
    if active {
        Style::default().fg(PURPLE).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(COMMENT)
    }
}

pub fn title_style(active: bool) -> Style {
    if active {
        Style::default().fg(PURPLE).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(COMMENT)
    }
}

/// Selected row. Inactive panels keep a dimmer marker.
pub fn highlight_style(active: bool) -> Style {
    if active {
        Style::default().bg(CURRENT_LINE).add_modifier(Modifier::BOLD)
    } else {
        Style::default().bg(CURRENT_LINE)
    }
}

pub fn directory_style() -> Style {
    Style::default().fg(CYAN)
}

pub fn executable_style() -> Style {
    Style::default().fg(GREEN)
}

pub fn hidden_style() -> Style {
    Style::default().fg(COMMENT)
}

pub fn label_style() -> Style {
    Style::default().fg(YELLOW)
}

pub fn hint_style() -> Style {
    Style::default().fg(COMMENT)
}

pub fn hot_key_style() -> Style {
    Style::default().fg(ORANGE).add_modifier(Modifier::BOLD)
}

pub fn mounted_style() -> Style {
    Style::default().fg(GREEN)
}

pub fn clipboard_copy_style() -> Style {
    Style::default().fg(GREEN)
}

pub fn clipboard_move_style() -> Style {
    Style::default().fg(ORANGE)
}

pub fn notification_style(level: NotificationLevel) -> Style {
    let fg = match level {
        NotificationLevel::Info => CYAN,
        NotificationLevel::Success => GREEN,
        NotificationLevel::Warning => YELLOW,
        NotificationLevel::Error => RED,
    };
    Style::default().fg(fg).add_modifier(Modifier::BOLD)
}

pub fn button_style() -> Style {
    Style::default().fg(PINK).add_modifier(Modifier::BOLD)
}
