//! TUI color theme
//!
//! HUD-style green-on-black scheme shared by every panel

use ratatui::style::Color;

use crate::domain::RunState;

pub const HUD_GREEN: Color = Color::Rgb(0, 255, 0);
pub const CRITICAL_RED: Color = Color::Rgb(255, 0, 0);
pub const CAUTION_AMBER: Color = Color::Rgb(255, 191, 0);
pub const INFO_DIM: Color = Color::Rgb(0, 180, 0);
pub const BACKGROUND: Color = Color::Rgb(0, 20, 0);

/// Unmarked bars
pub const BAR: Color = INFO_DIM;
/// Bars touched or assigned since the previous snapshot
pub const BAR_MARKED: Color = CRITICAL_RED;

/// Color used for the state label in the header and status panel.
#[must_use]
pub fn state_color(state: RunState) -> Color {
    match state {
        RunState::Running => HUD_GREEN,
        RunState::Paused => CAUTION_AMBER,
        RunState::NotStarted | RunState::Finished => INFO_DIM,
    }
}
