//! Screen split for the live view.
//!
//! Bars always get the bulk of the screen. Chrome around them (header, status
//! panel, key bar) is dropped piece by piece as the terminal shrinks:
//!
//! ```text
//! ┌──────────── header ────────────┐
//! │ bars                  │ status │
//! │                       │ panel  │
//! └──────────── keys ──────────────┘
//! ```

use ratatui::layout::{Constraint, Direction, Layout, Rect};

const HEADER_ROWS: u16 = 3;
const KEY_BAR_ROWS: u16 = 3;

/// Narrower than this, counters move into the header.
const MIN_WIDTH_FOR_PANEL: u16 = 70;
/// Up to this width the status panel is squeezed.
const NARROW_WIDTH: u16 = 110;
const PANEL_WIDTH: u16 = 32;
const NARROW_PANEL_WIDTH: u16 = 26;

/// Shorter than this, only the bars are drawn.
const MIN_HEIGHT_FOR_CHROME: u16 = 12;
/// Up to this height the key bar is dropped.
const MIN_HEIGHT_FOR_KEYS: u16 = 20;

/// Where each part of the live view goes. `None` means "not drawn".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Panes {
    pub header: Option<Rect>,
    pub bars: Rect,
    pub status: Option<Rect>,
    pub keys: Option<Rect>,
}

impl Panes {
    /// Split `area` according to its size.
    ///
    /// | Terminal      | Drawn                                   |
    /// |---------------|-----------------------------------------|
    /// | height < 12   | bars only                               |
    /// | height 12-20  | header, bars, status panel              |
    /// | height > 20   | header, bars, status panel, key bar     |
    /// | width < 70    | no status panel (counters in the header) |
    /// | width 70-110  | 26-column status panel                  |
    #[must_use]
    pub fn split(area: Rect) -> Self {
        if area.height < MIN_HEIGHT_FOR_CHROME {
            return Self { header: None, bars: area, status: None, keys: None };
        }

        let key_rows = if area.height > MIN_HEIGHT_FOR_KEYS { KEY_BAR_ROWS } else { 0 };
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_ROWS),
                Constraint::Min(0),
                Constraint::Length(key_rows),
            ])
            .split(area);

        let panel_width = match area.width {
            w if w < MIN_WIDTH_FOR_PANEL => 0,
            w if w <= NARROW_WIDTH => NARROW_PANEL_WIDTH,
            _ => PANEL_WIDTH,
        };
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(panel_width)])
            .split(rows[1]);

        Self {
            header: Some(rows[0]),
            bars: cols[0],
            status: (panel_width > 0).then_some(cols[1]),
            keys: (key_rows > 0).then_some(rows[2]),
        }
    }
}
