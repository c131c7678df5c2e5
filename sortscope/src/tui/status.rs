use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::time::Duration;

use super::theme::{state_color, CAUTION_AMBER, CRITICAL_RED, HUD_GREEN, INFO_DIM};
use crate::domain::{Counters, Outcome, RunState};
use crate::generate::ArrayOrder;

/// Everything the status panel shows, captured once per frame.
#[derive(Debug, Clone)]
pub struct StatusPanel {
    pub state: RunState,
    pub algorithm: &'static str,
    pub order: ArrayOrder,
    pub size: usize,
    pub delay: Duration,
    pub counters: Counters,
    pub elapsed: Option<Duration>,
    pub outcome: Option<Outcome>,
    /// Order or algorithm changed since the current sequence was generated
    pub pending_reset: bool,
}

impl StatusPanel {
    pub fn render(&self, f: &mut Frame, area: Rect) {
        let label = |text: &'static str| Span::styled(text, Style::default().fg(INFO_DIM));
        let value = |text: String| Span::styled(text, Style::default().fg(HUD_GREEN));

        let mut lines = vec![
            Line::from(Span::styled(
                format!(" [{}]", self.state),
                Style::default().fg(state_color(self.state)).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![label(" Algo    "), value(self.algorithm.to_string())]),
            Line::from(vec![label(" Order   "), value(self.order.to_string())]),
            Line::from(vec![label(" Size    "), value(self.size.to_string())]),
            Line::from(vec![label(" Delay   "), value(format_delay(self.delay))]),
            Line::from(""),
            Line::from(vec![label(" Compare "), value(self.counters.comparisons.to_string())]),
            Line::from(vec![label(" Access  "), value(self.counters.accesses.to_string())]),
        ];

        if let Some(elapsed) = self.elapsed {
            lines.push(Line::from(vec![
                label(" Time    "),
                value(format!("{:.2}s", elapsed.as_secs_f64())),
            ]));
        }

        if let Some(outcome) = self.outcome {
            let color = match outcome {
                Outcome::Completed => HUD_GREEN,
                Outcome::Cancelled => CAUTION_AMBER,
                Outcome::Panicked => CRITICAL_RED,
            };
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!(" {outcome}"),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )));
        }

        if self.pending_reset {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                " new sequence on start",
                Style::default().fg(CAUTION_AMBER),
            )));
        }

        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Status")
                .border_style(Style::default().fg(state_color(self.state))),
        );

        f.render_widget(paragraph, area);
    }
}

/// Human-readable throttle delay (`0`, `250µs`, `4ms`, `1.5s`).
#[must_use]
pub fn format_delay(delay: Duration) -> String {
    let micros = delay.as_micros();
    if micros == 0 {
        "0".to_string()
    } else if micros < 1_000 {
        format!("{micros}µs")
    } else if micros < 1_000_000 {
        format!("{}ms", delay.as_millis())
    } else {
        format!("{:.1}s", delay.as_secs_f64())
    }
}
