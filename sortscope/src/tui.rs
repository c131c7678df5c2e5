//! # Terminal User Interface (TUI)
//!
//! Live bar view of a sorting run using `ratatui`.
//!
//! ## Event Flow
//!
//! ```text
//!  ┌──────────┐ poll() ┌─────────┐  RunEvent   ┌──────────┐ draw ┌──────────┐
//!  │ LiveApp  │───────▶│   Run   │────────────▶│ BarsView │─────▶│ terminal │
//!  └──────────┘        └─────────┘  (channel)  └──────────┘      └──────────┘
//!       ▲ keys (start/pause/stop/delay/reset)
//! ```
//!
//! The UI thread is the run's controller: it polls the run (which delivers
//! snapshots at the emitter rate), applies whatever arrived, redraws, and
//! waits for keys no longer than the next snapshot tick.
//!
//! ## Sub-Modules
//!
//! - `bars` - Bar view and snapshot application
//! - `status` - Status side panel
//! - `layout` - Screen split and small-terminal fallbacks
//! - `theme` - Color scheme

// TUI rendering intentionally uses precision-losing casts and long functions for clarity
#![allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::too_many_lines
)]

use anyhow::{Context, Result};
use crossbeam_channel::Receiver;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{debug, warn};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use sortscope_common::Algorithm;
use std::io;
use std::time::{Duration, Instant};

pub mod bars; // Public for testing
pub mod layout;
mod status;
mod theme;

use bars::BarsView;
use layout::Panes;
use status::{format_delay, StatusPanel};
use theme::{state_color, BACKGROUND, CAUTION_AMBER, CRITICAL_RED, HUD_GREEN, INFO_DIM};

use crate::algorithms;
use crate::domain::{Counters, RunState, TuiError};
use crate::engine::{Run, RunConfig, RunEvent};
use crate::export::RunTraceExporter;
use crate::generate::{generate, ArrayOrder};

// =============================================================================
// STYLE CONSTANTS
// =============================================================================

const STYLE_HEADING: Style = Style::new().fg(HUD_GREEN).add_modifier(Modifier::BOLD);
const STYLE_LABEL: Style = Style::new().fg(CAUTION_AMBER).add_modifier(Modifier::BOLD);
const STYLE_DIM: Style = Style::new().fg(INFO_DIM);
const STYLE_KEY: Style = Style::new().fg(CAUTION_AMBER);
const STYLE_TEXT: Style = Style::new().fg(ratatui::style::Color::White);

/// Longest throttle delay reachable with `+`.
const MAX_DELAY: Duration = Duration::from_secs(1);
/// Redraw at least this often even when nothing arrives (elapsed time ticks).
const IDLE_REDRAW: Duration = Duration::from_millis(250);
/// Upper bound on how long the loop blocks waiting for a key.
const MAX_KEY_WAIT: Duration = Duration::from_millis(50);

// =============================================================================
// VIEW MODES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
enum ViewMode {
    Bars,
    /// Help overlay with keyboard shortcuts
    Help,
}

/// Initial settings for the live UI.
#[derive(Debug, Clone)]
pub struct LiveOptions {
    pub algorithm: String,
    pub order: ArrayOrder,
    pub size: usize,
    pub config: RunConfig,
    /// Keep a trace of the most recently started run
    pub record_trace: bool,
}

// =============================================================================
// LIVE MODE (LiveApp)
// =============================================================================

/// Controller state of the live UI: the current run, what is displayed, and
/// the settings the next run will use.
pub struct LiveApp {
    algorithm: usize,
    order: ArrayOrder,
    size: usize,
    config: RunConfig,

    run: Run,
    events: Receiver<RunEvent>,
    bars: BarsView,
    counters: Counters,
    /// Order changed since the sequence was generated
    needs_regenerate: bool,

    record_trace: bool,
    trace: Option<RunTraceExporter>,

    view_mode: ViewMode,
    /// Last rejected action, shown in the key bar until the next key
    message: Option<String>,
    should_quit: bool,
    dirty: bool,
}

impl LiveApp {
    /// # Errors
    /// [`TuiError::UnknownAlgorithm`] if the algorithm is not in the catalogue.
    pub fn new(options: LiveOptions) -> Result<Self, TuiError> {
        let algorithm = algorithms::catalogue()
            .iter()
            .position(|a| a.name.eq_ignore_ascii_case(&options.algorithm))
            .ok_or(TuiError::UnknownAlgorithm(options.algorithm))?;

        let sequence = generate(options.size, options.order);
        let bars = BarsView::from_sequence(&sequence);
        let mut run = Run::new(sequence, options.config);
        let events = run.subscribe();

        Ok(Self {
            algorithm,
            order: options.order,
            size: options.size,
            config: options.config,
            run,
            events,
            bars,
            counters: Counters::default(),
            needs_regenerate: false,
            record_trace: options.record_trace,
            trace: None,
            view_mode: ViewMode::Bars,
            message: None,
            should_quit: false,
            dirty: true,
        })
    }

    fn selected(&self) -> &'static Algorithm {
        &algorithms::catalogue()[self.algorithm]
    }

    #[must_use]
    pub fn state(&self) -> RunState {
        self.run.state()
    }

    #[must_use]
    pub fn bars(&self) -> &BarsView {
        &self.bars
    }

    #[must_use]
    pub fn counters(&self) -> Counters {
        self.counters
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.config.delay
    }

    #[must_use]
    pub fn algorithm_name(&self) -> &'static str {
        self.selected().name
    }

    /// Hand over the trace of the most recent run, if recording.
    pub fn take_trace(&mut self) -> Option<RunTraceExporter> {
        self.trace.take()
    }

    /// Drive the run and apply everything it published.
    pub fn pump(&mut self) {
        self.run.poll();

        while let Ok(event) = self.events.try_recv() {
            if let Some(trace) = &mut self.trace {
                trace.record(&event);
            }
            match event {
                RunEvent::Snapshot(snapshot) => self.bars.apply(&snapshot),
                RunEvent::Counters(counters) => self.counters = counters,
                RunEvent::StateChanged(RunState::Finished) => {
                    // A cancelled swap can leave a stale assignment behind
                    if let Some(sequence) = self.run.sequence() {
                        self.bars.reset(sequence);
                    }
                }
                RunEvent::StateChanged(_) => {}
            }
            self.dirty = true;
        }
    }

    /// Replace the run with a fresh one on a newly generated sequence.
    pub fn reset(&mut self) {
        if self.run.state().is_active() {
            if let Err(e) = self.run.stop() {
                warn!("Failed to stop run before reset: {e}");
            }
        }

        let sequence = generate(self.size, self.order);
        self.bars.reset(&sequence);
        self.run = Run::new(sequence, self.config);
        self.events = self.run.subscribe();
        self.counters = Counters::default();
        self.needs_regenerate = false;
        self.dirty = true;
        debug!("Reset: {} elements, {}", self.size, self.order);
    }

    fn start(&mut self) {
        if self.needs_regenerate || self.run.state() == RunState::Finished {
            self.reset();
        }
        let algorithm = self.selected();
        match self.run.start(algorithm) {
            // The start event is still queued, so the new trace sees it
            Ok(()) if self.record_trace => {
                self.trace = Some(RunTraceExporter::new(algorithm.name, self.size));
            }
            Ok(()) => {}
            Err(e) => self.message = Some(e.to_string()),
        }
    }

    fn toggle_pause(&mut self) {
        let result = match self.run.state() {
            RunState::Paused => self.run.resume(),
            _ => self.run.pause(),
        };
        if let Err(e) = result {
            self.message = Some(e.to_string());
        }
    }

    fn set_delay(&mut self, delay: Duration) {
        self.config.delay = delay.min(MAX_DELAY);
        self.run.set_delay(self.config.delay);
    }

    /// Process keyboard input based on current view mode
    pub fn handle_key(&mut self, key: KeyCode) {
        self.message = None;
        self.dirty = true;

        if self.view_mode == ViewMode::Help {
            self.view_mode = ViewMode::Bars;
            return;
        }

        match key {
            KeyCode::Char('q' | 'Q') | KeyCode::Esc => {
                if self.run.state().is_active() {
                    if let Err(e) = self.run.stop() {
                        warn!("Failed to stop run on quit: {e}");
                    }
                    self.pump();
                }
                self.should_quit = true;
            }
            KeyCode::Enter | KeyCode::Char('s') => {
                if self.run.state() == RunState::Paused {
                    self.toggle_pause();
                } else {
                    self.start();
                }
            }
            KeyCode::Char(' ') => self.toggle_pause(),
            KeyCode::Char('x') => {
                if let Err(e) = self.run.stop() {
                    self.message = Some(e.to_string());
                }
                self.pump();
            }
            KeyCode::Char('r') => self.reset(),
            KeyCode::Char('+' | '=') => {
                let doubled = (self.config.delay * 2).max(Duration::from_micros(1));
                self.set_delay(doubled);
            }
            KeyCode::Char('-' | '_') => {
                let halved = self.config.delay / 2;
                self.set_delay(if halved < Duration::from_micros(1) { Duration::ZERO } else { halved });
            }
            KeyCode::Left => {
                let count = algorithms::catalogue().len();
                self.algorithm = (self.algorithm + count - 1) % count;
            }
            KeyCode::Right => {
                self.algorithm = (self.algorithm + 1) % algorithms::catalogue().len();
            }
            KeyCode::Char('o') => {
                self.order = self.order.next();
                self.needs_regenerate = true;
                if self.run.state() == RunState::NotStarted {
                    self.reset();
                }
            }
            KeyCode::Char('?') => self.view_mode = ViewMode::Help,
            _ => self.dirty = false,
        }
    }

    fn status_panel(&self) -> StatusPanel {
        StatusPanel {
            state: self.run.state(),
            algorithm: self.selected().name,
            order: self.order,
            size: self.size,
            delay: self.config.delay,
            counters: self.counters,
            elapsed: self.run.elapsed(),
            outcome: self.run.outcome(),
            pending_reset: self.needs_regenerate,
        }
    }

    fn render(&self, f: &mut Frame) {
        let panes = Panes::split(f.area());
        let state = self.run.state();

        if let Some(header_area) = panes.header {
            let mut spans = vec![
                Span::styled("SORTSCOPE", STYLE_HEADING),
                Span::styled(" | ", STYLE_DIM),
                Span::styled(
                    format!("[{state}]"),
                    Style::new().fg(state_color(state)).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" | ", STYLE_DIM),
                Span::styled(self.selected().name, Style::new().fg(HUD_GREEN)),
            ];
            if panes.status.is_none() {
                spans.push(Span::styled(" | ", STYLE_DIM));
                spans.push(Span::styled(
                    format!("{} cmp", self.counters.comparisons),
                    Style::new().fg(CAUTION_AMBER),
                ));
                spans.push(Span::styled(
                    format!(" {} acc", self.counters.accesses),
                    Style::new().fg(CAUTION_AMBER),
                ));
            }
            let header = Paragraph::new(Line::from(spans)).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::new().fg(state_color(state))),
            );
            f.render_widget(header, header_area);
        }

        let bars_block = Block::default()
            .borders(Borders::ALL)
            .title(format!("{} elements", self.bars.len()))
            .style(Style::new().bg(BACKGROUND))
            .border_style(Style::new().fg(HUD_GREEN));
        let bars_area = bars_block.inner(panes.bars);
        f.render_widget(bars_block, panes.bars);
        f.render_widget(&self.bars, bars_area);

        if let Some(status_area) = panes.status {
            self.status_panel().render(f, status_area);
        }

        if let Some(keys_area) = panes.keys {
            let mut spans = Vec::new();
            for (key, action) in [
                ("Enter", ":Start "),
                ("Space", ":Pause "),
                ("X", ":Stop "),
                ("R", ":Reset "),
                ("←→", ":Algo "),
                ("O", ":Order "),
                ("+-", ":Delay "),
                ("?", ":Help "),
                ("Q", ":Quit "),
            ] {
                spans.push(Span::styled(key, STYLE_KEY));
                spans.push(Span::styled(action, STYLE_DIM));
            }
            spans.push(Span::styled(format_delay(self.config.delay), STYLE_TEXT));
            if let Some(message) = &self.message {
                spans.push(Span::styled(format!("  {message}"), Style::new().fg(CRITICAL_RED)));
            }
            let key_bar = Paragraph::new(Line::from(spans)).block(
                Block::default().borders(Borders::ALL).border_style(Style::new().fg(HUD_GREEN)),
            );
            f.render_widget(key_bar, keys_area);
        }

        if self.view_mode == ViewMode::Help {
            render_help_overlay(f, f.area());
        }
    }
}

/// Render the help overlay explaining the view and keyboard shortcuts
fn render_help_overlay(f: &mut Frame, area: Rect) {
    let popup_area = centered_popup(area, 70, 20);

    let key_line = |key: &'static str, text: &'static str| {
        Line::from(vec![Span::styled(format!("  {key:<8}"), STYLE_KEY), Span::styled(text, STYLE_TEXT)])
    };

    let help_text = vec![
        Line::from(""),
        Line::from(Span::styled("  What You're Looking At", STYLE_HEADING)),
        Line::from(Span::styled(
            "  One bar per element. Red bars were compared, read or written",
            STYLE_DIM,
        )),
        Line::from(Span::styled("  since the previous frame.", STYLE_DIM)),
        Line::from(""),
        Line::from(Span::styled("  Keys", STYLE_LABEL)),
        key_line("Enter", "Start (new sequence if finished)"),
        key_line("Space", "Pause / resume"),
        key_line("X", "Stop the run"),
        key_line("R", "Reset with a new sequence"),
        key_line("← →", "Previous / next algorithm"),
        key_line("O", "Cycle initial order"),
        key_line("+ -", "Double / halve the delay per operation"),
        key_line("Q", "Quit"),
        Line::from(""),
        Line::from(Span::styled("  Press any key to close", STYLE_DIM)),
    ];

    let help_widget = Paragraph::new(help_text).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Help ")
            .style(Style::new().bg(ratatui::style::Color::Black).fg(HUD_GREEN)),
    );

    f.render_widget(Clear, popup_area);
    f.render_widget(help_widget, popup_area);
}

/// Create a centered popup area with given width percentage and height in lines
fn centered_popup(area: Rect, width_percent: u16, height_lines: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Fill(1), Constraint::Length(height_lines), Constraint::Fill(1)])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - width_percent) / 2),
            Constraint::Percentage(width_percent),
            Constraint::Percentage((100 - width_percent) / 2),
        ])
        .split(vertical[1])[1]
}

// =============================================================================
// LIVE MODE ENTRY POINT
// =============================================================================

/// Run the live TUI until the user quits.
///
/// Returns the trace of the most recently started run when
/// `options.record_trace` is set.
///
/// # Errors
/// Returns an error if the algorithm is unknown, or if terminal setup or
/// rendering fails. The terminal is restored in every case.
pub fn run_live(options: LiveOptions) -> Result<Option<RunTraceExporter>> {
    let mut app = LiveApp::new(options)?;

    // -------------------------------------------------------------------------
    // Terminal Setup
    // -------------------------------------------------------------------------
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal =
        Terminal::new(backend).map_err(|e| TuiError::TerminalError(e.to_string()))?;

    let result = event_loop(&mut terminal, &mut app);

    // Cleanup terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result?;
    Ok(app.take_trace())
}

fn event_loop<B: Backend>(terminal: &mut Terminal<B>, app: &mut LiveApp) -> Result<()> {
    let mut last_draw = Instant::now();

    loop {
        app.pump();

        if app.dirty || last_draw.elapsed() >= IDLE_REDRAW {
            terminal.draw(|f| app.render(f))?;
            app.dirty = false;
            last_draw = Instant::now();
        }

        // Wake up for the next snapshot tick or the next key, whichever is first
        let wait = app
            .run
            .next_tick()
            .map_or(MAX_KEY_WAIT, |t| t.saturating_duration_since(Instant::now()))
            .min(MAX_KEY_WAIT);
        if event::poll(wait)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key.code);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
