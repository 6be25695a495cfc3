//! Main application state and TUI event loop for the media dashboard.
//!
//! [`App`] owns the theme, the selected panel and the last snapshot received
//! from the upload worker. Key presses are translated into state changes and,
//! for re-uploads, into [`UploadRequest`]s for the worker.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame, Terminal,
};
use tokio::sync::mpsc;

use dashboard_core::models::ViewKind;
use dashboard_runtime::data::analysis::DashboardReport;
use dashboard_runtime::orchestrator::{DashboardSnapshot, UploadHandle, UploadRequest};
use dashboard_runtime::upload_manager::UploadFeedback;

use crate::chart_view;
use crate::components::header::Header;
use crate::themes::Theme;

/// Number of selectable panels.
const PANEL_COUNT: usize = ViewKind::ALL.len();

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state for the dashboard TUI.
pub struct App {
    /// Active colour theme.
    pub theme: Theme,
    /// File re-submitted when the user presses `r`.
    pub file: Option<PathBuf>,
    /// Index into [`ViewKind::ALL`] of the panel on screen.
    pub selected: usize,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,
    /// An upload has been submitted and its snapshot has not arrived yet.
    pub pending: bool,
    /// Most recent snapshot, `None` until the first upload finishes.
    pub last_snapshot: Option<DashboardSnapshot>,
}

impl App {
    pub fn new(theme_name: &str, file: Option<PathBuf>) -> Self {
        Self {
            theme: Theme::from_name(theme_name),
            file,
            selected: 0,
            should_quit: false,
            pending: false,
            last_snapshot: None,
        }
    }

    // ── Public event loop ─────────────────────────────────────────────────────

    /// Run the dashboard, receiving snapshots from `rx` and submitting
    /// re-uploads through `handle`.
    ///
    /// Uses `crossterm::event::poll` with a 250 ms timeout so the terminal
    /// loop stays on the current thread while snapshots arrive via
    /// `try_recv`. Exits on `q`, `Q` or `Ctrl+C` and returns the report that
    /// was on screen.
    pub async fn run(
        mut self,
        mut rx: mpsc::Receiver<DashboardSnapshot>,
        handle: &UploadHandle,
    ) -> io::Result<Option<DashboardReport>> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);
        let mut worker_gone = false;

        let result = loop {
            if let Err(e) = terminal.draw(|frame| self.render(frame)) {
                break Err(e);
            }

            match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                        if let Some(request) = self.handle_key(key) {
                            if !handle.submit(request) {
                                self.pending = false;
                            }
                        }
                    }
                    Ok(_) => {}
                    Err(e) => break Err(e),
                },
                Ok(false) => {}
                Err(e) => break Err(e),
            }

            // Drain pending snapshots (non-blocking).
            while !worker_gone {
                match rx.try_recv() {
                    Ok(snapshot) => self.apply_snapshot(snapshot),
                    Err(mpsc::error::TryRecvError::Empty) => break,
                    Err(mpsc::error::TryRecvError::Disconnected) => {
                        tracing::warn!("upload worker stopped; re-uploads are unavailable");
                        worker_gone = true;
                        self.pending = false;
                    }
                }
            }

            if self.should_quit {
                break Ok(());
            }
        };

        // Restore terminal state unconditionally.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result.map(|()| self.last_snapshot.and_then(|s| s.report))
    }

    // ── State transitions ─────────────────────────────────────────────────────

    /// Apply one key press. Returns the upload to submit, if the key asked
    /// for one.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<UploadRequest> {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            KeyCode::Tab | KeyCode::Right => self.selected = (self.selected + 1) % PANEL_COUNT,
            KeyCode::BackTab | KeyCode::Left => {
                self.selected = (self.selected + PANEL_COUNT - 1) % PANEL_COUNT;
            }
            KeyCode::Char(c @ '1'..='5') => {
                self.selected = (c as usize) - ('1' as usize);
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                if let Some(path) = &self.file {
                    tracing::debug!(path = %path.display(), "re-upload requested");
                    self.pending = true;
                    return Some(UploadRequest::Path(path.clone()));
                }
            }
            _ => {}
        }
        None
    }

    /// Replace the current upload state with `snapshot`.
    pub fn apply_snapshot(&mut self, snapshot: DashboardSnapshot) {
        tracing::debug!(upload = snapshot.upload_number, "snapshot received");
        self.pending = false;
        self.last_snapshot = Some(snapshot);
    }

    /// Report currently on screen, if any.
    pub fn report(&self) -> Option<&DashboardReport> {
        self.last_snapshot.as_ref().and_then(|s| s.report.as_ref())
    }

    /// Kind of the selected panel.
    pub fn selected_kind(&self) -> ViewKind {
        ViewKind::ALL[self.selected % PANEL_COUNT]
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Min(8),
                Constraint::Length(1),
            ])
            .split(frame.area());

        self.render_header(frame, chunks[0]);
        frame.render_widget(Paragraph::new(self.feedback_line()), chunks[1]);
        self.render_tabs(frame, chunks[2]);
        self.render_body(frame, chunks[3]);
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                "Tab/←/→ switch view · 1-5 jump · r re-upload · q quit",
                self.theme.dim,
            ))),
            chunks[4],
        );
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let fallback = self.file.as_ref().map(|p| p.display().to_string());
        let source = self
            .report()
            .map(|r| r.source.as_str())
            .or(fallback.as_deref());
        let rows = self.report().map_or(0, DashboardReport::valid_rows);

        let header = Header::new(source, rows, &self.theme);
        frame.render_widget(Paragraph::new(Text::from(header.to_lines())), area);
    }

    fn feedback_line(&self) -> Line<'static> {
        if self.pending {
            return Line::from(Span::styled("Processing upload...", self.theme.info));
        }
        match &self.last_snapshot {
            None => Line::from(Span::styled("Waiting for upload...", self.theme.dim)),
            Some(snapshot) => {
                let style = match snapshot.feedback {
                    UploadFeedback::Success { .. } => self.theme.success,
                    UploadFeedback::Empty => self.theme.warning,
                    UploadFeedback::Failed(_) => self.theme.error,
                };
                Line::from(Span::styled(snapshot.feedback.to_string(), style))
            }
        }
    }

    fn render_tabs(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<String> = ViewKind::ALL
            .iter()
            .enumerate()
            .map(|(i, kind)| format!("{} {}", i + 1, kind.title()))
            .collect();

        let tabs = Tabs::new(titles)
            .select(self.selected)
            .style(self.theme.tab_inactive)
            .highlight_style(self.theme.tab_active)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(self.theme.border)
                    .title(" Views "),
            );
        frame.render_widget(tabs, area);
    }

    fn render_body(&self, frame: &mut Frame, area: Rect) {
        let Some(snapshot) = &self.last_snapshot else {
            chart_view::render_waiting(frame, area, &self.theme);
            return;
        };

        match &snapshot.report {
            None => {
                chart_view::render_error(frame, area, &snapshot.feedback.to_string(), &self.theme)
            }
            Some(report) if report.is_empty() => {
                chart_view::render_no_data(frame, area, &self.theme)
            }
            Some(report) => match report.panel(self.selected_kind()) {
                Some(panel) => chart_view::render_panel(frame, area, panel, &self.theme),
                None => chart_view::render_no_data(frame, area, &self.theme),
            },
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
