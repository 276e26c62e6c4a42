//! Main Application
//!
//! The App struct manages the TUI lifecycle as a thin display client:
//! - Event loop (keyboard, mouse)
//! - SessionClient for the conversation core
//! - DisplayState for rendering
//!
//! The App has no conversation logic. It converts terminal events to
//! `SessionEvent`s, receives `SessionMessage`s, and renders DisplayState:
//! sidebar on the left, transcript with input line and status bar on the
//! right.

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, EventStream, KeyCode, KeyEventKind, KeyModifiers, MouseEventKind};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;
use ratatui::Terminal;

use tanya_core::{ChatRole, ClientConfig};

use crate::display::{role_prefix, DisplayState};
use crate::markdown;
use crate::session_client::SessionClient;
use crate::theme;

/// Sidebar width (columns)
const SIDEBAR_WIDTH: u16 = 32;

/// Input box height (lines), separator included
const INPUT_HEIGHT: u16 = 4;

/// Which pane receives key input
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Focus {
    /// The message input line
    Input,
    /// The conversation sidebar
    Sidebar,
}

/// Main application state
pub struct App {
    /// Is the app still running?
    running: bool,
    /// Client for the embedded conversation session
    client: SessionClient,
    /// Display state derived from session messages
    display: DisplayState,
    /// User input buffer
    input_buffer: String,
    /// Pane with key focus
    focus: Focus,
    /// Sidebar cursor row
    sidebar_cursor: usize,
    /// Scroll offset (lines from bottom, 0 = latest)
    scroll_offset: usize,
    /// Total rendered transcript lines (for scroll bounds)
    total_lines: usize,
    /// Terminal size
    size: (u16, u16),
    /// Last frame time (for animations)
    last_frame: Instant,
}

impl App {
    /// Create a new App instance and spawn its session task.
    pub fn new(config: &ClientConfig) -> anyhow::Result<Self> {
        let size = crossterm::terminal::size()?;

        Ok(Self {
            running: true,
            client: SessionClient::connect(config),
            display: DisplayState::new(),
            input_buffer: String::new(),
            focus: Focus::Input,
            sidebar_cursor: 0,
            scroll_offset: 0,
            total_lines: 0,
            size,
            last_frame: Instant::now(),
        })
    }

    /// Main event loop
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        let mut event_stream = EventStream::new();

        // Render the initial frame immediately so the user sees UI.
        self.render(terminal)?;

        while self.running {
            tokio::select! {
                biased;

                // Terminal events - highest priority
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        match event {
                            // Only handle Press events (not Release or Repeat)
                            Event::Key(key) if key.kind == KeyEventKind::Press => {
                                self.handle_key(key).await;
                            }
                            Event::Mouse(mouse) => self.handle_mouse(mouse),
                            Event::Resize(w, h) => self.size = (w, h),
                            _ => {}
                        }
                    }
                }

                // Frame tick
                _ = tokio::time::sleep(Duration::from_millis(100)) => {}
            }

            // Receive and process messages from the session
            for msg in self.client.recv_all() {
                if self.display.apply_message(msg) {
                    self.scroll_offset = 0;
                }
            }
            self.clamp_sidebar_cursor();

            // Advance animations
            let now = Instant::now();
            self.display.update(now - self.last_frame);
            self.last_frame = now;

            self.render(terminal)?;
        }

        Ok(())
    }

    /// Handle keyboard input
    async fn handle_key(&mut self, key: event::KeyEvent) {
        match key.code {
            // Quit
            KeyCode::Esc => self.running = false,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.running = false;
            }

            // Fresh conversation
            KeyCode::Char('n') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                if let Err(err) = self.client.start_new_chat().await {
                    tracing::warn!(error = %err, "could not start new chat");
                }
                self.focus = Focus::Input;
                self.scroll_offset = 0;
            }

            // Switch panes
            KeyCode::Tab => {
                self.focus = match self.focus {
                    Focus::Input => Focus::Sidebar,
                    Focus::Sidebar => Focus::Input,
                };
            }

            // Transcript scrolling
            KeyCode::PageUp => {
                let page = self.page_size();
                let max_scroll = self.total_lines.saturating_sub(1);
                self.scroll_offset = (self.scroll_offset + page).min(max_scroll);
            }
            KeyCode::PageDown => {
                let page = self.page_size();
                self.scroll_offset = self.scroll_offset.saturating_sub(page);
            }

            _ => match self.focus {
                Focus::Input => self.handle_input_key(key).await,
                Focus::Sidebar => self.handle_sidebar_key(key).await,
            },
        }
    }

    /// Keys for the input line
    async fn handle_input_key(&mut self, key: event::KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                if !self.input_buffer.trim().is_empty() {
                    let message = std::mem::take(&mut self.input_buffer);
                    if let Err(err) = self.client.submit(message).await {
                        tracing::warn!(error = %err, "could not submit message");
                    }
                    self.scroll_offset = 0;
                }
            }
            KeyCode::Char(c) => self.input_buffer.push(c),
            KeyCode::Backspace => {
                self.input_buffer.pop();
            }
            _ => {}
        }
    }

    /// Keys for the sidebar
    async fn handle_sidebar_key(&mut self, key: event::KeyEvent) {
        match key.code {
            KeyCode::Up => self.sidebar_cursor = self.sidebar_cursor.saturating_sub(1),
            KeyCode::Down => {
                if !self.display.conversations.is_empty() {
                    self.sidebar_cursor =
                        (self.sidebar_cursor + 1).min(self.display.conversations.len() - 1);
                }
            }
            KeyCode::Enter => {
                if let Some(summary) = self.display.conversations.get(self.sidebar_cursor) {
                    let id = summary.id.clone();
                    if let Err(err) = self.client.load_conversation(id).await {
                        tracing::warn!(error = %err, "could not load conversation");
                    }
                    self.focus = Focus::Input;
                    self.scroll_offset = 0;
                }
            }
            _ => {}
        }
    }

    /// Handle mouse input
    fn handle_mouse(&mut self, mouse: event::MouseEvent) {
        match mouse.kind {
            MouseEventKind::ScrollUp => {
                let max_scroll = self.total_lines.saturating_sub(1);
                self.scroll_offset = (self.scroll_offset + 3).min(max_scroll);
            }
            MouseEventKind::ScrollDown => {
                self.scroll_offset = self.scroll_offset.saturating_sub(3);
            }
            _ => {}
        }
    }

    /// Half a transcript page, for PageUp/PageDown
    fn page_size(&self) -> usize {
        (self.size.1.saturating_sub(INPUT_HEIGHT + 1) / 2).max(1) as usize
    }

    /// Keep the sidebar cursor inside the list after a replace
    fn clamp_sidebar_cursor(&mut self) {
        let len = self.display.conversations.len();
        if len == 0 {
            self.sidebar_cursor = 0;
        } else if self.sidebar_cursor >= len {
            self.sidebar_cursor = len - 1;
        }
    }

    /// Render the UI
    fn render(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        terminal.draw(|frame| {
            let columns = Layout::horizontal([
                Constraint::Length(SIDEBAR_WIDTH),
                Constraint::Min(20),
            ])
            .split(frame.area());
            let rows = Layout::vertical([
                Constraint::Min(3),
                Constraint::Length(INPUT_HEIGHT),
                Constraint::Length(1),
            ])
            .split(columns[1]);

            Self::draw_sidebar(
                frame,
                columns[0],
                &self.display,
                self.focus,
                self.sidebar_cursor,
            );
            Self::draw_transcript(
                frame,
                rows[0],
                &self.display,
                &mut self.scroll_offset,
                &mut self.total_lines,
            );
            Self::draw_input(frame, rows[1], &self.input_buffer, self.focus);
            Self::draw_status(frame, rows[2], &self.display, self.scroll_offset);
        })?;

        Ok(())
    }

    /// Render the conversation sidebar
    fn draw_sidebar(
        frame: &mut Frame<'_>,
        area: Rect,
        display: &DisplayState,
        focus: Focus,
        cursor: usize,
    ) {
        let active_index = display.active_index();
        let items: Vec<ListItem<'_>> = display
            .conversations
            .iter()
            .enumerate()
            .map(|(i, summary)| {
                let style = if Some(i) == active_index {
                    Style::default()
                        .fg(theme::TANYA_TEAL)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                ListItem::new(summary.title.as_str()).style(style)
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::RIGHT)
                    .title(" Percakapan ")
                    .title_style(Style::default().fg(theme::DIM_GRAY)),
            )
            .highlight_style(Style::default().bg(theme::CURSOR_BG));

        let mut state = ListState::default();
        if focus == Focus::Sidebar && !display.conversations.is_empty() {
            state.select(Some(cursor));
        }
        frame.render_stateful_widget(list, area, &mut state);
    }

    /// Render the transcript pane
    fn draw_transcript(
        frame: &mut Frame<'_>,
        area: Rect,
        display: &DisplayState,
        scroll_offset: &mut usize,
        total_lines: &mut usize,
    ) {
        let width = (area.width.saturating_sub(1) as usize).max(10);
        let height = area.height as usize;
        if height == 0 {
            return;
        }

        let all_lines = transcript_lines(display, width);
        *total_lines = all_lines.len();

        // Clamp scroll and take the visible window from the bottom.
        let max_scroll = all_lines.len().saturating_sub(height);
        if *scroll_offset > max_scroll {
            *scroll_offset = max_scroll;
        }
        let visible_end = all_lines.len() - *scroll_offset;
        let visible_start = visible_end.saturating_sub(height);
        let visible: Vec<Line<'static>> = all_lines[visible_start..visible_end].to_vec();

        frame.render_widget(Paragraph::new(Text::from(visible)), area);
    }

    /// Render the input box (separator plus prompt)
    fn draw_input(frame: &mut Frame<'_>, area: Rect, input_buffer: &str, focus: Focus) {
        let width = area.width as usize;
        if width < 5 || area.height < 2 {
            return;
        }

        let mut lines = vec![Line::styled(
            "─".repeat(width),
            Style::default().fg(theme::DIM_GRAY),
        )];

        let prompt_style = if focus == Focus::Input {
            Style::default().fg(theme::USER_GREEN)
        } else {
            Style::default().fg(theme::DIM_GRAY)
        };
        let full_input = format!("Anda: {input_buffer}_");
        let wrapped: Vec<String> = textwrap::wrap(&full_input, width.saturating_sub(1))
            .iter()
            .map(|s| s.to_string())
            .collect();

        let text_height = area.height.saturating_sub(1) as usize;
        let skip = wrapped.len().saturating_sub(text_height);
        for line in wrapped.into_iter().skip(skip) {
            lines.push(Line::styled(line, prompt_style));
        }

        frame.render_widget(Paragraph::new(lines), area);
    }

    /// Render the status bar
    fn draw_status(frame: &mut Frame<'_>, area: Rect, display: &DisplayState, scroll_offset: usize) {
        let state_str = if display.typing {
            "Menunggu jawaban..."
        } else {
            "Siap"
        };
        let status_style = if display.typing {
            Style::default().fg(theme::TANYA_TEAL)
        } else {
            Style::default().fg(theme::DIM_GRAY)
        };

        let scroll_info = if scroll_offset > 0 {
            format!(" [^{scroll_offset} baris - PgDn untuk turun]")
        } else {
            String::new()
        };

        let status = format!(
            " {state_str} | Esc keluar | Tab panel | Ctrl+N obrolan baru | PgUp/PgDn gulir{scroll_info}"
        );
        frame.render_widget(
            Paragraph::new(Line::styled(status, status_style)),
            area,
        );
    }
}

/// Build the transcript as wrapped, styled lines.
///
/// Assistant messages go through citation rewriting and markdown; user and
/// error messages are literal text. A blank line separates messages, and the
/// composing indicator renders as a trailing pseudo-message.
fn transcript_lines(display: &DisplayState, width: usize) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = Vec::new();

    for msg in &display.messages {
        match msg.role {
            ChatRole::Assistant => {
                let prefix = assistant_prefix();
                let rendered = markdown::render_assistant(&msg.content);
                if rendered.is_empty() {
                    lines.push(Line::from(prefix.clone()));
                }
                for (i, line) in rendered.into_iter().enumerate() {
                    let line = if i == 0 {
                        let mut spans = vec![prefix.clone()];
                        spans.extend(line.spans);
                        Line::from(spans)
                    } else {
                        line
                    };
                    lines.extend(markdown::wrap_styled(&line, width));
                }
            }
            ChatRole::User | ChatRole::Error => {
                let style = if msg.role == ChatRole::User {
                    Style::default().fg(theme::USER_GREEN)
                } else {
                    Style::default().fg(theme::ERROR_RED)
                };
                // Literal text: no markup interpretation.
                let content = format!("{}{}", role_prefix(msg.role), msg.content);
                for raw_line in content.split('\n') {
                    if raw_line.is_empty() {
                        lines.push(Line::default());
                    } else {
                        for wrapped in textwrap::wrap(raw_line, width) {
                            lines.push(Line::styled(wrapped.to_string(), style));
                        }
                    }
                }
            }
        }
        lines.push(Line::default());
    }

    if display.typing {
        lines.push(Line::from(vec![
            assistant_prefix(),
            Span::styled(
                display.typing_dots().to_string(),
                Style::default().fg(theme::DIM_GRAY),
            ),
        ]));
    }

    lines
}

fn assistant_prefix() -> Span<'static> {
    Span::styled(
        role_prefix(ChatRole::Assistant).to_string(),
        Style::default()
            .fg(theme::TANYA_TEAL)
            .add_modifier(Modifier::BOLD),
    )
}
