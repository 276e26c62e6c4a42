//! Assistant Markdown Rendering
//!
//! Turns assistant answers into styled ratatui lines. Citation markers are
//! rewritten into superscripts *before* markdown parsing so the parser never
//! mistakes `[1]` for a link reference. The assistant answers in markdown
//! tables a lot, so simple pipe tables are rendered too.
//!
//! User and error messages must never pass through here - they are literal
//! text by contract.

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use tanya_core::rewrite_citation_markers;

use crate::theme;

/// Render assistant content: citation rewrite, then markdown.
#[must_use]
pub fn render_assistant(content: &str) -> Vec<Line<'static>> {
    markdown_lines(&rewrite_citation_markers(content))
}

/// Render markdown into styled lines.
fn markdown_lines(input: &str) -> Vec<Line<'static>> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);

    let mut writer = Writer::new();
    for event in Parser::new_ext(input, options) {
        writer.handle_event(event);
    }
    writer.finish()
}

/// Folds pulldown-cmark events into lines.
struct Writer {
    lines: Vec<Line<'static>>,
    current: Vec<Span<'static>>,
    /// Inline style stack; each entry is already combined with its parents
    styles: Vec<Style>,
    /// Ordered-list counters, one per nesting level (`None` = bullet list)
    list_indices: Vec<Option<u64>>,
    in_code_block: bool,
    in_table_head: bool,
    /// A block just ended; the next block gets a blank separator line
    needs_blank: bool,
}

impl Writer {
    fn new() -> Self {
        Self {
            lines: Vec::new(),
            current: Vec::new(),
            styles: Vec::new(),
            list_indices: Vec::new(),
            in_code_block: false,
            in_table_head: false,
            needs_blank: false,
        }
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        self.flush_line_if_nonempty();
        self.lines
    }

    fn handle_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.push_span(&code, self.code_style()),
            Event::SoftBreak => self.push_span(" ", self.top_style()),
            Event::HardBreak => self.flush_line(),
            Event::Rule => {
                self.start_block();
                self.push_span("────────", Style::default().fg(theme::DIM_GRAY));
                self.flush_line();
                self.needs_blank = true;
            }
            Event::Html(html) | Event::InlineHtml(html) => {
                self.push_span(&html, self.top_style());
            }
            _ => {}
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.start_block(),
            Tag::Heading { level, .. } => {
                self.start_block();
                self.push_style(heading_style(level));
            }
            Tag::List(start) => {
                if self.list_indices.is_empty() {
                    self.start_block();
                }
                self.list_indices.push(start);
            }
            Tag::Item => {
                self.flush_line_if_nonempty();
                let depth = self.list_indices.len().saturating_sub(1);
                let marker = match self.list_indices.last().copied().flatten() {
                    Some(index) => format!("{}{index}. ", "  ".repeat(depth)),
                    None => format!("{}- ", "  ".repeat(depth)),
                };
                self.push_span(&marker, Style::default().fg(theme::DIM_GRAY));
            }
            Tag::CodeBlock(_) => {
                self.start_block();
                self.in_code_block = true;
            }
            Tag::Table(_) => self.start_block(),
            Tag::TableHead => self.in_table_head = true,
            Tag::TableCell => {
                if !self.current.is_empty() {
                    self.push_span(" │ ", Style::default().fg(theme::DIM_GRAY));
                }
            }
            Tag::Emphasis => self.push_style(Style::default().add_modifier(Modifier::ITALIC)),
            Tag::Strong => self.push_style(Style::default().add_modifier(Modifier::BOLD)),
            Tag::Strikethrough => {
                self.push_style(Style::default().add_modifier(Modifier::CROSSED_OUT));
            }
            Tag::Link { .. } => {
                self.push_style(Style::default().add_modifier(Modifier::UNDERLINED));
            }
            _ => {}
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => {
                self.flush_line_if_nonempty();
                self.needs_blank = true;
            }
            TagEnd::Heading(_) => {
                self.flush_line_if_nonempty();
                self.pop_style();
                self.needs_blank = true;
            }
            TagEnd::List(_) => {
                self.list_indices.pop();
                if self.list_indices.is_empty() {
                    self.needs_blank = true;
                }
            }
            TagEnd::Item => {
                self.flush_line_if_nonempty();
                if let Some(Some(index)) = self.list_indices.last_mut() {
                    *index += 1;
                }
            }
            TagEnd::CodeBlock => {
                self.flush_line_if_nonempty();
                self.in_code_block = false;
                self.needs_blank = true;
            }
            TagEnd::Table => self.needs_blank = true,
            TagEnd::TableHead => {
                self.flush_line_if_nonempty();
                self.in_table_head = false;
            }
            TagEnd::TableRow => self.flush_line_if_nonempty(),
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough | TagEnd::Link => {
                self.pop_style();
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if self.in_code_block {
            for (i, part) in text.split('\n').enumerate() {
                if i > 0 {
                    self.flush_line();
                }
                if !part.is_empty() {
                    self.push_span(part, self.code_style());
                }
            }
        } else {
            let style = if self.in_table_head {
                self.top_style().add_modifier(Modifier::BOLD)
            } else {
                self.top_style()
            };
            self.push_span(text, style);
        }
    }

    fn start_block(&mut self) {
        self.flush_line_if_nonempty();
        if self.needs_blank {
            self.lines.push(Line::default());
            self.needs_blank = false;
        }
    }

    fn push_style(&mut self, style: Style) {
        let combined = self.top_style().patch(style);
        self.styles.push(combined);
    }

    fn pop_style(&mut self) {
        self.styles.pop();
    }

    fn top_style(&self) -> Style {
        self.styles.last().copied().unwrap_or_default()
    }

    fn code_style(&self) -> Style {
        Style::default().fg(theme::CODE_YELLOW)
    }

    fn push_span(&mut self, text: &str, style: Style) {
        self.current.push(Span::styled(text.to_string(), style));
    }

    fn flush_line(&mut self) {
        self.lines.push(Line::from(std::mem::take(&mut self.current)));
    }

    fn flush_line_if_nonempty(&mut self) {
        if !self.current.is_empty() {
            self.flush_line();
        }
    }
}

fn heading_style(level: HeadingLevel) -> Style {
    match level {
        HeadingLevel::H1 => Style::default()
            .add_modifier(Modifier::BOLD)
            .add_modifier(Modifier::UNDERLINED),
        HeadingLevel::H2 => Style::default().add_modifier(Modifier::BOLD),
        HeadingLevel::H3 => Style::default()
            .add_modifier(Modifier::BOLD)
            .add_modifier(Modifier::ITALIC),
        _ => Style::default().add_modifier(Modifier::ITALIC),
    }
}

/// Wrap a styled line to a width, keeping span styles intact.
///
/// Words move to the next line whole; a word wider than the whole line is
/// hard-split. Leading whitespace is dropped at wrap points.
#[must_use]
pub fn wrap_styled(line: &Line<'_>, width: usize) -> Vec<Line<'static>> {
    if width == 0 {
        return vec![Line::default()];
    }

    let mut out: Vec<Line<'static>> = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();
    let mut current_width = 0usize;

    for span in &line.spans {
        let style = span.style;
        for word in split_words(&span.content) {
            let word_width = word.width();

            if current_width + word_width > width && current_width > 0 {
                out.push(take_trimmed(&mut current));
                current_width = 0;
                if word.trim().is_empty() {
                    continue;
                }
            }

            if word_width > width {
                // Unbreakable word wider than the pane: split at chars.
                let mut buf = String::new();
                let mut buf_width = 0usize;
                for c in word.chars() {
                    let cw = c.width().unwrap_or(0);
                    if current_width + buf_width + cw > width {
                        if !buf.is_empty() {
                            current.push(Span::styled(std::mem::take(&mut buf), style));
                        }
                        out.push(take_trimmed(&mut current));
                        current_width = 0;
                        buf_width = 0;
                    }
                    buf.push(c);
                    buf_width += cw;
                }
                if !buf.is_empty() {
                    current.push(Span::styled(buf, style));
                    current_width += buf_width;
                }
            } else {
                current.push(Span::styled(word.to_string(), style));
                current_width += word_width;
            }
        }
    }

    if !current.is_empty() || out.is_empty() {
        out.push(take_trimmed(&mut current));
    }
    out
}

/// Take the accumulated spans as a line, trailing whitespace dropped.
fn take_trimmed(current: &mut Vec<Span<'static>>) -> Line<'static> {
    let mut spans = std::mem::take(current);
    while let Some(last) = spans.last_mut() {
        let trimmed_len = last.content.trim_end().len();
        if trimmed_len == 0 {
            spans.pop();
        } else {
            if trimmed_len != last.content.len() {
                let kept = last.content[..trimmed_len].to_string();
                last.content = kept.into();
            }
            break;
        }
    }
    Line::from(spans)
}

/// Split text into alternating word and whitespace chunks.
fn split_words(text: &str) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut in_space = None;

    for (i, c) in text.char_indices() {
        let is_space = c == ' ';
        match in_space {
            Some(prev) if prev != is_space => {
                chunks.push(&text[start..i]);
                start = i;
            }
            _ => {}
        }
        in_space = Some(is_space);
    }
    if start < text.len() {
        chunks.push(&text[start..]);
    }
    chunks
}
