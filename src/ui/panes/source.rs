//! Program and input pane rendering
//!
//! Both panes are editable: the app writes every keystroke back to the
//! corresponding resource.
//!
//! # Program highlighting
//!
//! The eight commands are coloured by kind (cell arithmetic, pointer moves,
//! I/O, brackets); every other byte is shown as a comment. One byte offset can
//! be marked, which the app uses for the instruction a run stopped on.

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

fn command_style(byte: u8) -> Style {
    match byte {
        b'+' | b'-' => Style::default().fg(DEFAULT_THEME.number),
        b'>' | b'<' => Style::default().fg(DEFAULT_THEME.keyword),
        b'.' | b',' => Style::default().fg(DEFAULT_THEME.string),
        b'[' | b']' => Style::default()
            .fg(DEFAULT_THEME.primary)
            .add_modifier(Modifier::BOLD),
        _ => Style::default().fg(DEFAULT_THEME.comment),
    }
}

/// Printable form of one byte; control and non-ASCII bytes become `·`
fn display_char(byte: u8) -> char {
    if byte.is_ascii_graphic() || byte == b' ' {
        byte as char
    } else {
        '·'
    }
}

/// Split program bytes into highlighted lines, marking `marker` if set
fn highlight_program(program: &[u8], marker: Option<(usize, Style)>) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let mut spans = Vec::new();

    for (offset, &byte) in program.iter().enumerate() {
        if byte == b'\n' {
            lines.push(Line::from(std::mem::take(&mut spans)));
            continue;
        }
        let style = match marker {
            Some((at, marked)) if at == offset => marked,
            _ => command_style(byte),
        };
        spans.push(Span::styled(display_char(byte).to_string(), style));
    }
    lines.push(Line::from(spans));
    lines
}

fn pane_block(title: String, is_focused: bool) -> Block<'static> {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style)
}

/// Render the program pane
///
/// `failure_at` is the offset of the instruction the last run failed on.
pub fn render_program_pane(
    frame: &mut Frame,
    area: Rect,
    program: &[u8],
    capacity: usize,
    failure_at: Option<usize>,
    is_focused: bool,
) {
    let title = format!(" Program {}/{} ", program.len(), capacity);
    let block = pane_block(title, is_focused);

    if program.is_empty() {
        let paragraph = Paragraph::new("(type a program)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let marker = failure_at.map(|at| {
        (
            at,
            Style::default()
                .bg(DEFAULT_THEME.error)
                .fg(DEFAULT_THEME.current_line_bg)
                .add_modifier(Modifier::BOLD),
        )
    });

    let paragraph = Paragraph::new(highlight_program(program, marker))
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

/// Render the input pane
///
/// Bytes before `consumed` were read by `,` during the last run and are dimmed.
pub fn render_input_pane(
    frame: &mut Frame,
    area: Rect,
    input: &[u8],
    capacity: usize,
    consumed: usize,
    is_focused: bool,
) {
    let title = format!(" Input {}/{} ", input.len(), capacity);
    let block = pane_block(title, is_focused);

    if input.is_empty() {
        let paragraph = Paragraph::new("(no input)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let split = consumed.min(input.len());
    let read: String = input[..split].iter().map(|&b| display_char(b)).collect();
    let unread: String = input[split..].iter().map(|&b| display_char(b)).collect();

    let line = Line::from(vec![
        Span::styled(read, Style::default().fg(DEFAULT_THEME.comment)),
        Span::styled(unread, Style::default().fg(DEFAULT_THEME.fg)),
    ]);

    let paragraph = Paragraph::new(line)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}
