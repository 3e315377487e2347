//! Output pane rendering

use crate::session::RunOutcome;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, List, ListItem, Padding, Paragraph},
    Frame,
};

/// Split output bytes into display lines, dropping one trailing empty line
fn output_lines(bytes: &[u8]) -> Vec<String> {
    let text = String::from_utf8_lossy(bytes);
    let mut lines: Vec<String> = text.split('\n').map(|s| s.to_string()).collect();
    if lines.last().is_some_and(|s| s.is_empty()) {
        lines.pop();
    }
    lines
}

/// Render the output pane
pub fn render_output_pane(
    frame: &mut Frame,
    area: Rect,
    bytes: &[u8],
    outcome: RunOutcome,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let title_color = if outcome.is_failure() {
        DEFAULT_THEME.error
    } else if outcome.is_complete() {
        DEFAULT_THEME.success
    } else {
        DEFAULT_THEME.secondary
    };

    let block = Block::default()
        .title(format!(" Output ({} bytes, {}) ", bytes.len(), outcome.label()))
        .title_style(Style::default().fg(title_color))
        .borders(Borders::ALL)
        .border_style(border_style);

    let lines = output_lines(bytes);

    if lines.is_empty() {
        let paragraph = Paragraph::new("(no output)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
    } else {
        let block = block.padding(Padding::new(1, 0, 0, 0));
        let all_items: Vec<ListItem> = lines
            .into_iter()
            .map(|line| ListItem::new(line).style(Style::default().fg(DEFAULT_THEME.fg)))
            .collect();

        let total_items = all_items.len();
        let visible_height = area.height.saturating_sub(2).max(1) as usize; // Account for borders, min 1

        // Clamp scroll offset only if content exceeds visible area
        if total_items > visible_height {
            let max_scroll = total_items - visible_height;
            *scroll_offset = (*scroll_offset).min(max_scroll);
        } else {
            *scroll_offset = 0;
        }

        let visible_items: Vec<ListItem> = all_items
            .into_iter()
            .skip(*scroll_offset)
            .take(visible_height)
            .collect();

        let list = List::new(visible_items).block(block);
        frame.render_widget(list, area);
    }
}
