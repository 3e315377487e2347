//! Tape pane rendering
//!
//! Shows the tape as captured at the end of the last run, as a hex dump of
//! [`CELLS_PER_ROW`] cells per row. The cell under the pointer is
//! highlighted, and its row is kept in view unless the user scrolls.

use crate::snapshot::RunSnapshot;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub const CELLS_PER_ROW: usize = 16;

/// Row scroll state: `None` follows the cell pointer
pub type TapeScroll = Option<usize>;

fn render_row(cells: &[u8], row_start: usize, cell_ptr: usize) -> Line<'static> {
    let mut spans = vec![Span::styled(
        format!("{:04x}  ", row_start),
        Style::default().fg(DEFAULT_THEME.comment),
    )];

    for (i, &cell) in cells.iter().enumerate() {
        let address = row_start + i;
        let style = if address == cell_ptr {
            Style::default()
                .bg(DEFAULT_THEME.secondary)
                .fg(DEFAULT_THEME.current_line_bg)
                .add_modifier(Modifier::BOLD)
        } else if cell == 0 {
            Style::default().fg(DEFAULT_THEME.comment)
        } else {
            Style::default().fg(DEFAULT_THEME.fg)
        };
        spans.push(Span::styled(format!("{:02x}", cell), style));
        spans.push(Span::raw(" "));
    }

    let ascii: String = cells
        .iter()
        .map(|&b| if b.is_ascii_graphic() { b as char } else { '.' })
        .collect();
    spans.push(Span::styled(
        format!(" {}", ascii),
        Style::default().fg(DEFAULT_THEME.string),
    ));

    Line::from(spans)
}

/// First row to show so that `ptr_row` is visible, centred when possible
fn follow_row(ptr_row: usize, total_rows: usize, visible_rows: usize) -> usize {
    let max_first = total_rows.saturating_sub(visible_rows);
    ptr_row.saturating_sub(visible_rows / 2).min(max_first)
}

/// Render the tape pane
pub fn render_tape_pane(
    frame: &mut Frame,
    area: Rect,
    snapshot: Option<&RunSnapshot>,
    is_focused: bool,
    scroll: &mut TapeScroll,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let Some(snapshot) = snapshot else {
        let block = Block::default()
            .title(" Tape ")
            .borders(Borders::ALL)
            .border_style(border_style);
        let paragraph = Paragraph::new("(not run yet)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    };

    let cell_ptr = snapshot.cursors.cell_ptr;
    let block = Block::default()
        .title(format!(
            " Tape ptr={} cell={} loops={} ",
            cell_ptr,
            snapshot.current_cell(),
            snapshot.open_loops.len()
        ))
        .borders(Borders::ALL)
        .border_style(border_style);

    let total_rows = snapshot.tape.len().div_ceil(CELLS_PER_ROW);
    let visible_rows = area.height.saturating_sub(2).max(1) as usize;
    let max_first = total_rows.saturating_sub(visible_rows);

    let first_row = match scroll {
        Some(row) => {
            *row = (*row).min(max_first);
            *row
        }
        None => follow_row(cell_ptr / CELLS_PER_ROW, total_rows, visible_rows),
    };

    let lines: Vec<Line> = snapshot
        .tape
        .chunks(CELLS_PER_ROW)
        .enumerate()
        .skip(first_row)
        .take(visible_rows)
        .map(|(row, cells)| render_row(cells, row * CELLS_PER_ROW, cell_ptr))
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_follow_row_centres_pointer() {
        assert_eq!(follow_row(0, 64, 10), 0);
        assert_eq!(follow_row(30, 64, 10), 25);
        assert_eq!(follow_row(63, 64, 10), 54);
        assert_eq!(follow_row(3, 2, 10), 0);
    }

    #[test]
    fn test_row_marks_pointer_cell() {
        let line = render_row(&[0, 0x41], 16, 17);
        // address, then (cell, space) pairs, then the ascii column
        assert_eq!(line.spans.len(), 1 + 2 * 2 + 1);
        assert_eq!(line.spans[3].content, "41");
        assert_eq!(line.spans[3].style.bg, Some(DEFAULT_THEME.secondary));
        assert_eq!(line.spans[5].content, " .A");
    }
}
