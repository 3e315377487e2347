//! Main TUI application state and logic

use crate::session::resource::{Resource, ResourceDir};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::Duration;

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Program,
    Input,
    Output,
    Tape,
}

impl FocusedPane {
    /// Move focus to the next pane (program -> input -> output -> tape)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Program => FocusedPane::Input,
            FocusedPane::Input => FocusedPane::Output,
            FocusedPane::Output => FocusedPane::Tape,
            FocusedPane::Tape => FocusedPane::Program,
        }
    }

    /// Move focus to the previous pane
    pub fn prev(self) -> Self {
        match self {
            FocusedPane::Program => FocusedPane::Tape,
            FocusedPane::Input => FocusedPane::Program,
            FocusedPane::Output => FocusedPane::Input,
            FocusedPane::Tape => FocusedPane::Output,
        }
    }

    /// The resource typing into this pane writes, if any
    pub fn editable_resource(self) -> Option<Resource> {
        match self {
            FocusedPane::Program => Some(Resource::Program),
            FocusedPane::Input => Some(Resource::Input),
            FocusedPane::Output | FocusedPane::Tape => None,
        }
    }
}

/// The main application state
pub struct App {
    /// The mounted resources the UI reads and writes
    pub dir: ResourceDir,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    /// Per-pane scroll offsets
    pub output_scroll: usize,
    pub tape_scroll: super::panes::TapeScroll,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,
}

impl App {
    pub fn new(dir: ResourceDir) -> Self {
        App {
            dir,
            focused_pane: FocusedPane::Program,
            output_scroll: 0,
            tape_scroll: None,
            should_quit: false,
            status_message: String::from("Ready!"),
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        // Reading the output reruns the machine only after an edit
        let report = self.dir.session().read_output();
        let (snapshot, config, run_count, program, input) = self.dir.session().with(|s| {
            (
                s.last_run().cloned(),
                s.config().clone(),
                s.run_count(),
                s.read_program().to_vec(),
                s.read_input().to_vec(),
            )
        });

        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let pane_area = main_chunks[0];
        let status_area = main_chunks[1];

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(pane_area);

        // Left column: Program (top) | Input (bottom)
        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(75), Constraint::Percentage(25)])
            .split(columns[0]);

        // Right column: Output (top) | Tape (bottom)
        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(columns[1]);

        super::panes::render_program_pane(
            frame,
            left_rows[0],
            &program,
            config.code_capacity,
            report.outcome.failure_offset(),
            self.focused_pane == FocusedPane::Program,
        );

        super::panes::render_input_pane(
            frame,
            left_rows[1],
            &input,
            config.input_capacity,
            snapshot.as_ref().map_or(0, |s| s.cursors.input_pos),
            self.focused_pane == FocusedPane::Input,
        );

        super::panes::render_output_pane(
            frame,
            right_rows[0],
            &report.bytes,
            report.outcome,
            self.focused_pane == FocusedPane::Output,
            &mut self.output_scroll,
        );

        super::panes::render_tape_pane(
            frame,
            right_rows[1],
            snapshot.as_ref(),
            self.focused_pane == FocusedPane::Tape,
            &mut self.tape_scroll,
        );

        super::panes::render_status_bar(
            frame,
            status_area,
            &self.status_message,
            &report,
            config.budget,
            run_count,
        );
    }

    /// Handle keyboard events
    fn handle_key_event(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if ctrl => self.should_quit = true,
            KeyCode::Char('r') if ctrl => {
                self.dir.session().with(|s| s.invalidate());
                self.status_message = "Rerun requested".to_string();
            }
            KeyCode::Tab => self.focused_pane = self.focused_pane.next(),
            KeyCode::BackTab => self.focused_pane = self.focused_pane.prev(),
            KeyCode::Up => match self.focused_pane {
                FocusedPane::Output => {
                    self.output_scroll = self.output_scroll.saturating_sub(1);
                }
                FocusedPane::Tape => {
                    let row = self.tape_scroll.unwrap_or(0);
                    self.tape_scroll = Some(row.saturating_sub(1));
                }
                _ => {}
            },
            KeyCode::Down => match self.focused_pane {
                FocusedPane::Output => {
                    self.output_scroll = self.output_scroll.saturating_add(1);
                }
                FocusedPane::Tape => {
                    let row = self.tape_scroll.unwrap_or(0);
                    self.tape_scroll = Some(row.saturating_add(1));
                }
                _ => {}
            },
            KeyCode::Home if self.focused_pane == FocusedPane::Tape => {
                // Follow the cell pointer again
                self.tape_scroll = None;
            }
            KeyCode::Char(c) if !ctrl => self.edit(|bytes| {
                let mut buf = [0u8; 4];
                bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            }),
            KeyCode::Enter => self.edit(|bytes| bytes.push(b'\n')),
            KeyCode::Backspace => self.edit(|bytes| {
                bytes.pop();
            }),
            _ => {}
        }
    }

    /// Apply `change` to the focused editable resource and write it back
    fn edit(&mut self, change: impl FnOnce(&mut Vec<u8>)) {
        let Some(resource) = self.focused_pane.editable_resource() else {
            return;
        };

        let session = self.dir.session();
        let mut bytes = session.read(resource);
        change(&mut bytes);

        self.status_message = match session.write(resource, &bytes) {
            Ok(stored) if stored < bytes.len() => {
                format!("{} full: kept {} bytes", resource, stored)
            }
            Ok(_) => format!("Edited {}", resource),
            Err(e) => format!("Write failed: {}", e),
        };
    }
}
