//! TUI pane rendering modules
//!
//! This module provides the rendering logic for all visual panes in the TUI,
//! organized by responsibility.
//!
//! # Pane Modules
//!
//! - [`source`]: Program and input editors, with command highlighting
//! - [`output`]: Output bytes of the last run, labelled with its outcome
//! - [`tape`]: Hex dump of the tape around the cell pointer
//! - [`status`]: Status bar with keybindings and run counters
//!
//! Each pane module exports a `render_*` function taking the frame, its area
//! and whatever state it displays. Panes never touch the session themselves.

pub mod output;
pub mod source;
pub mod status;
pub mod tape;

pub use output::render_output_pane;
pub use source::{render_input_pane, render_program_pane};
pub use status::render_status_bar;
pub use tape::{render_tape_pane, TapeScroll};
