//! Terminal user interface built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! The UI is organized into three layers:
//!
//! - **[`app`]**: application state, keyboard event loop, pane focus, editing
//! - **[`panes`]**: stateless render functions for each visible pane (program,
//!   input, output, tape, status bar)
//! - **[`theme`]**: centralized color palette used by all panes
//!
//! The entry point for consumers is [`App`]: construct it with a mounted
//! [`ResourceDir`] and call [`App::run`] to start the event loop. Every edit
//! goes through the directory's `code` and `input` entries, and every frame
//! reads `output`, so the machine reruns only after an edit.
//!
//! [`ResourceDir`]: crate::session::ResourceDir
//! [`App::run`]: app::App::run

pub mod app;
pub mod panes;
pub mod theme;

pub use app::App;
