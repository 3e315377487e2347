//! # Introduction
//!
//! kbf runs Brainfuck programs behind three resources: the program source, an
//! input stream and an output stream. Writing the program or the input only
//! marks the output stale; the machine runs on the next output read and the
//! result is cached until the next write.
//!
//! ## Execution pipeline
//!
//! ```text
//! write code/input → Session (dirty) → read output → Machine::run → cached output
//! ```
//!
//! 1. [`memory`]: bounded byte buffers, the circular [`memory::tape::Tape`]
//!    and the capacity-checked [`memory::stack::LoopStack`].
//! 2. [`interpreter`]: the [`interpreter::engine::Machine`] and its
//!    fetch-decode-execute loop, with bracket handling in
//!    [`interpreter::jumps`].
//! 3. [`session`]: the dirty-cache protocol, a mutex-guarded
//!    [`session::shared::SharedSession`], per-caller
//!    [`session::registry::SessionRegistry`] and the
//!    [`session::ResourceDir`] a host mounts.
//! 4. [`snapshot`]: machine state captured at the end of each run.
//! 5. [`config`]: capacities, budget and behaviour policies.
//! 6. [`ui`]: ratatui-based TUI; not part of the stable library API.
//!
//! ## Instructions
//!
//! `+ - > < . , [ ]`. Every other byte is a no-op that still costs one
//! operation; a NUL byte ends the program.

pub mod config;
pub mod interpreter;
pub mod memory;
pub mod session;
pub mod snapshot;
pub mod ui;
