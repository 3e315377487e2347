//! Brainfuck execution engine
//!
//! This module provides the core execution logic:
//! - [`engine`]: The [`Machine`](engine::Machine) and its fetch-decode-execute loop
//! - [`jumps`]: Bracket handling and the forward scan for a matching `]`
//! - [`errors`]: Errors that stop a run early
//! - [`constants`]: Default capacities and budget
//!
//! # Execution Model
//!
//! A run executes instructions from the program pointer until the program is
//! exhausted, the operations budget reaches zero, or an error stops it. Every
//! byte costs one operation. Output produced before an error is kept.

pub mod constants;
pub mod engine;
pub mod errors;
pub mod jumps;
