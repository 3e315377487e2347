//! Memory model for the machine
//!
//! This module provides the bounded containers the engine runs on:
//! - [`buffer`]: Fixed-capacity byte buffers for program, input and output
//! - [`tape`]: The circular cell array addressed by the cell pointer
//! - [`stack`]: The loop stack used to return to a loop body
//!
//! # Bounds
//!
//! Every container carries an explicit capacity fixed at construction.
//! Nothing grows past it: writes are truncated or rejected, pushes past the
//! loop depth fail with [`CapacityError`], and tape addressing wraps.
//!
//! ```text
//! cell_ptr + 1  →  (cell_ptr + 1) mod len
//! cell_ptr - 1  →  (cell_ptr + len - 1) mod len
//! ```

pub mod buffer;
pub mod stack;
pub mod tape;

use std::fmt;
use thiserror::Error;

/// Which bounded container a capacity check refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Program,
    Input,
    Output,
    LoopStack,
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Region::Program => "program buffer",
            Region::Input => "input buffer",
            Region::Output => "output buffer",
            Region::LoopStack => "loop stack",
        };
        f.write_str(name)
    }
}

/// A request that does not fit in a fixed-capacity container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{region} capacity exceeded: {requested} requested, capacity is {capacity}")]
pub struct CapacityError {
    pub region: Region,
    pub capacity: usize,
    pub requested: usize,
}

impl CapacityError {
    pub fn new(region: Region, capacity: usize, requested: usize) -> Self {
        CapacityError {
            region,
            capacity,
            requested,
        }
    }
}
