//! Execution error types for the machine
//!
//! This module defines [`ExecError`], which represents every way a run can stop
//! early (as opposed to running out of budget, which is a [`RunStatus`]).
//!
//! Both variants are fatal to the current run only. The machine keeps the
//! output produced before the failure point and can be reset and run again.
//!
//! [`RunStatus`]: crate::interpreter::engine::RunStatus

use crate::memory::stack::StackError;
use crate::memory::CapacityError;
use thiserror::Error;

/// Errors that stop a run before the program is exhausted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ExecError {
    /// A `[` with no matching `]`, or a `]` with no open loop
    #[error("unmatched bracket at program offset {position}")]
    UnmatchedBracket { position: usize },

    /// Loop nesting or output exceeded its fixed capacity
    #[error(transparent)]
    Capacity(#[from] CapacityError),
}

impl ExecError {
    /// Map a loop stack failure at the bracket at `position`.
    ///
    /// Underflow means a `]` had no open loop to return to.
    pub fn from_stack(err: StackError, position: usize) -> Self {
        match err {
            StackError::Overflow(capacity) => ExecError::Capacity(capacity),
            StackError::Underflow => ExecError::UnmatchedBracket { position },
        }
    }
}
