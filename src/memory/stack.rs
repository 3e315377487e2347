//! Loop stack implementation
//!
//! This module provides the address stack used to resolve `[`/`]` pairs:
//! - [`LoopStack`]: Program addresses of the currently open `[` instructions
//! - [`StackError`]: Overflow past the declared depth, or underflow
//!
//! # Depth
//!
//! The stack never holds more than its capacity. A push at full depth fails
//! with [`StackError::Overflow`] instead of growing, and pop/peek on an empty
//! stack fail with [`StackError::Underflow`]. Underflow is reachable only from
//! a program with a stray `]`.

use super::{CapacityError, Region};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StackError {
    #[error(transparent)]
    Overflow(#[from] CapacityError),

    #[error("loop stack underflow")]
    Underflow,
}

/// Fixed-capacity stack of program addresses
#[derive(Debug, Clone)]
pub struct LoopStack {
    addresses: Vec<usize>,
    capacity: usize,
}

impl LoopStack {
    pub fn new(capacity: usize) -> Self {
        LoopStack {
            addresses: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Push the address of an entered `[`
    pub fn push(&mut self, address: usize) -> Result<(), StackError> {
        if self.addresses.len() >= self.capacity {
            return Err(CapacityError::new(
                Region::LoopStack,
                self.capacity,
                self.addresses.len() + 1,
            )
            .into());
        }
        self.addresses.push(address);
        Ok(())
    }

    /// Pop the innermost open loop
    pub fn pop(&mut self) -> Result<usize, StackError> {
        self.addresses.pop().ok_or(StackError::Underflow)
    }

    /// Address of the innermost open loop, without removing it
    pub fn peek(&self) -> Result<usize, StackError> {
        self.addresses.last().copied().ok_or(StackError::Underflow)
    }

    pub fn clear(&mut self) {
        self.addresses.clear();
    }

    pub fn depth(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    /// Open loop addresses, outermost first (for UI display)
    pub fn addresses(&self) -> &[usize] {
        &self.addresses
    }
}
