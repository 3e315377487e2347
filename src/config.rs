//! Machine configuration
//!
//! [`MachineConfig`] collects every fixed capacity, the per-run operations
//! budget and the two behaviour policies. [`MachineConfig::default`] uses the
//! values from [`crate::interpreter::constants`]; the CLI overrides individual
//! fields from flags.

use crate::interpreter::constants::{
    CODE_CAPACITY, DEFAULT_BUDGET, INPUT_CAPACITY, LOOP_DEPTH, OUTPUT_CAPACITY, TAPE_SIZE,
};
pub use crate::memory::buffer::WritePolicy;
use thiserror::Error;

/// What `,` does once the input is exhausted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EofPolicy {
    /// Leave the current cell as it is
    #[default]
    Unchanged,
    /// Store 0 in the current cell
    Zero,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineConfig {
    pub code_capacity: usize,
    pub input_capacity: usize,
    pub output_capacity: usize,
    pub tape_size: usize,
    pub loop_depth: usize,
    /// Instructions executed per run before it is cut off
    pub budget: usize,
    pub eof: EofPolicy,
    pub oversize_writes: WritePolicy,
}

impl Default for MachineConfig {
    fn default() -> Self {
        MachineConfig {
            code_capacity: CODE_CAPACITY,
            input_capacity: INPUT_CAPACITY,
            output_capacity: OUTPUT_CAPACITY,
            tape_size: TAPE_SIZE,
            loop_depth: LOOP_DEPTH,
            budget: DEFAULT_BUDGET,
            eof: EofPolicy::default(),
            oversize_writes: WritePolicy::default(),
        }
    }
}

impl MachineConfig {
    /// Check that every size is usable.
    ///
    /// A zero tape would make pointer wrap-around undefined, and a zero budget
    /// or buffer makes every run trivially fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("code_capacity", self.code_capacity),
            ("input_capacity", self.input_capacity),
            ("output_capacity", self.output_capacity),
            ("tape_size", self.tape_size),
            ("loop_depth", self.loop_depth),
            ("budget", self.budget),
        ];
        match fields.iter().find(|(_, value)| *value == 0) {
            Some((field, _)) => Err(ConfigError::Zero { field: *field }),
            None => Ok(()),
        }
    }

    pub fn with_budget(mut self, budget: usize) -> Self {
        self.budget = budget;
        self
    }

    pub fn with_tape_size(mut self, tape_size: usize) -> Self {
        self.tape_size = tape_size;
        self
    }

    pub fn with_loop_depth(mut self, loop_depth: usize) -> Self {
        self.loop_depth = loop_depth;
        self
    }

    pub fn with_output_capacity(mut self, output_capacity: usize) -> Self {
        self.output_capacity = output_capacity;
        self
    }

    pub fn with_eof(mut self, eof: EofPolicy) -> Self {
        self.eof = eof;
        self
    }

    pub fn with_oversize_writes(mut self, policy: WritePolicy) -> Self {
        self.oversize_writes = policy;
        self
    }
}
