// Constants for the machine

/// Program buffer capacity in bytes
pub const CODE_CAPACITY: usize = 1024;

/// Input buffer capacity in bytes
pub const INPUT_CAPACITY: usize = 1024;

/// Output buffer capacity in bytes
pub const OUTPUT_CAPACITY: usize = 1024;

/// Number of cells on the tape
pub const TAPE_SIZE: usize = 1024;

/// Maximum number of nested open loops
pub const LOOP_DEPTH: usize = 48;

/// Instructions a single run may execute before it is cut off
pub const DEFAULT_BUDGET: usize = 4096;
