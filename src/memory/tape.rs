//! Circular cell tape
//!
//! The tape is a fixed number of byte cells. Cell arithmetic wraps modulo 256
//! and pointer movement wraps modulo the tape length, so every address the
//! engine can produce is in bounds.

/// Fixed-size, wrap-around array of byte cells
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: Box<[u8]>,
    ptr: usize,
}

impl Tape {
    /// Create a zeroed tape. `len` must be non-zero.
    pub fn new(len: usize) -> Self {
        debug_assert!(len > 0, "tape length must be non-zero");
        Tape {
            cells: vec![0; len].into_boxed_slice(),
            ptr: 0,
        }
    }

    /// Zero every cell and move the pointer back to 0
    pub fn reset(&mut self) {
        self.cells.fill(0);
        self.ptr = 0;
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn ptr(&self) -> usize {
        self.ptr
    }

    /// Move the pointer to `index`, wrapped onto the tape
    pub fn seek(&mut self, index: usize) {
        self.ptr = index % self.cells.len();
    }

    pub fn advance(&mut self) {
        self.ptr = (self.ptr + 1) % self.cells.len();
    }

    pub fn retreat(&mut self) {
        self.ptr = (self.ptr + self.cells.len() - 1) % self.cells.len();
    }

    /// Value of the current cell
    pub fn current(&self) -> u8 {
        self.cells[self.ptr]
    }

    pub fn set_current(&mut self, value: u8) {
        self.cells[self.ptr] = value;
    }

    pub fn increment(&mut self) {
        self.cells[self.ptr] = self.cells[self.ptr].wrapping_add(1);
    }

    pub fn decrement(&mut self) {
        self.cells[self.ptr] = self.cells[self.ptr].wrapping_sub(1);
    }

    /// Value at an arbitrary address, wrapped onto the tape
    pub fn get(&self, index: usize) -> u8 {
        self.cells[index % self.cells.len()]
    }

    pub fn set(&mut self, index: usize, value: u8) {
        let len = self.cells.len();
        self.cells[index % len] = value;
    }

    pub fn cells(&self) -> &[u8] {
        &self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retreat_from_zero_wraps_to_end() {
        let mut tape = Tape::new(16);
        tape.retreat();
        assert_eq!(tape.ptr(), 15);
    }

    #[test]
    fn test_advance_full_circle() {
        let mut tape = Tape::new(7);
        tape.seek(3);
        for _ in 0..7 {
            tape.advance();
        }
        assert_eq!(tape.ptr(), 3);
    }

    #[test]
    fn test_cell_wraps() {
        let mut tape = Tape::new(1);
        tape.decrement();
        assert_eq!(tape.current(), 255);
        tape.increment();
        assert_eq!(tape.current(), 0);
    }

    #[test]
    fn test_reset_zeroes_cells_and_pointer() {
        let mut tape = Tape::new(4);
        tape.set(2, 9);
        tape.seek(2);
        tape.reset();
        assert_eq!(tape.cells(), &[0, 0, 0, 0]);
        assert_eq!(tape.ptr(), 0);
    }
}
