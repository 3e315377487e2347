//! Forward bracket scan.
//!
//! When `[` sees a zero cell the engine skips to the matching `]` by scanning
//! the program text. No match table is built ahead of time, so the scan is
//! linear in the distance to the match and is paid every time a loop is
//! skipped. The operations budget bounds the total.

use crate::interpreter::engine::Machine;
use crate::interpreter::errors::ExecError;

/// Find the `]` that closes the `[` at `open`.
///
/// Scanning starts just past `open`. Nested `[` raise the depth, `]` at
/// non-zero depth lowers it, and the first `]` at depth zero is the match.
/// `program` must already be cut at its logical end.
pub fn find_matching_close(program: &[u8], open: usize) -> Result<usize, ExecError> {
    let mut depth = 0usize;
    for (offset, &byte) in program.iter().enumerate().skip(open + 1) {
        match byte {
            b'[' => depth += 1,
            b']' if depth == 0 => return Ok(offset),
            b']' => depth -= 1,
            _ => {}
        }
    }
    Err(ExecError::UnmatchedBracket { position: open })
}

impl Machine {
    /// Executes `[` at the current program position.
    ///
    /// A non-zero cell enters the loop and records its address so `]` can
    /// return to the body. A zero cell moves `code_pos` onto the matching `]`;
    /// the generic advance then steps past it.
    pub(crate) fn execute_loop_open(&mut self) -> Result<(), ExecError> {
        let position = self.cursors.code_pos;
        if self.tape.current() != 0 {
            self.loops
                .push(position)
                .map_err(|e| ExecError::from_stack(e, position))?;
        } else {
            let program = self.program_text();
            self.cursors.code_pos = find_matching_close(program, position)?;
        }
        Ok(())
    }

    /// Executes `]` at the current program position.
    ///
    /// A non-zero cell jumps back to the innermost `[` without popping it, so
    /// the generic advance lands on the first body instruction and the loop
    /// stays open. A zero cell closes the loop.
    pub(crate) fn execute_loop_close(&mut self) -> Result<(), ExecError> {
        let position = self.cursors.code_pos;
        if self.tape.current() != 0 {
            self.cursors.code_pos = self
                .loops
                .peek()
                .map_err(|e| ExecError::from_stack(e, position))?;
        } else {
            self.loops
                .pop()
                .map_err(|e| ExecError::from_stack(e, position))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finds_simple_match() {
        assert_eq!(find_matching_close(b"[-]", 0), Ok(2));
    }

    #[test]
    fn test_skips_nested_loops() {
        let program = b"+[>[-]<[+]]>.";
        assert_eq!(find_matching_close(program, 1), Ok(10));
        assert_eq!(find_matching_close(program, 3), Ok(5));
    }

    #[test]
    fn test_unmatched_open() {
        assert_eq!(
            find_matching_close(b"[+", 0),
            Err(ExecError::UnmatchedBracket { position: 0 })
        );
        assert_eq!(
            find_matching_close(b"[[]", 0),
            Err(ExecError::UnmatchedBracket { position: 0 })
        );
    }
}
