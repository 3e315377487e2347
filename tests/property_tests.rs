//! Property-based tests for the tape and the output cache.
//!
//! Uses proptest to check invariants across generated tapes and programs.

use kbf::config::MachineConfig;
use kbf::memory::tape::Tape;
use kbf::session::Session;
use proptest::prelude::*;

/// Programs without `[` or `]`, so every run completes
fn straight_line_program() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(
        prop::sample::select(vec![b'+', b'-', b'>', b'<', b'.', b',', b' ']),
        0..200,
    )
}

proptest! {
    /// 256 increments or decrements bring any cell back to its value.
    #[test]
    fn prop_cell_arithmetic_wraps(start in any::<u8>(), index in 0usize..64) {
        let mut tape = Tape::new(64);
        tape.seek(index);
        tape.set_current(start);

        for _ in 0..256 {
            tape.increment();
        }
        prop_assert_eq!(tape.current(), start);

        for _ in 0..256 {
            tape.decrement();
        }
        prop_assert_eq!(tape.current(), start);
    }

    /// N advances on a tape of N cells return the pointer to where it began.
    #[test]
    fn prop_pointer_wraps(len in 1usize..512, start in 0usize..512) {
        let mut tape = Tape::new(len);
        tape.seek(start % len);
        let origin = tape.ptr();

        for _ in 0..len {
            tape.advance();
        }
        prop_assert_eq!(tape.ptr(), origin);

        tape.seek(0);
        tape.retreat();
        prop_assert_eq!(tape.ptr(), len - 1);
    }

    /// Reads without writes in between never rerun the machine.
    #[test]
    fn prop_reads_are_idempotent(
        program in straight_line_program(),
        input in prop::collection::vec(any::<u8>(), 0..32),
        reads in 2usize..6,
    ) {
        let mut session = Session::default();
        session.write_program(&program).unwrap();
        session.write_input(&input).unwrap();

        let first = session.read_output().bytes.to_vec();
        for _ in 1..reads {
            let view = session.read_output();
            prop_assert!(!view.recomputed);
            prop_assert_eq!(view.bytes, first.as_slice());
        }
        prop_assert_eq!(session.run_count(), 1);
    }

    /// Every write, even of the same bytes, costs exactly one rerun.
    #[test]
    fn prop_writes_invalidate(program in straight_line_program(), writes in 1u64..5) {
        let mut session = Session::default();
        session.write_program(&program).unwrap();
        let first = session.read_output().bytes.to_vec();

        for _ in 0..writes {
            session.write_program(&program).unwrap();
            prop_assert_eq!(session.read_output().bytes, first.as_slice());
        }
        prop_assert_eq!(session.run_count(), writes + 1);
    }

    /// A run never spends more operations than its budget.
    #[test]
    fn prop_budget_bounds_ops(
        program in prop::collection::vec(
            prop::sample::select(vec![b'+', b'-', b'[', b']', b'>', b'.']),
            0..64,
        ),
        budget in 1usize..2048,
    ) {
        let config = MachineConfig::default().with_budget(budget);
        let mut session = Session::new(config).unwrap();
        session.write_program(&program).unwrap();

        let ops_used = session.read_output().ops_used;
        prop_assert!(ops_used <= budget);
    }
}
