// Snapshot of machine state at the end of a run

use crate::interpreter::engine::{Cursors, Machine};
use crate::session::RunOutcome;

/// Machine state captured when a run ends
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSnapshot {
    /// 1-based index of the run within its session
    pub run_index: u64,
    pub outcome: RunOutcome,
    pub budget: usize,
    pub ops_used: usize,
    pub cursors: Cursors,
    pub tape: Vec<u8>,
    /// Loops still open when the run ended
    pub open_loops: Vec<usize>,
}

impl RunSnapshot {
    pub fn capture(machine: &Machine, outcome: RunOutcome, budget: usize, run_index: u64) -> Self {
        RunSnapshot {
            run_index,
            outcome,
            budget,
            ops_used: machine.ops_used(),
            cursors: machine.cursors(),
            tape: machine.tape().cells().to_vec(),
            open_loops: machine.loops().addresses().to_vec(),
        }
    }

    /// Value of the cell under the pointer when the run ended
    pub fn current_cell(&self) -> u8 {
        self.tape
            .get(self.cursors.cell_ptr)
            .copied()
            .unwrap_or_default()
    }
}
