//! Session state and the output cache
//!
//! A [`Session`] owns one [`Machine`] and decides when it runs. Writes to the
//! program or input only store bytes and mark the cached output stale; the
//! machine runs lazily on the next output read:
//!
//! ```text
//! write_program / write_input ──▶ Dirty
//! read_output (Dirty)          ──▶ reset + run ──▶ Clean
//! read_output (Clean)          ──▶ cached output
//! ```
//!
//! Any write invalidates, even one that stores the same bytes again.
//!
//! - [`shared`]: a mutex-guarded handle for callers that share one session
//! - [`registry`]: independent sessions keyed by caller
//! - [`resource`]: the program/input/output entries a host exposes

pub mod registry;
pub mod resource;
pub mod shared;

pub use resource::{Resource, ResourceDir, ResourceError};

use crate::config::{ConfigError, MachineConfig};
use crate::interpreter::engine::{Machine, RunStatus};
use crate::interpreter::errors::ExecError;
use crate::memory::CapacityError;
use crate::snapshot::RunSnapshot;
use std::fmt;
use tracing::{debug, trace, warn};

/// How the last run ended, as reported alongside its output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    BudgetExhausted,
    UnmatchedBracket { position: usize },
    CapacityExceeded(CapacityError),
}

impl RunOutcome {
    /// Whether the program ran to its end
    pub fn is_complete(&self) -> bool {
        matches!(self, RunOutcome::Completed)
    }

    /// Whether the run was stopped by an error in the program
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            RunOutcome::UnmatchedBracket { .. } | RunOutcome::CapacityExceeded(_)
        )
    }

    /// Program offset of the bracket a failed run stopped on
    pub fn failure_offset(&self) -> Option<usize> {
        match self {
            RunOutcome::UnmatchedBracket { position } => Some(*position),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RunOutcome::Completed => "completed",
            RunOutcome::BudgetExhausted => "budget exhausted",
            RunOutcome::UnmatchedBracket { .. } => "unmatched bracket",
            RunOutcome::CapacityExceeded(_) => "capacity exceeded",
        }
    }
}

impl From<Result<RunStatus, ExecError>> for RunOutcome {
    fn from(result: Result<RunStatus, ExecError>) -> Self {
        match result {
            Ok(RunStatus::Completed) => RunOutcome::Completed,
            Ok(RunStatus::BudgetExhausted) => RunOutcome::BudgetExhausted,
            Err(ExecError::UnmatchedBracket { position }) => {
                RunOutcome::UnmatchedBracket { position }
            }
            Err(ExecError::Capacity(err)) => RunOutcome::CapacityExceeded(err),
        }
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutcome::UnmatchedBracket { position } => {
                write!(f, "unmatched bracket at offset {}", position)
            }
            RunOutcome::CapacityExceeded(err) => write!(f, "{}", err),
            _ => f.write_str(self.label()),
        }
    }
}

/// Whether the output buffer reflects the current program and input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CacheState {
    Dirty,
    Clean,
}

/// Output bytes together with how the run that produced them ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputView<'a> {
    pub bytes: &'a [u8],
    pub outcome: RunOutcome,
    pub ops_used: usize,
    /// Whether this read triggered a run
    pub recomputed: bool,
}

/// One execution context: the machine plus its cache state
#[derive(Debug, Clone)]
pub struct Session {
    config: MachineConfig,
    machine: Machine,
    cache: CacheState,
    runs: u64,
    last_run: Option<RunSnapshot>,
}

impl Session {
    pub fn new(config: MachineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_validated(config))
    }

    pub(crate) fn from_validated(config: MachineConfig) -> Self {
        Session {
            machine: Machine::new(&config),
            config,
            // Nothing has run yet, so even the empty program is stale
            cache: CacheState::Dirty,
            runs: 0,
            last_run: None,
        }
    }

    /// Replace the program, returning how many bytes were stored
    pub fn write_program(&mut self, bytes: &[u8]) -> Result<usize, CapacityError> {
        let stored = self
            .machine
            .load_program(bytes, self.config.oversize_writes)?;
        if stored < bytes.len() {
            warn!(requested = bytes.len(), stored, "program truncated to capacity");
        }
        trace!(stored, "program written");
        self.invalidate();
        Ok(stored)
    }

    /// Replace the input, returning how many bytes were stored
    pub fn write_input(&mut self, bytes: &[u8]) -> Result<usize, CapacityError> {
        let stored = self.machine.load_input(bytes, self.config.oversize_writes)?;
        if stored < bytes.len() {
            warn!(requested = bytes.len(), stored, "input truncated to capacity");
        }
        trace!(stored, "input written");
        self.invalidate();
        Ok(stored)
    }

    /// Current output, running the machine first if it is stale
    pub fn read_output(&mut self) -> OutputView<'_> {
        let recomputed = self.is_dirty() || self.last_run.is_none();
        if recomputed {
            self.recompute();
        }

        let (outcome, ops_used) = match &self.last_run {
            Some(snapshot) => (snapshot.outcome, snapshot.ops_used),
            None => (RunOutcome::Completed, 0),
        };

        OutputView {
            bytes: self.machine.output(),
            outcome,
            ops_used,
            recomputed,
        }
    }

    pub fn read_program(&self) -> &[u8] {
        self.machine.program()
    }

    pub fn read_input(&self) -> &[u8] {
        self.machine.input()
    }

    /// Mark the cached output stale
    pub fn invalidate(&mut self) {
        self.cache = CacheState::Dirty;
    }

    pub fn is_dirty(&self) -> bool {
        self.cache == CacheState::Dirty
    }

    /// Number of runs this session has performed
    pub fn run_count(&self) -> u64 {
        self.runs
    }

    pub fn last_run(&self) -> Option<&RunSnapshot> {
        self.last_run.as_ref()
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    fn recompute(&mut self) {
        self.machine.reset();
        let budget = self.config.budget;
        let outcome = RunOutcome::from(self.machine.run(budget));
        self.runs += 1;

        let ops_used = self.machine.ops_used();
        let produced = self.machine.output().len();
        if outcome.is_failure() {
            warn!(run = self.runs, %outcome, ops_used, produced, "run stopped early");
        } else {
            debug!(run = self.runs, %outcome, ops_used, produced, "run finished");
        }

        self.last_run = Some(RunSnapshot::capture(&self.machine, outcome, budget, self.runs));
        self.cache = CacheState::Clean;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::from_validated(MachineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::Region;

    #[test]
    fn test_fresh_session_runs_once() {
        let mut session = Session::default();
        assert!(session.is_dirty());

        let view = session.read_output();
        assert!(view.recomputed);
        assert_eq!(view.bytes, b"");
        assert_eq!(view.outcome, RunOutcome::Completed);
        assert_eq!(session.run_count(), 1);
        assert!(!session.is_dirty());
    }

    #[test]
    fn test_invalidate_forces_rerun() {
        let mut session = Session::default();
        session.write_program(b"+.").unwrap();
        session.read_output();
        session.invalidate();
        assert!(session.read_output().recomputed);
        assert_eq!(session.run_count(), 2);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = MachineConfig::default().with_loop_depth(0);
        assert!(Session::new(config).is_err());
    }

    #[test]
    fn test_outcome_from_errors() {
        let outcome = RunOutcome::from(Err(ExecError::UnmatchedBracket { position: 4 }));
        assert_eq!(outcome, RunOutcome::UnmatchedBracket { position: 4 });
        assert!(outcome.is_failure());
        assert_eq!(outcome.to_string(), "unmatched bracket at offset 4");
        assert_eq!(outcome.failure_offset(), Some(4));
    }

    #[test]
    fn test_capacity_failure_has_no_offset() {
        let err = CapacityError::new(Region::LoopStack, 48, 49);
        let outcome = RunOutcome::from(Err(ExecError::Capacity(err)));
        assert!(outcome.is_failure());
        assert_eq!(outcome.failure_offset(), None);
        assert_eq!(RunOutcome::Completed.failure_offset(), None);
    }
}
