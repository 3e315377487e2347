//! A session shared between callers.
//!
//! Every operation takes the lock for its whole duration, including any run
//! an output read triggers, so a write can never interleave with a run.

use super::resource::{Resource, ResourceError};
use super::{RunOutcome, Session};
use crate::config::{ConfigError, MachineConfig};
use parking_lot::Mutex;
use std::sync::Arc;

/// Output copied out of the session, with how its run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputReport {
    pub bytes: Vec<u8>,
    pub outcome: RunOutcome,
    pub ops_used: usize,
    pub recomputed: bool,
}

/// Clonable, thread-safe handle to one [`Session`]
#[derive(Debug, Clone, Default)]
pub struct SharedSession {
    inner: Arc<Mutex<Session>>,
}

impl SharedSession {
    pub fn new(config: MachineConfig) -> Result<Self, ConfigError> {
        Ok(Self::from_session(Session::new(config)?))
    }

    pub fn from_session(session: Session) -> Self {
        SharedSession {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    pub fn read(&self, resource: Resource) -> Vec<u8> {
        self.inner.lock().read_resource(resource).to_vec()
    }

    pub fn write(&self, resource: Resource, bytes: &[u8]) -> Result<usize, ResourceError> {
        self.inner.lock().write_resource(resource, bytes)
    }

    /// Read the output together with its run outcome
    pub fn read_output(&self) -> OutputReport {
        let mut session = self.inner.lock();
        let view = session.read_output();
        OutputReport {
            bytes: view.bytes.to_vec(),
            outcome: view.outcome,
            ops_used: view.ops_used,
            recomputed: view.recomputed,
        }
    }

    /// Run `f` with exclusive access to the session
    pub fn with<T>(&self, f: impl FnOnce(&mut Session) -> T) -> T {
        f(&mut self.inner.lock())
    }
}
