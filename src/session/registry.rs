//! Independent sessions keyed by caller.
//!
//! Callers that must not observe each other's programs each get their own
//! [`Session`], created on first use and dropped on release.

use super::resource::{Resource, ResourceError};
use super::Session;
use crate::config::{ConfigError, MachineConfig};
use rustc_hash::FxHashMap;
use tracing::debug;

/// Identifies one caller of the registry
pub type CallerId = u64;

#[derive(Debug)]
pub struct SessionRegistry {
    config: MachineConfig,
    sessions: FxHashMap<CallerId, Session>,
}

impl SessionRegistry {
    /// Every session the registry creates uses `config`
    pub fn new(config: MachineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(SessionRegistry {
            config,
            sessions: FxHashMap::default(),
        })
    }

    /// The caller's session, created if this is its first use
    pub fn session(&mut self, caller: CallerId) -> &mut Session {
        let config = &self.config;
        self.sessions.entry(caller).or_insert_with(|| {
            debug!(caller, "session created");
            Session::from_validated(config.clone())
        })
    }

    pub fn get(&self, caller: CallerId) -> Option<&Session> {
        self.sessions.get(&caller)
    }

    pub fn read(&mut self, caller: CallerId, resource: Resource) -> Vec<u8> {
        self.session(caller).read_resource(resource).to_vec()
    }

    pub fn write(
        &mut self,
        caller: CallerId,
        resource: Resource,
        bytes: &[u8],
    ) -> Result<usize, ResourceError> {
        self.session(caller).write_resource(resource, bytes)
    }

    /// Drop the caller's session, returning it if it existed
    pub fn release(&mut self, caller: CallerId) -> Option<Session> {
        let released = self.sessions.remove(&caller);
        if released.is_some() {
            debug!(caller, "session released");
        }
        released
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        SessionRegistry {
            config: MachineConfig::default(),
            sessions: FxHashMap::default(),
        }
    }
}
