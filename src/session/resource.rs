//! Host-facing resources
//!
//! A host exposes a session as a small directory of three entries:
//!
//! | entry    | mode   | read              | write           |
//! |----------|--------|-------------------|-----------------|
//! | `code`   | `0666` | raw program bytes | replace program |
//! | `input`  | `0666` | raw input bytes   | replace input   |
//! | `output` | `0444` | run if stale      | rejected        |
//!
//! [`ResourceDir`] registers those entries under a directory name and routes
//! reads and writes to a [`SharedSession`].

use super::shared::SharedSession;
use super::Session;
use crate::memory::CapacityError;
use rustc_hash::FxHashMap;
use std::fmt;
use std::io::{self, Read};
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info};

/// Directory name used when none is given
pub const DEFAULT_DIR: &str = "brainfuck";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Program,
    Input,
    Output,
}

impl Resource {
    pub const ALL: [Resource; 3] = [Resource::Program, Resource::Input, Resource::Output];

    /// Entry name inside the resource directory
    pub fn name(self) -> &'static str {
        match self {
            Resource::Program => "code",
            Resource::Input => "input",
            Resource::Output => "output",
        }
    }

    pub fn mode(self) -> Mode {
        match self {
            Resource::Program | Resource::Input => Mode::READ_WRITE,
            Resource::Output => Mode::READ_ONLY,
        }
    }

    pub fn is_writable(self) -> bool {
        self.mode().is_writable()
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Resource::ALL.into_iter().find(|r| r.name() == name)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Resource {
    type Err = ResourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Resource::from_name(s).ok_or_else(|| ResourceError::UnknownResource(s.to_string()))
    }
}

/// Unix-style permission bits of an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Mode(pub u16);

impl Mode {
    pub const READ_WRITE: Mode = Mode(0o666);
    pub const READ_ONLY: Mode = Mode(0o444);

    pub fn is_writable(self) -> bool {
        self.0 & 0o222 != 0
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04o}", self.0)
    }
}

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("no such resource: {0}")]
    UnknownResource(String),

    #[error("{0} is read-only")]
    ReadOnly(Resource),

    /// Copying the caller's bytes failed before anything was stored
    #[error("transfer into {resource} failed: {source}")]
    Transfer {
        resource: Resource,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Capacity(#[from] CapacityError),
}

impl Session {
    /// Read a resource. Reading [`Resource::Output`] runs the machine if stale.
    pub fn read_resource(&mut self, resource: Resource) -> &[u8] {
        match resource {
            Resource::Program => self.read_program(),
            Resource::Input => self.read_input(),
            Resource::Output => self.read_output().bytes,
        }
    }

    /// Write a resource, returning how many bytes were stored
    pub fn write_resource(
        &mut self,
        resource: Resource,
        bytes: &[u8],
    ) -> Result<usize, ResourceError> {
        match resource {
            Resource::Program => Ok(self.write_program(bytes)?),
            Resource::Input => Ok(self.write_input(bytes)?),
            Resource::Output => Err(ResourceError::ReadOnly(resource)),
        }
    }
}

/// The three entries of one session, registered under a directory name
#[derive(Debug)]
pub struct ResourceDir {
    name: String,
    session: SharedSession,
    entries: FxHashMap<String, Resource>,
}

impl ResourceDir {
    /// Register `code`, `input` and `output` under `name`
    pub fn mount(name: impl Into<String>, session: SharedSession) -> Self {
        let name = name.into();
        let mut entries = FxHashMap::default();
        info!(dir = %name, "resource directory created");

        for resource in Resource::ALL {
            let path = format!("{}/{}", name, resource.name());
            info!(%path, mode = %resource.mode(), "entry created");
            entries.insert(resource.name().to_string(), resource);
        }

        ResourceDir {
            name,
            session,
            entries,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn session(&self) -> &SharedSession {
        &self.session
    }

    /// Resolve `"<dir>/<entry>"` or a bare `"<entry>"`
    pub fn lookup(&self, path: &str) -> Result<Resource, ResourceError> {
        let entry = match path.split_once('/') {
            Some((dir, entry)) if dir == self.name => entry,
            Some(_) => return Err(ResourceError::UnknownResource(path.to_string())),
            None => path,
        };
        self.entries
            .get(entry)
            .copied()
            .ok_or_else(|| ResourceError::UnknownResource(path.to_string()))
    }

    /// Full paths and modes of every entry, sorted by path
    pub fn entries(&self) -> Vec<(String, Mode)> {
        let mut listed: Vec<(String, Mode)> = self
            .entries
            .iter()
            .map(|(entry, resource)| (format!("{}/{}", self.name, entry), resource.mode()))
            .collect();
        listed.sort();
        listed
    }

    pub fn read(&self, path: &str) -> Result<Vec<u8>, ResourceError> {
        let resource = self.lookup(path)?;
        Ok(self.session.read(resource))
    }

    pub fn write(&self, path: &str, bytes: &[u8]) -> Result<usize, ResourceError> {
        let resource = self.lookup(path)?;
        self.session.write(resource, bytes)
    }

    /// Copy everything `reader` yields into a resource.
    ///
    /// The bytes are staged first; if the copy fails the resource and the
    /// session's cache state are left untouched.
    pub fn write_from<R: Read>(&self, path: &str, mut reader: R) -> Result<usize, ResourceError> {
        let resource = self.lookup(path)?;
        if !resource.is_writable() {
            return Err(ResourceError::ReadOnly(resource));
        }

        let mut staged = Vec::new();
        reader
            .read_to_end(&mut staged)
            .map_err(|source| ResourceError::Transfer { resource, source })?;
        debug!(%resource, len = staged.len(), "transfer staged");

        self.session.write(resource, &staged)
    }

    /// Remove every entry and the directory itself
    pub fn unmount(mut self) {
        self.remove_entries();
    }

    fn remove_entries(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        let mut names: Vec<String> = self.entries.drain().map(|(entry, _)| entry).collect();
        names.sort();
        for entry in names {
            info!(path = %format!("{}/{}", self.name, entry), "entry removed");
        }
        info!(dir = %self.name, "resource directory removed");
    }
}

impl Drop for ResourceDir {
    fn drop(&mut self) {
        self.remove_entries();
    }
}
