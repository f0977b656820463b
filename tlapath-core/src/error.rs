use crate::stream::StreamKind;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tlapath_diagnostics::codes;

/// Why a name did not produce a stream.
///
/// None of these are fatal: callers that only care about presence can
/// call `.ok()` on the result.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("'{name}' not found in library path (last tried {})", .last_candidate.display())]
    NotFound {
        name: String,
        last_candidate: PathBuf,
    },

    #[error("'{}' is a directory, not a file", .0.display())]
    NotAFile(PathBuf),

    #[error("Unable to create {kind} for '{}': {source}", .path.display())]
    Open {
        path: PathBuf,
        kind: StreamKind,
        #[source]
        source: io::Error,
    },
}

impl ResolveError {
    /// True for a name that matched nothing, as opposed to an I/O failure
    pub fn is_not_found(&self) -> bool {
        matches!(self, ResolveError::NotFound { .. })
    }

    /// The path the failure refers to
    pub fn path(&self) -> &Path {
        match self {
            ResolveError::NotFound { last_candidate, .. } => last_candidate,
            ResolveError::NotAFile(path) => path,
            ResolveError::Open { path, .. } => path,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ResolveError::NotFound { .. } => codes::MODULE_NOT_FOUND,
            ResolveError::NotAFile(_) => codes::NOT_A_FILE,
            ResolveError::Open { kind, .. } => kind.code(),
        }
    }
}

/// Failures while building a `ResolverConfig`
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Cannot determine the installation directory; set TLA_HOME")]
    InstallationBase,
}
