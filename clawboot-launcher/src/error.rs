//! Error types for clawboot-launcher.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from lock cleanup and the gateway process handoff.
#[derive(Debug, Error)]
pub enum LauncherError {
    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Pid sidecar JSON error.
    #[error("pid file JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The gateway binary could not be started.
    #[error("failed to spawn gateway '{bin}': {source}")]
    Spawn {
        bin: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience constructor for [`LauncherError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> LauncherError {
    LauncherError::Io {
        path: path.into(),
        source,
    }
}
