//! Error types for clawboot-restore.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from restore operations.
///
/// Nothing here is boot-fatal: the pipeline catches per category and
/// degrades to an unrestored state rather than refusing to start.
#[derive(Debug, Error)]
pub enum RestoreError {
    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience constructor for [`RestoreError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> RestoreError {
    RestoreError::Io {
        path: path.into(),
        source,
    }
}
