//! Error types for clawboot-core.

use thiserror::Error;

/// All errors that can arise from core path resolution.
#[derive(Debug, Error)]
pub enum CoreError {
    /// `dirs::home_dir()` returned `None` — cannot derive `~/.openclaw`.
    #[error("cannot determine home directory; set $HOME or $CLAWBOOT_STATE_DIR")]
    HomeNotFound,
}
