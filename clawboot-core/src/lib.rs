//! clawboot core library — domain types, well-known paths, errors.
//!
//! Public API surface:
//! - [`types`] — [`Category`], [`BackupLayout`], [`RestoreDecision`]
//! - [`paths`] — [`BootRoots`] and the backup/state layout constants
//! - [`error`] — [`CoreError`]

pub mod error;
pub mod paths;
pub mod types;

pub use error::CoreError;
pub use paths::BootRoots;
pub use types::{BackupLayout, Category, RestoreDecision};
