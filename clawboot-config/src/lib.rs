//! # clawboot-config
//!
//! The configuration document and its environment patch: atomic
//! load/save, the [`PatchEnv`] variable snapshot, the patch rules, and a
//! unified-diff preview for dry runs.

pub mod document;
pub mod env;
pub mod error;
pub mod patcher;
pub mod preview;

pub use document::Document;
pub use env::PatchEnv;
pub use error::ConfigError;
pub use patcher::{patch, GATEWAY_PORT};
pub use preview::preview;
