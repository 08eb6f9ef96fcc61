//! # clawboot-restore
//!
//! Backup/restore reconciliation engine: layout resolution, marker-clock
//! decisions, per-category restoration, and workspace mirroring.
//!
//! Call [`pipeline::run`] to reconcile a scope, or [`pipeline::plan`] for
//! the read-only view `clawboot status` renders.

pub mod copy;
pub mod error;
pub mod layout;
pub mod mirror;
pub mod pipeline;
pub mod restore;
pub mod sync_clock;

pub use error::RestoreError;
pub use layout::ResolvedBackup;
pub use mirror::MirrorOutcome;
pub use pipeline::{BootstrapReport, CategoryPlan, CategoryReport, RestoreScope};
pub use restore::{RestoreOutcome, Verdict};
