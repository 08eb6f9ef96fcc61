//! Gateway lifecycle edge of the bootstrap: running-guard, stale lock
//! cleanup, and the one-way process handoff.

pub mod error;
pub mod locks;
pub mod process;

pub use error::LauncherError;
pub use locks::clear_stale_locks;
pub use process::{gateway_args, gateway_running, launch, PidFile};
