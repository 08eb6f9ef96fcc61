//! Domain types for the clawboot reconciliation engine.
//!
//! All path fields use `PathBuf`; never `&str` or `String` for filesystem
//! paths. Everything here is serializable via serde so reports can be
//! emitted as JSON by `clawboot status --json`.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// An independently restorable unit of state.
///
/// Categories are reconciled in declaration order: configuration first
/// (it must exist before onboarding runs), then workspace, then skills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Config,
    Workspace,
    Skills,
}

impl Category {
    /// All categories, in restore order.
    pub fn all() -> &'static [Category] {
        &[Category::Config, Category::Workspace, Category::Skills]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Config => write!(f, "config"),
            Category::Workspace => write!(f, "workspace"),
            Category::Skills => write!(f, "skills"),
        }
    }
}

// ---------------------------------------------------------------------------
// BackupLayout
// ---------------------------------------------------------------------------

/// Which historical on-disk shape the remote backup root has for a category.
///
/// Derived fresh on every boot by probing in fixed precedence
/// (current > legacy-nested > legacy-flat > absent); never persisted.
/// New layout generations get a new variant here and a new probe in the
/// resolver; restoration logic never branches on layout history itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackupLayout {
    /// The layout written by current producers.
    Current,
    /// A historical producer nested the tree one level too deep.
    LegacyNested,
    /// The oldest producers wrote category data directly at the root.
    LegacyFlat,
    /// No recognizable data for this category at any known location.
    Absent,
}

impl fmt::Display for BackupLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackupLayout::Current => write!(f, "current"),
            BackupLayout::LegacyNested => write!(f, "legacy-nested"),
            BackupLayout::LegacyFlat => write!(f, "legacy-flat"),
            BackupLayout::Absent => write!(f, "absent"),
        }
    }
}

// ---------------------------------------------------------------------------
// RestoreDecision
// ---------------------------------------------------------------------------

/// Transient restore-vs-skip verdict for one category. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RestoreDecision {
    Restore,
    Skip,
}

impl fmt::Display for RestoreDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestoreDecision::Restore => write!(f, "restore"),
            RestoreDecision::Skip => write!(f, "skip"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
