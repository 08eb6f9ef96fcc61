//! The configuration document.
//!
//! One JSON document at `{state}/openclaw.json`, read and written whole
//! (read-modify-write, single writer during bootstrap). A missing or
//! unparseable file degrades to a fresh empty document; config parse
//! failures never stop the boot.
//!
//! Saves use the same atomic flow as every other persisted file here:
//! serialize → `.tmp` sibling → chmod 0600 → rename.

use std::path::Path;

use serde_json::{Map, Value};

use crate::error::{io_err, ConfigError};

/// In-memory configuration document. Always a JSON object at the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    root: Value,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Fresh empty document.
    pub fn new() -> Self {
        Self {
            root: Value::Object(Map::new()),
        }
    }

    /// Wrap an existing value. Non-object roots are replaced by an empty
    /// object (the document contract is "nested key/value record").
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(_) => Self { root: value },
            other => {
                tracing::warn!(found = %json_kind(&other), "config root is not an object, starting fresh");
                Self::new()
            }
        }
    }

    /// Load from `path`. Absent file → fresh document. Malformed JSON →
    /// fresh document with a warning (local state treated as empty).
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::new());
            }
            Err(err) => return Err(io_err(path, err)),
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Self::from_value(value)),
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "config document unparseable, starting fresh",
                );
                Ok(Self::new())
            }
        }
    }

    /// Atomically write the document to `path`, fully overwriting.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
        }
        let json = serde_json::to_string_pretty(&self.root)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, format!("{json}\n")).map_err(|e| io_err(&tmp, e))?;
        set_file_permissions(&tmp)?;
        std::fs::rename(&tmp, path).map_err(|e| io_err(path, e))?;
        Ok(())
    }

    /// Borrow the raw value (for diff rendering and assertions).
    pub fn as_value(&self) -> &Value {
        &self.root
    }

    /// Read a nested value by key path.
    pub fn get(&self, path: &[&str]) -> Option<&Value> {
        let mut current = &self.root;
        for key in path {
            current = current.as_object()?.get(*key)?;
        }
        Some(current)
    }

    /// Set a nested value, creating intermediate objects as needed. A
    /// non-object on the way is replaced; the patcher owns these paths.
    pub fn set(&mut self, path: &[&str], value: Value) {
        let Some((last, parents)) = path.split_last() else {
            return;
        };
        let Some(mut current) = self.root.as_object_mut() else {
            return; // root is an object by construction
        };
        for key in parents {
            let entry = current
                .entry(key.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            current = match entry.as_object_mut() {
                Some(map) => map,
                None => return,
            };
        }
        current.insert(last.to_string(), value);
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(unix)]
fn set_file_permissions(path: &Path) -> Result<(), ConfigError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .map_err(|e| io_err(path, e))
}
#[cfg(not(unix))]
fn set_file_permissions(_path: &Path) -> Result<(), ConfigError> {
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
