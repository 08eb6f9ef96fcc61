//! Recursive additive copy and tree digesting.
//!
//! Restoration is an overwrite-copy, never a mirror-delete: files present
//! locally but absent from the backup survive. Copied files keep their
//! source mtime so marker comparisons on later boots stay meaningful.

use std::path::Path;

use filetime::FileTime;
use sha2::{Digest, Sha256};

use crate::error::{io_err, RestoreError};

/// Recursively copy `src` into `dst`, overwriting files that exist on both
/// sides and leaving extra local files in place. Returns the number of
/// files copied.
pub fn copy_tree(src: &Path, dst: &Path) -> Result<u64, RestoreError> {
    copy_tree_filtered(src, dst, &[])
}

/// [`copy_tree`] with `skip`: top-level entry names excluded from the copy.
/// Used for the flat legacy config layout, where the backup root doubles
/// as the config tree and sibling category directories must stay out.
pub fn copy_tree_filtered(src: &Path, dst: &Path, skip: &[&str]) -> Result<u64, RestoreError> {
    std::fs::create_dir_all(dst).map_err(|e| io_err(dst, e))?;

    let mut entries: Vec<_> = std::fs::read_dir(src)
        .map_err(|e| io_err(src, e))?
        .collect::<Result<_, _>>()
        .map_err(|e| io_err(src, e))?;
    entries.sort_by_key(|e| e.file_name());

    let mut copied = 0;
    for entry in entries {
        let name = entry.file_name();
        if skip.iter().any(|s| name.as_os_str() == *s) {
            tracing::debug!(entry = %name.to_string_lossy(), "skipping excluded top-level entry");
            continue;
        }
        copied += copy_entry(&entry.path(), &dst.join(&name))?;
    }
    Ok(copied)
}

fn copy_entry(src: &Path, dst: &Path) -> Result<u64, RestoreError> {
    let meta = std::fs::metadata(src).map_err(|e| io_err(src, e))?;
    if meta.is_dir() {
        std::fs::create_dir_all(dst).map_err(|e| io_err(dst, e))?;
        let mut entries: Vec<_> = std::fs::read_dir(src)
            .map_err(|e| io_err(src, e))?
            .collect::<Result<_, _>>()
            .map_err(|e| io_err(src, e))?;
        entries.sort_by_key(|e| e.file_name());

        let mut copied = 0;
        for entry in entries {
            copied += copy_entry(&entry.path(), &dst.join(entry.file_name()))?;
        }
        return Ok(copied);
    }

    // fs::copy preserves contents and permissions; mtime is carried over
    // explicitly so a restored tree does not look freshly written.
    std::fs::copy(src, dst).map_err(|e| io_err(src, e))?;
    let mtime = FileTime::from_last_modification_time(&meta);
    filetime::set_file_mtime(dst, mtime).map_err(|e| io_err(dst, e))?;
    Ok(1)
}

/// SHA-256 digest over a tree's relative paths and file contents, in sorted
/// order. Two trees with identical content produce identical digests; a
/// missing root digests the same as an empty one.
pub fn tree_digest(root: &Path) -> Result<String, RestoreError> {
    let mut hasher = Sha256::new();
    digest_dir(root, Path::new(""), &mut hasher)?;
    Ok(hex::encode(hasher.finalize()))
}

fn digest_dir(root: &Path, relative: &Path, hasher: &mut Sha256) -> Result<(), RestoreError> {
    let dir = root.join(relative);
    let mut entries: Vec<_> = match std::fs::read_dir(&dir) {
        Ok(entries) => entries
            .collect::<Result<_, _>>()
            .map_err(|e| io_err(&dir, e))?,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(err) => return Err(io_err(&dir, err)),
    };
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let rel = relative.join(entry.file_name());
        let path = entry.path();
        let meta = std::fs::metadata(&path).map_err(|e| io_err(&path, e))?;
        hasher.update(rel.to_string_lossy().as_bytes());
        hasher.update([0u8]);
        if meta.is_dir() {
            digest_dir(root, &rel, hasher)?;
        } else {
            let contents = std::fs::read(&path).map_err(|e| io_err(&path, e))?;
            hasher.update(&contents);
            hasher.update([0u8]);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
