//! node_modules discovery.
//!
//! Yarn workspaces give every workspace its own `node_modules`, so the scan
//! collects each one under the root. A match is never descended into:
//! packages inside `node_modules` carry their own nested `node_modules`
//! which are already covered by the outer directory.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{Result, StepError};

/// Name of yarn's dependency folder.
pub const DEPENDENCY_DIR: &str = "node_modules";

/// Find every directory named `name` under `root`, without descending into
/// matches. Siblings are visited in file-name order; symlinks are not
/// followed. Any traversal error aborts the scan.
pub fn find_dirs_named(root: &Path, name: &str) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    let mut walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter();

    while let Some(entry) = walker.next() {
        let entry = entry.map_err(|e| StepError::Scan {
            root: root.to_path_buf(),
            message: e.to_string(),
        })?;

        if entry.file_type().is_dir() && entry.file_name() == name {
            found.push(entry.into_path());
            walker.skip_current_dir();
        }
    }

    Ok(found)
}

/// Find every `node_modules` directory under `root`.
pub fn find_dependency_dirs(root: &Path) -> Result<Vec<PathBuf>> {
    find_dirs_named(root, DEPENDENCY_DIR)
}
