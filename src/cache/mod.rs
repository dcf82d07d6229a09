//! node_modules caching.
//!
//! This module finds the dependency folders of a project (including every
//! workspace's own folder) and marks them for the CI cache.

pub mod commit;
pub mod scanner;

pub use commit::{CacheCommitter, EnvmanCache, CACHE_INCLUDE_PATHS_ENV};
pub use scanner::{find_dependency_dirs, find_dirs_named, DEPENDENCY_DIR};

use std::path::{Path, PathBuf};

use crate::error::Result;

/// Scan `root` for node_modules directories and commit them to the cache.
///
/// Nothing is committed when the scan fails. Returns the committed paths.
pub fn cache_dependencies(root: &Path, committer: &dyn CacheCommitter) -> Result<Vec<PathBuf>> {
    let paths = find_dependency_dirs(root)?;
    tracing::debug!("Cached paths: {:?}", paths);
    committer.commit(&paths)?;
    Ok(paths)
}
