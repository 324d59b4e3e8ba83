//! Repository discovery.

use std::path::{Path, PathBuf};

use crate::git::GitRepo;
use crate::store::StoreError;

/// Open the repository containing `path`, or the current directory.
pub fn discover(path: Option<&Path>) -> Result<GitRepo, StoreError> {
    GitRepo::discover(path.unwrap_or_else(|| Path::new(".")))
}

/// Working directory of the repository containing `path`, if there is one.
///
/// Used to find `.tigs.toml` before any command runs; a missing repository
/// is reported later by the command itself.
pub fn workdir(path: Option<&Path>) -> Option<PathBuf> {
    let repo = discover(path).ok()?;
    repo.workdir().map(Path::to_path_buf)
}
