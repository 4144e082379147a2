//! Blackboard root discovery
//!
//! A blackboard root is a directory holding both `CONTRIBUTING.md` and a
//! `projects/` directory.

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

use crate::artifact::{CONTRIBUTING_FILE, PROJECTS_DIR};
use crate::config::{Config, ROOT_ENV_VAR};

pub fn is_blackboard_root(dir: &Path) -> bool {
    dir.join(CONTRIBUTING_FILE).is_file() && dir.join(PROJECTS_DIR).is_dir()
}

/// Walk up from `start` to the nearest blackboard root
pub fn find_blackboard_root(start: &Path) -> Option<PathBuf> {
    let start = start.canonicalize().unwrap_or_else(|_| start.to_path_buf());
    start
        .ancestors()
        .find(|dir| is_blackboard_root(dir))
        .map(Path::to_path_buf)
}

/// Pick the root to operate on.
///
/// Precedence: explicit flag, then `PAI_COLLAB_ROOT`, then config `root`,
/// then a walk up from the current directory.
pub fn resolve_root(explicit: Option<&Path>, config: &Config) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    if let Some(path) = std::env::var_os(ROOT_ENV_VAR).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    if let Some(path) = &config.root {
        return Ok(path.clone());
    }

    let cwd = std::env::current_dir().context("Could not determine current directory")?;
    match find_blackboard_root(&cwd) {
        Some(root) => Ok(root),
        None => bail!(
            "Not inside a pai-collab blackboard.\n\n\
             Could not find a directory containing {} and {}/.\n\
             Make sure you're inside a pai-collab repo, or set {}.",
            CONTRIBUTING_FILE,
            PROJECTS_DIR,
            ROOT_ENV_VAR
        ),
    }
}
