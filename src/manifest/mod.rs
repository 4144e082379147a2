//! Loaders for `PROJECT.yaml` and `CONTRIBUTORS.yaml`

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::artifact::{self, PROJECTS_DIR};
use crate::error::{CollabError, Result};
use crate::models::{Contributors, LoadedProject, Project};

/// Load the manifest of a single project directory.
///
/// Missing required fields are not an error here; see
/// [`crate::validation`].
pub fn load_project(project_dir: &Path) -> Result<Project> {
    read_manifest(project_dir, artifact::PROJECT)
}

/// Load every project under `<root>/projects`, sorted by directory name.
///
/// Directories without a readable, parseable manifest are skipped.
pub fn load_all_projects(root: &Path) -> Result<Vec<LoadedProject>> {
    let projects_dir = root.join(PROJECTS_DIR);
    if !projects_dir.is_dir() {
        return Ok(Vec::new());
    }

    let listing = fs::read_dir(&projects_dir).map_err(|source| CollabError::Io {
        path: projects_dir.clone(),
        source,
    })?;

    let mut dir_names: Vec<String> = listing
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .filter_map(|entry| entry.file_name().into_string().ok())
        .collect();
    dir_names.sort();

    let kind = artifact::PROJECT_IN_LISTING;
    let mut loaded = Vec::with_capacity(dir_names.len());
    for dir_name in dir_names {
        match read_manifest(&projects_dir.join(&dir_name), kind) {
            Ok(project) => loaded.push(LoadedProject { dir_name, project }),
            Err(e) if kind.skips_on_failure() => {
                debug!(project = %dir_name, error = %e, "skipping project directory");
            }
            Err(e) => return Err(e),
        }
    }
    Ok(loaded)
}

/// Load the root contributor roster
pub fn load_contributors(root: &Path) -> Result<Contributors> {
    let kind = artifact::CONTRIBUTORS;
    kind.read_yaml(root)?.ok_or_else(|| CollabError::MissingArtifact {
        file: kind.file_name.to_string(),
        dir: root.to_path_buf(),
    })
}

fn read_manifest(project_dir: &Path, kind: artifact::ArtifactKind) -> Result<Project> {
    kind.read_yaml(project_dir)?
        .ok_or_else(|| CollabError::MissingArtifact {
            file: kind.file_name.to_string(),
            dir: project_dir.to_path_buf(),
        })
}
