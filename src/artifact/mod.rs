//! Artifact locations and per-loader failure policies
//!
//! Each loader declares how it reacts when its file is absent or broken:
//! - `PROJECT.yaml` during bulk enumeration: skip the directory
//! - `JOURNAL.md`: absent file means an empty journal
//! - `CONTRIBUTORS.yaml`, `REGISTRY.md`, a single explicit `PROJECT.yaml`: hard failure

use std::fs;
use std::path::Path;

use crate::error::{CollabError, Result};

pub const PROJECTS_DIR: &str = "projects";
pub const PROJECT_FILE: &str = "PROJECT.yaml";
pub const CONTRIBUTORS_FILE: &str = "CONTRIBUTORS.yaml";
pub const JOURNAL_FILE: &str = "JOURNAL.md";
pub const REGISTRY_FILE: &str = "REGISTRY.md";
pub const CONTRIBUTING_FILE: &str = "CONTRIBUTING.md";

/// How a loader treats a missing or malformed artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Missing or malformed input is an engine failure
    Required,
    /// A missing file yields an empty record
    Optional,
    /// Any failure drops the item from a bulk listing
    Skip,
}

/// Declared policy for one artifact kind
#[derive(Debug, Clone, Copy)]
pub struct ArtifactKind {
    pub file_name: &'static str,
    pub policy: FailurePolicy,
}

pub const PROJECT: ArtifactKind = ArtifactKind {
    file_name: PROJECT_FILE,
    policy: FailurePolicy::Required,
};

pub const PROJECT_IN_LISTING: ArtifactKind = ArtifactKind {
    file_name: PROJECT_FILE,
    policy: FailurePolicy::Skip,
};

pub const CONTRIBUTORS: ArtifactKind = ArtifactKind {
    file_name: CONTRIBUTORS_FILE,
    policy: FailurePolicy::Required,
};

pub const JOURNAL: ArtifactKind = ArtifactKind {
    file_name: JOURNAL_FILE,
    policy: FailurePolicy::Optional,
};

pub const REGISTRY: ArtifactKind = ArtifactKind {
    file_name: REGISTRY_FILE,
    policy: FailurePolicy::Required,
};

impl ArtifactKind {
    /// Read the artifact from `dir`.
    ///
    /// Returns `Ok(None)` only for an absent file under [`FailurePolicy::Optional`].
    /// Under [`FailurePolicy::Skip`] the error is still returned; the bulk
    /// caller decides to drop the item.
    pub fn read(&self, dir: &Path) -> Result<Option<String>> {
        let path = dir.join(self.file_name);
        if !path.is_file() {
            return match self.policy {
                FailurePolicy::Optional => Ok(None),
                FailurePolicy::Required | FailurePolicy::Skip => Err(CollabError::MissingArtifact {
                    file: self.file_name.to_string(),
                    dir: dir.to_path_buf(),
                }),
            };
        }
        fs::read_to_string(&path)
            .map(Some)
            .map_err(|source| CollabError::Io { path, source })
    }

    /// Read and deserialize a YAML artifact. An empty document yields `T::default()`.
    pub fn read_yaml<T>(&self, dir: &Path) -> Result<Option<T>>
    where
        T: serde::de::DeserializeOwned + Default,
    {
        let Some(raw) = self.read(dir)? else {
            return Ok(None);
        };
        if raw.trim().is_empty() {
            return Ok(Some(T::default()));
        }
        let parsed: Option<T> =
            serde_yaml::from_str(&raw).map_err(|source| CollabError::Parse {
                file: self.file_name.to_string(),
                dir: dir.to_path_buf(),
                source,
            })?;
        Ok(Some(parsed.unwrap_or_default()))
    }

    pub fn skips_on_failure(&self) -> bool {
        self.policy == FailurePolicy::Skip
    }
}
