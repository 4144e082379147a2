//! Engine failures raised while reading blackboard artifacts

use std::path::PathBuf;

/// Failures that stop a single load. Data-quality findings are never
/// reported through this type, see [`crate::models::Violation`].
#[derive(Debug, thiserror::Error)]
pub enum CollabError {
    #[error("{file} not found in {}", dir.display())]
    MissingArtifact { file: String, dir: PathBuf },

    #[error("Failed to parse {file} in {}: {source}", dir.display())]
    Parse {
        file: String,
        dir: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CollabError {
    pub fn is_missing(&self) -> bool {
        matches!(self, CollabError::MissingArtifact { .. })
    }
}

pub type Result<T, E = CollabError> = std::result::Result<T, E>;
