use thiserror::Error;

/// The step of the snapshot operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Creating the output directory under the volume mount.
    Directory,
    /// The ingestion call (network + write of the digest).
    Fetch,
    /// The volume durability commit.
    Commit,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::Directory => "directory",
            Stage::Fetch => "fetch",
            Stage::Commit => "commit",
        };
        write!(f, "{s}")
    }
}

/// The single error kind a snapshot invocation surfaces.
///
/// Carries the original failure message as context plus the stage it came
/// from, so callers can branch without string matching.
#[derive(Debug, Error)]
#[error("snapshot failed during {stage}: {message}")]
pub struct SnapshotError {
    pub stage: Stage,
    pub message: String,
}

impl SnapshotError {
    pub fn new(stage: Stage, err: impl std::fmt::Display) -> Self {
        Self {
            stage,
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SnapshotError>;
