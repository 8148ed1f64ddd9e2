use std::fs::File;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum VolumeError {
    #[error("volume mount missing: {path}")]
    Missing { path: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Process-external durable storage mounted at a fixed path.
///
/// Writes under [`Volume::root`] only become durable once [`Volume::commit`]
/// returns — a crash before the commit may lose or truncate them. That gap is
/// accepted, not mitigated.
pub trait Volume: Send + Sync {
    /// Mount point; all snapshot paths are derived from it.
    fn root(&self) -> &Path;

    /// Make `written` (and its directory entry) durable.
    fn commit(&self, written: &Path) -> Result<(), VolumeError>;
}

/// Volume backed by a plain local directory; commit is fsync of the written
/// file and its parent directory.
#[derive(Debug)]
pub struct DirVolume {
    root: PathBuf,
}

impl DirVolume {
    /// Mount the volume, creating the directory when `create_if_missing`.
    pub fn open(path: impl Into<PathBuf>, create_if_missing: bool) -> Result<Self, VolumeError> {
        let root: PathBuf = path.into();
        if !root.is_dir() {
            if !create_if_missing {
                return Err(VolumeError::Missing {
                    path: root.display().to_string(),
                });
            }
            std::fs::create_dir_all(&root)?;
        }
        debug!(root = %root.display(), "volume mounted");
        Ok(Self { root })
    }
}

impl Volume for DirVolume {
    fn root(&self) -> &Path {
        &self.root
    }

    fn commit(&self, written: &Path) -> Result<(), VolumeError> {
        File::open(written)?.sync_all()?;
        if let Some(parent) = written.parent() {
            // Directory fsync makes the new entry itself durable.
            File::open(parent)?.sync_all()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_creates_mount_when_allowed() {
        let base = tempfile::tempdir().unwrap();
        let mount = base.path().join("kb");
        let vol = DirVolume::open(&mount, true).unwrap();
        assert!(mount.is_dir());
        assert_eq!(vol.root(), mount);
    }

    #[test]
    fn open_refuses_missing_mount() {
        let base = tempfile::tempdir().unwrap();
        let mount = base.path().join("absent");
        let err = DirVolume::open(&mount, false).unwrap_err();
        assert!(matches!(err, VolumeError::Missing { .. }));
    }

    #[test]
    fn commit_syncs_written_file() {
        let base = tempfile::tempdir().unwrap();
        let vol = DirVolume::open(base.path(), false).unwrap();
        let file = base.path().join("snap.txt");
        std::fs::write(&file, "content").unwrap();
        vol.commit(&file).unwrap();
    }

    #[test]
    fn commit_fails_for_missing_file() {
        let base = tempfile::tempdir().unwrap();
        let vol = DirVolume::open(base.path(), false).unwrap();
        assert!(vol.commit(&base.path().join("nope.txt")).is_err());
    }
}
