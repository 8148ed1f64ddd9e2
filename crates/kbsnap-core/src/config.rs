use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_VOLUME_PATH: &str = "/data";
pub const DEFAULT_SUBDIR: &str = "recharts_docs";
pub const DEFAULT_FILE_PREFIX: &str = "recharts";
pub const DEFAULT_SOURCE_URL: &str = "https://github.com/recharts/recharts/tree/3.x/storybook";
pub const DEFAULT_BRANCH: &str = "3.x";
pub const MAX_CONTENT_BYTES: u64 = 100 * 1024 * 1024; // 100 MiB hard cap per snapshot

/// Top-level config (kbsnap.toml + KBSNAP_* env overrides).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct KbsnapConfig {
    #[serde(default)]
    pub volume: VolumeConfig,
    #[serde(default)]
    pub snapshot: SnapshotConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub history: HistoryConfig,
}

/// Persistent volume mount settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumeConfig {
    /// Mount point of the persistent volume.
    #[serde(default = "default_volume_path")]
    pub path: String,
    /// Create the mount directory when it does not exist yet.
    #[serde(default = "bool_true")]
    pub create_if_missing: bool,
}

impl Default for VolumeConfig {
    fn default() -> Self {
        Self {
            path: default_volume_path(),
            create_if_missing: true,
        }
    }
}

/// Snapshot job settings — source, naming and the size cap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotConfig {
    /// Subdirectory under the volume mount holding the dated files.
    #[serde(default = "default_subdir")]
    pub subdir: String,
    /// Filename prefix: `<prefix>_<YYYY-MM-DD>.txt`. Downstream consumers
    /// key off this naming scheme — change with care.
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
    /// Source repository locator passed to the ingestor.
    #[serde(default = "default_source_url")]
    pub source_url: String,
    /// Branch / ref to fetch when the locator does not pin one.
    #[serde(default = "default_branch")]
    pub branch: String,
    /// Maximum bytes per ingested file and for the whole digest.
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            subdir: default_subdir(),
            file_prefix: default_file_prefix(),
            source_url: default_source_url(),
            branch: default_branch(),
            max_file_size: default_max_file_size(),
        }
    }
}

/// Recurrence settings. `every_days = 3, hour = 4, minute = 0` reproduces
/// the original cron string `0 4 */3 * *` (times are UTC).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_every_days")]
    pub every_days: u8,
    #[serde(default = "default_hour")]
    pub hour: u8,
    #[serde(default)]
    pub minute: u8,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            every_days: default_every_days(),
            hour: default_hour(),
            minute: 0,
        }
    }
}

/// Run-history database settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// SQLite file recording one row per invocation. Lives on the volume by
    /// default so history survives alongside the snapshots.
    #[serde(default = "default_history_path")]
    pub path: String,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            path: default_history_path(),
        }
    }
}

fn bool_true() -> bool {
    true
}
fn default_volume_path() -> String {
    DEFAULT_VOLUME_PATH.to_string()
}
fn default_subdir() -> String {
    DEFAULT_SUBDIR.to_string()
}
fn default_file_prefix() -> String {
    DEFAULT_FILE_PREFIX.to_string()
}
fn default_source_url() -> String {
    DEFAULT_SOURCE_URL.to_string()
}
fn default_branch() -> String {
    DEFAULT_BRANCH.to_string()
}
fn default_max_file_size() -> u64 {
    MAX_CONTENT_BYTES
}
fn default_every_days() -> u8 {
    3
}
fn default_hour() -> u8 {
    4
}
fn default_history_path() -> String {
    format!("{}/kbsnap.db", DEFAULT_VOLUME_PATH)
}

impl KbsnapConfig {
    /// Load config from a TOML file with KBSNAP_* env var overrides.
    ///
    /// Checks in order:
    ///   1. Explicit path argument
    ///   2. ./kbsnap.toml
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path.unwrap_or("kbsnap.toml");

        let config: KbsnapConfig = Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("KBSNAP_").split("_"))
            .extract()
            .map_err(|e| crate::error::KbsnapError::Config(e.to_string()))?;

        Ok(config)
    }
}
