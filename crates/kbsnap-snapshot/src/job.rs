use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{error, info, warn};

use kbsnap_core::config::SnapshotConfig;
use kbsnap_ingest::{IngestRequest, Ingestor};

use crate::db::RunHistory;
use crate::error::{Result, SnapshotError, Stage};
use crate::volume::Volume;

/// The scheduled snapshot job.
///
/// One `run` = one full fetch and one full write: ensure the output
/// directory, derive the dated path, await the ingestor, commit the volume.
/// The volume and ingestor are injected — the job owns no global state.
pub struct SnapshotJob {
    config: SnapshotConfig,
    volume: Arc<dyn Volume>,
    ingestor: Arc<dyn Ingestor>,
    history: Option<RunHistory>,
}

impl SnapshotJob {
    pub fn new(config: SnapshotConfig, volume: Arc<dyn Volume>, ingestor: Arc<dyn Ingestor>) -> Self {
        Self {
            config,
            volume,
            ingestor,
            history: None,
        }
    }

    /// Attach a run-history recorder. History failures are downgraded to
    /// warnings — they must never fail the snapshot itself.
    pub fn with_history(mut self, history: RunHistory) -> Self {
        self.history = Some(history);
        self
    }

    /// Naming contract: `<mount>/<subdir>/<prefix>_<YYYY-MM-DD>.txt`.
    /// Downstream consumers key off this scheme.
    pub fn output_path_for(&self, date: NaiveDate) -> PathBuf {
        self.volume
            .root()
            .join(&self.config.subdir)
            .join(format!("{}_{}.txt", self.config.file_prefix, date.format("%Y-%m-%d")))
    }

    /// Run the job for today's UTC date.
    pub async fn run(&self, source_override: Option<&str>) -> Result<PathBuf> {
        self.run_for_date(source_override, Utc::now().date_naive())
            .await
    }

    /// Run the job for an explicit calendar date.
    ///
    /// Same-date invocations map to the same path and overwrite; different
    /// dates never collide. On success the returned path has been committed
    /// to the volume.
    pub async fn run_for_date(
        &self,
        source_override: Option<&str>,
        date: NaiveDate,
    ) -> Result<PathBuf> {
        let source = source_override.unwrap_or(&self.config.source_url);
        let output = self.output_path_for(date);

        let run_id = self.history.as_ref().and_then(|h| {
            h.record_start(source, &output.display().to_string())
                .map_err(|e| warn!("run history insert failed: {e}"))
                .ok()
        });

        let result = self.execute(source, &output).await;
        match &result {
            Ok(path) => {
                info!(path = %path.display(), "snapshot complete and committed");
                if let (Some(h), Some(id)) = (&self.history, &run_id) {
                    if let Err(e) = h.record_success(id) {
                        warn!("run history update failed: {e}");
                    }
                }
            }
            Err(e) => {
                error!(stage = %e.stage, "snapshot failed: {}", e.message);
                if let (Some(h), Some(id)) = (&self.history, &run_id) {
                    if let Err(he) = h.record_failure(id, &e.stage.to_string(), &e.message) {
                        warn!("run history update failed: {he}");
                    }
                }
            }
        }
        result
    }

    async fn execute(&self, source: &str, output: &Path) -> Result<PathBuf> {
        let out_dir = self.volume.root().join(&self.config.subdir);
        info!(dir = %out_dir.display(), "ensuring output directory");
        std::fs::create_dir_all(&out_dir).map_err(|e| SnapshotError::new(Stage::Directory, e))?;

        info!(%source, output = %output.display(), "fetching documentation snapshot");
        let request = IngestRequest {
            source: source.to_string(),
            branch: self.config.branch.clone(),
            max_file_size: self.config.max_file_size,
            output: output.to_path_buf(),
        };
        // The one suspension point: awaited to completion, no sub-tasks.
        let summary = self
            .ingestor
            .ingest(&request)
            .await
            .map_err(|e| SnapshotError::new(Stage::Fetch, e))?;
        info!(
            files = summary.files,
            skipped = summary.skipped,
            bytes = summary.bytes_written,
            "fetched and saved documentation"
        );

        self.volume
            .commit(output)
            .map_err(|e| SnapshotError::new(Stage::Commit, e))?;
        info!("volume changes committed");

        Ok(output.to_path_buf())
    }
}
