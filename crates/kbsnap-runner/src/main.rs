use std::sync::Arc;

use tracing::{info, warn};

use kbsnap_core::KbsnapConfig;
use kbsnap_ingest::{GitHubIngestor, Ingestor};
use kbsnap_scheduler::{Schedule, SchedulerEngine};
use kbsnap_snapshot::{DirVolume, RunHistory, SnapshotJob, Volume};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kbsnap=info".into()),
        )
        .init();

    // load config: KBSNAP_CONFIG env > ./kbsnap.toml > compiled defaults
    let config_path = std::env::var("KBSNAP_CONFIG").ok();
    let config = KbsnapConfig::load(config_path.as_deref()).unwrap_or_else(|e| {
        warn!("Config load failed ({}), using defaults", e);
        KbsnapConfig::default()
    });

    let volume: Arc<dyn Volume> = Arc::new(DirVolume::open(
        &config.volume.path,
        config.volume.create_if_missing,
    )?);
    info!(mount = %config.volume.path, "persistent volume mounted");

    // unauthenticated works for public repos; a token lifts the rate limit
    let token = std::env::var("GITHUB_TOKEN").ok();
    let ingestor: Arc<dyn Ingestor> = Arc::new(GitHubIngestor::new(token));

    ensure_parent_dir(&config.history.path);
    info!(path = %config.history.path, "opening run-history database");
    let history = RunHistory::new(rusqlite::Connection::open(&config.history.path)?)?;

    let job = SnapshotJob::new(config.snapshot.clone(), volume, ingestor).with_history(history);

    let schedule = Schedule::EveryNDays {
        every_days: config.schedule.every_days,
        hour: config.schedule.hour,
        minute: config.schedule.minute,
    };
    let (trigger_tx, mut trigger_rx) = tokio::sync::mpsc::channel(8);
    let engine = SchedulerEngine::new(schedule, trigger_tx)?;

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    tokio::spawn(async move { engine.run(shutdown_rx).await });
    info!(
        source = %config.snapshot.source_url,
        every_days = config.schedule.every_days,
        "kbsnap runner started"
    );

    loop {
        tokio::select! {
            trigger = trigger_rx.recv() => {
                let Some(trigger) = trigger else { break };
                info!(scheduled_for = %trigger.scheduled_for.to_rfc3339(), "snapshot trigger fired");
                // Failures are already logged (and recorded) by the job;
                // the runner keeps serving later occurrences.
                let _ = job.run(None).await;
            }
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown signal received");
                break;
            }
        }
    }

    let _ = shutdown_tx.send(true);
    Ok(())
}

/// Ensure the parent directory for a file path exists.
fn ensure_parent_dir(path: &str) {
    if let Some(parent) = std::path::Path::new(path).parent() {
        let _ = std::fs::create_dir_all(parent);
    }
}
