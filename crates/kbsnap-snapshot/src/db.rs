use std::sync::Mutex;

use rusqlite::Connection;
use uuid::Uuid;

/// Initialise the run-history schema in `conn` (idempotent).
pub fn init_db(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS runs (
            id           TEXT NOT NULL PRIMARY KEY,
            source       TEXT NOT NULL,
            output_path  TEXT NOT NULL,
            started_at   TEXT NOT NULL,
            finished_at  TEXT,               -- ISO-8601 or NULL while running
            outcome      TEXT,               -- 'ok' | 'failed' | NULL
            stage        TEXT,               -- failed stage or NULL
            error        TEXT                -- original message or NULL
        ) STRICT;

        CREATE INDEX IF NOT EXISTS idx_runs_started_at ON runs (started_at);
        ",
    )?;
    Ok(())
}

/// One recorded invocation.
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub id: String,
    pub source: String,
    pub output_path: String,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub outcome: Option<String>,
    pub stage: Option<String>,
    pub error: Option<String>,
}

/// Thread-safe recorder of snapshot invocations.
///
/// Mirrors the invocation reporting the hosting platform used to provide:
/// one row per run, updated with the terminal outcome. History failures are
/// the caller's to downgrade — recording must never fail a snapshot.
pub struct RunHistory {
    db: Mutex<Connection>,
}

impl RunHistory {
    /// Wrap an already-open connection, initialising the schema.
    pub fn new(conn: Connection) -> rusqlite::Result<Self> {
        init_db(&conn)?;
        Ok(Self {
            db: Mutex::new(conn),
        })
    }

    /// Insert a row for a starting invocation; returns its id.
    pub fn record_start(&self, source: &str, output_path: &str) -> rusqlite::Result<String> {
        let id = Uuid::new_v4().to_string();
        let now = chrono::Utc::now().to_rfc3339();
        let db = self.db.lock().unwrap();
        db.execute(
            "INSERT INTO runs (id, source, output_path, started_at)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![id, source, output_path, now],
        )?;
        Ok(id)
    }

    pub fn record_success(&self, id: &str) -> rusqlite::Result<()> {
        let now = chrono::Utc::now().to_rfc3339();
        let db = self.db.lock().unwrap();
        db.execute(
            "UPDATE runs SET finished_at = ?1, outcome = 'ok' WHERE id = ?2",
            rusqlite::params![now, id],
        )?;
        Ok(())
    }

    pub fn record_failure(&self, id: &str, stage: &str, message: &str) -> rusqlite::Result<()> {
        let now = chrono::Utc::now().to_rfc3339();
        let db = self.db.lock().unwrap();
        db.execute(
            "UPDATE runs
             SET finished_at = ?1, outcome = 'failed', stage = ?2, error = ?3
             WHERE id = ?4",
            rusqlite::params![now, stage, message, id],
        )?;
        Ok(())
    }

    /// Most recent invocations, newest first.
    pub fn recent(&self, limit: usize) -> rusqlite::Result<Vec<RunRecord>> {
        let db = self.db.lock().unwrap();
        let mut stmt = db.prepare(
            "SELECT id, source, output_path, started_at, finished_at, outcome, stage, error
             FROM runs ORDER BY started_at DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map([limit as i64], |row| {
            Ok(RunRecord {
                id: row.get(0)?,
                source: row.get(1)?,
                output_path: row.get(2)?,
                started_at: row.get(3)?,
                finished_at: row.get(4)?,
                outcome: row.get(5)?,
                stage: row.get(6)?,
                error: row.get(7)?,
            })
        })?;
        rows.collect()
    }
}
