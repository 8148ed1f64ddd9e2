//! `kbsnap-snapshot` — the snapshot job: one dated fetch-and-persist per
//! invocation.
//!
//! # Overview
//!
//! [`job::SnapshotJob`] ties the pieces together: it ensures the output
//! directory exists, derives the dated output path, awaits the ingestor, and
//! commits the [`volume::Volume`] so the write survives the invocation. Every
//! failure is translated into a [`error::SnapshotError`] naming the stage
//! that broke. Each invocation is recorded in the SQLite-backed
//! [`db::RunHistory`].
//!
//! Naming contract: `<mount>/<subdir>/<prefix>_<YYYY-MM-DD>.txt`. One file
//! per calendar day; a same-day rerun overwrites.

pub mod db;
pub mod error;
pub mod job;
pub mod volume;

pub use db::{RunHistory, RunRecord};
pub use error::{Result, SnapshotError, Stage};
pub use job::SnapshotJob;
pub use volume::{DirVolume, Volume, VolumeError};
