//! `kbsnap-ingest` — repository ingestion: fetch a documentation tree and
//! serialize it into a single flat text digest.
//!
//! # Overview
//!
//! The [`Ingestor`] trait is the seam the snapshot job calls through; the
//! shipped implementation is [`github::GitHubIngestor`], which lists a
//! repository tree via the GitHub REST API and pulls file contents from
//! `raw.githubusercontent.com`. The digest format (summary header, directory
//! tree, per-file sections separated by a `=` rule) is what downstream
//! knowledge-base consumers already parse — keep it stable.

pub mod digest;
pub mod error;
pub mod github;
pub mod source;

use std::path::PathBuf;

use async_trait::async_trait;

pub use error::{IngestError, Result};
pub use github::GitHubIngestor;
pub use source::RepoSource;

/// Everything the ingestor needs for one fetch.
#[derive(Debug, Clone)]
pub struct IngestRequest {
    /// Repository locator, e.g. `https://github.com/recharts/recharts/tree/3.x/storybook`.
    pub source: String,
    /// Ref to fetch when the locator does not pin one.
    pub branch: String,
    /// Per-file and whole-digest byte cap.
    pub max_file_size: u64,
    /// Where the digest is written. An existing file is truncated.
    pub output: PathBuf,
}

/// Counters describing what one ingestion did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestSummary {
    /// Files whose content made it into the digest.
    pub files: usize,
    /// Files skipped (binary extension, over the size cap, or budget spent).
    pub skipped: usize,
    /// Total digest size on disk.
    pub bytes_written: u64,
}

/// Common interface for ingestion backends.
#[async_trait]
pub trait Ingestor: Send + Sync {
    /// Fetch `req.source` and write the digest to `req.output`.
    ///
    /// Awaited to completion by the caller — implementations must not leave
    /// background tasks running after returning.
    async fn ingest(&self, req: &IngestRequest) -> Result<IngestSummary>;
}
