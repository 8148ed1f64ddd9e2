use std::fs::File;
use std::io::BufWriter;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::digest::{is_binary_path, DigestWriter};
use crate::error::{IngestError, Result};
use crate::source::RepoSource;
use crate::{IngestRequest, IngestSummary, Ingestor};

const DEFAULT_API_BASE: &str = "https://api.github.com";
const DEFAULT_RAW_BASE: &str = "https://raw.githubusercontent.com";

/// Ingestor backed by the GitHub REST API.
///
/// Lists the repository tree in one `git/trees?recursive=1` call, then pulls
/// each included file from the raw content host. Unauthenticated requests
/// work but are rate-limited; pass a token for anything beyond toy repos.
pub struct GitHubIngestor {
    client: reqwest::Client,
    token: Option<String>,
    api_base: String,
    raw_base: String,
}

impl GitHubIngestor {
    pub fn new(token: Option<String>) -> Self {
        Self::with_bases(token, DEFAULT_API_BASE, DEFAULT_RAW_BASE)
    }

    /// Override the API / raw hosts (GitHub Enterprise, tests).
    pub fn with_bases(token: Option<String>, api_base: &str, raw_base: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("kbsnap")
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            token,
            api_base: api_base.trim_end_matches('/').to_string(),
            raw_base: raw_base.trim_end_matches('/').to_string(),
        }
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.token {
            Some(ref t) => req.bearer_auth(t),
            None => req,
        }
    }

    async fn list_tree(&self, source: &RepoSource, reference: &str) -> Result<TreeResponse> {
        let url = format!(
            "{}/repos/{}/{}/git/trees/{}?recursive=1",
            self.api_base, source.owner, source.repo, reference
        );
        debug!(%url, "listing repository tree");

        let resp = self
            .authorize(self.client.get(&url))
            .header("accept", "application/vnd.github+json")
            .send()
            .await?;

        let status = resp.status().as_u16();
        if !resp.status().is_success() {
            let text = resp.text().await.unwrap_or_default();
            warn!(status, body = %text, "tree listing failed");
            return Err(IngestError::Api {
                status,
                message: text,
            });
        }

        Ok(resp.json().await?)
    }

    async fn fetch_raw(&self, source: &RepoSource, reference: &str, path: &str) -> Result<String> {
        let url = format!(
            "{}/{}/{}/{}/{}",
            self.raw_base, source.owner, source.repo, reference, path
        );

        let resp = self.authorize(self.client.get(&url)).send().await?;
        let status = resp.status().as_u16();
        if !resp.status().is_success() {
            return Err(IngestError::Api {
                status,
                message: format!("raw fetch failed for {path}"),
            });
        }
        Ok(resp.text().await?)
    }
}

#[async_trait]
impl Ingestor for GitHubIngestor {
    async fn ingest(&self, req: &IngestRequest) -> Result<IngestSummary> {
        let source = RepoSource::parse(&req.source)?;
        // A ref pinned in the URL wins over the configured branch.
        let reference = source
            .reference
            .clone()
            .unwrap_or_else(|| req.branch.clone());

        info!(source = %source.label(), %reference, "starting ingestion");

        let listing = self.list_tree(&source, &reference).await?;
        if listing.truncated {
            return Err(IngestError::Truncated);
        }

        let mut skipped = 0usize;
        let mut included: Vec<TreeEntry> = Vec::new();
        for entry in listing.tree {
            if entry.kind != "blob" || !source.contains(&entry.path) {
                continue;
            }
            let too_large = entry.size.is_some_and(|s| s > req.max_file_size);
            if too_large || is_binary_path(&entry.path) {
                skipped += 1;
                continue;
            }
            included.push(entry);
        }
        included.sort_by(|a, b| a.path.cmp(&b.path));

        debug!(
            candidates = included.len(),
            skipped, "tree filtered, writing digest"
        );

        // File::create truncates: a same-day rerun overwrites, never appends.
        let file = File::create(&req.output)?;
        let mut writer = DigestWriter::new(BufWriter::new(file));
        let paths: Vec<&str> = included.iter().map(|e| e.path.as_str()).collect();
        writer.header(&source.label(), &reference, included.len())?;
        writer.tree(&paths)?;

        let mut files = 0usize;
        for entry in &included {
            // Whole-digest budget: stop inlining once the cap is reached.
            if writer.bytes_written() >= req.max_file_size {
                skipped += 1;
                continue;
            }
            let content = self.fetch_raw(&source, &reference, &entry.path).await?;
            writer.section(&entry.path, &content)?;
            files += 1;
        }

        let bytes_written = writer.finish()?;
        info!(files, skipped, bytes_written, output = %req.output.display(), "ingestion complete");

        Ok(IngestSummary {
            files,
            skipped,
            bytes_written,
        })
    }
}

#[derive(Debug, Deserialize)]
struct TreeResponse {
    tree: Vec<TreeEntry>,
    #[serde(default)]
    truncated: bool,
}

#[derive(Debug, Deserialize)]
struct TreeEntry {
    path: String,
    #[serde(rename = "type")]
    kind: String,
    size: Option<u64>,
}
