use thiserror::Error;

/// Errors surfaced by an ingestion backend.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The source locator could not be understood.
    #[error("Invalid source: {0}")]
    InvalidSource(String),

    /// Transport-level HTTP failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote API answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The tree listing was truncated by the API — a partial snapshot must
    /// not masquerade as a complete one.
    #[error("tree listing truncated by the API; repository too large to ingest")]
    Truncated,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, IngestError>;
