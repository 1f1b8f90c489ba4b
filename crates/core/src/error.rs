use std::path::PathBuf;

use thiserror::Error;

/// Error type for acquisition operations.
///
/// Variants split into two families: fatal ones abort the whole run, skippable
/// ones only drop the candidate that produced them. See [`HarvestError::is_fatal`].
#[derive(Debug, Error)]
pub enum HarvestError {
    /// The index endpoint answered with a non-success status.
    #[error("Request to {url} failed with HTTP {status}")]
    RemoteUnavailable { url: String, status: u16 },

    /// The request never produced a response (DNS, TLS, connection reset...).
    #[error("Request to {url} failed: {message}")]
    Transport { url: String, message: String },

    /// The index body could not be decompressed or parsed.
    #[error("Malformed index: {0}")]
    MalformedIndex(String),

    /// The symbol server answered a candidate download with a non-success status.
    #[error("Download from {url} failed with HTTP {status}")]
    DownloadFailed { url: String, status: u16 },

    /// A downloaded body did not hash to the index key.
    #[error("SHA-256 mismatch: index says {expected}, downloaded {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    /// The extraction tool failed or did not leave a usable PDB behind.
    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    /// Local filesystem error outside of the per-candidate boundary.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Convenience result type for acquisition operations.
pub type HarvestResult<T> = Result<T, HarvestError>;

impl HarvestError {
    /// Whether this error terminates the run instead of skipping one candidate.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            HarvestError::DownloadFailed { .. }
                | HarvestError::ChecksumMismatch { .. }
                | HarvestError::ExtractionFailed(_)
        )
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        HarvestError::Io { path: path.into(), source }
    }
}
