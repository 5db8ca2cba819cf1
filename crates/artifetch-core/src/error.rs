//! Failures that end a pipeline run. They reach the caller only as the
//! payload of an `error` event.

use std::io;
use std::path::PathBuf;

use crate::checksum::ChecksumError;
use crate::fetch::FetchError;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Network or stream failure while fetching.
    #[error("download of {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: FetchError,
    },
    /// Published file's digest differs from the expected one.
    #[error("Checksum did not match on file {filename}")]
    ChecksumMismatch {
        filename: String,
        expected: String,
        actual: String,
    },
    /// Local filesystem failure (directory creation, rename, unreadable file).
    #[error("cannot {action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl PipelineError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        PipelineError::Io {
            action,
            path: path.into(),
            source,
        }
    }

    /// Short machine-readable kind, used in JSON event output.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::Transport { .. } => "transport",
            PipelineError::ChecksumMismatch { .. } => "checksum",
            PipelineError::Io { .. } => "io",
        }
    }
}

impl From<ChecksumError> for PipelineError {
    fn from(e: ChecksumError) -> Self {
        match e {
            ChecksumError::Io { path, source } => PipelineError::io("read", path, source),
        }
    }
}
