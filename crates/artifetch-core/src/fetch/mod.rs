//! HTTP(S) GET-with-progress streaming into a staging file.
//!
//! [`Fetcher`] is the seam between the pipeline and the network. Fetchers
//! block; the pipeline runs them on tokio's blocking pool and drains their
//! progress snapshots on the async side.

mod http;
mod progress;

pub use http::{CurlFetcher, CurlOptions};
pub use progress::{ProgressReporter, TransferProgress};

use std::fmt;
use std::path::Path;

/// Error returned by a single fetch (transport failure, HTTP error or storage failure).
#[derive(Debug)]
pub enum FetchError {
    /// Curl reported an error (timeout, connection, DNS, etc.).
    Curl(curl::Error),
    /// HTTP response had a non-2xx status.
    Http(u32),
    /// Transfer completed but fewer bytes arrived than announced.
    PartialTransfer { expected: u64, received: u64 },
    /// Writing the staging file failed (disk full, permission denied).
    Storage(std::io::Error),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Curl(e) => write!(f, "{}", e),
            FetchError::Http(code) => write!(f, "HTTP {}", code),
            FetchError::PartialTransfer { expected, received } => {
                write!(f, "partial transfer: expected {} bytes, got {}", expected, received)
            }
            FetchError::Storage(e) => write!(f, "storage: {}", e),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::Curl(e) => Some(e),
            FetchError::Storage(e) => Some(e),
            FetchError::Http(_) | FetchError::PartialTransfer { .. } => None,
        }
    }
}

impl From<curl::Error> for FetchError {
    fn from(e: curl::Error) -> Self {
        FetchError::Curl(e)
    }
}

/// Streams one remote resource into a local staging file.
///
/// Implementations write the whole body to `staging` (creating or truncating
/// it), report progress through `progress`, and return the number of bytes
/// written. They must not touch the final destination path.
pub trait Fetcher: Send + Sync {
    fn fetch(
        &self,
        url: &str,
        staging: &Path,
        progress: &mut ProgressReporter,
    ) -> Result<u64, FetchError>;
}
