//! SHA-256 verification of local files.
//!
//! Verification is read-only. A missing expected digest means verification
//! was not requested and always passes; an unreadable file is an error, not a
//! mismatch.

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

const BUF_SIZE: usize = 64 * 1024;

/// Failure to read a file for hashing.
#[derive(Debug, thiserror::Error)]
pub enum ChecksumError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Outcome of comparing a file against an expected digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verification {
    /// True when the digests are equal or no digest was expected.
    pub matches: bool,
    /// Computed lowercase hex digest; `None` when the file was not hashed.
    pub digest: Option<String>,
}

impl Verification {
    fn skipped() -> Self {
        Self {
            matches: true,
            digest: None,
        }
    }
}

/// Compute SHA-256 of a file and return the digest as lowercase hex.
/// Reads in chunks to keep memory use bounded; suitable for large files.
pub fn sha256_path(path: &Path) -> Result<String, ChecksumError> {
    let io_err = |source| ChecksumError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut f = File::open(path).map_err(io_err)?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; BUF_SIZE];
    loop {
        let n = f.read(&mut buf).map_err(io_err)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Verify `dir/filename` against `expected`.
///
/// Comparison is case-sensitive: expected digests are lowercase hex.
pub fn verify(
    dir: &Path,
    filename: &str,
    expected: Option<&str>,
) -> Result<Verification, ChecksumError> {
    let Some(expected) = expected else {
        return Ok(Verification::skipped());
    };
    let digest = sha256_path(&dir.join(filename))?;
    Ok(Verification {
        matches: digest == expected,
        digest: Some(digest),
    })
}

/// Like [`verify`], but runs the file scan on tokio's blocking pool.
pub async fn verify_async(
    dir: &Path,
    filename: &str,
    expected: Option<&str>,
) -> Result<Verification, ChecksumError> {
    let Some(expected) = expected.map(str::to_owned) else {
        return Ok(Verification::skipped());
    };
    let dir = dir.to_path_buf();
    let filename = filename.to_owned();
    let path = dir.join(&filename);
    tokio::task::spawn_blocking(move || verify(&dir, &filename, Some(&expected)))
        .await
        .map_err(|e| ChecksumError::Io {
            path,
            source: io::Error::new(io::ErrorKind::Other, e),
        })?
}
