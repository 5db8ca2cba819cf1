//! Artifacts: one downloadable file, its destination directory and an
//! optional expected SHA-256.
//!
//! Manifests use the installer's JSON format:
//!
//! ```json
//! [{ "url": "http://x/a.img", "path": "/tmp/d", "checksum": "<64 hex>" }]
//! ```

mod filename;

pub use filename::basename;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Length of a hex-encoded SHA-256 digest.
const SHA256_HEX_LEN: usize = 64;

/// Invalid artifact fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArtifactError {
    #[error("artifact url is empty")]
    EmptyUrl,
    #[error("artifact path is empty (url {0})")]
    EmptyPath(String),
    #[error("cannot derive a filename from url {0}")]
    NoFilename(String),
    #[error("checksum for {url} is not a lowercase hex SHA-256: {checksum}")]
    InvalidChecksum { url: String, checksum: String },
}

/// Unvalidated wire form; every deserialized artifact goes through [`Artifact::new`].
#[derive(Deserialize)]
struct RawArtifact {
    url: String,
    path: PathBuf,
    #[serde(default)]
    checksum: Option<String>,
}

impl TryFrom<RawArtifact> for Artifact {
    type Error = ArtifactError;

    fn try_from(raw: RawArtifact) -> Result<Self, Self::Error> {
        Artifact::new(raw.url, raw.path, raw.checksum)
    }
}

/// A validated, immutable unit of work.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawArtifact")]
pub struct Artifact {
    url: String,
    path: PathBuf,
    checksum: Option<String>,
    filename: String,
}

impl Artifact {
    /// Validate and build an artifact.
    ///
    /// `url` and `path` must be non-empty, the URL must have a basename, and a
    /// checksum (when given) must be 64 lowercase hex characters.
    pub fn new(
        url: impl Into<String>,
        path: impl Into<PathBuf>,
        checksum: Option<String>,
    ) -> Result<Self, ArtifactError> {
        let url = url.into();
        let path = path.into();
        if url.trim().is_empty() {
            return Err(ArtifactError::EmptyUrl);
        }
        if path.as_os_str().is_empty() {
            return Err(ArtifactError::EmptyPath(url));
        }
        let filename = basename(&url).ok_or_else(|| ArtifactError::NoFilename(url.clone()))?;
        if let Some(sum) = &checksum {
            if !is_sha256_hex(sum) {
                return Err(ArtifactError::InvalidChecksum {
                    url,
                    checksum: sum.clone(),
                });
            }
        }
        Ok(Self {
            url,
            path,
            checksum,
            filename,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Destination directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn checksum(&self) -> Option<&str> {
        self.checksum.as_deref()
    }

    /// Basename of the URL.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// `path/filename`.
    pub fn destination(&self) -> PathBuf {
        self.path.join(&self.filename)
    }

    /// `path/filename` + `suffix`, where in-progress bytes are written.
    pub fn staging_destination(&self, suffix: &str) -> PathBuf {
        crate::storage::staging_path(&self.destination(), suffix)
    }
}

fn is_sha256_hex(s: &str) -> bool {
    s.len() == SHA256_HEX_LEN && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

/// Parse a JSON manifest (array of artifacts), validating every entry.
pub fn parse_manifest(json: &str) -> Result<Vec<Artifact>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Read and parse a manifest file.
pub fn load_manifest(path: &Path) -> anyhow::Result<Vec<Artifact>> {
    use anyhow::Context;
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("read manifest {}", path.display()))?;
    parse_manifest(&data).with_context(|| format!("parse manifest {}", path.display()))
}
