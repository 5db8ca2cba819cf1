//! Disk I/O and file lifecycle for downloads.
//!
//! Bytes land in a staging file next to the destination (`name` + suffix).
//! Publishing is a single rename, so the final path is either absent or
//! holds a complete file.

mod writer;

pub use writer::StagingWriter;

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

/// Default staging suffix marking an in-progress, not yet verified download.
pub const STAGING_SUFFIX: &str = ".tmp";

/// Path for the staging file: appends `suffix` to the final path
/// (e.g. `boot.img` → `boot.img.tmp`).
pub fn staging_path(final_path: &Path, suffix: &str) -> PathBuf {
    let mut o: OsString = final_path.as_os_str().to_owned();
    o.push(suffix);
    PathBuf::from(o)
}

/// Create `dir` and any missing parents. No-op if it is already a directory;
/// fails if something else occupies the path.
pub async fn ensure_dir(dir: &Path) -> io::Result<()> {
    tokio::fs::create_dir_all(dir).await
}

/// Atomically rename the staging file to its final path. Fails if the two
/// paths are on different filesystems.
pub async fn publish(staging: &Path, final_path: &Path) -> io::Result<()> {
    tokio::fs::rename(staging, final_path).await
}
