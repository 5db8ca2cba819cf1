//! Sequential writer for staging files.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

/// Writer for a staging file. Bytes are appended in arrival order.
pub struct StagingWriter {
    file: File,
    written: u64,
}

impl StagingWriter {
    /// Create the staging file at `path` (e.g. `destination.tmp`).
    /// Overwrites if the path already exists.
    pub fn create(path: &Path) -> io::Result<Self> {
        let file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        Ok(Self {
            file,
            written: 0,
        })
    }

    /// Append `data` at the current end of the file.
    pub fn append(&mut self, data: &[u8]) -> io::Result<()> {
        self.file.write_all(data)?;
        self.written += data.len() as u64;
        Ok(())
    }

    /// Flush file data to disk. Call before publishing for durability.
    pub fn sync(&mut self) -> io::Result<()> {
        self.file.flush()?;
        self.file.sync_all()
    }

    /// Bytes appended so far.
    pub fn written(&self) -> u64 {
        self.written
    }
}
