//! CLI command handlers, one per file.

mod check;
mod checksum;
mod fetch;

pub use check::run_check;
pub use checksum::run_checksum;
pub use fetch::{run_fetch, FetchOptions};
