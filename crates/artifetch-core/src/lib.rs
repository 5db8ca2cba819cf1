pub mod config;
pub mod logging;

pub mod artifact;
pub mod checksum;
pub mod error;
pub mod events;
pub mod fetch;
pub mod filter;
pub mod log;
pub mod pipeline;
pub mod storage;

pub use artifact::Artifact;
pub use error::PipelineError;
pub use events::{DownloadEvent, EventSink, FnSink};
pub use pipeline::{DownloadPipeline, WatchSet};
