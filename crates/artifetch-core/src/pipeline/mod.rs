//! Sequential download pipeline.
//!
//! Checks which artifacts are missing or corrupt, then fetches them strictly
//! one at a time: stream into `<name><suffix>`, rename to `<name>`, verify.
//! Every transition is reported through an [`EventSink`]; `run` itself
//! returns nothing. The first failure ends the run and earlier published
//! files stay on disk.

mod watch;


pub use watch::WatchSet;

use std::collections::VecDeque;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use crate::artifact::Artifact;
use crate::checksum;
use crate::config::Config;
use crate::error::PipelineError;
use crate::events::{DownloadEvent, EventSink};
use crate::fetch::{CurlFetcher, CurlOptions, FetchError, Fetcher, ProgressReporter};
use crate::filter::check_files;
use crate::log::{tracing_logger, Logger};
use crate::storage::{self, STAGING_SUFFIX};

const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_millis(250);

/// States of one run. `Done` and `Failed` are terminal.
#[derive(Debug)]
enum State {
    Checking,
    Fetching,
    Publishing,
    Verifying,
    Verified,
    Done,
    Failed(PipelineError),
}

pub struct DownloadPipeline {
    fetcher: Arc<dyn Fetcher>,
    log: Arc<dyn Logger>,
    watch: WatchSet,
    staging_suffix: String,
    progress_interval: Duration,
}

impl DownloadPipeline {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            fetcher,
            log: tracing_logger(),
            watch: WatchSet::new(),
            staging_suffix: STAGING_SUFFIX.to_string(),
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }

    /// libcurl-backed pipeline with limits, suffix and throttle from `cfg`.
    pub fn from_config(cfg: &Config) -> Self {
        Self::new(Arc::new(CurlFetcher::new(CurlOptions::from(cfg))))
            .with_staging_suffix(cfg.staging_suffix.clone())
            .with_progress_interval(Duration::from_millis(cfg.progress_interval_ms))
    }

    pub fn with_logger(mut self, log: Arc<dyn Logger>) -> Self {
        self.log = log;
        self
    }

    /// URLs that get a `callback-on` event after a verified download.
    pub fn with_watch_set(mut self, watch: impl Into<WatchSet>) -> Self {
        self.watch = watch.into();
        self
    }

    pub fn with_staging_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.staging_suffix = suffix.into();
        self
    }

    /// Minimum gap between two `progress` events of one transfer.
    pub fn with_progress_interval(mut self, interval: Duration) -> Self {
        self.progress_interval = interval;
        self
    }

    /// Check, fetch and verify `artifacts`, reporting through `sink`.
    ///
    /// The last event is always `done` or `error`.
    pub async fn run(&self, artifacts: Vec<Artifact>, sink: &impl EventSink) {
        let mut queue: VecDeque<Artifact> = VecDeque::new();
        let mut total = 0usize;
        let mut state = State::Checking;

        loop {
            state = match state {
                State::Checking => {
                    sink.emit(DownloadEvent::CheckStarted);
                    match check_files(&artifacts, self.log.as_ref()).await {
                        Ok(needed) if needed.is_empty() => State::Done,
                        Ok(needed) => {
                            total = needed.len();
                            queue = needed.into();
                            sink.emit(DownloadEvent::Start {
                                remaining: queue.len(),
                                total,
                            });
                            State::Fetching
                        }
                        Err(e) => State::Failed(e),
                    }
                }
                State::Fetching => match queue.front() {
                    Some(head) => match self.fetch(head, sink).await {
                        Ok(()) => State::Publishing,
                        Err(e) => State::Failed(e),
                    },
                    None => State::Done,
                },
                State::Publishing => match queue.front() {
                    Some(head) => match self.publish(head).await {
                        Ok(()) => {
                            sink.emit(DownloadEvent::Checking);
                            State::Verifying
                        }
                        Err(e) => State::Failed(e),
                    },
                    None => State::Done,
                },
                State::Verifying => match queue.front() {
                    Some(head) => match self.verify(head).await {
                        Ok(()) => State::Verified,
                        Err(e) => State::Failed(e),
                    },
                    None => State::Done,
                },
                State::Verified => {
                    if let Some(head) = queue.pop_front() {
                        if self.watch.contains(head.url()) {
                            sink.emit(DownloadEvent::CallbackOn {
                                url: head.url().to_owned(),
                            });
                        }
                    }
                    if queue.is_empty() {
                        State::Done
                    } else {
                        sink.emit(DownloadEvent::Next {
                            remaining: queue.len(),
                            total,
                        });
                        State::Fetching
                    }
                }
                State::Done => {
                    self.log.info("All files present and verified");
                    sink.emit(DownloadEvent::Done);
                    return;
                }
                State::Failed(e) => {
                    self.log.error(&e.to_string());
                    sink.emit(DownloadEvent::Error(e));
                    return;
                }
            };
        }
    }

    /// Stream the artifact into its staging file, forwarding every progress
    /// snapshot before the transfer result is looked at.
    async fn fetch(
        &self,
        artifact: &Artifact,
        sink: &impl EventSink,
    ) -> Result<(), PipelineError> {
        let dir = artifact.path();
        storage::ensure_dir(dir)
            .await
            .map_err(|e| PipelineError::io("create directory", dir, e))?;

        let staging = artifact.staging_destination(&self.staging_suffix);
        self.log.info(&format!(
            "Downloading {} to {}",
            artifact.url(),
            staging.display()
        ));

        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let fetcher = Arc::clone(&self.fetcher);
        let url = artifact.url().to_owned();
        let target = staging.clone();
        let interval = self.progress_interval;
        let transfer = tokio::task::spawn_blocking(move || {
            let mut reporter = ProgressReporter::new(tx, interval);
            fetcher.fetch(&url, &target, &mut reporter)
        });

        // The channel closes when the blocking task drops its reporter.
        while let Some(snapshot) = rx.recv().await {
            sink.emit(DownloadEvent::Progress(snapshot));
        }

        let result = transfer.await.map_err(|e| {
            PipelineError::io("write", &staging, io::Error::new(io::ErrorKind::Other, e))
        })?;
        let bytes = match result {
            Ok(bytes) => bytes,
            Err(FetchError::Storage(e)) => return Err(PipelineError::io("write", &staging, e)),
            Err(source) => {
                return Err(PipelineError::Transport {
                    url: artifact.url().to_owned(),
                    source,
                })
            }
        };
        self.log
            .debug(&format!("Fetched {} bytes for {}", bytes, artifact.filename()));
        Ok(())
    }

    async fn publish(&self, artifact: &Artifact) -> Result<(), PipelineError> {
        let staging = artifact.staging_destination(&self.staging_suffix);
        let destination = artifact.destination();
        storage::publish(&staging, &destination)
            .await
            .map_err(|e| PipelineError::io("publish", &staging, e))
    }

    async fn verify(&self, artifact: &Artifact) -> Result<(), PipelineError> {
        let verification =
            checksum::verify_async(artifact.path(), artifact.filename(), artifact.checksum())
                .await?;
        self.log.info(&format!(
            "checked: {} {}",
            artifact.filename(),
            verification.matches
        ));
        if verification.matches {
            return Ok(());
        }
        Err(PipelineError::ChecksumMismatch {
            filename: artifact.filename().to_owned(),
            expected: artifact.checksum().unwrap_or_default().to_owned(),
            actual: verification.digest.unwrap_or_default(),
        })
    }
}
