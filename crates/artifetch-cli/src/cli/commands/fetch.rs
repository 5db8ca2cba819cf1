//! `artifetch fetch <manifest>` – run the download pipeline and print its events.

use anyhow::Result;
use artifetch_core::artifact::load_manifest;
use artifetch_core::config::Config;
use artifetch_core::fetch::TransferProgress;
use artifetch_core::{DownloadEvent, DownloadPipeline};
use std::io::Write;
use std::path::Path;
use std::time::Instant;

const PROGRESS_INTERVAL_MS: u128 = 500;

#[derive(Debug, Default)]
pub struct FetchOptions {
    pub callback_on: Vec<String>,
    pub json: bool,
}

pub async fn run_fetch(cfg: &Config, manifest: &Path, opts: FetchOptions) -> Result<()> {
    let artifacts = load_manifest(manifest)?;
    tracing::info!(
        "fetching {} artifact(s) from {}",
        artifacts.len(),
        manifest.display()
    );
    let pipeline = DownloadPipeline::from_config(cfg).with_watch_set(opts.callback_on);

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    // `tx` moves into the driver and is dropped when the run ends.
    let driver = async move { pipeline.run(artifacts, &tx).await };
    let json = opts.json;
    let printer = async move {
        let mut printer = Printer::new(json);
        let mut failure = None;
        while let Some(event) = rx.recv().await {
            printer.print(&event);
            if let DownloadEvent::Error(e) = event {
                failure = Some(e);
            }
        }
        failure
    };

    let ((), failure) = tokio::join!(driver, printer);
    match failure {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

struct Printer {
    json: bool,
    last_progress: Option<Instant>,
}

impl Printer {
    fn new(json: bool) -> Self {
        Self {
            json,
            last_progress: None,
        }
    }

    fn print(&mut self, event: &DownloadEvent) {
        if self.json {
            println!("{}", event.to_json());
            return;
        }
        match event {
            DownloadEvent::CheckStarted => println!("Checking files..."),
            DownloadEvent::Start { remaining, .. } => {
                println!("Downloading {} file(s)", remaining)
            }
            DownloadEvent::Progress(p) => self.progress(p),
            DownloadEvent::Checking => {
                self.last_progress = None;
                println!();
                println!("  verifying...");
            }
            DownloadEvent::CallbackOn { url } => println!("  ready: {}", url),
            DownloadEvent::Next { remaining, total } => {
                println!("{} of {} done", total - remaining, total)
            }
            DownloadEvent::Done => println!("All files downloaded and verified."),
            DownloadEvent::Error(_) => println!(),
        }
    }

    fn progress(&mut self, p: &TransferProgress) {
        let now = Instant::now();
        let complete = p.total.is_some_and(|t| p.received >= t);
        let due = self
            .last_progress
            .map_or(true, |t| now.duration_since(t).as_millis() >= PROGRESS_INTERVAL_MS);
        if !(due || complete) {
            return;
        }
        let done_mib = p.received as f64 / 1_048_576.0;
        let rate_mib = p.bytes_per_sec() / 1_048_576.0;
        let eta = p
            .eta_secs()
            .map(|s| format!("{:.0}s", s))
            .unwrap_or_else(|| "?".to_string());
        match (p.total, p.percent()) {
            (Some(total), Some(pct)) => print!(
                "\r  {:.1} / {:.1} MiB ({}%)  {:.2} MiB/s  ETA {}  ",
                done_mib,
                total as f64 / 1_048_576.0,
                pct,
                rate_mib,
                eta
            ),
            _ => print!("\r  {:.1} MiB  {:.2} MiB/s  ", done_mib, rate_mib),
        }
        let _ = std::io::stdout().flush();
        self.last_progress = Some(now);
    }
}
