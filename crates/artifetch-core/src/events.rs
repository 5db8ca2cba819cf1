//! Typed download events and the sinks that receive them.
//!
//! One run emits a strictly ordered sequence: `check-started`, then either
//! `done` directly or `start`, per-item `progress`/`checking`/`callback-on`,
//! `next` between items, and finally `done` or `error`.

use serde_json::{json, Value};
use tokio::sync::mpsc::UnboundedSender;

use crate::error::PipelineError;
use crate::fetch::TransferProgress;

#[derive(Debug)]
pub enum DownloadEvent {
    /// Entering the existence/integrity check.
    CheckStarted,
    /// Work list is non-empty; `remaining == total` at this point.
    Start { remaining: usize, total: usize },
    /// Transfer-state snapshot of the current item.
    Progress(TransferProgress),
    /// Current item was published and is being verified.
    Checking,
    /// A verified item's URL is in the caller's watch-set.
    CallbackOn { url: String },
    /// Advanced to the next queued item.
    Next { remaining: usize, total: usize },
    /// Everything present and verified.
    Done,
    /// Run failed; nothing follows.
    Error(PipelineError),
}

impl DownloadEvent {
    /// Stable event name.
    pub fn name(&self) -> &'static str {
        match self {
            DownloadEvent::CheckStarted => "check-started",
            DownloadEvent::Start { .. } => "start",
            DownloadEvent::Progress(_) => "progress",
            DownloadEvent::Checking => "checking",
            DownloadEvent::CallbackOn { .. } => "callback-on",
            DownloadEvent::Next { .. } => "next",
            DownloadEvent::Done => "done",
            DownloadEvent::Error(_) => "error",
        }
    }

    /// True for `done` and `error`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, DownloadEvent::Done | DownloadEvent::Error(_))
    }

    /// `{"event": <name>, ...payload}`.
    pub fn to_json(&self) -> Value {
        let name = self.name();
        match self {
            DownloadEvent::CheckStarted | DownloadEvent::Checking | DownloadEvent::Done => {
                json!({ "event": name })
            }
            DownloadEvent::Start { remaining, total }
            | DownloadEvent::Next { remaining, total } => {
                json!({ "event": name, "remaining": remaining, "total": total })
            }
            DownloadEvent::Progress(p) => json!({
                "event": name,
                "received": p.received,
                "total": p.total,
                "percent": p.percent(),
                "bytes_per_sec": p.bytes_per_sec(),
                "eta_secs": p.eta_secs(),
            }),
            DownloadEvent::CallbackOn { url } => json!({ "event": name, "url": url }),
            DownloadEvent::Error(e) => json!({
                "event": name,
                "kind": e.kind(),
                "message": e.to_string(),
            }),
        }
    }
}

/// Receives events in emission order.
pub trait EventSink {
    fn emit(&self, event: DownloadEvent);
}

impl EventSink for UnboundedSender<DownloadEvent> {
    fn emit(&self, event: DownloadEvent) {
        if self.send(event).is_err() {
            tracing::debug!("event receiver dropped");
        }
    }
}

/// Adapts a closure into an [`EventSink`].
pub struct FnSink<F>(pub F);

impl<F> EventSink for FnSink<F>
where
    F: Fn(DownloadEvent),
{
    fn emit(&self, event: DownloadEvent) {
        (self.0)(event)
    }
}
