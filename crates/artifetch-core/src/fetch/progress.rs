//! Transfer-state snapshots (bytes, percentage, rate, ETA).
//!
//! Consumers can compute rate = received / elapsed_secs and
//! ETA = (total - received) / rate.

use serde::Serialize;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::UnboundedSender;

/// Snapshot of one transfer's progress.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferProgress {
    /// Bytes received so far.
    pub received: u64,
    /// Total size in bytes, when the server announced it.
    pub total: Option<u64>,
    /// Seconds since the transfer started.
    pub elapsed_secs: f64,
}

impl TransferProgress {
    /// Download rate in bytes per second (0 if elapsed is 0).
    pub fn bytes_per_sec(&self) -> f64 {
        if self.elapsed_secs <= 0.0 {
            return 0.0;
        }
        self.received as f64 / self.elapsed_secs
    }

    /// Estimated seconds remaining (None if total unknown or rate is 0).
    pub fn eta_secs(&self) -> Option<f64> {
        let total = self.total?;
        let remaining = total.saturating_sub(self.received);
        if remaining == 0 {
            return Some(0.0);
        }
        let rate = self.bytes_per_sec();
        if rate <= 0.0 {
            return None;
        }
        Some(remaining as f64 / rate)
    }

    /// Fraction complete in [0.0, 1.0]; None if the total is unknown.
    pub fn fraction(&self) -> Option<f64> {
        match self.total? {
            0 => Some(1.0),
            t => Some((self.received as f64 / t as f64).min(1.0)),
        }
    }

    /// Percentage complete, rounded down.
    pub fn percent(&self) -> Option<u8> {
        self.fraction().map(|f| (f * 100.0).floor() as u8)
    }
}

/// Hands snapshots from a (blocking) transfer to the pipeline driver.
///
/// Snapshots are throttled to at most one per `interval`; [`finish`](Self::finish)
/// always sends.
pub struct ProgressReporter {
    tx: UnboundedSender<TransferProgress>,
    started: Instant,
    interval: Duration,
    last_sent: Option<Instant>,
    last_received: Option<u64>,
}

impl ProgressReporter {
    pub fn new(tx: UnboundedSender<TransferProgress>, interval: Duration) -> Self {
        Self {
            tx,
            started: Instant::now(),
            interval,
            last_sent: None,
            last_received: None,
        }
    }

    /// Report the current byte count; dropped if too soon after the last one
    /// or if nothing changed.
    pub fn report(&mut self, received: u64, total: Option<u64>) {
        if self.last_received == Some(received) {
            return;
        }
        let now = Instant::now();
        let due = self
            .last_sent
            .map_or(true, |t| now.duration_since(t) >= self.interval);
        let complete = total.is_some_and(|t| received >= t);
        if due || complete {
            self.send(now, received, total);
        }
    }

    /// Send a final snapshot unless an identical one already went out.
    pub fn finish(&mut self, received: u64, total: Option<u64>) {
        if self.last_received != Some(received) {
            self.send(Instant::now(), received, total);
        }
    }

    fn send(&mut self, now: Instant, received: u64, total: Option<u64>) {
        let snapshot = TransferProgress {
            received,
            total,
            elapsed_secs: now.duration_since(self.started).as_secs_f64(),
        };
        // A closed receiver only means nobody is listening any more.
        let _ = self.tx.send(snapshot);
        self.last_sent = Some(now);
        self.last_received = Some(received);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn snapshot(received: u64, total: Option<u64>, elapsed_secs: f64) -> TransferProgress {
        TransferProgress {
            received,
            total,
            elapsed_secs,
        }
    }

    #[test]
    fn rate_eta_and_percent() {
        let p = snapshot(500, Some(1000), 2.0);
        assert_eq!(p.bytes_per_sec(), 250.0);
        assert_eq!(p.eta_secs(), Some(2.0));
        assert_eq!(p.percent(), Some(50));
    }

    #[test]
    fn unknown_total() {
        let p = snapshot(500, None, 1.0);
        assert_eq!(p.eta_secs(), None);
        assert_eq!(p.fraction(), None);
        assert_eq!(p.percent(), None);
    }

    #[test]
    fn zero_elapsed_and_empty_body() {
        assert_eq!(snapshot(10, Some(20), 0.0).bytes_per_sec(), 0.0);
        assert_eq!(snapshot(10, Some(20), 0.0).eta_secs(), None);
        assert_eq!(snapshot(0, Some(0), 0.0).fraction(), Some(1.0));
    }

    #[test]
    fn reporter_throttles_but_finish_always_sends() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut r = ProgressReporter::new(tx, Duration::from_secs(3600));
        r.report(10, Some(100));
        r.report(20, Some(100));
        r.report(30, Some(100));
        r.finish(100, Some(100));
        drop(r);

        let mut got = Vec::new();
        while let Ok(p) = rx.try_recv() {
            got.push(p.received);
        }
        assert_eq!(got, vec![10, 100]);
    }

    #[test]
    fn reporter_sends_on_completion_and_skips_duplicates() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut r = ProgressReporter::new(tx, Duration::from_secs(3600));
        r.report(5, Some(50));
        r.report(50, Some(50));
        r.finish(50, Some(50));
        drop(r);

        let mut got = Vec::new();
        while let Ok(p) = rx.try_recv() {
            got.push(p.received);
        }
        assert_eq!(got, vec![5, 50]);
    }
}
