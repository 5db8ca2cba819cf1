//! libcurl-backed [`Fetcher`]: one sequential GET per artifact.

use super::{FetchError, Fetcher, ProgressReporter};
use crate::config::Config;
use crate::storage::StagingWriter;
use std::path::Path;
use std::time::Duration;

/// Transfer limits passed to every curl handle.
#[derive(Debug, Clone)]
pub struct CurlOptions {
    pub connect_timeout: Duration,
    /// Abort when slower than `low_speed_limit` bytes/s for `low_speed_time`.
    pub low_speed_limit: u32,
    pub low_speed_time: Duration,
    /// Upper bound for one whole transfer.
    pub timeout: Duration,
    pub max_redirections: u32,
    pub user_agent: Option<String>,
}

impl Default for CurlOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for CurlOptions {
    fn from(cfg: &Config) -> Self {
        Self {
            connect_timeout: Duration::from_secs(cfg.connect_timeout_secs),
            low_speed_limit: cfg.low_speed_limit_bytes,
            low_speed_time: Duration::from_secs(cfg.low_speed_time_secs),
            timeout: Duration::from_secs(cfg.transfer_timeout_secs),
            max_redirections: cfg.max_redirections,
            user_agent: cfg.user_agent.clone(),
        }
    }
}

/// Downloads with a single plain GET, writing sequentially to the staging file.
#[derive(Debug, Clone, Default)]
pub struct CurlFetcher {
    opts: CurlOptions,
}

impl CurlFetcher {
    pub fn new(opts: CurlOptions) -> Self {
        Self { opts }
    }

    fn easy(&self, url: &str) -> Result<curl::easy::Easy, curl::Error> {
        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.follow_location(true)?;
        easy.max_redirections(self.opts.max_redirections)?;
        easy.connect_timeout(self.opts.connect_timeout)?;
        easy.low_speed_limit(self.opts.low_speed_limit)?;
        easy.low_speed_time(self.opts.low_speed_time)?;
        easy.timeout(self.opts.timeout)?;
        if let Some(ua) = &self.opts.user_agent {
            easy.useragent(ua)?;
        }
        easy.progress(true)?;
        Ok(easy)
    }
}

impl Fetcher for CurlFetcher {
    fn fetch(
        &self,
        url: &str,
        staging: &Path,
        progress: &mut ProgressReporter,
    ) -> Result<u64, FetchError> {
        let mut writer = StagingWriter::create(staging).map_err(FetchError::Storage)?;
        let mut storage_err: Option<std::io::Error> = None;
        let mut easy = self.easy(url)?;

        let performed = {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| match writer.append(data) {
                Ok(()) => Ok(data.len()),
                Err(e) => {
                    tracing::warn!("staging write failed for {}: {}", staging.display(), e);
                    storage_err = Some(e);
                    Ok(0) // abort transfer
                }
            })?;
            transfer.progress_function(|dltotal, dlnow, _, _| {
                let total = (dltotal > 0.0).then_some(dltotal as u64);
                progress.report(dlnow as u64, total);
                true
            })?;
            transfer.perform()
        };
        if let Some(e) = storage_err {
            return Err(FetchError::Storage(e));
        }
        performed?;

        let code = easy.response_code()?;
        // 0 means a non-HTTP scheme (e.g. file://), which has no status line.
        if code != 0 && !(200..300).contains(&code) {
            return Err(FetchError::Http(code));
        }

        writer.sync().map_err(FetchError::Storage)?;
        let written = writer.written();
        let announced = easy.content_length_download()?;
        let expected = (announced >= 0.0).then_some(announced as u64);
        if let Some(exp) = expected {
            if written != exp {
                return Err(FetchError::PartialTransfer {
                    expected: exp,
                    received: written,
                });
            }
        }
        progress.finish(written, expected.or(Some(written)));
        tracing::debug!("fetched {} ({} bytes) into {}", url, written, staging.display());
        Ok(written)
    }
}
