use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::storage::STAGING_SUFFIX;

/// Global configuration loaded from `~/.config/artifetch/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Suffix appended to the destination name while a download is in progress.
    pub staging_suffix: String,
    /// Seconds allowed for establishing a connection.
    pub connect_timeout_secs: u64,
    /// Abort a transfer slower than this many bytes per second...
    pub low_speed_limit_bytes: u32,
    /// ...for this many seconds.
    pub low_speed_time_secs: u64,
    /// Upper bound for one whole transfer in seconds.
    pub transfer_timeout_secs: u64,
    /// Minimum gap between two progress events of the same transfer.
    pub progress_interval_ms: u64,
    /// Maximum number of redirects followed per request.
    pub max_redirections: u32,
    /// Optional User-Agent header; libcurl's default when unset.
    pub user_agent: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            staging_suffix: STAGING_SUFFIX.to_string(),
            connect_timeout_secs: 30,
            low_speed_limit_bytes: 1024,
            low_speed_time_secs: 60,
            transfer_timeout_secs: 3600,
            progress_interval_ms: 250,
            max_redirections: 10,
            user_agent: None,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("artifetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<Config> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = Config::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: Config = toml::from_str(&data)?;
    if cfg.staging_suffix.is_empty() {
        anyhow::bail!("{}: staging_suffix must not be empty", path.display());
    }
    Ok(cfg)
}
