use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::controller::Budget;
use crate::supervisor::ReconnectPolicy;

/// Reconnect parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconnectConfig {
    /// Number of connection attempts per (re)connect, including the first.
    pub max_retries: u32,
    /// Fixed delay in seconds between attempts.
    pub retry_delay_secs: u64,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay_secs: 5,
        }
    }
}

/// Global configuration loaded from `~/.config/qbit-fleet/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FleetConfig {
    /// Engine Web UI address, `host:port` (scheme optional).
    pub host: String,
    pub username: String,
    pub password: String,
    /// Per-request timeout for every engine call.
    pub request_timeout_secs: u64,
    /// Upper bound on torrents that are actively downloading.
    pub max_active_downloads: usize,
    /// Upper bound on incomplete torrents that are not paused.
    pub max_resumed_torrents: usize,
    /// Sleep between two ticks of the control loop.
    pub tick_interval_secs: u64,
    /// Optional reconnect policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub reconnect: Option<ReconnectConfig>,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            host: "localhost:8081".to_string(),
            username: "admin".to_string(),
            password: "adminadmin".to_string(),
            request_timeout_secs: 5,
            max_active_downloads: 10,
            max_resumed_torrents: 20,
            tick_interval_secs: 10,
            reconnect: None,
        }
    }
}

impl FleetConfig {
    /// Reject values the controller cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            anyhow::bail!("config: host must not be empty");
        }
        if self.tick_interval_secs == 0 {
            anyhow::bail!("config: tick_interval_secs must be at least 1");
        }
        if self.request_timeout_secs == 0 {
            anyhow::bail!("config: request_timeout_secs must be at least 1");
        }
        if self.reconnect_config().max_retries == 0 {
            anyhow::bail!("config: reconnect.max_retries must be at least 1");
        }
        Ok(())
    }

    pub fn budget(&self) -> Budget {
        Budget {
            max_active_downloads: self.max_active_downloads,
            max_resumed_torrents: self.max_resumed_torrents,
        }
    }

    pub fn reconnect_config(&self) -> ReconnectConfig {
        self.reconnect.clone().unwrap_or_default()
    }

    pub fn reconnect_policy(&self) -> ReconnectPolicy {
        let r = self.reconnect_config();
        ReconnectPolicy {
            max_attempts: r.max_retries,
            delay: Duration::from_secs(r.retry_delay_secs),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.tick_interval_secs)
    }

    /// Copy safe for printing: the password is masked.
    pub fn redacted(&self) -> FleetConfig {
        let mut cfg = self.clone();
        if !cfg.password.is_empty() {
            cfg.password = "********".to_string();
        }
        cfg
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("qbit-fleet")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from the default path, creating a default file if none exists.
pub fn load_or_init() -> Result<FleetConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = FleetConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from_path(&path)
}

/// Load configuration from an explicit path (`--config`). The file must exist.
pub fn load_from_path(path: &Path) -> Result<FleetConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let cfg: FleetConfig =
        toml::from_str(&data).with_context(|| format!("parsing config {}", path.display()))?;
    Ok(cfg)
}
