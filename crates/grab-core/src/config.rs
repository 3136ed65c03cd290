use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Global configuration loaded from `~/.config/grab/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GrabConfig {
    /// Minimum interval between progress snapshots delivered to observers.
    pub ui_min_interval_ms: u64,
    /// Minimum interval between status-line/notification updates when the percent is unchanged.
    pub notify_min_interval_ms: u64,
    /// TCP/TLS connect timeout.
    pub connect_timeout_secs: u64,
    /// Abort when no data arrives for this long.
    pub read_timeout_secs: u64,
    /// Receive buffer size; progress is offered to the throttle once per buffer.
    pub buffer_size_bytes: usize,
    /// Destination directory override (None = `~/.local/share/grab/downloads`).
    pub download_dir: Option<PathBuf>,
}

impl Default for GrabConfig {
    fn default() -> Self {
        Self {
            ui_min_interval_ms: 100,
            notify_min_interval_ms: 300,
            connect_timeout_secs: 15,
            read_timeout_secs: 30,
            buffer_size_bytes: 8 * 1024,
            download_dir: None,
        }
    }
}

impl GrabConfig {
    pub fn ui_min_interval(&self) -> Duration {
        Duration::from_millis(self.ui_min_interval_ms)
    }

    pub fn notify_min_interval(&self) -> Duration {
        Duration::from_millis(self.notify_min_interval_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("grab")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<GrabConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = GrabConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: GrabConfig = toml::from_str(&data)?;
    Ok(cfg)
}
