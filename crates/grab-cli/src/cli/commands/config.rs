//! `grab config` – show where the config lives and what is in effect.

use anyhow::Result;
use grab_core::config::{self, GrabConfig};
use grab_core::EngineOptions;

pub fn run_config(cfg: &GrabConfig) -> Result<()> {
    let path = config::config_path()?;
    let effective = EngineOptions::from_config(cfg);
    println!("Config file:      {}", path.display());
    println!("Download dir:     {}", effective.download_dir.display());
    println!("UI interval:      {} ms", cfg.ui_min_interval_ms);
    println!("Notify interval:  {} ms", cfg.notify_min_interval_ms);
    println!("Connect timeout:  {} s", cfg.connect_timeout_secs);
    println!("Read timeout:     {} s", cfg.read_timeout_secs);
    println!("Buffer size:      {} B", cfg.buffer_size_bytes);
    Ok(())
}
