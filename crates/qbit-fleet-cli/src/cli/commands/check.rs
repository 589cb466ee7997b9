//! `qbit-fleet check`: verify Web UI access and credentials.

use anyhow::Result;
use qbit_fleet_core::config::FleetConfig;
use qbit_fleet_core::controller::blocking;

pub async fn run_check(cfg: &FleetConfig) -> Result<()> {
    let sup = super::connect(cfg, "check failed").await?;
    let (_, version) = blocking(sup, |s| s.version()).await?;
    println!("OK: qBittorrent {} at {} (user {})", version?, cfg.host, cfg.username);
    Ok(())
}
