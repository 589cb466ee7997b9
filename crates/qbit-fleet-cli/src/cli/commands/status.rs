//! `qbit-fleet status`: show every torrent with its bucket.

use anyhow::Result;
use qbit_fleet_core::classify::bucket_of;
use qbit_fleet_core::config::FleetConfig;
use qbit_fleet_core::controller::{blocking, plan_tick};
use qbit_fleet_core::priority::admission_order;

pub async fn run_status(cfg: &FleetConfig) -> Result<()> {
    let sup = super::connect(cfg, "status failed").await?;
    let (_, listed) = blocking(sup, |s| s.list_items()).await?;
    let items = listed?;

    if items.is_empty() {
        println!("No torrents on {}.", cfg.host);
        return Ok(());
    }

    println!(
        "{:<42} {:<14} {:>8} {:<20}",
        "HASH", "STATE", "PROGRESS", "BUCKET"
    );
    for item in admission_order(&items) {
        println!(
            "{:<42} {:<14} {:>7.1}% {:<20}",
            item.id,
            item.state.as_str(),
            item.progress() * 100.0,
            bucket_of(item).as_str()
        );
    }

    let budget = cfg.budget();
    let plan = plan_tick(&items, &budget);
    let c = plan.counts;
    println!();
    println!(
        "active downloads: {}/{}  resumed: {}/{}  paused: {}  completed: {}",
        c.active, budget.max_active_downloads, c.resumed, budget.max_resumed_torrents, c.paused, c.completed
    );
    if !plan.is_noop() {
        println!(
            "next tick would pause {} and resume {}",
            plan.pause_for_active.len() + plan.pause_for_resumed.len(),
            plan.resume.len()
        );
    }
    Ok(())
}
