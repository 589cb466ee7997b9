//! `qbit-fleet run`: connect, then run the admission controller.

use anyhow::Result;
use qbit_fleet_core::config::FleetConfig;
use qbit_fleet_core::controller::{blocking, run_tick, run_until, LoopSettings, TickMode};
use std::future::Future;

use crate::cli::signal::shutdown_signal;

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub once: bool,
    pub dry_run: bool,
}

pub async fn run_controller(cfg: &FleetConfig, opts: RunOptions) -> Result<()> {
    // Install signal handlers before the first blocking call.
    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
    tokio::spawn(async move {
        shutdown_signal().await;
        let _ = stop_tx.send(());
    });

    run_with_stop(cfg, opts, async move {
        let _ = stop_rx.await;
    })
    .await
}

/// Startup, the single `--once` tick and the loop all give way to `stop`.
///
/// A blocking engine call that loses the race keeps running on the blocking
/// pool; its result is discarded.
pub(crate) async fn run_with_stop<F>(cfg: &FleetConfig, opts: RunOptions, stop: F) -> Result<()>
where
    F: Future<Output = ()>,
{
    tokio::pin!(stop);

    let sup = super::supervisor(cfg)?;
    let (sup, connected) = tokio::select! {
        biased;
        _ = &mut stop => {
            tracing::info!(host = %cfg.host, "stopping torrent manager before startup completed");
            return Ok(());
        }
        r = blocking(sup, |s| s.connect()) => r?,
    };
    if let Err(e) = connected {
        return Err(super::startup_failure(
            cfg,
            e,
            "failed to connect to qBittorrent after startup retries",
        ));
    }

    let budget = cfg.budget();
    let mode = if opts.dry_run {
        TickMode::DryRun
    } else {
        TickMode::Enforce
    };

    if opts.once {
        let (_, outcome) = tokio::select! {
            biased;
            _ = &mut stop => {
                tracing::info!("stopping torrent manager during single tick");
                return Ok(());
            }
            r = blocking(sup, move |s| run_tick(s, &budget, mode)) => r?,
        };
        let report = outcome?;
        let c = report.plan.counts;
        println!(
            "active={} resumed={} paused={} completed={} paused_now={} resumed_now={}{}",
            c.active,
            c.resumed,
            c.paused,
            c.completed,
            report.plan.pause_for_active.len() + report.plan.pause_for_resumed.len(),
            report.plan.resume.len(),
            if report.issued { "" } else { " (dry run)" }
        );
        return Ok(());
    }

    tracing::info!(
        host = %cfg.host,
        max_active = budget.max_active_downloads,
        max_resumed = budget.max_resumed_torrents,
        interval_secs = cfg.tick_interval_secs,
        dry_run = opts.dry_run,
        "starting torrent manager"
    );
    let settings = LoopSettings {
        budget,
        interval: cfg.tick_interval(),
        mode,
    };
    let summary = run_until(sup, settings, stop).await?;
    tracing::info!(
        ticks = summary.ticks,
        failed_ticks = summary.failed_ticks,
        "torrent manager stopped"
    );
    Ok(())
}
