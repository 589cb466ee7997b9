//! Timer-driven control loop.
//!
//! Engine calls are blocking (libcurl), so each tick runs on the blocking pool
//! with the supervisor moved in and handed back. Shutdown is only observed at
//! the sleep point: a tick that has started always finishes.

use anyhow::{Context, Result};
use std::future::Future;
use std::time::Duration;

use crate::engine::Engine;
use crate::supervisor::Supervisor;

use super::plan::Budget;
use super::tick::{run_tick, TickMode};

#[derive(Debug, Clone, Copy)]
pub struct LoopSettings {
    pub budget: Budget,
    pub interval: Duration,
    pub mode: TickMode,
}

/// Tick counters returned when the loop stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopSummary {
    pub ticks: u64,
    pub failed_ticks: u64,
}

/// Run `f` against the supervisor on the blocking pool and hand both back.
pub async fn blocking<E, T, F>(mut sup: Supervisor<E>, f: F) -> Result<(Supervisor<E>, T)>
where
    E: Engine + Send + 'static,
    T: Send + 'static,
    F: FnOnce(&mut Supervisor<E>) -> T + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let out = f(&mut sup);
        (sup, out)
    })
    .await
    .context("engine task panicked")
}

/// Tick, sleep, repeat until `shutdown` resolves.
///
/// Tick failures are logged and absorbed; the only error returned is a
/// panicked tick task.
pub async fn run_until<E, F>(
    mut sup: Supervisor<E>,
    settings: LoopSettings,
    shutdown: F,
) -> Result<LoopSummary>
where
    E: Engine + Send + 'static,
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut summary = LoopSummary::default();
    let LoopSettings {
        budget,
        interval,
        mode,
    } = settings;

    loop {
        let (back, outcome) = blocking(sup, move |s| run_tick(s, &budget, mode)).await?;
        sup = back;
        summary.ticks += 1;
        if let Err(e) = outcome {
            summary.failed_ticks += 1;
            tracing::error!("error managing torrents: {}", e);
        }

        tokio::select! {
            biased;
            _ = &mut shutdown => {
                tracing::info!(ticks = summary.ticks, "stopping torrent manager");
                return Ok(summary);
            }
            _ = tokio::time::sleep(interval) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::scripted::{item, Call, ScriptedEngine};
    use crate::engine::TransportError;
    use crate::item::ItemId;
    use crate::supervisor::ReconnectPolicy;

    fn settings(interval_ms: u64) -> LoopSettings {
        LoopSettings {
            budget: Budget {
                max_active_downloads: 1,
                max_resumed_torrents: 5,
            },
            interval: Duration::from_millis(interval_ms),
            mode: TickMode::Enforce,
        }
    }

    fn engine() -> ScriptedEngine {
        let engine = ScriptedEngine::with_items(vec![
            item("a", 0.1, 1, "downloading"),
            item("b", 0.5, 2, "downloading"),
        ]);
        engine.script().apply_commands = true;
        engine
    }

    fn policy() -> ReconnectPolicy {
        ReconnectPolicy {
            max_attempts: 1,
            delay: Duration::ZERO,
        }
    }

    #[tokio::test]
    async fn pending_shutdown_stops_after_current_tick() {
        let eng = engine();
        let sup = Supervisor::new(eng.clone(), policy());
        let summary = run_until(sup, settings(10_000), std::future::ready(()))
            .await
            .unwrap();
        assert_eq!(summary, LoopSummary { ticks: 1, failed_ticks: 0 });
        assert_eq!(eng.script().calls, vec![Call::Pause(vec![ItemId::new("b")])]);
    }

    #[tokio::test]
    async fn loop_keeps_ticking_until_shutdown() {
        let eng = engine();
        let sup = Supervisor::new(eng.clone(), policy());
        let shutdown = tokio::time::sleep(Duration::from_millis(200));
        let summary = run_until(sup, settings(5), shutdown).await.unwrap();
        assert!(summary.ticks >= 2, "ticks = {}", summary.ticks);
        assert_eq!(summary.failed_ticks, 0);
        // The first tick enforces the active limit.
        let calls = eng.script().calls.clone();
        assert_eq!(calls[0], Call::Pause(vec![ItemId::new("b")]));
    }

    #[tokio::test]
    async fn failing_ticks_do_not_stop_the_loop() {
        let eng = engine();
        eng.script().list_failures.push_back(TransportError::Timeout);
        let sup = Supervisor::new(eng.clone(), policy());
        let shutdown = tokio::time::sleep(Duration::from_millis(200));
        let summary = run_until(sup, settings(5), shutdown).await.unwrap();
        assert_eq!(summary.failed_ticks, 1);
        assert!(summary.ticks > summary.failed_ticks);
        assert!(!eng.script().calls.is_empty());
    }
}
