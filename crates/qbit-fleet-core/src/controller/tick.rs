use crate::engine::{Engine, EngineError};
use crate::supervisor::Supervisor;

use super::plan::{plan_tick, Budget, TickPlan};

/// Whether a tick issues its plan or only logs it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TickMode {
    #[default]
    Enforce,
    DryRun,
}

#[derive(Debug, Clone)]
pub struct TickReport {
    pub plan: TickPlan,
    /// False in dry-run mode.
    pub issued: bool,
}

/// Run one tick: snapshot, plan, then pause and resume batches in that order.
///
/// The first failing call abandons the rest of the tick; the caller logs it and
/// the next tick re-plans from fresh engine state.
pub fn run_tick<E: Engine>(
    sup: &mut Supervisor<E>,
    budget: &Budget,
    mode: TickMode,
) -> Result<TickReport, EngineError> {
    let items = sup.list_items()?;
    let plan = plan_tick(&items, budget);

    match mode {
        TickMode::Enforce => issue(sup, &plan)?,
        TickMode::DryRun => {
            for (what, ids) in [
                ("pause (active limit)", &plan.pause_for_active),
                ("pause (resumed limit)", &plan.pause_for_resumed),
                ("resume", &plan.resume),
            ] {
                if !ids.is_empty() {
                    tracing::info!(count = ids.len(), "dry run: would {} {:?}", what, ids);
                }
            }
        }
    }

    let c = &plan.counts;
    tracing::info!(
        active = c.active,
        resumed = c.resumed,
        paused = c.paused,
        completed = c.completed,
        "status: active downloads {}/{}, resumed incomplete {}/{}, paused incomplete {}, completed/seeding {}",
        c.active,
        budget.max_active_downloads,
        c.resumed,
        budget.max_resumed_torrents,
        c.paused,
        c.completed
    );

    Ok(TickReport {
        plan,
        issued: mode == TickMode::Enforce,
    })
}

fn issue<E: Engine>(sup: &mut Supervisor<E>, plan: &TickPlan) -> Result<(), EngineError> {
    if !plan.pause_for_active.is_empty() {
        sup.pause(&plan.pause_for_active)?;
        tracing::info!(
            count = plan.pause_for_active.len(),
            "paused {} torrents to maintain active download limit",
            plan.pause_for_active.len()
        );
    }
    if !plan.pause_for_resumed.is_empty() {
        sup.pause(&plan.pause_for_resumed)?;
        tracing::info!(
            count = plan.pause_for_resumed.len(),
            "paused {} torrents to maintain resumed torrent limit",
            plan.pause_for_resumed.len()
        );
    }
    if !plan.resume.is_empty() {
        sup.resume(&plan.resume)?;
        tracing::info!(
            count = plan.resume.len(),
            "resumed {} torrents to use available slots",
            plan.resume.len()
        );
    }
    Ok(())
}
