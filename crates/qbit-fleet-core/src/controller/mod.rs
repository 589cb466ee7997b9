//! Admission controller.
//!
//! One tick: list → classify → plan → issue pause/resume batches → log status.
//! Planning is a pure function of the snapshot and the budget; ticks share no
//! state beyond what the engine reports, so a missed command is simply
//! re-planned on the next tick.

mod plan;
mod run;
mod tick;

pub use plan::{plan_tick, Budget, TickPlan};
pub use run::{blocking, run_until, LoopSettings, LoopSummary};
pub use tick::{run_tick, TickMode, TickReport};
