use crate::classify::{classify, BucketCounts};
use crate::item::{Item, ItemId};
use crate::priority::{select_admissions, select_evictions};

/// Upper bounds on the two budgeted buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Budget {
    pub max_active_downloads: usize,
    pub max_resumed_torrents: usize,
}

/// What one tick intends to do.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickPlan {
    pub counts: BucketCounts,
    /// Evictions that bring active downloads back under budget.
    pub pause_for_active: Vec<ItemId>,
    /// Evictions that bring resumed-incomplete torrents back under budget.
    /// May overlap with `pause_for_active`.
    pub pause_for_resumed: Vec<ItemId>,
    /// Admissions into spare resumed capacity.
    pub resume: Vec<ItemId>,
}

impl TickPlan {
    pub fn is_noop(&self) -> bool {
        self.pause_for_active.is_empty() && self.pause_for_resumed.is_empty() && self.resume.is_empty()
    }
}

/// Plan a tick from a full engine snapshot.
///
/// Spare capacity is computed from the counts before any eviction, so a tick
/// that pauses for the resumed budget never resumes anything.
pub fn plan_tick(items: &[Item], budget: &Budget) -> TickPlan {
    let buckets = classify(items);
    let counts = buckets.counts();

    let pause_for_active = select_evictions(buckets.active(), budget.max_active_downloads);
    let pause_for_resumed = select_evictions(buckets.resumed(), budget.max_resumed_torrents);

    let spare = budget.max_resumed_torrents.saturating_sub(counts.resumed);
    let resume = select_admissions(buckets.paused(), spare);

    TickPlan {
        counts,
        pause_for_active,
        pause_for_resumed,
        resume,
    }
}
