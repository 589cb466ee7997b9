//! Per-tick classification of the engine snapshot into buckets.
//!
//! Completion is decided first; completed torrents never count against a
//! budget. Every actively downloading torrent is also counted as
//! resumed-incomplete, since the two budgets limit different resources
//! (transfer slots vs. incomplete torrents the engine keeps running).

use crate::item::Item;

/// Exactly one bucket per item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    /// Incomplete and holding a transfer slot (`downloading`, `stalledDL`).
    ActiveDownloading,
    /// Incomplete, not paused, but not transferring (queued, checking, metadata...).
    ResumedIncomplete,
    /// Incomplete and paused, errored or missing files.
    PausedIncomplete,
    /// Finished or seeding.
    Completed,
}

impl Bucket {
    pub fn as_str(self) -> &'static str {
        match self {
            Bucket::ActiveDownloading => "active",
            Bucket::ResumedIncomplete => "resumed",
            Bucket::PausedIncomplete => "paused",
            Bucket::Completed => "completed",
        }
    }

    /// True for buckets counted against `max_resumed_torrents`.
    pub fn counts_as_resumed(self) -> bool {
        matches!(self, Bucket::ActiveDownloading | Bucket::ResumedIncomplete)
    }
}

/// Bucket for a single item; a pure function of `(progress, state)`.
pub fn bucket_of(item: &Item) -> Bucket {
    if item.progress() >= 1.0 || item.state.is_seeding() {
        return Bucket::Completed;
    }
    if item.state.is_transferring() {
        return Bucket::ActiveDownloading;
    }
    if item.state.is_halted() {
        return Bucket::PausedIncomplete;
    }
    Bucket::ResumedIncomplete
}

/// Bucket sizes, as logged in the per-tick status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BucketCounts {
    pub active: usize,
    /// Includes the active ones.
    pub resumed: usize,
    pub paused: usize,
    pub completed: usize,
}

/// A snapshot split into buckets. Items keep the engine's order.
#[derive(Debug, Clone, Default)]
pub struct Classified {
    active: Vec<Item>,
    resumed_idle: Vec<Item>,
    paused: Vec<Item>,
    completed: Vec<Item>,
}

impl Classified {
    pub fn active(&self) -> &[Item] {
        &self.active
    }

    /// Every incomplete, unpaused item: active ones first, then the rest.
    pub fn resumed(&self) -> impl Iterator<Item = &Item> {
        self.active.iter().chain(self.resumed_idle.iter())
    }

    pub fn paused(&self) -> &[Item] {
        &self.paused
    }

    pub fn completed(&self) -> &[Item] {
        &self.completed
    }

    pub fn counts(&self) -> BucketCounts {
        BucketCounts {
            active: self.active.len(),
            resumed: self.active.len() + self.resumed_idle.len(),
            paused: self.paused.len(),
            completed: self.completed.len(),
        }
    }
}

/// Split a snapshot into buckets.
pub fn classify(items: &[Item]) -> Classified {
    let mut out = Classified::default();
    for item in items {
        let slot = match bucket_of(item) {
            Bucket::ActiveDownloading => &mut out.active,
            Bucket::ResumedIncomplete => &mut out.resumed_idle,
            Bucket::PausedIncomplete => &mut out.paused,
            Bucket::Completed => &mut out.completed,
        };
        slot.push(item.clone());
    }
    out
}
