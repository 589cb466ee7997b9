//! Torrents as the engine reports them.
//!
//! The engine owns every item; the controller only reads snapshots and
//! sends pause/resume intents keyed by [`ItemId`].

mod state;

pub use state::EngineState;

use std::fmt;

/// Opaque content hash identifying one torrent in the engine.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Snapshot of one torrent taken during a tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: ItemId,
    /// Unix timestamp assigned by the engine when the torrent was added.
    pub added_at: i64,
    /// Fraction complete in [0.0, 1.0].
    pub progress: f64,
    pub size_bytes: u64,
    pub state: EngineState,
}

impl Item {
    /// Progress reported by the engine, clamped to [0.0, 1.0]; NaN counts as 0.
    pub fn progress(&self) -> f64 {
        if self.progress.is_nan() {
            return 0.0;
        }
        self.progress.clamp(0.0, 1.0)
    }
}
