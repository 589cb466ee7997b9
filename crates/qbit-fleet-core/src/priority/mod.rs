//! Priority ordering used for admission and eviction.
//!
//! Admission favours the least complete and oldest torrents; eviction is the
//! exact reverse, so the most complete and newest torrents are paused first.
//! Equal `(progress, added_at)` keys fall back to the hash so the order is total.

use std::cmp::Ordering;

use crate::item::{Item, ItemId};

/// Ascending `(progress, added_at)`, then hash.
pub fn admission_cmp(a: &Item, b: &Item) -> Ordering {
    a.progress()
        .total_cmp(&b.progress())
        .then(a.added_at.cmp(&b.added_at))
        .then_with(|| a.id.cmp(&b.id))
}

/// Descending `(progress, added_at)`, then hash.
pub fn eviction_cmp(a: &Item, b: &Item) -> Ordering {
    admission_cmp(b, a)
}

pub fn admission_order<'a>(items: impl IntoIterator<Item = &'a Item>) -> Vec<&'a Item> {
    let mut v: Vec<&Item> = items.into_iter().collect();
    v.sort_by(|a, b| admission_cmp(a, b));
    v
}

pub fn eviction_order<'a>(items: impl IntoIterator<Item = &'a Item>) -> Vec<&'a Item> {
    let mut v: Vec<&Item> = items.into_iter().collect();
    v.sort_by(|a, b| eviction_cmp(a, b));
    v
}

/// Items to pause so that `items` fits in `budget`: the `len - budget`
/// first in eviction order, i.e. everything ranked past the budget cutoff in
/// admission order. Empty when already within budget.
pub fn select_evictions<'a>(items: impl IntoIterator<Item = &'a Item>, budget: usize) -> Vec<ItemId> {
    let ordered = eviction_order(items);
    let excess = ordered.len().saturating_sub(budget);
    ordered[..excess].iter().map(|i| i.id.clone()).collect()
}

/// Up to `slots` paused items to resume, best admission candidates first.
pub fn select_admissions<'a>(items: impl IntoIterator<Item = &'a Item>, slots: usize) -> Vec<ItemId> {
    admission_order(items)
        .into_iter()
        .take(slots)
        .map(|i| i.id.clone())
        .collect()
}
