//! Recent selection history
//!
//! A move-to-front list of selected records, unique by id and capped at
//! [`RECENT_CAPACITY`] entries.

use crate::store::RecordId;
use chrono::{DateTime, Utc};
use serde::Serialize;

pub const RECENT_CAPACITY: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecentTarget {
    pub id: RecordId,
    pub name: String,
    pub selected_at: DateTime<Utc>,
}

/// Recently selected records, most recent first
#[derive(Debug, Default)]
pub struct RecentTargets {
    entries: Vec<RecentTarget>,
}

impl RecentTargets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a selection, moving an existing entry for `id` to the front
    pub fn select(&mut self, id: RecordId, name: &str, now: DateTime<Utc>) -> &[RecentTarget] {
        self.entries.retain(|t| t.id != id);
        self.entries.insert(
            0,
            RecentTarget {
                id,
                name: name.to_string(),
                selected_at: now,
            },
        );
        self.entries.truncate(RECENT_CAPACITY);
        &self.entries
    }

    /// Drop the entry for `id`, if any
    pub fn remove(&mut self, id: RecordId) -> &[RecentTarget] {
        self.entries.retain(|t| t.id != id);
        &self.entries
    }

    pub fn entries(&self) -> &[RecentTarget] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
