//! Cached views of agent configuration.
//!
//! The cache holds the agent detail, its workspace assignment, and the agent
//! collection listing. Every mutation that repopulates an entry is a
//! compare-and-set against the epoch captured when the read began: a
//! deletion (or invalidation) that landed mid-flight bumped the epoch, so
//! the late write is discarded instead of resurrecting a dead resource.

use crate::agents::AgentConfig;

use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Default)]
pub struct AgentViewCache {
    epochs: DashMap<String, u64>,
    agents: DashMap<String, AgentConfig>,
    assignments: DashMap<String, Vec<String>>,
    collection: RwLock<Option<Vec<AgentConfig>>>,
    collection_epoch: AtomicU64,
}

impl AgentViewCache {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Epochs
    // ------------------------------------------------------------------

    /// Current epoch for an agent id. Capture before a fetch; pass back to
    /// the `put_*_if_current` call that applies the result.
    pub fn epoch(&self, id: &str) -> u64 {
        self.epochs.get(id).map(|e| *e.value()).unwrap_or(0)
    }

    /// Current epoch for the collection listing.
    pub fn collection_epoch(&self) -> u64 {
        self.collection_epoch.load(Ordering::Acquire)
    }

    fn bump_epoch(&self, id: &str) {
        *self.epochs.entry(id.to_string()).or_insert(0) += 1;
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    pub fn agent(&self, id: &str) -> Option<AgentConfig> {
        self.agents.get(id).map(|e| e.value().clone())
    }

    pub fn assignment(&self, id: &str) -> Option<Vec<String>> {
        self.assignments.get(id).map(|e| e.value().clone())
    }

    pub fn collection(&self) -> Option<Vec<AgentConfig>> {
        self.collection.read().clone()
    }

    // ------------------------------------------------------------------
    // Guarded Writes
    // ------------------------------------------------------------------

    /// Store the agent detail if no invalidation landed since
    /// `expected_epoch` was captured. Returns whether the write applied.
    pub fn put_agent_if_current(
        &self,
        id: &str,
        config: AgentConfig,
        expected_epoch: u64,
    ) -> bool {
        // Hold the epoch entry while inserting so a concurrent bump cannot
        // interleave between the comparison and the write.
        let entry = self.epochs.entry(id.to_string()).or_insert(0);
        if *entry.value() != expected_epoch {
            return false;
        }
        self.agents.insert(id.to_string(), config);
        true
    }

    /// Store the workspace assignment under the same epoch discipline.
    pub fn put_assignment_if_current(
        &self,
        id: &str,
        workspace_ids: Vec<String>,
        expected_epoch: u64,
    ) -> bool {
        let entry = self.epochs.entry(id.to_string()).or_insert(0);
        if *entry.value() != expected_epoch {
            return false;
        }
        self.assignments.insert(id.to_string(), workspace_ids);
        true
    }

    /// Store the collection listing if it has not been invalidated since the
    /// fetch began.
    pub fn put_collection_if_current(
        &self,
        agents: Vec<AgentConfig>,
        expected_epoch: u64,
    ) -> bool {
        let mut slot = self.collection.write();
        if self.collection_epoch.load(Ordering::Acquire) != expected_epoch {
            return false;
        }
        *slot = Some(agents);
        true
    }

    // ------------------------------------------------------------------
    // Invalidation & Eviction
    // ------------------------------------------------------------------

    /// Drop the cached detail views for an agent after a successful save.
    /// The next read refetches.
    pub fn invalidate_agent(&self, id: &str) {
        self.bump_epoch(id);
        self.agents.remove(id);
        self.assignments.remove(id);
    }

    /// Drop the cached collection listing.
    pub fn invalidate_collection(&self) {
        self.collection_epoch.fetch_add(1, Ordering::AcqRel);
        *self.collection.write() = None;
    }

    /// Deletion-path eviction: bump the epoch, evict (not merely mark stale)
    /// the agent and its assignment, and optimistically remove the agent
    /// from any cached collection listing.
    pub fn evict_for_delete(&self, id: &str) {
        self.bump_epoch(id);
        self.agents.remove(id);
        self.assignments.remove(id);
        self.collection_epoch.fetch_add(1, Ordering::AcqRel);
        let mut slot = self.collection.write();
        if let Some(list) = slot.as_mut() {
            list.retain(|agent| agent.id != id);
        }
    }
}
