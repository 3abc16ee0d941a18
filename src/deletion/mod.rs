//! Deletion coordination.
//!
//! Deleting an agent must not race against reads that could re-fetch it and
//! repopulate the cache mid-teardown. The sequence is strict:
//!
//! 1. Flip the per-agent deleting flag synchronously, before any await.
//! 2. Wake in-flight reads so they observe the flag and drop their results.
//! 3. Evict the cached agent and assignment; optimistically remove the
//!    agent from any cached collection listing.
//! 4. Retry suppression is enforced by the read paths via the guard.
//! 5. Issue the store delete last. The caller navigates away on success and
//!    failure alike; the outcome distinguishes the two so a list view can
//!    surface a failed delete if it chooses to.
//!
//! Asynchronous cancellation alone cannot close the window between the
//! user's confirmation and the cancellation landing; the synchronous flag
//! exists for exactly that gap.

use crate::cache::AgentViewCache;
use crate::infra::DeletionGuards;
use crate::stores::AgentStore;

use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

/// Result of a delete operation. `deleted` reflects local teardown, which
/// always happens; `remote_error` is set when the store delete call failed
/// after teardown.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOutcome {
    pub deleted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_error: Option<String>,
}

pub struct DeletionCoordinator {
    agents: Arc<dyn AgentStore>,
    cache: Arc<AgentViewCache>,
    guards: Arc<DeletionGuards>,
}

impl DeletionCoordinator {
    pub fn new(
        agents: Arc<dyn AgentStore>,
        cache: Arc<AgentViewCache>,
        guards: Arc<DeletionGuards>,
    ) -> Self {
        Self {
            agents,
            cache,
            guards,
        }
    }

    /// Delete an agent. The transition to deleting is one-way per agent;
    /// everything before the store call is synchronous.
    pub async fn delete_agent(&self, id: &str) -> DeleteOutcome {
        // Step 1: the flag store completes before anything else runs.
        let guard = self.guards.mark_deleting(id);

        // Step 2: wake reads already parked on this agent.
        guard.cancel_inflight();

        // Step 3: evict detail views and the collection entry.
        self.cache.evict_for_delete(id);

        // Step 5: the only await point in the whole sequence.
        match self.agents.delete(id).await {
            Ok(()) => {
                info!("agent {id} deleted");
                DeleteOutcome {
                    deleted: true,
                    remote_error: None,
                }
            }
            Err(err) => {
                // Local teardown stands; the list reload is the source of
                // truth for whatever state the store is actually in.
                warn!("agent {id} delete call failed: {err}");
                DeleteOutcome {
                    deleted: true,
                    remote_error: Some(err.to_string()),
                }
            }
        }
    }
}
