//! Guarded read paths for agent views.
//!
//! Every read consults the per-agent deletion guard before fetching, races
//! the fetch against the guard's cancellation future, and applies the result
//! to the cache through an epoch compare-and-set. A read that would
//! otherwise retry on failure checks both the guard and the failure status:
//! once deletion is in progress, or the resource is confirmed gone, no retry
//! is issued.

use crate::agents::AgentConfig;
use crate::cache::AgentViewCache;
use crate::config::DEFAULT_READ_RETRIES;
use crate::errors::{EngineError, StoreError};
use crate::infra::DeletionGuards;
use crate::stores::{AgentStore, WorkspaceStore};

use std::sync::Arc;
use tracing::debug;

pub struct AgentReader {
    agents: Arc<dyn AgentStore>,
    workspaces: Arc<dyn WorkspaceStore>,
    cache: Arc<AgentViewCache>,
    guards: Arc<DeletionGuards>,
    max_retries: u32,
}

impl AgentReader {
    pub fn new(
        agents: Arc<dyn AgentStore>,
        workspaces: Arc<dyn WorkspaceStore>,
        cache: Arc<AgentViewCache>,
        guards: Arc<DeletionGuards>,
    ) -> Self {
        Self {
            agents,
            workspaces,
            cache,
            guards,
            max_retries: DEFAULT_READ_RETRIES,
        }
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Fetch the agent detail, consulting cache and deletion guard.
    pub async fn get_agent(&self, id: &str) -> Result<AgentConfig, EngineError> {
        if self.guards.is_deleting(id) {
            return Err(EngineError::StaleRead);
        }
        if let Some(hit) = self.cache.agent(id) {
            return Ok(hit);
        }

        let guard = self.guards.guard(id);
        let epoch = self.cache.epoch(id);
        let mut attempts = 0u32;

        loop {
            let result = tokio::select! {
                r = self.agents.get(id) => r,
                _ = guard.cancelled() => {
                    debug!("agent read cancelled mid-flight: {id}");
                    return Err(EngineError::StaleRead);
                }
            };

            match result {
                Ok(config) => {
                    // The transport call is not interruptible; a deletion
                    // confirmed while it ran means the result must not be
                    // applied or returned.
                    if guard.is_deleting() {
                        return Err(EngineError::StaleRead);
                    }
                    self.cache.put_agent_if_current(id, config.clone(), epoch);
                    return Ok(config);
                }
                Err(err) => {
                    if guard.is_deleting() {
                        return Err(EngineError::StaleRead);
                    }
                    if err.is_confirmed_gone() {
                        return Err(EngineError::NotFound);
                    }
                    attempts += 1;
                    if attempts > self.max_retries {
                        return Err(EngineError::Read(err));
                    }
                    debug!("retrying agent read for {id} (attempt {attempts}): {err}");
                }
            }
        }
    }

    /// Fetch the workspace assignment under the same guard discipline.
    pub async fn get_assignment(&self, id: &str) -> Result<Vec<String>, EngineError> {
        if self.guards.is_deleting(id) {
            return Err(EngineError::StaleRead);
        }
        if let Some(hit) = self.cache.assignment(id) {
            return Ok(hit);
        }

        let guard = self.guards.guard(id);
        let epoch = self.cache.epoch(id);
        let mut attempts = 0u32;

        loop {
            let result = tokio::select! {
                r = self.workspaces.list(id) => r,
                _ = guard.cancelled() => return Err(EngineError::StaleRead),
            };

            match result {
                Ok(workspace_ids) => {
                    if guard.is_deleting() {
                        return Err(EngineError::StaleRead);
                    }
                    self.cache
                        .put_assignment_if_current(id, workspace_ids.clone(), epoch);
                    return Ok(workspace_ids);
                }
                Err(err) => {
                    if guard.is_deleting() {
                        return Err(EngineError::StaleRead);
                    }
                    if err.is_confirmed_gone() {
                        return Err(EngineError::NotFound);
                    }
                    attempts += 1;
                    if attempts > self.max_retries {
                        return Err(EngineError::Read(err));
                    }
                }
            }
        }
    }

    /// Fetch the agent collection listing. Agents mid-deletion are filtered
    /// out; a listing fetched before a deletion landed is discarded by the
    /// collection epoch check rather than applied.
    pub async fn list_agents(&self) -> Result<Vec<AgentConfig>, EngineError> {
        if let Some(hit) = self.cache.collection() {
            return Ok(hit);
        }

        let epoch = self.cache.collection_epoch();
        let listing = self
            .agents
            .list()
            .await
            .map_err(map_list_error)?;
        let listing: Vec<AgentConfig> = listing
            .into_iter()
            .filter(|agent| !self.guards.is_deleting(&agent.id))
            .collect();

        self.cache.put_collection_if_current(listing.clone(), epoch);
        Ok(listing)
    }
}

fn map_list_error(err: StoreError) -> EngineError {
    match err {
        StoreError::NotFound => EngineError::NotFound,
        other => EngineError::Read(other),
    }
}
