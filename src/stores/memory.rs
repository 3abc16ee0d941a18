//! In-memory store implementations.
//!
//! Used by the test suite, and by `voxgate serve` when no backend base URL
//! is configured. Each store carries a failure-injection slot so
//! orchestration and deletion semantics can be exercised without a network.

use super::{AgentStore, EmbedSettingsStore, RemoteAgentFields, RemotePlatform, WorkspaceStore};
use crate::agents::{AgentConfig, EmbedSettings};
use crate::errors::StoreError;

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// One-shot failure slot shared by the in-memory stores.
#[derive(Default)]
struct FailureSlot {
    next: Mutex<Option<StoreError>>,
}

impl FailureSlot {
    fn arm(&self, err: StoreError) {
        *self.next.lock() = Some(err);
    }

    fn take(&self) -> Option<StoreError> {
        self.next.lock().take()
    }
}

// ============================================================================
// Agent Store
// ============================================================================

#[derive(Default)]
pub struct MemoryAgentStore {
    agents: DashMap<String, AgentConfig>,
    failure: FailureSlot,
    delete_calls: AtomicU64,
}

impl MemoryAgentStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Fail the next store call with the given error.
    pub fn fail_next(&self, err: StoreError) {
        self.failure.arm(err);
    }

    /// Seed an agent directly, bypassing the orchestrator.
    pub fn insert(&self, config: AgentConfig) {
        self.agents.insert(config.id.clone(), config);
    }

    pub fn delete_calls(&self) -> u64 {
        self.delete_calls.load(Ordering::Relaxed)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.agents.contains_key(id)
    }
}

#[async_trait]
impl AgentStore for MemoryAgentStore {
    async fn create(&self, config: &AgentConfig) -> Result<String, StoreError> {
        if let Some(err) = self.failure.take() {
            return Err(err);
        }
        self.agents.insert(config.id.clone(), config.clone());
        Ok(config.id.clone())
    }

    async fn update(&self, id: &str, config: &AgentConfig) -> Result<AgentConfig, StoreError> {
        if let Some(err) = self.failure.take() {
            return Err(err);
        }
        if !self.agents.contains_key(id) {
            return Err(StoreError::NotFound);
        }
        self.agents.insert(id.to_string(), config.clone());
        Ok(config.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.delete_calls.fetch_add(1, Ordering::Relaxed);
        if let Some(err) = self.failure.take() {
            return Err(err);
        }
        self.agents
            .remove(id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    async fn get(&self, id: &str) -> Result<AgentConfig, StoreError> {
        if let Some(err) = self.failure.take() {
            return Err(err);
        }
        self.agents
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or(StoreError::NotFound)
    }

    async fn list(&self) -> Result<Vec<AgentConfig>, StoreError> {
        if let Some(err) = self.failure.take() {
            return Err(err);
        }
        Ok(self.agents.iter().map(|e| e.value().clone()).collect())
    }
}

// ============================================================================
// Workspace Assignment Store
// ============================================================================

#[derive(Default)]
pub struct MemoryWorkspaceStore {
    assignments: DashMap<String, Vec<String>>,
    failure: FailureSlot,
}

impl MemoryWorkspaceStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail_next(&self, err: StoreError) {
        self.failure.arm(err);
    }
}

#[async_trait]
impl WorkspaceStore for MemoryWorkspaceStore {
    async fn replace(&self, agent_id: &str, workspace_ids: &[String]) -> Result<(), StoreError> {
        if let Some(err) = self.failure.take() {
            return Err(err);
        }
        self.assignments
            .insert(agent_id.to_string(), workspace_ids.to_vec());
        Ok(())
    }

    async fn list(&self, agent_id: &str) -> Result<Vec<String>, StoreError> {
        if let Some(err) = self.failure.take() {
            return Err(err);
        }
        Ok(self
            .assignments
            .get(agent_id)
            .map(|e| e.value().clone())
            .unwrap_or_default())
    }
}

// ============================================================================
// Embed Settings Store
// ============================================================================

#[derive(Default)]
pub struct MemoryEmbedStore {
    settings: DashMap<String, EmbedSettings>,
    failure: FailureSlot,
}

impl MemoryEmbedStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail_next(&self, err: StoreError) {
        self.failure.arm(err);
    }
}

#[async_trait]
impl EmbedSettingsStore for MemoryEmbedStore {
    async fn update(
        &self,
        agent_id: &str,
        settings: &EmbedSettings,
    ) -> Result<EmbedSettings, StoreError> {
        if let Some(err) = self.failure.take() {
            return Err(err);
        }
        self.settings
            .insert(agent_id.to_string(), settings.clone());
        Ok(settings.clone())
    }

    async fn get(&self, agent_id: &str) -> Result<EmbedSettings, StoreError> {
        if let Some(err) = self.failure.take() {
            return Err(err);
        }
        Ok(self
            .settings
            .get(agent_id)
            .map(|e| e.value().clone())
            .unwrap_or_default())
    }
}

// ============================================================================
// Remote Platform
// ============================================================================

#[derive(Default)]
pub struct MemoryRemotePlatform {
    agents: DashMap<String, RemoteAgentFields>,
    failure: FailureSlot,
    create_calls: AtomicU64,
    update_calls: AtomicU64,
}

impl MemoryRemotePlatform {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail_next(&self, err: StoreError) {
        self.failure.arm(err);
    }

    pub fn create_calls(&self) -> u64 {
        self.create_calls.load(Ordering::Relaxed)
    }

    pub fn update_calls(&self) -> u64 {
        self.update_calls.load(Ordering::Relaxed)
    }

    pub fn fields(&self, remote_id: &str) -> Option<RemoteAgentFields> {
        self.agents.get(remote_id).map(|e| e.value().clone())
    }
}

#[async_trait]
impl RemotePlatform for MemoryRemotePlatform {
    async fn create_agent(&self, fields: &RemoteAgentFields) -> Result<String, StoreError> {
        self.create_calls.fetch_add(1, Ordering::Relaxed);
        if let Some(err) = self.failure.take() {
            return Err(err);
        }
        let remote_id = format!("ra_{}", uuid::Uuid::new_v4().simple());
        self.agents.insert(remote_id.clone(), fields.clone());
        Ok(remote_id)
    }

    async fn update_agent(
        &self,
        remote_id: &str,
        fields: &RemoteAgentFields,
    ) -> Result<(), StoreError> {
        self.update_calls.fetch_add(1, Ordering::Relaxed);
        if let Some(err) = self.failure.take() {
            return Err(err);
        }
        if !self.agents.contains_key(remote_id) {
            return Err(StoreError::NotFound);
        }
        self.agents.insert(remote_id.to_string(), fields.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn agent_store_round_trip() {
        let store = MemoryAgentStore::new();
        let agent = AgentConfig::new("Test");
        let id = store.create(&agent).await.unwrap();
        assert_eq!(id, agent.id);
        let fetched = store.get(&id).await.unwrap();
        assert_eq!(fetched.name, "Test");
        store.delete(&id).await.unwrap();
        assert!(matches!(
            store.get(&id).await,
            Err(StoreError::NotFound)
        ));
    }

    #[tokio::test]
    async fn failure_slot_fires_once() {
        let store = MemoryAgentStore::new();
        store.fail_next(StoreError::Transport("injected".into()));
        assert!(store.list().await.is_err());
        assert!(store.list().await.is_ok());
    }

    #[tokio::test]
    async fn workspace_replace_is_wholesale() {
        let store = MemoryWorkspaceStore::new();
        store
            .replace("a1", &["w1".to_string(), "w2".to_string()])
            .await
            .unwrap();
        store.replace("a1", &["w3".to_string()]).await.unwrap();
        assert_eq!(store.list("a1").await.unwrap(), vec!["w3"]);
    }
}
