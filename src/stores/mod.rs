//! External resource store contracts.
//!
//! The agent, workspace-assignment, and embed-settings stores are
//! independently-stored collaborators: the engine consumes their
//! create/read/update/delete contracts and owns no wire format of its own.
//! The remote platform is the external voice-orchestration system the
//! configuration is mirrored into.

mod http;
mod memory;

pub use http::{HttpAgentStore, HttpEmbedStore, HttpRemotePlatform, HttpWorkspaceStore};
pub use memory::{MemoryAgentStore, MemoryEmbedStore, MemoryRemotePlatform, MemoryWorkspaceStore};

use crate::agents::{AgentConfig, EmbedSettings};
use crate::errors::StoreError;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// ============================================================================
// Store Traits
// ============================================================================

#[async_trait]
pub trait AgentStore: Send + Sync {
    async fn create(&self, config: &AgentConfig) -> Result<String, StoreError>;
    async fn update(&self, id: &str, config: &AgentConfig) -> Result<AgentConfig, StoreError>;
    async fn delete(&self, id: &str) -> Result<(), StoreError>;
    async fn get(&self, id: &str) -> Result<AgentConfig, StoreError>;
    async fn list(&self) -> Result<Vec<AgentConfig>, StoreError>;
}

#[async_trait]
pub trait WorkspaceStore: Send + Sync {
    /// Replace the full workspace membership for an agent. Never diffed.
    async fn replace(&self, agent_id: &str, workspace_ids: &[String]) -> Result<(), StoreError>;
    async fn list(&self, agent_id: &str) -> Result<Vec<String>, StoreError>;
}

#[async_trait]
pub trait EmbedSettingsStore: Send + Sync {
    async fn update(
        &self,
        agent_id: &str,
        settings: &EmbedSettings,
    ) -> Result<EmbedSettings, StoreError>;
    async fn get(&self, agent_id: &str) -> Result<EmbedSettings, StoreError>;
}

// ============================================================================
// Remote Platform
// ============================================================================

/// The field subset the remote platform understands: conversational timing
/// plus model and voice selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteAgentFields {
    pub name: String,
    pub language: String,
    pub model: String,
    pub voice_id: Option<String>,
    pub responsiveness: f64,
    pub interruption_sensitivity: f64,
    pub backchannel_enabled: bool,
}

impl From<&AgentConfig> for RemoteAgentFields {
    fn from(config: &AgentConfig) -> Self {
        Self {
            name: config.name.clone(),
            language: config.language.clone(),
            model: config.llm_model.clone(),
            voice_id: config.voice_id.clone(),
            responsiveness: config.responsiveness,
            interruption_sensitivity: config.interruption_sensitivity,
            backchannel_enabled: config.backchannel_enabled,
        }
    }
}

#[async_trait]
pub trait RemotePlatform: Send + Sync {
    /// Create the mirrored agent; returns the remote identifier.
    async fn create_agent(&self, fields: &RemoteAgentFields) -> Result<String, StoreError>;
    /// Update the mirrored agent. Safe to repeat without intervening local
    /// changes.
    async fn update_agent(
        &self,
        remote_id: &str,
        fields: &RemoteAgentFields,
    ) -> Result<(), StoreError>;
}
