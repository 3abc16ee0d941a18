//! Remote platform reconciliation.
//!
//! Each agent is mirrored into the external voice-orchestration platform.
//! The binding is two-state: unbound (no remote identifier recorded) and
//! bound (identifier present). `reconcile` is create-or-update: create when
//! unbound, recording the returned identifier; an idempotent field-subset
//! update when bound. A failure in either branch leaves the binding
//! unchanged and is reported as a retryable sync error; it never blocks or
//! undoes a local save.

use crate::agents::{AgentConfig, RemoteBinding};
use crate::errors::EngineError;
use crate::stores::{RemoteAgentFields, RemotePlatform};

use dashmap::DashMap;
use std::sync::Arc;
use tracing::{info, warn};

pub struct RemoteReconciler {
    platform: Arc<dyn RemotePlatform>,
    bindings: DashMap<String, RemoteBinding>,
}

impl RemoteReconciler {
    pub fn new(platform: Arc<dyn RemotePlatform>) -> Self {
        Self {
            platform,
            bindings: DashMap::new(),
        }
    }

    /// The current binding for an agent (unbound if never reconciled).
    pub fn binding(&self, agent_id: &str) -> RemoteBinding {
        self.bindings
            .get(agent_id)
            .map(|e| e.value().clone())
            .unwrap_or_default()
    }

    /// Restore a binding recorded elsewhere (e.g. loaded with the agent).
    pub fn restore_binding(&self, agent_id: &str, binding: RemoteBinding) {
        self.bindings.insert(agent_id.to_string(), binding);
    }

    /// Bring the remote mirror up to date with the local configuration.
    ///
    /// Safe to call repeatedly without intervening local changes: the first
    /// call on an unbound agent creates, every later call updates.
    pub async fn reconcile(&self, config: &AgentConfig) -> Result<RemoteBinding, EngineError> {
        let fields = RemoteAgentFields::from(config);
        let current = self.binding(&config.id);

        match current.remote_id {
            None => {
                let remote_id = self
                    .platform
                    .create_agent(&fields)
                    .await
                    .map_err(EngineError::RemoteReconciliation)?;
                info!("agent {} bound to remote {remote_id}", config.id);
                let binding = RemoteBinding {
                    remote_id: Some(remote_id),
                };
                self.bindings.insert(config.id.clone(), binding.clone());
                Ok(binding)
            }
            Some(ref remote_id) => {
                self.platform
                    .update_agent(remote_id, &fields)
                    .await
                    .map_err(|err| {
                        warn!("agent {} remote update failed: {err}", config.id);
                        EngineError::RemoteReconciliation(err)
                    })?;
                Ok(current)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::StoreError;
    use crate::stores::MemoryRemotePlatform;

    fn agent() -> AgentConfig {
        let mut config = AgentConfig::new("Sync me");
        config.system_prompt = "You answer calls for the clinic.".to_string();
        config
    }

    #[tokio::test]
    async fn first_reconcile_creates_then_updates() {
        let platform = MemoryRemotePlatform::new();
        let reconciler = RemoteReconciler::new(platform.clone());
        let config = agent();

        let binding = reconciler.reconcile(&config).await.unwrap();
        assert!(binding.is_bound());
        assert_eq!(platform.create_calls(), 1);
        assert_eq!(platform.update_calls(), 0);

        // Called again with no local change: exactly one create, ever.
        let second = reconciler.reconcile(&config).await.unwrap();
        assert_eq!(second, binding);
        assert_eq!(platform.create_calls(), 1);
        assert_eq!(platform.update_calls(), 1);
    }

    #[tokio::test]
    async fn failed_create_leaves_agent_unbound() {
        let platform = MemoryRemotePlatform::new();
        platform.fail_next(StoreError::Upstream {
            status: 502,
            message: "bad gateway".into(),
        });
        let reconciler = RemoteReconciler::new(platform.clone());
        let config = agent();

        let result = reconciler.reconcile(&config).await;
        assert!(matches!(
            result,
            Err(EngineError::RemoteReconciliation(_))
        ));
        assert!(!reconciler.binding(&config.id).is_bound());

        // Retry succeeds and binds.
        let binding = reconciler.reconcile(&config).await.unwrap();
        assert!(binding.is_bound());
        assert_eq!(platform.create_calls(), 2);
    }

    #[tokio::test]
    async fn failed_update_keeps_existing_binding() {
        let platform = MemoryRemotePlatform::new();
        let reconciler = RemoteReconciler::new(platform.clone());
        let config = agent();

        let binding = reconciler.reconcile(&config).await.unwrap();
        platform.fail_next(StoreError::Transport("timeout".into()));

        let result = reconciler.reconcile(&config).await;
        assert!(result.is_err());
        assert_eq!(reconciler.binding(&config.id), binding);
    }

    #[tokio::test]
    async fn update_transmits_timing_and_voice_fields() {
        let platform = MemoryRemotePlatform::new();
        let reconciler = RemoteReconciler::new(platform.clone());
        let mut config = agent();
        let binding = reconciler.reconcile(&config).await.unwrap();
        let remote_id = binding.remote_id.unwrap();

        config.responsiveness = 0.3;
        config.voice_id = Some("voice-7".to_string());
        reconciler.reconcile(&config).await.unwrap();

        let fields = platform.fields(&remote_id).unwrap();
        assert_eq!(fields.responsiveness, 0.3);
        assert_eq!(fields.voice_id.as_deref(), Some("voice-7"));
    }

    #[tokio::test]
    async fn restored_binding_skips_create() {
        let platform = MemoryRemotePlatform::new();
        let reconciler = RemoteReconciler::new(platform.clone());
        let config = agent();

        // Seed the remote side and restore its id locally.
        let remote_id = platform
            .create_agent(&RemoteAgentFields::from(&config))
            .await
            .unwrap();
        reconciler.restore_binding(
            &config.id,
            RemoteBinding {
                remote_id: Some(remote_id),
            },
        );

        reconciler.reconcile(&config).await.unwrap();
        assert_eq!(platform.create_calls(), 1);
        assert_eq!(platform.update_calls(), 1);
    }
}
