//! Multi-entity save orchestration.
//!
//! One configuration save fans out into three independent sub-resource
//! writes: the agent itself, its workspace assignment (replaced wholesale),
//! and its embed settings. The three have no cross-write invariant, so they
//! run concurrently and each reports its own outcome. There is no
//! compensating rollback: the sub-resources are independently useful and
//! independently retryable, and the backing stores provide no transaction
//! boundary to fake one with. Partial application is a visible outcome.

use crate::agents::{validate_agent, AgentConfig, EmbedSettings};
use crate::cache::AgentViewCache;
use crate::errors::{EngineError, StoreError, SubResource};
use crate::selection::ToolSelection;
use crate::stores::{AgentStore, EmbedSettingsStore, WorkspaceStore};

use std::sync::Arc;
use tracing::{info, warn};

/// One validated save: the full replacement configuration plus both
/// sub-resources.
#[derive(Debug, Clone)]
pub struct SaveRequest {
    pub config: AgentConfig,
    pub workspace_ids: Vec<String>,
    pub embed: EmbedSettings,
}

/// Per-write outcomes of one orchestrated save.
#[derive(Debug)]
pub struct SaveOutcome {
    pub agent: Result<AgentConfig, StoreError>,
    pub workspaces: Result<(), StoreError>,
    pub embed: Result<EmbedSettings, StoreError>,
}

impl SaveOutcome {
    /// Whether all three writes landed.
    pub fn is_complete(&self) -> bool {
        self.agent.is_ok() && self.workspaces.is_ok() && self.embed.is_ok()
    }

    /// The failed writes, labelled per sub-resource.
    pub fn failures(&self) -> Vec<(SubResource, &StoreError)> {
        let mut failures = Vec::new();
        if let Err(ref err) = self.agent {
            failures.push((SubResource::Agent, err));
        }
        if let Err(ref err) = self.workspaces {
            failures.push((SubResource::WorkspaceAssignment, err));
        }
        if let Err(ref err) = self.embed {
            failures.push((SubResource::EmbedSettings, err));
        }
        failures
    }
}

pub struct SaveOrchestrator {
    agents: Arc<dyn AgentStore>,
    workspaces: Arc<dyn WorkspaceStore>,
    embeds: Arc<dyn EmbedSettingsStore>,
    cache: Arc<AgentViewCache>,
}

impl SaveOrchestrator {
    pub fn new(
        agents: Arc<dyn AgentStore>,
        workspaces: Arc<dyn WorkspaceStore>,
        embeds: Arc<dyn EmbedSettingsStore>,
        cache: Arc<AgentViewCache>,
    ) -> Self {
        Self {
            agents,
            workspaces,
            embeds,
            cache,
        }
    }

    /// Save an existing agent: validate, reconcile tool selection once, then
    /// issue the three writes concurrently.
    pub async fn save(&self, request: SaveRequest) -> Result<SaveOutcome, EngineError> {
        let config = prepare(request.config)?;

        let (agent, workspaces, embed) = tokio::join!(
            self.agents.update(&config.id, &config),
            self.workspaces.replace(&config.id, &request.workspace_ids),
            self.embeds.update(&config.id, &request.embed),
        );

        let outcome = SaveOutcome {
            agent,
            workspaces,
            embed,
        };
        self.finish(&config.id, &outcome);
        Ok(outcome)
    }

    /// Create a new agent. The agent write runs first (the sub-resources
    /// key off its id); the remaining two writes then run concurrently.
    pub async fn create(&self, request: SaveRequest) -> Result<SaveOutcome, EngineError> {
        let config = prepare(request.config)?;

        let agent = match self.agents.create(&config).await {
            Ok(_) => Ok(config.clone()),
            Err(err) => Err(err),
        };

        let (workspaces, embed) = if agent.is_ok() {
            tokio::join!(
                self.workspaces.replace(&config.id, &request.workspace_ids),
                self.embeds.update(&config.id, &request.embed),
            )
        } else {
            // Without an agent there is nothing to attach the sub-resources
            // to; report them unattempted as failures of their own.
            (
                Err(StoreError::Transport(
                    "agent create failed; write skipped".into(),
                )),
                Err(StoreError::Transport(
                    "agent create failed; write skipped".into(),
                )),
            )
        };

        let outcome = SaveOutcome {
            agent,
            workspaces,
            embed,
        };
        self.finish(&config.id, &outcome);
        Ok(outcome)
    }

    fn finish(&self, id: &str, outcome: &SaveOutcome) {
        if outcome.is_complete() {
            // Cached views are stale now; evict so the next read refetches.
            self.cache.invalidate_agent(id);
            self.cache.invalidate_collection();
            info!("agent {id} saved");
        } else {
            for (resource, err) in outcome.failures() {
                warn!("agent {id}: {resource} write failed: {err}");
            }
        }
    }
}

/// Fail-fast validation plus the save-boundary tool-selection
/// reconciliation. Runs exactly once per save.
fn prepare(mut config: AgentConfig) -> Result<AgentConfig, EngineError> {
    let violations = validate_agent(&config);
    if !violations.is_empty() {
        return Err(EngineError::Validation(violations));
    }

    let selection =
        ToolSelection::from_persisted(&config.enabled_integrations, &config.enabled_tool_ids);
    let persisted = selection.for_persistence();
    config.enabled_integrations = persisted.enabled_integrations;
    config.enabled_tool_ids = persisted.enabled_tool_ids.into_iter().collect();
    // The tier is derived state; the client's copy is not authoritative.
    config.pricing_tier = crate::capability::resolve_tier(config.llm_provider, &config.llm_model);
    config.updated_at = chrono::Utc::now().to_rfc3339();
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::{MemoryAgentStore, MemoryEmbedStore, MemoryWorkspaceStore};

    fn orchestrator() -> (
        SaveOrchestrator,
        Arc<MemoryAgentStore>,
        Arc<MemoryWorkspaceStore>,
        Arc<MemoryEmbedStore>,
        Arc<AgentViewCache>,
    ) {
        let agents = MemoryAgentStore::new();
        let workspaces = MemoryWorkspaceStore::new();
        let embeds = MemoryEmbedStore::new();
        let cache = Arc::new(AgentViewCache::new());
        let orchestrator = SaveOrchestrator::new(
            agents.clone(),
            workspaces.clone(),
            embeds.clone(),
            cache.clone(),
        );
        (orchestrator, agents, workspaces, embeds, cache)
    }

    fn valid_request() -> SaveRequest {
        let mut config = AgentConfig::new("Front desk");
        config.system_prompt = "You answer calls for the clinic.".to_string();
        SaveRequest {
            config,
            workspace_ids: vec!["w1".to_string()],
            embed: EmbedSettings::default(),
        }
    }

    #[tokio::test]
    async fn validation_failure_blocks_all_writes() {
        let (orchestrator, agents, ..) = orchestrator();
        let mut request = valid_request();
        request.config.name = "x".to_string();

        let result = orchestrator.create(request).await;
        assert!(matches!(result, Err(EngineError::Validation(_))));
        // Fail-fast: nothing reached the store.
        assert!(agents.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn full_success_applies_all_three() {
        let (orchestrator, agents, workspaces, embeds, _) = orchestrator();
        let request = valid_request();
        let id = request.config.id.clone();

        let outcome = orchestrator.create(request).await.unwrap();
        assert!(outcome.is_complete());
        assert!(agents.contains(&id));
        assert_eq!(workspaces.list(&id).await.unwrap(), vec!["w1"]);
        assert_eq!(
            embeds.get(&id).await.unwrap(),
            EmbedSettings::default()
        );
    }

    #[tokio::test]
    async fn one_failure_two_successes_never_all_or_nothing() {
        let (orchestrator, agents, workspaces, _, _) = orchestrator();
        let request = valid_request();
        let id = request.config.id.clone();
        orchestrator.create(request.clone()).await.unwrap();

        workspaces.fail_next(StoreError::Upstream {
            status: 503,
            message: "unavailable".into(),
        });

        let outcome = orchestrator.save(request).await.unwrap();
        assert!(!outcome.is_complete());
        let failures = outcome.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, SubResource::WorkspaceAssignment);
        // The sibling writes stayed applied.
        assert!(outcome.agent.is_ok());
        assert!(outcome.embed.is_ok());
        assert!(agents.contains(&id));
    }

    #[tokio::test]
    async fn success_invalidates_cached_views() {
        let (orchestrator, .., cache) = orchestrator();
        let request = valid_request();
        let id = request.config.id.clone();

        let epoch = cache.epoch(&id);
        cache.put_agent_if_current(&id, request.config.clone(), epoch);
        let collection_epoch = cache.collection_epoch();
        cache.put_collection_if_current(vec![request.config.clone()], collection_epoch);

        orchestrator.create(request).await.unwrap();
        assert!(cache.agent(&id).is_none());
        assert!(cache.collection().is_none());
    }

    #[tokio::test]
    async fn partial_failure_keeps_cache_untouched() {
        let (orchestrator, _, workspaces, _, cache) = orchestrator();
        let request = valid_request();
        let id = request.config.id.clone();
        orchestrator.create(request.clone()).await.unwrap();

        let epoch = cache.epoch(&id);
        cache.put_agent_if_current(&id, request.config.clone(), epoch);

        workspaces.fail_next(StoreError::Transport("down".into()));
        let outcome = orchestrator.save(request).await.unwrap();
        assert!(!outcome.is_complete());
        // No invalidation on partial failure: per-write feedback already
        // happened; the cached view still matches the last full save.
        assert!(cache.agent(&id).is_some());
    }

    #[tokio::test]
    async fn save_rederives_pricing_tier() {
        let (orchestrator, agents, ..) = orchestrator();
        let mut request = valid_request();
        request.config.llm_model = "gpt-4o-mini".to_string();
        // Client sent a stale tier; the save boundary recomputes it.
        request.config.pricing_tier = crate::agents::PricingTier::Premium;

        let id = request.config.id.clone();
        orchestrator.create(request).await.unwrap();
        let stored = agents.get(&id).await.unwrap();
        assert_eq!(stored.pricing_tier, crate::agents::PricingTier::Budget);
    }

    #[tokio::test]
    async fn save_reconciles_empty_tool_sets_once() {
        let (orchestrator, agents, ..) = orchestrator();
        let mut request = valid_request();
        request
            .config
            .enabled_integrations
            .push("calendar".to_string());
        request
            .config
            .enabled_tool_ids
            .insert("calendar".to_string(), vec![]);

        let id = request.config.id.clone();
        orchestrator.create(request).await.unwrap();

        let stored = agents.get(&id).await.unwrap();
        // Zero selected tools → not enabled in the persisted view.
        assert!(stored.enabled_integrations.is_empty());
        assert!(stored.enabled_tool_ids.is_empty());
    }
}
