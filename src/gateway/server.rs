use crate::cache::AgentViewCache;
use crate::config::{Config, DEFAULT_BIND_HOST};
use crate::deletion::DeletionCoordinator;
use crate::infra::DeletionGuards;
use crate::reads::AgentReader;
use crate::remote::RemoteReconciler;
use crate::save::SaveOrchestrator;
use crate::stores::{
    AgentStore, EmbedSettingsStore, HttpAgentStore, HttpEmbedStore, HttpRemotePlatform,
    HttpWorkspaceStore, MemoryAgentStore, MemoryEmbedStore, MemoryRemotePlatform,
    MemoryWorkspaceStore, RemotePlatform, WorkspaceStore,
};

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

/// Assembled engine services shared by every request handler.
pub struct Engine {
    pub reader: AgentReader,
    pub orchestrator: SaveOrchestrator,
    pub deletion: DeletionCoordinator,
    pub reconciler: RemoteReconciler,
}

pub type EngineState = Arc<Engine>;

impl Engine {
    /// Wire the engine against the configured backend, or in-memory stores
    /// when none is configured (local development mode).
    pub fn from_config(config: &Config) -> EngineState {
        let (agents, workspaces, embeds): (
            Arc<dyn AgentStore>,
            Arc<dyn WorkspaceStore>,
            Arc<dyn EmbedSettingsStore>,
        ) = match config.backend.base_url {
            Some(ref base_url) => (
                Arc::new(HttpAgentStore::new(
                    base_url.clone(),
                    config.backend.api_key.clone(),
                )),
                Arc::new(HttpWorkspaceStore::new(
                    base_url.clone(),
                    config.backend.api_key.clone(),
                )),
                Arc::new(HttpEmbedStore::new(
                    base_url.clone(),
                    config.backend.api_key.clone(),
                )),
            ),
            None => {
                info!("No backend configured; using in-memory stores");
                (
                    MemoryAgentStore::new(),
                    MemoryWorkspaceStore::new(),
                    MemoryEmbedStore::new(),
                )
            }
        };

        let platform: Arc<dyn RemotePlatform> = match config.remote.base_url {
            Some(ref base_url) => Arc::new(HttpRemotePlatform::new(
                base_url.clone(),
                config.remote.api_key.clone().unwrap_or_default(),
            )),
            None => MemoryRemotePlatform::new(),
        };

        let cache = Arc::new(AgentViewCache::new());
        let guards = Arc::new(DeletionGuards::new());

        Arc::new(Engine {
            reader: AgentReader::new(
                agents.clone(),
                workspaces.clone(),
                cache.clone(),
                guards.clone(),
            )
            .with_max_retries(config.reads.max_retries),
            orchestrator: SaveOrchestrator::new(
                agents.clone(),
                workspaces,
                embeds,
                cache.clone(),
            ),
            deletion: DeletionCoordinator::new(agents, cache, guards),
            reconciler: RemoteReconciler::new(platform),
        })
    }
}

/// Bind and serve the gateway until shutdown.
pub async fn serve(config: Config, port_override: Option<u16>) -> Result<()> {
    let port = port_override.unwrap_or(config.gateway.port);
    let host = config
        .gateway
        .bind_host
        .clone()
        .unwrap_or_else(|| DEFAULT_BIND_HOST.to_string());

    let engine = Engine::from_config(&config);
    let router = super::routes::build_routes(engine);

    let listener = tokio::net::TcpListener::bind((host.as_str(), port)).await?;
    info!("voxgate gateway listening on {host}:{port}");
    axum::serve(listener, router).await?;
    Ok(())
}
