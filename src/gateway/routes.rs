use super::server::EngineState;
use crate::agents::{AgentConfig, EmbedSettings, LlmProvider, PricingTier, RemoteBinding};
use crate::capability;
use crate::catalog;
use crate::deletion::DeleteOutcome;
use crate::errors::EngineError;
use crate::save::{SaveOutcome, SaveRequest};

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};

/// Build all routes for the gateway.
pub fn build_routes(state: EngineState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health
        .route("/api/health", get(health_handler))
        // Agents
        .route(
            "/api/agents",
            get(agents_list_handler).post(agent_create_handler),
        )
        .route(
            "/api/agents/{id}",
            get(agent_get_handler)
                .put(agent_save_handler)
                .delete(agent_delete_handler),
        )
        .route("/api/agents/{id}/workspaces", get(workspaces_handler))
        .route("/api/agents/{id}/sync", post(agent_sync_handler))
        // Catalog & capabilities
        .route("/api/catalog", get(catalog_handler))
        .route("/api/capabilities", get(capabilities_handler))
        .layer(cors)
        .with_state(state)
}

// ============================================================================
// Error Mapping
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ViolationBody {
    path: String,
    message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    violations: Vec<ViolationBody>,
}

fn error_response(err: EngineError) -> (StatusCode, Json<ErrorBody>) {
    let (status, violations) = match &err {
        EngineError::Validation(violations) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            violations
                .iter()
                .map(|v| ViolationBody {
                    path: v.path.clone(),
                    message: v.message.clone(),
                })
                .collect(),
        ),
        // A suppressed read surfaces as not-found: the resource is mid-
        // deletion and no longer usefully addressable.
        EngineError::StaleRead | EngineError::NotFound => (StatusCode::NOT_FOUND, Vec::new()),
        EngineError::RemoteReconciliation(_) => (StatusCode::BAD_GATEWAY, Vec::new()),
        EngineError::SubResourceWrite { .. } | EngineError::Read(_) => {
            (StatusCode::BAD_GATEWAY, Vec::new())
        }
    };
    (
        status,
        Json(ErrorBody {
            error: err.to_string(),
            violations,
        }),
    )
}

// ============================================================================
// Health
// ============================================================================

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============================================================================
// Agents
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SaveBody {
    agent: AgentConfig,
    #[serde(default)]
    workspace_ids: Vec<String>,
    #[serde(default)]
    embed: EmbedSettings,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WriteStatus {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SaveResponse {
    complete: bool,
    agent: WriteStatus,
    workspace_assignment: WriteStatus,
    embed_settings: WriteStatus,
}

impl From<SaveOutcome> for SaveResponse {
    fn from(outcome: SaveOutcome) -> Self {
        fn status<T>(result: &Result<T, crate::errors::StoreError>) -> WriteStatus {
            match result {
                Ok(_) => WriteStatus {
                    ok: true,
                    error: None,
                },
                Err(err) => WriteStatus {
                    ok: false,
                    error: Some(err.to_string()),
                },
            }
        }
        Self {
            complete: outcome.is_complete(),
            agent: status(&outcome.agent),
            workspace_assignment: status(&outcome.workspaces),
            embed_settings: status(&outcome.embed),
        }
    }
}

async fn agents_list_handler(
    State(state): State<EngineState>,
) -> Result<Json<Vec<AgentConfig>>, (StatusCode, Json<ErrorBody>)> {
    state
        .reader
        .list_agents()
        .await
        .map(Json)
        .map_err(error_response)
}

async fn agent_get_handler(
    State(state): State<EngineState>,
    Path(id): Path<String>,
) -> Result<Json<AgentConfig>, (StatusCode, Json<ErrorBody>)> {
    state
        .reader
        .get_agent(&id)
        .await
        .map(Json)
        .map_err(error_response)
}

async fn agent_create_handler(
    State(state): State<EngineState>,
    Json(body): Json<SaveBody>,
) -> Result<Json<SaveResponse>, (StatusCode, Json<ErrorBody>)> {
    let outcome = state
        .orchestrator
        .create(SaveRequest {
            config: body.agent,
            workspace_ids: body.workspace_ids,
            embed: body.embed,
        })
        .await
        .map_err(error_response)?;
    Ok(Json(outcome.into()))
}

async fn agent_save_handler(
    State(state): State<EngineState>,
    Path(id): Path<String>,
    Json(mut body): Json<SaveBody>,
) -> Result<Json<SaveResponse>, (StatusCode, Json<ErrorBody>)> {
    // Full replace; the path id is authoritative.
    body.agent.id = id;
    let outcome = state
        .orchestrator
        .save(SaveRequest {
            config: body.agent,
            workspace_ids: body.workspace_ids,
            embed: body.embed,
        })
        .await
        .map_err(error_response)?;
    Ok(Json(outcome.into()))
}

async fn agent_delete_handler(
    State(state): State<EngineState>,
    Path(id): Path<String>,
) -> Json<DeleteOutcome> {
    Json(state.deletion.delete_agent(&id).await)
}

async fn workspaces_handler(
    State(state): State<EngineState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<String>>, (StatusCode, Json<ErrorBody>)> {
    state
        .reader
        .get_assignment(&id)
        .await
        .map(Json)
        .map_err(error_response)
}

async fn agent_sync_handler(
    State(state): State<EngineState>,
    Path(id): Path<String>,
) -> Result<Json<RemoteBinding>, (StatusCode, Json<ErrorBody>)> {
    let agent = state.reader.get_agent(&id).await.map_err(error_response)?;
    state
        .reconciler
        .reconcile(&agent)
        .await
        .map(Json)
        .map_err(error_response)
}

// ============================================================================
// Catalog & Capabilities
// ============================================================================

async fn catalog_handler() -> impl IntoResponse {
    Json(catalog::integrations())
}

#[derive(Debug, Deserialize)]
struct CapabilitiesQuery {
    provider: LlmProvider,
    model: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CapabilitiesResponse {
    tier: PricingTier,
    languages: Vec<&'static str>,
    model_options: Vec<&'static str>,
    voice_tab_visible: bool,
}

async fn capabilities_handler(Query(query): Query<CapabilitiesQuery>) -> impl IntoResponse {
    let caps = capability::resolve(query.provider, &query.model);
    Json(CapabilitiesResponse {
        tier: caps.tier,
        languages: caps.languages.to_vec(),
        model_options: caps.model_options.to_vec(),
        voice_tab_visible: caps.voice_tab_visible,
    })
}
