//! Integration tests for the HTTP gateway surface, driven through the router
//! without binding a socket.

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use voxgate::config::Config;
use voxgate::gateway::{build_routes, Engine};

fn router() -> axum::Router {
    // Default config → in-memory stores.
    build_routes(Engine::from_config(&Config::default()))
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn agent_body(name: &str) -> Value {
    json!({
        "agent": {
            "id": uuid::Uuid::new_v4().to_string(),
            "name": name,
            "language": "en-US",
            "llmModel": "gpt-4o",
            "systemPrompt": "You answer calls for the clinic.",
            "createdAt": "2026-08-01T00:00:00Z",
            "updatedAt": "2026-08-01T00:00:00Z"
        },
        "workspaceIds": ["w1"],
        "embed": { "buttonLabel": "Talk to us" }
    })
}

#[tokio::test]
async fn health_reports_ok() {
    let response = router()
        .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn create_then_get_and_list() {
    let app = router();
    let body = agent_body("Front desk");
    let id = body["agent"]["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(
            Request::post("/api/agents")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let save = body_json(response).await;
    assert_eq!(save["complete"], true);

    let response = app
        .clone()
        .oneshot(
            Request::get(format!("/api/agents/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let agent = body_json(response).await;
    assert_eq!(agent["name"], "Front desk");

    let response = app
        .oneshot(Request::get("/api/agents").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let listing = body_json(response).await;
    assert_eq!(listing.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn invalid_save_returns_violations() {
    let app = router();
    let mut body = agent_body("x");
    body["agent"]["temperature"] = json!(5.0);

    let response = app
        .oneshot(
            Request::post("/api/agents")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let error = body_json(response).await;
    let paths: Vec<&str> = error["violations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["path"].as_str().unwrap())
        .collect();
    assert!(paths.contains(&"name"));
    assert!(paths.contains(&"temperature"));
}

#[tokio::test]
async fn delete_then_get_is_not_found() {
    let app = router();
    let body = agent_body("Doomed");
    let id = body["agent"]["id"].as_str().unwrap().to_string();

    app.clone()
        .oneshot(
            Request::post("/api/agents")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::delete(format!("/api/agents/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let outcome = body_json(response).await;
    assert_eq!(outcome["deleted"], true);

    // The detail view is gone for the rest of the session.
    let response = app
        .oneshot(
            Request::get(format!("/api/agents/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn capabilities_follow_provider_precedence() {
    let response = router()
        .oneshot(
            Request::get("/api/capabilities?provider=openai-realtime&model=gpt-4o-mini")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let caps = body_json(response).await;
    assert_eq!(caps["tier"], "premium");
    assert_eq!(caps["voiceTabVisible"], false);
}

#[tokio::test]
async fn catalog_lists_integrations_with_risk_levels() {
    let response = router()
        .oneshot(Request::get("/api/catalog").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let catalog = body_json(response).await;
    let calendar = catalog
        .as_array()
        .unwrap()
        .iter()
        .find(|i| i["id"] == "calendar")
        .unwrap();
    assert!(calendar["tools"]
        .as_array()
        .unwrap()
        .iter()
        .any(|t| t["riskLevel"] == "high" && t["defaultEnabled"] == false));
}

#[tokio::test]
async fn sync_binds_agent_to_remote_platform() {
    let app = router();
    let body = agent_body("Synced");
    let id = body["agent"]["id"].as_str().unwrap().to_string();

    app.clone()
        .oneshot(
            Request::post("/api/agents")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let response = app
        .oneshot(
            Request::post(format!("/api/agents/{id}/sync"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let binding = body_json(response).await;
    assert!(binding["remoteId"].as_str().unwrap().starts_with("ra_"));
}
