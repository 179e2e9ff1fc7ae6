//! Integration tests for the HTTP API.
//!
//! Drives the fully layered router (tracing, CORS, timeout) through a
//! complete birth certificate conversation, then renders the document.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use form_concierge::adapters::advisory::ScriptedAdvisoryService;
use form_concierge::adapters::document::MarkdownDocumentRenderer;
use form_concierge::adapters::http::{build_app, ConciergeAppState};
use form_concierge::adapters::storage::InMemorySessionStore;
use form_concierge::application::ConversationOrchestrator;
use form_concierge::config::ServerConfig;
use form_concierge::domain::forms::SchemaRegistry;
use form_concierge::domain::resolution::{FormResolver, ResolverSettings};
use form_concierge::domain::session::SessionMachine;
use form_concierge::ports::{AdvisoryService, SessionStore};

// =============================================================================
// Test Infrastructure
// =============================================================================

fn app(output_dir: &std::path::Path) -> Router {
    let registry = Arc::new(SchemaRegistry::builtin().unwrap());
    let store: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::default());
    let advisory: Arc<dyn AdvisoryService> = Arc::new(ScriptedAdvisoryService::new());
    let resolver = FormResolver::new(registry.clone(), Some(advisory), ResolverSettings::default());

    let state = ConciergeAppState {
        orchestrator: Arc::new(ConversationOrchestrator::new(
            store.clone(),
            SessionMachine::new(Arc::new(resolver)),
        )),
        registry,
        store,
        renderer: Arc::new(MarkdownDocumentRenderer::new(output_dir)),
    };
    build_app(state, &ServerConfig::default())
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn message(app: &Router, session_id: Option<&str>, text: &str) -> Value {
    let body = match session_id {
        Some(id) => json!({"session_id": id, "text": text}),
        None => json!({"text": text}),
    };
    let request = Request::builder()
        .method("POST")
        .uri("/api/messages")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);
    body
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn birth_certificate_round_trip_over_http() {
    let dir = TempDir::new().unwrap();
    let app = app(dir.path());

    let first = message(&app, None, "I need a birth certificate for my daughter").await;
    assert_eq!(first["state"], "COLLECTING");
    assert_eq!(first["current_schema"], "birth_certificate");
    let id = first["session_id"].as_str().unwrap().to_string();
    let total = first["progress"]["total"].as_u64().unwrap();

    let form = send(
        &app,
        Request::builder()
            .uri("/api/forms/birth_certificate")
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .1;
    let fields = form["fields"].as_array().unwrap().clone();
    assert_eq!(fields.len() as u64, total);

    let mut last = Value::Null;
    for field in &fields {
        let answer = match field["type"].as_str().unwrap() {
            "email" => "parent@example.com".to_string(),
            "phone" => "9876543210".to_string(),
            "date" => "01/01/2024".to_string(),
            "choice" => field["options"][0].as_str().unwrap().to_string(),
            _ => "Meera".to_string(),
        };
        last = message(&app, Some(&id), &answer).await;
        assert!(last.get("errors").is_none(), "rejected: {}", last);
    }
    assert_eq!(last["completed"], true);
    assert_eq!(last["state"], "COMPLETE");

    let (status, document) = send(
        &app,
        Request::builder()
            .method("POST")
            .uri(format!("/api/sessions/{}/documents", id))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let filename = document["filename"].as_str().unwrap();
    assert!(dir.path().join(filename).exists());

    let (status, view) = send(
        &app,
        Request::builder()
            .uri(format!("/api/sessions/{}", id))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["state"], "COMPLETE");
    assert_eq!(view["documents"].as_array().unwrap().len(), 1);
    assert_eq!(view["progress"]["answered"].as_u64().unwrap(), total);
}

#[tokio::test]
async fn unknown_session_view_is_not_found() {
    let dir = TempDir::new().unwrap();
    let app = app(dir.path());

    let (status, body) = send(
        &app,
        Request::builder()
            .uri(format!("/api/sessions/{}", uuid::Uuid::new_v4()))
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}
