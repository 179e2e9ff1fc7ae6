//! Route configuration for concierge endpoints.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{
    generate_document, get_form, get_session, list_forms, send_message, ConciergeAppState,
};

/// Creates the concierge router with all endpoints.
///
/// Routes:
/// - `POST /api/messages` - Apply one user message
/// - `GET /api/forms` - List the form catalogue
/// - `GET /api/forms/:id` - Full schema of one form
/// - `GET /api/sessions/:id` - Read-only session view
/// - `POST /api/sessions/:id/documents` - Render a completed session
pub fn concierge_router() -> Router<ConciergeAppState> {
    Router::new()
        .route("/api/messages", post(send_message))
        .route("/api/forms", get(list_forms))
        .route("/api/forms/:id", get(get_form))
        .route("/api/sessions/:id", get(get_session))
        .route("/api/sessions/:id/documents", post(generate_document))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::advisory::ScriptedAdvisoryService;
    use crate::adapters::storage::InMemorySessionStore;
    use crate::application::ConversationOrchestrator;
    use crate::domain::forms::SchemaRegistry;
    use crate::domain::resolution::{FormResolver, ResolverSettings};
    use crate::domain::session::SessionMachine;
    use crate::ports::{
        AdvisoryService, DocumentRenderer, RenderError, RenderRequest, RenderedDocument,
        SessionStore,
    };
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    // ───────────────────────────────────────────────────────────────
    // Test fixtures
    // ───────────────────────────────────────────────────────────────

    struct NullRenderer;

    #[async_trait]
    impl DocumentRenderer for NullRenderer {
        async fn render(&self, request: RenderRequest) -> Result<RenderedDocument, RenderError> {
            Ok(RenderedDocument {
                filename: format!("{}.md", request.document_id),
                size_bytes: 1,
            })
        }
    }

    fn app() -> Router {
        let registry = Arc::new(SchemaRegistry::builtin().unwrap());
        let store: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::default());
        let advisory: Arc<dyn AdvisoryService> = Arc::new(ScriptedAdvisoryService::new());
        let resolver = FormResolver::new(registry.clone(), Some(advisory), ResolverSettings::default());
        let orchestrator = ConversationOrchestrator::new(
            store.clone(),
            SessionMachine::new(Arc::new(resolver)),
        );

        concierge_router().with_state(ConciergeAppState {
            orchestrator: Arc::new(orchestrator),
            registry,
            store,
            renderer: Arc::new(NullRenderer),
        })
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    // ───────────────────────────────────────────────────────────────
    // Tests
    // ───────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn list_forms_returns_builtin_catalogue() {
        let response = app()
            .oneshot(Request::builder().uri("/api/forms").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["total"], 5);
        assert_eq!(body["forms"][0]["id"], "pan_card_application");
    }

    #[tokio::test]
    async fn unknown_form_is_not_found() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/api/forms/fishing_permit")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn send_message_starts_collection() {
        let response = app()
            .oneshot(post_json(
                "/api/messages",
                serde_json::json!({"text": "I need a PAN card"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["state"], "COLLECTING");
        assert_eq!(body["current_schema"], "pan_card_application");
        assert_eq!(body["completed"], false);
        assert!(body["session_id"].is_string());
    }

    #[tokio::test]
    async fn generating_document_for_incomplete_session_conflicts() {
        let app = app();
        let response = app
            .clone()
            .oneshot(post_json("/api/messages", serde_json::json!({"text": "passport"})))
            .await
            .unwrap();
        let session_id = json_body(response).await["session_id"]
            .as_str()
            .unwrap()
            .to_string();

        let response = app
            .oneshot(post_json(
                &format!("/api/sessions/{}/documents", session_id),
                serde_json::json!({}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn malformed_session_id_is_bad_request() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/api/sessions/not-a-uuid")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
