//! HTTP API gateway for ShopScope.
//!
//! Exposes the one request surface the agent needs: a synchronous
//! `POST /query` accepting a free-text question and returning the agent's
//! response plus the capabilities it used, alongside liveness endpoints.
//!
//! Built on Axum. The agent loop itself never fails a request — any
//! terminal state (final answer, transport failure, budget exhaustion)
//! comes back as a well-formed body.

use axum::extract::DefaultBodyLimit;
use axum::{Router, extract::State, http::StatusCode, response::Json, routing::get, routing::post};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use shopscope_agent::AgentLoop;

/// Shared application state for the gateway.
pub struct GatewayState {
    pub agent: Arc<AgentLoop>,
}

type SharedState = Arc<GatewayState>;

/// Build the Axum router with all gateway routes.
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/query", post(query_handler))
        .layer(DefaultBodyLimit::max(64 * 1024))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the gateway HTTP server.
pub async fn serve(
    host: &str,
    port: u16,
    agent: Arc<AgentLoop>,
) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{host}:{port}");
    let app = build_router(Arc::new(GatewayState { agent }));

    info!(addr = %addr, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Handlers ---

#[derive(Serialize)]
struct RootResponse {
    message: &'static str,
}

async fn root_handler() -> Json<RootResponse> {
    Json(RootResponse {
        message: "ShopScope analytics agent is running!",
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Deserialize)]
struct QueryRequest {
    query: String,
}

#[derive(Serialize)]
struct QueryResponse {
    response: String,
    tools_used: String,
}

async fn query_handler(
    State(state): State<SharedState>,
    Json(payload): Json<QueryRequest>,
) -> Result<Json<QueryResponse>, StatusCode> {
    info!(query = %payload.query, "Received query");

    let outcome = state.agent.run(&payload.query).await;

    info!(
        tools_used = %outcome.tools_used,
        response_len = outcome.response.len(),
        "Query processed"
    );

    Ok(Json(QueryResponse {
        response: outcome.response,
        tools_used: outcome.tools_used,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use shopscope_core::error::ProviderError;
    use shopscope_core::message::Message;
    use shopscope_core::provider::{Provider, ProviderRequest, ProviderResponse};
    use shopscope_core::tool::ToolRegistry;
    use tower::ServiceExt;

    /// A provider returning one fixed text answer.
    struct StubProvider;

    #[async_trait]
    impl Provider for StubProvider {
        fn name(&self) -> &str {
            "stub"
        }

        async fn complete(
            &self,
            _request: ProviderRequest,
        ) -> Result<ProviderResponse, ProviderError> {
            Ok(ProviderResponse {
                message: Message::assistant("There are 200 registered users."),
                usage: None,
                model: "stub-model".into(),
            })
        }
    }

    fn test_state() -> SharedState {
        let agent = Arc::new(AgentLoop::new(
            Arc::new(StubProvider),
            "stub-model",
            0.0,
            Arc::new(ToolRegistry::new()),
        ));
        Arc::new(GatewayState { agent })
    }

    #[tokio::test]
    async fn health_endpoint() {
        let app = build_router(test_state());

        let req = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn root_endpoint_reports_running() {
        let app = build_router(test_state());

        let req = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["message"].as_str().unwrap().contains("running"));
    }

    #[tokio::test]
    async fn query_endpoint_returns_response_and_tools_used() {
        let app = build_router(test_state());

        let req = Request::builder()
            .method("POST")
            .uri("/query")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"query": "How many users are registered?"}"#))
            .unwrap();

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["response"], "There are 200 registered users.");
        assert_eq!(body["tools_used"], "None");
    }

    #[tokio::test]
    async fn query_endpoint_rejects_malformed_bodies() {
        let app = build_router(test_state());

        let req = Request::builder()
            .method("POST")
            .uri("/query")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"q": "wrong field"}"#))
            .unwrap();

        let response = app.oneshot(req).await.unwrap();
        assert!(response.status().is_client_error());
    }
}
