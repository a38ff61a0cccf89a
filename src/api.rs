//! REST API Server for the stock market chatbot
//!
//! Stands in for the chat page: a stateless answer endpoint plus
//! in-memory chat sessions keyed by id.
//!
//! A session is created by the first non-blank `/api/chat` submission that
//! carries no known session id, and lives until `DELETE /api/sessions/:id`
//! or process exit.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

use crate::gateway::Gateway;
use crate::session::{self, ChatHistory};

/// =============================
/// Request Models
/// =============================

#[derive(Debug, Deserialize)]
pub struct RespondRequest {
    pub input: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub session_id: Option<String>,
    pub input: String,
}

/// =============================
/// Response Wrapper
/// =============================

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    pub data: Option<serde_json::Value>,
    pub error: Option<String>,
    pub timestamp: String,
}

impl ApiResponse {
    pub fn success<T: Serialize>(data: T) -> Self {
        Self {
            success: true,
            data: serde_json::to_value(data).ok(),
            error: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// =============================
/// API State
/// =============================

type SharedHistory = Arc<Mutex<ChatHistory>>;

#[derive(Clone)]
pub struct ApiState {
    pub gateway: Gateway,
    sessions: Arc<RwLock<HashMap<Uuid, SharedHistory>>>,
}

impl ApiState {
    pub fn new(gateway: Gateway) -> Self {
        Self {
            gateway,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    async fn get_or_create_session(&self, requested: Option<&str>) -> (Uuid, SharedHistory) {
        let requested = requested.and_then(|v| Uuid::parse_str(v.trim()).ok());

        if let Some(id) = requested {
            let sessions = self.sessions.read().await;
            if let Some(history) = sessions.get(&id) {
                return (id, history.clone());
            }
        }

        let id = Uuid::new_v4();
        let history = Arc::new(Mutex::new(ChatHistory::new()));
        self.sessions.write().await.insert(id, history.clone());
        info!(session_id = %id, "Chat session started");
        (id, history)
    }

    async fn find_session(&self, id: &str) -> Option<SharedHistory> {
        let id = Uuid::parse_str(id.trim()).ok()?;
        self.sessions.read().await.get(&id).cloned()
    }
}

/// =============================
/// Health Endpoint
/// =============================

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// =============================
/// Stateless Answer Endpoint
/// =============================

async fn respond_handler(
    State(state): State<ApiState>,
    Json(req): Json<RespondRequest>,
) -> (StatusCode, Json<ApiResponse>) {
    info!("Received respond request");

    let reply = state.gateway.reply(&req.input).await;
    (StatusCode::OK, Json(ApiResponse::success(reply)))
}

/// =============================
/// Chat Endpoints
/// =============================

async fn chat_handler(
    State(state): State<ApiState>,
    Json(req): Json<ChatRequest>,
) -> (StatusCode, Json<ApiResponse>) {
    if req.input.trim().is_empty() {
        return blank_submission(&state, req.session_id.as_deref()).await;
    }

    let (session_id, shared) = state.get_or_create_session(req.session_id.as_deref()).await;
    info!(session_id = %session_id, "Received chat message");

    // Held across the inference call so one session's exchanges never interleave.
    // The stored history is only replaced once the exchange completes; a dropped
    // request leaves it as it was.
    let mut history = shared.lock().await;
    let outcome = session::send_message(&state.gateway, history.clone(), &req.input).await;
    *history = outcome.history;

    (
        StatusCode::OK,
        Json(ApiResponse::success(serde_json::json!({
            "session_id": session_id.to_string(),
            "input": outcome.input,
            "history": history.messages(),
        }))),
    )
}

/// Blank input appends nothing and never opens a session
async fn blank_submission(state: &ApiState, session_id: Option<&str>) -> (StatusCode, Json<ApiResponse>) {
    let existing = match session_id {
        Some(id) => state.find_session(id).await.map(|shared| (id.to_string(), shared)),
        None => None,
    };

    let data = match existing {
        Some((id, shared)) => {
            let history = shared.lock().await;
            serde_json::json!({
                "session_id": id,
                "input": "",
                "history": history.messages(),
            })
        }
        None => serde_json::json!({
            "session_id": null,
            "input": "",
            "history": [],
        }),
    };

    (StatusCode::OK, Json(ApiResponse::success(data)))
}

async fn get_session(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> (StatusCode, Json<ApiResponse>) {
    match state.find_session(&id).await {
        Some(shared) => {
            let history = shared.lock().await;
            (
                StatusCode::OK,
                Json(ApiResponse::success(serde_json::json!({
                    "session_id": id,
                    "history": history.messages(),
                }))),
            )
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error(format!("Unknown session: {}", id))),
        ),
    }
}

async fn end_session(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> (StatusCode, Json<ApiResponse>) {
    let removed = match Uuid::parse_str(&id) {
        Ok(uuid) => state.sessions.write().await.remove(&uuid).is_some(),
        Err(_) => false,
    };

    if removed {
        info!(session_id = %id, "Chat session ended");
        (
            StatusCode::OK,
            Json(ApiResponse::success(serde_json::json!({ "session_id": id }))),
        )
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error(format!("Unknown session: {}", id))),
        )
    }
}

/// =============================
/// Router
/// =============================

pub fn create_router(gateway: Gateway) -> Router {
    let state = ApiState::new(gateway);

    Router::new()
        .route("/health", get(health))
        .route("/api/respond", post(respond_handler))
        .route("/api/chat", post(chat_handler))
        .route("/api/sessions/:id", get(get_session).delete(end_session))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// =============================
/// Server Startup
/// =============================

pub async fn start_server(gateway: Gateway, port: u16) -> crate::Result<()> {
    let router = create_router(gateway);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!("API Server listening on http://0.0.0.0:{}", port);
    info!("Local: http://127.0.0.1:{}", port);

    axum::serve(listener, router).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::tests::StubClient;
    use crate::gateway::{FAILURE_REPLY, GREETING_REPLY};
    use crate::inference::InferenceClient;
    use crate::models::InferenceResult;
    use std::time::Duration;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn router_with(result: InferenceResult) -> (Router, Arc<StubClient>) {
        let stub = StubClient::new(result);
        (create_router(Gateway::new(stub.clone())), stub)
    }

    async fn call(router: &Router, method: &str, uri: &str, body: Option<serde_json::Value>) -> (StatusCode, serde_json::Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let (router, _) = router_with(InferenceResult::Success("x".into()));
        let (status, body) = call(&router, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_respond_endpoint_reports_category() {
        let (router, stub) = router_with(InferenceResult::Success("Buy low. Sell high".into()));

        let (status, body) = call(
            &router,
            "POST",
            "/api/respond",
            Some(serde_json::json!({ "input": "When should I sell a stock?" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["category"], "stock_related");
        assert_eq!(body["data"]["answer"], "Buy low. Sell high.");
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn test_chat_session_accumulates_history() {
        let (router, _) = router_with(InferenceResult::Failure("down".into()));

        let (status, body) = call(
            &router,
            "POST",
            "/api/chat",
            Some(serde_json::json!({ "input": "hello" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["input"], "");
        let session_id = body["data"]["session_id"].as_str().unwrap().to_string();
        assert_eq!(body["data"]["history"][1]["text"], GREETING_REPLY);

        let (_, body) = call(
            &router,
            "POST",
            "/api/chat",
            Some(serde_json::json!({ "session_id": session_id, "input": "Is NYSE open?" })),
        )
        .await;
        assert_eq!(body["data"]["session_id"], session_id.as_str());

        let history = body["data"]["history"].as_array().unwrap();
        assert_eq!(history.len(), 4);
        assert_eq!(history[2]["role"], "user");
        assert_eq!(history[3]["role"], "bot");
        assert_eq!(history[3]["text"], FAILURE_REPLY);

        let (status, body) = call(&router, "GET", &format!("/api/sessions/{}", session_id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["history"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_blank_chat_input_appends_nothing() {
        let (router, _) = router_with(InferenceResult::Success("x".into()));

        let (_, body) = call(&router, "POST", "/api/chat", Some(serde_json::json!({ "input": "  " }))).await;
        assert!(body["data"]["history"].as_array().unwrap().is_empty());
        assert!(body["data"]["session_id"].is_null());
    }

    #[tokio::test]
    async fn test_blank_input_on_existing_session_returns_its_history() {
        let (router, _) = router_with(InferenceResult::Success("x".into()));

        let (_, body) = call(&router, "POST", "/api/chat", Some(serde_json::json!({ "input": "hello" }))).await;
        let session_id = body["data"]["session_id"].as_str().unwrap().to_string();

        let (_, body) = call(
            &router,
            "POST",
            "/api/chat",
            Some(serde_json::json!({ "session_id": session_id, "input": "\t" })),
        )
        .await;
        assert_eq!(body["data"]["session_id"], session_id.as_str());
        assert_eq!(body["data"]["history"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_blank_input_does_not_open_sessions() {
        let stub = StubClient::new(InferenceResult::Success("x".into()));
        let state = ApiState::new(Gateway::new(stub));

        for _ in 0..3 {
            let _ = chat_handler(
                State(state.clone()),
                Json(ChatRequest { session_id: None, input: "   ".into() }),
            )
            .await;
        }
        assert!(state.sessions.read().await.is_empty());
    }

    /// Inference that never finishes, standing in for a hung endpoint
    struct StalledClient;

    #[async_trait::async_trait]
    impl InferenceClient for StalledClient {
        async fn infer(&self, _prompt_text: &str) -> InferenceResult {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_dropped_chat_request_keeps_history() {
        let state = ApiState::new(Gateway::new(Arc::new(StalledClient)));
        let router = Router::new()
            .route("/api/chat", post(chat_handler))
            .route("/api/sessions/:id", get(get_session))
            .with_state(state.clone());

        // Seed the session without touching the stalled client
        let (_, body) = call(&router, "POST", "/api/chat", Some(serde_json::json!({ "input": "hello" }))).await;
        let session_id = body["data"]["session_id"].as_str().unwrap().to_string();
        assert_eq!(body["data"]["history"].as_array().unwrap().len(), 2);

        let request = Request::builder()
            .method("POST")
            .uri("/api/chat")
            .header("content-type", "application/json")
            .body(Body::from(
                serde_json::json!({ "session_id": session_id, "input": "sell a bond?" }).to_string(),
            ))
            .unwrap();
        let pending = router.clone().oneshot(request);
        let timed_out = tokio::time::timeout(Duration::from_millis(100), pending).await;
        assert!(timed_out.is_err());

        let (status, body) = call(&router, "GET", &format!("/api/sessions/{}", session_id), None).await;
        assert_eq!(status, StatusCode::OK);
        let history = body["data"]["history"].as_array().unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0]["text"], "hello");
        assert_eq!(history[1]["text"], GREETING_REPLY);
    }

    #[tokio::test]
    async fn test_end_session() {
        let (router, _) = router_with(InferenceResult::Success("x".into()));

        let (_, body) = call(&router, "POST", "/api/chat", Some(serde_json::json!({ "input": "hi" }))).await;
        let uri = format!("/api/sessions/{}", body["data"]["session_id"].as_str().unwrap());

        let (status, _) = call(&router, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = call(&router, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
    }
}
