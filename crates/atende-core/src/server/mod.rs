//! HTTP endpoint layer.
//!
//! Thin axum glue over the assistant: `POST /api/chat`,
//! `GET /api/health`, and `POST /api/clear_history`. The assistant sits
//! behind a `tokio::sync::Mutex` so concurrent callers are serialized
//! and the transcript keeps its turn ordering.

use axum::{
    extract::State,
    http::{header, HeaderValue, Method, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::assistant::Assistant;
use crate::config::Config;

/// Application state shared across handlers.
pub struct AppState {
    pub assistant: Mutex<Assistant>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(assistant: Assistant) -> Self {
        Self {
            assistant: Mutex::new(assistant),
            start_time: Instant::now(),
        }
    }
}

// ── Wire types ──────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub uptime_seconds: u64,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
    pub message: String,
}

// ── Handlers ────────────────────────────────────────────────────────

async fn chat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, (StatusCode, Json<ErrorResponse>)> {
    let message = match req.message.as_deref().map(str::trim) {
        Some(m) if !m.is_empty() => m.to_string(),
        _ => {
            warn!("Chat request without a message");
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "Mensagem não fornecida".into(),
                }),
            ));
        }
    };

    info!(len = message.len(), "Received chat message");

    let mut assistant = state.assistant.lock().await;
    let response = assistant.process_message(&message).await;

    Ok(Json(ChatResponse {
        response,
        status: "success".into(),
    }))
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "online".into(),
        message: "API do assistente está funcionando!".into(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
    })
}

async fn clear_history(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let mut assistant = state.assistant.lock().await;
    assistant.clear_history();

    Json(StatusResponse {
        status: "success".into(),
        message: "Histórico de conversa limpo".into(),
    })
}

// ── Router assembly ─────────────────────────────────────────────────

/// Build the CORS layer from configured origins; `*` means any origin.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    if origins.iter().any(|o| o == "*") {
        layer.allow_origin(Any)
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|o| match o.parse() {
                Ok(v) => Some(v),
                Err(_) => {
                    warn!(origin = o.as_str(), "Ignoring unparsable CORS origin");
                    None
                }
            })
            .collect();
        layer.allow_origin(AllowOrigin::list(parsed))
    }
}

pub fn app(state: Arc<AppState>, cors: CorsLayer) -> Router {
    Router::new()
        .route("/api/chat", post(chat))
        .route("/api/health", get(health))
        .route("/api/clear_history", post(clear_history))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Run the HTTP server until the process is stopped.
pub async fn run(config: &Config, assistant: Assistant) -> anyhow::Result<()> {
    let state = Arc::new(AppState::new(assistant));
    let router = app(state, cors_layer(&config.api.cors_origins));

    let addr = format!("{}:{}", config.api.host, config.api.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, router).await?;
    Ok(())
}
