use axum::{
    extract::rejection::JsonRejection,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use kbcore::{search, top_k, CorpusSource, SearchResult, SharedIndex, DEFAULT_THRESHOLD, DEFAULT_TOP_K};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub mod generate;

use generate::Generator;

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    #[serde(default = "default_k")]
    pub k: usize,
}
fn default_k() -> usize { DEFAULT_TOP_K }

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<SearchResult>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub reply: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_used: Option<Vec<ContextUsed>>,
}

/// One grounding snippet that made it into the generation prompt.
#[derive(Serialize)]
pub struct ContextUsed {
    pub q: String,
    pub score: f32,
}

#[derive(Clone)]
pub struct AppState {
    pub index: Arc<SharedIndex>,
    pub source: Arc<dyn CorpusSource>,
    pub generator: Arc<dyn Generator>,
}

pub fn build_app(state: AppState, public_dir: &str) -> Router {
    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/search", get(search_handler))
        .route("/api/chat", post(chat_handler))
        .route("/api/reload", post(reload_handler))
        .fallback_service(ServeDir::new(public_dir))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Json<SearchResponse> {
    let index = state.index.snapshot();
    let k = params.k.max(1).min(50);
    let results = search(&index, &params.q, k);
    Json(SearchResponse { query: params.q, results })
}

pub async fn chat_handler(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        // No JSON content type: treat as an absent payload, not an error.
        Err(JsonRejection::MissingJsonContentType(_)) => ChatRequest::default(),
        Err(rejection) => {
            return (StatusCode::BAD_REQUEST, Json(json!({ "error": rejection.body_text() })))
                .into_response();
        }
    };
    let message = request
        .message
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty());
    let Some(message) = message else {
        return Json(ChatResponse { reply: "Say something 🙂".to_string(), context_used: None })
            .into_response();
    };

    let index = state.index.snapshot();
    let threshold = index.threshold.unwrap_or(DEFAULT_THRESHOLD);
    let context: Vec<_> = top_k(&index, &message, DEFAULT_TOP_K)
        .into_iter()
        .filter(|hit| hit.score > threshold)
        .collect();

    let context_text = context
        .iter()
        .map(|hit| format!("Q: {}\nA: {}", hit.document.question, hit.document.answer))
        .collect::<Vec<_>>()
        .join("\n\n");
    let system = "You are a helpful assistant. Prefer using CONTEXT if relevant.";
    let user = format!(
        "Question: {message}\n\nCONTEXT:\n{}",
        if context_text.is_empty() { "(none)" } else { context_text.as_str() }
    );

    match state.generator.complete(system, &user).await {
        Ok(reply) => {
            let context_used = context
                .iter()
                .map(|hit| ContextUsed {
                    q: hit.document.question.clone(),
                    score: round3(hit.score),
                })
                .collect();
            Json(ChatResponse { reply, context_used: Some(context_used) }).into_response()
        }
        Err(err) => {
            tracing::error!(error = %err, "generation request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "reply": "Error calling generation API", "error": err.to_string() })),
            )
                .into_response()
        }
    }
}

pub async fn reload_handler(State(state): State<AppState>) -> Response {
    match state.index.reload(state.source.as_ref()) {
        Ok(count) => Json(json!({ "ok": true, "count": count })).into_response(),
        Err(err) => {
            tracing::error!(error = %err, "corpus reload failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "ok": false, "error": err.to_string() })),
            )
                .into_response()
        }
    }
}

fn round3(score: f32) -> f32 {
    (score * 1000.0).round() / 1000.0
}
