use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::Value;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::gateway::{FeedGateway, GatewayError};

pub const LIVENESS_TEXT: &str = "Server is running!";

#[derive(Clone)]
pub struct AppState {
    gateway: Arc<dyn FeedGateway>,
}

impl AppState {
    pub fn new(gateway: Arc<dyn FeedGateway>) -> Self {
        Self { gateway }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { LIVENESS_TEXT }))
        .route("/health", get(|| async { "OK" }))
        .route("/api/popular", get(popular))
        .route("/api/news", get(news))
        .route("/api/nyt", get(news))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// Alias kept for callers that build the router by its short name.
pub fn router(state: AppState) -> Router {
    create_router(state)
}

async fn popular(State(state): State<AppState>) -> Result<Json<Value>, GatewayError> {
    let raw = state.gateway.fetch_social_feed().await?;
    Ok(Json(raw.0))
}

async fn news(State(state): State<AppState>) -> Result<Json<Value>, GatewayError> {
    let raw = state.gateway.fetch_news_feed().await?;
    Ok(Json(raw.0))
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        tracing::warn!(
            target: "api",
            upstream = %self.upstream,
            kind = ?self.kind,
            status = ?self.status,
            "responding with error envelope"
        );
        (StatusCode::INTERNAL_SERVER_ERROR, Json(self.envelope())).into_response()
    }
}
