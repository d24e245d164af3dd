use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};

pub const WELCOME_MESSAGE: &str = "Welcome to the LexGuard AI API. Use /generate or /check.";

#[derive(Debug, Serialize)]
pub struct WelcomeResponse {
    pub message: &'static str,
}

pub async fn welcome() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: WELCOME_MESSAGE,
    })
}

/// Liveness probe. Never calls the completion service.
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "lexguard-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
