pub mod coach;
pub mod health;
pub mod nutrition;

use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::error::ServerError;

/// API information at the root path.
pub async fn api_info() -> impl IntoResponse {
    Json(json!({
        "service": "coach-server",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "summary": "POST /api/v1/coach/summary",
            "reference": "POST /api/v1/coach/reference",
            "answer": "POST /api/v1/coach/answer",
            "nutrition": "POST /api/v1/nutrition",
        }
    }))
}

/// Fallback for unknown paths.
pub async fn not_found() -> ServerError {
    ServerError::NotFound
}
