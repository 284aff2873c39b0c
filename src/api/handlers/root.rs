use axum::{response::IntoResponse, Json};
use serde_json::json;

// axum handler for the public landing route
pub async fn root() -> impl IntoResponse {
    Json(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
