// routes.rs
use std::sync::Arc;

use axum::{middleware, routing::get, Extension, Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::{
    handler::{chat::chat_handler, escrow::escrow_handler, jobs::jobs_handler},
    middleware::auth,
    AppState,
};

// Health check handler
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "message": "Server is running"
    }))
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let protected_routes = Router::new()
        .merge(jobs_handler())
        .merge(escrow_handler())
        .merge(chat_handler())
        .layer(middleware::from_fn(auth));

    let api_route = Router::new()
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(Extension(app_state));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_route)
}
