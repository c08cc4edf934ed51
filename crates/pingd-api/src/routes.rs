//! HTTP route definitions.

use axum::{
    routing::{delete, get},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::job::routes as job_routes;
use crate::state::ApiState;

/// Build the application router.
pub fn create_router(state: ApiState) -> Router {
    let job_router = Router::new()
        .route("/", get(job_routes::list_jobs).post(job_routes::create_job))
        .route("/{id}", delete(job_routes::delete_job))
        .route("/{id}/config", get(job_routes::get_job_config))
        .with_state(state);

    Router::new()
        .route("/health", get(health))
        .nest("/jobs", job_router)
        .layer(TraceLayer::new_for_http())
}

/// GET /health
async fn health() -> Json<Value> {
    Json(json!({"status": "up"}))
}
