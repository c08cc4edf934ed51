//! Job HTTP route handlers.
//!
//! - POST   /jobs             - Create job
//! - GET    /jobs             - List running jobs
//! - GET    /jobs/{id}/config - Get job config
//! - DELETE /jobs/{id}        - Delete job

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tracing::info;

use pingd_protocols::{JobConfig, JobId};

use super::{CreateJobRequest, GenericResponse};
use crate::error::ApiError;
use crate::state::ApiState;

fn parse_id(id: &str) -> Result<JobId, ApiError> {
    id.parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid job id '{}'", id)))
}

/// Create a new job.
///
/// POST /jobs
pub async fn create_job(
    State(state): State<ApiState>,
    body: Result<Json<CreateJobRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = body?;
    info!(
        "Creating job (schedule: {}, url: {})",
        request.cron_expression, request.task.url
    );

    let id = state
        .automator
        .create_job(request.cron_expression, request.task)
        .await?;

    Ok((StatusCode::CREATED, Json(GenericResponse::uid(id))))
}

/// List jobs with a live schedule entry.
///
/// GET /jobs
pub async fn list_jobs(State(state): State<ApiState>) -> Result<Json<Vec<JobConfig>>, ApiError> {
    let jobs = state.automator.running_jobs().await?;
    Ok(Json(jobs))
}

/// Get a job's stored config.
///
/// GET /jobs/{id}/config
pub async fn get_job_config(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<JobConfig>, ApiError> {
    let id = parse_id(&id)?;
    let config = state.automator.get_job(&id).await?;
    Ok(Json(config))
}

/// Delete a job.
///
/// DELETE /jobs/{id}
pub async fn delete_job(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    info!("Deleting job: {}", id);

    state.automator.delete_job(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;
