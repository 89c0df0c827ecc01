use axum::{extract::{Path, Query, State}, http::StatusCode, Json};
use serde::Deserialize;
use service::domain::{Job, JobPatch, NewJob, StatusUpdate};
use service::jobs::schedule::{parse_date, parse_days};

use crate::{errors::JsonApiError, state::ServerState};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Calendar day `YYYY-MM-DD` in the scheduling time zone
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UpcomingQuery {
    /// Days after today to include (default from configuration, normally 7)
    #[param(value_type = Option<u32>)]
    pub days: Option<String>,
}

#[utoipa::path(
    post, path = "/jobs", tag = "jobs",
    request_body = crate::openapi::NewJobDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::JobDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Client not found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn create(State(state): State<ServerState>, Json(input): Json<NewJob>) -> Result<(StatusCode, Json<Job>), JsonApiError> {
    let job = state.services.jobs.create(input).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

#[utoipa::path(
    get, path = "/jobs", tag = "jobs",
    params(ListQuery),
    responses(
        (status = 200, description = "Ordered by scheduledAt", body = [crate::openapi::JobDoc]),
        (status = 400, description = "Invalid date", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn list(State(state): State<ServerState>, Query(q): Query<ListQuery>) -> Result<Json<Vec<Job>>, JsonApiError> {
    // 空字符串视为未传 date
    let date = q
        .date
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .map(parse_date)
        .transpose()?;
    Ok(Json(state.services.jobs.list(date).await?))
}

#[utoipa::path(
    get, path = "/jobs/upcoming", tag = "jobs",
    params(UpcomingQuery),
    responses(
        (status = 200, description = "Scheduled jobs from today through today + days", body = [crate::openapi::JobDoc]),
        (status = 400, description = "Invalid days", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn upcoming(State(state): State<ServerState>, Query(q): Query<UpcomingQuery>) -> Result<Json<Vec<Job>>, JsonApiError> {
    let days = q
        .days
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .map(parse_days)
        .transpose()?;
    Ok(Json(state.services.jobs.upcoming(days).await?))
}

#[utoipa::path(
    get, path = "/jobs/{id}", tag = "jobs",
    params(("id" = i32, Path, description = "Job ID")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::JobDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn get(State(state): State<ServerState>, Path(id): Path<i32>) -> Result<Json<Job>, JsonApiError> {
    Ok(Json(state.services.jobs.get(id).await?))
}

#[utoipa::path(
    patch, path = "/jobs/{id}", tag = "jobs",
    params(("id" = i32, Path, description = "Job ID")),
    request_body = crate::openapi::JobPatchDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::JobDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Job or client not found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    Json(patch): Json<JobPatch>,
) -> Result<Json<Job>, JsonApiError> {
    Ok(Json(state.services.jobs.update(id, patch).await?))
}

#[utoipa::path(
    patch, path = "/jobs/{id}/status", tag = "jobs",
    params(("id" = i32, Path, description = "Job ID")),
    request_body = crate::openapi::StatusUpdateDoc,
    responses(
        (status = 200, description = "Status changed", body = crate::openapi::JobDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc),
        (status = 409, description = "Transition not allowed", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    Json(body): Json<StatusUpdate>,
) -> Result<Json<Job>, JsonApiError> {
    Ok(Json(state.services.jobs.update_status(id, body.status).await?))
}

#[utoipa::path(
    delete, path = "/jobs/{id}", tag = "jobs",
    params(("id" = i32, Path, description = "Job ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i32>) -> Result<StatusCode, JsonApiError> {
    state.services.jobs.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
