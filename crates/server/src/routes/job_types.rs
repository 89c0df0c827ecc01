use axum::{extract::{Path, State}, http::StatusCode, Json};
use service::domain::{JobType, JobTypePatch, NewJobType};

use crate::{errors::JsonApiError, state::ServerState};

#[utoipa::path(
    post, path = "/job-types", tag = "job-types",
    request_body = crate::openapi::NewJobTypeDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::JobTypeDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn create(State(state): State<ServerState>, Json(input): Json<NewJobType>) -> Result<(StatusCode, Json<JobType>), JsonApiError> {
    let t = state.services.job_types.create(input).await?;
    Ok((StatusCode::CREATED, Json(t)))
}

#[utoipa::path(
    get, path = "/job-types", tag = "job-types",
    responses((status = 200, description = "Alphabetical by name", body = [crate::openapi::JobTypeDoc]))
)]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<JobType>>, JsonApiError> {
    Ok(Json(state.services.job_types.list().await?))
}

#[utoipa::path(
    get, path = "/job-types/{id}", tag = "job-types",
    params(("id" = i32, Path, description = "Job type ID")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::JobTypeDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn get(State(state): State<ServerState>, Path(id): Path<i32>) -> Result<Json<JobType>, JsonApiError> {
    Ok(Json(state.services.job_types.get(id).await?))
}

#[utoipa::path(
    patch, path = "/job-types/{id}", tag = "job-types",
    params(("id" = i32, Path, description = "Job type ID")),
    request_body = crate::openapi::JobTypePatchDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::JobTypeDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    Json(patch): Json<JobTypePatch>,
) -> Result<Json<JobType>, JsonApiError> {
    Ok(Json(state.services.job_types.update(id, patch).await?))
}

#[utoipa::path(
    delete, path = "/job-types/{id}", tag = "job-types",
    params(("id" = i32, Path, description = "Job type ID")),
    responses(
        (status = 204, description = "Deleted; jobs keep existing without a type"),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i32>) -> Result<StatusCode, JsonApiError> {
    state.services.job_types.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
