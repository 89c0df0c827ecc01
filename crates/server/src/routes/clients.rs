use axum::{extract::{Path, State}, http::StatusCode, Json};
use service::domain::{Client, ClientPatch, ClientWithJobs, NewClient};

use crate::{errors::JsonApiError, state::ServerState};

#[utoipa::path(
    post, path = "/clients", tag = "clients",
    request_body = crate::openapi::NewClientDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::ClientDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn create(State(state): State<ServerState>, Json(input): Json<NewClient>) -> Result<(StatusCode, Json<Client>), JsonApiError> {
    let client = state.services.clients.create(input).await?;
    Ok((StatusCode::CREATED, Json(client)))
}

#[utoipa::path(
    get, path = "/clients", tag = "clients",
    responses((status = 200, description = "Newest first, with jobs", body = [crate::openapi::ClientWithJobsDoc]))
)]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<ClientWithJobs>>, JsonApiError> {
    Ok(Json(state.services.clients.list().await?))
}

#[utoipa::path(
    get, path = "/clients/{id}", tag = "clients",
    params(("id" = i32, Path, description = "Client ID")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::ClientWithJobsDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn get(State(state): State<ServerState>, Path(id): Path<i32>) -> Result<Json<ClientWithJobs>, JsonApiError> {
    Ok(Json(state.services.clients.get(id).await?))
}

#[utoipa::path(
    patch, path = "/clients/{id}", tag = "clients",
    params(("id" = i32, Path, description = "Client ID")),
    request_body = crate::openapi::ClientPatchDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::ClientWithJobsDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    Json(patch): Json<ClientPatch>,
) -> Result<Json<ClientWithJobs>, JsonApiError> {
    Ok(Json(state.services.clients.update(id, patch).await?))
}

#[utoipa::path(
    delete, path = "/clients/{id}", tag = "clients",
    params(("id" = i32, Path, description = "Client ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc),
        (status = 409, description = "Client still has jobs", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i32>) -> Result<StatusCode, JsonApiError> {
    state.services.clients.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
