//! OpenAPI document; schema-only mirrors of the wire records.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

#[derive(Serialize, ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(Serialize, ToSchema)]
pub struct ErrorDoc {
    /// Reason phrase, e.g. "Not Found"
    pub error: String,
    pub message: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum JobStatusDoc { Scheduled, InProgress, Completed, Cancelled }

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientDoc {
    pub id: i32,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobTypeDoc {
    pub id: i32,
    pub name: String,
    pub default_description: Option<String>,
    pub default_price: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobDoc {
    pub id: i32,
    pub client: ClientDoc,
    pub job_type: Option<JobTypeDoc>,
    pub scheduled_at: DateTime<Utc>,
    pub description: Option<String>,
    pub status: JobStatusDoc,
    pub price_estimate: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Job as nested under its client (no `client` field).
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientJobDoc {
    pub id: i32,
    pub job_type: Option<JobTypeDoc>,
    pub scheduled_at: DateTime<Utc>,
    pub description: Option<String>,
    pub status: JobStatusDoc,
    pub price_estimate: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientWithJobsDoc {
    pub id: i32,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub jobs: Vec<ClientJobDoc>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewClientDoc {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

/// Absent fields are left untouched; `null` clears optional ones.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientPatchDoc {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewJobTypeDoc {
    pub name: String,
    pub default_description: Option<String>,
    pub default_price: Option<f64>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobTypePatchDoc {
    pub name: Option<String>,
    pub default_description: Option<String>,
    pub default_price: Option<f64>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewJobDoc {
    pub client_id: i32,
    /// Unknown ids leave the job without a type
    pub job_type_id: Option<i32>,
    /// RFC 3339, `YYYY-MM-DDTHH:MM[:SS]` local time, or `YYYY-MM-DD`
    #[schema(example = "2024-06-15T09:30")]
    pub scheduled_at: String,
    pub description: Option<String>,
    pub status: Option<JobStatusDoc>,
    pub price_estimate: Option<f64>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobPatchDoc {
    pub client_id: Option<i32>,
    pub job_type_id: Option<i32>,
    pub scheduled_at: Option<String>,
    pub description: Option<String>,
    pub status: Option<JobStatusDoc>,
    pub price_estimate: Option<f64>,
}

#[derive(Serialize, ToSchema)]
pub struct StatusUpdateDoc { pub status: JobStatusDoc }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::clients::create,
        crate::routes::clients::list,
        crate::routes::clients::get,
        crate::routes::clients::update,
        crate::routes::clients::delete,
        crate::routes::job_types::create,
        crate::routes::job_types::list,
        crate::routes::job_types::get,
        crate::routes::job_types::update,
        crate::routes::job_types::delete,
        crate::routes::jobs::create,
        crate::routes::jobs::list,
        crate::routes::jobs::upcoming,
        crate::routes::jobs::get,
        crate::routes::jobs::update,
        crate::routes::jobs::update_status,
        crate::routes::jobs::delete,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorDoc,
            JobStatusDoc,
            ClientDoc,
            JobTypeDoc,
            JobDoc,
            ClientJobDoc,
            ClientWithJobsDoc,
            NewClientDoc,
            ClientPatchDoc,
            NewJobTypeDoc,
            JobTypePatchDoc,
            NewJobDoc,
            JobPatchDoc,
            StatusUpdateDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "clients"),
        (name = "job-types"),
        (name = "jobs")
    )
)]
pub struct ApiDoc;
