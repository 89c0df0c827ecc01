//! Records exchanged between repositories, services and the HTTP layer.
//!
//! Wire names are camelCase. Patch types keep `Option<Option<T>>` for nullable
//! columns so that an absent key leaves the field alone while `null` clears it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

pub use models::job::JobStatus;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: i32,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobType {
    pub id: i32,
    pub name: String,
    pub default_description: Option<String>,
    pub default_price: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A job with its client and job type resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i32,
    pub client: Client,
    pub job_type: Option<JobType>,
    pub scheduled_at: DateTime<Utc>,
    pub description: Option<String>,
    pub status: JobStatus,
    pub price_estimate: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A job as listed under its owning client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientJob {
    pub id: i32,
    pub job_type: Option<JobType>,
    pub scheduled_at: DateTime<Utc>,
    pub description: Option<String>,
    pub status: JobStatus,
    pub price_estimate: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Job> for ClientJob {
    fn from(j: Job) -> Self {
        Self {
            id: j.id,
            job_type: j.job_type,
            scheduled_at: j.scheduled_at,
            description: j.description,
            status: j.status,
            price_estimate: j.price_estimate,
            created_at: j.created_at,
            updated_at: j.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientWithJobs {
    #[serde(flatten)]
    pub client: Client,
    pub jobs: Vec<ClientJob>,
}

// ---- inputs ----

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewClient {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub address: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJobType {
    pub name: String,
    #[serde(default)]
    pub default_description: Option<String>,
    #[serde(default)]
    pub default_price: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobTypePatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub default_description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub default_price: Option<Option<f64>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJob {
    pub client_id: i32,
    #[serde(default)]
    pub job_type_id: Option<i32>,
    /// RFC 3339, naive local date-time or bare date.
    pub scheduled_at: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<JobStatus>,
    #[serde(default)]
    pub price_estimate: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPatch {
    #[serde(default)]
    pub client_id: Option<i32>,
    #[serde(default, deserialize_with = "double_option")]
    pub job_type_id: Option<Option<i32>>,
    #[serde(default)]
    pub scheduled_at: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub status: Option<JobStatus>,
    #[serde(default, deserialize_with = "double_option")]
    pub price_estimate: Option<Option<f64>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: JobStatus,
}

// ---- repository write sets ----

/// Writable client columns, already validated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientFields {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

impl From<&Client> for ClientFields {
    fn from(c: &Client) -> Self {
        Self {
            name: c.name.clone(),
            email: c.email.clone(),
            phone: c.phone.clone(),
            address: c.address.clone(),
            notes: c.notes.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobTypeFields {
    pub name: String,
    pub default_description: Option<String>,
    pub default_price: Option<f64>,
}

impl From<&JobType> for JobTypeFields {
    fn from(t: &JobType) -> Self {
        Self {
            name: t.name.clone(),
            default_description: t.default_description.clone(),
            default_price: t.default_price,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct JobFields {
    pub client_id: i32,
    pub job_type_id: Option<i32>,
    pub scheduled_at: DateTime<Utc>,
    pub description: Option<String>,
    pub status: JobStatus,
    pub price_estimate: Option<f64>,
}

impl From<&Job> for JobFields {
    fn from(j: &Job) -> Self {
        Self {
            client_id: j.client.id,
            job_type_id: j.job_type.as_ref().map(|t| t.id),
            scheduled_at: j.scheduled_at,
            description: j.description.clone(),
            status: j.status,
            price_estimate: j.price_estimate,
        }
    }
}

/// Selection applied by [`crate::repository::JobRepository::list`].
/// Results are always ordered by `scheduled_at`, then id.
#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    /// Inclusive on both ends.
    pub scheduled_between: Option<(DateTime<Utc>, DateTime<Utc>)>,
    pub status: Option<JobStatus>,
    pub client_ids: Option<Vec<i32>>,
}

fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}
