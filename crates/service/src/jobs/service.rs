use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, instrument, warn};

use models::job::validate_price_estimate;
use models::validation::optional_text;

use super::schedule::{day_window, parse_scheduled_at, upcoming_window, SchedulePolicy};
use crate::domain::{Job, JobFields, JobFilter, JobPatch, JobStatus, NewJob};
use crate::errors::ServiceError;
use crate::repository::{ClientRepository, JobRepository, JobTypeRepository};

/// Job scheduling: creation with reference checks, day and upcoming listings,
/// status updates.
pub struct JobsService {
    jobs: Arc<dyn JobRepository>,
    clients: Arc<dyn ClientRepository>,
    job_types: Arc<dyn JobTypeRepository>,
    policy: SchedulePolicy,
}

impl JobsService {
    pub fn new(
        jobs: Arc<dyn JobRepository>,
        clients: Arc<dyn ClientRepository>,
        job_types: Arc<dyn JobTypeRepository>,
        policy: SchedulePolicy,
    ) -> Self {
        Self { jobs, clients, job_types, policy }
    }

    pub fn policy(&self) -> &SchedulePolicy { &self.policy }

    async fn require_client(&self, id: i32) -> Result<(), ServiceError> {
        match self.clients.find_client(id).await? {
            Some(_) => Ok(()),
            None => Err(ServiceError::not_found("Client", id)),
        }
    }

    /// Unknown job type ids resolve to "no job type".
    async fn resolve_job_type(&self, id: Option<i32>) -> Result<Option<i32>, ServiceError> {
        let Some(id) = id else { return Ok(None) };
        match self.job_types.find_job_type(id).await? {
            Some(t) => Ok(Some(t.id)),
            None => {
                warn!(event = "job_type_unresolved", job_type_id = id, "unknown job type; job saved without one");
                Ok(None)
            }
        }
    }

    /// Schedule a job for an existing client.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::domain::{NewClient, NewJob, JobStatus};
    /// use service::jobs::schedule::SchedulePolicy;
    /// use service::repository::mock::MemoryStore;
    /// use service::AppServices;
    ///
    /// let svc = AppServices::with_store(Arc::new(MemoryStore::new()), SchedulePolicy::default());
    /// let client = tokio_test::block_on(svc.clients.create(NewClient { name: "Ann".into(), ..Default::default() })).unwrap();
    /// let job = tokio_test::block_on(svc.jobs.create(NewJob {
    ///     client_id: client.id,
    ///     scheduled_at: "2024-06-15T09:30:00Z".into(),
    ///     ..Default::default()
    /// })).unwrap();
    /// assert_eq!(job.status, JobStatus::Scheduled);
    /// assert_eq!(job.client.name, "Ann");
    /// ```
    #[instrument(skip(self, input), fields(client_id = input.client_id))]
    pub async fn create(&self, input: NewJob) -> Result<Job, ServiceError> {
        self.require_client(input.client_id).await?;
        let scheduled_at = parse_scheduled_at(&input.scheduled_at, &self.policy.zone)?;
        let price_estimate = validate_price_estimate(input.price_estimate)?;
        let job_type_id = self.resolve_job_type(input.job_type_id).await?;

        let job = self
            .jobs
            .insert_job(JobFields {
                client_id: input.client_id,
                job_type_id,
                scheduled_at,
                description: optional_text(input.description),
                status: input.status.unwrap_or_default(),
                price_estimate,
            })
            .await?;
        info!(event = "job_created", job_id = job.id, client_id = job.client.id, scheduled_at = %job.scheduled_at);
        Ok(job)
    }

    /// All jobs, or only those scheduled on `date` in the scheduling zone.
    pub async fn list(&self, date: Option<NaiveDate>) -> Result<Vec<Job>, ServiceError> {
        let scheduled_between = match date {
            Some(d) => Some(day_window(d, &self.policy.zone)?),
            None => None,
        };
        self.jobs.list_jobs(JobFilter { scheduled_between, ..Default::default() }).await
    }

    /// Jobs still `scheduled` from the start of today through the end of `today + days`.
    pub async fn upcoming(&self, days: Option<u32>) -> Result<Vec<Job>, ServiceError> {
        let days = days.unwrap_or(self.policy.upcoming_default_days);
        self.upcoming_from(self.policy.today(), days).await
    }

    pub async fn upcoming_from(&self, today: NaiveDate, days: u32) -> Result<Vec<Job>, ServiceError> {
        let window = upcoming_window(today, days, &self.policy.zone)?;
        self.jobs
            .list_jobs(JobFilter {
                scheduled_between: Some(window),
                status: Some(JobStatus::Scheduled),
                client_ids: None,
            })
            .await
    }

    pub async fn get(&self, id: i32) -> Result<Job, ServiceError> {
        self.jobs.find_job(id).await?.ok_or_else(|| ServiceError::not_found("Job", id))
    }

    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: i32, patch: JobPatch) -> Result<Job, ServiceError> {
        let current = self.get(id).await?;
        let mut fields = JobFields::from(&current);

        if let Some(client_id) = patch.client_id {
            self.require_client(client_id).await?;
            fields.client_id = client_id;
        }
        if let Some(job_type_id) = patch.job_type_id {
            fields.job_type_id = self.resolve_job_type(job_type_id).await?;
        }
        if let Some(text) = patch.scheduled_at {
            fields.scheduled_at = parse_scheduled_at(&text, &self.policy.zone)?;
        }
        if let Some(description) = patch.description {
            fields.description = optional_text(description);
        }
        if let Some(status) = patch.status {
            self.check_transition(current.status, status)?;
            fields.status = status;
        }
        if let Some(price) = patch.price_estimate {
            fields.price_estimate = validate_price_estimate(price)?;
        }

        if !self.jobs.update_job(id, fields).await? {
            return Err(ServiceError::not_found("Job", id));
        }
        info!(event = "job_updated", job_id = id);
        self.get(id).await
    }

    /// Changes only the status (and `updatedAt`).
    #[instrument(skip(self))]
    pub async fn update_status(&self, id: i32, status: JobStatus) -> Result<Job, ServiceError> {
        let current = self.get(id).await?;
        self.check_transition(current.status, status)?;
        if !self.jobs.set_job_status(id, status).await? {
            return Err(ServiceError::not_found("Job", id));
        }
        info!(event = "job_status_changed", job_id = id, from = %current.status, to = %status);
        self.get(id).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        if !self.jobs.delete_job(id).await? {
            return Err(ServiceError::not_found("Job", id));
        }
        info!(event = "job_deleted", job_id = id);
        Ok(())
    }

    fn check_transition(&self, from: JobStatus, to: JobStatus) -> Result<(), ServiceError> {
        if self.policy.enforce_status_transitions && !from.can_transition_to(to) {
            return Err(ServiceError::Conflict(format!("cannot change job status from {from} to {to}")));
        }
        Ok(())
    }
}
