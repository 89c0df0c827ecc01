use async_trait::async_trait;

use crate::domain::{Client, ClientFields, Job, JobFields, JobFilter, JobStatus, JobType, JobTypeFields};
use crate::errors::ServiceError;

/// Persistence for clients. Ordering: newest first (`created_at`, then id, descending).
#[async_trait]
pub trait ClientRepository: Send + Sync {
    async fn insert_client(&self, fields: ClientFields) -> Result<Client, ServiceError>;
    async fn list_clients(&self) -> Result<Vec<Client>, ServiceError>;
    async fn find_client(&self, id: i32) -> Result<Option<Client>, ServiceError>;
    /// `None` when no row has this id.
    async fn update_client(&self, id: i32, fields: ClientFields) -> Result<Option<Client>, ServiceError>;
    async fn delete_client(&self, id: i32) -> Result<bool, ServiceError>;
}

/// Persistence for job types. Ordering: by name, then id.
#[async_trait]
pub trait JobTypeRepository: Send + Sync {
    async fn insert_job_type(&self, fields: JobTypeFields) -> Result<JobType, ServiceError>;
    async fn list_job_types(&self) -> Result<Vec<JobType>, ServiceError>;
    async fn find_job_type(&self, id: i32) -> Result<Option<JobType>, ServiceError>;
    async fn update_job_type(&self, id: i32, fields: JobTypeFields) -> Result<Option<JobType>, ServiceError>;
    /// Jobs that referenced the type lose their reference.
    async fn delete_job_type(&self, id: i32) -> Result<bool, ServiceError>;
}

/// Persistence for jobs. Reads return jobs with client and job type resolved.
#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn insert_job(&self, fields: JobFields) -> Result<Job, ServiceError>;
    async fn find_job(&self, id: i32) -> Result<Option<Job>, ServiceError>;
    async fn list_jobs(&self, filter: JobFilter) -> Result<Vec<Job>, ServiceError>;
    async fn count_jobs_for_client(&self, client_id: i32) -> Result<u64, ServiceError>;
    async fn update_job(&self, id: i32, fields: JobFields) -> Result<bool, ServiceError>;
    /// Touches only `status` and `updated_at`.
    async fn set_job_status(&self, id: i32, status: JobStatus) -> Result<bool, ServiceError>;
    async fn delete_job(&self, id: i32) -> Result<bool, ServiceError>;
}

/// In-memory store for tests, doc examples and database-less runs.
///
/// Mirrors the relational constraints of the schema: jobs must point at an
/// existing client, clients with jobs cannot be removed, and removing a job
/// type detaches it from its jobs.
pub mod mock {
    use super::*;
    use chrono::{DateTime, Utc};
    use std::collections::BTreeMap;
    use std::sync::{Mutex, MutexGuard};

    #[derive(Debug, Clone)]
    struct JobRow {
        id: i32,
        fields: JobFields,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    }

    #[derive(Default)]
    struct State {
        clients: BTreeMap<i32, Client>,
        job_types: BTreeMap<i32, JobType>,
        jobs: BTreeMap<i32, JobRow>,
        next_client: i32,
        next_job_type: i32,
        next_job: i32,
    }

    impl State {
        fn check_refs(&self, fields: &JobFields) -> Result<(), ServiceError> {
            if !self.clients.contains_key(&fields.client_id) {
                return Err(ServiceError::Db(format!("foreign key violation: client {} does not exist", fields.client_id)));
            }
            if let Some(tid) = fields.job_type_id {
                if !self.job_types.contains_key(&tid) {
                    return Err(ServiceError::Db(format!("foreign key violation: job type {tid} does not exist")));
                }
            }
            Ok(())
        }

        fn resolve(&self, row: &JobRow) -> Result<Job, ServiceError> {
            let client = self
                .clients
                .get(&row.fields.client_id)
                .cloned()
                .ok_or_else(|| ServiceError::Db(format!("job {} references missing client", row.id)))?;
            let job_type = row.fields.job_type_id.and_then(|tid| self.job_types.get(&tid).cloned());
            Ok(Job {
                id: row.id,
                client,
                job_type,
                scheduled_at: row.fields.scheduled_at,
                description: row.fields.description.clone(),
                status: row.fields.status,
                price_estimate: row.fields.price_estimate,
                created_at: row.created_at,
                updated_at: row.updated_at,
            })
        }
    }

    #[derive(Default)]
    pub struct MemoryStore {
        state: Mutex<State>,
    }

    impl MemoryStore {
        pub fn new() -> Self { Self::default() }

        fn state(&self) -> MutexGuard<'_, State> {
            self.state.lock().unwrap_or_else(|e| e.into_inner())
        }
    }

    #[async_trait]
    impl ClientRepository for MemoryStore {
        async fn insert_client(&self, fields: ClientFields) -> Result<Client, ServiceError> {
            let mut st = self.state();
            st.next_client += 1;
            let now = Utc::now();
            let c = Client {
                id: st.next_client,
                name: fields.name,
                email: fields.email,
                phone: fields.phone,
                address: fields.address,
                notes: fields.notes,
                created_at: now,
                updated_at: now,
            };
            st.clients.insert(c.id, c.clone());
            Ok(c)
        }

        async fn list_clients(&self) -> Result<Vec<Client>, ServiceError> {
            let st = self.state();
            let mut out: Vec<Client> = st.clients.values().cloned().collect();
            out.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
            Ok(out)
        }

        async fn find_client(&self, id: i32) -> Result<Option<Client>, ServiceError> {
            Ok(self.state().clients.get(&id).cloned())
        }

        async fn update_client(&self, id: i32, fields: ClientFields) -> Result<Option<Client>, ServiceError> {
            let mut st = self.state();
            let Some(c) = st.clients.get_mut(&id) else { return Ok(None) };
            c.name = fields.name;
            c.email = fields.email;
            c.phone = fields.phone;
            c.address = fields.address;
            c.notes = fields.notes;
            c.updated_at = Utc::now();
            Ok(Some(c.clone()))
        }

        async fn delete_client(&self, id: i32) -> Result<bool, ServiceError> {
            let mut st = self.state();
            if st.jobs.values().any(|j| j.fields.client_id == id) {
                return Err(ServiceError::Db(format!("foreign key violation: client {id} still referenced by jobs")));
            }
            Ok(st.clients.remove(&id).is_some())
        }
    }

    #[async_trait]
    impl JobTypeRepository for MemoryStore {
        async fn insert_job_type(&self, fields: JobTypeFields) -> Result<JobType, ServiceError> {
            let mut st = self.state();
            st.next_job_type += 1;
            let now = Utc::now();
            let t = JobType {
                id: st.next_job_type,
                name: fields.name,
                default_description: fields.default_description,
                default_price: fields.default_price,
                created_at: now,
                updated_at: now,
            };
            st.job_types.insert(t.id, t.clone());
            Ok(t)
        }

        async fn list_job_types(&self) -> Result<Vec<JobType>, ServiceError> {
            let st = self.state();
            let mut out: Vec<JobType> = st.job_types.values().cloned().collect();
            out.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
            Ok(out)
        }

        async fn find_job_type(&self, id: i32) -> Result<Option<JobType>, ServiceError> {
            Ok(self.state().job_types.get(&id).cloned())
        }

        async fn update_job_type(&self, id: i32, fields: JobTypeFields) -> Result<Option<JobType>, ServiceError> {
            let mut st = self.state();
            let Some(t) = st.job_types.get_mut(&id) else { return Ok(None) };
            t.name = fields.name;
            t.default_description = fields.default_description;
            t.default_price = fields.default_price;
            t.updated_at = Utc::now();
            Ok(Some(t.clone()))
        }

        async fn delete_job_type(&self, id: i32) -> Result<bool, ServiceError> {
            let mut st = self.state();
            if st.job_types.remove(&id).is_none() {
                return Ok(false);
            }
            // ON DELETE SET NULL
            for row in st.jobs.values_mut() {
                if row.fields.job_type_id == Some(id) {
                    row.fields.job_type_id = None;
                }
            }
            Ok(true)
        }
    }

    #[async_trait]
    impl JobRepository for MemoryStore {
        async fn insert_job(&self, fields: JobFields) -> Result<Job, ServiceError> {
            let mut st = self.state();
            st.check_refs(&fields)?;
            st.next_job += 1;
            let now = Utc::now();
            let row = JobRow { id: st.next_job, fields, created_at: now, updated_at: now };
            let job = st.resolve(&row)?;
            st.jobs.insert(row.id, row);
            Ok(job)
        }

        async fn find_job(&self, id: i32) -> Result<Option<Job>, ServiceError> {
            let st = self.state();
            st.jobs.get(&id).map(|row| st.resolve(row)).transpose()
        }

        async fn list_jobs(&self, filter: JobFilter) -> Result<Vec<Job>, ServiceError> {
            let st = self.state();
            let mut rows: Vec<&JobRow> = st
                .jobs
                .values()
                .filter(|r| match filter.scheduled_between {
                    Some((start, end)) => r.fields.scheduled_at >= start && r.fields.scheduled_at <= end,
                    None => true,
                })
                .filter(|r| filter.status.map_or(true, |s| r.fields.status == s))
                .filter(|r| filter.client_ids.as_ref().map_or(true, |ids| ids.contains(&r.fields.client_id)))
                .collect();
            rows.sort_by(|a, b| a.fields.scheduled_at.cmp(&b.fields.scheduled_at).then(a.id.cmp(&b.id)));
            rows.into_iter().map(|r| st.resolve(r)).collect()
        }

        async fn count_jobs_for_client(&self, client_id: i32) -> Result<u64, ServiceError> {
            let st = self.state();
            Ok(st.jobs.values().filter(|r| r.fields.client_id == client_id).count() as u64)
        }

        async fn update_job(&self, id: i32, fields: JobFields) -> Result<bool, ServiceError> {
            let mut st = self.state();
            if !st.jobs.contains_key(&id) {
                return Ok(false);
            }
            st.check_refs(&fields)?;
            if let Some(row) = st.jobs.get_mut(&id) {
                row.fields = fields;
                row.updated_at = Utc::now();
            }
            Ok(true)
        }

        async fn set_job_status(&self, id: i32, status: JobStatus) -> Result<bool, ServiceError> {
            let mut st = self.state();
            match st.jobs.get_mut(&id) {
                Some(row) => {
                    row.fields.status = status;
                    row.updated_at = Utc::now();
                    Ok(true)
                }
                None => Ok(false),
            }
        }

        async fn delete_job(&self, id: i32) -> Result<bool, ServiceError> {
            Ok(self.state().jobs.remove(&id).is_some())
        }
    }

}
