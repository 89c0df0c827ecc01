//! Service layer for the scheduling backend.
//! - Repositories (`repository`, `repo`) hide persistence behind traits.
//! - Services validate input, check references and compute date windows.
//! - Errors are framework-agnostic; the HTTP layer maps them to status codes.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

pub mod errors;
pub mod domain;
pub mod repository;
pub mod repo;
pub mod clients;
pub mod job_types;
pub mod jobs;
#[cfg(test)]
pub mod test_support;

use clients::ClientsService;
use job_types::JobTypesService;
use jobs::schedule::SchedulePolicy;
use jobs::JobsService;
use repo::SeaOrmRepository;
use repository::mock::MemoryStore;
use repository::{ClientRepository, JobRepository, JobTypeRepository};

/// The service graph shared by request handlers.
#[derive(Clone)]
pub struct AppServices {
    pub clients: Arc<ClientsService>,
    pub job_types: Arc<JobTypesService>,
    pub jobs: Arc<JobsService>,
}

impl AppServices {
    /// Wire all services over one store implementing every repository trait.
    pub fn with_store<S>(store: Arc<S>, policy: SchedulePolicy) -> Self
    where
        S: ClientRepository + JobTypeRepository + JobRepository + 'static,
    {
        let clients: Arc<dyn ClientRepository> = store.clone();
        let job_types: Arc<dyn JobTypeRepository> = store.clone();
        let jobs: Arc<dyn JobRepository> = store;
        Self {
            clients: Arc::new(ClientsService::new(clients.clone(), jobs.clone())),
            job_types: Arc::new(JobTypesService::new(job_types.clone())),
            jobs: Arc::new(JobsService::new(jobs, clients, job_types, policy)),
        }
    }

    pub fn seaorm(db: DatabaseConnection, policy: SchedulePolicy) -> Self {
        Self::with_store(Arc::new(SeaOrmRepository::new(db)), policy)
    }

    pub fn in_memory(policy: SchedulePolicy) -> Self { Self::with_store(Arc::new(MemoryStore::new()), policy) }
}
