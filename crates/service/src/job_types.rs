use std::sync::Arc;

use tracing::{info, instrument};

use models::job_type::{validate_default_price, validate_name};
use models::validation::optional_text;

use crate::domain::{JobType, JobTypeFields, JobTypePatch, NewJobType};
use crate::errors::ServiceError;
use crate::repository::JobTypeRepository;

/// Service templates offered to clients ("Ceiling Fan Install", ...).
pub struct JobTypesService {
    repo: Arc<dyn JobTypeRepository>,
}

impl JobTypesService {
    pub fn new(repo: Arc<dyn JobTypeRepository>) -> Self { Self { repo } }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: NewJobType) -> Result<JobType, ServiceError> {
        let fields = JobTypeFields {
            name: validate_name(&input.name)?,
            default_description: optional_text(input.default_description),
            default_price: validate_default_price(input.default_price)?,
        };
        let t = self.repo.insert_job_type(fields).await?;
        info!(event = "job_type_created", job_type_id = t.id, name = %t.name);
        Ok(t)
    }

    pub async fn list(&self) -> Result<Vec<JobType>, ServiceError> { self.repo.list_job_types().await }

    pub async fn get(&self, id: i32) -> Result<JobType, ServiceError> {
        self.repo.find_job_type(id).await?.ok_or_else(|| ServiceError::not_found("JobType", id))
    }

    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: i32, patch: JobTypePatch) -> Result<JobType, ServiceError> {
        let current = self.get(id).await?;
        let mut fields = JobTypeFields::from(&current);
        if let Some(name) = patch.name {
            fields.name = validate_name(&name)?;
        }
        if let Some(desc) = patch.default_description {
            fields.default_description = optional_text(desc);
        }
        if let Some(price) = patch.default_price {
            fields.default_price = validate_default_price(price)?;
        }
        self.repo.update_job_type(id, fields).await?.ok_or_else(|| ServiceError::not_found("JobType", id))?;
        info!(event = "job_type_updated", job_type_id = id);
        self.get(id).await
    }

    /// Jobs using this type keep existing without one.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        if !self.repo.delete_job_type(id).await? {
            return Err(ServiceError::not_found("JobType", id));
        }
        info!(event = "job_type_deleted", job_type_id = id);
        Ok(())
    }
}
