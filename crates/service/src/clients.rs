use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, instrument};

use models::client::{validate_address, validate_email, validate_name, validate_phone};
use models::validation::optional_text;

use crate::domain::{Client, ClientFields, ClientJob, ClientPatch, ClientWithJobs, JobFilter, NewClient};
use crate::errors::ServiceError;
use crate::repository::{ClientRepository, JobRepository};

pub struct ClientsService {
    clients: Arc<dyn ClientRepository>,
    jobs: Arc<dyn JobRepository>,
}

impl ClientsService {
    pub fn new(clients: Arc<dyn ClientRepository>, jobs: Arc<dyn JobRepository>) -> Self { Self { clients, jobs } }

    async fn attach_jobs(&self, clients: Vec<Client>) -> Result<Vec<ClientWithJobs>, ServiceError> {
        if clients.is_empty() {
            return Ok(Vec::new());
        }
        let filter = JobFilter { client_ids: Some(clients.iter().map(|c| c.id).collect()), ..Default::default() };
        let mut by_client: HashMap<i32, Vec<ClientJob>> = HashMap::new();
        for job in self.jobs.list_jobs(filter).await? {
            by_client.entry(job.client.id).or_default().push(job.into());
        }
        Ok(clients
            .into_iter()
            .map(|client| {
                let jobs = by_client.remove(&client.id).unwrap_or_default();
                ClientWithJobs { client, jobs }
            })
            .collect())
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: NewClient) -> Result<Client, ServiceError> {
        let fields = ClientFields {
            name: validate_name(&input.name)?,
            email: validate_email(input.email)?,
            phone: validate_phone(input.phone)?,
            address: validate_address(input.address)?,
            notes: optional_text(input.notes),
        };
        let client = self.clients.insert_client(fields).await?;
        info!(event = "client_created", client_id = client.id);
        Ok(client)
    }

    /// Newest first, each with its jobs in schedule order.
    pub async fn list(&self) -> Result<Vec<ClientWithJobs>, ServiceError> {
        let clients = self.clients.list_clients().await?;
        self.attach_jobs(clients).await
    }

    pub async fn get(&self, id: i32) -> Result<ClientWithJobs, ServiceError> {
        let client = self.find(id).await?;
        let mut found = self.attach_jobs(vec![client]).await?;
        found.pop().ok_or_else(|| ServiceError::not_found("Client", id))
    }

    async fn find(&self, id: i32) -> Result<Client, ServiceError> {
        self.clients.find_client(id).await?.ok_or_else(|| ServiceError::not_found("Client", id))
    }

    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: i32, patch: ClientPatch) -> Result<ClientWithJobs, ServiceError> {
        let current = self.find(id).await?;
        let mut fields = ClientFields::from(&current);
        if let Some(name) = patch.name {
            fields.name = validate_name(&name)?;
        }
        if let Some(email) = patch.email {
            fields.email = validate_email(email)?;
        }
        if let Some(phone) = patch.phone {
            fields.phone = validate_phone(phone)?;
        }
        if let Some(address) = patch.address {
            fields.address = validate_address(address)?;
        }
        if let Some(notes) = patch.notes {
            fields.notes = optional_text(notes);
        }
        self.clients
            .update_client(id, fields)
            .await?
            .ok_or_else(|| ServiceError::not_found("Client", id))?;
        info!(event = "client_updated", client_id = id);
        self.get(id).await
    }

    /// Refused while the client still owns jobs.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        self.find(id).await?;
        let owned = self.jobs.count_jobs_for_client(id).await?;
        if owned > 0 {
            return Err(ServiceError::Conflict(format!("Client with ID {id} still has {owned} job(s)")));
        }
        if !self.clients.delete_client(id).await? {
            return Err(ServiceError::not_found("Client", id));
        }
        info!(event = "client_deleted", client_id = id);
        Ok(())
    }
}
