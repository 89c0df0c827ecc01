use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

use models::{client, job, job_type};

use crate::domain::{Client, ClientFields, Job, JobFields, JobFilter, JobStatus, JobType, JobTypeFields};
use crate::errors::ServiceError;
use crate::repository::{ClientRepository, JobRepository, JobTypeRepository};

/// PostgreSQL-backed implementation of every repository trait.
pub struct SeaOrmRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }

    /// Loads the clients and job types referenced by `rows` in two batched queries.
    async fn resolve_jobs(&self, rows: Vec<job::Model>) -> Result<Vec<Job>, ServiceError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let client_ids: BTreeSet<i32> = rows.iter().map(|r| r.client_id).collect();
        let type_ids: BTreeSet<i32> = rows.iter().filter_map(|r| r.job_type_id).collect();

        let clients: HashMap<i32, Client> = client::Entity::find()
            .filter(client::Column::Id.is_in(client_ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|m| (m.id, Client::from(m)))
            .collect();

        let types: HashMap<i32, JobType> = if type_ids.is_empty() {
            HashMap::new()
        } else {
            job_type::Entity::find()
                .filter(job_type::Column::Id.is_in(type_ids))
                .all(&self.db)
                .await?
                .into_iter()
                .map(|m| (m.id, JobType::from(m)))
                .collect()
        };

        rows.into_iter()
            .map(|r| {
                let client = clients
                    .get(&r.client_id)
                    .cloned()
                    .ok_or_else(|| ServiceError::Db(format!("job {} references missing client {}", r.id, r.client_id)))?;
                Ok(Job {
                    id: r.id,
                    client,
                    job_type: r.job_type_id.and_then(|tid| types.get(&tid).cloned()),
                    scheduled_at: utc(r.scheduled_at),
                    description: r.description,
                    status: r.status,
                    price_estimate: r.price_estimate,
                    created_at: utc(r.created_at),
                    updated_at: utc(r.updated_at),
                })
            })
            .collect()
    }
}

fn utc(ts: DateTimeWithTimeZone) -> DateTime<Utc> { ts.with_timezone(&Utc) }

fn tz(ts: DateTime<Utc>) -> DateTimeWithTimeZone { ts.into() }

impl From<client::Model> for Client {
    fn from(m: client::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            email: m.email,
            phone: m.phone,
            address: m.address,
            notes: m.notes,
            created_at: utc(m.created_at),
            updated_at: utc(m.updated_at),
        }
    }
}

impl From<job_type::Model> for JobType {
    fn from(m: job_type::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            default_description: m.default_description,
            default_price: m.default_price,
            created_at: utc(m.created_at),
            updated_at: utc(m.updated_at),
        }
    }
}

#[async_trait::async_trait]
impl ClientRepository for SeaOrmRepository {
    async fn insert_client(&self, fields: ClientFields) -> Result<Client, ServiceError> {
        let now = tz(Utc::now());
        let am = client::ActiveModel {
            name: Set(fields.name),
            email: Set(fields.email),
            phone: Set(fields.phone),
            address: Set(fields.address),
            notes: Set(fields.notes),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        Ok(am.insert(&self.db).await?.into())
    }

    async fn list_clients(&self) -> Result<Vec<Client>, ServiceError> {
        let rows = client::Entity::find()
            .order_by_desc(client::Column::CreatedAt)
            .order_by_desc(client::Column::Id)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(Client::from).collect())
    }

    async fn find_client(&self, id: i32) -> Result<Option<Client>, ServiceError> {
        Ok(client::Entity::find_by_id(id).one(&self.db).await?.map(Client::from))
    }

    async fn update_client(&self, id: i32, fields: ClientFields) -> Result<Option<Client>, ServiceError> {
        let Some(existing) = client::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };
        let mut am: client::ActiveModel = existing.into();
        am.name = Set(fields.name);
        am.email = Set(fields.email);
        am.phone = Set(fields.phone);
        am.address = Set(fields.address);
        am.notes = Set(fields.notes);
        am.updated_at = Set(tz(Utc::now()));
        Ok(Some(am.update(&self.db).await?.into()))
    }

    async fn delete_client(&self, id: i32) -> Result<bool, ServiceError> {
        let res = client::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(res.rows_affected > 0)
    }
}

#[async_trait::async_trait]
impl JobTypeRepository for SeaOrmRepository {
    async fn insert_job_type(&self, fields: JobTypeFields) -> Result<JobType, ServiceError> {
        let now = tz(Utc::now());
        let am = job_type::ActiveModel {
            name: Set(fields.name),
            default_description: Set(fields.default_description),
            default_price: Set(fields.default_price),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        Ok(am.insert(&self.db).await?.into())
    }

    async fn list_job_types(&self) -> Result<Vec<JobType>, ServiceError> {
        let rows = job_type::Entity::find()
            .order_by_asc(job_type::Column::Name)
            .order_by_asc(job_type::Column::Id)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(JobType::from).collect())
    }

    async fn find_job_type(&self, id: i32) -> Result<Option<JobType>, ServiceError> {
        Ok(job_type::Entity::find_by_id(id).one(&self.db).await?.map(JobType::from))
    }

    async fn update_job_type(&self, id: i32, fields: JobTypeFields) -> Result<Option<JobType>, ServiceError> {
        let Some(existing) = job_type::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };
        let mut am: job_type::ActiveModel = existing.into();
        am.name = Set(fields.name);
        am.default_description = Set(fields.default_description);
        am.default_price = Set(fields.default_price);
        am.updated_at = Set(tz(Utc::now()));
        Ok(Some(am.update(&self.db).await?.into()))
    }

    async fn delete_job_type(&self, id: i32) -> Result<bool, ServiceError> {
        // job.job_type_id is ON DELETE SET NULL
        let res = job_type::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(res.rows_affected > 0)
    }
}

#[async_trait::async_trait]
impl JobRepository for SeaOrmRepository {
    async fn insert_job(&self, fields: JobFields) -> Result<Job, ServiceError> {
        let now = tz(Utc::now());
        let am = job::ActiveModel {
            client_id: Set(fields.client_id),
            job_type_id: Set(fields.job_type_id),
            scheduled_at: Set(tz(fields.scheduled_at)),
            description: Set(fields.description),
            status: Set(fields.status),
            price_estimate: Set(fields.price_estimate),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let row = am.insert(&self.db).await?;
        self.resolve_jobs(vec![row])
            .await?
            .pop()
            .ok_or_else(|| ServiceError::Db("inserted job could not be read back".into()))
    }

    async fn find_job(&self, id: i32) -> Result<Option<Job>, ServiceError> {
        let Some(row) = job::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };
        Ok(self.resolve_jobs(vec![row]).await?.pop())
    }

    async fn list_jobs(&self, filter: JobFilter) -> Result<Vec<Job>, ServiceError> {
        let mut q = job::Entity::find();
        if let Some((start, end)) = filter.scheduled_between {
            q = q.filter(job::Column::ScheduledAt.between(tz(start), tz(end)));
        }
        if let Some(status) = filter.status {
            q = q.filter(job::Column::Status.eq(status));
        }
        if let Some(ids) = filter.client_ids {
            q = q.filter(job::Column::ClientId.is_in(ids));
        }
        let rows = q
            .order_by_asc(job::Column::ScheduledAt)
            .order_by_asc(job::Column::Id)
            .all(&self.db)
            .await?;
        self.resolve_jobs(rows).await
    }

    async fn count_jobs_for_client(&self, client_id: i32) -> Result<u64, ServiceError> {
        let n = job::Entity::find()
            .filter(job::Column::ClientId.eq(client_id))
            .count(&self.db)
            .await?;
        Ok(n)
    }

    async fn update_job(&self, id: i32, fields: JobFields) -> Result<bool, ServiceError> {
        let Some(existing) = job::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(false);
        };
        let mut am: job::ActiveModel = existing.into();
        am.client_id = Set(fields.client_id);
        am.job_type_id = Set(fields.job_type_id);
        am.scheduled_at = Set(tz(fields.scheduled_at));
        am.description = Set(fields.description);
        am.status = Set(fields.status);
        am.price_estimate = Set(fields.price_estimate);
        am.updated_at = Set(tz(Utc::now()));
        am.update(&self.db).await?;
        Ok(true)
    }

    async fn set_job_status(&self, id: i32, status: JobStatus) -> Result<bool, ServiceError> {
        let Some(existing) = job::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(false);
        };
        let mut am: job::ActiveModel = existing.into();
        am.status = Set(status);
        am.updated_at = Set(tz(Utc::now()));
        am.update(&self.db).await?;
        Ok(true)
    }

    async fn delete_job(&self, id: i32) -> Result<bool, ServiceError> {
        let res = job::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(res.rows_affected > 0)
    }
}
