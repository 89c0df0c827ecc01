//! Create `job` table with FKs to `client` and `job_type`.
//!
//! A client that still owns jobs cannot be deleted; deleting a job type
//! detaches it from its jobs.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Job::Table)
                    .if_not_exists()
                    .col(pk_auto(Job::Id))
                    .col(integer(Job::ClientId).not_null())
                    .col(integer_null(Job::JobTypeId))
                    .col(timestamp_with_time_zone(Job::ScheduledAt).not_null())
                    .col(text_null(Job::Description))
                    .col(
                        string_len(Job::Status, 32)
                            .not_null()
                            .default("scheduled"),
                    )
                    .col(double_null(Job::PriceEstimate))
                    .col(timestamp_with_time_zone(Job::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Job::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_job_client")
                            .from(Job::Table, Job::ClientId)
                            .to(Client::Table, Client::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_job_job_type")
                            .from(Job::Table, Job::JobTypeId)
                            .to(JobType::Table, JobType::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Job::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Job {
    Table,
    Id,
    ClientId,
    JobTypeId,
    ScheduledAt,
    Description,
    Status,
    PriceEstimate,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Client { Table, Id }

#[derive(DeriveIden)]
enum JobType { Table, Id }
