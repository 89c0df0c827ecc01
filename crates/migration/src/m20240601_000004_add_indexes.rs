use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Job: date-window scans order by scheduled_at
        manager
            .create_index(
                Index::create()
                    .name("idx_job_scheduled_at")
                    .table(Job::Table)
                    .col(Job::ScheduledAt)
                    .to_owned(),
            )
            .await?;

        // Job: lookups by owning client (client detail, delete guard)
        manager
            .create_index(
                Index::create()
                    .name("idx_job_client")
                    .table(Job::Table)
                    .col(Job::ClientId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_job_job_type")
                    .table(Job::Table)
                    .col(Job::JobTypeId)
                    .to_owned(),
            )
            .await?;

        // JobType: listed alphabetically
        manager
            .create_index(
                Index::create()
                    .name("idx_job_type_name")
                    .table(JobType::Table)
                    .col(JobType::Name)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_job_scheduled_at").table(Job::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_job_client").table(Job::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_job_job_type").table(Job::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_job_type_name").table(JobType::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Job { Table, ScheduledAt, ClientId, JobTypeId }

#[derive(DeriveIden)]
enum JobType { Table, Name }
