//! Create `job_type` table.
//!
//! Reusable service templates, e.g. "Ceiling Fan Install".
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(JobType::Table)
                    .if_not_exists()
                    .col(pk_auto(JobType::Id))
                    .col(string_len(JobType::Name, 255).not_null())
                    .col(text_null(JobType::DefaultDescription))
                    .col(double_null(JobType::DefaultPrice))
                    .col(timestamp_with_time_zone(JobType::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(JobType::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(JobType::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum JobType { Table, Id, Name, DefaultDescription, DefaultPrice, CreatedAt, UpdatedAt }
