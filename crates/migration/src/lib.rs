//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240601_000001_create_client;
mod m20240601_000002_create_job_type;
mod m20240601_000003_create_job;
mod m20240601_000004_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240601_000001_create_client::Migration),
            Box::new(m20240601_000002_create_job_type::Migration),
            Box::new(m20240601_000003_create_job::Migration),
            // Indexes should always be applied last
            Box::new(m20240601_000004_add_indexes::Migration),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_registered_in_dependency_order() {
        let names: Vec<String> = Migrator::migrations().iter().map(|m| m.name().to_string()).collect();
        assert_eq!(
            names,
            vec![
                "m20240601_000001_create_client",
                "m20240601_000002_create_job_type",
                "m20240601_000003_create_job",
                "m20240601_000004_add_indexes",
            ]
        );
    }
}
