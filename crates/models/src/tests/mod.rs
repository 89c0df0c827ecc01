//! Schema-level tests against a live PostgreSQL.
//!
//! Skipped unless `DATABASE_URL` is set; `SKIP_DB_TESTS` forces a skip.

use crate::db::{connect_with_config, migrate, DatabaseConfig};
use crate::{client, job, job_type};
use anyhow::Result;
use chrono::{Duration, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use tokio::sync::OnceCell;

static MIGRATED: OnceCell<()> = OnceCell::const_new();

async fn setup_test_db() -> Result<Option<DatabaseConnection>> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(None);
    }
    let Ok(url) = std::env::var("DATABASE_URL") else { return Ok(None) };
    let cfg = DatabaseConfig { url, max_connections: 2, min_connections: 1, ..Default::default() };
    let db = connect_with_config(&cfg).await?;
    MIGRATED.get_or_try_init(|| migrate(&db)).await?;
    Ok(Some(db))
}

async fn insert_client(db: &DatabaseConnection, name: &str) -> Result<client::Model> {
    let now = Utc::now().into();
    let am = client::ActiveModel {
        name: Set(name.to_string()),
        email: Set(None),
        phone: Set(Some("555-0100".into())),
        address: Set(None),
        notes: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}

async fn insert_job(db: &DatabaseConnection, client_id: i32, job_type_id: Option<i32>) -> Result<job::Model> {
    let now = Utc::now();
    let am = job::ActiveModel {
        client_id: Set(client_id),
        job_type_id: Set(job_type_id),
        scheduled_at: Set((now + Duration::days(1)).into()),
        description: Set(Some("schema test".into())),
        status: Set(job::JobStatus::Scheduled),
        price_estimate: Set(Some(99.5)),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}

#[tokio::test]
async fn client_with_jobs_cannot_be_deleted() -> Result<()> {
    let Some(db) = setup_test_db().await? else { return Ok(()) };

    let c = insert_client(&db, "schema_restrict_client").await?;
    let j = insert_job(&db, c.id, None).await?;

    let res = client::Entity::delete_by_id(c.id).exec(&db).await;
    assert!(res.is_err(), "FK should restrict deleting a client that owns jobs");

    job::Entity::delete_by_id(j.id).exec(&db).await?;
    let res = client::Entity::delete_by_id(c.id).exec(&db).await?;
    assert_eq!(res.rows_affected, 1);
    Ok(())
}

#[tokio::test]
async fn deleting_job_type_detaches_jobs() -> Result<()> {
    let Some(db) = setup_test_db().await? else { return Ok(()) };

    let c = insert_client(&db, "schema_set_null_client").await?;
    let now = Utc::now().into();
    let jt = job_type::ActiveModel {
        name: Set("Gutter Cleaning".into()),
        default_description: Set(None),
        default_price: Set(Some(150.0)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&db)
    .await?;
    let j = insert_job(&db, c.id, Some(jt.id)).await?;
    assert_eq!(j.status, job::JobStatus::Scheduled);

    job_type::Entity::delete_by_id(jt.id).exec(&db).await?;
    let reloaded = job::Entity::find_by_id(j.id).one(&db).await?.expect("job still present");
    assert_eq!(reloaded.job_type_id, None);

    job::Entity::delete_by_id(j.id).exec(&db).await?;
    client::Entity::delete_by_id(c.id).exec(&db).await?;
    Ok(())
}
