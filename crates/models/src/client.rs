use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::{job, validation};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "client")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Job }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self { Relation::Job => Entity::has_many(job::Entity).into() }
    }
}

impl Related<job::Entity> for Entity {
    fn to() -> RelationDef { Relation::Job.def() }
}

impl ActiveModelBehavior for ActiveModel {}

// column widths, see the create_client migration
pub const NAME_MAX: usize = 255;
pub const EMAIL_MAX: usize = 255;
pub const PHONE_MAX: usize = 64;
pub const ADDRESS_MAX: usize = 512;

pub fn validate_name(name: &str) -> Result<String, ModelError> {
    validation::required_text_max("name", name, NAME_MAX)
}

/// Normalizes an optional email; blank means absent.
pub fn validate_email(email: Option<String>) -> Result<Option<String>, ModelError> {
    match validation::optional_text_max("email", email, EMAIL_MAX)? {
        Some(e) if !e.contains('@') => Err(ModelError::Validation("invalid email".into())),
        other => Ok(other),
    }
}

pub fn validate_phone(phone: Option<String>) -> Result<Option<String>, ModelError> {
    validation::optional_text_max("phone", phone, PHONE_MAX)
}

pub fn validate_address(address: Option<String>) -> Result<Option<String>, ModelError> {
    validation::optional_text_max("address", address, ADDRESS_MAX)
}
