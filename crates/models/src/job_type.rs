use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::{job, validation};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "job_type")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// e.g. "Ceiling Fan Install"
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub default_description: Option<String>,
    pub default_price: Option<f64>,
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

pub const NAME_MAX: usize = 255;

pub fn validate_name(name: &str) -> Result<String, ModelError> {
    validation::required_text_max("name", name, NAME_MAX)
}

pub fn validate_default_price(price: Option<f64>) -> Result<Option<f64>, ModelError> {
    validation::non_negative_amount("defaultPrice", price)
}
