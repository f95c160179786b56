//! Annual goal entity - Company-wide revenue target for one calendar year.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Annual goal database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "annual_goals")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Calendar year the goal covers
    #[sea_orm(unique)]
    pub year: i32,
    /// Revenue target for the year
    pub target: f64,
    /// What reaching the goal means
    pub description: Option<String>,
}

/// `AnnualGoal` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
