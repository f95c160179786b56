//! Professor entity - Instructors that courses are assigned to.
//!
//! Specialty areas are persisted as a single comma-separated column.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Professor database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "professors")]
pub struct Model {
    /// Unique identifier for the professor
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Full name
    pub name: String,
    /// Contact email
    pub email: String,
    /// Contact phone
    pub phone: Option<String>,
    /// Specialty areas, comma separated (e.g. `"Procurement, Contracts"`)
    pub specialties: Option<String>,
    /// Short biography
    pub bio: Option<String>,
}

/// Defines relationships between Professor and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One professor teaches many courses
    #[sea_orm(has_many = "super::course::Entity")]
    Courses,
}

impl Related<super::course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Courses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
