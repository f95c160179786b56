//! Course entity - A scheduled course offering that leads enroll into.
//!
//! Status is stored as a plain string token; see `core::adapters` for the
//! mapping to [`crate::models::CourseStatus`].

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Course database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "courses")]
pub struct Model {
    /// Unique identifier for the course
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Course topic shown on cards and reports
    pub topic: String,
    /// Professor teaching the course, if assigned
    pub professor_id: Option<i64>,
    /// City where the course takes place
    pub city: String,
    /// Region code (state abbreviation)
    pub region: String,
    /// First day of the course
    pub starts_on: Date,
    /// Last day of the course
    pub ends_on: Date,
    /// Workload in hours
    pub duration_hours: i32,
    /// Price of a single registration
    pub registration_price: f64,
    /// Free-text description
    pub description: Option<String>,
    /// Lifecycle status token, e.g. `"open_for_enrollment"`
    pub status: Option<String>,
    /// Target number of registrations, if one was set
    pub registration_target: Option<i32>,
}

/// Defines relationships between Course and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each course may be taught by one professor
    #[sea_orm(
        belongs_to = "super::professor::Entity",
        from = "Column::ProfessorId",
        to = "super::professor::Column::Id",
        on_delete = "SetNull"
    )]
    Professor,
    /// One course has many leads
    #[sea_orm(has_many = "super::lead::Entity")]
    Leads,
}

impl Related<super::professor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Professor.def()
    }
}

impl Related<super::lead::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Leads.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
