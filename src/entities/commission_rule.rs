//! Commission rule entity - A percentage scoped to a seller, a course, both or neither.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Commission rule database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "commission_rules")]
pub struct Model {
    /// Unique identifier for the rule
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Commission percentage (5.0 means 5%)
    pub rate: f64,
    /// Seller the rule applies to, None for any seller
    pub seller_id: Option<i64>,
    /// Course the rule applies to, None for any course
    pub course_id: Option<i64>,
    /// `"default"` or `"specific"`
    pub kind: String,
}

/// Defines relationships between `CommissionRule` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Optional seller scope
    #[sea_orm(
        belongs_to = "super::seller::Entity",
        from = "Column::SellerId",
        to = "super::seller::Column::Id"
    )]
    Seller,
    /// Optional course scope
    #[sea_orm(
        belongs_to = "super::course::Entity",
        from = "Column::CourseId",
        to = "super::course::Column::Id"
    )]
    Course,
}

impl ActiveModelBehavior for ActiveModel {}
