//! Lead entity - A sales opportunity for one course, owned by one seller.
//!
//! Contact fields are stored flat on the row. Money columns are plain
//! floats, and `registration_count` is nullable because older rows never
//! filled it in.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lead database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "leads")]
pub struct Model {
    /// Unique identifier for the lead
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Course this lead wants to enroll into
    pub course_id: i64,
    /// Name of the responsible contact
    pub contact_name: String,
    /// Organization the contact works for
    pub organization: String,
    /// Department or sector inside the organization
    pub sector: Option<String>,
    /// Contact city
    pub city: String,
    /// Contact region code
    pub region: String,
    /// Contact phone
    pub phone: Option<String>,
    /// Contact email
    pub email: Option<String>,
    /// Number of registrations requested
    pub registration_count: Option<i32>,
    /// Price in the original proposal
    pub proposed_price: f64,
    /// Price after negotiation; overrides the proposal once set
    pub negotiated_price: Option<f64>,
    /// Seller responsible for the lead
    pub seller_id: i64,
    /// Lifecycle status token, e.g. `"proposal_sent"`
    pub status: Option<String>,
    /// Day the lead was registered
    pub created_on: Option<Date>,
    /// Day the enrollment was confirmed
    pub converted_on: Option<Date>,
    /// Why the proposal was declined, e.g. `"price"`
    pub loss_reason: Option<String>,
    /// Free-text notes
    pub notes: Option<String>,
}

/// Defines relationships between Lead and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each lead belongs to one course
    #[sea_orm(
        belongs_to = "super::course::Entity",
        from = "Column::CourseId",
        to = "super::course::Column::Id"
    )]
    Course,
    /// Each lead belongs to one seller
    #[sea_orm(
        belongs_to = "super::seller::Entity",
        from = "Column::SellerId",
        to = "super::seller::Column::Id"
    )]
    Seller,
}

impl Related<super::course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::seller::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Seller.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
