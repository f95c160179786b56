//! Entity module - SeaORM definitions for the persisted row shapes.
//! Rows use snake_case columns, foreign-key ids and string status tokens;
//! `core::adapters` converts them into the domain types in `models`.

pub mod annual_goal;
pub mod commission_rule;
pub mod course;
pub mod lead;
pub mod professor;
pub mod seller;

// Re-export specific types to avoid conflicts
pub use annual_goal::{
    Column as AnnualGoalColumn, Entity as AnnualGoal, Model as AnnualGoalModel,
};
pub use commission_rule::{
    Column as CommissionRuleColumn, Entity as CommissionRule, Model as CommissionRuleModel,
};
pub use course::{Column as CourseColumn, Entity as Course, Model as CourseModel};
pub use lead::{Column as LeadColumn, Entity as Lead, Model as LeadModel};
pub use professor::{Column as ProfessorColumn, Entity as Professor, Model as ProfessorModel};
pub use seller::{Column as SellerColumn, Entity as Seller, Model as SellerModel};
