//! Shared test utilities.
//!
//! In-memory database setup, plain domain builders for the pure calculators,
//! and helpers that insert records with sensible defaults.

use crate::{
    core::{course, lead, professor, seller},
    errors::Result,
    models::{
        Contact, Course, CoursePatch, CourseStatus, Lead, LeadPatch, LeadStatus, Professor,
        ProfessorPatch, Seller, SellerPatch,
    },
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

/// A planned course in Recife, 10-12 March 2025, 1000.0 per registration.
pub fn sample_course(id: i64) -> Course {
    Course {
        id,
        topic: format!("Course {id}"),
        professor_id: None,
        city: "Recife".to_string(),
        region: "PE".to_string(),
        starts_on: date(2025, 3, 10),
        ends_on: date(2025, 3, 12),
        duration_hours: 16,
        registration_price: 1000.0,
        description: None,
        status: CourseStatus::Planned,
        registration_target: None,
    }
}

/// An open proposal for one registration at 1000.0.
pub fn sample_lead(course_id: i64, seller_id: i64) -> Lead {
    Lead {
        id: 0,
        course_id,
        contact: Contact {
            name: "Ana Souza".to_string(),
            organization: "City Hall of Olinda".to_string(),
            sector: None,
            city: "Olinda".to_string(),
            region: "PE".to_string(),
            phone: None,
            email: Some("ana@olinda.example".to_string()),
        },
        registrations: 1,
        proposed_price: 1000.0,
        negotiated_price: None,
        seller_id,
        status: LeadStatus::ProposalSent,
        created_on: None,
        converted_on: None,
        loss_reason: None,
        notes: None,
    }
}

/// A seller whose monthly quota is a twelfth of `annual_quota`.
pub fn sample_seller(id: i64, annual_quota: f64) -> Seller {
    Seller {
        id,
        name: format!("Seller {id}"),
        email: format!("seller{id}@example.com"),
        monthly_quota: annual_quota / 12.0,
        annual_quota,
    }
}

/// Every required course field, using the [`sample_course`] values.
pub fn sample_course_patch(topic: &str) -> CoursePatch {
    let template = sample_course(0);
    CoursePatch {
        topic: Some(topic.to_string()),
        ..CoursePatch::from(&template)
    }
}

/// Every required lead field, using the [`sample_lead`] values.
pub fn sample_lead_patch(course_id: i64, seller_id: i64) -> LeadPatch {
    LeadPatch::from(&sample_lead(course_id, seller_id))
}

/// Inserts a course built from [`sample_course_patch`].
pub async fn create_test_course(db: &DatabaseConnection, topic: &str) -> Result<Course> {
    course::create_course(db, &sample_course_patch(topic)).await
}

/// Inserts a seller with quotas of 10 000 a month and 120 000 a year.
pub async fn create_test_seller(db: &DatabaseConnection, name: &str) -> Result<Seller> {
    let email = format!(
        "{}@example.com",
        name.to_lowercase().replace(char::is_whitespace, ".")
    );
    seller::create_seller(
        db,
        &SellerPatch {
            name: Some(name.to_string()),
            email: Some(email),
            monthly_quota: Some(10_000.0),
            annual_quota: Some(120_000.0),
        },
    )
    .await
}

/// Inserts an open proposal built from [`sample_lead_patch`].
pub async fn create_test_lead(
    db: &DatabaseConnection,
    course_id: i64,
    seller_id: i64,
) -> Result<Lead> {
    lead::create_lead(db, &sample_lead_patch(course_id, seller_id)).await
}

/// Inserts a professor teaching procurement and contracts.
pub async fn create_test_professor(db: &DatabaseConnection, name: &str) -> Result<Professor> {
    let email = format!(
        "{}@example.com",
        name.to_lowercase().replace(char::is_whitespace, ".")
    );
    professor::create_professor(
        db,
        &ProfessorPatch {
            name: Some(name.to_string()),
            email: Some(email),
            phone: None,
            areas: Some(vec!["Procurement".to_string(), "Contracts".to_string()]),
            bio: None,
        },
    )
    .await
}

/// Sets up a database with one course and one seller.
/// Returns (db, course, seller) for lead-related tests.
pub async fn setup_with_course_and_seller() -> Result<(DatabaseConnection, Course, Seller)> {
    let db = setup_test_db().await?;
    let course = create_test_course(&db, "Public Procurement").await?;
    let seller = create_test_seller(&db, "Ariane").await?;
    Ok((db, course, seller))
}
