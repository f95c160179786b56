//! Course business logic - Handles all course-related operations.
//!
//! Provides functions for creating, retrieving, updating, and deleting courses.
//! Status changes are unrestricted: any status may be set from any other.

use crate::{
    core::{adapters, validation},
    entities::{Course as CourseEntity, CommissionRule, Lead, commission_rule, course, lead},
    errors::{Error, Result},
    models::{Course, CourseId, CoursePatch},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{info, instrument};

fn validate_patch(patch: &CoursePatch) -> Result<()> {
    if let Some(topic) = &patch.topic {
        validation::validate_required(topic, "Topic")?;
    }
    if let Some(price) = patch.registration_price {
        validation::validate_positive(price, "Registration price")?;
    }
    if let Some(hours) = patch.duration_hours {
        validation::validate_positive(f64::from(hours), "Duration")?;
    }
    if let (Some(start), Some(end)) = (patch.starts_on, patch.ends_on) {
        validation::validate_dates(start, end)?;
    }
    Ok(())
}

/// Retrieves all courses ordered by start date.
pub async fn get_all_courses<C>(db: &C) -> Result<Vec<Course>>
where
    C: ConnectionTrait,
{
    let rows = CourseEntity::find()
        .order_by_asc(course::Column::StartsOn)
        .order_by_asc(course::Column::Id)
        .all(db)
        .await?;
    Ok(rows.iter().map(adapters::course_to_domain).collect())
}

/// Finds a course by id, `None` when it does not exist.
pub async fn get_course_by_id<C>(db: &C, course_id: CourseId) -> Result<Option<Course>>
where
    C: ConnectionTrait,
{
    let row = CourseEntity::find_by_id(course_id).one(db).await?;
    Ok(row.as_ref().map(adapters::course_to_domain))
}

/// Creates a course. Topic, city, region, dates, duration and price are
/// required; the end date may not precede the start date.
#[instrument(skip(db, patch))]
pub async fn create_course<C>(db: &C, patch: &CoursePatch) -> Result<Course>
where
    C: ConnectionTrait,
{
    if patch.topic.is_none()
        || patch.city.is_none()
        || patch.region.is_none()
        || patch.starts_on.is_none()
        || patch.ends_on.is_none()
        || patch.duration_hours.is_none()
        || patch.registration_price.is_none()
    {
        return Err(Error::validation("Missing required course fields"));
    }
    validate_patch(patch)?;

    let mut active = adapters::course_to_row(patch);
    if patch.status.is_none() {
        active.status = Set(Some(adapters::course_status_token(Default::default()).to_string()));
    }
    let row = active.insert(db).await?;
    info!("Created course '{}' ({})", row.topic, row.id);
    Ok(adapters::course_to_domain(&row))
}

/// Applies a partial update to a course.
///
/// When only one of the dates changes, it is checked against the stored one.
#[instrument(skip(db, patch))]
pub async fn update_course<C>(db: &C, course_id: CourseId, patch: &CoursePatch) -> Result<Course>
where
    C: ConnectionTrait,
{
    validate_patch(patch)?;

    let existing = CourseEntity::find_by_id(course_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "course",
            id: course_id,
        })?;
    validation::validate_dates(
        patch.starts_on.unwrap_or(existing.starts_on),
        patch.ends_on.unwrap_or(existing.ends_on),
    )?;

    let mut active = adapters::course_to_row(patch);
    active.id = Set(course_id);
    let row = active.update(db).await?;
    Ok(adapters::course_to_domain(&row))
}

/// Deletes a course together with its leads and course-scoped commission
/// rules, in one database transaction.
#[instrument(skip(db))]
pub async fn delete_course<C>(db: &C, course_id: CourseId) -> Result<()>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;

    if CourseEntity::find_by_id(course_id).one(&txn).await?.is_none() {
        return Err(Error::NotFound {
            entity: "course",
            id: course_id,
        });
    }

    let leads = Lead::delete_many()
        .filter(lead::Column::CourseId.eq(course_id))
        .exec(&txn)
        .await?;
    CommissionRule::delete_many()
        .filter(commission_rule::Column::CourseId.eq(course_id))
        .exec(&txn)
        .await?;
    CourseEntity::delete_by_id(course_id).exec(&txn).await?;

    txn.commit().await?;
    info!(
        "Deleted course {course_id} and {} dependent leads",
        leads.rows_affected
    );
    Ok(())
}
