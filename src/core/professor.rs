//! Professor business logic.

use crate::{
    core::{adapters, validation},
    entities::{Professor as ProfessorEntity, professor},
    errors::{Error, Result},
    models::{Professor, ProfessorId, ProfessorPatch},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{info, instrument};

fn validate_patch(patch: &ProfessorPatch) -> Result<()> {
    if let Some(name) = &patch.name {
        validation::validate_required(name, "Name")?;
    }
    if let Some(email) = &patch.email {
        validation::validate_email(email)?;
    }
    if let Some(Some(phone)) = &patch.phone {
        validation::validate_phone(phone)?;
    }
    Ok(())
}

/// Retrieves all professors ordered by name.
pub async fn get_all_professors<C>(db: &C) -> Result<Vec<Professor>>
where
    C: ConnectionTrait,
{
    let rows = ProfessorEntity::find()
        .order_by_asc(professor::Column::Name)
        .all(db)
        .await?;
    Ok(rows.iter().map(adapters::professor_to_domain).collect())
}

/// Finds a professor by id.
pub async fn get_professor_by_id<C>(db: &C, professor_id: ProfessorId) -> Result<Option<Professor>>
where
    C: ConnectionTrait,
{
    let row = ProfessorEntity::find_by_id(professor_id).one(db).await?;
    Ok(row.as_ref().map(adapters::professor_to_domain))
}

/// Creates a professor. Name and email are required.
#[instrument(skip(db, patch))]
pub async fn create_professor<C>(db: &C, patch: &ProfessorPatch) -> Result<Professor>
where
    C: ConnectionTrait,
{
    if patch.name.is_none() || patch.email.is_none() {
        return Err(Error::validation("Professor name and email are required"));
    }
    validate_patch(patch)?;

    let row = adapters::professor_to_row(patch).insert(db).await?;
    info!("Created professor '{}' ({})", row.name, row.id);
    Ok(adapters::professor_to_domain(&row))
}

/// Applies a partial update to a professor.
#[instrument(skip(db, patch))]
pub async fn update_professor<C>(
    db: &C,
    professor_id: ProfessorId,
    patch: &ProfessorPatch,
) -> Result<Professor>
where
    C: ConnectionTrait,
{
    validate_patch(patch)?;
    if ProfessorEntity::find_by_id(professor_id).one(db).await?.is_none() {
        return Err(Error::NotFound {
            entity: "professor",
            id: professor_id,
        });
    }

    let mut active = adapters::professor_to_row(patch);
    active.id = Set(professor_id);
    let row = active.update(db).await?;
    Ok(adapters::professor_to_domain(&row))
}

/// Deletes a professor. Courses they taught keep existing without one.
#[instrument(skip(db))]
pub async fn delete_professor<C>(db: &C, professor_id: ProfessorId) -> Result<()>
where
    C: ConnectionTrait,
{
    let result = ProfessorEntity::delete_by_id(professor_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::NotFound {
            entity: "professor",
            id: professor_id,
        });
    }
    info!("Deleted professor {professor_id}");
    Ok(())
}
