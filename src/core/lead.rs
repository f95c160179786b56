//! Lead business logic - the sales pipeline.
//!
//! Leads move `ProposalSent` → `EnrollmentCompleted` or `ProposalDeclined`.
//! Converting stamps the conversion day and clears any loss reason; declining
//! records why.

use crate::{
    core::{adapters, validation},
    entities::{Lead as LeadEntity, lead},
    errors::{Error, Result},
    models::{Lead, LeadId, LeadPatch, LeadStatus, LossReason},
};
use chrono::{Local, NaiveDate};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{info, instrument, warn};

fn validate_patch(patch: &LeadPatch) -> Result<()> {
    if let Some(name) = &patch.contact_name {
        validation::validate_required(name, "Contact name")?;
    }
    if let Some(org) = &patch.organization {
        validation::validate_required(org, "Organization")?;
    }
    if let Some(Some(email)) = &patch.email {
        validation::validate_email(email)?;
    }
    if let Some(Some(phone)) = &patch.phone {
        validation::validate_phone(phone)?;
    }
    if let Some(price) = patch.proposed_price {
        validation::validate_positive(price, "Proposed price")?;
    }
    if let Some(Some(price)) = patch.negotiated_price {
        validation::validate_positive(price, "Negotiated price")?;
    }
    if let Some(count) = patch.registrations {
        validation::validate_positive(f64::from(count), "Registrations")?;
    }
    Ok(())
}

/// Retrieves all leads, newest first.
pub async fn get_all_leads<C>(db: &C) -> Result<Vec<Lead>>
where
    C: ConnectionTrait,
{
    let rows = LeadEntity::find()
        .order_by_desc(lead::Column::CreatedOn)
        .order_by_desc(lead::Column::Id)
        .all(db)
        .await?;
    Ok(rows.iter().map(adapters::lead_to_domain).collect())
}

/// Finds a lead by id.
pub async fn get_lead_by_id<C>(db: &C, lead_id: LeadId) -> Result<Option<Lead>>
where
    C: ConnectionTrait,
{
    let row = LeadEntity::find_by_id(lead_id).one(db).await?;
    Ok(row.as_ref().map(adapters::lead_to_domain))
}

/// Creates a lead. Course, seller, contact name, organization, city, region
/// and proposed price are required. Status defaults to `ProposalSent`,
/// registrations to 1 and the creation day to today.
#[instrument(skip(db, patch))]
pub async fn create_lead<C>(db: &C, patch: &LeadPatch) -> Result<Lead>
where
    C: ConnectionTrait,
{
    if patch.course_id.is_none()
        || patch.seller_id.is_none()
        || patch.contact_name.is_none()
        || patch.organization.is_none()
        || patch.city.is_none()
        || patch.region.is_none()
        || patch.proposed_price.is_none()
    {
        return Err(Error::validation("Missing required lead fields"));
    }
    validate_patch(patch)?;

    let active = adapters::lead_to_row(&LeadPatch {
        status: Some(patch.status.unwrap_or_default()),
        registrations: Some(patch.registrations.unwrap_or(1)),
        created_on: Some(patch.created_on.flatten().or_else(|| Some(today()))),
        ..patch.clone()
    });

    let row = active.insert(db).await?;
    info!(
        "Created lead {} for '{}' on course {}",
        row.id, row.organization, row.course_id
    );
    Ok(adapters::lead_to_domain(&row))
}

/// Applies a partial update to a lead.
#[instrument(skip(db, patch))]
pub async fn update_lead<C>(db: &C, lead_id: LeadId, patch: &LeadPatch) -> Result<Lead>
where
    C: ConnectionTrait,
{
    validate_patch(patch)?;
    if LeadEntity::find_by_id(lead_id).one(db).await?.is_none() {
        return Err(Error::NotFound {
            entity: "lead",
            id: lead_id,
        });
    }

    let mut active = adapters::lead_to_row(patch);
    active.id = Set(lead_id);
    let row = active.update(db).await?;
    Ok(adapters::lead_to_domain(&row))
}

/// Deletes a lead.
#[instrument(skip(db))]
pub async fn delete_lead<C>(db: &C, lead_id: LeadId) -> Result<()>
where
    C: ConnectionTrait,
{
    let result = LeadEntity::delete_by_id(lead_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::NotFound {
            entity: "lead",
            id: lead_id,
        });
    }
    info!("Deleted lead {lead_id}");
    Ok(())
}

/// The patch a pipeline move applies, computed for a given day.
///
/// Converting stamps `on` and clears the loss reason. Declining stores the
/// reason and, when given, the notes. Moving back to `ProposalSent` clears
/// both the conversion day and the reason.
#[must_use]
pub fn status_move_patch(
    status: LeadStatus,
    loss_reason: Option<LossReason>,
    notes: Option<String>,
    on: NaiveDate,
) -> LeadPatch {
    let mut patch = LeadPatch {
        status: Some(status),
        ..Default::default()
    };
    match status {
        LeadStatus::EnrollmentCompleted => {
            patch.converted_on = Some(Some(on));
            patch.loss_reason = Some(None);
        }
        LeadStatus::ProposalDeclined => {
            patch.converted_on = Some(None);
            patch.loss_reason = Some(loss_reason);
            if notes.is_some() {
                patch.notes = Some(notes);
            }
        }
        LeadStatus::ProposalSent => {
            patch.converted_on = Some(None);
            patch.loss_reason = Some(None);
        }
    }
    patch
}

/// Moves a lead to another pipeline stage.
#[instrument(skip(db, notes))]
pub async fn move_lead_status<C>(
    db: &C,
    lead_id: LeadId,
    status: LeadStatus,
    loss_reason: Option<LossReason>,
    notes: Option<String>,
) -> Result<Lead>
where
    C: ConnectionTrait,
{
    if status == LeadStatus::ProposalDeclined && loss_reason.is_none() {
        warn!("Lead {lead_id} declined without a reason");
    }
    let patch = status_move_patch(status, loss_reason, notes, today());
    let lead = update_lead(db, lead_id, &patch).await?;
    info!("Lead {lead_id} moved to {status:?}");
    Ok(lead)
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
