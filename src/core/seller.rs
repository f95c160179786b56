//! Seller business logic - sales reps and their quotas.

use crate::{
    core::{adapters, validation},
    entities::{Seller as SellerEntity, seller},
    errors::{Error, Result},
    models::{Seller, SellerId, SellerPatch},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{info, instrument};

fn validate_patch(patch: &SellerPatch) -> Result<()> {
    if let Some(name) = &patch.name {
        validation::validate_required(name, "Name")?;
    }
    if let Some(email) = &patch.email {
        validation::validate_email(email)?;
    }
    for (quota, field) in [
        (patch.monthly_quota, "Monthly quota"),
        (patch.annual_quota, "Annual quota"),
    ] {
        if let Some(value) = quota {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::validation(format!("{field} cannot be negative")));
            }
        }
    }
    Ok(())
}

/// Retrieves all sellers ordered by name.
pub async fn get_all_sellers<C>(db: &C) -> Result<Vec<Seller>>
where
    C: ConnectionTrait,
{
    let rows = SellerEntity::find()
        .order_by_asc(seller::Column::Name)
        .all(db)
        .await?;
    Ok(rows.iter().map(adapters::seller_to_domain).collect())
}

/// Finds a seller by id.
pub async fn get_seller_by_id<C>(db: &C, seller_id: SellerId) -> Result<Option<Seller>>
where
    C: ConnectionTrait,
{
    let row = SellerEntity::find_by_id(seller_id).one(db).await?;
    Ok(row.as_ref().map(adapters::seller_to_domain))
}

/// Finds a seller by exact name. Used when seeding from configuration.
pub async fn get_seller_by_name<C>(db: &C, name: &str) -> Result<Option<Seller>>
where
    C: ConnectionTrait,
{
    let row = SellerEntity::find()
        .filter(seller::Column::Name.eq(name))
        .one(db)
        .await?;
    Ok(row.as_ref().map(adapters::seller_to_domain))
}

/// Creates a seller. Missing quotas are stored as zero.
#[instrument(skip(db, patch))]
pub async fn create_seller<C>(db: &C, patch: &SellerPatch) -> Result<Seller>
where
    C: ConnectionTrait,
{
    if patch.name.is_none() || patch.email.is_none() {
        return Err(Error::validation("Seller name and email are required"));
    }
    validate_patch(patch)?;

    let row = adapters::seller_to_row(&SellerPatch {
        monthly_quota: Some(patch.monthly_quota.unwrap_or(0.0)),
        annual_quota: Some(patch.annual_quota.unwrap_or(0.0)),
        ..patch.clone()
    })
    .insert(db)
    .await?;
    info!("Created seller '{}' ({})", row.name, row.id);
    Ok(adapters::seller_to_domain(&row))
}

/// Applies a partial update to a seller.
#[instrument(skip(db, patch))]
pub async fn update_seller<C>(db: &C, seller_id: SellerId, patch: &SellerPatch) -> Result<Seller>
where
    C: ConnectionTrait,
{
    validate_patch(patch)?;
    if SellerEntity::find_by_id(seller_id).one(db).await?.is_none() {
        return Err(Error::NotFound {
            entity: "seller",
            id: seller_id,
        });
    }

    let mut active = adapters::seller_to_row(patch);
    active.id = Set(seller_id);
    let row = active.update(db).await?;
    Ok(adapters::seller_to_domain(&row))
}

/// Sets a seller's monthly and annual quotas.
pub async fn update_quotas<C>(
    db: &C,
    seller_id: SellerId,
    monthly_quota: f64,
    annual_quota: f64,
) -> Result<Seller>
where
    C: ConnectionTrait,
{
    let seller = update_seller(
        db,
        seller_id,
        &SellerPatch {
            monthly_quota: Some(monthly_quota),
            annual_quota: Some(annual_quota),
            ..Default::default()
        },
    )
    .await?;
    info!(
        "Quotas for seller {seller_id} set to {monthly_quota}/month, {annual_quota}/year"
    );
    Ok(seller)
}

/// Deletes a seller. Fails at the store while leads still reference them.
#[instrument(skip(db))]
pub async fn delete_seller<C>(db: &C, seller_id: SellerId) -> Result<()>
where
    C: ConnectionTrait,
{
    let result = SellerEntity::delete_by_id(seller_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::NotFound {
            entity: "seller",
            id: seller_id,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_sellers_listed_by_name() -> Result<()> {
        let db = setup_test_db().await?;
        for name in ["Marcos", "Ariane", "Lucia"] {
            create_test_seller(&db, name).await?;
        }

        let names: Vec<String> = get_all_sellers(&db)
            .await?
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Ariane", "Lucia", "Marcos"]);
        assert!(get_seller_by_name(&db, "Lucia").await?.is_some());
        assert!(get_seller_by_name(&db, "Nobody").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_create_seller_defaults_quotas_to_zero() -> Result<()> {
        let db = setup_test_db().await?;
        let seller = create_seller(
            &db,
            &SellerPatch {
                name: Some("Ariane".to_string()),
                email: Some("ariane@example.com".to_string()),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(seller.monthly_quota, 0.0);
        assert_eq!(seller.annual_quota, 0.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_quotas() -> Result<()> {
        let db = setup_test_db().await?;
        let seller = create_test_seller(&db, "Ariane").await?;

        let updated = update_quotas(&db, seller.id, 40_000.0, 480_000.0).await?;
        assert_eq!(updated.monthly_quota, 40_000.0);
        assert_eq!(updated.annual_quota, 480_000.0);
        assert_eq!(updated.name, "Ariane");

        assert!(matches!(
            update_quotas(&db, seller.id, -1.0, 0.0).await,
            Err(Error::Validation { .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_email_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        let result = create_seller(
            &db,
            &SellerPatch {
                name: Some("Ariane".to_string()),
                email: Some("ariane".to_string()),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(result, Err(Error::Validation { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_seller() -> Result<()> {
        let db = setup_test_db().await?;
        let seller = create_test_seller(&db, "Ariane").await?;
        delete_seller(&db, seller.id).await?;
        assert!(get_seller_by_id(&db, seller.id).await?.is_none());
        assert!(matches!(
            delete_seller(&db, seller.id).await,
            Err(Error::NotFound { .. })
        ));
        Ok(())
    }
}
