//! Seeds an empty database from [`AppConfig`].
//!
//! Seeding is additive: sellers are matched by name and goals by year, and
//! anything already present is left untouched. A default commission rule is
//! created only when the store has no rules at all.

use crate::{
    config::settings::AppConfig,
    core::{commission, goals, seller},
    errors::Result,
    models::{AnnualGoalPatch, SellerPatch},
};
use sea_orm::ConnectionTrait;
use tracing::{debug, info, instrument};

/// What a seeding run inserted.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    /// Sellers inserted
    pub sellers: usize,
    /// Goals inserted
    pub goals: usize,
    /// Whether the default commission rule was created
    pub default_rule: bool,
}

/// Inserts configured sellers, goals and the default commission rule that
/// are missing from the store.
#[instrument(skip_all)]
pub async fn seed_from_config<C>(db: &C, config: &AppConfig) -> Result<SeedSummary>
where
    C: ConnectionTrait,
{
    let mut summary = SeedSummary::default();

    for entry in &config.sellers {
        if seller::get_seller_by_name(db, &entry.name).await?.is_some() {
            debug!("Seller '{}' already present", entry.name);
            continue;
        }
        seller::create_seller(
            db,
            &SellerPatch {
                name: Some(entry.name.clone()),
                email: Some(entry.email.clone()),
                monthly_quota: Some(entry.monthly_quota),
                annual_quota: Some(entry.annual_quota),
            },
        )
        .await?;
        summary.sellers += 1;
    }

    for entry in &config.goals {
        if goals::get_goal_by_year(db, entry.year).await?.is_some() {
            debug!("Goal for {} already present", entry.year);
            continue;
        }
        goals::upsert_goal(
            db,
            entry.year,
            &AnnualGoalPatch {
                year: Some(entry.year),
                target: Some(entry.target),
                description: Some(entry.description.clone()),
            },
        )
        .await?;
        summary.goals += 1;
    }

    if commission::list_rules(db).await?.is_empty() {
        commission::create_rule(db, config.default_commission_rate, None, None).await?;
        summary.default_rule = true;
    }

    info!(
        "Seeded {} sellers, {} goals, default rule created: {}",
        summary.sellers, summary.goals, summary.default_rule
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::config::settings::{GoalConfig, SellerConfig};
    use crate::test_utils::setup_test_db;

    fn config() -> AppConfig {
        AppConfig {
            sellers: vec![SellerConfig {
                name: "Ariane".to_string(),
                email: "ariane@example.com".to_string(),
                monthly_quota: 50_000.0,
                annual_quota: 600_000.0,
            }],
            goals: vec![GoalConfig {
                year: 2025,
                target: 3_000_000.0,
                description: None,
            }],
            default_commission_rate: 6.0,
            ..AppConfig::default()
        }
    }

    #[tokio::test]
    async fn test_seed_inserts_everything_once() -> Result<()> {
        let db = setup_test_db().await?;

        let first = seed_from_config(&db, &config()).await?;
        assert_eq!(
            first,
            SeedSummary {
                sellers: 1,
                goals: 1,
                default_rule: true
            }
        );

        let second = seed_from_config(&db, &config()).await?;
        assert_eq!(second, SeedSummary::default());

        let rules = commission::list_rules(&db).await?;
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].rate, 6.0);
        assert_eq!(seller::get_all_sellers(&db).await?.len(), 1);
        Ok(())
    }
}
