//! Goal and quota tracking.
//!
//! Progress is what the progress bars render: realized revenue over a
//! target, capped at 100%. Annual goals are stored one per year and are
//! written with upsert semantics.

use crate::{
    core::{adapters, metrics, validation},
    entities::{AnnualGoal as AnnualGoalEntity, annual_goal},
    errors::Result,
    models::{AnnualGoal, AnnualGoalPatch, Lead, Seller},
};
use chrono::{Datelike, NaiveDate};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{debug, info, instrument};

/// Realized revenue as a percentage of `target`, capped at 100. Returns 0
/// when the target is not positive.
#[must_use]
pub fn progress_percent(realized: f64, target: f64) -> f64 {
    if target <= 0.0 {
        return 0.0;
    }
    (realized / target * 100.0).min(100.0)
}

/// Sum of every seller's annual quota.
#[must_use]
pub fn quota_sum(sellers: &[Seller]) -> f64 {
    sellers.iter().map(|s| s.annual_quota).sum()
}

/// True when the individual annual quotas add up to more than the company goal.
#[must_use]
pub fn quotas_exceed_goal(sellers: &[Seller], goal: Option<&AnnualGoal>) -> bool {
    quota_sum(sellers) > goal.map_or(0.0, |g| g.target)
}

/// A seller's annual quota as a whole percentage of the company goal.
#[must_use]
pub fn share_of_goal(annual_quota: f64, goal_target: f64) -> f64 {
    if goal_target <= 0.0 {
        return 0.0;
    }
    (annual_quota / goal_target * 100.0).round()
}

/// Where a seller stands against their quotas.
#[derive(Debug, Clone, PartialEq)]
pub struct SellerProgress {
    /// Seller being measured
    pub seller_id: i64,
    /// Realized revenue over all time
    pub revenue: f64,
    /// Confirmed registrations over all time
    pub registrations: u32,
    /// Revenue converted in the year of the reference date
    pub year_revenue: f64,
    /// Revenue converted in the month of the reference date
    pub month_revenue: f64,
    /// Progress against the annual quota
    pub annual_percent: f64,
    /// Progress against the monthly quota
    pub monthly_percent: f64,
}

/// Computes a seller's progress as of `today`. Quota percentages only
/// count leads converted in the current year and month respectively.
#[must_use]
pub fn seller_progress(seller: &Seller, leads: &[Lead], today: NaiveDate) -> SellerProgress {
    let year_revenue = metrics::revenue_by_seller_for_year(leads, seller.id, today.year());
    let month_revenue =
        metrics::revenue_by_seller_for_month(leads, seller.id, today.year(), today.month());
    SellerProgress {
        seller_id: seller.id,
        revenue: metrics::revenue_by_seller(leads, seller.id),
        registrations: metrics::registrations_by_seller(leads, seller.id),
        year_revenue,
        month_revenue,
        annual_percent: progress_percent(year_revenue, seller.annual_quota),
        monthly_percent: progress_percent(month_revenue, seller.monthly_quota),
    }
}

/// The company goal for a year and how much of it has been realized.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalProgress {
    /// Calendar year
    pub year: i32,
    /// Goal target
    pub target: f64,
    /// Revenue from leads converted during the year
    pub realized: f64,
    /// Capped progress percentage
    pub percent: f64,
}

/// Measures `goal` against the leads converted in its year.
#[must_use]
pub fn goal_progress(goal: &AnnualGoal, leads: &[Lead]) -> GoalProgress {
    let realized = metrics::realized_revenue_for_year(leads, goal.year);
    GoalProgress {
        year: goal.year,
        target: goal.target,
        realized,
        percent: progress_percent(realized, goal.target),
    }
}

/// Lists goals, most recent year first.
pub async fn list_goals<C>(db: &C) -> Result<Vec<AnnualGoal>>
where
    C: ConnectionTrait,
{
    let rows = AnnualGoalEntity::find()
        .order_by_desc(annual_goal::Column::Year)
        .all(db)
        .await?;
    Ok(rows.iter().map(adapters::annual_goal_to_domain).collect())
}

/// Finds the goal for a year.
pub async fn get_goal_by_year<C>(db: &C, year: i32) -> Result<Option<AnnualGoal>>
where
    C: ConnectionTrait,
{
    let row = AnnualGoalEntity::find()
        .filter(annual_goal::Column::Year.eq(year))
        .one(db)
        .await?;
    Ok(row.as_ref().map(adapters::annual_goal_to_domain))
}

/// Sets the goal for `year`: updates the existing row, or inserts one when
/// the year has none. The target must be positive when given.
#[instrument(skip(db))]
pub async fn upsert_goal<C>(db: &C, year: i32, patch: &AnnualGoalPatch) -> Result<AnnualGoal>
where
    C: ConnectionTrait,
{
    if let Some(target) = patch.target {
        validation::validate_positive(target, "Goal target")?;
    }

    let existing = AnnualGoalEntity::find()
        .filter(annual_goal::Column::Year.eq(year))
        .one(db)
        .await?;

    let mut active = adapters::annual_goal_to_row(&AnnualGoalPatch {
        year: Some(year),
        ..patch.clone()
    });

    let row = if let Some(current) = existing {
        debug!("Updating goal for {year}");
        active.id = Set(current.id);
        active.update(db).await?
    } else {
        validation::validate_positive(patch.target.unwrap_or(0.0), "Goal target")?;
        info!("Inserting goal for {year}");
        active.insert(db).await?
    };

    Ok(adapters::annual_goal_to_domain(&row))
}
