//! Commission rates: rule resolution and rule management.
//!
//! A rule may be scoped to a seller, a course, both, or neither. Resolution
//! walks [`RESOLUTION_ORDER`] from most to least specific and returns the rate
//! of the first rule that matches.

use crate::{
    core::{adapters, validation},
    entities::{CommissionRule as CommissionRuleEntity, commission_rule},
    errors::{Error, Result},
    models::{CommissionRule, CommissionRulePatch, CourseId, Lead, RuleId, RuleKind, SellerId},
};
use sea_orm::{QueryOrder, prelude::*};
use tracing::{info, instrument, warn};

/// One level of rule specificity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Same seller and same course
    SellerAndCourse,
    /// Same seller, no course scope
    SellerOnly,
    /// Same course, no seller scope
    CourseOnly,
    /// Neither scope
    Default,
}

/// Order in which tiers are tried. First match wins.
pub const RESOLUTION_ORDER: [Tier; 4] = [
    Tier::SellerAndCourse,
    Tier::SellerOnly,
    Tier::CourseOnly,
    Tier::Default,
];

impl Tier {
    /// Whether `rule` belongs to this tier for the given pair.
    #[must_use]
    pub fn matches(self, rule: &CommissionRule, seller_id: SellerId, course_id: CourseId) -> bool {
        match self {
            Self::SellerAndCourse => {
                rule.seller_id == Some(seller_id) && rule.course_id == Some(course_id)
            }
            Self::SellerOnly => rule.seller_id == Some(seller_id) && rule.course_id.is_none(),
            Self::CourseOnly => rule.seller_id.is_none() && rule.course_id == Some(course_id),
            Self::Default => rule.seller_id.is_none() && rule.course_id.is_none(),
        }
    }
}

/// Finds the rule that applies to a (seller, course) pair.
#[must_use]
pub fn resolve_rule(
    rules: &[CommissionRule],
    seller_id: SellerId,
    course_id: CourseId,
) -> Option<&CommissionRule> {
    RESOLUTION_ORDER.iter().find_map(|tier| {
        rules
            .iter()
            .find(|rule| tier.matches(rule, seller_id, course_id))
    })
}

/// Commission percentage for a (seller, course) pair. 0 when no rule
/// matches, which only happens once every default rule is gone.
#[must_use]
pub fn resolve_rate(rules: &[CommissionRule], seller_id: SellerId, course_id: CourseId) -> f64 {
    resolve_rule(rules, seller_id, course_id).map_or(0.0, |rule| rule.rate)
}

/// Commission owed on a lead at its resolved rate.
#[must_use]
pub fn commission_for_lead(rules: &[CommissionRule], lead: &Lead) -> f64 {
    lead.effective_value() * resolve_rate(rules, lead.seller_id, lead.course_id) / 100.0
}

/// Default when the rule has no scope, specific otherwise.
#[must_use]
pub const fn rule_kind_for(seller_id: Option<SellerId>, course_id: Option<CourseId>) -> RuleKind {
    if seller_id.is_none() && course_id.is_none() {
        RuleKind::Default
    } else {
        RuleKind::Specific
    }
}

/// Lists all commission rules in insertion order.
pub async fn list_rules<C>(db: &C) -> Result<Vec<CommissionRule>>
where
    C: ConnectionTrait,
{
    let rows = CommissionRuleEntity::find()
        .order_by_asc(commission_rule::Column::Id)
        .all(db)
        .await?;
    Ok(rows.iter().map(adapters::commission_rule_to_domain).collect())
}

/// Creates a rule. The rate must be in (0, 100]; the kind is derived from
/// the scope.
#[instrument(skip(db))]
pub async fn create_rule<C>(
    db: &C,
    rate: f64,
    seller_id: Option<SellerId>,
    course_id: Option<CourseId>,
) -> Result<CommissionRule>
where
    C: ConnectionTrait,
{
    validation::validate_rate(rate)?;

    let patch = CommissionRulePatch {
        rate: Some(rate),
        seller_id: Some(seller_id),
        course_id: Some(course_id),
        kind: Some(rule_kind_for(seller_id, course_id)),
    };
    let row = adapters::commission_rule_to_row(&patch).insert(db).await?;
    info!("Created commission rule {} at {}%", row.id, row.rate);
    Ok(adapters::commission_rule_to_domain(&row))
}

/// Updates a rule's rate and/or scope. The kind follows the resulting scope.
#[instrument(skip(db))]
pub async fn update_rule<C>(db: &C, id: RuleId, patch: &CommissionRulePatch) -> Result<CommissionRule>
where
    C: ConnectionTrait,
{
    if let Some(rate) = patch.rate {
        validation::validate_rate(rate)?;
    }

    let existing = CommissionRuleEntity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "commission rule",
            id,
        })?;

    let seller_id = patch.seller_id.unwrap_or(existing.seller_id);
    let course_id = patch.course_id.unwrap_or(existing.course_id);

    let was_default = rule_kind_for(existing.seller_id, existing.course_id) == RuleKind::Default;
    if was_default && rule_kind_for(seller_id, course_id) != RuleKind::Default {
        ensure_another_default(db, id).await?;
    }

    let mut active = adapters::commission_rule_to_row(&CommissionRulePatch {
        kind: Some(rule_kind_for(seller_id, course_id)),
        ..patch.clone()
    });
    active.id = sea_orm::Set(id);
    let row = active.update(db).await?;
    Ok(adapters::commission_rule_to_domain(&row))
}

/// Deletes a rule. Refuses to delete the last remaining default rule so
/// that resolution always has a fallback.
#[instrument(skip(db))]
pub async fn delete_rule<C>(db: &C, id: RuleId) -> Result<()>
where
    C: ConnectionTrait,
{
    let existing = CommissionRuleEntity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "commission rule",
            id,
        })?;

    let rule = adapters::commission_rule_to_domain(&existing);
    if rule.kind == RuleKind::Default {
        ensure_another_default(db, id).await?;
    }

    CommissionRuleEntity::delete_by_id(id).exec(db).await?;
    info!("Deleted commission rule {id}");
    Ok(())
}

/// Fails unless some default rule other than `id` would remain.
async fn ensure_another_default<C>(db: &C, id: RuleId) -> Result<()>
where
    C: ConnectionTrait,
{
    let defaults = CommissionRuleEntity::find()
        .filter(commission_rule::Column::SellerId.is_null())
        .filter(commission_rule::Column::CourseId.is_null())
        .count(db)
        .await?;
    if defaults <= 1 {
        warn!("Refusing to remove the only default commission rule ({id})");
        return Err(Error::validation(
            "The default commission rule cannot be removed",
        ));
    }
    Ok(())
}
