//! Mapping between persisted rows and domain types.
//!
//! `*_to_domain` turns a stored row into the canonical domain shape, filling
//! missing numbers with zero. `*_to_row` turns a partial domain value into an
//! `ActiveModel` where every absent field stays `NotSet`, so the same function
//! serves inserts and PATCH-style updates. Status columns go through fixed
//! token tables; unknown tokens fall back to a documented default instead of
//! failing.
//!
//! Row → domain → row reproduces the stored row, with one exception: the
//! legacy lead status `not_converted` is normalised and comes back as
//! `proposal_declined`.

use crate::entities::{annual_goal, commission_rule, course, lead, professor, seller};
use crate::models::{
    AnnualGoal, AnnualGoalPatch, CommissionRule, CommissionRulePatch, Contact, Course,
    CoursePatch, CourseStatus, Lead, LeadPatch, LeadStatus, LossReason, Professor,
    ProfessorPatch, RuleKind, Seller, SellerPatch,
};
use sea_orm::{ActiveValue, NotSet, Set};

/// Course status tokens. Unknown tokens map to [`CourseStatus::Planned`].
pub const COURSE_STATUS_TOKENS: [(&str, CourseStatus); 5] = [
    ("planned", CourseStatus::Planned),
    ("open_for_enrollment", CourseStatus::OpenForEnrollment),
    ("ongoing", CourseStatus::Ongoing),
    ("completed", CourseStatus::Completed),
    ("cancelled", CourseStatus::Cancelled),
];

/// Lead status tokens. The first entry for a status is the one written back;
/// `not_converted` is an older spelling of a declined proposal. Unknown
/// tokens map to [`LeadStatus::ProposalSent`].
pub const LEAD_STATUS_TOKENS: [(&str, LeadStatus); 4] = [
    ("proposal_sent", LeadStatus::ProposalSent),
    ("enrollment_completed", LeadStatus::EnrollmentCompleted),
    ("proposal_declined", LeadStatus::ProposalDeclined),
    ("not_converted", LeadStatus::ProposalDeclined),
];

/// Loss reason tokens. Unknown tokens are dropped.
pub const LOSS_REASON_TOKENS: [(&str, LossReason); 3] = [
    ("price", LossReason::Price),
    ("incompatible_date", LossReason::IncompatibleDate),
    ("no_budget", LossReason::NoBudget),
];

const RULE_KIND_DEFAULT: &str = "default";
const RULE_KIND_SPECIFIC: &str = "specific";
const AREA_SEPARATOR: &str = ", ";

fn field<V>(value: Option<V>) -> ActiveValue<V>
where
    V: Into<sea_orm::Value>,
{
    value.map_or(NotSet, Set)
}

fn to_u32(value: i32) -> u32 {
    u32::try_from(value).unwrap_or(0)
}

fn to_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

/// Maps a stored course status token to the domain status.
#[must_use]
pub fn course_status_from_token(token: Option<&str>) -> CourseStatus {
    token
        .and_then(|t| COURSE_STATUS_TOKENS.iter().find(|(k, _)| *k == t))
        .map_or(CourseStatus::Planned, |(_, status)| *status)
}

/// Token written for a course status.
#[must_use]
pub fn course_status_token(status: CourseStatus) -> &'static str {
    COURSE_STATUS_TOKENS
        .iter()
        .find(|(_, s)| *s == status)
        .map_or("planned", |(token, _)| token)
}

/// Maps a stored lead status token to the domain status.
#[must_use]
pub fn lead_status_from_token(token: Option<&str>) -> LeadStatus {
    token
        .and_then(|t| LEAD_STATUS_TOKENS.iter().find(|(k, _)| *k == t))
        .map_or(LeadStatus::ProposalSent, |(_, status)| *status)
}

/// Token written for a lead status.
#[must_use]
pub fn lead_status_token(status: LeadStatus) -> &'static str {
    LEAD_STATUS_TOKENS
        .iter()
        .find(|(_, s)| *s == status)
        .map_or("proposal_sent", |(token, _)| token)
}

/// Maps a stored loss reason token to the domain reason.
#[must_use]
pub fn loss_reason_from_token(token: Option<&str>) -> Option<LossReason> {
    token.and_then(|t| {
        LOSS_REASON_TOKENS
            .iter()
            .find(|(k, _)| *k == t)
            .map(|(_, reason)| *reason)
    })
}

/// Token written for a loss reason.
#[must_use]
pub fn loss_reason_token(reason: LossReason) -> &'static str {
    LOSS_REASON_TOKENS
        .iter()
        .find(|(_, r)| *r == reason)
        .map_or("price", |(token, _)| token)
}

/// Token written for a commission rule kind.
#[must_use]
pub const fn rule_kind_token(kind: RuleKind) -> &'static str {
    match kind {
        RuleKind::Default => RULE_KIND_DEFAULT,
        RuleKind::Specific => RULE_KIND_SPECIFIC,
    }
}

// --- Courses ---

/// Converts a course row into the domain course.
#[must_use]
pub fn course_to_domain(row: &course::Model) -> Course {
    Course {
        id: row.id,
        topic: row.topic.clone(),
        professor_id: row.professor_id,
        city: row.city.clone(),
        region: row.region.clone(),
        starts_on: row.starts_on,
        ends_on: row.ends_on,
        duration_hours: to_u32(row.duration_hours),
        registration_price: row.registration_price,
        description: row.description.clone(),
        status: course_status_from_token(row.status.as_deref()),
        registration_target: row.registration_target.map(to_u32),
    }
}

/// Converts a partial course into a row with only the given fields set.
#[must_use]
pub fn course_to_row(patch: &CoursePatch) -> course::ActiveModel {
    course::ActiveModel {
        id: NotSet,
        topic: field(patch.topic.clone()),
        professor_id: field(patch.professor_id),
        city: field(patch.city.clone()),
        region: field(patch.region.clone()),
        starts_on: field(patch.starts_on),
        ends_on: field(patch.ends_on),
        duration_hours: field(patch.duration_hours.map(to_i32)),
        registration_price: field(patch.registration_price),
        description: field(patch.description.clone()),
        status: field(
            patch
                .status
                .map(|s| Some(course_status_token(s).to_string())),
        ),
        registration_target: field(patch.registration_target.map(|t| t.map(to_i32))),
    }
}

impl From<&Course> for CoursePatch {
    fn from(course: &Course) -> Self {
        Self {
            topic: Some(course.topic.clone()),
            professor_id: Some(course.professor_id),
            city: Some(course.city.clone()),
            region: Some(course.region.clone()),
            starts_on: Some(course.starts_on),
            ends_on: Some(course.ends_on),
            duration_hours: Some(course.duration_hours),
            registration_price: Some(course.registration_price),
            description: Some(course.description.clone()),
            status: Some(course.status),
            registration_target: Some(course.registration_target),
        }
    }
}

// --- Leads ---

/// Converts a lead row into the domain lead.
#[must_use]
pub fn lead_to_domain(row: &lead::Model) -> Lead {
    Lead {
        id: row.id,
        course_id: row.course_id,
        contact: Contact {
            name: row.contact_name.clone(),
            organization: row.organization.clone(),
            sector: row.sector.clone(),
            city: row.city.clone(),
            region: row.region.clone(),
            phone: row.phone.clone(),
            email: row.email.clone(),
        },
        registrations: row.registration_count.map_or(0, to_u32),
        proposed_price: row.proposed_price,
        negotiated_price: row.negotiated_price,
        seller_id: row.seller_id,
        status: lead_status_from_token(row.status.as_deref()),
        created_on: row.created_on,
        converted_on: row.converted_on,
        loss_reason: loss_reason_from_token(row.loss_reason.as_deref()),
        notes: row.notes.clone(),
    }
}

/// Converts a partial lead into a row with only the given fields set.
#[must_use]
pub fn lead_to_row(patch: &LeadPatch) -> lead::ActiveModel {
    lead::ActiveModel {
        id: NotSet,
        course_id: field(patch.course_id),
        contact_name: field(patch.contact_name.clone()),
        organization: field(patch.organization.clone()),
        sector: field(patch.sector.clone()),
        city: field(patch.city.clone()),
        region: field(patch.region.clone()),
        phone: field(patch.phone.clone()),
        email: field(patch.email.clone()),
        registration_count: field(patch.registrations.map(|n| Some(to_i32(n)))),
        proposed_price: field(patch.proposed_price),
        negotiated_price: field(patch.negotiated_price),
        seller_id: field(patch.seller_id),
        status: field(patch.status.map(|s| Some(lead_status_token(s).to_string()))),
        created_on: field(patch.created_on),
        converted_on: field(patch.converted_on),
        loss_reason: field(
            patch
                .loss_reason
                .map(|r| r.map(|r| loss_reason_token(r).to_string())),
        ),
        notes: field(patch.notes.clone()),
    }
}

impl From<&Lead> for LeadPatch {
    fn from(lead: &Lead) -> Self {
        Self {
            course_id: Some(lead.course_id),
            contact_name: Some(lead.contact.name.clone()),
            organization: Some(lead.contact.organization.clone()),
            sector: Some(lead.contact.sector.clone()),
            city: Some(lead.contact.city.clone()),
            region: Some(lead.contact.region.clone()),
            phone: Some(lead.contact.phone.clone()),
            email: Some(lead.contact.email.clone()),
            registrations: Some(lead.registrations),
            proposed_price: Some(lead.proposed_price),
            negotiated_price: Some(lead.negotiated_price),
            seller_id: Some(lead.seller_id),
            status: Some(lead.status),
            created_on: Some(lead.created_on),
            converted_on: Some(lead.converted_on),
            loss_reason: Some(lead.loss_reason),
            notes: Some(lead.notes.clone()),
        }
    }
}

// --- Sellers ---

/// Converts a seller row into the domain seller. Missing quotas become 0.
#[must_use]
pub fn seller_to_domain(row: &seller::Model) -> Seller {
    Seller {
        id: row.id,
        name: row.name.clone(),
        email: row.email.clone(),
        monthly_quota: row.monthly_quota.unwrap_or(0.0),
        annual_quota: row.annual_quota.unwrap_or(0.0),
    }
}

/// Converts a partial seller into a row with only the given fields set.
#[must_use]
pub fn seller_to_row(patch: &SellerPatch) -> seller::ActiveModel {
    seller::ActiveModel {
        id: NotSet,
        name: field(patch.name.clone()),
        email: field(patch.email.clone()),
        monthly_quota: field(patch.monthly_quota.map(Some)),
        annual_quota: field(patch.annual_quota.map(Some)),
    }
}

impl From<&Seller> for SellerPatch {
    fn from(seller: &Seller) -> Self {
        Self {
            name: Some(seller.name.clone()),
            email: Some(seller.email.clone()),
            monthly_quota: Some(seller.monthly_quota),
            annual_quota: Some(seller.annual_quota),
        }
    }
}

// --- Professors ---

/// Converts a professor row into the domain professor, splitting the
/// specialty column into areas.
#[must_use]
pub fn professor_to_domain(row: &professor::Model) -> Professor {
    let areas = row
        .specialties
        .as_deref()
        .map(|s| {
            s.split(',')
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(ToString::to_string)
                .collect()
        })
        .unwrap_or_default();

    Professor {
        id: row.id,
        name: row.name.clone(),
        email: row.email.clone(),
        phone: row.phone.clone(),
        areas,
        bio: row.bio.clone(),
    }
}

/// Converts a partial professor into a row with only the given fields set.
#[must_use]
pub fn professor_to_row(patch: &ProfessorPatch) -> professor::ActiveModel {
    let specialties = patch.areas.as_ref().map(|areas| {
        if areas.is_empty() {
            None
        } else {
            Some(areas.join(AREA_SEPARATOR))
        }
    });

    professor::ActiveModel {
        id: NotSet,
        name: field(patch.name.clone()),
        email: field(patch.email.clone()),
        phone: field(patch.phone.clone()),
        specialties: field(specialties),
        bio: field(patch.bio.clone()),
    }
}

impl From<&Professor> for ProfessorPatch {
    fn from(professor: &Professor) -> Self {
        Self {
            name: Some(professor.name.clone()),
            email: Some(professor.email.clone()),
            phone: Some(professor.phone.clone()),
            areas: Some(professor.areas.clone()),
            bio: Some(professor.bio.clone()),
        }
    }
}

// --- Commission rules ---

/// Converts a commission rule row into the domain rule. An unrecognised
/// kind is derived from the rule's references.
#[must_use]
pub fn commission_rule_to_domain(row: &commission_rule::Model) -> CommissionRule {
    let kind = match row.kind.as_str() {
        RULE_KIND_DEFAULT => RuleKind::Default,
        RULE_KIND_SPECIFIC => RuleKind::Specific,
        _ => crate::core::commission::rule_kind_for(row.seller_id, row.course_id),
    };

    CommissionRule {
        id: row.id,
        rate: row.rate,
        seller_id: row.seller_id,
        course_id: row.course_id,
        kind,
    }
}

/// Converts a partial commission rule into a row with only the given fields set.
#[must_use]
pub fn commission_rule_to_row(patch: &CommissionRulePatch) -> commission_rule::ActiveModel {
    commission_rule::ActiveModel {
        id: NotSet,
        rate: field(patch.rate),
        seller_id: field(patch.seller_id),
        course_id: field(patch.course_id),
        kind: field(patch.kind.map(|k| rule_kind_token(k).to_string())),
    }
}

impl From<&CommissionRule> for CommissionRulePatch {
    fn from(rule: &CommissionRule) -> Self {
        Self {
            rate: Some(rule.rate),
            seller_id: Some(rule.seller_id),
            course_id: Some(rule.course_id),
            kind: Some(rule.kind),
        }
    }
}

// --- Annual goals ---

/// Converts an annual goal row into the domain goal.
#[must_use]
pub fn annual_goal_to_domain(row: &annual_goal::Model) -> AnnualGoal {
    AnnualGoal {
        id: row.id,
        year: row.year,
        target: row.target,
        description: row.description.clone(),
    }
}

/// Converts a partial annual goal into a row with only the given fields set.
#[must_use]
pub fn annual_goal_to_row(patch: &AnnualGoalPatch) -> annual_goal::ActiveModel {
    annual_goal::ActiveModel {
        id: NotSet,
        year: field(patch.year),
        target: field(patch.target),
        description: field(patch.description.clone()),
    }
}

impl From<&AnnualGoal> for AnnualGoalPatch {
    fn from(goal: &AnnualGoal) -> Self {
        Self {
            year: Some(goal.year),
            target: Some(goal.target),
            description: Some(goal.description.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::errors::Result;
    use chrono::NaiveDate;
    use sea_orm::TryIntoModel;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
    }

    fn course_row() -> course::Model {
        course::Model {
            id: 7,
            topic: "Public Procurement".to_string(),
            professor_id: Some(3),
            city: "Recife".to_string(),
            region: "PE".to_string(),
            starts_on: date(2025, 3, 10),
            ends_on: date(2025, 3, 12),
            duration_hours: 24,
            registration_price: 2490.0,
            description: Some("Hands-on workshop".to_string()),
            status: Some("open_for_enrollment".to_string()),
            registration_target: Some(40),
        }
    }

    fn lead_row() -> lead::Model {
        lead::Model {
            id: 11,
            course_id: 7,
            contact_name: "Ana Souza".to_string(),
            organization: "City Hall of Olinda".to_string(),
            sector: Some("Purchasing".to_string()),
            city: "Olinda".to_string(),
            region: "PE".to_string(),
            phone: Some("(81) 99999-0000".to_string()),
            email: Some("ana@olinda.example".to_string()),
            registration_count: Some(4),
            proposed_price: 9960.0,
            negotiated_price: Some(9000.0),
            seller_id: 2,
            status: Some("proposal_declined".to_string()),
            created_on: Some(date(2025, 1, 5)),
            converted_on: None,
            loss_reason: Some("no_budget".to_string()),
            notes: Some("Try again next semester".to_string()),
        }
    }

    #[test]
    fn test_course_round_trip() -> Result<()> {
        let row = course_row();
        let mut active = course_to_row(&CoursePatch::from(&course_to_domain(&row)));
        active.id = Set(row.id);
        assert_eq!(active.try_into_model()?, row);
        Ok(())
    }

    #[test]
    fn test_lead_round_trip() -> Result<()> {
        let row = lead_row();
        let mut active = lead_to_row(&LeadPatch::from(&lead_to_domain(&row)));
        active.id = Set(row.id);
        assert_eq!(active.try_into_model()?, row);
        Ok(())
    }

    #[test]
    fn test_seller_round_trip() -> Result<()> {
        let row = seller::Model {
            id: 2,
            name: "Ariane".to_string(),
            email: "ariane@example.com".to_string(),
            monthly_quota: Some(50_000.0),
            annual_quota: Some(600_000.0),
        };
        let mut active = seller_to_row(&SellerPatch::from(&seller_to_domain(&row)));
        active.id = Set(row.id);
        assert_eq!(active.try_into_model()?, row);
        Ok(())
    }

    #[test]
    fn test_professor_round_trip() -> Result<()> {
        let row = professor::Model {
            id: 3,
            name: "Carlos Lima".to_string(),
            email: "carlos@example.com".to_string(),
            phone: None,
            specialties: Some("Procurement, Contracts".to_string()),
            bio: Some("Twenty years in public audit".to_string()),
        };
        let professor = professor_to_domain(&row);
        assert_eq!(professor.areas, vec!["Procurement", "Contracts"]);

        let mut active = professor_to_row(&ProfessorPatch::from(&professor));
        active.id = Set(row.id);
        assert_eq!(active.try_into_model()?, row);
        Ok(())
    }

    #[test]
    fn test_commission_rule_round_trip() -> Result<()> {
        let row = commission_rule::Model {
            id: 4,
            rate: 7.5,
            seller_id: Some(2),
            course_id: None,
            kind: "specific".to_string(),
        };
        let mut active =
            commission_rule_to_row(&CommissionRulePatch::from(&commission_rule_to_domain(&row)));
        active.id = Set(row.id);
        assert_eq!(active.try_into_model()?, row);
        Ok(())
    }

    #[test]
    fn test_annual_goal_round_trip() -> Result<()> {
        let row = annual_goal::Model {
            id: 1,
            year: 2025,
            target: 3_000_000.0,
            description: Some("Team trip".to_string()),
        };
        let mut active = annual_goal_to_row(&AnnualGoalPatch::from(&annual_goal_to_domain(&row)));
        active.id = Set(row.id);
        assert_eq!(active.try_into_model()?, row);
        Ok(())
    }

    #[test]
    fn test_partial_patch_leaves_other_fields_unset() {
        let patch = LeadPatch {
            status: Some(LeadStatus::EnrollmentCompleted),
            ..Default::default()
        };
        let active = lead_to_row(&patch);

        assert_eq!(
            active.status,
            Set(Some("enrollment_completed".to_string()))
        );
        assert!(active.proposed_price.is_not_set());
        assert!(active.contact_name.is_not_set());
        assert!(active.negotiated_price.is_not_set());
    }

    #[test]
    fn test_patch_can_clear_nullable_column() {
        let patch = LeadPatch {
            loss_reason: Some(None),
            ..Default::default()
        };
        assert_eq!(lead_to_row(&patch).loss_reason, Set(None));
    }

    #[test]
    fn test_unknown_status_tokens_fall_back() {
        assert_eq!(course_status_from_token(Some("paused")), CourseStatus::Planned);
        assert_eq!(course_status_from_token(None), CourseStatus::Planned);
        assert_eq!(lead_status_from_token(Some("lost?")), LeadStatus::ProposalSent);
        assert_eq!(lead_status_from_token(None), LeadStatus::ProposalSent);
        assert_eq!(loss_reason_from_token(Some("weather")), None);
    }

    #[test]
    fn test_legacy_declined_token_maps_to_declined() {
        assert_eq!(
            lead_status_from_token(Some("not_converted")),
            LeadStatus::ProposalDeclined
        );
        assert_eq!(
            lead_status_token(LeadStatus::ProposalDeclined),
            "proposal_declined"
        );
    }

    #[test]
    fn test_legacy_declined_token_is_rewritten_on_round_trip() -> Result<()> {
        let mut row = lead_row();
        row.status = Some("not_converted".to_string());

        let mut active = lead_to_row(&LeadPatch::from(&lead_to_domain(&row)));
        active.id = Set(row.id);
        let written = active.try_into_model()?;

        assert_eq!(written.status.as_deref(), Some("proposal_declined"));
        assert_eq!(lead::Model { status: row.status.clone(), ..written }, row);
        Ok(())
    }

    #[test]
    fn test_missing_numbers_coalesce_to_zero() {
        let mut row = lead_row();
        row.registration_count = None;
        assert_eq!(lead_to_domain(&row).registrations, 0);

        let seller = seller_to_domain(&seller::Model {
            id: 1,
            name: "New rep".to_string(),
            email: "new@example.com".to_string(),
            monthly_quota: None,
            annual_quota: None,
        });
        assert_eq!(seller.monthly_quota, 0.0);
        assert_eq!(seller.annual_quota, 0.0);
    }

    #[test]
    fn test_unknown_rule_kind_is_derived_from_scope() {
        let row = commission_rule::Model {
            id: 1,
            rate: 5.0,
            seller_id: None,
            course_id: None,
            kind: "legacy".to_string(),
        };
        assert_eq!(commission_rule_to_domain(&row).kind, RuleKind::Default);
    }
}
