//! Derived business metrics.
//!
//! Every function here is pure and recomputed on each call: leads change
//! often and nothing is cached. Only leads in
//! [`LeadStatus::EnrollmentCompleted`] count toward revenue and
//! registrations.

use crate::models::{Course, CourseId, CourseStatus, Lead, LeadStatus, LossReason, SellerId};
use chrono::{Datelike, Local, NaiveDate};
use std::collections::BTreeMap;

/// Courses with fewer confirmed registrations than this trigger the viability alert.
pub const VIABILITY_MIN_REGISTRATIONS: u32 = 15;
/// The viability alert only fires this many days (or fewer) before the start date.
pub const VIABILITY_WINDOW_DAYS: i64 = 7;

/// Negotiated price when present, otherwise the proposed price.
#[must_use]
pub fn effective_value(lead: &Lead) -> f64 {
    lead.effective_value()
}

fn converted(leads: &[Lead]) -> impl Iterator<Item = &Lead> {
    leads.iter().filter(|l| l.is_converted())
}

fn sum_revenue<'a>(leads: impl Iterator<Item = &'a Lead>) -> f64 {
    leads.map(Lead::effective_value).sum()
}

fn sum_registrations<'a>(leads: impl Iterator<Item = &'a Lead>) -> u32 {
    leads.map(|l| l.registrations).sum()
}

/// Realized revenue across all converted leads. 0 for empty input.
#[must_use]
pub fn total_revenue(leads: &[Lead]) -> f64 {
    sum_revenue(converted(leads))
}

/// Registrations across all converted leads.
#[must_use]
pub fn total_registrations(leads: &[Lead]) -> u32 {
    sum_registrations(converted(leads))
}

/// Realized revenue for one course.
#[must_use]
pub fn revenue_by_course(leads: &[Lead], course_id: CourseId) -> f64 {
    sum_revenue(converted(leads).filter(|l| l.course_id == course_id))
}

/// Confirmed registrations for one course.
#[must_use]
pub fn registrations_by_course(leads: &[Lead], course_id: CourseId) -> u32 {
    sum_registrations(converted(leads).filter(|l| l.course_id == course_id))
}

/// Realized revenue for one seller.
#[must_use]
pub fn revenue_by_seller(leads: &[Lead], seller_id: SellerId) -> f64 {
    sum_revenue(converted(leads).filter(|l| l.seller_id == seller_id))
}

/// Confirmed registrations for one seller.
#[must_use]
pub fn registrations_by_seller(leads: &[Lead], seller_id: SellerId) -> u32 {
    sum_registrations(converted(leads).filter(|l| l.seller_id == seller_id))
}

/// Converted leads as a percentage of decided leads.
///
/// Leads still in [`LeadStatus::ProposalSent`] are excluded from the
/// denominator: only won or lost leads enter the rate. Returns 0 when no
/// lead has been decided.
#[must_use]
pub fn conversion_rate(leads: &[Lead]) -> f64 {
    let decided = leads
        .iter()
        .filter(|l| l.status != LeadStatus::ProposalSent)
        .count();
    if decided == 0 {
        return 0.0;
    }
    let won = converted(leads).count();

    #[allow(clippy::cast_precision_loss)]
    let rate = (won as f64 / decided as f64) * 100.0;
    rate
}

/// Mean number of days between creation and conversion, over leads that
/// have both dates. 0 when none qualify.
#[must_use]
pub fn average_sales_cycle_days(leads: &[Lead]) -> f64 {
    let cycles: Vec<i64> = leads
        .iter()
        .filter_map(|l| match (l.created_on, l.converted_on) {
            (Some(created), Some(converted)) => Some((converted - created).num_days()),
            _ => None,
        })
        .collect();

    if cycles.is_empty() {
        return 0.0;
    }

    #[allow(clippy::cast_precision_loss)]
    let mean = cycles.iter().sum::<i64>() as f64 / cycles.len() as f64;
    mean
}

/// Whole days from `today` until `target`; negative once the date has passed.
#[must_use]
pub fn days_until(target: NaiveDate, today: NaiveDate) -> i64 {
    (target - today).num_days()
}

/// True when a course starting on `starts_on` has fewer than
/// [`VIABILITY_MIN_REGISTRATIONS`] registrations and starts within
/// [`VIABILITY_WINDOW_DAYS`] of `today`.
#[must_use]
pub fn viability_alert(registrations: u32, starts_on: NaiveDate, today: NaiveDate) -> bool {
    registrations < VIABILITY_MIN_REGISTRATIONS
        && days_until(starts_on, today) <= VIABILITY_WINDOW_DAYS
}

/// [`viability_alert`] against the local calendar date.
#[must_use]
pub fn viability_alert_today(registrations: u32, starts_on: NaiveDate) -> bool {
    viability_alert(registrations, starts_on, Local::now().date_naive())
}

/// Potential revenue still open in the pipeline (proposals not yet decided).
#[must_use]
pub fn pipeline_value(leads: &[Lead]) -> f64 {
    sum_revenue(
        leads
            .iter()
            .filter(|l| l.status == LeadStatus::ProposalSent),
    )
}

/// Realized revenue of leads converted during `year`.
#[must_use]
pub fn realized_revenue_for_year(leads: &[Lead], year: i32) -> f64 {
    sum_revenue(
        converted(leads).filter(|l| l.converted_on.is_some_and(|d| d.year() == year)),
    )
}

/// Revenue one seller realized from leads converted during `year`.
#[must_use]
pub fn revenue_by_seller_for_year(leads: &[Lead], seller_id: SellerId, year: i32) -> f64 {
    sum_revenue(converted(leads).filter(|l| {
        l.seller_id == seller_id && l.converted_on.is_some_and(|d| d.year() == year)
    }))
}

/// Revenue one seller realized from leads converted during the given month.
#[must_use]
pub fn revenue_by_seller_for_month(
    leads: &[Lead],
    seller_id: SellerId,
    year: i32,
    month: u32,
) -> f64 {
    sum_revenue(converted(leads).filter(|l| {
        l.seller_id == seller_id
            && l.converted_on
                .is_some_and(|d| d.year() == year && d.month() == month)
    }))
}

/// Courses that are open for enrollment or running.
#[must_use]
pub fn active_courses(courses: &[Course]) -> Vec<&Course> {
    courses
        .iter()
        .filter(|c| {
            matches!(
                c.status,
                CourseStatus::OpenForEnrollment | CourseStatus::Ongoing
            )
        })
        .collect()
}

/// Revenue and registrations for one region.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionTotals {
    /// Region code of the courses
    pub region: String,
    /// Number of courses held in the region
    pub courses: usize,
    /// Confirmed registrations
    pub registrations: u32,
    /// Realized revenue
    pub revenue: f64,
}

/// Per-region totals keyed by the course's region, highest revenue first.
#[must_use]
pub fn revenue_by_region(courses: &[Course], leads: &[Lead]) -> Vec<RegionTotals> {
    let mut by_region: BTreeMap<&str, RegionTotals> = BTreeMap::new();
    for course in courses {
        let entry = by_region
            .entry(course.region.as_str())
            .or_insert_with(|| RegionTotals {
                region: course.region.clone(),
                courses: 0,
                registrations: 0,
                revenue: 0.0,
            });
        entry.courses += 1;
        entry.registrations += registrations_by_course(leads, course.id);
        entry.revenue += revenue_by_course(leads, course.id);
    }

    let mut totals: Vec<RegionTotals> = by_region.into_values().collect();
    totals.sort_by(|a, b| b.revenue.total_cmp(&a.revenue));
    totals
}

/// Registrations grouped by course topic, most registrations first, at most `limit` entries.
#[must_use]
pub fn top_topics(courses: &[Course], leads: &[Lead], limit: usize) -> Vec<(String, u32)> {
    let mut by_topic: BTreeMap<&str, u32> = BTreeMap::new();
    for course in courses {
        *by_topic.entry(course.topic.as_str()).or_default() +=
            registrations_by_course(leads, course.id);
    }

    let mut topics: Vec<(String, u32)> = by_topic
        .into_iter()
        .map(|(topic, n)| (topic.to_string(), n))
        .collect();
    topics.sort_by(|a, b| b.1.cmp(&a.1));
    topics.truncate(limit);
    topics
}

/// Confirmed registrations per (year, month) of conversion, oldest first.
#[must_use]
pub fn registrations_by_month(leads: &[Lead]) -> Vec<((i32, u32), u32)> {
    let mut by_month: BTreeMap<(i32, u32), u32> = BTreeMap::new();
    for lead in converted(leads) {
        if let Some(day) = lead.converted_on {
            *by_month.entry((day.year(), day.month())).or_default() += lead.registrations;
        }
    }
    by_month.into_iter().collect()
}

/// Number of declined leads per loss reason.
#[must_use]
pub fn loss_reasons(leads: &[Lead]) -> Vec<(LossReason, usize)> {
    let mut counts: BTreeMap<LossReason, usize> = BTreeMap::new();
    for lead in leads
        .iter()
        .filter(|l| l.status == LeadStatus::ProposalDeclined)
    {
        if let Some(reason) = lead.loss_reason {
            *counts.entry(reason).or_default() += 1;
        }
    }
    counts.into_iter().collect()
}
