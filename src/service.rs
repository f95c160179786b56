//! Service facade over the store, the query caches and the calculators.
//!
//! [`CommercialService`] is what a front end talks to. It owns the
//! connection and one cache per entity list. Reads go through the caches;
//! writes go to the store first and only then invalidate the affected
//! keys, so a failed write leaves cached data untouched. Every mutation
//! names the acting [`Role`] and is refused up front when the role may not
//! attempt it.

use crate::{
    cache::{QueryCache, QueryKey},
    core::{
        access::{self, Action},
        clients, commission, course, export, goals, lead, metrics, professor, seller,
    },
    errors::{Error, Result},
    models::{
        AnnualGoal, AnnualGoalPatch, Client, CommissionRule, CommissionRulePatch, Course,
        CourseId, CoursePatch, CourseStatus, Lead, LeadId, LeadPatch, LeadStatus, LossReason,
        Professor, ProfessorId, ProfessorPatch, Role, RuleId, Seller, SellerId, SellerPatch,
    },
};
use chrono::{Local, NaiveDate};
use sea_orm::DatabaseConnection;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct KpiSummary {
    /// Realized revenue
    pub revenue: f64,
    /// Confirmed registrations
    pub registrations: u32,
    /// Converted share of decided leads
    pub conversion_rate: f64,
    /// Mean days from creation to conversion
    pub average_cycle_days: f64,
    /// Value of open proposals
    pub pipeline: f64,
}

/// Entry point for reads and role-checked writes.
#[derive(Debug)]
pub struct CommercialService {
    db: DatabaseConnection,
    courses: QueryCache<Vec<Course>>,
    leads: QueryCache<Vec<Lead>>,
    sellers: QueryCache<Vec<Seller>>,
    professors: QueryCache<Vec<Professor>>,
    rules: QueryCache<Vec<CommissionRule>>,
    goals: QueryCache<Vec<AnnualGoal>>,
}

impl CommercialService {
    /// Wraps a connection with empty caches.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            courses: QueryCache::new(),
            leads: QueryCache::new(),
            sellers: QueryCache::new(),
            professors: QueryCache::new(),
            rules: QueryCache::new(),
            goals: QueryCache::new(),
        }
    }

    /// The underlying connection.
    #[must_use]
    pub const fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    // --- Cached reads ---

    /// All courses, by start date.
    pub async fn courses(&self) -> Result<Vec<Course>> {
        self.courses
            .get_or_fetch(QueryKey::Courses, || course::get_all_courses(&self.db))
            .await
    }

    /// All leads, newest first.
    pub async fn leads(&self) -> Result<Vec<Lead>> {
        self.leads
            .get_or_fetch(QueryKey::Leads, || lead::get_all_leads(&self.db))
            .await
    }

    /// All sellers, by name.
    pub async fn sellers(&self) -> Result<Vec<Seller>> {
        self.sellers
            .get_or_fetch(QueryKey::Sellers, || seller::get_all_sellers(&self.db))
            .await
    }

    /// All professors, by name.
    pub async fn professors(&self) -> Result<Vec<Professor>> {
        self.professors
            .get_or_fetch(QueryKey::Professors, || {
                professor::get_all_professors(&self.db)
            })
            .await
    }

    /// All commission rules.
    pub async fn commission_rules(&self) -> Result<Vec<CommissionRule>> {
        self.rules
            .get_or_fetch(QueryKey::CommissionRules, || commission::list_rules(&self.db))
            .await
    }

    /// All annual goals, newest year first.
    pub async fn goals(&self) -> Result<Vec<AnnualGoal>> {
        self.goals
            .get_or_fetch(QueryKey::Goals, || goals::list_goals(&self.db))
            .await
    }

    /// One course by id, read from the store.
    pub async fn course(&self, id: CourseId) -> Result<Course> {
        course::get_course_by_id(&self.db, id)
            .await?
            .ok_or(Error::NotFound {
                entity: "course",
                id,
            })
    }

    /// One lead by id, read from the store.
    pub async fn lead(&self, id: LeadId) -> Result<Lead> {
        lead::get_lead_by_id(&self.db, id)
            .await?
            .ok_or(Error::NotFound { entity: "lead", id })
    }

    // --- Derived reads ---

    /// Clients rebuilt from the current leads.
    pub async fn clients(&self) -> Result<Vec<Client>> {
        Ok(clients::derive_clients(&self.leads().await?))
    }

    /// Commission percentage for a (seller, course) pair.
    pub async fn commission_rate(&self, seller_id: SellerId, course_id: CourseId) -> Result<f64> {
        Ok(commission::resolve_rate(
            &self.commission_rules().await?,
            seller_id,
            course_id,
        ))
    }

    /// Revenue from leads converted during `year`.
    pub async fn realized_revenue(&self, year: i32) -> Result<f64> {
        Ok(metrics::realized_revenue_for_year(&self.leads().await?, year))
    }

    /// Progress against the goal for `year`, `None` when no goal is set.
    pub async fn goal_progress(&self, year: i32) -> Result<Option<goals::GoalProgress>> {
        let leads = self.leads().await?;
        Ok(self
            .goals()
            .await?
            .iter()
            .find(|g| g.year == year)
            .map(|goal| goals::goal_progress(goal, &leads)))
    }

    /// Where a seller stands against their quotas as of `today`.
    pub async fn seller_progress(
        &self,
        seller_id: SellerId,
        today: NaiveDate,
    ) -> Result<goals::SellerProgress> {
        let sellers = self.sellers().await?;
        let seller = sellers
            .iter()
            .find(|s| s.id == seller_id)
            .ok_or(Error::NotFound {
                entity: "seller",
                id: seller_id,
            })?;
        Ok(goals::seller_progress(seller, &self.leads().await?, today))
    }

    /// Courses that are still running or upcoming, start within the alert
    /// window of `today` and are below the minimum registrations.
    pub async fn viability_alerts(&self, today: NaiveDate) -> Result<Vec<Course>> {
        let leads = self.leads().await?;
        Ok(self
            .courses()
            .await?
            .into_iter()
            .filter(|c| !matches!(c.status, CourseStatus::Completed | CourseStatus::Cancelled))
            .filter(|c| {
                metrics::viability_alert(
                    metrics::registrations_by_course(&leads, c.id),
                    c.starts_on,
                    today,
                )
            })
            .collect())
    }

    /// Headline numbers over every lead.
    pub async fn kpis(&self) -> Result<KpiSummary> {
        let leads = self.leads().await?;
        Ok(KpiSummary {
            revenue: metrics::total_revenue(&leads),
            registrations: metrics::total_registrations(&leads),
            conversion_rate: metrics::conversion_rate(&leads),
            average_cycle_days: metrics::average_sales_cycle_days(&leads),
            pipeline: metrics::pipeline_value(&leads),
        })
    }

    /// Writes the report workbook and one CSV per sheet to `dir`, stamped
    /// with `date`. The workbook path comes first.
    #[instrument(skip(self))]
    pub async fn export_reports(&self, dir: &Path, date: NaiveDate) -> Result<Vec<PathBuf>> {
        let sheets = export::all_sheets(
            &self.courses().await?,
            &self.leads().await?,
            &self.sellers().await?,
            &self.commission_rules().await?,
        );
        let mut written = vec![export::write_workbook(dir, &sheets, date)?];
        written.extend(export::write_csv_files(dir, &sheets, date)?);
        Ok(written)
    }

    // --- Courses ---

    /// Creates a course.
    #[instrument(skip(self, patch))]
    pub async fn create_course(&self, role: Role, patch: &CoursePatch) -> Result<Course> {
        access::ensure(role, Action::ManageCourses)?;
        let created = course::create_course(&self.db, patch).await?;
        self.courses.invalidate(QueryKey::Courses).await;
        Ok(created)
    }

    /// Updates a course.
    #[instrument(skip(self, patch))]
    pub async fn update_course(
        &self,
        role: Role,
        course_id: CourseId,
        patch: &CoursePatch,
    ) -> Result<Course> {
        access::ensure(role, Action::ManageCourses)?;
        let updated = course::update_course(&self.db, course_id, patch).await?;
        self.courses.invalidate(QueryKey::Courses).await;
        Ok(updated)
    }

    /// Deletes a course with its leads and course-scoped rules.
    #[instrument(skip(self))]
    pub async fn delete_course(&self, role: Role, course_id: CourseId) -> Result<()> {
        access::ensure(role, Action::ManageCourses)?;
        course::delete_course(&self.db, course_id).await?;
        self.courses.invalidate(QueryKey::Courses).await;
        self.leads.invalidate(QueryKey::Leads).await;
        self.rules.invalidate(QueryKey::CommissionRules).await;
        Ok(())
    }

    // --- Leads ---

    /// Creates a lead.
    #[instrument(skip(self, patch))]
    pub async fn create_lead(&self, role: Role, patch: &LeadPatch) -> Result<Lead> {
        access::ensure(role, Action::ManageLeads)?;
        let created = lead::create_lead(&self.db, patch).await?;
        self.leads.invalidate(QueryKey::Leads).await;
        Ok(created)
    }

    /// Updates a lead.
    #[instrument(skip(self, patch))]
    pub async fn update_lead(&self, role: Role, lead_id: LeadId, patch: &LeadPatch) -> Result<Lead> {
        access::ensure(role, Action::ManageLeads)?;
        let updated = lead::update_lead(&self.db, lead_id, patch).await?;
        self.leads.invalidate(QueryKey::Leads).await;
        Ok(updated)
    }

    /// Moves a lead to another pipeline stage.
    #[instrument(skip(self, notes))]
    pub async fn move_lead(
        &self,
        role: Role,
        lead_id: LeadId,
        status: LeadStatus,
        loss_reason: Option<LossReason>,
        notes: Option<String>,
    ) -> Result<Lead> {
        access::ensure(role, Action::ManageLeads)?;
        let moved = lead::move_lead_status(&self.db, lead_id, status, loss_reason, notes).await?;
        self.leads.invalidate(QueryKey::Leads).await;
        Ok(moved)
    }

    /// Deletes a lead.
    #[instrument(skip(self))]
    pub async fn delete_lead(&self, role: Role, lead_id: LeadId) -> Result<()> {
        access::ensure(role, Action::ManageLeads)?;
        lead::delete_lead(&self.db, lead_id).await?;
        self.leads.invalidate(QueryKey::Leads).await;
        Ok(())
    }

    // --- Professors ---

    /// Creates a professor.
    pub async fn create_professor(&self, role: Role, patch: &ProfessorPatch) -> Result<Professor> {
        access::ensure(role, Action::ManageProfessors)?;
        let created = professor::create_professor(&self.db, patch).await?;
        self.professors.invalidate(QueryKey::Professors).await;
        Ok(created)
    }

    /// Updates a professor.
    pub async fn update_professor(
        &self,
        role: Role,
        professor_id: ProfessorId,
        patch: &ProfessorPatch,
    ) -> Result<Professor> {
        access::ensure(role, Action::ManageProfessors)?;
        let updated = professor::update_professor(&self.db, professor_id, patch).await?;
        self.professors.invalidate(QueryKey::Professors).await;
        Ok(updated)
    }

    /// Deletes a professor; their courses lose the assignment.
    pub async fn delete_professor(&self, role: Role, professor_id: ProfessorId) -> Result<()> {
        access::ensure(role, Action::ManageProfessors)?;
        professor::delete_professor(&self.db, professor_id).await?;
        self.professors.invalidate(QueryKey::Professors).await;
        self.courses.invalidate(QueryKey::Courses).await;
        Ok(())
    }

    // --- Sellers and quotas ---

    /// Adds a seller.
    pub async fn create_seller(&self, role: Role, patch: &SellerPatch) -> Result<Seller> {
        access::ensure(role, Action::EditSellerQuotas)?;
        let created = seller::create_seller(&self.db, patch).await?;
        self.sellers.invalidate(QueryKey::Sellers).await;
        Ok(created)
    }

    /// Sets any seller's quotas.
    #[instrument(skip(self))]
    pub async fn update_quotas(
        &self,
        role: Role,
        seller_id: SellerId,
        monthly_quota: f64,
        annual_quota: f64,
    ) -> Result<Seller> {
        access::ensure(role, Action::EditSellerQuotas)?;
        let updated = seller::update_quotas(&self.db, seller_id, monthly_quota, annual_quota).await?;
        self.sellers.invalidate(QueryKey::Sellers).await;
        Ok(updated)
    }

    /// Sets the acting seller's own quotas.
    #[instrument(skip(self))]
    pub async fn update_own_quota(
        &self,
        role: Role,
        acting_seller: SellerId,
        monthly_quota: f64,
        annual_quota: f64,
    ) -> Result<Seller> {
        access::ensure(role, Action::EditOwnQuota)?;
        let updated =
            seller::update_quotas(&self.db, acting_seller, monthly_quota, annual_quota).await?;
        self.sellers.invalidate(QueryKey::Sellers).await;
        Ok(updated)
    }

    // --- Commission rules ---

    /// Creates a commission rule.
    #[instrument(skip(self))]
    pub async fn create_rule(
        &self,
        role: Role,
        rate: f64,
        seller_id: Option<SellerId>,
        course_id: Option<CourseId>,
    ) -> Result<CommissionRule> {
        access::ensure(role, Action::EditCommissionRules)?;
        let created = commission::create_rule(&self.db, rate, seller_id, course_id).await?;
        self.rules.invalidate(QueryKey::CommissionRules).await;
        Ok(created)
    }

    /// Updates a commission rule.
    #[instrument(skip(self))]
    pub async fn update_rule(
        &self,
        role: Role,
        rule_id: RuleId,
        patch: &CommissionRulePatch,
    ) -> Result<CommissionRule> {
        access::ensure(role, Action::EditCommissionRules)?;
        let updated = commission::update_rule(&self.db, rule_id, patch).await?;
        self.rules.invalidate(QueryKey::CommissionRules).await;
        Ok(updated)
    }

    /// Deletes a commission rule other than the last default one.
    #[instrument(skip(self))]
    pub async fn delete_rule(&self, role: Role, rule_id: RuleId) -> Result<()> {
        access::ensure(role, Action::EditCommissionRules)?;
        commission::delete_rule(&self.db, rule_id).await?;
        self.rules.invalidate(QueryKey::CommissionRules).await;
        Ok(())
    }

    // --- Goals ---

    /// Sets the company goal for `year`.
    #[instrument(skip(self))]
    pub async fn set_goal(
        &self,
        role: Role,
        year: i32,
        patch: &AnnualGoalPatch,
    ) -> Result<AnnualGoal> {
        access::ensure(role, Action::EditGlobalGoals)?;
        let goal = goals::upsert_goal(&self.db, year, patch).await?;
        self.goals.invalidate(QueryKey::Goals).await;
        info!("Goal for {year} set to {}", goal.target);
        Ok(goal)
    }
}

/// Today's date in local time.
#[must_use]
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
