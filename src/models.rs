//! Domain types used by the calculators and the service layer.
//!
//! These are the canonical in-memory shapes. Nothing here knows about the
//! storage row layout; `core::adapters` maps between the two.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Course primary key
pub type CourseId = i64;
/// Lead primary key
pub type LeadId = i64;
/// Seller primary key
pub type SellerId = i64;
/// Professor primary key
pub type ProfessorId = i64;
/// Commission rule primary key
pub type RuleId = i64;

/// Lifecycle of a course. Any status may be set from any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CourseStatus {
    /// Scheduled but not open yet
    #[default]
    Planned,
    /// Accepting registrations
    OpenForEnrollment,
    /// Currently running
    Ongoing,
    /// Finished
    Completed,
    /// Called off
    Cancelled,
}

impl CourseStatus {
    /// Human-readable label used in reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Planned => "Planned",
            Self::OpenForEnrollment => "Open for enrollment",
            Self::Ongoing => "Ongoing",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }
}

/// Lifecycle of a lead: `ProposalSent` → (`EnrollmentCompleted` | `ProposalDeclined`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum LeadStatus {
    /// Open proposal, still undecided
    #[default]
    ProposalSent,
    /// Won: the organization enrolled
    EnrollmentCompleted,
    /// Lost
    ProposalDeclined,
}

/// Why a proposal was declined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LossReason {
    /// Price too high
    Price,
    /// Course dates did not fit
    IncompatibleDate,
    /// No budget available
    NoBudget,
}

impl LossReason {
    /// Human-readable label used in reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Price => "Price",
            Self::IncompatibleDate => "Incompatible course date",
            Self::NoBudget => "No budget",
        }
    }
}

/// Whether a commission rule is the catch-all default or scoped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleKind {
    /// No seller and no course reference
    Default,
    /// Scoped to a seller, a course or both
    Specific,
}

/// Application roles. Checks made against them are advisory; the store
/// enforces the real policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Full access
    Admin,
    /// Sales rep
    Seller,
    /// Sales manager
    Manager,
    /// Read-only
    Viewer,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Admin => "admin",
            Self::Seller => "seller",
            Self::Manager => "manager",
            Self::Viewer => "viewer",
        };
        f.write_str(name)
    }
}

/// A course offering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// Primary key
    pub id: CourseId,
    /// Topic
    pub topic: String,
    /// Assigned professor
    pub professor_id: Option<ProfessorId>,
    /// City
    pub city: String,
    /// Region code
    pub region: String,
    /// First day
    pub starts_on: NaiveDate,
    /// Last day
    pub ends_on: NaiveDate,
    /// Workload in hours
    pub duration_hours: u32,
    /// Price per registration
    pub registration_price: f64,
    /// Description
    pub description: Option<String>,
    /// Lifecycle status
    pub status: CourseStatus,
    /// Registration target
    pub registration_target: Option<u32>,
}

/// Who to talk to about a lead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Contact {
    /// Responsible person
    pub name: String,
    /// Organization name; clients are grouped by it
    pub organization: String,
    /// Sector inside the organization
    pub sector: Option<String>,
    /// City
    pub city: String,
    /// Region code
    pub region: String,
    /// Phone
    pub phone: Option<String>,
    /// Email
    pub email: Option<String>,
}

/// A sales opportunity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    /// Primary key
    pub id: LeadId,
    /// Course being sold
    pub course_id: CourseId,
    /// Contact details
    pub contact: Contact,
    /// Registrations requested
    pub registrations: u32,
    /// Proposal price
    pub proposed_price: f64,
    /// Negotiated price, overrides the proposal when set
    pub negotiated_price: Option<f64>,
    /// Responsible seller
    pub seller_id: SellerId,
    /// Lifecycle status
    pub status: LeadStatus,
    /// Day the lead was registered
    pub created_on: Option<NaiveDate>,
    /// Day the enrollment was confirmed
    pub converted_on: Option<NaiveDate>,
    /// Reason for a declined proposal
    pub loss_reason: Option<LossReason>,
    /// Notes
    pub notes: Option<String>,
}

impl Lead {
    /// Negotiated price if present, otherwise the proposed price.
    #[must_use]
    pub fn effective_value(&self) -> f64 {
        self.negotiated_price.unwrap_or(self.proposed_price)
    }

    /// True when the lead counts toward realized revenue and registrations.
    #[must_use]
    pub fn is_converted(&self) -> bool {
        self.status == LeadStatus::EnrollmentCompleted
    }
}

/// A sales rep and their quotas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seller {
    /// Primary key
    pub id: SellerId,
    /// Name
    pub name: String,
    /// Email
    pub email: String,
    /// Monthly quota
    pub monthly_quota: f64,
    /// Annual quota
    pub annual_quota: f64,
}

/// An instructor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Professor {
    /// Primary key
    pub id: ProfessorId,
    /// Name
    pub name: String,
    /// Email
    pub email: String,
    /// Phone
    pub phone: Option<String>,
    /// Specialty areas
    pub areas: Vec<String>,
    /// Biography
    pub bio: Option<String>,
}

/// A commission percentage and its scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommissionRule {
    /// Primary key
    pub id: RuleId,
    /// Percentage, 5.0 means 5%
    pub rate: f64,
    /// Seller scope
    pub seller_id: Option<SellerId>,
    /// Course scope
    pub course_id: Option<CourseId>,
    /// Default or specific
    pub kind: RuleKind,
}

/// Company revenue target for a year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualGoal {
    /// Primary key
    pub id: i64,
    /// Calendar year
    pub year: i32,
    /// Target revenue
    pub target: f64,
    /// Description
    pub description: Option<String>,
}

/// One converted lead as seen from the client's side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Purchase {
    /// Course bought
    pub course_id: CourseId,
    /// Conversion day, if recorded
    pub date: Option<NaiveDate>,
    /// Effective value paid
    pub value: f64,
}

/// An organization derived from its converted leads. Never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    /// Lower-cased, trimmed organization name used for grouping
    pub key: String,
    /// Organization name as first seen
    pub organization: String,
    /// City of the first converted lead
    pub city: String,
    /// Region of the first converted lead
    pub region: String,
    /// Distinct contacts across purchases
    pub contacts: Vec<Contact>,
    /// Every converted lead, oldest first
    pub purchases: Vec<Purchase>,
    /// Sum of purchase values
    pub total_spent: f64,
    /// Most recent conversion day
    pub last_purchase: Option<NaiveDate>,
    /// Bought two or more distinct courses
    pub recurring: bool,
}

// Partial shapes used for inserts and PATCH-style updates. A `None` field is
// left untouched; `Some(None)` clears a nullable column.

/// Partial course.
#[derive(Debug, Clone, Default, PartialEq)]
#[allow(missing_docs)]
pub struct CoursePatch {
    pub topic: Option<String>,
    pub professor_id: Option<Option<ProfessorId>>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub starts_on: Option<NaiveDate>,
    pub ends_on: Option<NaiveDate>,
    pub duration_hours: Option<u32>,
    pub registration_price: Option<f64>,
    pub description: Option<Option<String>>,
    pub status: Option<CourseStatus>,
    pub registration_target: Option<Option<u32>>,
}

/// Partial lead.
#[derive(Debug, Clone, Default, PartialEq)]
#[allow(missing_docs)]
pub struct LeadPatch {
    pub course_id: Option<CourseId>,
    pub contact_name: Option<String>,
    pub organization: Option<String>,
    pub sector: Option<Option<String>>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub phone: Option<Option<String>>,
    pub email: Option<Option<String>>,
    pub registrations: Option<u32>,
    pub proposed_price: Option<f64>,
    pub negotiated_price: Option<Option<f64>>,
    pub seller_id: Option<SellerId>,
    pub status: Option<LeadStatus>,
    pub created_on: Option<Option<NaiveDate>>,
    pub converted_on: Option<Option<NaiveDate>>,
    pub loss_reason: Option<Option<LossReason>>,
    pub notes: Option<Option<String>>,
}

/// Partial seller.
#[derive(Debug, Clone, Default, PartialEq)]
#[allow(missing_docs)]
pub struct SellerPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub monthly_quota: Option<f64>,
    pub annual_quota: Option<f64>,
}

/// Partial professor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct ProfessorPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<Option<String>>,
    pub areas: Option<Vec<String>>,
    pub bio: Option<Option<String>>,
}

/// Partial commission rule.
#[derive(Debug, Clone, Default, PartialEq)]
#[allow(missing_docs)]
pub struct CommissionRulePatch {
    pub rate: Option<f64>,
    pub seller_id: Option<Option<SellerId>>,
    pub course_id: Option<Option<CourseId>>,
    pub kind: Option<RuleKind>,
}

/// Partial annual goal.
#[derive(Debug, Clone, Default, PartialEq)]
#[allow(missing_docs)]
pub struct AnnualGoalPatch {
    pub year: Option<i32>,
    pub target: Option<f64>,
    pub description: Option<Option<String>>,
}
