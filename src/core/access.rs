//! Which role may attempt which action.
//!
//! The store enforces the real policy; this table only decides whether the
//! service should bother sending a write.

use crate::{
    errors::{Error, Result},
    models::Role,
};
use std::fmt;

/// Actions gated by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Create, edit or delete a course
    ManageCourses,
    /// Create, edit or delete a professor
    ManageProfessors,
    /// Create, edit, move or delete a lead
    ManageLeads,
    /// Set the company's annual goal
    EditGlobalGoals,
    /// Create, edit or delete commission rules
    EditCommissionRules,
    /// Change any seller's quotas
    EditSellerQuotas,
    /// Change one's own quota
    EditOwnQuota,
    /// Read dashboards and reports
    ViewReports,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::ManageCourses => "manage courses",
            Self::ManageProfessors => "manage professors",
            Self::ManageLeads => "manage leads",
            Self::EditGlobalGoals => "edit global goals",
            Self::EditCommissionRules => "edit commission rules",
            Self::EditSellerQuotas => "edit seller quotas",
            Self::EditOwnQuota => "edit own quota",
            Self::ViewReports => "view reports",
        };
        f.write_str(text)
    }
}

/// Whether `role` may attempt `action`.
#[must_use]
pub const fn can(role: Role, action: Action) -> bool {
    match action {
        Action::ManageCourses
        | Action::ManageProfessors
        | Action::EditGlobalGoals
        | Action::EditCommissionRules
        | Action::EditSellerQuotas => matches!(role, Role::Admin),
        Action::ManageLeads => !matches!(role, Role::Viewer),
        Action::EditOwnQuota => matches!(role, Role::Seller | Role::Admin),
        Action::ViewReports => true,
    }
}

/// [`can`] as a `Result`, for use with `?`.
pub fn ensure(role: Role, action: Action) -> Result<()> {
    if can(role, action) {
        Ok(())
    } else {
        Err(Error::PermissionDenied {
            role: role.to_string(),
            action: action.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_can_do_everything() {
        for action in [
            Action::ManageCourses,
            Action::ManageProfessors,
            Action::ManageLeads,
            Action::EditGlobalGoals,
            Action::EditCommissionRules,
            Action::EditSellerQuotas,
            Action::EditOwnQuota,
            Action::ViewReports,
        ] {
            assert!(can(Role::Admin, action), "admin denied {action}");
        }
    }

    #[test]
    fn test_sellers_and_managers_work_leads_only() {
        for role in [Role::Seller, Role::Manager] {
            assert!(can(role, Action::ManageLeads));
            assert!(!can(role, Action::ManageCourses));
            assert!(!can(role, Action::EditCommissionRules));
            assert!(!can(role, Action::EditGlobalGoals));
        }
        assert!(can(Role::Seller, Action::EditOwnQuota));
        assert!(!can(Role::Manager, Action::EditOwnQuota));
    }

    #[test]
    fn test_viewer_is_read_only() {
        assert!(can(Role::Viewer, Action::ViewReports));
        assert!(!can(Role::Viewer, Action::ManageLeads));
    }

    #[test]
    fn test_ensure_reports_role_and_action() {
        let err = ensure(Role::Viewer, Action::ManageLeads);
        assert!(matches!(
            err,
            Err(Error::PermissionDenied { ref role, ref action })
                if role == "viewer" && action == "manage leads"
        ));
    }
}
