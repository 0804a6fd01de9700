//! Domain models for bulk role operations.

use std::fmt;

/// Mutation applied to every member of a guild.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkRoleOperation {
    /// Give the role to members lacking it.
    Add,
    /// Take the role from members holding it.
    Remove,
    /// Make role membership mirror the filter role: holders of the filter get the role,
    /// everyone else loses it.
    Apply,
}

impl BulkRoleOperation {
    /// Parses an operation name case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "add" => Some(Self::Add),
            "remove" => Some(Self::Remove),
            "apply" => Some(Self::Apply),
            _ => None,
        }
    }
}

impl fmt::Display for BulkRoleOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => write!(f, "add"),
            Self::Remove => write!(f, "remove"),
            Self::Apply => write!(f, "apply"),
        }
    }
}

/// Change to make to a single member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleChange {
    Grant,
    Revoke,
}

/// Validated bulk role request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkRoleRequest {
    pub operation: BulkRoleOperation,
    pub role_id: u64,
    pub role_name: String,
    /// Restricts `add`/`remove` to holders of this role; drives `apply`.
    pub filter_role_id: Option<u64>,
}

impl BulkRoleRequest {
    /// Decides what, if anything, must change for one member.
    ///
    /// # Arguments
    /// - `member` - The member's current role set
    ///
    /// # Returns
    /// - `Some(RoleChange)` - The member needs the role granted or revoked
    /// - `None` - The member already matches the requested state or is filtered out
    pub fn change_for(&self, member: &RosterMember) -> Option<RoleChange> {
        let has_role = member.has_role(self.role_id);
        let passes_filter = self
            .filter_role_id
            .map_or(true, |filter| member.has_role(filter));

        match self.operation {
            BulkRoleOperation::Add if passes_filter && !has_role => Some(RoleChange::Grant),
            BulkRoleOperation::Remove if passes_filter && has_role => Some(RoleChange::Revoke),
            BulkRoleOperation::Apply if passes_filter && !has_role => Some(RoleChange::Grant),
            BulkRoleOperation::Apply if !passes_filter && has_role => Some(RoleChange::Revoke),
            _ => None,
        }
    }

    /// Progress line shown while the job runs.
    pub fn progress_text(&self, done: usize, total: usize) -> String {
        match self.operation {
            BulkRoleOperation::Add => format!(
                "Adding `{}` role to all server members... ({}/{})",
                self.role_name, done, total
            ),
            BulkRoleOperation::Remove => format!(
                "Removing `{}` role from all server members... ({}/{})",
                self.role_name, done, total
            ),
            BulkRoleOperation::Apply => format!(
                "Applying `{}` role to all server members... ({}/{})",
                self.role_name, done, total
            ),
        }
    }

    /// Final line posted once the job finishes or is stopped.
    pub fn summary_text(&self, summary: &BulkRoleSummary) -> String {
        if summary.cancelled {
            return format!(
                "Operation aborted by the user! ({}/{})",
                summary.processed, summary.total
            );
        }

        match self.operation {
            BulkRoleOperation::Add => format!(
                "Added `{}` role to all server members! ({}/{})",
                self.role_name, summary.processed, summary.total
            ),
            BulkRoleOperation::Remove => format!(
                "Removed `{}` role from all server members! ({}/{})",
                self.role_name, summary.processed, summary.total
            ),
            BulkRoleOperation::Apply => format!(
                "Applied `{}` role to all server members! ({}/{})",
                self.role_name, summary.processed, summary.total
            ),
        }
    }
}

/// A guild member as seen by the bulk role operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterMember {
    pub user_id: u64,
    pub role_ids: Vec<u64>,
}

impl RosterMember {
    pub fn has_role(&self, role_id: u64) -> bool {
        self.role_ids.contains(&role_id)
    }
}

/// Result of a finished bulk role job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulkRoleSummary {
    /// Members visited, whether or not they needed a change.
    pub processed: usize,
    /// Members in the roster when the job started.
    pub total: usize,
    /// Members whose roles were actually changed.
    pub changed: usize,
    pub cancelled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(operation: BulkRoleOperation, filter: Option<u64>) -> BulkRoleRequest {
        BulkRoleRequest {
            operation,
            role_id: 10,
            role_name: "Member".to_string(),
            filter_role_id: filter,
        }
    }

    fn member(role_ids: &[u64]) -> RosterMember {
        RosterMember {
            user_id: 1,
            role_ids: role_ids.to_vec(),
        }
    }

    #[test]
    fn parses_operations_case_insensitively() {
        assert_eq!(BulkRoleOperation::parse("ADD"), Some(BulkRoleOperation::Add));
        assert_eq!(BulkRoleOperation::parse("remove"), Some(BulkRoleOperation::Remove));
        assert_eq!(BulkRoleOperation::parse("Apply"), Some(BulkRoleOperation::Apply));
        assert_eq!(BulkRoleOperation::parse("stop"), None);
    }

    #[test]
    fn add_skips_members_that_already_have_the_role() {
        let req = request(BulkRoleOperation::Add, None);

        assert_eq!(req.change_for(&member(&[])), Some(RoleChange::Grant));
        assert_eq!(req.change_for(&member(&[10])), None);
    }

    #[test]
    fn remove_respects_filter() {
        let req = request(BulkRoleOperation::Remove, Some(20));

        assert_eq!(req.change_for(&member(&[10, 20])), Some(RoleChange::Revoke));
        assert_eq!(req.change_for(&member(&[10])), None);
    }

    #[test]
    fn apply_mirrors_filter_role() {
        let req = request(BulkRoleOperation::Apply, Some(20));

        assert_eq!(req.change_for(&member(&[20])), Some(RoleChange::Grant));
        assert_eq!(req.change_for(&member(&[10])), Some(RoleChange::Revoke));
        assert_eq!(req.change_for(&member(&[10, 20])), None);
        assert_eq!(req.change_for(&member(&[])), None);
    }

    #[test]
    fn summary_reports_abort() {
        let req = request(BulkRoleOperation::Add, None);
        let summary = BulkRoleSummary {
            processed: 3,
            total: 9,
            changed: 2,
            cancelled: true,
        };

        assert_eq!(req.summary_text(&summary), "Operation aborted by the user! (3/9)");
    }
}
