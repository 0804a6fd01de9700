//! Invite snapshot reconciliation and join attribution.

use std::collections::HashMap;

use crate::model::invite::{Attribution, LiveInvite, TrackedInvite};

/// Builds the new snapshot from the previous one and the live invite list.
///
/// Every live invite is kept with its current use count. Role bindings carry over for
/// invites that still exist; invites that vanished are dropped along with their
/// bindings.
///
/// # Arguments
/// - `tracked` - Previous snapshot
/// - `live` - Invites currently reported by Discord
///
/// # Returns
/// - `Vec<TrackedInvite>` - The reconciled snapshot, in live order
pub fn reconcile(tracked: &[TrackedInvite], live: &[LiveInvite]) -> Vec<TrackedInvite> {
    let roles: HashMap<&str, Option<u64>> = tracked
        .iter()
        .map(|invite| (invite.code.as_str(), invite.role_id))
        .collect();

    live.iter()
        .map(|invite| TrackedInvite {
            code: invite.code.clone(),
            uses: invite.uses,
            role_id: roles.get(invite.code.as_str()).copied().flatten(),
        })
        .collect()
}

/// Infers which invite a new member joined through.
///
/// Candidates are known invites whose use count went up by exactly one and unknown
/// invites that have been used exactly once. The join is attributed only when there
/// is a single candidate.
///
/// # Arguments
/// - `tracked` - Snapshot taken before the join
/// - `live` - Invites currently reported by Discord
///
/// # Returns
/// - `Attribution::Determined` - Exactly one invite explains the join
/// - `Attribution::Undetermined` - None or several invites explain the join
pub fn infer_invite(tracked: &[TrackedInvite], live: &[LiveInvite]) -> Attribution {
    let previous: HashMap<&str, u64> = tracked
        .iter()
        .map(|invite| (invite.code.as_str(), invite.uses))
        .collect();

    let mut candidates = live.iter().filter(|invite| {
        match previous.get(invite.code.as_str()) {
            Some(uses) => invite.uses == uses + 1,
            None => invite.uses == 1,
        }
    });

    match (candidates.next(), candidates.next()) {
        (Some(invite), None) => Attribution::Determined(invite.clone()),
        _ => Attribution::Undetermined,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracked(code: &str, uses: u64, role_id: Option<u64>) -> TrackedInvite {
        TrackedInvite {
            code: code.to_string(),
            uses,
            role_id,
        }
    }

    fn live(code: &str, uses: u64) -> LiveInvite {
        LiveInvite {
            code: code.to_string(),
            uses,
            inviter: Some("alice".to_string()),
        }
    }

    #[test]
    fn reconcile_syncs_adds_and_prunes() {
        let snapshot = vec![tracked("keep", 1, Some(5)), tracked("gone", 3, Some(6))];
        let current = vec![live("keep", 4), live("new", 0)];

        let result = reconcile(&snapshot, &current);

        assert_eq!(
            result,
            vec![tracked("keep", 4, Some(5)), tracked("new", 0, None)]
        );
    }

    #[test]
    fn attributes_single_incremented_invite() {
        let snapshot = vec![tracked("a", 2, None), tracked("b", 7, None)];
        let current = vec![live("a", 2), live("b", 8)];

        assert_eq!(
            infer_invite(&snapshot, &current),
            Attribution::Determined(live("b", 8))
        );
    }

    #[test]
    fn attributes_new_invite_used_once() {
        let snapshot = vec![tracked("a", 2, None)];
        let current = vec![live("a", 2), live("fresh", 1)];

        assert_eq!(
            infer_invite(&snapshot, &current),
            Attribution::Determined(live("fresh", 1))
        );
    }

    #[test]
    fn concurrent_joins_are_undetermined() {
        let snapshot = vec![tracked("a", 2, None), tracked("b", 7, None)];
        let current = vec![live("a", 3), live("b", 8)];

        assert_eq!(infer_invite(&snapshot, &current), Attribution::Undetermined);
    }

    #[test]
    fn jump_of_more_than_one_is_undetermined() {
        let snapshot = vec![tracked("a", 2, None)];
        let current = vec![live("a", 4)];

        assert_eq!(infer_invite(&snapshot, &current), Attribution::Undetermined);
    }

    #[test]
    fn no_change_is_undetermined() {
        let snapshot = vec![tracked("a", 2, None)];
        let current = vec![live("a", 2), live("fresh", 0)];

        assert_eq!(infer_invite(&snapshot, &current), Attribution::Undetermined);
    }
}
