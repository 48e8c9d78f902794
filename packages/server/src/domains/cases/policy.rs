use crate::common::UserId;
use crate::domains::accounts::Principal;
use crate::domains::cases::models::Case;

/// Authorization rules for touching a single case
///
/// Pure predicates over already-loaded data; callers turn a `false` into
/// `CaseError::Forbidden` with a message fitting the operation.
pub struct CaseAccessPolicy;

impl CaseAccessPolicy {
    /// Only the reporter edits descriptive fields.
    pub fn can_update(case: &Case, user_id: UserId) -> bool {
        case.reported_by_id == user_id
    }

    /// Any NGO may attempt a claim; exclusivity is settled by the store.
    pub fn can_claim(_case: &Case, principal: &Principal) -> bool {
        principal.is_ngo()
    }

    /// Only the NGO currently holding the case may delete it. An unassigned
    /// case cannot be deleted by anyone.
    pub fn can_delete(case: &Case, principal: &Principal) -> bool {
        if !principal.is_ngo() {
            return false;
        }
        match (&principal.ngo_profile, case.assigned_ngo_id) {
            (Some(profile), Some(assignee)) => profile.id == assignee,
            _ => false,
        }
    }
}
