//! Group membership reconciliation
//!
//! Membership is a set of user IDs. When it is managed, the remote set must
//! end up exactly equal to the desired one; the delta is folded into the
//! same patch that carries attribute changes.

use declarative::{SetDelta, set_delta};
use groupkit::{Group, PatchGroupRequest};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Members of a remote group as a set
pub fn member_set(group: &Group) -> BTreeSet<Uuid> {
    group.member_ids().collect()
}

/// Users to add to and remove from `group` so its members equal `desired`
pub fn membership_delta(group: &Group, desired: &BTreeSet<Uuid>) -> SetDelta<Uuid> {
    let current: Vec<Uuid> = group.member_ids().collect();
    set_delta(&current, desired)
}

/// Copy a membership delta into a patch request
pub fn add_to_patch(patch: &mut PatchGroupRequest, delta: &SetDelta<Uuid>) {
    patch.add_users = delta.to_add.iter().map(Uuid::to_string).collect();
    patch.remove_users = delta.to_remove.iter().map(Uuid::to_string).collect();
}
