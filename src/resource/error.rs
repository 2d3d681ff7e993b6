//! Failures of group lifecycle operations

use groupkit::GroupSource;
use uuid::Uuid;

use super::group::GroupState;

/// Why a lifecycle operation on a group failed
///
/// Every variant is terminal for the attempt; nothing is retried internally.
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    /// Import identifier is neither a UUID nor `<organization>/<group>`
    #[error("malformed identifier {identifier:?}: {reason}")]
    MalformedIdentifier { identifier: String, reason: String },

    #[error("organization {name:?} not found")]
    OrganizationNotFound { name: String },

    #[error("group {identifier:?} not found")]
    EntityNotFound { identifier: String },

    /// Group is owned by an identity provider sync
    #[error("group {id} is synchronised from {origin} and cannot be managed")]
    UnmanageableEntity { id: Uuid, origin: GroupSource },

    #[error("the deployment is not licensed for {capability}")]
    EntitlementDenied { capability: &'static str },

    #[error("failed to {operation}: {cause}")]
    RemoteOperationFailed {
        operation: &'static str,
        #[source]
        cause: groupkit::Error,
    },

    /// The group was created but a follow-up call failed
    ///
    /// `state` is what exists remotely; callers must record it so the group
    /// is not created twice.
    #[error("group {} was created but setting its members failed: {source}", .state.id)]
    Incomplete {
        state: Box<GroupState>,
        source: groupkit::Error,
    },
}

impl ReconcileError {
    /// Wrap a client error with the operation that failed
    pub fn remote(operation: &'static str) -> impl FnOnce(groupkit::Error) -> Self {
        move |cause| Self::RemoteOperationFailed { operation, cause }
    }

    /// Whether the group no longer exists remotely
    pub fn is_gone(&self) -> bool {
        match self {
            Self::RemoteOperationFailed { cause, .. } => cause.is_not_found(),
            Self::EntityNotFound { .. } => true,
            _ => false,
        }
    }

    /// Advice for the user, when the client error category suggests one
    pub fn advice(&self) -> Option<&'static str> {
        match self {
            Self::RemoteOperationFailed { cause, .. } | Self::Incomplete { source: cause, .. } => {
                Some(cause.category().advice())
            }
            Self::EntitlementDenied { .. } => {
                Some("Group management needs a Premium license on the deployment")
            }
            Self::UnmanageableEntity { .. } => {
                Some("Manage this group through your identity provider's group sync instead")
            }
            _ => None,
        }
    }
}
