//! Backend trait and implementations for the groups API.
//!
//! This module provides the [`Backend`] trait and implementations for
//! talking to a deployment. The primary implementation is
//! [`http::HttpBackend`], which calls the REST API.
//!
//! # Testing
//!
//! Use [`MockBackend`] for testing without network access:
//!
//! ```
//! use groupkit::backend::{Backend, MockBackend};
//! use groupkit::CreateGroupRequest;
//!
//! let mock = MockBackend::new();
//! let org = mock.add_organization("acme", true);
//!
//! let group = mock
//!     .create_group(
//!         org.id,
//!         &CreateGroupRequest {
//!             name: "devs".to_string(),
//!             display_name: String::new(),
//!             avatar_url: String::new(),
//!             quota_allowance: 0,
//!         },
//!     )
//!     .unwrap();
//!
//! // The server fills in the display name
//! assert_eq!(group.display_name, "devs");
//! assert_eq!(mock.calls().len(), 1);
//! ```

pub mod http;

use crate::error::{Error, Result};
use crate::types::{
    CreateGroupRequest, Entitlements, Group, GroupSource, Member, Organization, PatchGroupRequest,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

/// Remote operations on groups and organizations.
///
/// Every call is synchronous and blocking. Implementations hold no
/// per-group state, so one backend can serve concurrent callers.
pub trait Backend: Send + Sync {
    /// Create a group in an organization.
    fn create_group(&self, organization_id: Uuid, request: &CreateGroupRequest) -> Result<Group>;

    /// Fetch a group, including members and source.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if the group doesn't exist.
    fn group(&self, id: Uuid) -> Result<Group>;

    /// Apply a partial update to a group.
    fn patch_group(&self, id: Uuid, request: &PatchGroupRequest) -> Result<Group>;

    /// Delete a group.
    fn delete_group(&self, id: Uuid) -> Result<()>;

    /// Look up an organization by its unique name.
    fn organization_by_name(&self, name: &str) -> Result<Organization>;

    /// Look up a group by organization and group name.
    fn group_by_org_and_name(&self, organization_id: Uuid, name: &str) -> Result<Group>;

    /// Fetch the deployment's license entitlements.
    fn entitlements(&self) -> Result<Entitlements>;

    /// Fetch the deployment's default organization.
    fn default_organization(&self) -> Result<Organization>;
}

/// A call recorded by [`MockBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum MockCall {
    CreateGroup {
        organization_id: Uuid,
        request: CreateGroupRequest,
    },
    Group(Uuid),
    PatchGroup {
        id: Uuid,
        request: PatchGroupRequest,
    },
    DeleteGroup(Uuid),
    OrganizationByName(String),
    GroupByOrgAndName {
        organization_id: Uuid,
        name: String,
    },
    Entitlements,
    DefaultOrganization,
}

impl MockCall {
    /// Name of the backend method that was called.
    #[must_use]
    pub fn operation(&self) -> &'static str {
        match self {
            Self::CreateGroup { .. } => "create_group",
            Self::Group(_) => "group",
            Self::PatchGroup { .. } => "patch_group",
            Self::DeleteGroup(_) => "delete_group",
            Self::OrganizationByName(_) => "organization_by_name",
            Self::GroupByOrgAndName { .. } => "group_by_org_and_name",
            Self::Entitlements => "entitlements",
            Self::DefaultOrganization => "default_organization",
        }
    }

    /// Whether the call changes remote state.
    #[must_use]
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Self::CreateGroup { .. } | Self::PatchGroup { .. } | Self::DeleteGroup(_)
        )
    }
}

#[derive(Debug, Default)]
struct MockState {
    groups: HashMap<Uuid, Group>,
    organizations: Vec<Organization>,
    entitlements: Entitlements,
    calls: Vec<MockCall>,
    failures: HashMap<&'static str, (u16, String)>,
}

/// Mock backend for testing without network access.
///
/// Behaves like a small in-memory deployment: created groups get fresh IDs,
/// an empty display name defaults to the group name, and patches apply
/// member and attribute changes. Every call is recorded, and any operation
/// can be made to fail with a given status.
///
/// Clones share the same state, so a test can hand one clone to the code
/// under test and inspect the other.
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    state: Arc<Mutex<MockState>>,
}

impl MockBackend {
    /// Create a new empty mock backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add an organization and return it.
    pub fn add_organization(&self, name: &str, is_default: bool) -> Organization {
        let org = Organization {
            id: Uuid::new_v4(),
            name: name.to_string(),
            display_name: name.to_string(),
            is_default,
        };
        self.state().organizations.push(org.clone());
        org
    }

    /// Add a group as-is, replacing any group with the same ID.
    pub fn add_group(&self, group: Group) {
        self.state().groups.insert(group.id, group);
    }

    /// Add a user-sourced group with the given members and return it.
    pub fn seed_group(&self, organization_id: Uuid, name: &str, members: &[Uuid]) -> Group {
        let group = Group {
            id: Uuid::new_v4(),
            name: name.to_string(),
            display_name: name.to_string(),
            organization_id,
            avatar_url: String::new(),
            quota_allowance: 0,
            members: members.iter().copied().map(Member::with_id).collect(),
            source: GroupSource::User,
        };
        self.add_group(group.clone());
        group
    }

    /// Remove a group behind the client's back.
    pub fn remove_group(&self, id: Uuid) {
        self.state().groups.remove(&id);
    }

    /// Current remote copy of a group, without recording a call.
    #[must_use]
    pub fn peek_group(&self, id: Uuid) -> Option<Group> {
        self.state().groups.get(&id).cloned()
    }

    /// Set the entitlements returned by [`Backend::entitlements`].
    pub fn set_entitlements(&self, entitlements: Entitlements) {
        self.state().entitlements = entitlements;
    }

    /// Make every call to `operation` fail with an API error.
    ///
    /// `operation` is a [`Backend`] method name, as returned by
    /// [`MockCall::operation`].
    pub fn fail_on(&self, operation: &'static str, status: u16, message: impl Into<String>) {
        self.state()
            .failures
            .insert(operation, (status, message.into()));
    }

    /// All calls made so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<MockCall> {
        self.state().calls.clone()
    }

    /// Calls that changed remote state.
    #[must_use]
    pub fn mutations(&self) -> Vec<MockCall> {
        self.state()
            .calls
            .iter()
            .filter(|c| c.is_mutation())
            .cloned()
            .collect()
    }

    /// Forget recorded calls.
    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }

    /// Record a call and return the guarded state, or the injected failure.
    fn begin(&self, call: MockCall) -> Result<MutexGuard<'_, MockState>> {
        let mut state = self.state();
        let operation = call.operation();
        state.calls.push(call);

        if let Some((status, message)) = state.failures.get(operation) {
            return Err(Error::Api {
                status: *status,
                message: message.clone(),
                detail: String::new(),
            });
        }
        Ok(state)
    }
}

impl Backend for MockBackend {
    fn create_group(&self, organization_id: Uuid, request: &CreateGroupRequest) -> Result<Group> {
        let mut state = self.begin(MockCall::CreateGroup {
            organization_id,
            request: request.clone(),
        })?;

        let taken = state
            .groups
            .values()
            .any(|g| g.organization_id == organization_id && g.name == request.name);
        if taken {
            return Err(Error::Api {
                status: 409,
                message: format!("A group named {:?} already exists.", request.name),
                detail: String::new(),
            });
        }

        let display_name = if request.display_name.is_empty() {
            request.name.clone()
        } else {
            request.display_name.clone()
        };

        let group = Group {
            id: Uuid::new_v4(),
            name: request.name.clone(),
            display_name,
            organization_id,
            avatar_url: request.avatar_url.clone(),
            quota_allowance: request.quota_allowance,
            members: Vec::new(),
            source: GroupSource::User,
        };
        state.groups.insert(group.id, group.clone());
        Ok(group)
    }

    fn group(&self, id: Uuid) -> Result<Group> {
        let state = self.begin(MockCall::Group(id))?;
        state
            .groups
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::not_found("group", id.to_string()))
    }

    fn patch_group(&self, id: Uuid, request: &PatchGroupRequest) -> Result<Group> {
        let mut state = self.begin(MockCall::PatchGroup {
            id,
            request: request.clone(),
        })?;

        let group = state
            .groups
            .get_mut(&id)
            .ok_or_else(|| Error::not_found("group", id.to_string()))?;

        for user in &request.add_users {
            let user_id = Uuid::parse_str(user).map_err(|e| Error::Api {
                status: 400,
                message: format!("Invalid user ID {user:?}"),
                detail: e.to_string(),
            })?;
            if !group.members.iter().any(|m| m.id == user_id) {
                group.members.push(Member::with_id(user_id));
            }
        }
        group
            .members
            .retain(|m| !request.remove_users.contains(&m.id.to_string()));

        if let Some(name) = &request.name {
            group.name.clone_from(name);
        }
        if let Some(display_name) = &request.display_name {
            group.display_name.clone_from(display_name);
        }
        if let Some(avatar_url) = &request.avatar_url {
            group.avatar_url.clone_from(avatar_url);
        }
        if let Some(quota) = request.quota_allowance {
            group.quota_allowance = quota;
        }

        Ok(group.clone())
    }

    fn delete_group(&self, id: Uuid) -> Result<()> {
        let mut state = self.begin(MockCall::DeleteGroup(id))?;
        state
            .groups
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| Error::not_found("group", id.to_string()))
    }

    fn organization_by_name(&self, name: &str) -> Result<Organization> {
        let state = self.begin(MockCall::OrganizationByName(name.to_string()))?;
        state
            .organizations
            .iter()
            .find(|o| o.name == name)
            .cloned()
            .ok_or_else(|| Error::not_found("organization", name))
    }

    fn group_by_org_and_name(&self, organization_id: Uuid, name: &str) -> Result<Group> {
        let state = self.begin(MockCall::GroupByOrgAndName {
            organization_id,
            name: name.to_string(),
        })?;
        state
            .groups
            .values()
            .find(|g| g.organization_id == organization_id && g.name == name)
            .cloned()
            .ok_or_else(|| Error::not_found("group", format!("{organization_id}/{name}")))
    }

    fn entitlements(&self) -> Result<Entitlements> {
        let state = self.begin(MockCall::Entitlements)?;
        Ok(state.entitlements.clone())
    }

    fn default_organization(&self) -> Result<Organization> {
        let state = self.begin(MockCall::DefaultOrganization)?;
        state
            .organizations
            .iter()
            .find(|o| o.is_default)
            .cloned()
            .ok_or_else(|| Error::not_found("organization", "default"))
    }
}
