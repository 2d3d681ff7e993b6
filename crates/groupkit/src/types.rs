//! Wire types for the groups API.
//!
//! These mirror the JSON bodies exchanged with the deployment. Field names
//! follow the API (`snake_case`), IDs are UUIDs.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

/// Name of the feature that licenses group management.
pub const FEATURE_TEMPLATE_RBAC: &str = "template_rbac";

/// Where a group's membership comes from.
///
/// Groups synchronised from an identity provider are owned by that
/// provider; changing them locally would fight the sync.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GroupSource {
    /// Created through the API.
    #[default]
    User,
    /// Synchronised from an OIDC identity provider.
    Oidc,
    /// Any source this client doesn't know about.
    #[serde(other)]
    Unknown,
}

impl GroupSource {
    /// Whether the group is owned by an external system.
    ///
    /// Unknown sources count as external: they are not known to be safe to manage.
    #[must_use]
    pub fn is_external(&self) -> bool {
        !matches!(self, Self::User)
    }
}

impl fmt::Display for GroupSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::User => "user",
            Self::Oidc => "oidc",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// A member of a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// User ID.
    pub id: Uuid,
    /// Username, if the API returned one.
    #[serde(default)]
    pub username: String,
    /// Email address, if the API returned one.
    #[serde(default)]
    pub email: String,
}

impl Member {
    /// A member known only by ID.
    #[must_use]
    pub fn with_id(id: Uuid) -> Self {
        Self {
            id,
            username: String::new(),
            email: String::new(),
        }
    }
}

/// A group as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Group ID.
    pub id: Uuid,
    /// Unique name within the organization.
    pub name: String,
    /// Human-readable name.
    #[serde(default)]
    pub display_name: String,
    /// Owning organization.
    pub organization_id: Uuid,
    /// Avatar URL, empty when unset.
    #[serde(default)]
    pub avatar_url: String,
    /// Quota credits allocated to each member.
    #[serde(default)]
    pub quota_allowance: i32,
    /// Current members.
    #[serde(default)]
    pub members: Vec<Member>,
    /// Where the group came from.
    #[serde(default)]
    pub source: GroupSource,
}

impl Group {
    /// IDs of all current members.
    pub fn member_ids(&self) -> impl Iterator<Item = Uuid> + '_ {
        self.members.iter().map(|m| m.id)
    }
}

/// An organization as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    /// Organization ID.
    pub id: Uuid,
    /// Unique name.
    pub name: String,
    /// Human-readable name.
    #[serde(default)]
    pub display_name: String,
    /// Whether this is the deployment's default organization.
    #[serde(default)]
    pub is_default: bool,
}

/// Body of a create-group request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateGroupRequest {
    /// Group name.
    pub name: String,
    /// Display name; empty lets the server default it.
    pub display_name: String,
    /// Avatar URL.
    pub avatar_url: String,
    /// Quota credits per member.
    pub quota_allowance: i32,
}

/// Body of a patch-group request.
///
/// Only set fields are sent. An empty `add_users`/`remove_users` list is
/// omitted entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchGroupRequest {
    /// User IDs to add.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub add_users: Vec<String>,
    /// User IDs to remove.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub remove_users: Vec<String>,
    /// New name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// New avatar URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    /// New quota allowance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quota_allowance: Option<i32>,
}

impl PatchGroupRequest {
    /// Whether the request touches membership.
    #[must_use]
    pub fn changes_members(&self) -> bool {
        !self.add_users.is_empty() || !self.remove_users.is_empty()
    }

    /// Whether the request changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.changes_members()
            && self.name.is_none()
            && self.display_name.is_none()
            && self.avatar_url.is_none()
            && self.quota_allowance.is_none()
    }
}

/// A licensed feature.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    /// Entitlement level ("entitled", "grace_period", "not_entitled").
    #[serde(default)]
    pub entitlement: String,
    /// Whether the feature is turned on.
    #[serde(default)]
    pub enabled: bool,
}

/// License entitlements of the deployment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entitlements {
    /// Features keyed by name.
    #[serde(default)]
    pub features: HashMap<String, Feature>,
    /// Whether a license is installed at all.
    #[serde(default)]
    pub has_license: bool,
}

impl Entitlements {
    /// Whether `feature` is enabled. Unknown features are disabled.
    #[must_use]
    pub fn is_enabled(&self, feature: &str) -> bool {
        self.features.get(feature).is_some_and(|f| f.enabled)
    }

    /// Entitlements with the given features enabled.
    #[must_use]
    pub fn with_enabled(features: &[&str]) -> Self {
        Self {
            features: features
                .iter()
                .map(|name| {
                    (
                        (*name).to_string(),
                        Feature {
                            entitlement: "entitled".to_string(),
                            enabled: true,
                        },
                    )
                })
                .collect(),
            has_license: true,
        }
    }
}
