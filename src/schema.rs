use anyhow::{Context, Result};
use declarative::Planned;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;
use std::sync::LazyLock;
use uuid::Uuid;

use crate::resource::{DesiredGroup, GroupState, RESOURCE_TYPE};

static NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9]+(?:-[a-zA-Z0-9]+)*$").expect("NAME_RE is a valid regex pattern")
});

static DISPLAY_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s](.*[^\s])?$").expect("DISPLAY_NAME_RE is a valid regex pattern")
});

static ADDRESS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9_-]+$").expect("ADDRESS_RE is a valid regex pattern")
});

const NAME_MAX: usize = 36;
const DISPLAY_NAME_MAX: usize = 64;

/// Whether `name` is a valid group or organization name
pub fn is_valid_name(name: &str) -> bool {
    (1..=NAME_MAX).contains(&name.chars().count()) && NAME_RE.is_match(name)
}

// ============================================================================
// Groups File
// ============================================================================

/// Desired groups, as written in `groups.toml`
///
/// ```toml
/// [groups.devs]
/// name = "devs"
/// display_name = "Developers"
/// members = ["1b4e28ba-2fa1-11d2-883f-0016d3cca427"]
/// ```
#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct GroupsFile {
    #[serde(default)]
    pub groups: BTreeMap<String, GroupConfig>,
}

impl GroupsFile {
    /// Load and parse a groups file without validating it
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read groups file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Invalid TOML in groups file: {}", path.display()))
    }

    /// Resource address of a group key ("devs" -> "group.devs")
    pub fn address(key: &str) -> String {
        format!("{RESOURCE_TYPE}.{key}")
    }

    /// Group key of a resource address, if the address is well-formed
    pub fn key_of(address: &str) -> Option<&str> {
        address
            .strip_prefix(RESOURCE_TYPE)
            .and_then(|rest| rest.strip_prefix('.'))
            .filter(|key| ADDRESS_RE.is_match(key))
    }

    /// Desired state of every group, keyed by resource address
    pub fn desired(&self) -> BTreeMap<String, DesiredGroup> {
        self.groups
            .iter()
            .map(|(key, group)| (Self::address(key), group.to_desired()))
            .collect()
    }

    /// Every validation problem, one message per problem
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        let mut seen: HashMap<(Option<Uuid>, &str), &str> = HashMap::new();

        for (key, group) in &self.groups {
            if !ADDRESS_RE.is_match(key) {
                problems.push(format!(
                    "{key:?}: address may only contain letters, digits, '-' and '_'"
                ));
            }
            for problem in group.problems() {
                problems.push(format!("{}: {problem}", Self::address(key)));
            }

            if let Some(other) = seen.insert((group.organization_id, group.name.as_str()), key) {
                problems.push(format!(
                    "{}: name {:?} is already used by {}",
                    Self::address(key),
                    group.name,
                    Self::address(other)
                ));
            }
        }

        problems
    }

    /// Fail with every problem if the file is invalid
    pub fn validate(&self) -> Result<()> {
        let problems = self.problems();
        if problems.is_empty() {
            return Ok(());
        }
        anyhow::bail!(
            "Groups file has {} problem(s):\n  {}",
            problems.len(),
            problems.join("\n  ")
        )
    }
}

// ============================================================================
// Group
// ============================================================================

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct GroupConfig {
    pub name: String,

    /// Defaults to the name on the server when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quota_allowance: Option<i32>,

    /// Defaults to the deployment's default organization
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<Uuid>,

    /// Unset leaves membership alone; an empty list removes everyone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub members: Option<Vec<Uuid>>,
}

impl GroupConfig {
    fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();

        let len = self.name.chars().count();
        if !(1..=NAME_MAX).contains(&len) {
            problems.push(format!("name must be 1-{NAME_MAX} characters, got {len}"));
        } else if !NAME_RE.is_match(&self.name) {
            problems.push(format!(
                "name {:?} must be alphanumeric words separated by single hyphens",
                self.name
            ));
        }

        if let Some(display_name) = &self.display_name {
            let len = display_name.chars().count();
            if !(1..=DISPLAY_NAME_MAX).contains(&len) {
                problems.push(format!(
                    "display_name must be 1-{DISPLAY_NAME_MAX} characters, got {len}"
                ));
            } else if !DISPLAY_NAME_RE.is_match(display_name) {
                problems.push(format!(
                    "display_name {display_name:?} must not start or end with whitespace"
                ));
            }
        }

        if let Some(quota) = self.quota_allowance
            && quota < 0
        {
            problems.push(format!("quota_allowance must not be negative, got {quota}"));
        }

        problems
    }

    /// Desired state for the controller
    pub fn to_desired(&self) -> DesiredGroup {
        DesiredGroup {
            display_name: Planned::from(self.display_name.clone()),
            avatar_url: self.avatar_url.clone().unwrap_or_default(),
            quota_allowance: self.quota_allowance.unwrap_or(0),
            organization_id: Planned::from(self.organization_id),
            members: self
                .members
                .as_ref()
                .map(|m| m.iter().copied().collect::<BTreeSet<_>>()),
            ..DesiredGroup::named(self.name.clone())
        }
    }

    /// Configuration that reproduces a recorded group
    ///
    /// Default values are left out so the result reads like hand-written
    /// configuration.
    pub fn from_state(state: &GroupState) -> Self {
        Self {
            name: state.name.clone(),
            display_name: (state.display_name != state.name).then(|| state.display_name.clone()),
            avatar_url: (!state.avatar_url.is_empty()).then(|| state.avatar_url.clone()),
            quota_allowance: (state.quota_allowance != 0).then_some(state.quota_allowance),
            organization_id: Some(state.organization_id),
            members: state
                .members
                .as_ref()
                .map(|m| m.iter().copied().collect()),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
