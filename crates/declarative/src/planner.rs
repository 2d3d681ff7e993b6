//! Execution planner - decides what each resource needs

use crate::diff::AttributeChange;
use crate::resource::Lifecycle;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What the executor will do with one resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Already converged
    NoOp,
    /// Only in configuration
    Create,
    /// In both, differs in mutable attributes
    Update,
    /// In both, differs in an attribute that cannot change in place
    Replace,
    /// Only in state
    Delete,
}

impl Action {
    /// Plan symbol for display
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::NoOp => " ",
            Self::Create => "+",
            Self::Update => "~",
            Self::Replace => "-/+",
            Self::Delete => "-",
        }
    }

    /// Whether the action touches the remote side
    pub fn is_change(&self) -> bool {
        !matches!(self, Self::NoOp)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            Self::NoOp => "no-op",
            Self::Create => "create",
            Self::Update => "update in-place",
            Self::Replace => "replace",
            Self::Delete => "destroy",
        };
        f.write_str(verb)
    }
}

/// Decide the action for one resource address
pub fn plan_action<L: Lifecycle + ?Sized>(
    lifecycle: &L,
    desired: Option<&L::Config>,
    actual: Option<&L::State>,
) -> Action {
    match (desired, actual) {
        (None, None) => Action::NoOp,
        (Some(_), None) => Action::Create,
        (None, Some(_)) => Action::Delete,
        (Some(desired), Some(actual)) => {
            if lifecycle.requires_replace(desired, actual) {
                Action::Replace
            } else if lifecycle.changes(desired, actual).is_empty() {
                Action::NoOp
            } else {
                Action::Update
            }
        }
    }
}

/// One planned change for a single resource address
#[derive(Debug, Clone)]
pub struct PlannedChange<C, S> {
    /// Resource address ("group.devs")
    pub address: String,
    /// Chosen action
    pub action: Action,
    /// Desired snapshot, absent for deletes
    pub desired: Option<C>,
    /// Last observed snapshot, absent for creates
    pub prior: Option<S>,
    /// Attribute-level differences for display
    pub changes: Vec<AttributeChange>,
}

/// An execution plan: one change per resource address
pub struct ExecutionPlan<C, S> {
    pub changes: Vec<PlannedChange<C, S>>,
}

impl<C, S> ExecutionPlan<C, S> {
    /// Create a new empty plan
    pub fn new() -> Self {
        Self {
            changes: Vec::new(),
        }
    }

    /// Plan a resource and add it
    ///
    /// `desired` comes from configuration, `actual` from refreshed state.
    pub fn add<L>(&mut self, lifecycle: &L, address: String, desired: Option<C>, actual: Option<S>)
    where
        L: Lifecycle<Config = C, State = S> + ?Sized,
    {
        let action = plan_action(lifecycle, desired.as_ref(), actual.as_ref());
        let changes = match (&desired, &actual) {
            (Some(d), Some(a)) => lifecycle.changes(d, a),
            _ => Vec::new(),
        };

        self.changes.push(PlannedChange {
            address,
            action,
            desired,
            prior: actual,
            changes,
        });
    }

    /// Filter plan to only include changes matching a predicate
    pub fn filter<F>(self, predicate: F) -> Self
    where
        F: Fn(&PlannedChange<C, S>) -> bool,
    {
        Self {
            changes: self.changes.into_iter().filter(|c| predicate(c)).collect(),
        }
    }

    /// Filter plan to only include changes matching a target pattern
    ///
    /// Target format: "type" or "type.name"
    pub fn filter_by_target(self, target: Option<&str>) -> Self {
        match target {
            None => self,
            Some(t) => {
                let (resource_type, name) = parse_target(t);
                self.filter(|c| matches_target(&c.address, resource_type.as_deref(), name.as_deref()))
            }
        }
    }

    /// Changes that will touch the remote side
    pub fn pending(&self) -> impl Iterator<Item = &PlannedChange<C, S>> {
        self.changes.iter().filter(|c| c.action.is_change())
    }

    /// Number of changes per action
    pub fn count(&self, action: Action) -> usize {
        self.changes.iter().filter(|c| c.action == action).count()
    }

    /// Check if nothing needs to change
    pub fn is_empty(&self) -> bool {
        self.pending().next().is_none()
    }
}

impl<C, S> Default for ExecutionPlan<C, S> {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a target string like "type.name" into (type, name)
pub fn parse_target(target: &str) -> (Option<String>, Option<String>) {
    let parts: Vec<&str> = target.split('.').collect();
    match parts.len() {
        1 => (Some(parts[0].to_string()), None),
        2 => (Some(parts[0].to_string()), Some(parts[1].to_string())),
        _ => (None, Some(target.to_string())),
    }
}

/// Check if an address matches the filter criteria
pub fn matches_target(address: &str, resource_type: Option<&str>, name: Option<&str>) -> bool {
    let (addr_type, addr_name) = address.split_once('.').unwrap_or((address, ""));

    if let Some(rt) = resource_type
        && addr_type != rt
    {
        return false;
    }

    if let Some(n) = name
        && addr_name != n
    {
        return false;
    }

    true
}
