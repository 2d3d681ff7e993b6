//! Diff computation for resources
//!
//! Two kinds of diffs live here: set deltas (which members to add and which
//! to remove) and attribute changes (which scalar attributes differ between
//! desired and actual state).

use crate::types::AttrValue;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::hash::Hash;

/// Elements to add to and remove from a set to reach a desired set
///
/// `to_add` never contains an element of the current set and `to_remove`
/// never contains an element of the desired set, so the two are disjoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetDelta<T> {
    pub to_add: Vec<T>,
    pub to_remove: Vec<T>,
}

impl<T> SetDelta<T> {
    /// Check if the sets already match
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }

    /// Total number of elements touched
    pub fn len(&self) -> usize {
        self.to_add.len() + self.to_remove.len()
    }
}

impl<T> Default for SetDelta<T> {
    fn default() -> Self {
        Self {
            to_add: Vec::new(),
            to_remove: Vec::new(),
        }
    }
}

/// Compute the delta that turns `current` into `desired`
///
/// Runs in O(|current| + |desired|). Output order follows the order of the
/// inputs, so sorted inputs give sorted output. Duplicate input elements
/// are collapsed.
pub fn set_delta<'a, T, C, D>(current: C, desired: D) -> SetDelta<T>
where
    T: Eq + Hash + Clone + 'a,
    C: IntoIterator<Item = &'a T>,
    D: IntoIterator<Item = &'a T>,
{
    let current: Vec<&T> = current.into_iter().collect();
    let desired: Vec<&T> = desired.into_iter().collect();

    let current_set: HashSet<&T> = current.iter().copied().collect();
    let desired_set: HashSet<&T> = desired.iter().copied().collect();

    let mut seen = HashSet::with_capacity(desired.len());
    let to_add = desired
        .iter()
        .filter(|item| !current_set.contains(*item) && seen.insert(**item))
        .map(|item| (*item).clone())
        .collect();

    let mut seen = HashSet::with_capacity(current.len());
    let to_remove = current
        .iter()
        .filter(|item| !desired_set.contains(*item) && seen.insert(**item))
        .map(|item| (*item).clone())
        .collect();

    SetDelta { to_add, to_remove }
}

/// A single attribute that differs between actual and desired state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeChange {
    /// Attribute name
    pub name: String,
    /// Value currently recorded
    pub from: AttrValue,
    /// Value the apply will set
    pub to: AttrValue,
    /// Whether changing this attribute forces destroy + create
    pub forces_replacement: bool,
}

impl AttributeChange {
    pub fn new(name: impl Into<String>, from: AttrValue, to: AttrValue) -> Self {
        Self {
            name: name.into(),
            from,
            to,
            forces_replacement: false,
        }
    }

    /// Mark this change as requiring replacement
    pub fn replacing(mut self) -> Self {
        self.forces_replacement = true;
        self
    }
}

/// Collects attribute changes, skipping attributes that match
#[derive(Debug, Default)]
pub struct ChangeSet {
    changes: Vec<AttributeChange>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `name` if `from` and `to` differ
    pub fn compare(&mut self, name: &str, from: AttrValue, to: AttrValue) -> &mut Self {
        if from != to {
            self.changes.push(AttributeChange::new(name, from, to));
        }
        self
    }

    /// Record `name` as a replacing change if `from` and `to` differ
    pub fn compare_replacing(&mut self, name: &str, from: AttrValue, to: AttrValue) -> &mut Self {
        if from != to {
            self.changes
                .push(AttributeChange::new(name, from, to).replacing());
        }
        self
    }

    pub fn finish(&mut self) -> Vec<AttributeChange> {
        std::mem::take(&mut self.changes)
    }
}
