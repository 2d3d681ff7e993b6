use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use declarative::{ChangeOutcome, StateUpdate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::resource::GroupState;

/// Current state file format
const FORMAT_VERSION: u32 = 1;

// ============================================================================
// State Structures
// ============================================================================

/// Last observed state of every managed group, keyed by resource address
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StateFile {
    /// File format version
    pub version: u32,

    /// Incremented on every save
    #[serde(default)]
    pub serial: u64,

    /// Last time the state was saved
    pub last_updated: DateTime<Utc>,

    /// One record per address ("group.devs")
    #[serde(default)]
    pub resources: BTreeMap<String, GroupState>,
}

impl Default for StateFile {
    fn default() -> Self {
        Self {
            version: FORMAT_VERSION,
            serial: 0,
            last_updated: Utc::now(),
            resources: BTreeMap::new(),
        }
    }
}

impl StateFile {
    /// Load state from disk, or return an empty state if the file doesn't exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("State file does not exist, using empty state");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read state file: {}", path.display()))?;

        let state: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse state file: {}", path.display()))?;

        if state.version > FORMAT_VERSION {
            anyhow::bail!(
                "State file {} has format version {}, this groupctl understands up to {}",
                path.display(),
                state.version,
                FORMAT_VERSION
            );
        }

        log::debug!(
            "Loaded {} records (serial {}) from {}",
            state.resources.len(),
            state.serial,
            path.display()
        );
        Ok(state)
    }

    /// Save state to disk, bumping the serial
    ///
    /// Writes a sibling temp file and renames it over the old state, so an
    /// interrupted save never leaves a truncated file behind.
    pub fn save(&mut self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create state directory: {}", dir.display()))?;
        }

        self.serial += 1;
        self.last_updated = Utc::now();

        let content =
            serde_json::to_string_pretty(&self).context("Failed to serialize state to JSON")?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, content + "\n")
            .with_context(|| format!("Failed to write state file: {}", tmp.display()))?;
        fs::rename(&tmp, path)
            .with_context(|| format!("Failed to replace state file: {}", path.display()))?;

        log::debug!("Saved state (serial {}) to {}", self.serial, path.display());
        Ok(())
    }

    pub fn get(&self, address: &str) -> Option<&GroupState> {
        self.resources.get(address)
    }

    pub fn set(&mut self, address: impl Into<String>, state: GroupState) {
        self.resources.insert(address.into(), state);
    }

    pub fn remove(&mut self, address: &str) -> Option<GroupState> {
        self.resources.remove(address)
    }

    /// Address already tracking the group with this ID, if any
    pub fn address_of(&self, id: uuid::Uuid) -> Option<&str> {
        self.resources
            .iter()
            .find(|(_, s)| s.id == id)
            .map(|(address, _)| address.as_str())
    }

    /// Record the state updates of an execution
    ///
    /// Returns how many records changed.
    pub fn apply_outcomes(&mut self, outcomes: &[ChangeOutcome<GroupState>]) -> usize {
        let mut changed = 0;
        for outcome in outcomes {
            match &outcome.state {
                StateUpdate::Unchanged => {}
                StateUpdate::Set(state) => {
                    self.set(outcome.address.clone(), state.clone());
                    changed += 1;
                }
                StateUpdate::Remove => {
                    if self.remove(&outcome.address).is_some() {
                        changed += 1;
                    }
                }
            }
        }
        changed
    }
}

// ============================================================================
// Tests
// ============================================================================
