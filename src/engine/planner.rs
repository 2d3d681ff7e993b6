//! Execution planner - refreshes recorded state and diffs it against config

use declarative::{ExecutionPlan, Lifecycle};
use std::collections::BTreeSet;

use crate::resource::{DesiredGroup, GroupController, GroupState};
use crate::schema::GroupsFile;
use crate::state::StateFile;

pub type GroupPlan = ExecutionPlan<DesiredGroup, GroupState>;

/// What a refresh did to the recorded state
#[derive(Debug, Default)]
pub struct RefreshReport {
    pub refreshed: usize,
    /// Addresses whose group no longer exists remotely
    pub dropped: Vec<String>,
    /// Addresses that could not be read, with the reason
    pub failed: Vec<(String, String)>,
}

impl RefreshReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Re-read every recorded group
///
/// Groups deleted out of band are dropped from the state, so the next plan
/// creates them again. Records that fail to read are kept as they were.
pub fn refresh_state(controller: &GroupController<'_>, state: &mut StateFile) -> RefreshReport {
    let mut report = RefreshReport::default();
    let addresses: Vec<String> = state.resources.keys().cloned().collect();

    for address in addresses {
        let Some(prior) = state.get(&address) else {
            continue;
        };

        match controller.read(prior) {
            Ok(fresh) => {
                state.set(address, fresh);
                report.refreshed += 1;
            }
            Err(e) if e.is_gone() => {
                log::warn!("{address} no longer exists remotely, dropping it from state");
                state.remove(&address);
                report.dropped.push(address);
            }
            Err(e) => {
                log::debug!("Failed to refresh {address}: {e}");
                report.failed.push((address, e.to_string()));
            }
        }
    }

    report
}

/// Plan every address found in the groups file or the state
///
/// Addresses only in the groups file are created, addresses only in the
/// state are destroyed. `target` narrows the plan to "group" or
/// "group.<key>".
pub fn build_plan(
    controller: &GroupController<'_>,
    groups: &GroupsFile,
    state: &StateFile,
    target: Option<&str>,
) -> GroupPlan {
    let mut desired = groups.desired();
    let addresses: BTreeSet<String> = desired
        .keys()
        .chain(state.resources.keys())
        .cloned()
        .collect();

    let mut plan = ExecutionPlan::new();
    for address in addresses {
        let wanted = desired.remove(&address);
        let recorded = state.get(&address).cloned();
        plan.add(controller, address, wanted, recorded);
    }

    plan.filter_by_target(target)
}

/// Plan destroying every recorded group
pub fn destroy_plan(
    controller: &GroupController<'_>,
    state: &StateFile,
    target: Option<&str>,
) -> GroupPlan {
    let mut plan = ExecutionPlan::new();
    for (address, recorded) in &state.resources {
        plan.add(controller, address.clone(), None, Some(recorded.clone()));
    }
    plan.filter_by_target(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use declarative::{Action, AllCapabilities};
    use groupkit::{Backend, MockBackend};
    use uuid::Uuid;

    fn groups(content: &str) -> GroupsFile {
        toml::from_str(content).unwrap()
    }

    #[test]
    fn test_plan_actions_per_address() {
        let mock = MockBackend::new();
        let org = mock.add_organization("coder", true).id;
        let controller = GroupController::new(&mock, &AllCapabilities, org);

        let kept = mock.seed_group(org, "ops", &[]);
        let renamed = mock.seed_group(org, "qa", &[]);
        let stale = mock.seed_group(org, "old", &[]);

        let mut state = StateFile::default();
        state.set("group.ops", GroupState::from_remote(&kept, false));
        state.set("group.qa", GroupState::from_remote(&renamed, false));
        state.set("group.old", GroupState::from_remote(&stale, false));

        let config = groups(
            r#"
            [groups.devs]
            name = "devs"

            [groups.ops]
            name = "ops"

            [groups.qa]
            name = "quality"
            "#,
        );

        let plan = build_plan(&controller, &config, &state, None);
        let actions: Vec<(&str, Action)> = plan
            .changes
            .iter()
            .map(|c| (c.address.as_str(), c.action))
            .collect();

        assert_eq!(
            actions,
            vec![
                ("group.devs", Action::Create),
                ("group.old", Action::Delete),
                ("group.ops", Action::NoOp),
                ("group.qa", Action::Update),
            ]
        );
        assert!(mock.calls().is_empty());
    }

    #[test]
    fn test_plan_organization_change_replaces() {
        let mock = MockBackend::new();
        let org = mock.add_organization("coder", true).id;
        let controller = GroupController::new(&mock, &AllCapabilities, org);
        let group = mock.seed_group(org, "devs", &[]);

        let mut state = StateFile::default();
        state.set("group.devs", GroupState::from_remote(&group, false));

        let config = groups(&format!(
            "[groups.devs]\nname = \"devs\"\norganization_id = \"{}\"\n",
            Uuid::new_v4()
        ));

        let plan = build_plan(&controller, &config, &state, None);
        assert_eq!(plan.count(Action::Replace), 1);
    }

    #[test]
    fn test_plan_target_filter() {
        let mock = MockBackend::new();
        let controller = GroupController::new(&mock, &AllCapabilities, Uuid::nil());
        let config = groups(
            r#"
            [groups.devs]
            name = "devs"

            [groups.ops]
            name = "ops"
            "#,
        );

        let plan = build_plan(&controller, &config, &StateFile::default(), Some("group.ops"));
        assert_eq!(plan.changes.len(), 1);
        assert_eq!(plan.changes[0].address, "group.ops");

        let plan = build_plan(&controller, &config, &StateFile::default(), Some("group"));
        assert_eq!(plan.changes.len(), 2);
    }

    #[test]
    fn test_refresh_drops_deleted_groups() {
        let mock = MockBackend::new();
        let org = mock.add_organization("coder", true).id;
        let controller = GroupController::new(&mock, &AllCapabilities, org);

        let live = mock.seed_group(org, "devs", &[]);
        let gone = mock.seed_group(org, "ops", &[]);

        let mut state = StateFile::default();
        state.set("group.devs", GroupState::from_remote(&live, false));
        state.set("group.ops", GroupState::from_remote(&gone, false));

        mock.remove_group(gone.id);
        mock.patch_group(
            live.id,
            &groupkit::PatchGroupRequest {
                quota_allowance: Some(7),
                ..Default::default()
            },
        )
        .unwrap();

        let report = refresh_state(&controller, &mut state);
        assert_eq!(report.refreshed, 1);
        assert_eq!(report.dropped, vec!["group.ops".to_string()]);
        assert!(report.is_success());
        assert_eq!(state.get("group.devs").map(|s| s.quota_allowance), Some(7));
        assert!(state.get("group.ops").is_none());
    }

    #[test]
    fn test_refresh_keeps_records_on_failure() {
        let mock = MockBackend::new();
        let org = mock.add_organization("coder", true).id;
        let controller = GroupController::new(&mock, &AllCapabilities, org);
        let group = mock.seed_group(org, "devs", &[]);

        let mut state = StateFile::default();
        state.set("group.devs", GroupState::from_remote(&group, false));
        mock.fail_on("group", 502, "bad gateway");

        let report = refresh_state(&controller, &mut state);
        assert!(!report.is_success());
        assert_eq!(report.failed.len(), 1);
        assert!(state.get("group.devs").is_some());
    }

    #[test]
    fn test_destroy_plan_deletes_everything_recorded() {
        let mock = MockBackend::new();
        let org = mock.add_organization("coder", true).id;
        let controller = GroupController::new(&mock, &AllCapabilities, org);

        let mut state = StateFile::default();
        for name in ["devs", "ops"] {
            let group = mock.seed_group(org, name, &[]);
            state.set(GroupsFile::address(name), GroupState::from_remote(&group, false));
        }

        let plan = destroy_plan(&controller, &state, None);
        assert_eq!(plan.count(Action::Delete), 2);

        let plan = destroy_plan(&controller, &state, Some("group.devs"));
        assert_eq!(plan.count(Action::Delete), 1);
    }
}
