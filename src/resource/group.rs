//! Group lifecycle against a Coder deployment
//!
//! [`GroupController`] is the only place that decides which remote calls a
//! group needs. Updates always diff against a fresh fetch, never against the
//! recorded state.

use declarative::{AttrValue, AttributeChange, CapabilityGate, ChangeSet, Lifecycle, Planned};
use groupkit::{Backend, CreateGroupRequest, FEATURE_TEMPLATE_RBAC, Group, PatchGroupRequest};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

use super::error::ReconcileError;
use super::import;
use super::members::{add_to_patch, member_set, membership_delta};

/// Resource type name used in addresses
pub const RESOURCE_TYPE: &str = "group";

/// Desired state of one group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredGroup {
    pub name: String,
    /// Unknown lets the server default it to the name
    pub display_name: Planned<String>,
    pub avatar_url: String,
    pub quota_allowance: i32,
    /// Unknown resolves to the default organization
    pub organization_id: Planned<Uuid>,
    /// `None` leaves membership unmanaged; `Some` (even empty) is exact
    pub members: Option<BTreeSet<Uuid>>,
}

impl DesiredGroup {
    /// Desired group with only a name; everything else defaults
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: Planned::Unknown,
            avatar_url: String::new(),
            quota_allowance: 0,
            organization_id: Planned::Unknown,
            members: None,
        }
    }
}

/// Last observed state of one group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupState {
    pub id: Uuid,
    pub name: String,
    pub display_name: String,
    pub avatar_url: String,
    pub quota_allowance: i32,
    pub organization_id: Uuid,
    /// Recorded only while membership is managed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub members: Option<BTreeSet<Uuid>>,
}

impl GroupState {
    /// Snapshot a remote group
    pub fn from_remote(group: &Group, managed_members: bool) -> Self {
        Self {
            id: group.id,
            name: group.name.clone(),
            display_name: group.display_name.clone(),
            avatar_url: group.avatar_url.clone(),
            quota_allowance: group.quota_allowance,
            organization_id: group.organization_id,
            members: managed_members.then(|| member_set(group)),
        }
    }
}

/// Reconciles [`DesiredGroup`]s through a [`Backend`]
pub struct GroupController<'a> {
    client: &'a dyn Backend,
    gate: &'a dyn CapabilityGate,
    default_organization_id: Uuid,
}

impl<'a> GroupController<'a> {
    pub fn new(
        client: &'a dyn Backend,
        gate: &'a dyn CapabilityGate,
        default_organization_id: Uuid,
    ) -> Self {
        Self {
            client,
            gate,
            default_organization_id,
        }
    }

    /// Fetch a group, mapping 404 to `EntityNotFound`
    fn fetch(&self, id: Uuid) -> Result<Group, ReconcileError> {
        self.client.group(id).map_err(|e| {
            if e.is_not_found() {
                ReconcileError::EntityNotFound {
                    identifier: id.to_string(),
                }
            } else {
                ReconcileError::remote("read group")(e)
            }
        })
    }

    fn check_entitled(&self) -> Result<(), ReconcileError> {
        if self.gate.is_enabled(FEATURE_TEMPLATE_RBAC) {
            Ok(())
        } else {
            Err(ReconcileError::EntitlementDenied {
                capability: FEATURE_TEMPLATE_RBAC,
            })
        }
    }
}

fn members_value(members: Option<&BTreeSet<Uuid>>) -> AttrValue {
    members.map_or(AttrValue::Null, AttrValue::list)
}

impl Lifecycle for GroupController<'_> {
    type Config = DesiredGroup;
    type State = GroupState;
    type Id = Uuid;
    type Error = ReconcileError;

    fn resource_type(&self) -> &'static str {
        RESOURCE_TYPE
    }

    fn create(&self, desired: &DesiredGroup) -> Result<GroupState, ReconcileError> {
        self.check_entitled()?;

        let organization_id = desired
            .organization_id
            .clone()
            .resolve_or(self.default_organization_id);
        let request = CreateGroupRequest {
            name: desired.name.clone(),
            display_name: desired.display_name.known().cloned().unwrap_or_default(),
            avatar_url: desired.avatar_url.clone(),
            quota_allowance: desired.quota_allowance,
        };

        log::info!("Creating group {:?} in organization {organization_id}", desired.name);
        let group = self
            .client
            .create_group(organization_id, &request)
            .map_err(ReconcileError::remote("create group"))?;

        let Some(members) = desired.members.as_ref().filter(|m| !m.is_empty()) else {
            return Ok(GroupState::from_remote(&group, desired.members.is_some()));
        };

        let patch = PatchGroupRequest {
            add_users: members.iter().map(Uuid::to_string).collect(),
            ..Default::default()
        };
        log::info!("Adding {} members to group {}", members.len(), group.id);
        match self.client.patch_group(group.id, &patch) {
            Ok(patched) => Ok(GroupState::from_remote(&patched, true)),
            Err(source) => {
                let mut state = GroupState::from_remote(&group, true);
                state.members = Some(BTreeSet::new());
                Err(ReconcileError::Incomplete {
                    state: Box::new(state),
                    source,
                })
            }
        }
    }

    fn read(&self, prior: &GroupState) -> Result<GroupState, ReconcileError> {
        let group = self.fetch(prior.id)?;
        if group.source.is_external() {
            log::warn!(
                "Group {} is now synchronised from {}; changes may be overwritten",
                group.id,
                group.source
            );
        }
        Ok(GroupState::from_remote(&group, prior.members.is_some()))
    }

    fn update(&self, desired: &DesiredGroup, prior: &GroupState) -> Result<GroupState, ReconcileError> {
        let current = self.fetch(prior.id)?;
        let mut patch = PatchGroupRequest::default();

        if let Some(members) = &desired.members {
            let delta = membership_delta(&current, members);
            log::debug!(
                "Group {}: {} members to add, {} to remove",
                current.id,
                delta.to_add.len(),
                delta.to_remove.len()
            );
            add_to_patch(&mut patch, &delta);
        }

        if desired.name != current.name {
            patch.name = Some(desired.name.clone());
        }
        if let Some(display_name) = desired.display_name.known()
            && *display_name != current.display_name
        {
            patch.display_name = Some(display_name.clone());
        }
        if desired.avatar_url != current.avatar_url {
            patch.avatar_url = Some(desired.avatar_url.clone());
        }
        if desired.quota_allowance != current.quota_allowance {
            patch.quota_allowance = Some(desired.quota_allowance);
        }

        let managed = desired.members.is_some();
        if patch.is_empty() {
            log::debug!("Group {} already converged", current.id);
            return Ok(GroupState::from_remote(&current, managed));
        }

        log::info!("Updating group {}", current.id);
        let patched = self
            .client
            .patch_group(current.id, &patch)
            .map_err(ReconcileError::remote("update group"))?;
        Ok(GroupState::from_remote(&patched, managed))
    }

    fn delete(&self, prior: &GroupState) -> Result<(), ReconcileError> {
        log::info!("Deleting group {}", prior.id);
        match self.client.delete_group(prior.id) {
            Ok(()) => Ok(()),
            Err(e) if e.is_not_found() => {
                log::warn!("Group {} was already deleted", prior.id);
                Ok(())
            }
            Err(e) => Err(ReconcileError::remote("delete group")(e)),
        }
    }

    fn import(&self, identifier: &str) -> Result<Uuid, ReconcileError> {
        let id = import::resolve(self.client, identifier)?;
        let group = self.fetch(id)?;
        if group.source.is_external() {
            return Err(ReconcileError::UnmanageableEntity {
                id,
                origin: group.source,
            });
        }
        Ok(id)
    }

    fn imported_state(&self, id: Uuid) -> GroupState {
        GroupState {
            id,
            name: String::new(),
            display_name: String::new(),
            avatar_url: String::new(),
            quota_allowance: 0,
            organization_id: Uuid::nil(),
            members: None,
        }
    }

    fn id_of(&self, state: &GroupState) -> Uuid {
        state.id
    }

    fn changes(&self, desired: &DesiredGroup, actual: &GroupState) -> Vec<AttributeChange> {
        let mut set = ChangeSet::new();
        set.compare(
            "name",
            AttrValue::Str(actual.name.clone()),
            AttrValue::Str(desired.name.clone()),
        );
        if let Some(display_name) = desired.display_name.known() {
            set.compare(
                "display_name",
                AttrValue::Str(actual.display_name.clone()),
                AttrValue::Str(display_name.clone()),
            );
        }
        set.compare(
            "avatar_url",
            AttrValue::Str(actual.avatar_url.clone()),
            AttrValue::Str(desired.avatar_url.clone()),
        )
        .compare(
            "quota_allowance",
            AttrValue::Int(actual.quota_allowance.into()),
            AttrValue::Int(desired.quota_allowance.into()),
        );
        if let Some(organization_id) = desired.organization_id.known() {
            set.compare_replacing(
                "organization_id",
                AttrValue::Str(actual.organization_id.to_string()),
                AttrValue::Str(organization_id.to_string()),
            );
        }
        if let Some(members) = &desired.members {
            set.compare(
                "members",
                members_value(actual.members.as_ref()),
                AttrValue::list(members),
            );
        }
        set.finish()
    }

    fn salvage(&self, error: &ReconcileError) -> Option<GroupState> {
        match error {
            ReconcileError::Incomplete { state, .. } => Some((**state).clone()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use declarative::{Action, ApplyResult, ExecutionPlan, StateUpdate, apply_change, plan_action};
    use groupkit::{GroupSource, MockBackend, MockCall};

    struct Fixture {
        mock: MockBackend,
        org: Uuid,
    }

    impl Fixture {
        fn new() -> Self {
            let mock = MockBackend::new();
            let org = mock.add_organization("coder", true).id;
            Self { mock, org }
        }

        fn controller<'a>(&'a self, gate: &'a dyn CapabilityGate) -> GroupController<'a> {
            GroupController::new(&self.mock, gate, self.org)
        }
    }

    fn entitled(capability: &str) -> bool {
        capability == FEATURE_TEMPLATE_RBAC
    }

    fn unentitled(_: &str) -> bool {
        false
    }

    fn set(ids: &[Uuid]) -> BTreeSet<Uuid> {
        ids.iter().copied().collect()
    }

    fn desired_for(group: &Group) -> DesiredGroup {
        DesiredGroup {
            name: group.name.clone(),
            display_name: Planned::Known(group.display_name.clone()),
            avatar_url: group.avatar_url.clone(),
            quota_allowance: group.quota_allowance,
            organization_id: Planned::Known(group.organization_id),
            members: None,
        }
    }

    #[test]
    fn test_create_without_entitlement_makes_no_calls() {
        let fx = Fixture::new();
        let controller = fx.controller(&unentitled);

        let err = controller.create(&DesiredGroup::named("devs")).unwrap_err();
        assert!(matches!(
            err,
            ReconcileError::EntitlementDenied {
                capability: FEATURE_TEMPLATE_RBAC
            }
        ));
        assert!(fx.mock.calls().is_empty());
    }

    #[test]
    fn test_create_with_members_patches_once() {
        let fx = Fixture::new();
        let controller = fx.controller(&entitled);
        let (u1, u2) = (Uuid::new_v4(), Uuid::new_v4());
        let desired = DesiredGroup {
            members: Some(set(&[u1, u2])),
            ..DesiredGroup::named("devs")
        };

        let state = controller.create(&desired).unwrap();

        let calls = fx.mock.calls();
        assert_eq!(calls.len(), 2);
        assert!(matches!(&calls[0], MockCall::CreateGroup { organization_id, .. } if *organization_id == fx.org));
        let MockCall::PatchGroup { id, request } = &calls[1] else {
            panic!("expected a patch, got {:?}", calls[1]);
        };
        assert_eq!(*id, state.id);
        let expected: Vec<String> = set(&[u1, u2]).iter().map(Uuid::to_string).collect();
        assert_eq!(request.add_users, expected);
        assert!(request.remove_users.is_empty());
        assert!(request.name.is_none());

        assert_eq!(state.members, Some(set(&[u1, u2])));
        assert_eq!(state.display_name, "devs");
        assert_eq!(state.organization_id, fx.org);
    }

    #[test]
    fn test_create_with_empty_members_skips_patch() {
        let fx = Fixture::new();
        let controller = fx.controller(&entitled);
        let desired = DesiredGroup {
            members: Some(BTreeSet::new()),
            ..DesiredGroup::named("devs")
        };

        let state = controller.create(&desired).unwrap();
        assert_eq!(fx.mock.calls().len(), 1);
        assert_eq!(state.members, Some(BTreeSet::new()));
    }

    #[test]
    fn test_create_unmanaged_members_records_none() {
        let fx = Fixture::new();
        let controller = fx.controller(&entitled);

        let state = controller.create(&DesiredGroup::named("devs")).unwrap();
        assert_eq!(state.members, None);
        assert_eq!(fx.mock.mutations().len(), 1);
    }

    #[test]
    fn test_create_uses_explicit_organization() {
        let fx = Fixture::new();
        let other = fx.mock.add_organization("acme", false).id;
        let controller = fx.controller(&entitled);
        let desired = DesiredGroup {
            organization_id: Planned::Known(other),
            ..DesiredGroup::named("devs")
        };

        let state = controller.create(&desired).unwrap();
        assert_eq!(state.organization_id, other);
    }

    #[test]
    fn test_failed_member_patch_is_incomplete_and_salvaged() {
        let fx = Fixture::new();
        fx.mock.fail_on("patch_group", 400, "bad user");
        let controller = fx.controller(&entitled);
        let desired = DesiredGroup {
            members: Some(set(&[Uuid::new_v4()])),
            ..DesiredGroup::named("devs")
        };

        let err = controller.create(&desired).unwrap_err();
        let salvaged = controller.salvage(&err).expect("created state is carried");
        assert_eq!(salvaged.name, "devs");
        assert_eq!(salvaged.members, Some(BTreeSet::new()));
        assert!(fx.mock.peek_group(salvaged.id).is_some());
    }

    #[test]
    fn test_incomplete_create_is_recorded_by_executor() {
        let fx = Fixture::new();
        fx.mock.fail_on("patch_group", 503, "unavailable");
        let controller = fx.controller(&entitled);
        let desired = DesiredGroup {
            members: Some(set(&[Uuid::new_v4()])),
            ..DesiredGroup::named("devs")
        };

        let mut plan = ExecutionPlan::new();
        plan.add(&controller, "group.devs".into(), Some(desired), None);
        let outcome = apply_change(&controller, &plan.changes[0]);

        assert!(matches!(outcome.result, ApplyResult::Failed { .. }));
        assert!(matches!(outcome.state, StateUpdate::Set(ref s) if s.name == "devs"));
    }

    #[test]
    fn test_update_sends_membership_delta() {
        let fx = Fixture::new();
        let (u1, u2, u3) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let group = fx.mock.seed_group(fx.org, "devs", &[u1, u2]);
        let controller = fx.controller(&entitled);
        let prior = GroupState::from_remote(&group, true);
        let desired = DesiredGroup {
            members: Some(set(&[u2, u3])),
            ..desired_for(&group)
        };

        let state = controller.update(&desired, &prior).unwrap();

        let mutations = fx.mock.mutations();
        assert_eq!(mutations.len(), 1);
        let MockCall::PatchGroup { request, .. } = &mutations[0] else {
            panic!("expected a patch");
        };
        assert_eq!(request.add_users, vec![u3.to_string()]);
        assert_eq!(request.remove_users, vec![u1.to_string()]);
        assert_eq!(state.members, Some(set(&[u2, u3])));
    }

    #[test]
    fn test_update_diffs_against_fresh_remote_state() {
        let fx = Fixture::new();
        let (u1, u2) = (Uuid::new_v4(), Uuid::new_v4());
        let group = fx.mock.seed_group(fx.org, "devs", &[u1]);
        let controller = fx.controller(&entitled);

        // Recorded state is stale: u2 was added out of band
        let prior = GroupState::from_remote(&group, true);
        fx.mock
            .patch_group(
                group.id,
                &PatchGroupRequest {
                    add_users: vec![u2.to_string()],
                    ..Default::default()
                },
            )
            .unwrap();
        fx.mock.clear_calls();

        let desired = DesiredGroup {
            members: Some(set(&[u1, u2])),
            ..desired_for(&group)
        };
        controller.update(&desired, &prior).unwrap();

        assert_eq!(fx.mock.calls(), vec![MockCall::Group(group.id)]);
    }

    #[test]
    fn test_update_unmanaged_members_omits_membership() {
        let fx = Fixture::new();
        let group = fx.mock.seed_group(fx.org, "devs", &[Uuid::new_v4()]);
        let controller = fx.controller(&entitled);
        let desired = DesiredGroup {
            quota_allowance: 50,
            display_name: Planned::Known("Developers".into()),
            ..desired_for(&group)
        };

        let state = controller
            .update(&desired, &GroupState::from_remote(&group, false))
            .unwrap();

        let mutations = fx.mock.mutations();
        let MockCall::PatchGroup { request, .. } = &mutations[0] else {
            panic!("expected a patch");
        };
        assert!(!request.changes_members());
        assert_eq!(request.quota_allowance, Some(50));
        assert_eq!(request.display_name.as_deref(), Some("Developers"));
        assert!(request.name.is_none());
        assert!(request.avatar_url.is_none());
        assert_eq!(state.members, None);
        assert_eq!(state.quota_allowance, 50);
    }

    #[test]
    fn test_update_unknown_display_name_is_left_alone() {
        let fx = Fixture::new();
        let group = fx.mock.seed_group(fx.org, "devs", &[]);
        let controller = fx.controller(&entitled);
        let desired = DesiredGroup {
            display_name: Planned::Unknown,
            ..desired_for(&group)
        };

        controller
            .update(&desired, &GroupState::from_remote(&group, false))
            .unwrap();
        assert!(fx.mock.mutations().is_empty());
    }

    #[test]
    fn test_read_refreshes_members_only_when_managed() {
        let fx = Fixture::new();
        let u1 = Uuid::new_v4();
        let group = fx.mock.seed_group(fx.org, "devs", &[u1]);
        let controller = fx.controller(&entitled);

        let unmanaged = controller
            .read(&GroupState::from_remote(&group, false))
            .unwrap();
        assert_eq!(unmanaged.members, None);

        let mut prior = GroupState::from_remote(&group, true);
        prior.members = Some(BTreeSet::new());
        let managed = controller.read(&prior).unwrap();
        assert_eq!(managed.members, Some(set(&[u1])));
    }

    #[test]
    fn test_read_missing_group_is_gone() {
        let fx = Fixture::new();
        let group = fx.mock.seed_group(fx.org, "devs", &[]);
        fx.mock.remove_group(group.id);
        let controller = fx.controller(&entitled);

        let err = controller
            .read(&GroupState::from_remote(&group, false))
            .unwrap_err();
        assert!(err.is_gone());
    }

    #[test]
    fn test_delete_tolerates_missing_group() {
        let fx = Fixture::new();
        let group = fx.mock.seed_group(fx.org, "devs", &[]);
        let controller = fx.controller(&entitled);
        let state = GroupState::from_remote(&group, false);

        controller.delete(&state).unwrap();
        assert!(fx.mock.peek_group(group.id).is_none());
        controller.delete(&state).unwrap();
    }

    #[test]
    fn test_delete_surfaces_other_failures() {
        let fx = Fixture::new();
        let group = fx.mock.seed_group(fx.org, "devs", &[]);
        fx.mock.fail_on("delete_group", 500, "boom");
        let controller = fx.controller(&entitled);

        let err = controller
            .delete(&GroupState::from_remote(&group, false))
            .unwrap_err();
        assert!(matches!(
            err,
            ReconcileError::RemoteOperationFailed {
                operation: "delete group",
                ..
            }
        ));
    }

    #[test]
    fn test_failed_create_records_nothing() {
        let fx = Fixture::new();
        fx.mock.fail_on("create_group", 503, "unavailable");
        let controller = fx.controller(&entitled);
        let desired = DesiredGroup {
            members: Some(set(&[Uuid::new_v4()])),
            ..DesiredGroup::named("devs")
        };

        let err = controller.create(&desired).unwrap_err();
        assert!(matches!(
            err,
            ReconcileError::RemoteOperationFailed {
                operation: "create group",
                ..
            }
        ));
        assert_eq!(fx.mock.calls().len(), 1);
        assert!(
            !fx.mock
                .calls()
                .iter()
                .any(|c| matches!(c, MockCall::PatchGroup { .. }))
        );
        assert!(controller.salvage(&err).is_none());
    }

    #[test]
    fn test_update_surfaces_patch_failure() {
        let fx = Fixture::new();
        let group = fx.mock.seed_group(fx.org, "devs", &[]);
        fx.mock.fail_on("patch_group", 500, "boom");
        let controller = fx.controller(&entitled);
        let desired = DesiredGroup {
            quota_allowance: 10,
            ..desired_for(&group)
        };

        let err = controller
            .update(&desired, &GroupState::from_remote(&group, false))
            .unwrap_err();
        assert!(matches!(
            err,
            ReconcileError::RemoteOperationFailed {
                operation: "update group",
                ..
            }
        ));
        assert_eq!(fx.mock.peek_group(group.id).map(|g| g.quota_allowance), Some(0));
    }

    #[test]
    fn test_read_surfaces_other_failures() {
        let fx = Fixture::new();
        let group = fx.mock.seed_group(fx.org, "devs", &[]);
        fx.mock.fail_on("group", 500, "boom");
        let controller = fx.controller(&entitled);

        let err = controller
            .read(&GroupState::from_remote(&group, false))
            .unwrap_err();
        assert!(matches!(
            err,
            ReconcileError::RemoteOperationFailed {
                operation: "read group",
                ..
            }
        ));
        assert!(!err.is_gone());
    }

    #[test]
    fn test_import_bare_uuid_fetches_only_the_group() {
        let fx = Fixture::new();
        let group = fx.mock.seed_group(fx.org, "devs", &[]);
        let controller = fx.controller(&entitled);

        let id = controller.import(&group.id.to_string()).unwrap();
        assert_eq!(id, group.id);
        assert_eq!(fx.mock.calls(), vec![MockCall::Group(group.id)]);

        let state = controller.read(&controller.imported_state(id)).unwrap();
        assert_eq!(state.name, "devs");
        assert_eq!(state.members, None);
    }

    #[test]
    fn test_import_rejects_external_group() {
        let fx = Fixture::new();
        let mut group = fx.mock.seed_group(fx.org, "okta-devs", &[]);
        group.source = GroupSource::Oidc;
        fx.mock.add_group(group.clone());
        let controller = fx.controller(&entitled);

        let err = controller.import("coder/okta-devs").unwrap_err();
        assert!(matches!(
            err,
            ReconcileError::UnmanageableEntity { id, origin: GroupSource::Oidc } if id == group.id
        ));
        assert!(fx.mock.mutations().is_empty());
    }

    #[test]
    fn test_changes_and_planned_actions() {
        let fx = Fixture::new();
        let u1 = Uuid::new_v4();
        let group = fx.mock.seed_group(fx.org, "devs", &[u1]);
        let controller = fx.controller(&entitled);
        let actual = GroupState::from_remote(&group, true);

        let same = DesiredGroup {
            members: Some(set(&[u1])),
            ..desired_for(&group)
        };
        assert!(controller.changes(&same, &actual).is_empty());
        assert_eq!(plan_action(&controller, Some(&same), Some(&actual)), Action::NoOp);

        let renamed = DesiredGroup {
            name: "developers".into(),
            ..same.clone()
        };
        let changes = controller.changes(&renamed, &actual);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].name, "name");
        assert_eq!(plan_action(&controller, Some(&renamed), Some(&actual)), Action::Update);

        let moved = DesiredGroup {
            organization_id: Planned::Known(Uuid::new_v4()),
            ..same
        };
        assert_eq!(plan_action(&controller, Some(&moved), Some(&actual)), Action::Replace);
    }

    #[test]
    fn test_newly_managed_members_show_as_change() {
        let fx = Fixture::new();
        let group = fx.mock.seed_group(fx.org, "devs", &[]);
        let controller = fx.controller(&entitled);
        let desired = DesiredGroup {
            members: Some(BTreeSet::new()),
            ..desired_for(&group)
        };

        let changes = controller.changes(&desired, &GroupState::from_remote(&group, false));
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].from, AttrValue::Null);
        assert_eq!(changes[0].to, AttrValue::List(vec![]));
    }
}
