//! Plan display - groupctl-specific UI

use colored::{ColoredString, Colorize};
use declarative::{Action, AttrValue, PlannedChange};

use crate::resource::{DesiredGroup, GroupState};

use super::planner::GroupPlan;

/// Attributes a create will set; computed values show as unknown
fn desired_attributes(desired: &DesiredGroup) -> Vec<(&'static str, AttrValue)> {
    let mut attrs = vec![
        ("name", AttrValue::Str(desired.name.clone())),
        (
            "display_name",
            desired
                .display_name
                .known()
                .map_or(AttrValue::Computed, |d| AttrValue::Str(d.clone())),
        ),
        ("avatar_url", AttrValue::Str(desired.avatar_url.clone())),
        ("quota_allowance", AttrValue::Int(desired.quota_allowance.into())),
        (
            "organization_id",
            desired
                .organization_id
                .known()
                .map_or(AttrValue::Computed, |id| AttrValue::Str(id.to_string())),
        ),
    ];
    if let Some(members) = &desired.members {
        attrs.push(("members", AttrValue::list(members)));
    }
    attrs
}

fn recorded_attributes(prior: &GroupState) -> Vec<(&'static str, AttrValue)> {
    vec![
        ("id", AttrValue::Str(prior.id.to_string())),
        ("name", AttrValue::Str(prior.name.clone())),
    ]
}

/// Plain-text lines describing one change
///
/// The first line names the address and action; the rest list attributes.
pub fn describe(change: &PlannedChange<DesiredGroup, GroupState>) -> Vec<String> {
    let mut lines = vec![format!(
        "{} {} ({})",
        change.action.symbol(),
        change.address,
        change.action
    )];

    match change.action {
        Action::NoOp => {}
        Action::Create => {
            if let Some(desired) = &change.desired {
                for (name, value) in desired_attributes(desired) {
                    lines.push(format!("    {name:<16} = {value}"));
                }
            }
        }
        Action::Delete => {
            if let Some(prior) = &change.prior {
                for (name, value) in recorded_attributes(prior) {
                    lines.push(format!("    {name:<16} = {value}"));
                }
            }
        }
        Action::Update | Action::Replace => {
            for attr in &change.changes {
                let note = if attr.forces_replacement {
                    " # forces replacement"
                } else {
                    ""
                };
                lines.push(format!(
                    "    {:<16} = {} → {}{note}",
                    attr.name, attr.from, attr.to
                ));
            }
        }
    }

    lines
}

/// One-line plan totals
pub fn summary_line(plan: &GroupPlan) -> String {
    format!(
        "Plan: {} to create, {} to update, {} to replace, {} to destroy.",
        plan.count(Action::Create),
        plan.count(Action::Update),
        plan.count(Action::Replace),
        plan.count(Action::Delete)
    )
}

fn paint(action: Action, text: &str) -> ColoredString {
    match action {
        Action::Create => text.green(),
        Action::Update => text.yellow(),
        Action::Replace => text.magenta(),
        Action::Delete => text.red(),
        Action::NoOp => text.dimmed(),
    }
}

/// Display a plan in a user-friendly format
pub fn display_plan(plan: &GroupPlan) {
    if plan.is_empty() {
        println!();
        println!("  {} No changes. Groups match the configuration.", "✓".green());
        return;
    }

    println!();
    println!(
        "┌─ {} ─────────────────────────────────────────┐",
        "Execution Plan".bold()
    );
    println!("│");

    for change in plan.pending() {
        let mut lines = describe(change).into_iter();
        if let Some(first) = lines.next() {
            println!("│ {}", paint(change.action, &first).bold());
        }
        for line in lines {
            println!("│ {}", line.dimmed());
        }
        println!("│");
    }

    println!("├─────────────────────────────────────────────────────┤");
    println!("│ {}", summary_line(plan).bold());
    println!("└─────────────────────────────────────────────────────┘");
}

#[cfg(test)]
mod tests {
    use super::*;
    use declarative::{AttrValue, AttributeChange, Planned};
    use std::collections::BTreeSet;
    use uuid::Uuid;

    fn change(
        action: Action,
        desired: Option<DesiredGroup>,
        prior: Option<GroupState>,
        changes: Vec<AttributeChange>,
    ) -> PlannedChange<DesiredGroup, GroupState> {
        PlannedChange {
            address: "group.devs".into(),
            action,
            desired,
            prior,
            changes,
        }
    }

    #[test]
    fn test_describe_create_shows_computed_values() {
        let desired = DesiredGroup {
            members: Some(BTreeSet::new()),
            ..DesiredGroup::named("devs")
        };
        let lines = describe(&change(Action::Create, Some(desired), None, vec![]));

        assert_eq!(lines[0], "+ group.devs (create)");
        assert!(lines.iter().any(|l| l.contains("display_name") && l.contains("(known after apply)")));
        assert!(lines.iter().any(|l| l.contains("members") && l.ends_with("[]")));
    }

    #[test]
    fn test_describe_replace_marks_forcing_attribute() {
        let changes = vec![
            AttributeChange::new(
                "organization_id",
                AttrValue::Str("a".into()),
                AttrValue::Str("b".into()),
            )
            .replacing(),
            AttributeChange::new("quota_allowance", AttrValue::Int(0), AttrValue::Int(5)),
        ];
        let lines = describe(&change(Action::Replace, None, None, changes));

        assert_eq!(lines[0], "-/+ group.devs (replace)");
        assert!(lines[1].contains("\"a\" → \"b\" # forces replacement"));
        assert!(lines[2].ends_with("0 → 5"));
    }

    #[test]
    fn test_describe_delete_shows_recorded_identity() {
        let prior = GroupState {
            id: Uuid::nil(),
            name: "devs".into(),
            display_name: "devs".into(),
            avatar_url: String::new(),
            quota_allowance: 0,
            organization_id: Uuid::nil(),
            members: None,
        };
        let lines = describe(&change(Action::Delete, None, Some(prior), vec![]));

        assert_eq!(lines[0], "- group.devs (destroy)");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_summary_line() {
        let mut plan = GroupPlan::new();
        plan.changes.push(change(
            Action::Create,
            Some(DesiredGroup {
                display_name: Planned::Known("Developers".into()),
                ..DesiredGroup::named("devs")
            }),
            None,
            vec![],
        ));
        plan.changes.push(change(Action::NoOp, None, None, vec![]));

        assert_eq!(
            summary_line(&plan),
            "Plan: 1 to create, 0 to update, 0 to replace, 0 to destroy."
        );
    }
}
