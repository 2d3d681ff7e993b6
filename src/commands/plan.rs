use anyhow::Result;

use crate::Context;
use crate::engine::{self, GroupPlan, RefreshReport, build_plan, refresh_state};
use crate::progress;
use crate::resource::GroupController;
use crate::schema::GroupsFile;
use crate::state::StateFile;
use crate::ui;

use super::session::Session;

pub fn run(ctx: &Context, target: Option<&str>) -> Result<()> {
    let groups = super::load_groups(ctx)?;
    let session = Session::connect(ctx)?;
    let controller = session.controller();
    let mut state = super::load_state(ctx)?;

    let plan = refreshed_plan(ctx, &controller, &groups, &mut state, target)?;
    engine::display_plan(&plan);
    Ok(())
}

/// Refresh `state` in place, then plan against it
///
/// Fails if any record could not be read, since planning against a stale
/// record could undo changes made since.
pub(super) fn refreshed_plan(
    ctx: &Context,
    controller: &GroupController<'_>,
    groups: &GroupsFile,
    state: &mut StateFile,
    target: Option<&str>,
) -> Result<GroupPlan> {
    let spinner = if ctx.quiet {
        progress::hidden()
    } else {
        progress::spinner("Refreshing state...")
    };
    let report = refresh_state(controller, state);
    spinner.finish_and_clear();

    report_refresh(&report);
    if !report.is_success() {
        anyhow::bail!(
            "Could not refresh {}",
            ui::count(report.failed.len(), "group")
        );
    }

    Ok(build_plan(controller, groups, state, target))
}

pub(super) fn report_refresh(report: &RefreshReport) {
    for address in &report.dropped {
        ui::warn(&format!(
            "{address} no longer exists remotely and was dropped from state"
        ));
    }
    for (address, error) in &report.failed {
        ui::error(&format!("{address}: {error}"));
    }
}
