use anyhow::Result;

use crate::Context;
use crate::engine::refresh_state;
use crate::progress;
use crate::ui;

use super::session::Session;

pub fn run(ctx: &Context) -> Result<()> {
    let session = Session::connect(ctx)?;
    let controller = session.controller();
    let mut state = super::load_state(ctx)?;

    if state.resources.is_empty() {
        ui::info("No groups recorded, nothing to refresh");
        return Ok(());
    }

    let spinner = if ctx.quiet {
        progress::hidden()
    } else {
        progress::spinner("Refreshing state...")
    };
    let report = refresh_state(&controller, &mut state);
    spinner.finish_and_clear();

    super::plan::report_refresh(&report);

    // Failed records stay as they were
    super::save_state(ctx, &mut state)?;

    if !report.is_success() {
        anyhow::bail!(
            "Could not refresh {}",
            ui::count(report.failed.len(), "group")
        );
    }

    ui::success(&format!(
        "Refreshed {}",
        ui::count(report.refreshed, "group")
    ));
    Ok(())
}
