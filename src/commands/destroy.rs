use anyhow::{Context as _, Result};
use declarative::{ExecuteOptions, execute};

use crate::Context;
use crate::engine::{self, BarProgress, PromptConfirm, destroy_plan, print_summary};
use crate::ui;

use super::session::Session;

/// Delete every recorded group matching `target`
///
/// Groups already deleted remotely count as destroyed.
pub fn run(ctx: &Context, target: Option<&str>, yes: bool) -> Result<()> {
    ui::header("Destroying Groups");

    let mut state = super::load_state(ctx)?;
    if state.resources.is_empty() {
        ui::info("No groups recorded, nothing to destroy");
        return Ok(());
    }

    let session = Session::connect(ctx)?;
    let controller = session.controller();

    let plan = destroy_plan(&controller, &state, target);
    engine::display_plan(&plan);
    if plan.is_empty() {
        return Ok(());
    }

    let mut progress = BarProgress::new(ctx.quiet);
    let mut confirm = PromptConfirm { yes };
    let report = execute(
        &controller,
        &plan,
        &ExecuteOptions::default(),
        &mut progress,
        &mut confirm,
    )?;

    if report.summary.total_changes() == 0 && report.summary.skipped > 0 && report.summary.failed == 0 {
        println!();
        ui::warn("Aborted");
        return Ok(());
    }

    state.apply_outcomes(&report.outcomes);
    super::save_state(ctx, &mut state).context("Groups were deleted but the state could not be saved")?;

    print_summary(&report.summary);

    if !report.summary.is_success() {
        anyhow::bail!(
            "{} could not be destroyed",
            ui::count(report.summary.failed, "group")
        );
    }
    Ok(())
}
