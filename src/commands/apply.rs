use anyhow::{Context as _, Result};
use declarative::{ExecuteOptions, execute};

use crate::Context;
use crate::cli::ApplyArgs;
use crate::engine::{self, BarProgress, PromptConfirm, print_summary};
use crate::ui;

use super::session::Session;

pub fn run(ctx: &Context, args: &ApplyArgs) -> Result<()> {
    ui::header("Applying Groups");

    let groups = super::load_groups(ctx)?;
    let session = Session::connect(ctx)?;
    let controller = session.controller();
    let mut state = super::load_state(ctx)?;

    let plan = super::plan::refreshed_plan(
        ctx,
        &controller,
        &groups,
        &mut state,
        args.target.as_deref(),
    )?;
    engine::display_plan(&plan);

    if plan.is_empty() {
        // Keep records dropped by the refresh
        super::save_state(ctx, &mut state)?;
        return Ok(());
    }

    let opts = ExecuteOptions {
        dry_run: args.dry_run,
        jobs: usize::from(args.jobs),
    };
    let mut progress = BarProgress::new(ctx.quiet);
    let mut confirm = PromptConfirm { yes: args.yes };

    let report = execute(&controller, &plan, &opts, &mut progress, &mut confirm)?;

    if args.dry_run {
        println!();
        ui::info("Dry run - no changes made");
        return Ok(());
    }

    if report.summary.total_changes() == 0 && report.summary.skipped > 0 && report.summary.failed == 0 {
        println!();
        ui::warn("Aborted");
        return Ok(());
    }

    let recorded = state.apply_outcomes(&report.outcomes);
    super::save_state(ctx, &mut state).context("Groups were changed but the state could not be saved")?;
    log::debug!("Recorded {recorded} state updates");

    print_summary(&report.summary);

    if !report.summary.is_success() {
        anyhow::bail!(
            "{} could not be applied",
            ui::count(report.summary.failed, "group")
        );
    }
    Ok(())
}
