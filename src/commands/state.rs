use anyhow::Result;
use colored::Colorize;

use crate::Context;
use crate::cli::StateCommand;
use crate::ui;

pub fn run(ctx: &Context, cmd: StateCommand) -> Result<()> {
    match cmd {
        StateCommand::List => list(ctx),
        StateCommand::Show { address } => show(ctx, &address),
        StateCommand::Rm { address } => rm(ctx, &address),
    }
}

fn list(ctx: &Context) -> Result<()> {
    let state = super::load_state(ctx)?;

    if state.resources.is_empty() {
        ui::info("No groups recorded");
        return Ok(());
    }

    for (address, group) in &state.resources {
        let id = if ctx.verbose > 0 {
            group.id.to_string()
        } else {
            ui::short_id(&group.id)
        };
        let members = group.members.as_ref().map_or_else(
            || "members unmanaged".dimmed().to_string(),
            |m| ui::count(m.len(), "member"),
        );
        println!("  {:<24} {} {} {}", address.bold(), id.dimmed(), group.name, members);
    }
    Ok(())
}

fn show(ctx: &Context, address: &str) -> Result<()> {
    let state = super::load_state(ctx)?;
    let Some(group) = state.get(address) else {
        anyhow::bail!("{address} is not in the state");
    };

    ui::header(address);
    ui::kv("id", &group.id.to_string());
    ui::kv("name", &group.name);
    ui::kv("display_name", &group.display_name);
    ui::kv("avatar_url", &group.avatar_url);
    ui::kv("quota_allowance", &group.quota_allowance.to_string());
    ui::kv("organization_id", &group.organization_id.to_string());
    match &group.members {
        None => ui::kv("members", "(unmanaged)"),
        Some(members) if members.is_empty() => ui::kv("members", "(none)"),
        Some(members) => {
            ui::kv("members", &ui::count(members.len(), "member"));
            for member in members {
                ui::dim(&format!("  {member}"));
            }
        }
    }
    Ok(())
}

fn rm(ctx: &Context, address: &str) -> Result<()> {
    let mut state = super::load_state(ctx)?;
    let Some(group) = state.remove(address) else {
        anyhow::bail!("{address} is not in the state");
    };
    super::save_state(ctx, &mut state)?;

    ui::success(&format!(
        "Stopped managing {address} (group {} still exists remotely)",
        group.id
    ));
    Ok(())
}
