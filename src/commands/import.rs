use anyhow::{Context as _, Result};
use declarative::Lifecycle;
use std::collections::BTreeMap;

use crate::Context;
use crate::schema::{GroupConfig, GroupsFile};
use crate::ui;

use super::session::Session;

/// Start tracking an existing group under `address`
///
/// Membership of an imported group is unmanaged until the groups file
/// lists members for it.
pub fn run(ctx: &Context, address: &str, identifier: &str) -> Result<()> {
    let Some(key) = GroupsFile::key_of(address) else {
        anyhow::bail!("Invalid address {address:?}; expected group.<name>");
    };

    let mut state = super::load_state(ctx)?;
    if state.get(address).is_some() {
        anyhow::bail!("{address} is already managed; remove it with `groupctl state rm {address}` first");
    }

    let session = Session::connect(ctx)?;
    let controller = session.controller();

    let id = controller
        .import(identifier)
        .with_context(|| format!("Failed to import {identifier}"))?;
    if let Some(existing) = state.address_of(id) {
        anyhow::bail!("Group {id} is already managed as {existing}");
    }

    let imported = controller
        .read(&controller.imported_state(id))
        .with_context(|| format!("Failed to read group {id}"))?;

    let snippet = GroupsFile {
        groups: BTreeMap::from([(key.to_string(), GroupConfig::from_state(&imported))]),
    };

    state.set(address, imported);
    super::save_state(ctx, &mut state)?;

    ui::success(&format!("Imported {identifier} as {address}"));
    if !ctx.quiet {
        ui::section("Add this to your groups file:");
        println!();
        print!("{}", toml::to_string(&snippet).context("Failed to render group as TOML")?);
    }
    Ok(())
}
