//! Command implementations

use anyhow::Result;

use crate::Context;
use crate::schema::GroupsFile;
use crate::state::StateFile;

pub mod apply;
pub mod destroy;
pub mod import;
pub mod plan;
pub mod refresh;
pub mod session;
pub mod state;
pub mod validate;

/// Load the groups file and reject it before any remote call if invalid
fn load_groups(ctx: &Context) -> Result<GroupsFile> {
    let groups = GroupsFile::load(&ctx.groups_path())?;
    groups.validate()?;
    Ok(groups)
}

fn load_state(ctx: &Context) -> Result<StateFile> {
    StateFile::load(&ctx.state_path()?)
}

fn save_state(ctx: &Context, state: &mut StateFile) -> Result<()> {
    state.save(&ctx.state_path()?)
}
