use anyhow::Result;

use crate::Context;
use crate::schema::GroupsFile;
use crate::ui;

pub fn run(ctx: &Context) -> Result<()> {
    let path = ctx.groups_path();
    let groups = GroupsFile::load(&path)?;

    let problems = groups.problems();
    if !problems.is_empty() {
        for problem in &problems {
            ui::error(problem);
        }
        anyhow::bail!(
            "{} has {}",
            path.display(),
            ui::count(problems.len(), "problem")
        );
    }

    ui::success(&format!(
        "{} is valid ({})",
        path.display(),
        ui::count(groups.groups.len(), "group")
    ));
    Ok(())
}
