//! When steps for task sync BDD scenarios.

use super::world::{TaskSyncWorld, run_async};
use clickflow::sync::domain::TaskRecord;
use eyre::WrapErr;
use rstest_bdd_macros::when;

#[when(r#"the task "{internal_id}" titled "{title}" is synced"#)]
fn sync_task(
    world: &mut TaskSyncWorld,
    internal_id: String,
    title: String,
) -> Result<(), eyre::Report> {
    let task = TaskRecord::new(internal_id, title).wrap_err("build task record")?;
    let engine = world
        .engine
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing engine in scenario world"))?;
    let result = run_async(engine.upsert(&task));
    world.last_result = Some(result);
    Ok(())
}
