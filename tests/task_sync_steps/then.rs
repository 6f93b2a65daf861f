//! Then steps for task sync BDD scenarios.

use super::world::TaskSyncWorld;
use clickflow::sync::{adapters::memory::GatewayCall, domain::InternalId};
use eyre::WrapErr;
use rstest_bdd_macros::then;

#[then(r#"the sync reports remote id "{remote_id}""#)]
fn sync_reports_remote_id(world: &TaskSyncWorld, remote_id: String) -> Result<(), eyre::Report> {
    let result = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing sync result"))?;
    match result {
        Some(found) if found.as_str() == remote_id => Ok(()),
        other => Err(eyre::eyre!("expected remote id {remote_id}, got {other:?}")),
    }
}

#[then("the sync reports no result")]
fn sync_reports_no_result(world: &TaskSyncWorld) -> Result<(), eyre::Report> {
    match &world.last_result {
        Some(None) => Ok(()),
        other => Err(eyre::eyre!("expected no result, got {other:?}")),
    }
}

#[then(r#"the state maps "{internal_id}" to "{remote_id}""#)]
fn state_maps(
    world: &TaskSyncWorld,
    internal_id: String,
    remote_id: String,
) -> Result<(), eyre::Report> {
    let durable = world
        .durable
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing durable state"))?;
    let key = InternalId::new(internal_id).wrap_err("internal id")?;
    let entries = durable.entries().wrap_err("read durable state")?;
    match entries.get(&key) {
        Some(found) if found.as_str() == remote_id => Ok(()),
        other => Err(eyre::eyre!("expected {key} -> {remote_id}, found {other:?}")),
    }
}

#[then(r#"the state has no mapping for "{internal_id}""#)]
fn state_has_no_mapping(world: &TaskSyncWorld, internal_id: String) -> Result<(), eyre::Report> {
    let durable = world
        .durable
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing durable state"))?;
    let key = InternalId::new(internal_id).wrap_err("internal id")?;
    let entries = durable.entries().wrap_err("read durable state")?;
    eyre::ensure!(!entries.contains_key(&key), "unexpected mapping for {key}");
    Ok(())
}

#[then("the remote service received {creates:usize} create and {updates:usize} update")]
fn remote_received(
    world: &TaskSyncWorld,
    creates: usize,
    updates: usize,
) -> Result<(), eyre::Report> {
    let calls = world.gateway.calls().wrap_err("gateway calls")?;
    let created = calls
        .iter()
        .filter(|call| matches!(call, GatewayCall::Create { .. }))
        .count();
    let updated = calls.len() - created;
    eyre::ensure!(
        created == creates && updated == updates,
        "expected {creates} create(s) and {updates} update(s), got {calls:?}"
    );
    Ok(())
}
