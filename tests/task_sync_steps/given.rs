//! Given steps for task sync BDD scenarios.

use super::world::TaskSyncWorld;
use clickflow::sync::{
    adapters::memory::InMemoryStateStore,
    domain::{InternalId, RemoteId},
    ports::RemoteGatewayError,
};
use eyre::WrapErr;
use rstest_bdd_macros::given;

#[given("an empty sync state")]
fn empty_sync_state(world: &mut TaskSyncWorld) -> Result<(), eyre::Report> {
    world.install(InMemoryStateStore::new())
}

#[given(r#"the sync state maps "{internal_id}" to "{remote_id}""#)]
fn sync_state_maps(
    world: &mut TaskSyncWorld,
    internal_id: String,
    remote_id: String,
) -> Result<(), eyre::Report> {
    let entry = (
        InternalId::new(internal_id).wrap_err("internal id")?,
        RemoteId::new(remote_id).wrap_err("remote id")?,
    );
    let store = InMemoryStateStore::with_entries([entry]).wrap_err("seed state store")?;
    world.install(store)
}

#[given(r#"the remote service will assign id "{remote_id}""#)]
fn remote_will_assign(world: &mut TaskSyncWorld, remote_id: String) -> Result<(), eyre::Report> {
    world
        .gateway
        .queue_remote_ids([remote_id])
        .wrap_err("queue remote id")
}

#[given("the remote service rejects the next create")]
fn remote_rejects_create(world: &mut TaskSyncWorld) -> Result<(), eyre::Report> {
    world
        .gateway
        .fail_next_create(RemoteGatewayError::Rejected {
            status: 400,
            body: r#"{"err":"List not found","ECODE":"SUBCAT_016"}"#.to_owned(),
        })
        .wrap_err("inject create failure")
}
