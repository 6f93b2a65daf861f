//! End-to-end sync tests with the JSON state file.

use std::sync::Arc;

use camino::Utf8PathBuf;
use clickflow::sync::{
    adapters::{
        file::JsonFileStateStore,
        memory::{GatewayCall, InMemoryRemoteGateway},
    },
    domain::{ListId, TaskRecord},
    services::{EngineConfig, SyncEngine},
};
use eyre::WrapErr;
use mockable::DefaultClock;
use serde_json::json;

type FileEngine = SyncEngine<InMemoryRemoteGateway, JsonFileStateStore, DefaultClock>;

fn engine(gateway: &InMemoryRemoteGateway, path: &Utf8PathBuf) -> Result<FileEngine, eyre::Report> {
    let store = JsonFileStateStore::load(path).wrap_err("load state file")?;
    let list_id = ListId::new("900100").wrap_err("list id")?;
    Ok(SyncEngine::new(
        Arc::new(gateway.clone()),
        store,
        Arc::new(DefaultClock),
        EngineConfig::new(list_id),
    ))
}

fn read_state(path: &Utf8PathBuf) -> Result<serde_json::Value, eyre::Report> {
    let raw = std::fs::read_to_string(path).wrap_err("read state file")?;
    serde_json::from_str(&raw).wrap_err("parse state file")
}

#[tokio::test(flavor = "multi_thread")]
async fn order_is_created_once_and_updated_across_restarts() -> Result<(), eyre::Report> {
    let dir = tempfile::tempdir().wrap_err("temp dir")?;
    let path = Utf8PathBuf::from_path_buf(dir.path().join("sync_state.json"))
        .map_err(|_| eyre::eyre!("temp path is not utf-8"))?;
    let gateway = InMemoryRemoteGateway::new();
    gateway
        .queue_remote_ids(["9ab"])
        .wrap_err("queue remote ids")?;

    let first = engine(&gateway, &path)?;
    let created = first
        .upsert(&TaskRecord::new("order_101", "Ship order")?)
        .await
        .ok_or_else(|| eyre::eyre!("create failed"))?;
    eyre::ensure!(created.as_str() == "9ab", "unexpected remote id {created}");
    eyre::ensure!(
        read_state(&path)? == json!({ "order_101": "9ab" }),
        "state file does not hold the new mapping"
    );
    drop(first);

    let restarted = engine(&gateway, &path)?;
    let updated = restarted
        .upsert(&TaskRecord::new("order_101", "Ship order today")?)
        .await
        .ok_or_else(|| eyre::eyre!("update failed"))?;
    eyre::ensure!(updated == created, "update changed the remote id");
    eyre::ensure!(
        read_state(&path)? == json!({ "order_101": "9ab" }),
        "update changed the state file"
    );

    let calls = gateway.calls().wrap_err("gateway calls")?;
    eyre::ensure!(
        matches!(
            calls.as_slice(),
            [GatewayCall::Create { .. }, GatewayCall::Update { .. }]
        ),
        "expected create then update, got {calls:?}"
    );
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn stale_mapping_in_state_file_is_replaced() -> Result<(), eyre::Report> {
    let dir = tempfile::tempdir().wrap_err("temp dir")?;
    let path = Utf8PathBuf::from_path_buf(dir.path().join("sync_state.json"))
        .map_err(|_| eyre::eyre!("temp path is not utf-8"))?;
    std::fs::write(&path, r#"{"order_101": "deleted-remotely"}"#).wrap_err("seed state")?;
    let gateway = InMemoryRemoteGateway::new();
    gateway
        .queue_remote_ids(["fresh"])
        .wrap_err("queue remote ids")?;

    let engine = engine(&gateway, &path)?;
    let remote_id = engine
        .upsert(&TaskRecord::new("order_101", "Ship order")?)
        .await
        .ok_or_else(|| eyre::eyre!("stale repair failed"))?;

    eyre::ensure!(remote_id.as_str() == "fresh", "unexpected remote id {remote_id}");
    eyre::ensure!(
        read_state(&path)? == json!({ "order_101": "fresh" }),
        "state file still holds the stale mapping"
    );
    Ok(())
}
