//! Default notifier that reports upserts through `tracing`.

use crate::sync::ports::{NotifierResult, UpsertEvent, UpsertNotifier};
use async_trait::async_trait;
use tracing::info;

/// Notifier used when no other channel is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingNotifier;

#[async_trait]
impl UpsertNotifier for LoggingNotifier {
    async fn notify(&self, event: &UpsertEvent) -> NotifierResult<()> {
        info!(
            action = %event.action,
            title = event.task.title(),
            internal_id = %event.task.internal_id(),
            remote_id = %event.remote_id,
            "{}: {} (internal: {}) -> remote: {}",
            event.action,
            event.task.title(),
            event.task.internal_id(),
            event.remote_id
        );
        Ok(())
    }
}
