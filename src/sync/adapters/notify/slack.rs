//! Slack incoming-webhook notifier.

use super::formatter::{BlockKitFormatter, MemberDirectory, MessageFormatter};
use crate::sync::{
    adapters::clickup::task_url,
    domain::Priority,
    ports::{NotifierError, NotifierResult, UpsertEvent, UpsertNotifier},
};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info};

/// Upper bound on a single webhook request.
const SLACK_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Posts upsert notifications to a Slack webhook.
///
/// Without a webhook URL the rendered message is only logged as a local
/// preview.
#[derive(Debug, Clone)]
pub struct SlackNotifier<F = BlockKitFormatter> {
    client: reqwest::Client,
    webhook_url: Option<String>,
    members: MemberDirectory,
    formatter: F,
}

impl SlackNotifier<BlockKitFormatter> {
    /// Creates a notifier using the Block Kit formatter.
    #[must_use]
    pub fn new(webhook_url: Option<String>, members: MemberDirectory) -> Self {
        Self::with_formatter(webhook_url, members.clone(), BlockKitFormatter::new(members))
    }
}

impl<F: MessageFormatter> SlackNotifier<F> {
    /// Creates a notifier with a custom formatter.
    #[must_use]
    pub fn with_formatter(
        webhook_url: Option<String>,
        members: MemberDirectory,
        formatter: F,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            webhook_url: webhook_url.filter(|url| !url.trim().is_empty()),
            members,
            formatter,
        }
    }

    fn log_preview(&self, event: &UpsertEvent) {
        let task = &event.task;
        info!(
            time = %event.synced_at.format("%Y-%m-%d %H:%M:%S"),
            event = %event.action,
            title = task.title(),
            assignees = %self.members.describe(&event.assignees).unwrap_or_default(),
            priority = task.priority().map(Priority::label).unwrap_or_default(),
            tags = %task.tags().join(", "),
            url = %task_url(&event.remote_id),
            "Slack webhook not configured, local preview only"
        );
    }
}

#[async_trait]
impl<F: MessageFormatter> UpsertNotifier for SlackNotifier<F> {
    async fn notify(&self, event: &UpsertEvent) -> NotifierResult<()> {
        let message = self.formatter.format(event)?;
        let Some(url) = self.webhook_url.as_deref() else {
            self.log_preview(event);
            return Ok(());
        };

        debug!(remote_id = %event.remote_id, "Posting Slack notification");
        let response = self
            .client
            .post(url)
            .timeout(SLACK_REQUEST_TIMEOUT)
            .json(&message)
            .send()
            .await
            .map_err(NotifierError::delivery)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifierError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        info!(remote_id = %event.remote_id, action = %event.action, "Sent Slack notification");
        Ok(())
    }
}
