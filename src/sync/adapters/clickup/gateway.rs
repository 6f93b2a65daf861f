//! ClickUp REST gateway.

use crate::sync::{
    domain::{ListId, RemoteId, TaskPayload},
    ports::{RemoteGatewayError, RemoteGatewayResult, RemoteTaskGateway},
};
use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::AUTHORIZATION;
use serde::Deserialize;
use tracing::debug;

/// Public ClickUp API root.
pub const DEFAULT_API_BASE_URL: &str = "https://api.clickup.com/api/v2";

/// Web URL of a ClickUp task.
#[must_use]
pub fn task_url(remote_id: &RemoteId) -> String {
    format!("https://app.clickup.com/t/{remote_id}")
}

/// Gateway speaking the ClickUp v2 task API.
#[derive(Debug, Clone)]
pub struct ClickUpGateway {
    client: reqwest::Client,
    base_url: String,
    api_token: String,
}

#[derive(Debug, Deserialize)]
struct CreatedTask {
    id: String,
}

impl ClickUpGateway {
    /// Creates a gateway against the public API.
    #[must_use]
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: DEFAULT_API_BASE_URL.to_owned(),
            api_token: api_token.into().trim().to_owned(),
        }
    }

    /// Points the gateway at another API root.
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        base_url.trim_end_matches('/').clone_into(&mut self.base_url);
        self
    }

    /// Returns the API root in use.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        missing: Option<&RemoteId>,
    ) -> RemoteGatewayResult<String> {
        let response = request
            .header(AUTHORIZATION, self.api_token.as_str())
            .send()
            .await
            .map_err(RemoteGatewayError::transport)?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(RemoteGatewayError::transport)?;
        classify(status, body, missing)
    }
}

/// Maps an HTTP status onto the gateway outcome classes.
fn classify(
    status: StatusCode,
    body: String,
    missing: Option<&RemoteId>,
) -> RemoteGatewayResult<String> {
    if status.is_success() {
        return Ok(body);
    }
    match missing {
        Some(remote_id) if status == StatusCode::NOT_FOUND => {
            Err(RemoteGatewayError::NotFound(remote_id.clone()))
        }
        _ => Err(RemoteGatewayError::Rejected {
            status: status.as_u16(),
            body,
        }),
    }
}

#[async_trait]
impl RemoteTaskGateway for ClickUpGateway {
    async fn create(
        &self,
        list_id: &ListId,
        payload: &TaskPayload,
    ) -> RemoteGatewayResult<RemoteId> {
        let url = format!("{}/list/{}/task", self.base_url, list_id);
        debug!(url = %url, "POST create task");

        let body = self.send(self.client.post(&url).json(payload), None).await?;
        let created: CreatedTask = serde_json::from_str(&body)
            .map_err(|err| RemoteGatewayError::MalformedResponse(err.to_string()))?;
        RemoteId::new(created.id)
            .map_err(|err| RemoteGatewayError::MalformedResponse(err.to_string()))
    }

    async fn update(&self, remote_id: &RemoteId, payload: &TaskPayload) -> RemoteGatewayResult<()> {
        let url = format!("{}/task/{}", self.base_url, remote_id);
        debug!(url = %url, "PUT update task");

        self.send(self.client.put(&url).json(payload), Some(remote_id))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn remote_id() -> RemoteId {
        RemoteId::new("9ab").expect("valid remote id")
    }

    #[rstest]
    fn success_statuses_return_the_body() {
        let result = classify(StatusCode::OK, "{}".to_owned(), None);
        assert_eq!(result.expect("success"), "{}");
    }

    #[rstest]
    fn not_found_on_update_is_reported_as_missing_record() {
        let id = remote_id();
        let result = classify(StatusCode::NOT_FOUND, String::new(), Some(&id));
        assert!(matches!(result, Err(RemoteGatewayError::NotFound(found)) if found == id));
    }

    #[rstest]
    fn not_found_on_create_is_a_rejection() {
        let result = classify(StatusCode::NOT_FOUND, "no list".to_owned(), None);
        assert!(matches!(
            result,
            Err(RemoteGatewayError::Rejected { status: 404, ref body }) if body == "no list"
        ));
    }

    #[rstest]
    #[case(StatusCode::BAD_REQUEST)]
    #[case(StatusCode::UNAUTHORIZED)]
    #[case(StatusCode::INTERNAL_SERVER_ERROR)]
    fn other_failures_keep_the_raw_body(#[case] status: StatusCode) {
        let id = remote_id();
        let body = r#"{"err":"Oauth token not found","ECODE":"OAUTH_019"}"#;
        let result = classify(status, body.to_owned(), Some(&id));
        let Err(RemoteGatewayError::Rejected {
            status: code,
            body: raw,
        }) = result
        else {
            panic!("expected a rejection, got {result:?}");
        };
        assert_eq!(code, status.as_u16());
        assert_eq!(raw, body);
    }

    #[rstest]
    fn base_url_drops_trailing_slash() {
        let gateway = ClickUpGateway::new("pk_token").with_base_url("http://localhost:1234/");
        assert_eq!(gateway.base_url(), "http://localhost:1234");
    }

    #[rstest]
    fn task_url_points_at_the_web_app() {
        assert_eq!(task_url(&remote_id()), "https://app.clickup.com/t/9ab");
    }
}
