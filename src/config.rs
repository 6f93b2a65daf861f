//! Runtime configuration for the sync engine and its adapters.
//!
//! Values are gathered by the binary from flags, the environment and an
//! optional `.env` file, then passed around explicitly.

use crate::sync::{
    adapters::notify::MemberDirectory,
    domain::{AssigneeId, AssignmentBuckets, ListId, TaskDomainError},
    services::EngineConfig,
};
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use thiserror::Error;

/// Errors raised while assembling configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An assignee list item is not a user identifier.
    #[error("invalid assignee id '{0}', expected an integer")]
    InvalidAssignee(String),

    /// A configured value failed domain validation.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// A referenced configuration file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// File path.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A referenced configuration file is not valid JSON of the expected
    /// shape.
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// File path.
        path: Utf8PathBuf,
        /// Parser diagnostic.
        #[source]
        source: serde_json::Error,
    },
}

/// Explicit configuration for one sync run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// ClickUp API token.
    pub api_token: String,
    /// ClickUp API root.
    pub api_base_url: String,
    /// List that receives new tasks by default.
    pub default_list_id: ListId,
    /// Assignees of the `general` bucket unless the buckets file defines it.
    pub default_assignees: Vec<AssigneeId>,
    /// Optional JSON file mapping category to assignee ids.
    pub buckets_path: Option<Utf8PathBuf>,
    /// State file location.
    pub state_path: Utf8PathBuf,
    /// Optional Slack incoming-webhook URL.
    pub slack_webhook_url: Option<String>,
    /// Optional minijinja template for Slack messages.
    pub slack_template: Option<String>,
    /// Optional JSON file mapping assignee id to member details.
    pub members_path: Option<Utf8PathBuf>,
}

impl SyncConfig {
    /// Builds the engine configuration, reading the buckets file if set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the buckets file cannot be read or
    /// parsed.
    pub fn engine_config(&self) -> Result<EngineConfig, ConfigError> {
        let buckets = match &self.buckets_path {
            Some(path) => read_json::<AssignmentBuckets>(path)?,
            None => AssignmentBuckets::new(),
        }
        .or_general(self.default_assignees.iter().copied());

        Ok(EngineConfig::new(self.default_list_id.clone()).with_buckets(buckets))
    }

    /// Loads the member directory, empty when no file is configured.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the members file cannot be read or
    /// parsed.
    pub fn member_directory(&self) -> Result<MemberDirectory, ConfigError> {
        self.members_path
            .as_deref()
            .map_or_else(|| Ok(MemberDirectory::new()), read_json)
    }

    /// Returns whether a Slack notifier should replace the logging default.
    #[must_use]
    pub const fn wants_slack(&self) -> bool {
        self.slack_webhook_url.is_some() || self.slack_template.is_some()
    }
}

/// Parses a comma-separated list of remote user identifiers.
///
/// Blank items are skipped.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidAssignee`] for items that are not unsigned
/// integers.
pub fn parse_assignee_list(raw: &str) -> Result<Vec<AssigneeId>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| {
            item.parse::<u64>()
                .map(AssigneeId::new)
                .map_err(|_| ConfigError::InvalidAssignee(item.to_owned()))
        })
        .collect()
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Utf8Path) -> Result<T, ConfigError> {
    let read_error = |source| ConfigError::Read {
        path: path.to_owned(),
        source,
    };
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let file_name = path.file_name().unwrap_or_default();
    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(read_error)?;
    let contents = dir.read_to_string(file_name).map_err(read_error)?;
    serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_owned(),
        source,
    })
}
