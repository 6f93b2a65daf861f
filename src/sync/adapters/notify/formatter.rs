//! Message formatters for chat notifications.

use crate::sync::{
    adapters::clickup::task_url,
    domain::{AssigneeId, DEFAULT_CATEGORY, Priority, SyncAction},
    ports::{NotifierError, NotifierResult, UpsertEvent},
};
use minijinja::{Environment, context};
use serde::Deserialize;
use serde_json::{Value, json};
use std::collections::BTreeMap;

/// Renders an [`UpsertEvent`] into a webhook message body.
pub trait MessageFormatter: Send + Sync {
    /// Produces the JSON message for `event`.
    ///
    /// # Errors
    ///
    /// Returns [`NotifierError::Format`] when the message cannot be rendered.
    fn format(&self, event: &UpsertEvent) -> NotifierResult<Value>;
}

/// Display information for a remote user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Member {
    /// Display name.
    pub name: String,
    /// Department or team label.
    #[serde(default, alias = "dept")]
    pub department: Option<String>,
}

/// Lookup from remote user identifier to display information.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct MemberDirectory(BTreeMap<AssigneeId, Member>);

impl MemberDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Adds or replaces a member.
    #[must_use]
    pub fn with_member(mut self, id: AssigneeId, member: Member) -> Self {
        self.0.insert(id, member);
        self
    }

    /// Describes the given users, or returns `None` when there are none.
    #[must_use]
    pub fn describe(&self, assignees: &[AssigneeId]) -> Option<String> {
        if assignees.is_empty() {
            return None;
        }
        let described: Vec<String> = assignees
            .iter()
            .map(|id| match self.0.get(id) {
                Some(Member {
                    name,
                    department: Some(department),
                }) => format!("{name} [{department}]"),
                Some(Member { name, .. }) => name.clone(),
                None => format!("User ID: {id}"),
            })
            .collect();
        Some(described.join(", "))
    }
}

/// Slack Block Kit formatter used by default.
///
/// Fields without a value are left out of the message.
#[derive(Debug, Clone, Default)]
pub struct BlockKitFormatter {
    members: MemberDirectory,
}

impl BlockKitFormatter {
    /// Creates a formatter that names assignees through `members`.
    #[must_use]
    pub const fn new(members: MemberDirectory) -> Self {
        Self { members }
    }

    fn fields(&self, event: &UpsertEvent) -> Vec<Value> {
        let task = &event.task;
        let tags = (!task.tags().is_empty()).then(|| task.tags().join(", "));
        let category =
            (task.category() != DEFAULT_CATEGORY).then(|| task.category().to_owned());
        let entries = [
            ("Priority", task.priority().map(|p| p.label().to_owned())),
            ("Category", category),
            ("Tags", tags),
            ("Assignees", self.members.describe(&event.assignees)),
            ("Internal ID", Some(format!("`{}`", task.internal_id()))),
        ];

        entries
            .into_iter()
            .filter_map(|(label, value)| value.map(|text| (label, text)))
            .map(|(label, text)| json!({ "type": "mrkdwn", "text": format!("*{label}:*\n{text}") }))
            .collect()
    }
}

const fn action_icon(action: SyncAction) -> &'static str {
    match action {
        SyncAction::Created => ":new:",
        SyncAction::Updated => ":arrows_counterclockwise:",
    }
}

impl MessageFormatter for BlockKitFormatter {
    fn format(&self, event: &UpsertEvent) -> NotifierResult<Value> {
        let title = event.task.title();
        let action = event.action;
        Ok(json!({
            "text": format!("ClickUp {action}: {title}"),
            "blocks": [
                {
                    "type": "header",
                    "text": {
                        "type": "plain_text",
                        "text": format!("{} Task {action}", action_icon(action)),
                    },
                },
                {
                    "type": "section",
                    "text": { "type": "mrkdwn", "text": format!("*Title:* {title}") },
                },
                { "type": "section", "fields": self.fields(event) },
                {
                    "type": "actions",
                    "elements": [{
                        "type": "button",
                        "text": { "type": "plain_text", "text": "View Task" },
                        "url": task_url(&event.remote_id),
                        "style": "primary",
                    }],
                },
            ],
        }))
    }
}

/// Formatter that renders a user-supplied template into a text message.
///
/// Templates see `action`, `title`, `internal_id`, `remote_id`, `url`,
/// `category`, `priority`, `tags` and `synced_at`.
#[derive(Debug)]
pub struct TemplateFormatter {
    env: Environment<'static>,
}

const TEMPLATE_NAME: &str = "message";

impl TemplateFormatter {
    /// Compiles `source` once to reject syntax errors early.
    ///
    /// # Errors
    ///
    /// Returns [`NotifierError::Format`] when the template does not parse.
    pub fn new(source: impl Into<String>) -> NotifierResult<Self> {
        let mut env = Environment::new();
        env.add_template_owned(TEMPLATE_NAME, source.into())
            .map_err(|err| NotifierError::Format(err.to_string()))?;
        Ok(Self { env })
    }
}

impl MessageFormatter for TemplateFormatter {
    fn format(&self, event: &UpsertEvent) -> NotifierResult<Value> {
        let task = &event.task;
        let template = self
            .env
            .get_template(TEMPLATE_NAME)
            .map_err(|err| NotifierError::Format(err.to_string()))?;
        let text = template
            .render(context! {
                action => event.action.as_str(),
                title => task.title(),
                internal_id => task.internal_id().as_str(),
                remote_id => event.remote_id.as_str(),
                url => task_url(&event.remote_id),
                category => task.category(),
                priority => task.priority().map(Priority::label),
                tags => task.tags(),
                synced_at => event.synced_at.to_rfc3339(),
            })
            .map_err(|err| NotifierError::Format(err.to_string()))?;
        Ok(json!({ "text": text }))
    }
}
