//! Task record mirrored to the remote service.

use super::{AssigneeId, InternalId, ListId, Priority, TaskDomainError};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Category used when the caller does not choose one.
pub const DEFAULT_CATEGORY: &str = "general";

/// One unit of work to be mirrored remotely.
///
/// Construct with [`TaskRecord::new`] and refine with the `with_*` methods.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskRecord {
    internal_id: InternalId,
    title: String,
    description: String,
    status: Option<String>,
    priority: Option<Priority>,
    tags: Vec<String>,
    category: String,
    target_list_id: Option<ListId>,
    assignees: Vec<AssigneeId>,
    due_date: Option<i64>,
    custom_fields: BTreeMap<String, Value>,
}

impl TaskRecord {
    /// Creates a task record with the required fields.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyInternalId`] or
    /// [`TaskDomainError::EmptyTitle`] when either value is blank.
    pub fn new(
        internal_id: impl Into<String>,
        title: impl Into<String>,
    ) -> Result<Self, TaskDomainError> {
        let id = InternalId::new(internal_id)?;
        let raw_title = title.into();
        if raw_title.trim().is_empty() {
            return Err(TaskDomainError::EmptyTitle);
        }

        Ok(Self {
            internal_id: id,
            title: raw_title,
            description: String::new(),
            status: None,
            priority: None,
            tags: Vec::new(),
            category: DEFAULT_CATEGORY.to_owned(),
            target_list_id: None,
            assignees: Vec::new(),
            due_date: None,
            custom_fields: BTreeMap::new(),
        })
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the remote status label.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets the tags, preserving their order.
    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = String>) -> Self {
        self.tags = tags.into_iter().collect();
        self
    }

    /// Sets the assignment category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Overrides the engine's default destination list.
    #[must_use]
    pub fn with_target_list(mut self, list_id: ListId) -> Self {
        self.target_list_id = Some(list_id);
        self
    }

    /// Sets explicit assignees, which take precedence over category buckets.
    #[must_use]
    pub fn with_assignees(mut self, assignees: impl IntoIterator<Item = AssigneeId>) -> Self {
        self.assignees = assignees.into_iter().collect();
        self
    }

    /// Sets the due date in the remote service's timestamp unit.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: i64) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Adds a custom field value keyed by remote field identifier.
    #[must_use]
    pub fn with_custom_field(mut self, field_id: impl Into<String>, value: Value) -> Self {
        self.custom_fields.insert(field_id.into(), value);
        self
    }

    /// Returns the internal identifier.
    #[must_use]
    pub const fn internal_id(&self) -> &InternalId {
        &self.internal_id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description, empty when unset.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the remote status label, if any.
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Returns the priority, if any.
    #[must_use]
    pub const fn priority(&self) -> Option<Priority> {
        self.priority
    }

    /// Returns the tags in insertion order.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Returns the assignment category.
    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Returns the destination list override, if any.
    #[must_use]
    pub const fn target_list_id(&self) -> Option<&ListId> {
        self.target_list_id.as_ref()
    }

    /// Returns the explicit assignees.
    #[must_use]
    pub fn assignees(&self) -> &[AssigneeId] {
        &self.assignees
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<i64> {
        self.due_date
    }

    /// Returns custom field values keyed by remote field identifier.
    #[must_use]
    pub const fn custom_fields(&self) -> &BTreeMap<String, Value> {
        &self.custom_fields
    }
}

/// Remote side effect performed by a successful upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncAction {
    /// A new remote record was created.
    Created,
    /// An existing remote record was updated.
    Updated,
}

impl SyncAction {
    /// Returns the canonical display form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "CREATED",
            Self::Updated => "UPDATED",
        }
    }
}

impl fmt::Display for SyncAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
