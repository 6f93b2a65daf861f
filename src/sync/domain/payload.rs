//! Outbound request body for remote create and update calls.

use super::{AssigneeId, Priority, TaskRecord};
use serde::Serialize;
use serde_json::Value;

/// Custom field value as the remote API expects it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomFieldValue {
    /// Remote custom field identifier.
    pub id: String,
    /// Field value.
    pub value: Value,
}

/// Fields sent to the remote service for one task.
///
/// Absent or empty fields are omitted from the serialized body so an update
/// never blanks out data on the remote record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskPayload {
    name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    description: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    assignees: Vec<AssigneeId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    priority: Option<Priority>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    due_date: Option<i64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    custom_fields: Vec<CustomFieldValue>,
}

impl TaskPayload {
    /// Builds the payload for a task with already resolved assignees.
    #[must_use]
    pub fn build(task: &TaskRecord, assignees: Vec<AssigneeId>) -> Self {
        Self {
            name: task.title().to_owned(),
            description: task.description().to_owned(),
            assignees,
            status: task.status().map(str::to_owned),
            priority: task.priority(),
            tags: task.tags().to_vec(),
            due_date: task.due_date(),
            custom_fields: task
                .custom_fields()
                .iter()
                .map(|(id, value)| CustomFieldValue {
                    id: id.clone(),
                    value: value.clone(),
                })
                .collect(),
        }
    }

    /// Returns the task name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the resolved assignees.
    #[must_use]
    pub fn assignees(&self) -> &[AssigneeId] {
        &self.assignees
    }
}
