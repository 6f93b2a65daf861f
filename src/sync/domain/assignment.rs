//! Category-keyed default assignment buckets.

use super::{AssigneeId, DEFAULT_CATEGORY};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Named groups of default assignees keyed by task category.
///
/// Lookup never fails: an unknown category falls back to the
/// [`DEFAULT_CATEGORY`] bucket, and a missing fallback bucket resolves to no
/// assignees.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssignmentBuckets(BTreeMap<String, Vec<AssigneeId>>);

impl AssignmentBuckets {
    /// Creates an empty bucket map.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Creates a bucket map whose fallback bucket holds the given assignees.
    #[must_use]
    pub fn with_general(assignees: impl IntoIterator<Item = AssigneeId>) -> Self {
        Self::new().with_bucket(DEFAULT_CATEGORY, assignees)
    }

    /// Adds or replaces a bucket.
    #[must_use]
    pub fn with_bucket(
        mut self,
        category: impl Into<String>,
        assignees: impl IntoIterator<Item = AssigneeId>,
    ) -> Self {
        self.0.insert(category.into(), assignees.into_iter().collect());
        self
    }

    /// Adds the fallback bucket only when none is defined yet.
    #[must_use]
    pub fn or_general(mut self, assignees: impl IntoIterator<Item = AssigneeId>) -> Self {
        self.0
            .entry(DEFAULT_CATEGORY.to_owned())
            .or_insert_with(|| assignees.into_iter().collect());
        self
    }

    /// Returns the bucket for a category without any fallback.
    #[must_use]
    pub fn bucket(&self, category: &str) -> Option<&[AssigneeId]> {
        self.0.get(category).map(Vec::as_slice)
    }

    /// Resolves the assignees for a task.
    ///
    /// Explicit assignees always win; otherwise the category bucket is used,
    /// then the fallback bucket, then nothing.
    #[must_use]
    pub fn resolve(&self, explicit: &[AssigneeId], category: &str) -> Vec<AssigneeId> {
        if !explicit.is_empty() {
            return explicit.to_vec();
        }
        self.bucket(category)
            .or_else(|| self.bucket(DEFAULT_CATEGORY))
            .map(<[AssigneeId]>::to_vec)
            .unwrap_or_default()
    }
}
