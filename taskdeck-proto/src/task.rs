//! Task records and their identifiers.
//!
//! A [`Task`] is the unit of work shown in the list view. Its `id` is an
//! opaque string: freshly created tasks get a UUID v7 string, while seeded
//! tasks from the mock backend use short numeric IDs. `created_at` is set
//! exactly once, when the task is built, and updates carry it forward.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque unique identifier for a task.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Generates a fresh, time-ordered identifier (UUID v7 string).
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Wraps an existing identifier string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Input for creating a task: everything the caller chooses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDraft {
    /// Task title.
    pub title: String,
    /// Longer free-form description.
    pub description: String,
}

impl TaskDraft {
    /// Creates a draft from a title and description.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

/// A task in the collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique task identifier.
    pub id: TaskId,
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: String,
    /// Whether the task has been completed.
    pub completed: bool,
    /// Creation time. Immutable once assigned.
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Builds a new, open task from a draft with a fresh ID and the
    /// current time as `created_at`.
    #[must_use]
    pub fn from_draft(draft: TaskDraft) -> Self {
        Self {
            id: TaskId::generate(),
            title: draft.title,
            description: draft.description,
            completed: false,
            created_at: Utc::now(),
        }
    }

    /// Returns a copy with `completed` flipped and every other field kept.
    #[must_use]
    pub fn toggled(&self) -> Self {
        Self {
            completed: !self.completed,
            ..self.clone()
        }
    }
}
