//! Collection state held by the task store and mirrored to storage.

use serde::{Deserialize, Serialize};

use crate::task::{Task, TaskId};

/// Default cache freshness window: 5 minutes, in milliseconds.
pub const DEFAULT_CACHE_EXPIRES_IN_MS: u64 = 5 * 60 * 1000;

/// Status of the most recent bulk (fetch / set) operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    /// Nothing has been loaded yet.
    #[default]
    Idle,
    /// A fetch is in flight.
    Loading,
    /// The last bulk operation succeeded.
    Succeeded,
    /// The last fetch failed; `TasksState::error` carries the message.
    Failed,
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Loading => write!(f, "loading"),
            Self::Succeeded => write!(f, "succeeded"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Freshness record for the last successful full fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheRecord {
    /// Milliseconds since epoch of the last successful fetch (0 = never).
    pub timestamp: u64,
    /// Freshness window in milliseconds.
    pub expires_in: u64,
}

impl Default for CacheRecord {
    fn default() -> Self {
        Self {
            timestamp: 0,
            expires_in: DEFAULT_CACHE_EXPIRES_IN_MS,
        }
    }
}

/// The task collection plus request bookkeeping.
///
/// `error` is `Some` exactly when `status` is [`RequestStatus::Failed`].
/// Per-item mutations never change `status`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TasksState {
    /// Tasks in insertion order.
    pub items: Vec<Task>,
    /// Status of the last bulk operation.
    pub status: RequestStatus,
    /// Failure message of the last fetch, if it failed.
    pub error: Option<String>,
    /// Cache freshness record.
    pub cache: CacheRecord,
}

impl TasksState {
    /// Creates an empty state with a custom cache window.
    #[must_use]
    pub fn with_expires_in(expires_in: u64) -> Self {
        Self {
            cache: CacheRecord {
                timestamp: 0,
                expires_in,
            },
            ..Self::default()
        }
    }

    /// Looks up a task by ID.
    #[must_use]
    pub fn find(&self, id: &TaskId) -> Option<&Task> {
        self.items.iter().find(|t| &t.id == id)
    }

    /// Returns the position of a task in the collection.
    #[must_use]
    pub fn position(&self, id: &TaskId) -> Option<usize> {
        self.items.iter().position(|t| &t.id == id)
    }
}
