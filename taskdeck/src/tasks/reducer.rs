//! Pure state transitions for the task collection.

use std::time::{SystemTime, UNIX_EPOCH};

use taskdeck_proto::state::{RequestStatus, TasksState};
use taskdeck_proto::task::{Task, TaskId};

/// A state transition, one per observable phase of a store operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskAction {
    /// A fetch went to the backend.
    FetchPending,
    /// A fetch was answered from the in-memory collection.
    FetchCacheHit,
    /// A fetch returned a fresh collection at `fetched_at` (ms since epoch).
    FetchFulfilled {
        /// The collection returned by the backend.
        items: Vec<Task>,
        /// When the response was applied.
        fetched_at: u64,
    },
    /// A fetch failed.
    FetchRejected {
        /// Failure message shown to the user.
        message: String,
    },
    /// A created task was echoed by the backend.
    Added(Task),
    /// An edited task was echoed by the backend.
    Updated(Task),
    /// A deletion was confirmed by the backend.
    Deleted(TaskId),
    /// The collection was replaced directly (hydration from storage).
    SetTasks(Vec<Task>),
}

/// Returns the current timestamp in milliseconds since epoch.
#[must_use]
pub fn now_ms() -> u64 {
    u64::try_from(
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis(),
    )
    .unwrap_or(u64::MAX)
}

/// Whether a fetch at `now` may be served from memory.
///
/// True when the collection is non-empty and the last successful fetch is
/// younger than the cache window. A timestamp in the future counts as
/// fresh.
#[must_use]
pub fn is_cache_fresh(state: &TasksState, now: u64) -> bool {
    !state.items.is_empty() && now.saturating_sub(state.cache.timestamp) < state.cache.expires_in
}

/// Applies `action` to `state`.
pub fn reduce(state: &mut TasksState, action: TaskAction) {
    match action {
        TaskAction::FetchPending => {
            state.status = RequestStatus::Loading;
            state.error = None;
        }
        TaskAction::FetchCacheHit => {
            state.status = RequestStatus::Succeeded;
            state.error = None;
        }
        TaskAction::FetchFulfilled { items, fetched_at } => {
            state.items = items;
            state.status = RequestStatus::Succeeded;
            state.error = None;
            state.cache.timestamp = fetched_at;
        }
        TaskAction::FetchRejected { message } => {
            state.status = RequestStatus::Failed;
            state.error = Some(message);
        }
        TaskAction::Added(task) => {
            // IDs stay unique: an echoed duplicate replaces the existing entry.
            if let Some(index) = state.position(&task.id) {
                state.items[index] = task;
            } else {
                state.items.push(task);
            }
        }
        TaskAction::Updated(task) => {
            if let Some(index) = state.position(&task.id) {
                state.items[index] = task;
            } else {
                tracing::debug!(task_id = %task.id, "update for unknown task ignored");
            }
        }
        TaskAction::Deleted(id) => {
            state.items.retain(|t| t.id != id);
        }
        TaskAction::SetTasks(items) => {
            state.items = items;
            state.status = RequestStatus::Succeeded;
            state.error = None;
        }
    }
}
