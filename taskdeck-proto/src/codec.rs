//! JSON encoding of the durable-storage record.
//!
//! The record mirrors the store's full task state under a `tasks` key:
//!
//! ```json
//! { "tasks": { "items": [...], "status": "succeeded", "error": null,
//!              "cache": { "timestamp": 0, "expiresIn": 300000 } } }
//! ```

use serde::{Deserialize, Serialize};

use crate::state::TasksState;
use crate::task::Task;

/// Error type for record encode/decode operations.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Serialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),
    /// The stored text is not a valid record.
    #[error("malformed record: {0}")]
    Malformed(String),
}

/// The record written to durable storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedState {
    /// Snapshot of the task store.
    pub tasks: TasksState,
}

impl PersistedState {
    /// Wraps a state snapshot.
    #[must_use]
    pub const fn new(tasks: TasksState) -> Self {
        Self { tasks }
    }
}

/// Encodes a state snapshot as a storage record.
///
/// # Errors
///
/// Returns `CodecError::Serialization` if the state cannot be serialized.
pub fn encode(state: &TasksState) -> Result<String, CodecError> {
    #[derive(Serialize)]
    struct Borrowed<'a> {
        tasks: &'a TasksState,
    }
    serde_json::to_string(&Borrowed { tasks: state })
        .map_err(|e| CodecError::Serialization(e.to_string()))
}

/// Decodes a storage record.
///
/// # Errors
///
/// Returns `CodecError::Malformed` if the text is not a valid record.
pub fn decode(text: &str) -> Result<PersistedState, CodecError> {
    serde_json::from_str(text).map_err(|e| CodecError::Malformed(e.to_string()))
}

/// Reads only the task list out of a storage record.
///
/// Everything under `tasks` other than `items` is ignored, so a record with
/// a missing or unrecognized `status`, `error` or `cache` still yields its
/// tasks. A missing `items` reads as an empty list.
///
/// # Errors
///
/// Returns `CodecError::Malformed` if the text is not JSON, has no `tasks`
/// object, or holds an item that is not a valid task.
pub fn decode_items(text: &str) -> Result<Vec<Task>, CodecError> {
    #[derive(Deserialize)]
    struct StoredRecord {
        tasks: StoredTasks,
    }

    #[derive(Deserialize)]
    struct StoredTasks {
        #[serde(default)]
        items: Vec<Task>,
    }

    serde_json::from_str::<StoredRecord>(text)
        .map(|record| record.tasks.items)
        .map_err(|e| CodecError::Malformed(e.to_string()))
}
