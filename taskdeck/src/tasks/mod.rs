//! Client-side task store.
//!
//! The store keeps an explicit [`TasksState`](taskdeck_proto::state::TasksState)
//! value and changes it only through the pure [`reduce`] function. Every
//! transition is announced to registered [`StateListener`]s, which is how
//! the persistence bridge mirrors state to storage.

pub mod reducer;
pub mod store;

pub use reducer::{TaskAction, is_cache_fresh, now_ms, reduce};
pub use store::{StateListener, TaskStore};

use taskdeck_proto::task::TaskId;
use thiserror::Error;

use crate::api::ApiError;

/// Message recorded when a fetch fails without a message of its own.
pub const DEFAULT_FETCH_ERROR: &str = "Failed to fetch tasks";

/// Errors that can occur during task operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaskError {
    /// The backend call failed.
    #[error(transparent)]
    Api(#[from] ApiError),
    /// Task with the given ID was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),
}
