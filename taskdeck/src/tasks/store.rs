//! Task store: async operations over the reducer plus change listeners.
//!
//! Each operation awaits the backend and then applies the matching
//! [`TaskAction`]. The state mutex is never held across an await, so
//! overlapping operations are not coordinated: the last one to resolve
//! wins.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use taskdeck_proto::state::{RequestStatus, TasksState};
use taskdeck_proto::task::{Task, TaskDraft, TaskId};

use super::reducer::{TaskAction, is_cache_fresh, now_ms, reduce};
use super::{DEFAULT_FETCH_ERROR, TaskError};
use crate::api::TaskApi;

/// Observer invoked after every state transition.
///
/// Called with the state lock held: implementations must not call back
/// into the store.
pub trait StateListener: Send + Sync {
    /// The store's state has changed (or an operation phase completed).
    fn on_state_changed(&self, state: &TasksState);
}

/// Holds the task collection and runs operations against a [`TaskApi`].
pub struct TaskStore<A> {
    api: A,
    state: Mutex<TasksState>,
    listeners: RwLock<Vec<Arc<dyn StateListener>>>,
}

impl<A: TaskApi> TaskStore<A> {
    /// Creates a store with an empty collection.
    pub fn new(api: A) -> Self {
        Self::with_state(api, TasksState::default())
    }

    /// Creates a store starting from an explicit state.
    pub fn with_state(api: A, state: TasksState) -> Self {
        Self {
            api,
            state: Mutex::new(state),
            listeners: RwLock::new(Vec::new()),
        }
    }

    /// Registers a listener for state transitions.
    pub fn subscribe(&self, listener: Arc<dyn StateListener>) {
        self.listeners.write().push(listener);
    }

    /// Returns the backend this store talks to.
    pub const fn api(&self) -> &A {
        &self.api
    }

    /// Returns a snapshot of the full state.
    pub fn state(&self) -> TasksState {
        self.state.lock().clone()
    }

    /// Returns the tasks in insertion order.
    pub fn tasks(&self) -> Vec<Task> {
        self.state.lock().items.clone()
    }

    /// Returns the status of the last bulk operation.
    pub fn status(&self) -> RequestStatus {
        self.state.lock().status
    }

    /// Returns the last fetch failure message, if any.
    pub fn error(&self) -> Option<String> {
        self.state.lock().error.clone()
    }

    /// Looks up a task by ID.
    pub fn find(&self, id: &TaskId) -> Option<Task> {
        self.state.lock().find(id).cloned()
    }

    /// Fetches the full collection, honoring the cache window.
    ///
    /// A non-empty collection fetched less than `cache.expires_in` ago is
    /// returned as-is without contacting the backend.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::Api`] if the backend fails; the state is then
    /// marked [`RequestStatus::Failed`] with the failure message.
    pub async fn fetch_tasks(&self) -> Result<Vec<Task>, TaskError> {
        let cached = {
            let mut state = self.state.lock();
            if is_cache_fresh(&state, now_ms()) {
                self.apply(&mut state, TaskAction::FetchCacheHit);
                Some(state.items.clone())
            } else {
                self.apply(&mut state, TaskAction::FetchPending);
                None
            }
        };
        if let Some(items) = cached {
            tracing::debug!(count = items.len(), "fetch served from cache");
            return Ok(items);
        }

        match self.api.fetch_tasks().await {
            Ok(items) => {
                tracing::info!(count = items.len(), "fetched tasks");
                self.dispatch(TaskAction::FetchFulfilled {
                    items: items.clone(),
                    fetched_at: now_ms(),
                });
                Ok(items)
            }
            Err(e) => {
                let mut message = e.to_string();
                if message.is_empty() {
                    message = DEFAULT_FETCH_ERROR.to_string();
                }
                tracing::warn!(error = %message, "fetch failed");
                self.dispatch(TaskAction::FetchRejected { message });
                Err(e.into())
            }
        }
    }

    /// Creates a task and appends it to the collection.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::Api`] if the backend fails; the collection and
    /// status are left untouched.
    pub async fn add_task(&self, draft: TaskDraft) -> Result<Task, TaskError> {
        let task = self.api.add_task(draft).await.inspect_err(|e| {
            tracing::warn!(error = %e, "add failed");
        })?;
        tracing::info!(task_id = %task.id, "task added");
        self.dispatch(TaskAction::Added(task.clone()));
        Ok(task)
    }

    /// Replaces the task with the same ID, keeping its position.
    ///
    /// The caller supplies the complete record, including the original
    /// `created_at`. An unknown ID leaves the collection unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::Api`] if the backend fails.
    pub async fn update_task(&self, task: Task) -> Result<Task, TaskError> {
        let task = self.api.update_task(task).await.inspect_err(|e| {
            tracing::warn!(error = %e, "update failed");
        })?;
        tracing::info!(task_id = %task.id, completed = task.completed, "task updated");
        self.dispatch(TaskAction::Updated(task.clone()));
        Ok(task)
    }

    /// Removes every task with the given ID. Unknown IDs are not an error.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::Api`] if the backend fails.
    pub async fn delete_task(&self, id: TaskId) -> Result<TaskId, TaskError> {
        let id = self.api.delete_task(id).await.inspect_err(|e| {
            tracing::warn!(error = %e, "delete failed");
        })?;
        tracing::info!(task_id = %id, "task deleted");
        self.dispatch(TaskAction::Deleted(id.clone()));
        Ok(id)
    }

    /// Replaces the collection immediately and marks it loaded.
    ///
    /// The cache timestamp is not touched, so a collection set this way is
    /// stale for the next [`fetch_tasks`](Self::fetch_tasks).
    pub fn set_tasks(&self, items: Vec<Task>) {
        tracing::debug!(count = items.len(), "collection set directly");
        self.dispatch(TaskAction::SetTasks(items));
    }

    fn dispatch(&self, action: TaskAction) {
        let mut state = self.state.lock();
        self.apply(&mut state, action);
    }

    fn apply(&self, state: &mut TasksState, action: TaskAction) {
        reduce(state, action);
        for listener in self.listeners.read().iter() {
            listener.on_state_changed(state);
        }
    }
}
