//! UI-facing controller: the operations a task manager surface offers.
//!
//! [`TaskManagerApp`] wires the store to the persistence bridge, runs
//! hydration once, validates forms before anything reaches the store, and
//! turns every outcome into a transient [`Notification`]. Fetch failures
//! are not notified; they stay visible through [`TaskManagerApp::error_banner`]
//! until the next successful fetch.

use std::sync::Arc;

use taskdeck_proto::state::{RequestStatus, TasksState};
use taskdeck_proto::task::{Task, TaskId};

use crate::api::TaskApi;
use crate::form::{FormErrors, TaskForm};
use crate::notify::{Notification, Notifications};
use crate::persist::{self, Hydration, PersistenceBridge};
use crate::storage::Storage;
use crate::tasks::{TaskError, TaskStore};

/// Why a submitted action did not complete.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// The form has blank fields; nothing was dispatched.
    #[error("invalid form: {0}")]
    Invalid(#[from] FormErrors),

    /// The task operation failed.
    #[error(transparent)]
    Task(#[from] TaskError),
}

/// Task manager session state.
pub struct TaskManagerApp<A, S> {
    store: TaskStore<A>,
    bridge: Arc<PersistenceBridge<S>>,
    notifications: Notifications,
    editing: Option<TaskId>,
}

impl<A: TaskApi, S: Storage + 'static> TaskManagerApp<A, S> {
    /// Creates a session around `store`, mirroring it through `bridge`.
    pub fn new(store: TaskStore<A>, bridge: PersistenceBridge<S>) -> Self {
        let bridge = persist::attach(&store, bridge);
        Self {
            store,
            bridge,
            notifications: Notifications::default(),
            editing: None,
        }
    }

    /// Hydrates the store from storage, or fetches. Safe to call again;
    /// later calls report [`Hydration::AlreadyHydrated`].
    ///
    /// # Errors
    ///
    /// Returns the fetch error if hydration had to fetch and the fetch
    /// failed. The failure is also visible via [`error_banner`](Self::error_banner).
    pub async fn start(&self) -> Result<Hydration, TaskError> {
        self.bridge.hydrate(&self.store).await
    }

    /// The underlying store.
    pub const fn store(&self) -> &TaskStore<A> {
        &self.store
    }

    /// The persistence bridge.
    pub fn bridge(&self) -> &PersistenceBridge<S> {
        &self.bridge
    }

    /// Tasks in display order.
    pub fn tasks(&self) -> Vec<Task> {
        self.store.tasks()
    }

    /// Snapshot of the full store state.
    pub fn state(&self) -> TasksState {
        self.store.state()
    }

    /// Whether the initial load is still running.
    pub fn is_loading(&self) -> bool {
        self.store.status() == RequestStatus::Loading
    }

    /// The persistent fetch-failure message, shown until a fetch succeeds.
    pub fn error_banner(&self) -> Option<String> {
        if self.store.status() == RequestStatus::Failed {
            self.store.error()
        } else {
            None
        }
    }

    /// ID of the task currently being edited.
    pub const fn editing(&self) -> Option<&TaskId> {
        self.editing.as_ref()
    }

    /// Takes every pending notification.
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain()
    }

    /// Re-runs the fetch (served from cache while fresh).
    ///
    /// # Errors
    ///
    /// Returns the fetch error; the banner shows it as well.
    pub async fn refresh(&self) -> Result<Vec<Task>, TaskError> {
        self.store.fetch_tasks().await
    }

    /// Validates `form` and creates a task from it.
    ///
    /// # Errors
    ///
    /// [`SubmitError::Invalid`] blocks submission without notifying;
    /// [`SubmitError::Task`] is also reported as a notification.
    pub async fn add(&mut self, form: TaskForm) -> Result<Task, SubmitError> {
        let draft = form.into_draft()?;
        match self.store.add_task(draft).await {
            Ok(task) => {
                self.notifications.push(Notification::success(
                    "Task added",
                    "Your task has been added successfully",
                ));
                Ok(task)
            }
            Err(e) => {
                self.notifications
                    .push(Notification::failure("Failed to add task", e.to_string()));
                Err(e.into())
            }
        }
    }

    /// Opens the edit form for `id`, pre-filled from the current record.
    pub fn begin_edit(&mut self, id: &TaskId) -> Option<TaskForm> {
        if let Some(task) = self.store.find(id) {
            self.editing = Some(id.clone());
            Some(TaskForm::from_task(&task))
        } else {
            self.notify_not_found();
            None
        }
    }

    /// Closes the edit form without submitting.
    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Validates `form` and applies it to task `id`.
    ///
    /// The current record supplies `completed` and `created_at`.
    ///
    /// # Errors
    ///
    /// [`SubmitError::Invalid`] if the form is blank,
    /// [`TaskError::NotFound`] if the task no longer exists, or the update
    /// error from the store.
    pub async fn submit_edit(&mut self, id: &TaskId, form: TaskForm) -> Result<Task, SubmitError> {
        form.validate()?;
        let Some(existing) = self.store.find(id) else {
            self.notify_not_found();
            return Err(TaskError::NotFound(id.clone()).into());
        };
        let task = form.into_update(&existing)?;
        let result = self.update(task).await;
        if result.is_ok() {
            self.editing = None;
        }
        result
    }

    /// Flips the completion flag of task `id`.
    ///
    /// # Errors
    ///
    /// [`TaskError::NotFound`] if the task does not exist, or the update
    /// error from the store.
    pub async fn toggle_complete(&mut self, id: &TaskId) -> Result<Task, SubmitError> {
        let Some(existing) = self.store.find(id) else {
            self.notify_not_found();
            return Err(TaskError::NotFound(id.clone()).into());
        };
        self.update(existing.toggled()).await
    }

    /// Deletes task `id`.
    ///
    /// # Errors
    ///
    /// The delete error from the store.
    pub async fn delete(&mut self, id: &TaskId) -> Result<TaskId, SubmitError> {
        match self.store.delete_task(id.clone()).await {
            Ok(id) => {
                self.notifications.push(Notification::success(
                    "Task deleted",
                    "Your task has been deleted successfully",
                ));
                if self.editing.as_ref() == Some(&id) {
                    self.editing = None;
                }
                Ok(id)
            }
            Err(e) => {
                self.notifications
                    .push(Notification::failure("Failed to delete task", e.to_string()));
                Err(e.into())
            }
        }
    }

    async fn update(&mut self, task: Task) -> Result<Task, SubmitError> {
        match self.store.update_task(task).await {
            Ok(task) => {
                self.notifications.push(Notification::success(
                    "Task updated",
                    "Your task has been updated successfully",
                ));
                Ok(task)
            }
            Err(e) => {
                self.notifications
                    .push(Notification::failure("Failed to update task", e.to_string()));
                Err(e.into())
            }
        }
    }

    fn notify_not_found(&mut self) {
        self.notifications
            .push(Notification::failure("Error", "Task not found"));
    }
}
