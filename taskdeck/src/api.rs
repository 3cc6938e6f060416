//! Backend API abstraction for the task store.
//!
//! Defines the [`TaskApi`] trait the store talks to. The only shipped
//! implementation is [`MockTaskApi`], which simulates network latency with
//! fixed delays and answers from memory. A real backend must keep the same
//! contracts, including echo-back semantics for update and delete.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chrono::{TimeDelta, Utc};
use taskdeck_proto::task::{Task, TaskDraft, TaskId};

/// Default simulated latency of a full fetch.
pub const DEFAULT_FETCH_DELAY: Duration = Duration::from_millis(1000);

/// Default simulated latency of add / update / delete.
pub const DEFAULT_MUTATION_DELAY: Duration = Duration::from_millis(500);

/// Errors a backend can report.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The backend could not be reached.
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    /// The backend rejected the request.
    #[error("{0}")]
    Rejected(String),
}

/// Async task backend.
///
/// # Invariant
///
/// `update_task` returns the task it was given and `delete_task` returns
/// the ID it was given. The store relies on the echoed value to apply the
/// change locally.
pub trait TaskApi: Send + Sync {
    /// Retrieve the full task collection.
    fn fetch_tasks(&self) -> impl std::future::Future<Output = Result<Vec<Task>, ApiError>> + Send;

    /// Create a task from a draft. The backend assigns the ID, sets
    /// `completed = false` and stamps `created_at`.
    fn add_task(
        &self,
        draft: TaskDraft,
    ) -> impl std::future::Future<Output = Result<Task, ApiError>> + Send;

    /// Persist an edited task and echo it back.
    fn update_task(
        &self,
        task: Task,
    ) -> impl std::future::Future<Output = Result<Task, ApiError>> + Send;

    /// Delete a task and echo its ID back.
    fn delete_task(
        &self,
        id: TaskId,
    ) -> impl std::future::Future<Output = Result<TaskId, ApiError>> + Send;
}

/// In-process backend that sleeps a fixed delay and answers from memory.
///
/// Every fetch returns the same two seeded tasks; nothing written through
/// `add_task` / `update_task` / `delete_task` is remembered.
#[derive(Debug)]
pub struct MockTaskApi {
    fetch_delay: Duration,
    mutation_delay: Duration,
    fetch_calls: AtomicUsize,
}

impl Default for MockTaskApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTaskApi {
    /// Creates a mock with the default delays (1000 ms fetch, 500 ms mutations).
    #[must_use]
    pub const fn new() -> Self {
        Self::with_delays(DEFAULT_FETCH_DELAY, DEFAULT_MUTATION_DELAY)
    }

    /// Creates a mock with custom delays.
    #[must_use]
    pub const fn with_delays(fetch_delay: Duration, mutation_delay: Duration) -> Self {
        Self {
            fetch_delay,
            mutation_delay,
            fetch_calls: AtomicUsize::new(0),
        }
    }

    /// Creates a mock that answers immediately.
    #[must_use]
    pub const fn instant() -> Self {
        Self::with_delays(Duration::ZERO, Duration::ZERO)
    }

    /// Number of times `fetch_tasks` has been invoked.
    #[must_use]
    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    async fn pause(delay: Duration) {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

/// The fixed collection the mock backend serves.
#[must_use]
pub fn seed_tasks() -> Vec<Task> {
    let now = Utc::now();
    vec![
        Task {
            id: TaskId::from("1"),
            title: "Learn Redux Toolkit".to_string(),
            description: "Understand how to use Redux Toolkit with React".to_string(),
            completed: false,
            created_at: now,
        },
        Task {
            id: TaskId::from("2"),
            title: "Build a Task Manager".to_string(),
            description: "Create a task manager application with Redux".to_string(),
            completed: true,
            created_at: now - TimeDelta::days(1),
        },
    ]
}

impl TaskApi for MockTaskApi {
    async fn fetch_tasks(&self) -> Result<Vec<Task>, ApiError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        Self::pause(self.fetch_delay).await;
        tracing::debug!("mock backend served seed tasks");
        Ok(seed_tasks())
    }

    async fn add_task(&self, draft: TaskDraft) -> Result<Task, ApiError> {
        Self::pause(self.mutation_delay).await;
        Ok(Task::from_draft(draft))
    }

    async fn update_task(&self, task: Task) -> Result<Task, ApiError> {
        Self::pause(self.mutation_delay).await;
        Ok(task)
    }

    async fn delete_task(&self, id: TaskId) -> Result<TaskId, ApiError> {
        Self::pause(self.mutation_delay).await;
        Ok(id)
    }
}
