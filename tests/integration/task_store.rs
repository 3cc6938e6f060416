//! Integration tests for the task store: fetch caching, per-item
//! operations, failure handling and overlapping operations.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::redundant_clone)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use chrono::Utc;
use futures_util::future::join;
use taskdeck::api::{ApiError, MockTaskApi, TaskApi, seed_tasks};
use taskdeck::tasks::{DEFAULT_FETCH_ERROR, TaskError, TaskStore, now_ms};
use taskdeck_proto::state::{CacheRecord, RequestStatus, TasksState};
use taskdeck_proto::task::{Task, TaskDraft, TaskId};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Backend whose calls can be made to fail, and whose updates of a task
/// titled "slow" take longer than any other call.
#[derive(Default)]
struct ScriptedApi {
    fail_fetch: AtomicBool,
    fail_mutations: AtomicBool,
    silent_failure: AtomicBool,
    fetches: AtomicUsize,
}

impl ScriptedApi {
    fn failure(&self, what: &str) -> ApiError {
        if self.silent_failure.load(Ordering::SeqCst) {
            ApiError::Rejected(String::new())
        } else {
            ApiError::Unavailable(what.to_string())
        }
    }
}

impl TaskApi for ScriptedApi {
    async fn fetch_tasks(&self) -> Result<Vec<Task>, ApiError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(self.failure("fetch"));
        }
        Ok(seed_tasks())
    }

    async fn add_task(&self, draft: TaskDraft) -> Result<Task, ApiError> {
        if self.fail_mutations.load(Ordering::SeqCst) {
            return Err(self.failure("add"));
        }
        Ok(Task::from_draft(draft))
    }

    async fn update_task(&self, task: Task) -> Result<Task, ApiError> {
        if self.fail_mutations.load(Ordering::SeqCst) {
            return Err(self.failure("update"));
        }
        if task.title == "slow" {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        Ok(task)
    }

    async fn delete_task(&self, id: TaskId) -> Result<TaskId, ApiError> {
        if self.fail_mutations.load(Ordering::SeqCst) {
            return Err(self.failure("delete"));
        }
        Ok(id)
    }
}

fn mock_store() -> TaskStore<MockTaskApi> {
    TaskStore::new(MockTaskApi::instant())
}

// ---------------------------------------------------------------------------
// fetch
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_after_delay_yields_two_seeded_tasks() {
    let store = TaskStore::new(MockTaskApi::with_delays(
        Duration::from_millis(20),
        Duration::ZERO,
    ));
    let items = store.fetch_tasks().await.unwrap();
    assert_eq!(items.len(), 2);
    let state = store.state();
    assert_eq!(state.status, RequestStatus::Succeeded);
    assert_eq!(state.items[0].title, "Learn Redux Toolkit");
    assert_eq!(state.items[1].title, "Build a Task Manager");
}

#[tokio::test]
async fn store_reports_loading_while_fetch_in_flight() {
    let store = TaskStore::new(MockTaskApi::with_delays(
        Duration::from_millis(30),
        Duration::ZERO,
    ));
    let (result, status) = join(store.fetch_tasks(), async {
        tokio::time::sleep(Duration::from_millis(5)).await;
        store.status()
    })
    .await;
    result.unwrap();
    assert_eq!(status, RequestStatus::Loading);
    assert_eq!(store.status(), RequestStatus::Succeeded);
}

#[tokio::test]
async fn cache_hit_returns_identical_collection_without_backend_call() {
    let store = mock_store();
    let first = store.fetch_tasks().await.unwrap();
    let second = store.fetch_tasks().await.unwrap();
    assert_eq!(first, second);
    assert_eq!(store.api().fetch_calls(), 1);
}

#[tokio::test]
async fn cache_hit_serves_local_mutations() {
    let store = mock_store();
    store.fetch_tasks().await.unwrap();
    let added = store.add_task(TaskDraft::new("A", "B")).await.unwrap();
    let items = store.fetch_tasks().await.unwrap();
    assert_eq!(items.len(), 3);
    assert!(items.contains(&added));
}

#[tokio::test]
async fn stale_cache_goes_to_backend() {
    let store = TaskStore::with_state(
        MockTaskApi::instant(),
        TasksState {
            items: vec![Task::from_draft(TaskDraft::new("old", "old"))],
            status: RequestStatus::Succeeded,
            error: None,
            cache: CacheRecord {
                timestamp: now_ms() - 10 * 60 * 1000,
                expires_in: 5 * 60 * 1000,
            },
        },
    );
    let items = store.fetch_tasks().await.unwrap();
    assert_eq!(store.api().fetch_calls(), 1);
    assert_eq!(items.len(), 2);
    assert!(store.state().cache.timestamp > now_ms() - 1_000);
}

#[tokio::test]
async fn empty_collection_always_fetches() {
    let store = TaskStore::new(ScriptedApi::default());
    store.fetch_tasks().await.unwrap();
    for task in store.tasks() {
        store.delete_task(task.id).await.unwrap();
    }
    assert!(store.tasks().is_empty());
    store.fetch_tasks().await.unwrap();
    assert_eq!(store.api().fetches.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn fetch_failure_marks_failed_then_recovers() {
    let store = TaskStore::new(ScriptedApi::default());
    store.api().fail_fetch.store(true, Ordering::SeqCst);

    let err = store.fetch_tasks().await.unwrap_err();
    assert!(matches!(err, TaskError::Api(ApiError::Unavailable(_))));
    let state = store.state();
    assert_eq!(state.status, RequestStatus::Failed);
    assert_eq!(state.error.as_deref(), Some("backend unavailable: fetch"));
    assert!(state.items.is_empty());

    store.api().fail_fetch.store(false, Ordering::SeqCst);
    store.fetch_tasks().await.unwrap();
    let state = store.state();
    assert_eq!(state.status, RequestStatus::Succeeded);
    assert!(state.error.is_none());
    assert_eq!(state.items.len(), 2);
}

#[tokio::test]
async fn fetch_failure_without_message_uses_default() {
    let store = TaskStore::new(ScriptedApi::default());
    store.api().fail_fetch.store(true, Ordering::SeqCst);
    store.api().silent_failure.store(true, Ordering::SeqCst);
    store.fetch_tasks().await.unwrap_err();
    assert_eq!(store.error().as_deref(), Some(DEFAULT_FETCH_ERROR));
}

// ---------------------------------------------------------------------------
// add / update / delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn add_grows_collection_by_one_open_task() {
    let store = mock_store();
    store.fetch_tasks().await.unwrap();
    let before = store.tasks().len();
    let now = Utc::now();
    let task = store.add_task(TaskDraft::new("A", "B")).await.unwrap();
    let tasks = store.tasks();
    assert_eq!(tasks.len(), before + 1);
    assert_eq!(tasks.last(), Some(&task));
    assert!(!task.completed);
    assert!((task.created_at - now).num_seconds().abs() < 5);
    assert_eq!(store.status(), RequestStatus::Succeeded);
}

#[tokio::test]
async fn added_ids_stay_unique() {
    let store = mock_store();
    store.fetch_tasks().await.unwrap();
    for i in 0..25 {
        store
            .add_task(TaskDraft::new(format!("task {i}"), "d"))
            .await
            .unwrap();
        let tasks = store.tasks();
        let ids: HashSet<_> = tasks.iter().map(|t| t.id.clone()).collect();
        assert_eq!(ids.len(), tasks.len());
    }
}

#[tokio::test]
async fn created_at_survives_repeated_updates() {
    let store = mock_store();
    let task = store.add_task(TaskDraft::new("A", "B")).await.unwrap();
    let mut current = task.clone();
    for i in 0..10 {
        current.title = format!("rev {i}");
        current = current.toggled();
        current = store.update_task(current).await.unwrap();
    }
    let stored = store.find(&task.id).unwrap();
    assert_eq!(stored.created_at, task.created_at);
    assert_eq!(stored.title, "rev 9");
}

#[tokio::test]
async fn toggle_preserves_everything_but_completed() {
    let store = mock_store();
    store.fetch_tasks().await.unwrap();
    let original = store.find(&TaskId::from("1")).unwrap();
    store.update_task(original.toggled()).await.unwrap();
    let after = store.find(&TaskId::from("1")).unwrap();
    assert_eq!(after.id, original.id);
    assert_eq!(after.title, original.title);
    assert_eq!(after.description, original.description);
    assert_eq!(after.created_at, original.created_at);
    assert_eq!(after.completed, !original.completed);
}

#[tokio::test]
async fn update_of_unknown_task_is_silent_noop() {
    let store = mock_store();
    store.fetch_tasks().await.unwrap();
    let before = store.tasks();
    let ghost = Task::from_draft(TaskDraft::new("ghost", "ghost"));
    let echoed = store.update_task(ghost.clone()).await.unwrap();
    assert_eq!(echoed, ghost);
    assert_eq!(store.tasks(), before);
}

#[tokio::test]
async fn delete_removes_task() {
    let store = mock_store();
    store.fetch_tasks().await.unwrap();
    store.delete_task(TaskId::from("2")).await.unwrap();
    let tasks = store.tasks();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, TaskId::from("1"));
}

#[tokio::test]
async fn delete_of_nonexistent_id_leaves_collection_unchanged() {
    let store = mock_store();
    store.fetch_tasks().await.unwrap();
    let before = store.tasks();
    store.delete_task(TaskId::from("does-not-exist")).await.unwrap();
    assert_eq!(store.tasks(), before);
}

#[tokio::test]
async fn mutation_failures_leave_state_untouched() {
    let store = TaskStore::new(ScriptedApi::default());
    store.fetch_tasks().await.unwrap();
    let before = store.state();
    store.api().fail_mutations.store(true, Ordering::SeqCst);

    assert!(store.add_task(TaskDraft::new("A", "B")).await.is_err());
    let first = before.items[0].clone();
    assert!(store.update_task(first.toggled()).await.is_err());
    assert!(store.delete_task(first.id.clone()).await.is_err());

    assert_eq!(store.state(), before);
    assert_eq!(store.status(), RequestStatus::Succeeded);
}

// ---------------------------------------------------------------------------
// set_tasks and overlapping operations
// ---------------------------------------------------------------------------

#[tokio::test]
async fn set_tasks_replaces_collection_without_refreshing_cache() {
    let store = mock_store();
    store.fetch_tasks().await.unwrap();
    let stamped = store.state().cache.timestamp;
    let items = vec![Task::from_draft(TaskDraft::new("X", "Y"))];
    store.set_tasks(items.clone());
    let state = store.state();
    assert_eq!(state.items, items);
    assert_eq!(state.status, RequestStatus::Succeeded);
    assert_eq!(state.cache.timestamp, stamped);
}

#[tokio::test]
async fn overlapping_updates_last_to_resolve_wins() {
    let store = TaskStore::new(ScriptedApi::default());
    store.fetch_tasks().await.unwrap();
    let base = store.find(&TaskId::from("1")).unwrap();

    let mut slow = base.clone();
    slow.title = "slow".to_string();
    let mut fast = base.clone();
    fast.title = "fast".to_string();

    // Issued first, resolves last.
    let (a, b) = join(store.update_task(slow), store.update_task(fast)).await;
    a.unwrap();
    b.unwrap();

    assert_eq!(store.find(&base.id).unwrap().title, "slow");
}
