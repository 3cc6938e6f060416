//! Persistence bridge between the task store and durable storage.
//!
//! Two responsibilities:
//! 1. **Write-through**: as a [`StateListener`], every state transition is
//!    encoded as a [`PersistedState`] record and written under a fixed key.
//! 2. **Hydration**: once per session, the stored record is read back. A
//!    non-empty collection is loaded with [`TaskStore::set_tasks`];
//!    anything else (missing, empty, unreadable) falls through to
//!    [`TaskStore::fetch_tasks`].
//!
//! Storage and codec failures are logged and otherwise swallowed: the store
//! behaves as if storage were empty.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use taskdeck_proto::codec::{self, PersistedState};
use taskdeck_proto::state::TasksState;
use taskdeck_proto::task::Task;

use crate::api::TaskApi;
use crate::storage::Storage;
use crate::tasks::{StateListener, TaskError, TaskStore};

/// Key the task state is stored under.
pub const DEFAULT_STORAGE_KEY: &str = "taskManagerState";

/// How hydration populated the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hydration {
    /// A stored collection of this many tasks was loaded.
    FromStorage(usize),
    /// Storage had nothing usable; a fetch returned this many tasks.
    Fetched(usize),
    /// Hydration already ran this session.
    AlreadyHydrated,
}

/// Mirrors store state to a [`Storage`] backend and hydrates from it.
pub struct PersistenceBridge<S> {
    storage: S,
    key: String,
    hydrated: AtomicBool,
}

impl<S: Storage> PersistenceBridge<S> {
    /// Creates a bridge writing under [`DEFAULT_STORAGE_KEY`].
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, DEFAULT_STORAGE_KEY)
    }

    /// Creates a bridge writing under a custom key.
    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            hydrated: AtomicBool::new(false),
        }
    }

    /// Returns the storage key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the underlying storage.
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Whether hydration has already run.
    pub fn is_hydrated(&self) -> bool {
        self.hydrated.load(Ordering::SeqCst)
    }

    /// Reads the stored record, treating any failure as absence.
    pub fn load(&self) -> Option<PersistedState> {
        let text = self.read()?;
        match codec::decode(&text) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "discarding unreadable stored state");
                None
            }
        }
    }

    /// Reads the stored task list for hydration. Only `tasks.items` has to
    /// be well formed; the rest of the record is ignored.
    fn load_items(&self) -> Option<Vec<Task>> {
        let text = self.read()?;
        match codec::decode_items(&text) {
            Ok(items) => Some(items),
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "discarding unreadable stored tasks");
                None
            }
        }
    }

    fn read(&self) -> Option<String> {
        match self.storage.get(&self.key) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "error loading state from storage");
                None
            }
        }
    }

    /// Writes a state snapshot. Failures are logged, not returned.
    pub fn save(&self, state: &TasksState) {
        let text = match codec::encode(state) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, "error encoding state for storage");
                return;
            }
        };
        if let Err(e) = self.storage.set(&self.key, &text) {
            tracing::warn!(key = %self.key, error = %e, "error saving state to storage");
        }
    }

    /// Removes the stored record. Failures are logged, not returned.
    pub fn clear(&self) {
        if let Err(e) = self.storage.remove(&self.key) {
            tracing::warn!(key = %self.key, error = %e, "error clearing stored state");
        }
    }

    /// Populates `store` from storage, or by fetching when storage holds no
    /// tasks. Runs at most once per bridge.
    ///
    /// An empty stored collection counts as absent, so a deliberately
    /// cleared list is re-seeded by the fetch.
    ///
    /// # Errors
    ///
    /// Returns the fetch error when storage was unusable and the fetch
    /// failed. The store's status is `Failed` in that case.
    pub async fn hydrate<A: TaskApi>(&self, store: &TaskStore<A>) -> Result<Hydration, TaskError> {
        if self.hydrated.swap(true, Ordering::SeqCst) {
            return Ok(Hydration::AlreadyHydrated);
        }

        if let Some(items) = self.load_items()
            && !items.is_empty()
        {
            let count = items.len();
            tracing::info!(count, "hydrated tasks from storage");
            store.set_tasks(items);
            return Ok(Hydration::FromStorage(count));
        }

        tracing::info!("no stored tasks, fetching");
        let items = store.fetch_tasks().await?;
        Ok(Hydration::Fetched(items.len()))
    }
}

impl<S: Storage> StateListener for PersistenceBridge<S> {
    fn on_state_changed(&self, state: &TasksState) {
        self.save(state);
    }
}

/// Convenience: build a bridge, subscribe it to `store`, and return it.
pub fn attach<A: TaskApi, S: Storage + 'static>(
    store: &TaskStore<A>,
    bridge: PersistenceBridge<S>,
) -> Arc<PersistenceBridge<S>> {
    let bridge = Arc::new(bridge);
    store.subscribe(bridge.clone());
    bridge
}
