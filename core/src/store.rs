//! Observable in-memory state for checklist views.
//!
//! # Design
//! `CheckListStore` owns a `CheckListSource` and publishes a `StoreState`
//! through a `watch` channel, so any number of observers see one consistent
//! snapshot. Operations take `&self` and may overlap; nothing fences them,
//! so whichever response resolves last determines the final state.
//!
//! Every request runs to completion on its own task, even when the caller
//! stops waiting, so the state always reflects what the backend did.
//!
//! Failures never escape an operation. They are normalized into
//! `StoreError` and recorded in `last_error`, which only a later successful
//! operation clears.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;

use crate::api::{CheckListSource, Filters};
use crate::error::{FetchError, FieldErrors};
use crate::types::{CheckList, CheckListBase};

/// Used when a failure carries no message of its own.
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred";

/// The `{message, details}` shape views render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError {
    pub message: String,
    pub details: Option<FieldErrors>,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            message: if message.is_empty() {
                UNKNOWN_ERROR_MESSAGE.to_string()
            } else {
                message
            },
            details: None,
        }
    }

    /// Messages recorded for one form field.
    pub fn field(&self, name: &str) -> &[String] {
        self.details
            .as_ref()
            .and_then(|details| details.get(name))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

impl From<&FetchError> for StoreError {
    fn from(err: &FetchError) -> Self {
        let mut error = StoreError::new(err.message());
        error.details = err.details().filter(|d| !d.is_empty()).cloned();
        error
    }
}

impl From<FetchError> for StoreError {
    fn from(err: FetchError) -> Self {
        StoreError::from(&err)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreState {
    /// Last fetched list plus anything created since, in insertion order.
    pub collection: Vec<CheckList>,
    /// Single-entry cache for the detail view.
    pub current: Option<CheckList>,
    pub is_loading: bool,
    pub last_error: Option<StoreError>,
}

/// Clears `is_loading` when dropped, whether the operation finished,
/// failed or panicked.
struct LoadingGuard {
    state: Arc<watch::Sender<StoreState>>,
}

impl LoadingGuard {
    fn start(state: &Arc<watch::Sender<StoreState>>) -> Self {
        state.send_modify(|s| s.is_loading = true);
        Self {
            state: Arc::clone(state),
        }
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.state.send_modify(|s| s.is_loading = false);
    }
}

/// Checklist state shared by every view of one page or session.
///
/// Each request and the state update that follows it run on a spawned tokio
/// task. Dropping the future returned by an operation stops waiting for the
/// result but never cancels the request or its state update. Operations
/// must therefore be called from within a tokio runtime.
pub struct CheckListStore<S> {
    source: Arc<S>,
    state: Arc<watch::Sender<StoreState>>,
}

impl<S: CheckListSource + 'static> CheckListStore<S> {
    /// A store with empty state. Each page or session builds its own.
    pub fn new(source: S) -> Self {
        let (state, _) = watch::channel(StoreState::default());
        Self {
            source: Arc::new(source),
            state: Arc::new(state),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn snapshot(&self) -> StoreState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<StoreState> {
        self.state.subscribe()
    }

    pub fn collection(&self) -> Vec<CheckList> {
        self.state.borrow().collection.clone()
    }

    pub fn current(&self) -> Option<CheckList> {
        self.state.borrow().current.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    pub fn last_error(&self) -> Option<StoreError> {
        self.state.borrow().last_error.clone()
    }

    /// Replace `collection` with the filtered list.
    pub async fn fetch_list(&self, filters: &Filters) {
        tracing::debug!(?filters, "fetching checklists");
        let loading = LoadingGuard::start(&self.state);
        let source = Arc::clone(&self.source);
        let filters = filters.clone();
        run_to_completion(async move {
            let loading = loading;
            match source.list(&filters).await {
                Ok(checklists) => loading.state.send_modify(|s| {
                    s.collection = checklists;
                    s.last_error = None;
                }),
                Err(err) => record_failure(&loading.state, "fetch_list", &err),
            }
        })
        .await;
    }

    /// Return the checklist with `id`, from `current` when it already holds
    /// it, otherwise from the source.
    pub async fn fetch_one(&self, id: u64) -> Option<CheckList> {
        let cached = self
            .state
            .borrow()
            .current
            .as_ref()
            .filter(|c| c.id == id)
            .cloned();
        if let Some(checklist) = cached {
            tracing::trace!(id, "checklist cache hit");
            return Some(checklist);
        }

        tracing::debug!(id, "fetching checklist");
        let loading = LoadingGuard::start(&self.state);
        let source = Arc::clone(&self.source);
        run_to_completion(async move {
            let loading = loading;
            match source.get(id).await {
                Ok(checklist) => {
                    loading.state.send_modify(|s| {
                        s.current = Some(checklist.clone());
                        s.last_error = None;
                    });
                    Some(checklist)
                }
                Err(err) => {
                    record_failure(&loading.state, "fetch_one", &err);
                    None
                }
            }
        })
        .await
        .flatten()
    }

    /// Create a checklist and append the server's copy to `collection`.
    pub async fn create(&self, checklist: CheckListBase) -> Option<CheckList> {
        tracing::debug!(building = %checklist.building, "creating checklist");
        let loading = LoadingGuard::start(&self.state);
        let source = Arc::clone(&self.source);
        run_to_completion(async move {
            let loading = loading;
            match source.create(&checklist).await {
                Ok(created) => {
                    loading.state.send_modify(|s| {
                        s.collection.push(created.clone());
                        s.last_error = None;
                    });
                    Some(created)
                }
                Err(err) => {
                    record_failure(&loading.state, "create", &err);
                    None
                }
            }
        })
        .await
        .flatten()
    }
}

/// Spawn `task` and wait for it. The task keeps running if the caller stops
/// waiting. `None` only when the runtime shut the task down.
async fn run_to_completion<T, F>(task: F) -> Option<T>
where
    T: Send + 'static,
    F: Future<Output = T> + Send + 'static,
{
    match tokio::spawn(task).await {
        Ok(value) => Some(value),
        Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
        Err(err) => {
            tracing::warn!(error = %err, "store task did not complete");
            None
        }
    }
}

fn record_failure(state: &watch::Sender<StoreState>, operation: &'static str, err: &FetchError) {
    tracing::warn!(operation, error = %err, "store operation failed");
    let error = StoreError::from(err);
    state.send_modify(|s| s.last_error = Some(error));
}
