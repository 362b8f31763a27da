use std::sync::Arc;

use tracing::{debug, warn};

use super::{Operation, ResourceAction, ResourceReducer, ResourceState};
use crate::api::{ApiError, ResourceApi};
use crate::model::{Entity, RecordId};
use crate::store::{Store, Subscription};

const MUTATION_FALLBACK: &str = "Something went wrong";

/// Client-side cache and operation set for one backend collection.
///
/// Every operation dispatches a pending action, awaits the server, then
/// dispatches exactly one fulfilled or rejected action. Writes are applied
/// only after the server acknowledges them. Operations are not serialized
/// against each other: when two requests overlap, whichever resolves last
/// decides the final state.
pub struct ResourceStore<E: Entity> {
    store: Store<ResourceReducer<E>>,
    api: Arc<dyn ResourceApi<E>>,
}

impl<E: Entity> Clone for ResourceStore<E> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            api: Arc::clone(&self.api),
        }
    }
}

impl<E: Entity> ResourceStore<E> {
    pub fn new(api: Arc<dyn ResourceApi<E>>) -> Self {
        Self {
            store: Store::new(ResourceReducer::new(), ResourceState::default()),
            api,
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> ResourceState<E> {
        self.store.get()
    }

    /// Read state without cloning it.
    pub fn read<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&ResourceState<E>) -> T,
    {
        self.store.read(f)
    }

    pub fn items(&self) -> Vec<E> {
        self.store.read(|state| state.items.clone())
    }

    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&ResourceState<E>) + Send + Sync + 'static,
    {
        self.store.subscribe(callback)
    }

    /// Replace the collection with the server's list.
    ///
    /// A blank `search` fetches the unfiltered collection. On failure the
    /// current items are kept.
    pub async fn fetch_all(&self, search: Option<&str>) {
        let search = search.map(str::trim).filter(|term| !term.is_empty());
        self.store.dispatch(ResourceAction::Pending(Operation::Fetch));
        match self.api.list(search).await {
            Ok(items) => {
                debug!(resource = E::KIND.plural, count = items.len(), ?search, "fetched");
                self.store.dispatch(ResourceAction::Fetched(items));
            }
            Err(error) => self.reject(Operation::Fetch, &error, E::KIND.fetch_fallback),
        }
    }

    /// Submit a new record and append the server's canonical copy.
    pub async fn create(&self, draft: E::Draft) {
        self.store.dispatch(ResourceAction::Pending(Operation::Create));
        if let Err(message) = E::validate(&draft) {
            self.reject(Operation::Create, &ApiError::invalid(message), MUTATION_FALLBACK);
            return;
        }
        match self.api.create(&draft).await {
            Ok(record) => {
                debug!(resource = E::KIND.plural, id = %record.id(), "created");
                self.store.dispatch(ResourceAction::Created(record));
            }
            Err(error) => self.reject(Operation::Create, &error, MUTATION_FALLBACK),
        }
    }

    /// Submit `patch` and replace the matching entry with the server's copy.
    ///
    /// If the entry is no longer in the collection the response is dropped.
    /// Returns `false` when the edit failed validation or the server refused it.
    pub async fn update(&self, id: &RecordId, patch: E::Patch) -> bool {
        self.store.dispatch(ResourceAction::Pending(Operation::Update));
        if let Err(message) = E::validate_patch(&patch) {
            self.reject(Operation::Update, &ApiError::invalid(message), MUTATION_FALLBACK);
            return false;
        }
        match self.api.update(id, &patch).await {
            Ok(record) => {
                debug!(resource = E::KIND.plural, %id, "updated");
                self.store.dispatch(ResourceAction::Updated(record));
                true
            }
            Err(error) => {
                self.reject(Operation::Update, &error, MUTATION_FALLBACK);
                false
            }
        }
    }

    pub async fn delete(&self, id: &RecordId) {
        self.store.dispatch(ResourceAction::Pending(Operation::Delete));
        match self.api.delete(id).await {
            Ok(()) => {
                debug!(resource = E::KIND.plural, %id, "deleted");
                self.store.dispatch(ResourceAction::Deleted(id.clone()));
            }
            Err(error) => self.reject(Operation::Delete, &error, MUTATION_FALLBACK),
        }
    }

    pub fn clear_messages(&self) {
        self.store.dispatch(ResourceAction::ClearMessages);
    }

    fn reject(&self, operation: Operation, error: &ApiError, fallback: &str) {
        warn!(resource = E::KIND.plural, %operation, %error, "request failed");
        self.store.dispatch(ResourceAction::Rejected {
            operation,
            message: error.user_message(fallback),
        });
    }
}
