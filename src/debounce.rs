//! Search-as-you-type with a quiet period.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::trace;

use crate::model::Entity;
use crate::resource::ResourceStore;
use crate::Error;

/// Turns keystrokes into `fetch_all` calls on a resource store.
///
/// A non-blank term is fetched once the input has been stable for the quiet
/// period; clearing the term fetches the unfiltered collection at once.
/// Only the pending timer is ever cancelled: a fetch that has started runs
/// to completion. Dropping the debouncer cancels the pending timer.
pub struct SearchDebouncer<E: Entity> {
    store: ResourceStore<E>,
    quiet: Duration,
    handle: Handle,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl<E: Entity> SearchDebouncer<E> {
    /// # Errors
    ///
    /// Returns [`Error::NoRuntime`] when called outside a tokio runtime.
    pub fn new(store: ResourceStore<E>, quiet: Duration) -> Result<Self, Error> {
        Ok(Self {
            store,
            quiet,
            handle: Handle::try_current()?,
            pending: Mutex::new(None),
        })
    }

    /// Record the current contents of the search box.
    pub fn input(&self, term: &str) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(timer) = pending.take() {
            timer.abort();
        }

        let store = self.store.clone();
        let term = term.trim().to_owned();
        if term.is_empty() {
            trace!(resource = E::KIND.plural, "search cleared");
            self.handle.spawn(async move { store.fetch_all(None).await });
            return;
        }

        let quiet = self.quiet;
        let handle = self.handle.clone();
        *pending = Some(self.handle.spawn(async move {
            tokio::time::sleep(quiet).await;
            trace!(resource = E::KIND.plural, %term, "search settled");
            // Detached so a later keystroke cannot abort the request itself.
            handle.spawn(async move { store.fetch_all(Some(&term)).await });
        }));
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet
    }
}

impl<E: Entity> Drop for SearchDebouncer<E> {
    fn drop(&mut self) {
        let pending = self
            .pending
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(timer) = pending.take() {
            timer.abort();
        }
    }
}
