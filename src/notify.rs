//! Toast-style notices and the relay that shows and expires store messages.

use std::fmt::{self, Display};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::model::Entity;
use crate::resource::ResourceStore;
use crate::store::Subscription;
use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
    Info,
}

/// One transient message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }
}

impl Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Sink for notices, e.g. a toast layer.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Notifier that writes notices to the tracing log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Error => error!(text = %notice.text, "notice"),
            NoticeLevel::Success | NoticeLevel::Info => {
                info!(level = ?notice.level, text = %notice.text, "notice")
            }
        }
    }
}

type Messages = (Option<String>, Option<String>);

struct RelayState {
    last: Messages,
    timer: Option<JoinHandle<()>>,
}

/// Forwards a store's `success`/`error` messages to a [`Notifier`] and
/// clears them after a fixed delay.
///
/// A message is forwarded when it first appears or changes; an unchanged
/// message is not repeated.
///
/// Each new message restarts the delay. Dropping the relay unsubscribes and
/// cancels any pending clear.
pub struct MessageRelay {
    state: Arc<Mutex<RelayState>>,
    _subscription: Subscription,
}

impl MessageRelay {
    /// Attach a relay to `store`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoRuntime`] when called outside a tokio runtime.
    pub fn attach<E: Entity>(
        store: &ResourceStore<E>,
        notifier: Arc<dyn Notifier>,
        delay: Duration,
    ) -> Result<Self, Error> {
        let handle = Handle::try_current()?;
        let state = Arc::new(Mutex::new(RelayState {
            last: (None, None),
            timer: None,
        }));

        let relay_state = Arc::clone(&state);
        let target = store.clone();
        let subscription = store.subscribe(move |current| {
            let messages = (current.success.clone(), current.error.clone());
            let mut relay = relay_state.lock().unwrap_or_else(PoisonError::into_inner);
            let (previous_success, previous_failure) =
                std::mem::replace(&mut relay.last, messages.clone());
            let (success, failure) = messages;
            let success = success.filter(|text| previous_success.as_ref() != Some(text));
            let failure = failure.filter(|text| previous_failure.as_ref() != Some(text));
            if success.is_none() && failure.is_none() {
                return;
            }
            if let Some(text) = success {
                notifier.notify(Notice::success(text));
            }
            if let Some(text) = failure {
                notifier.notify(Notice::error(text));
            }

            if let Some(timer) = relay.timer.take() {
                timer.abort();
            }
            let target = target.clone();
            relay.timer = Some(handle.spawn(async move {
                tokio::time::sleep(delay).await;
                target.clear_messages();
            }));
        });

        Ok(Self {
            state,
            _subscription: subscription,
        })
    }
}

impl Drop for MessageRelay {
    fn drop(&mut self) {
        let mut relay = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(timer) = relay.timer.take() {
            timer.abort();
        }
    }
}
