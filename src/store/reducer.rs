use std::fmt::Debug;

/// Pure state transition applied by a [`Store`](super::Store).
///
/// Reducers never perform I/O. Asynchronous work happens around the store:
/// the caller dispatches a pending action, awaits the request, then
/// dispatches the settled action.
pub trait Reducer: Send + Sync + 'static {
    /// State owned by the store.
    type State: Clone + Send + Sync + 'static;
    /// Messages accepted by [`reduce`](Reducer::reduce).
    type Action: Debug + Send + 'static;

    /// Apply `action` to `state` in place.
    fn reduce(&self, state: &mut Self::State, action: Self::Action);
}
