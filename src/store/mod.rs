//! Reducer-driven state containers.
//!
//! A [`Store`] owns one piece of state and changes it only by running typed
//! actions through its [`Reducer`]. Subscribers observe every change through
//! a [`Subscription`] guard that unsubscribes when dropped.

mod reducer;
mod store;

pub use reducer::Reducer;
pub use store::{Store, Subscription};
