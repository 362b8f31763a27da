//! The generic remote-collection store, instantiated once per entity.

mod reducer;
mod store;

pub use reducer::{Operation, ResourceAction, ResourceReducer, ResourceState};
pub use store::ResourceStore;
