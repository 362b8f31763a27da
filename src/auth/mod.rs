//! Authentication: register, login, logout, password flows and profile.

mod reducer;
mod store;

pub use reducer::{AuthAction, AuthOperation, AuthReducer, AuthState};
pub use store::AuthStore;
