//! # Bakehouse
//!
//! Client-side state for a bakery management dashboard.
//!
//! The crate keeps a local, observable copy of the bakery's records
//! (products, expenses, customers, orders) and the signed-in account, and
//! keeps them in step with a REST backend:
//!
//! - [`Store`] is a thread-safe state container driven by typed actions
//!   through a [`Reducer`], with RAII subscriptions.
//! - [`ResourceStore`] is the fetch/create/update/delete contract
//!   instantiated once per record type.
//! - [`OrderStore`] adds the order status progression and revenue figures;
//!   [`DueSoonWatch`] counts orders falling due.
//! - [`AuthStore`] covers registration, login and the password flows.
//! - [`Dashboard`] derives revenue, expenses, net profit and weekday sales.
//! - [`App`] builds all of the above against one HTTP client.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use bakehouse::{App, DashboardConfig};
//! use bakehouse::notify::TracingNotifier;
//! use mockable::{DefaultClock, DefaultEnv};
//!
//! # async fn run() -> Result<(), bakehouse::Error> {
//! let config = DashboardConfig::from_env(&DefaultEnv::new())?;
//! let app = App::connect(config, Arc::new(TracingNotifier), Arc::new(DefaultClock))?;
//!
//! app.products.fetch_all(None).await;
//! for product in app.products.items() {
//!     println!("{} x{}", product.name, product.quantity);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod dashboard;
pub mod debounce;
mod error;
pub mod model;
pub mod notify;
pub mod orders;
pub mod resource;
pub mod store;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use app::{App, Ports};
pub use auth::AuthStore;
pub use config::DashboardConfig;
pub use dashboard::{Dashboard, DashboardSummary};
pub use error::Error;
pub use orders::{DueSoonWatch, OrderStore};
pub use resource::ResourceStore;
pub use store::{Reducer, Store, Subscription};
