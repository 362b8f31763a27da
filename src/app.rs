//! Explicit construction of every store the dashboard uses.

use std::sync::Arc;

use mockable::Clock;
use tracing::info;

use crate::api::{AuthApi, HttpClient, ResourceApi, RevenueApi};
use crate::auth::AuthStore;
use crate::config::DashboardConfig;
use crate::dashboard::Dashboard;
use crate::debounce::SearchDebouncer;
use crate::model::{Customer, Entity, Expense, Order, Product};
use crate::notify::{MessageRelay, Notifier};
use crate::orders::{DueSoonWatch, OrderStore};
use crate::resource::ResourceStore;
use crate::Error;

/// The server ports the stores are built on.
#[derive(Clone)]
pub struct Ports {
    pub products: Arc<dyn ResourceApi<Product>>,
    pub expenses: Arc<dyn ResourceApi<Expense>>,
    pub customers: Arc<dyn ResourceApi<Customer>>,
    pub orders: Arc<dyn ResourceApi<Order>>,
    pub revenue: Arc<dyn RevenueApi>,
    pub auth: Arc<dyn AuthApi>,
}

impl Ports {
    /// Every port backed by one client, so all stores share its cookie jar.
    pub fn http(client: &HttpClient) -> Self {
        let client = Arc::new(client.clone());
        Self {
            products: client.clone(),
            expenses: client.clone(),
            customers: client.clone(),
            orders: client.clone(),
            revenue: client.clone(),
            auth: client,
        }
    }
}

/// Stores for every page, built once and handed out by reference.
pub struct App {
    config: DashboardConfig,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock + Send + Sync>,
    pub products: ResourceStore<Product>,
    pub expenses: ResourceStore<Expense>,
    pub customers: ResourceStore<Customer>,
    pub orders: OrderStore,
    pub auth: AuthStore,
    pub dashboard: Dashboard,
}

impl App {
    /// Build an app talking to the configured server.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] when the HTTP client cannot be built.
    pub fn connect(
        config: DashboardConfig,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock + Send + Sync>,
    ) -> Result<Self, Error> {
        let client = HttpClient::new(config.api_url.clone(), config.request_timeout)?;
        info!(api_url = %client.base_url(), "connecting");
        Ok(Self::with_ports(config, Ports::http(&client), notifier, clock))
    }

    pub fn with_ports(
        config: DashboardConfig,
        ports: Ports,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock + Send + Sync>,
    ) -> Self {
        Self {
            products: ResourceStore::new(ports.products),
            expenses: ResourceStore::new(Arc::clone(&ports.expenses)),
            customers: ResourceStore::new(ports.customers),
            orders: OrderStore::new(
                Arc::clone(&ports.orders),
                Arc::clone(&ports.revenue),
                Arc::clone(&notifier),
            ),
            auth: AuthStore::new(ports.auth),
            dashboard: Dashboard::new(
                ports.orders,
                ports.revenue,
                ports.expenses,
                Arc::clone(&notifier),
            ),
            config,
            notifier,
            clock,
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Show and expire `store`'s messages through the app notifier.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoRuntime`] outside a tokio runtime.
    pub fn relay<E: Entity>(&self, store: &ResourceStore<E>) -> Result<MessageRelay, Error> {
        MessageRelay::attach(store, Arc::clone(&self.notifier), self.config.message_clear)
    }

    /// # Errors
    ///
    /// Returns [`Error::NoRuntime`] outside a tokio runtime.
    pub fn customer_search(&self) -> Result<SearchDebouncer<Customer>, Error> {
        SearchDebouncer::new(self.customers.clone(), self.config.search_debounce)
    }

    /// # Errors
    ///
    /// Returns [`Error::NoRuntime`] outside a tokio runtime.
    pub fn expense_search(&self) -> Result<SearchDebouncer<Expense>, Error> {
        SearchDebouncer::new(self.expenses.clone(), self.config.search_debounce)
    }

    /// # Errors
    ///
    /// Returns [`Error::NoRuntime`] outside a tokio runtime.
    pub fn order_search(&self) -> Result<SearchDebouncer<Order>, Error> {
        SearchDebouncer::new(
            self.orders.resource().clone(),
            self.config.order_search_debounce,
        )
    }

    /// Watch the orders page collection for orders falling due.
    pub fn due_soon(&self) -> DueSoonWatch {
        DueSoonWatch::attach(
            self.orders.resource(),
            Arc::clone(&self.clock),
            Arc::clone(&self.notifier),
            self.config.due_soon_window(),
        )
    }
}
