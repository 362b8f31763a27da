//! Orders: the resource store plus status progression and revenue figures.

mod due_soon;
mod revenue;

use std::ops::Deref;
use std::sync::Arc;

use tracing::{debug, warn};

pub use due_soon::{due_soon_count, due_soon_window, DueSoonWatch, DUE_SOON_HOURS};
pub use revenue::{RevenueAction, RevenueReducer, RevenueState};

use crate::api::{ResourceApi, RevenueApi};
use crate::model::{Order, OrderPatch, OrderStatus, RecordId};
use crate::notify::{Notice, Notifier};
use crate::resource::ResourceStore;
use crate::store::Store;

const ALREADY_COMPLETED: &str = "Order already completed!";

/// Outcome of [`OrderStore::advance_status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusAdvance {
    /// The server accepted the move to the given status.
    Requested(OrderStatus),
    /// The update to the given status was refused; the order did not move.
    Failed(OrderStatus),
    /// The order is already completed; nothing was sent.
    AlreadyCompleted,
    /// No order with that id is loaded.
    Unknown,
}

/// Order collection with the status machine and revenue endpoints.
///
/// Dereferences to the underlying [`ResourceStore`] for the CRUD operations.
#[derive(Clone)]
pub struct OrderStore {
    orders: ResourceStore<Order>,
    revenue: Store<RevenueReducer>,
    revenue_api: Arc<dyn RevenueApi>,
    notifier: Arc<dyn Notifier>,
}

impl OrderStore {
    pub fn new(
        api: Arc<dyn ResourceApi<Order>>,
        revenue_api: Arc<dyn RevenueApi>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            orders: ResourceStore::new(api),
            revenue: Store::new(RevenueReducer, RevenueState::default()),
            revenue_api,
            notifier,
        }
    }

    pub fn resource(&self) -> &ResourceStore<Order> {
        &self.orders
    }

    /// Move the order one step along `Pending → Processing → Completed`.
    ///
    /// A completed order stays completed and only produces an informational
    /// notice.
    pub async fn advance_status(&self, id: &RecordId) -> StatusAdvance {
        let Some(status) = self.orders.read(|state| state.find(id).map(|order| order.status))
        else {
            debug!(%id, "status change for unknown order ignored");
            return StatusAdvance::Unknown;
        };

        match status.next() {
            Some(next) if self.orders.update(id, OrderPatch::status(next)).await => {
                StatusAdvance::Requested(next)
            }
            Some(next) => StatusAdvance::Failed(next),
            None => {
                self.notifier.notify(Notice::info(ALREADY_COMPLETED));
                StatusAdvance::AlreadyCompleted
            }
        }
    }

    pub fn revenue(&self) -> RevenueState {
        self.revenue.get()
    }

    /// Load the all-time revenue total.
    ///
    /// Failures are logged and leave the previous total in place.
    pub async fn fetch_revenue(&self) {
        match self.revenue_api.total_revenue().await {
            Ok(total) => self.revenue.dispatch(RevenueAction::TotalLoaded(total)),
            Err(error) => warn!(%error, "revenue request failed"),
        }
    }

    pub async fn fetch_monthly_revenue(&self) {
        self.revenue.dispatch(RevenueAction::MonthlyPending);
        match self.revenue_api.monthly_revenue().await {
            Ok(monthly) => self.revenue.dispatch(RevenueAction::MonthlyLoaded(monthly)),
            Err(error) => {
                warn!(%error, "monthly revenue request failed");
                self.revenue.dispatch(RevenueAction::Rejected(
                    error.user_message("Something went wrong"),
                ));
            }
        }
    }
}

impl Deref for OrderStore {
    type Target = ResourceStore<Order>;

    fn deref(&self) -> &ResourceStore<Order> {
        &self.orders
    }
}
