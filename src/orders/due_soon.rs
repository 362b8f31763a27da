use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;

use crate::model::Order;
use crate::notify::{Notice, Notifier};
use crate::resource::ResourceStore;
use crate::store::Subscription;

/// Look-ahead used by the dashboard badge, in hours.
pub const DUE_SOON_HOURS: i64 = 24;

pub fn due_soon_window() -> TimeDelta {
    TimeDelta::hours(DUE_SOON_HOURS)
}

/// Count open orders due between `now` and `now + window`, inclusive.
pub fn due_soon_count(orders: &[Order], now: DateTime<Utc>, window: TimeDelta) -> usize {
    let horizon = now
        .checked_add_signed(window)
        .unwrap_or(DateTime::<Utc>::MAX_UTC);
    orders
        .iter()
        .filter(|order| !order.status.is_completed())
        .filter(|order| order.date >= now && order.date <= horizon)
        .count()
}

fn window_label(window: TimeDelta) -> String {
    match window.num_hours() {
        1 => "1 hour".to_owned(),
        hours => format!("{hours} hours"),
    }
}

struct WatchState {
    count: usize,
}

/// Badge and reminders for orders that fall due soon.
///
/// The count is recomputed on every change to the order store. A reminder
/// fires once each time the count changes to a new non-zero value, not on
/// every change.
pub struct DueSoonWatch {
    state: Arc<Mutex<WatchState>>,
    notifier: Arc<dyn Notifier>,
    window: TimeDelta,
    _subscription: Subscription,
}

impl DueSoonWatch {
    /// Start watching `orders`; the current collection is evaluated at once.
    pub fn attach(
        orders: &ResourceStore<Order>,
        clock: Arc<dyn Clock + Send + Sync>,
        notifier: Arc<dyn Notifier>,
        window: TimeDelta,
    ) -> Self {
        let state = Arc::new(Mutex::new(WatchState { count: 0 }));

        let evaluate = {
            let state = Arc::clone(&state);
            let notifier = Arc::clone(&notifier);
            move |items: &[Order]| {
                let count = due_soon_count(items, clock.utc(), window);
                let mut watch = state.lock().unwrap_or_else(PoisonError::into_inner);
                if count != watch.count && count > 0 {
                    notifier.notify(Notice::success(reminder(count, window)));
                }
                watch.count = count;
            }
        };

        evaluate(&orders.items());
        let subscription = orders.subscribe(move |current| evaluate(&current.items));

        Self {
            state,
            notifier,
            window,
            _subscription: subscription,
        }
    }

    pub fn count(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .count
    }

    /// Badge value; `None` hides the badge.
    pub fn badge(&self) -> Option<usize> {
        Some(self.count()).filter(|count| *count > 0)
    }

    /// Repeat the reminder on demand, e.g. when the bell is hovered.
    pub fn hover(&self) {
        let notice = match self.count() {
            0 => Notice::info(format!(
                "No pending orders within {}!",
                window_label(self.window)
            )),
            count => Notice::info(reminder(count, self.window)),
        };
        self.notifier.notify(notice);
    }
}

fn reminder(count: usize, window: TimeDelta) -> String {
    format!(
        "You have {count} order(s) due within {}!",
        window_label(window)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{OrderStatus, RecordId};
    use chrono::TimeZone;
    use rstest::rstest;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 2, 12, 0, 0).unwrap()
    }

    fn order(id: &str, offset: TimeDelta, status: OrderStatus) -> Order {
        Order {
            id: RecordId::new(id),
            customer_name: "Ama".to_owned(),
            items: Vec::new(),
            date: now() + offset,
            status,
            created_at: None,
            total_amount: None,
        }
    }

    #[rstest]
    #[case(TimeDelta::hours(1), OrderStatus::Pending, 1)]
    #[case(TimeDelta::zero(), OrderStatus::Processing, 1)]
    #[case(TimeDelta::hours(24), OrderStatus::Pending, 1)]
    #[case(TimeDelta::hours(25), OrderStatus::Pending, 0)]
    #[case(TimeDelta::minutes(-1), OrderStatus::Pending, 0)]
    #[case(TimeDelta::hours(2), OrderStatus::Completed, 0)]
    fn window_bounds_are_inclusive(
        #[case] offset: TimeDelta,
        #[case] status: OrderStatus,
        #[case] expected: usize,
    ) {
        let orders = [order("1", offset, status)];
        assert_eq!(due_soon_count(&orders, now(), due_soon_window()), expected);
    }

    #[test]
    fn oversized_window_saturates_at_the_latest_date() {
        let orders = [
            order("1", TimeDelta::days(3650), OrderStatus::Pending),
            order("2", TimeDelta::hours(-1), OrderStatus::Pending),
        ];
        let window = TimeDelta::days(1_000_000_000);
        assert_eq!(due_soon_count(&orders, now(), window), 1);
    }

    #[test]
    fn reminder_wording() {
        assert_eq!(
            reminder(2, due_soon_window()),
            "You have 2 order(s) due within 24 hours!"
        );
    }
}
