//! Headline figures for the dashboard page.
//!
//! The dashboard keeps its own unfiltered order and expense slices, so a
//! search on another page never changes the totals shown here. Every figure
//! is recomputed from the current slices on each call.

use std::sync::Arc;

use chrono::{Datelike, Local, TimeZone, Weekday};
use serde::Serialize;

use crate::api::{ResourceApi, RevenueApi};
use crate::model::{Expense, MonthlyRevenue, Order};
use crate::notify::Notifier;
use crate::orders::OrderStore;
use crate::resource::ResourceStore;

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

pub fn total_revenue(orders: &[Order]) -> f64 {
    orders.iter().map(Order::total).sum()
}

pub fn total_expenses(expenses: &[Expense]) -> f64 {
    expenses.iter().map(|expense| expense.amount).sum()
}

pub fn net_profit(orders: &[Order], expenses: &[Expense]) -> f64 {
    total_revenue(orders) - total_expenses(expenses)
}

/// Month-over-month revenue change in percent; zero without a previous month.
pub fn revenue_change(monthly: &MonthlyRevenue) -> f64 {
    if monthly.last_month == 0.0 {
        return 0.0;
    }
    (monthly.current_month - monthly.last_month) / monthly.last_month * 100.0
}

/// Net profit against last month's revenue less current expenses, in percent.
///
/// Zero without a previous month. A zero baseline is treated as one.
pub fn net_profit_change(net_profit: f64, total_expenses: f64, monthly: &MonthlyRevenue) -> f64 {
    if monthly.last_month == 0.0 {
        return 0.0;
    }
    let baseline = monthly.last_month - total_expenses;
    let divisor = if baseline == 0.0 { 1.0 } else { baseline };
    (net_profit - baseline) / divisor * 100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DaySales {
    pub day: Weekday,
    pub sales: f64,
}

/// Order value grouped by the weekday the order was placed, Monday first.
///
/// Days are taken in `tz`; orders without a creation time are skipped.
pub fn weekday_sales<Tz: TimeZone>(orders: &[Order], tz: &Tz) -> [DaySales; 7] {
    let mut totals = WEEK.map(|day| DaySales { day, sales: 0.0 });
    for order in orders {
        let Some(created) = order.created_at else {
            continue;
        };
        let day = created.with_timezone(tz).weekday();
        totals[day.num_days_from_monday() as usize].sales += order.total();
    }
    totals
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub total_revenue: f64,
    pub total_expenses: f64,
    pub net_profit: f64,
    pub order_count: usize,
    pub revenue_change: f64,
    pub net_profit_change: f64,
    pub weekday_sales: [DaySales; 7],
}

impl DashboardSummary {
    pub fn compute<Tz: TimeZone>(
        orders: &[Order],
        expenses: &[Expense],
        monthly: &MonthlyRevenue,
        tz: &Tz,
    ) -> Self {
        let total_revenue = total_revenue(orders);
        let total_expenses = total_expenses(expenses);
        let net_profit = total_revenue - total_expenses;
        Self {
            total_revenue,
            total_expenses,
            net_profit,
            order_count: orders.len(),
            revenue_change: revenue_change(monthly),
            net_profit_change: net_profit_change(net_profit, total_expenses, monthly),
            weekday_sales: weekday_sales(orders, tz),
        }
    }
}

/// Dashboard data: unfiltered orders and expenses plus monthly revenue.
#[derive(Clone)]
pub struct Dashboard {
    orders: OrderStore,
    expenses: ResourceStore<Expense>,
}

impl Dashboard {
    pub fn new(
        orders: Arc<dyn ResourceApi<Order>>,
        revenue: Arc<dyn RevenueApi>,
        expenses: Arc<dyn ResourceApi<Expense>>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            orders: OrderStore::new(orders, revenue, notifier),
            expenses: ResourceStore::new(expenses),
        }
    }

    pub fn orders(&self) -> &OrderStore {
        &self.orders
    }

    pub fn expenses(&self) -> &ResourceStore<Expense> {
        &self.expenses
    }

    /// Reload orders, expenses and monthly revenue concurrently.
    pub async fn refresh(&self) {
        tokio::join!(
            self.orders.fetch_all(None),
            self.expenses.fetch_all(None),
            self.orders.fetch_monthly_revenue(),
        );
    }

    /// Figures in the local time zone.
    pub fn summary(&self) -> DashboardSummary {
        self.summary_in(&Local)
    }

    pub fn summary_in<Tz: TimeZone>(&self, tz: &Tz) -> DashboardSummary {
        let monthly = self.orders.revenue().monthly;
        let expenses = self.expenses.items();
        self.orders
            .read(|state| DashboardSummary::compute(&state.items, &expenses, &monthly, tz))
    }
}
