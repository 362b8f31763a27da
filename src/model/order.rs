use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{is_blank, Entity, RecordId, ResourceKind};

/// Fulfilment stage of an order.
///
/// Orders only move forward: `Pending`, then `Processing`, then `Completed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Completed,
}

impl OrderStatus {
    /// The stage after this one, or `None` once completed.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::Processing),
            Self::Processing => Some(Self::Completed),
            Self::Completed => None,
        }
    }

    pub fn is_completed(self) -> bool {
        self == Self::Completed
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_name: String,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: RecordId,
    pub customer_name: String,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    /// Due date.
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<f64>,
}

impl Order {
    /// Order value: the server total when present, else the item prices summed.
    pub fn total(&self) -> f64 {
        self.total_amount
            .unwrap_or_else(|| self.items.iter().map(|item| item.price).sum())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    pub customer_name: String,
    pub items: Vec<OrderItem>,
    pub date: Option<DateTime<Utc>>,
    pub status: OrderStatus,
}

impl OrderDraft {
    /// A new pending order.
    pub fn new(customer_name: impl Into<String>, date: DateTime<Utc>) -> Self {
        Self {
            customer_name: customer_name.into(),
            items: Vec::new(),
            date: Some(date),
            status: OrderStatus::Pending,
        }
    }

    /// Add a line unless the product is already on the order.
    pub fn with_item(mut self, product_name: impl Into<String>, price: f64) -> Self {
        let product_name = product_name.into();
        if !self.items.iter().any(|item| item.product_name == product_name) {
            self.items.push(OrderItem {
                product_name,
                price,
            });
        }
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<OrderItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
}

impl OrderPatch {
    pub fn status(status: OrderStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

impl Entity for Order {
    type Draft = OrderDraft;
    type Patch = OrderPatch;

    const KIND: ResourceKind = ResourceKind {
        path: "orders",
        singular: "order",
        plural: "orders",
        label: "Order",
        success_suffix: "",
        fetch_fallback: "Failed to fetch orders",
    };

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn validate(draft: &OrderDraft) -> Result<(), String> {
        if is_blank(&draft.customer_name) || draft.items.is_empty() || draft.date.is_none() {
            return Err(INCOMPLETE.to_owned());
        }
        check_prices(&draft.items)
    }

    fn validate_patch(patch: &OrderPatch) -> Result<(), String> {
        let blank_name = patch.customer_name.as_deref().is_some_and(is_blank);
        let no_items = patch.items.as_ref().is_some_and(Vec::is_empty);
        if blank_name || no_items {
            return Err(INCOMPLETE.to_owned());
        }
        patch.items.as_deref().map_or(Ok(()), check_prices)
    }
}

const INCOMPLETE: &str = "Please fill all fields and add at least one product";

fn check_prices(items: &[OrderItem]) -> Result<(), String> {
    match items.iter().find(|item| item.price.is_nan() || item.price <= 0.0) {
        Some(item) => Err(format!("Price for {} is required", item.product_name)),
        None => Ok(()),
    }
}

/// Revenue for the current and previous calendar month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyRevenue {
    #[serde(default)]
    pub current_month: f64,
    #[serde(default)]
    pub last_month: f64,
}
