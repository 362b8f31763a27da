use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Entity, RecordId, ResourceKind};

/// Money spent, grouped by category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    #[serde(rename = "_id")]
    pub id: RecordId,
    pub category: String,
    pub amount: f64,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseDraft {
    pub category: String,
    pub amount: f64,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpensePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
}

impl Entity for Expense {
    type Draft = ExpenseDraft;
    type Patch = ExpensePatch;

    const KIND: ResourceKind = ResourceKind {
        path: "expenses",
        singular: "expense",
        plural: "expenses",
        label: "Expense",
        success_suffix: "",
        fetch_fallback: "Failed to fetch expenses",
    };

    fn id(&self) -> &RecordId {
        &self.id
    }
}
