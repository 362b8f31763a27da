use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Entity, RecordId, ResourceKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(rename = "_id")]
    pub id: RecordId,
    pub name: String,
    pub contact: String,
    pub location: String,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDraft {
    pub name: String,
    pub contact: String,
    pub location: String,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
}

impl Entity for Customer {
    type Draft = CustomerDraft;
    type Patch = CustomerPatch;

    const KIND: ResourceKind = ResourceKind {
        path: "customers",
        singular: "customer",
        plural: "customers",
        label: "Customer",
        success_suffix: "",
        fetch_fallback: "Failed to fetch customers",
    };

    fn id(&self) -> &RecordId {
        &self.id
    }
}
