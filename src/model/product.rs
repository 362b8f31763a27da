use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{is_blank, Entity, RecordId, ResourceKind};

/// An inventory line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: RecordId,
    pub name: String,
    pub quantity: u32,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub name: String,
    pub quantity: u32,
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
}

impl Entity for Product {
    type Draft = ProductDraft;
    type Patch = ProductPatch;

    const KIND: ResourceKind = ResourceKind {
        path: "products",
        singular: "product",
        plural: "products",
        label: "Product",
        success_suffix: "!",
        fetch_fallback: "Something went wrong",
    };

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn validate(draft: &ProductDraft) -> Result<(), String> {
        if is_blank(&draft.name) || draft.quantity == 0 || draft.date.is_none() {
            return Err("Please fill all fields!".to_owned());
        }
        Ok(())
    }

    fn validate_patch(patch: &ProductPatch) -> Result<(), String> {
        if patch.name.as_deref().is_some_and(is_blank) || patch.quantity == Some(0) {
            return Err("Please fill all fields!".to_owned());
        }
        Ok(())
    }
}
