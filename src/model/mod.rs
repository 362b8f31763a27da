//! Records exchanged with the bakery API.
//!
//! Every collection record implements [`Entity`], which ties the record to
//! its REST path, its JSON envelope names and its draft/patch payloads.

mod auth;
mod customer;
mod expense;
mod order;
mod product;

use std::fmt::{self, Debug, Display};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub use auth::{
    ChangePasswordRequest, LoginRequest, Profile, ProfileUpdate, RegisterRequest, Session, User,
};
pub use customer::{Customer, CustomerDraft, CustomerPatch};
pub use expense::{Expense, ExpenseDraft, ExpensePatch};
pub use order::{MonthlyRevenue, Order, OrderDraft, OrderItem, OrderPatch, OrderStatus};
pub use product::{Product, ProductDraft, ProductPatch};

/// Server-assigned record identifier (`_id` on the wire).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Wrap a raw identifier.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for RecordId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

/// Static description of one REST collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceKind {
    /// Collection path relative to the API base, e.g. `products`.
    pub path: &'static str,
    /// Envelope key of a single record, e.g. `product`.
    pub singular: &'static str,
    /// Envelope key of a record list, e.g. `products`.
    pub plural: &'static str,
    /// Human label used in success messages.
    pub label: &'static str,
    /// Appended to success messages, e.g. `!`.
    pub success_suffix: &'static str,
    /// Error shown when a list request fails without a server message.
    pub fetch_fallback: &'static str,
}

/// A record held in a resource store.
pub trait Entity:
    Clone + Debug + PartialEq + Send + Sync + Serialize + DeserializeOwned + 'static
{
    /// Payload submitted on create.
    type Draft: Serialize + Debug + Send + Sync + 'static;
    /// Payload submitted on update; absent fields are left untouched.
    type Patch: Serialize + Debug + Send + Sync + 'static;

    /// Collection this record belongs to.
    const KIND: ResourceKind;

    /// Server-assigned identifier.
    fn id(&self) -> &RecordId;

    /// Reject a draft before it is sent.
    ///
    /// The returned message is shown to the user as-is.
    fn validate(_draft: &Self::Draft) -> Result<(), String> {
        Ok(())
    }

    /// Reject an edit before it is sent; only the fields the patch sets are
    /// checked.
    fn validate_patch(_patch: &Self::Patch) -> Result<(), String> {
        Ok(())
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
