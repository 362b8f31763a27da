//! Ports the stores call to reach the server.
//!
//! Stores depend only on these traits, so tests and offline tools can swap
//! the HTTP adapter for an in-memory one.

use async_trait::async_trait;

use super::ApiError;
use crate::model::{
    ChangePasswordRequest, Entity, LoginRequest, MonthlyRevenue, Profile, ProfileUpdate,
    RecordId, RegisterRequest, Session, User,
};

/// CRUD access to one remote collection.
#[async_trait]
pub trait ResourceApi<E: Entity>: Send + Sync {
    /// List the collection, filtered server-side when `search` is given.
    async fn list(&self, search: Option<&str>) -> Result<Vec<E>, ApiError>;

    /// Create a record and return its canonical, id-assigned form.
    async fn create(&self, draft: &E::Draft) -> Result<E, ApiError>;

    /// Apply `patch` to the record and return the updated record.
    async fn update(&self, id: &RecordId, patch: &E::Patch) -> Result<E, ApiError>;

    async fn delete(&self, id: &RecordId) -> Result<(), ApiError>;
}

/// Aggregates computed by the server over all orders.
#[async_trait]
pub trait RevenueApi: Send + Sync {
    async fn total_revenue(&self) -> Result<f64, ApiError>;

    async fn monthly_revenue(&self) -> Result<MonthlyRevenue, ApiError>;
}

/// Account and session endpoints under `/auth`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn register(&self, request: &RegisterRequest) -> Result<Session, ApiError>;

    async fn login(&self, request: &LoginRequest) -> Result<Session, ApiError>;

    async fn logout(&self) -> Result<(), ApiError>;

    /// Request a reset link; returns the server's confirmation message.
    async fn forgot_password(&self, email: &str) -> Result<String, ApiError>;

    async fn reset_password(&self, token: &str, password: &str) -> Result<String, ApiError>;

    async fn change_password(&self, request: &ChangePasswordRequest) -> Result<String, ApiError>;

    async fn profile(&self) -> Result<Profile, ApiError>;

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<Profile, ApiError>;

    async fn current_user(&self) -> Result<User, ApiError>;
}
