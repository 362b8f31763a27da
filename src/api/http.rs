//! Reqwest-backed adapter for every API port.
//!
//! The adapter owns transport details only: URL building, JSON envelopes,
//! status mapping and the cookie jar that carries the login session.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::{ApiError, AuthApi, ResourceApi, RevenueApi};
use crate::model::{
    ChangePasswordRequest, Entity, LoginRequest, MonthlyRevenue, Profile, ProfileUpdate,
    RecordId, RegisterRequest, Session, User,
};

/// HTTP client shared by every store.
///
/// Clones share one connection pool and one cookie jar, so a login through
/// the auth store authenticates every resource store built from the same
/// client.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base: Url,
}

impl HttpClient {
    /// Build a client against `base`, e.g. `http://localhost:5000/api`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .cookie_store(true)
            .build()?;
        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        endpoint(&self.base, path)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Vec<u8>, ApiError> {
        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        debug!(status = status.as_u16(), bytes = body.len(), "api response");
        if !status.is_success() {
            return Err(rejection(status, body.as_ref()));
        }
        Ok(body.to_vec())
    }

    async fn get_field<T: DeserializeOwned>(&self, path: &str, field: &str) -> Result<T, ApiError> {
        let body = self.send(self.client.get(self.url(path)?)).await?;
        decode_field(&body, field)
    }

    async fn post_message<B>(&self, path: &str, payload: &B) -> Result<String, ApiError>
    where
        B: serde::Serialize + ?Sized + Sync,
    {
        let body = self
            .send(self.client.post(self.url(path)?).json(payload))
            .await?;
        decode_message(&body)
    }
}

/// Join `path` onto the base URL, keeping the base's own path prefix.
pub(crate) fn endpoint(base: &Url, path: &str) -> Result<Url, ApiError> {
    let mut url = base.clone();
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|()| ApiError::invalid(format!("base URL `{base}` cannot carry a path")))?;
        segments.pop_if_empty();
        for segment in path.split('/').filter(|segment| !segment.is_empty()) {
            segments.push(segment);
        }
    }
    Ok(url)
}

/// `endpoint` for one record; the id is always a single path segment.
pub(crate) fn record_endpoint(base: &Url, path: &str, id: &RecordId) -> Result<Url, ApiError> {
    let mut url = endpoint(base, path)?;
    url.path_segments_mut()
        .map_err(|()| ApiError::invalid(format!("base URL `{base}` cannot carry a path")))?
        .push(id.as_str());
    Ok(url)
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

fn rejection(status: StatusCode, body: &[u8]) -> ApiError {
    let message = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|body| body.message);
    ApiError::rejected(status.as_u16(), message)
}

fn map_transport_error(error: reqwest::Error) -> ApiError {
    if error.is_timeout() {
        ApiError::transport(format!("request timed out: {error}"))
    } else {
        ApiError::transport(error.to_string())
    }
}

/// Decode `{ "<field>": ... }` into `T`.
pub(crate) fn decode_field<T: DeserializeOwned>(body: &[u8], field: &str) -> Result<T, ApiError> {
    let mut envelope: Value = serde_json::from_slice(body)
        .map_err(|error| ApiError::decode(format!("invalid JSON payload: {error}")))?;
    let value = envelope
        .get_mut(field)
        .map(Value::take)
        .filter(|value| !value.is_null())
        .ok_or_else(|| ApiError::decode(format!("response is missing `{field}`")))?;
    serde_json::from_value(value)
        .map_err(|error| ApiError::decode(format!("invalid `{field}`: {error}")))
}

fn decode_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body)
        .map_err(|error| ApiError::decode(format!("invalid JSON payload: {error}")))
}

fn decode_message(body: &[u8]) -> Result<String, ApiError> {
    let body: ErrorBody = decode_body(body)?;
    Ok(body.message.unwrap_or_default())
}

#[async_trait]
impl<E: Entity> ResourceApi<E> for HttpClient {
    async fn list(&self, search: Option<&str>) -> Result<Vec<E>, ApiError> {
        let mut request = self.client.get(self.url(E::KIND.path)?);
        if let Some(term) = search.map(str::trim).filter(|term| !term.is_empty()) {
            request = request.query(&[("search", term)]);
        }
        let body = self.send(request).await?;
        decode_field(&body, E::KIND.plural)
    }

    async fn create(&self, draft: &E::Draft) -> Result<E, ApiError> {
        let request = self.client.post(self.url(E::KIND.path)?).json(draft);
        let body = self.send(request).await?;
        decode_field(&body, E::KIND.singular)
    }

    async fn update(&self, id: &RecordId, patch: &E::Patch) -> Result<E, ApiError> {
        let url = record_endpoint(&self.base, E::KIND.path, id)?;
        let request = self.client.put(url).json(patch);
        let body = self.send(request).await?;
        decode_field(&body, E::KIND.singular)
    }

    async fn delete(&self, id: &RecordId) -> Result<(), ApiError> {
        let url = record_endpoint(&self.base, E::KIND.path, id)?;
        self.send(self.client.delete(url)).await?;
        Ok(())
    }
}

#[async_trait]
impl RevenueApi for HttpClient {
    async fn total_revenue(&self) -> Result<f64, ApiError> {
        self.get_field("orders/revenue", "totalRevenue").await
    }

    async fn monthly_revenue(&self) -> Result<MonthlyRevenue, ApiError> {
        let body = self
            .send(self.client.get(self.url("orders/monthlyrevenue")?))
            .await?;
        decode_body(&body)
    }
}

#[async_trait]
impl AuthApi for HttpClient {
    async fn register(&self, request: &RegisterRequest) -> Result<Session, ApiError> {
        let body = self
            .send(self.client.post(self.url("auth/register")?).json(request))
            .await?;
        decode_body(&body)
    }

    async fn login(&self, request: &LoginRequest) -> Result<Session, ApiError> {
        let body = self
            .send(self.client.post(self.url("auth/login")?).json(request))
            .await?;
        decode_body(&body)
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.send(self.client.post(self.url("auth/logout")?)).await?;
        Ok(())
    }

    async fn forgot_password(&self, email: &str) -> Result<String, ApiError> {
        self.post_message("auth/forgotPassword", &serde_json::json!({ "email": email }))
            .await
    }

    async fn reset_password(&self, token: &str, password: &str) -> Result<String, ApiError> {
        let mut url = endpoint(&self.base, "auth/resetPassword")?;
        url.path_segments_mut()
            .map_err(|()| ApiError::invalid("reset URL cannot carry a token"))?
            .push(token);
        let body = self
            .send(
                self.client
                    .post(url)
                    .json(&serde_json::json!({ "password": password })),
            )
            .await?;
        decode_message(&body)
    }

    async fn change_password(&self, request: &ChangePasswordRequest) -> Result<String, ApiError> {
        self.post_message("auth/changePassword", request).await
    }

    async fn profile(&self) -> Result<Profile, ApiError> {
        self.get_field("auth/profile", "seller").await
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<Profile, ApiError> {
        let body = self
            .send(self.client.put(self.url("auth/profile/edit")?).json(update))
            .await?;
        decode_field(&body, "seller")
    }

    async fn current_user(&self) -> Result<User, ApiError> {
        self.get_field("auth/currentUser", "user").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Product;
    use rstest::rstest;

    fn base(raw: &str) -> Url {
        Url::parse(raw).unwrap()
    }

    #[rstest]
    #[case("http://localhost:5000/api", "products", "http://localhost:5000/api/products")]
    #[case("http://localhost:5000/api/", "products", "http://localhost:5000/api/products")]
    #[case("http://localhost:5000", "orders/revenue", "http://localhost:5000/orders/revenue")]
    #[case("https://bakery.test/v1/api", "/customers/c 1", "https://bakery.test/v1/api/customers/c%201")]
    fn endpoint_keeps_base_prefix(#[case] root: &str, #[case] path: &str, #[case] expected: &str) {
        assert_eq!(endpoint(&base(root), path).unwrap().as_str(), expected);
    }

    #[test]
    fn endpoint_rejects_cannot_be_a_base_urls() {
        let error = endpoint(&base("mailto:owner@bakery.test"), "products").unwrap_err();
        assert!(matches!(error, ApiError::Invalid { .. }));
    }

    #[test]
    fn record_id_is_a_single_segment() {
        let root = base("http://localhost:5000/api");
        let url = record_endpoint(&root, "products", &RecordId::new("a/b")).unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/products/a%2Fb");

        let root = base("http://localhost:5000/api/");
        let url = record_endpoint(&root, "orders", &RecordId::new("o1")).unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/orders/o1");
    }

    #[test]
    fn decode_field_unwraps_envelope() {
        let body = br#"{"products":[{"_id":"p1","name":"Rye","quantity":3,"date":"2025-01-01T00:00:00Z"}]}"#;
        let products: Vec<Product> = decode_field(body, "products").unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name, "Rye");
    }

    #[rstest]
    #[case(br#"{"other":[]}"#.as_slice())]
    #[case(br#"{"product":null}"#.as_slice())]
    #[case(b"not json".as_slice())]
    fn decode_field_reports_bad_envelopes(#[case] body: &[u8]) {
        let error = decode_field::<Product>(body, "product").unwrap_err();
        assert!(matches!(error, ApiError::Decode { .. }));
    }

    #[test]
    fn rejection_reads_server_message() {
        let error = rejection(StatusCode::CONFLICT, br#"{"message":"name taken"}"#);
        assert_eq!(error, ApiError::rejected(409, Some("name taken".to_owned())));
    }

    #[test]
    fn rejection_tolerates_non_json_bodies() {
        let error = rejection(StatusCode::BAD_GATEWAY, b"<html>bad gateway</html>");
        assert_eq!(error, ApiError::rejected(502, None));
    }

    #[test]
    fn monthly_revenue_defaults_missing_months() {
        let revenue: MonthlyRevenue = decode_body(br#"{"currentMonth":120.5}"#).unwrap();
        assert_eq!(revenue.current_month, 120.5);
        assert_eq!(revenue.last_month, 0.0);
    }
}
