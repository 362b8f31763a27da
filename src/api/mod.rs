//! The REST boundary: ports, errors and the HTTP adapter.

mod error;
mod http;
mod ports;

pub use error::ApiError;
pub use http::HttpClient;
#[cfg(test)]
pub use ports::MockAuthApi;
pub use ports::{AuthApi, ResourceApi, RevenueApi};
