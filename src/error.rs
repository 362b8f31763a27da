use thiserror::Error;

use crate::config::ConfigError;

/// Failures while assembling the client. Request failures never surface
/// here; stores record them as state instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("timers need a tokio runtime: {0}")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}
