//! Runtime settings read from the environment.

use std::time::Duration;

use chrono::TimeDelta;
use mockable::Env;
use thiserror::Error;
use tracing::debug;
use url::Url;

pub const API_URL_ENV: &str = "BAKEHOUSE_API_URL";
pub const REQUEST_TIMEOUT_ENV: &str = "BAKEHOUSE_REQUEST_TIMEOUT_MS";
pub const SEARCH_DEBOUNCE_ENV: &str = "BAKEHOUSE_SEARCH_DEBOUNCE_MS";
pub const ORDER_SEARCH_DEBOUNCE_ENV: &str = "BAKEHOUSE_ORDER_SEARCH_DEBOUNCE_MS";
pub const MESSAGE_CLEAR_ENV: &str = "BAKEHOUSE_MESSAGE_CLEAR_MS";
pub const DUE_SOON_HOURS_ENV: &str = "BAKEHOUSE_DUE_SOON_HOURS";

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 400;
const DEFAULT_ORDER_SEARCH_DEBOUNCE_MS: u64 = 500;
const DEFAULT_MESSAGE_CLEAR_MS: u64 = 3_000;
const DEFAULT_DUE_SOON_HOURS: u32 = 24;
/// Longest accepted due-soon look-ahead: one year.
pub const MAX_DUE_SOON_HOURS: u32 = 24 * 365;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{name} is not a valid URL: {value}")]
    InvalidUrl { name: &'static str, value: String },
    #[error("{name} must be {expected}, got {value:?}")]
    InvalidNumber {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    /// Base URL every endpoint path is joined onto.
    pub api_url: Url,
    pub request_timeout: Duration,
    /// Quiet period for the customer and expense search boxes.
    pub search_debounce: Duration,
    pub order_search_debounce: Duration,
    /// How long success and error messages stay visible.
    pub message_clear: Duration,
    pub due_soon_hours: u32,
}

impl DashboardConfig {
    /// Read settings from `env`, falling back to defaults for unset keys.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a key is set to an unparsable value.
    pub fn from_env<E: Env>(env: &E) -> Result<Self, ConfigError> {
        let api_url = match env.string(API_URL_ENV) {
            Some(value) => parse_url(API_URL_ENV, &value)?,
            None => parse_url(API_URL_ENV, DEFAULT_API_URL)?,
        };
        let config = Self {
            api_url,
            request_timeout: millis(env, REQUEST_TIMEOUT_ENV, DEFAULT_REQUEST_TIMEOUT_MS)?,
            search_debounce: millis(env, SEARCH_DEBOUNCE_ENV, DEFAULT_SEARCH_DEBOUNCE_MS)?,
            order_search_debounce: millis(
                env,
                ORDER_SEARCH_DEBOUNCE_ENV,
                DEFAULT_ORDER_SEARCH_DEBOUNCE_MS,
            )?,
            message_clear: millis(env, MESSAGE_CLEAR_ENV, DEFAULT_MESSAGE_CLEAR_MS)?,
            due_soon_hours: hours(env)?,
        };
        debug!(api_url = %config.api_url, "configuration loaded");
        Ok(config)
    }

    pub fn due_soon_window(&self) -> TimeDelta {
        TimeDelta::hours(i64::from(self.due_soon_hours))
    }
}

pub(crate) fn parse_url(name: &'static str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value.trim()).map_err(|_| ConfigError::InvalidUrl {
        name,
        value: value.to_owned(),
    })?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidUrl {
            name,
            value: value.to_owned(),
        });
    }
    Ok(url)
}

fn millis<E: Env>(env: &E, name: &'static str, default: u64) -> Result<Duration, ConfigError> {
    let Some(value) = env.string(name) else {
        return Ok(Duration::from_millis(default));
    };
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|_| ConfigError::InvalidNumber {
            name,
            value,
            expected: "a whole number of milliseconds",
        })
}

fn hours<E: Env>(env: &E) -> Result<u32, ConfigError> {
    let Some(value) = env.string(DUE_SOON_HOURS_ENV) else {
        return Ok(DEFAULT_DUE_SOON_HOURS);
    };
    match value.trim().parse::<u32>() {
        Ok(hours) if (1..=MAX_DUE_SOON_HOURS).contains(&hours) => Ok(hours),
        _ => Err(ConfigError::InvalidNumber {
            name: DUE_SOON_HOURS_ENV,
            value,
            expected: "between 1 and 8760 hours",
        }),
    }
}
