//! Broker REST clients.
//!
//! Each client is built once from its config struct and shared by the
//! control handlers. Clients issue exactly one HTTP call per operation (the
//! Binance holdings fan-out excepted) and never retry.

pub mod binance;
pub mod groww;

use std::error::Error;
use std::fmt;
use std::time::Duration;

use serde_json::Value;

pub use binance::BinanceClient;
pub use groww::GrowwClient;

pub const DEFAULT_GROWW_BASE_URL: &str = "https://api.groww.in";
pub const DEFAULT_BINANCE_BASE_URL: &str = "https://api.binance.com";
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug)]
pub enum ProviderError {
    /// Credentials were not configured at startup.
    MissingCredentials(&'static str),
    Http(reqwest::Error),
    /// Non-2xx HTTP status.
    Status {
        provider: &'static str,
        status: u16,
        reason: String,
    },
    /// 2xx response whose body reports a failure.
    Rejected {
        provider: &'static str,
        message: String,
    },
    Decode(serde_json::Error),
}

impl ProviderError {
    pub(crate) fn status(provider: &'static str, status: reqwest::StatusCode) -> Self {
        Self::Status {
            provider,
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
        }
    }

    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::MissingCredentials(_))
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCredentials(message) => f.write_str(message),
            Self::Http(err) => write!(f, "{err}"),
            Self::Status {
                provider,
                status,
                reason,
            } => write!(f, "{provider} API error: {status} {reason}"),
            Self::Rejected { message, .. } => f.write_str(message),
            Self::Decode(err) => write!(f, "invalid response body: {err}"),
        }
    }
}

impl Error for ProviderError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Http(err) => Some(err),
            Self::Decode(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err)
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err)
    }
}

/// A decoded payload together with the raw response body it came from.
///
/// The raw body is surfaced unmodified as reference metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    pub payload: T,
    pub raw: Value,
}

/// Connection settings for the Groww REST API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrowwConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for GrowwConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_GROWW_BASE_URL.to_string(),
            timeout: DEFAULT_PROVIDER_TIMEOUT,
        }
    }
}

impl GrowwConfig {
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub const fn has_credentials(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Connection settings for the Binance REST API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinanceConfig {
    pub api_key: Option<String>,
    pub secret_key: Option<String>,
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for BinanceConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            secret_key: None,
            base_url: DEFAULT_BINANCE_BASE_URL.to_string(),
            timeout: DEFAULT_PROVIDER_TIMEOUT,
        }
    }
}

impl BinanceConfig {
    #[must_use]
    pub fn with_credentials(
        mut self,
        api_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        self.api_key = Some(api_key.into());
        self.secret_key = Some(secret_key.into());
        self
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub const fn has_credentials(&self) -> bool {
        self.api_key.is_some() && self.secret_key.is_some()
    }
}

pub(crate) fn http_client(timeout: Duration) -> reqwest::Client {
    // Only fails when the TLS backend cannot initialise.
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_default()
}

pub(crate) fn trim_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_renders_reason_phrase() {
        let err = ProviderError::status("Groww", reqwest::StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Groww API error: 500 Internal Server Error");
    }

    #[test]
    fn credentials_are_detected() {
        assert!(!GrowwConfig::default().has_credentials());
        assert!(GrowwConfig::default().with_api_key("k").has_credentials());
        assert!(!BinanceConfig::default().has_credentials());
        assert!(
            BinanceConfig::default()
                .with_credentials("k", "s")
                .has_credentials()
        );
    }
}
