//! Configuration for Quantum API clients.
//!
//! The configuration names the API endpoint, the pre-issued auth token and
//! the transport limits. It is validated on construction.

use crate::client::{HttpSettings, RetryPolicy, QUANTUM_DEFAULT_TIMEOUT};
use crate::Error;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;
use validator::Validate;

/// API version prefix used when none is configured.
pub const DEFAULT_API_VERSION: &str = "2.0";

/// Configuration for a Quantum client instance.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct QuantumClientConfig {
    /// Networking service endpoint (e.g. `http://controller:9696`)
    #[validate(url)]
    pub endpoint_url: String,

    /// Pre-issued auth token sent as `X-Auth-Token`
    #[serde(skip)]
    pub token: Option<SecretString>,

    /// API version used as the `v<version>` path prefix
    #[validate(length(min = 1))]
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Request timeout in seconds
    #[validate(range(min = 1, max = 300))]
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Maximum number of retry attempts for idempotent requests
    #[validate(range(min = 0, max = 10))]
    #[serde(default)]
    pub max_retries: u32,

    /// Skip TLS certificate verification
    #[serde(default)]
    pub insecure: bool,
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

const fn default_request_timeout_secs() -> u64 {
    QUANTUM_DEFAULT_TIMEOUT
}

impl QuantumClientConfig {
    /// Create a new client configuration for the given endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn new(endpoint_url: impl Into<String>) -> Result<Self, Error> {
        let config = Self {
            endpoint_url: endpoint_url.into(),
            token: None,
            api_version: default_api_version(),
            request_timeout_secs: default_request_timeout_secs(),
            max_retries: 0,
            insecure: false,
        };
        config.check()?;
        Ok(config)
    }

    /// Set the auth token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(SecretString::from(token.into()));
        self
    }

    /// Set the API version prefix.
    #[must_use]
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Set request timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout_secs = seconds;
        self
    }

    /// Set maximum retry attempts.
    #[must_use]
    pub const fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Skip TLS certificate verification.
    #[must_use]
    pub const fn with_insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }

    /// Re-run validation after builder calls.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] describing every failed constraint.
    pub fn check(&self) -> Result<(), Error> {
        self.validate()
            .map_err(|e| Error::ConfigError(format!("Invalid configuration: {e}")))
    }

    /// Get the request timeout as a Duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Transport settings derived from this configuration.
    #[must_use]
    pub fn http_settings(&self) -> HttpSettings {
        HttpSettings::new()
            .with_timeout(self.timeout())
            .with_retry(RetryPolicy::none().with_max_retries(self.max_retries))
            .with_invalid_certs(self.insecure)
    }

    /// Parse the endpoint URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed.
    pub fn parse_endpoint_url(&self) -> Result<Url, Error> {
        Url::parse(&self.endpoint_url)
            .map_err(|e| Error::ConfigError(format!("Invalid endpoint URL: {e}")))
    }
}
