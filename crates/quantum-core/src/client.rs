//! HTTP transport settings and retry backoff.
//!
//! [`HttpSettings`] collects everything needed to build the underlying
//! `reqwest` client; [`RetryPolicy`] decides how often and how long to wait
//! before a failed read is sent again.

use std::time::Duration;

use crate::Error;

/// Default request timeout for Quantum API calls, in seconds
pub const QUANTUM_DEFAULT_TIMEOUT: u64 = 20;

/// Default connect timeout, in seconds
pub const DEFAULT_CONNECT_TIMEOUT: u64 = 10;

const POOL_IDLE_SECS: u64 = 90;
const POOL_MAX_IDLE_PER_HOST: usize = 10;
const BACKOFF_BASE_MS: u64 = 500;
const BACKOFF_CAP_MS: u64 = 5000;

/// How failed idempotent requests are repeated.
///
/// Retries are off unless a count is configured. The wait before retry `n`
/// is `base_delay * 2^(n-1)`, capped at `max_delay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Wait before the first retry
    pub base_delay: Duration,
    /// Upper bound for any single wait
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// A policy that never retries.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::from_millis(BACKOFF_BASE_MS),
            max_delay: Duration::from_millis(BACKOFF_CAP_MS),
        }
    }

    /// Set the retry count.
    #[must_use]
    pub const fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set the base and maximum waits.
    #[must_use]
    pub const fn with_delays(mut self, base: Duration, max: Duration) -> Self {
        self.base_delay = base;
        self.max_delay = max;
        self
    }

    /// Wait before retry number `attempt` (1-based); zero for attempt 0.
    #[must_use]
    pub fn backoff(&self, attempt: u32) -> Duration {
        let Some(exponent) = attempt.checked_sub(1) else {
            return Duration::ZERO;
        };
        let factor = 1_u32.checked_shl(exponent).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }

    /// Whether any retry will happen.
    #[must_use]
    pub const fn enabled(&self) -> bool {
        self.max_retries > 0
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

/// Transport settings for the HTTP client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSettings {
    /// Whole-request timeout
    pub timeout: Duration,
    /// TCP connect timeout
    pub connect_timeout: Duration,
    /// How long idle pooled connections are kept
    pub pool_idle_timeout: Duration,
    /// Idle connections kept per host
    pub pool_max_idle_per_host: usize,
    /// Accept gzip-compressed responses
    pub gzip: bool,
    /// Skip TLS certificate verification
    pub accept_invalid_certs: bool,
    /// Retry policy for reads
    pub retry: RetryPolicy,
}

impl HttpSettings {
    /// Defaults: 20s timeout, gzip on, certificates verified, no retries.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            timeout: Duration::from_secs(QUANTUM_DEFAULT_TIMEOUT),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT),
            pool_idle_timeout: Duration::from_secs(POOL_IDLE_SECS),
            pool_max_idle_per_host: POOL_MAX_IDLE_PER_HOST,
            gzip: true,
            accept_invalid_certs: false,
            retry: RetryPolicy::none(),
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the retry policy.
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Enable or disable gzip responses.
    #[must_use]
    pub const fn with_gzip(mut self, enabled: bool) -> Self {
        self.gzip = enabled;
        self
    }

    /// Skip TLS certificate verification.
    #[must_use]
    pub const fn with_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Build a `reqwest` client from these settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the TLS backend cannot be set up.
    pub fn build_http_client(&self, user_agent: &str) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .pool_idle_timeout(self.pool_idle_timeout)
            .pool_max_idle_per_host(self.pool_max_idle_per_host)
            .danger_accept_invalid_certs(self.accept_invalid_certs);
        if !self.gzip {
            builder = builder.no_gzip();
        }
        builder
            .build()
            .map_err(|err| Error::ConfigError(format!("Failed to build HTTP client: {err}")))
    }
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self::new()
    }
}
