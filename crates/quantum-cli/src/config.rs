//! Connection options shared by every command

use anyhow::{anyhow, Result};
use clap::Args;
use quantum_client::QuantumClient;
use quantum_core::client::QUANTUM_DEFAULT_TIMEOUT;
use quantum_core::config::{QuantumClientConfig, DEFAULT_API_VERSION};

/// Global connection options.
///
/// There is no identity-service login: the endpoint and an optional
/// pre-issued token come from flags or the environment.
#[derive(Args, Debug, Clone, PartialEq)]
pub struct ConnectionArgs {
    /// Networking service endpoint URL
    #[arg(long = "os-url", global = true, env = "OS_URL", value_name = "URL")]
    pub os_url: Option<String>,

    /// Pre-issued authentication token
    #[arg(
        long = "os-token",
        global = true,
        env = "OS_TOKEN",
        hide_env_values = true,
        value_name = "TOKEN"
    )]
    pub os_token: Option<String>,

    /// API version prefix
    #[arg(
        long,
        global = true,
        env = "OS_NETWORK_API_VERSION",
        default_value = DEFAULT_API_VERSION
    )]
    pub api_version: String,

    /// Request timeout in seconds
    #[arg(
        long = "http-timeout",
        global = true,
        env = "QUANTUM_HTTP_TIMEOUT",
        default_value_t = QUANTUM_DEFAULT_TIMEOUT,
        value_name = "SECONDS"
    )]
    pub http_timeout: u64,

    /// Retries for failed read requests
    #[arg(long, global = true, default_value_t = 0)]
    pub retries: u32,

    /// Skip TLS certificate verification
    #[arg(long, global = true)]
    pub insecure: bool,
}

impl ConnectionArgs {
    /// Validated client configuration from the options.
    pub fn client_config(&self) -> Result<QuantumClientConfig> {
        let url = self
            .os_url
            .as_deref()
            .filter(|u| !u.is_empty())
            .ok_or_else(|| anyhow!("You must provide a service URL via either --os-url or env[OS_URL]"))?;

        let mut config = QuantumClientConfig::new(url)?
            .with_api_version(self.api_version.clone())
            .with_timeout(self.http_timeout)
            .with_max_retries(self.retries)
            .with_insecure(self.insecure);
        if let Some(token) = self.os_token.as_deref().filter(|t| !t.is_empty()) {
            config = config.with_token(token);
        }
        config.check()?;
        Ok(config)
    }

    /// Build the API client.
    pub fn build_client(&self) -> Result<QuantumClient> {
        Ok(QuantumClient::from_config(&self.client_config()?)?)
    }
}
