//! Configuration loading and management.
//!
//! Loads configuration from embedded config.toml with environment variable overrides.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::time::Duration;
use url::Url;

/// Embedded configuration file content.
const CONFIG_TOML: &str = include_str!("../config.toml");

/// Placeholder substituted with the tenant domain in the endpoint template.
pub const TENANT_PLACEHOLDER: &str = "{tenant}";

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub probe: ProbeConfig,
    pub scan: ScanDefaults,
    pub logging: LoggingConfig,
}

/// Settings for the token endpoint probe. Immutable once loaded.
#[derive(Debug, Clone, Deserialize)]
pub struct ProbeConfig {
    pub token_endpoint: String,
    pub client_secret: String,
    pub scope: String,
    pub timeout_seconds: u64,
    pub connect_timeout_seconds: u64,
}

/// Defaults used when the command line does not override them.
#[derive(Debug, Clone, Deserialize)]
pub struct ScanDefaults {
    pub workers: usize,
    pub delay_seconds: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Config {
    /// Load configuration from embedded config.toml with environment variable overrides.
    pub fn load() -> Result<Self> {
        let mut config: Config =
            toml::from_str(CONFIG_TOML).context("Failed to parse embedded config.toml")?;

        if let Ok(endpoint) = env::var("AZAPPSCAN_TOKEN_ENDPOINT") {
            config.probe.token_endpoint = endpoint;
        }

        if let Ok(scope) = env::var("AZAPPSCAN_SCOPE") {
            config.probe.scope = scope;
        }

        if let Ok(timeout) = env::var("AZAPPSCAN_TIMEOUT_SECONDS") {
            config.probe.timeout_seconds = timeout
                .trim()
                .parse()
                .with_context(|| format!("AZAPPSCAN_TIMEOUT_SECONDS is not a number: {timeout}"))?;
        }

        if let Ok(log_level) = env::var("RUST_LOG") {
            config.logging.level = log_level;
        }

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration can drive a scan.
    fn validate(&self) -> Result<()> {
        if !self.probe.token_endpoint.contains(TENANT_PLACEHOLDER) {
            anyhow::bail!(
                "Token endpoint template must contain {}: {}",
                TENANT_PLACEHOLDER,
                self.probe.token_endpoint
            );
        }

        let sample = self.probe.token_url("example.onmicrosoft.com");
        Url::parse(&sample)
            .with_context(|| format!("Token endpoint template is not a valid URL: {sample}"))?;

        if self.probe.timeout_seconds == 0 || self.probe.connect_timeout_seconds == 0 {
            anyhow::bail!("Probe timeouts must be greater than zero");
        }

        if self.scan.workers == 0 {
            anyhow::bail!("Default worker count must be at least 1");
        }

        if !self.scan.delay_seconds.is_finite() || self.scan.delay_seconds < 0.0 {
            anyhow::bail!(
                "Default delay must be a non-negative number of seconds, got {}",
                self.scan.delay_seconds
            );
        }

        Ok(())
    }
}

impl ProbeConfig {
    /// Get the token URL for the given tenant.
    pub fn token_url(&self, tenant: &str) -> String {
        self.token_endpoint.replace(TENANT_PLACEHOLDER, tenant)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }
}

impl ScanDefaults {
    pub fn delay(&self) -> Duration {
        Duration::from_secs_f64(self.delay_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        toml::from_str(CONFIG_TOML).unwrap()
    }

    #[test]
    fn test_config_parsing() {
        let result = toml::from_str::<Config>(CONFIG_TOML);
        assert!(result.is_ok(), "Config parsing failed: {:?}", result.err());
    }

    #[test]
    fn test_embedded_defaults_are_valid() {
        let config = test_config();
        assert!(config.validate().is_ok());
        assert_eq!(config.probe.client_secret, "invalid_secret");
        assert_eq!(config.probe.scope, "https://graph.microsoft.com/.default");
        assert_eq!(config.scan.workers, 10);
        assert_eq!(config.scan.delay(), Duration::from_millis(500));
    }

    #[test]
    fn test_token_url() {
        let config = test_config();
        assert_eq!(
            config.probe.token_url("contoso.onmicrosoft.com"),
            "https://login.microsoftonline.com/contoso.onmicrosoft.com/oauth2/v2.0/token"
        );
    }

    #[test]
    fn test_validate_rejects_template_without_tenant() {
        let mut config = test_config();
        config.probe.token_endpoint = "https://login.microsoftonline.com/common/token".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_scan_defaults() {
        let mut config = test_config();
        config.scan.workers = 0;
        assert!(config.validate().is_err());

        let mut config = test_config();
        config.scan.delay_seconds = -1.0;
        assert!(config.validate().is_err());

        let mut config = test_config();
        config.probe.timeout_seconds = 0;
        assert!(config.validate().is_err());
    }
}
