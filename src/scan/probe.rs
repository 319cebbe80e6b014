//! Token endpoint probe using a client credentials grant with a wrong secret.

use std::future::Future;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use super::models::RawProbeResult;
use crate::config::ProbeConfig;
use crate::error::ProbeError;

/// Issues one classification request for an application ID in a tenant.
///
/// Implementations must not fail: every problem is reported as
/// [`RawProbeResult::TransportFailure`].
pub trait Probe: Send + Sync + 'static {
    fn probe(&self, client_id: &str, tenant: &str)
        -> impl Future<Output = RawProbeResult> + Send;
}

/// Probe against the Azure AD v2.0 token endpoint.
pub struct TokenEndpointProbe {
    config: ProbeConfig,
    http_client: reqwest::Client,
}

impl TokenEndpointProbe {
    /// Create a new probe from configuration.
    pub fn new(config: &ProbeConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            config: config.clone(),
            http_client,
        })
    }

    /// Send the token request and decode the error body.
    async fn request(&self, client_id: &str, tenant: &str) -> Result<(u64, String), ProbeError> {
        let token_endpoint = self.config.token_url(tenant);

        let params = [
            ("client_id", client_id),
            ("client_secret", self.config.client_secret.as_str()),
            ("scope", self.config.scope.as_str()),
            ("grant_type", "client_credentials"),
        ];

        let response = self
            .http_client
            .post(&token_endpoint)
            .form(&params)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(ProbeError::Body)?;
        let error: TokenErrorResponse =
            serde_json::from_slice(&body).map_err(|source| ProbeError::Decode { status, source })?;

        let code = error
            .error_codes
            .and_then(|codes| codes.first().copied())
            .unwrap_or(0);
        Ok((code, error.error_description.unwrap_or_default()))
    }
}

impl Probe for TokenEndpointProbe {
    async fn probe(&self, client_id: &str, tenant: &str) -> RawProbeResult {
        match self.request(client_id, tenant).await {
            Ok((code, description)) => {
                debug!("Client ID: {}, Error Code: {}", client_id, code);
                RawProbeResult::Response { code, description }
            }
            Err(e) => {
                debug!("Client ID: {}, probe failed: {}", client_id, e);
                RawProbeResult::TransportFailure(e.to_string())
            }
        }
    }
}

/// Error body returned by the token endpoint. Either field may be missing or null.
#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    #[serde(default)]
    error_codes: Option<Vec<u64>>,
    #[serde(default)]
    error_description: Option<String>,
}
