use crate::{
    config::{Credentials, OrderData},
    error::PayzenError,
};
use async_trait::async_trait;
use reqwest::{StatusCode, Url, header::CONTENT_TYPE};
use serde::Deserialize;
use std::time::Duration;
use tracing::{error, info};

pub const JSON_CONTENT_TYPE: &str = "application/json;charset=UTF-8";

/// Fetches credentials for an order from a merchant endpoint.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialSource: Send + Sync {
    async fn fetch(&self, source: &str, order_data: &OrderData)
    -> Result<Credentials, PayzenError>;
}

/// Body expected from a credentials endpoint.
#[derive(Debug, Deserialize)]
struct CredentialsResponse {
    signature: Option<String>,
}

/// [`CredentialSource`] that POSTs the order data as JSON with reqwest.
///
/// Every request is bounded by a timeout, [`Self::DEFAULT_TIMEOUT`] unless
/// set otherwise.
#[derive(Clone, Debug)]
pub struct HttpCredentialSource {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpCredentialSource {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(timeout: Duration) -> Result<Self, PayzenError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PayzenError::Configuration(e.to_string()))?;

        Ok(Self { client, timeout })
    }

    /// Uses an already configured client, e.g. one shared across services.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for HttpCredentialSource {
    fn default() -> Self {
        Self::with_client(reqwest::Client::new())
    }
}

#[async_trait]
impl CredentialSource for HttpCredentialSource {
    async fn fetch(
        &self,
        source: &str,
        order_data: &OrderData,
    ) -> Result<Credentials, PayzenError> {
        let url = Url::parse(source).map_err(|e| PayzenError::Configuration(e.to_string()))?;

        info!(source = %url, fields = order_data.len(), "requesting credentials");

        let response = self
            .client
            .post(url.clone())
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .timeout(self.timeout)
            .json(order_data)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, source = %url, "credentials request failed");
                PayzenError::Request(e.to_string())
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "credentials source rejected the order");
            return Err(PayzenError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        let parsed = response
            .json::<CredentialsResponse>()
            .await
            .map_err(|e| PayzenError::Deserialization(e.to_string()))?;

        let signature = parsed
            .signature
            .filter(|s| !s.is_empty())
            .ok_or(PayzenError::MissingSignature)?;

        info!(source = %url, "credentials received");

        Ok(Credentials::with_signature(signature))
    }
}
