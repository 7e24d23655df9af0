//! # rulehub-adapter-webhook-reqwest
//!
//! Outbound webhook delivery over HTTP.
//!
//! Implements the `WebhookClient` port with a shared [`reqwest::Client`].
//! A completed HTTP exchange returns the status code to the caller; the
//! retry classification of that code is the engine's business, not this
//! adapter's. Transport-level failures (timeouts, connection refusals)
//! are reported as transient errors since a later attempt may succeed.

use std::time::Duration;

use rulehub_app::ports::{ActionError, WebhookClient};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP webhook client backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestWebhookClient {
    client: reqwest::Client,
}

impl ReqwestWebhookClient {
    /// Build a client with the default request timeout.
    ///
    /// # Errors
    ///
    /// Returns a permanent error when the underlying TLS backend cannot
    /// be initialised.
    pub fn new() -> Result<Self, ActionError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| ActionError::Permanent(err.to_string()))?;
        Ok(Self { client })
    }
}

impl WebhookClient for ReqwestWebhookClient {
    async fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<u16, ActionError> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() || err.is_connect() {
                    ActionError::Transient(err.to_string())
                } else {
                    ActionError::Permanent(err.to_string())
                }
            })?;

        let status = response.status().as_u16();
        tracing::debug!(url, status, "webhook delivered");
        Ok(status)
    }
}
