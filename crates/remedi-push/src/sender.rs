//! Push notification senders.

use crate::{Notice, PushError};
use async_trait::async_trait;
use serde_json::json;

/// Something that can deliver a notice to a device.
///
/// The trait seam lets the purchase workflow be tested against a sender
/// that always fails.
#[async_trait]
pub trait PushSender: Send + Sync {
    /// Attempt delivery to the device identified by `device_token`.
    async fn send(&self, device_token: &str, notice: &Notice) -> Result<(), PushError>;
}

/// Sender backed by the messaging provider's HTTP endpoint.
#[derive(Clone)]
pub struct HttpPushSender {
    http: reqwest::Client,
    endpoint: String,
    server_key: String,
}

impl HttpPushSender {
    /// Create a sender for the given provider endpoint and server key.
    pub fn new(endpoint: impl Into<String>, server_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            server_key: server_key.into(),
        }
    }
}

#[async_trait]
impl PushSender for HttpPushSender {
    async fn send(&self, device_token: &str, notice: &Notice) -> Result<(), PushError> {
        let payload = json!({
            "to": device_token,
            "notification": {
                "title": notice.title,
                "body": notice.body,
            },
        });

        let response = self
            .http
            .post(&self.endpoint)
            .header("Authorization", format!("key={}", self.server_key))
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(PushError::Provider(format!("{status}: {detail}")));
        }

        tracing::debug!(%status, "push notice delivered");
        Ok(())
    }
}
