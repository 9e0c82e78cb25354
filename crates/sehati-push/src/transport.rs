use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::error::PushError;
use crate::payload::PushPayload;

/// Why one delivery attempt failed.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("push service rejected delivery with {status}")]
    Rejected { status: u16 },

    #[error("push transport error: {0}")]
    Transport(String),

    #[error("push delivery is not configured")]
    Disabled,
}

impl DeliveryError {
    /// The push service no longer knows this endpoint; the subscription
    /// will never work again.
    pub fn is_endpoint_gone(&self) -> bool {
        matches!(self, DeliveryError::Rejected { status: 404 | 410 })
    }
}

/// Delivers one payload to one browser push subscription.
#[async_trait]
pub trait PushTransport: Send + Sync {
    async fn send(
        &self,
        subscription: &Value,
        payload: &PushPayload,
    ) -> Result<(), DeliveryError>;
}

/// Sends through an HTTP relay that speaks the web-push protocol on our
/// behalf. The relay answers with the push service's status code.
#[derive(Debug, Clone)]
pub struct RelayTransport {
    client: Client,
    url: Url,
}

#[derive(Serialize)]
struct RelayRequest<'a> {
    subscription: &'a Value,
    payload: &'a PushPayload,
}

impl RelayTransport {
    pub fn new(url: &str) -> Result<Self, PushError> {
        let url = Url::parse(url).map_err(|e| PushError::Config(e.to_string()))?;
        let client = Client::builder()
            .build()
            .map_err(|e| PushError::Config(e.to_string()))?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl PushTransport for RelayTransport {
    async fn send(
        &self,
        subscription: &Value,
        payload: &PushPayload,
    ) -> Result<(), DeliveryError> {
        let resp = self
            .client
            .post(self.url.clone())
            .json(&RelayRequest {
                subscription,
                payload,
            })
            .send()
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        let status = resp.status();
        debug!(status = status.as_u16(), "relay response");
        if status.is_success() {
            Ok(())
        } else {
            Err(DeliveryError::Rejected {
                status: status.as_u16(),
            })
        }
    }
}

/// Used when no relay is configured. Every attempt fails, so dispatches
/// still persist a ledger of failures.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledTransport;

#[async_trait]
impl PushTransport for DisabledTransport {
    async fn send(&self, _: &Value, _: &PushPayload) -> Result<(), DeliveryError> {
        Err(DeliveryError::Disabled)
    }
}
