//! The Unsend adapter and the host-facing adapter trait.

use crate::config::AdapterConfig;
use crate::error::{ApiError, ConfigError, UnsendError, UnsendResult};
use crate::models::{OutboundMessage, SentEmail};
use crate::payload::build_payload;
use crate::response::UnsendResponse;
use crate::transport::{HttpTransport, ReqwestTransport};
use async_trait::async_trait;
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::{Method, Request};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Name the adapter reports to the host
pub const ADAPTER_NAME: &str = "unsend-rest";

/// Email-sending capability as the host sees it.
#[async_trait]
pub trait EmailAdapter: Send + Sync {
    /// Constant identifying the provider
    fn name(&self) -> &'static str;

    fn default_from_address(&self) -> &str;

    fn default_from_name(&self) -> &str;

    /// Send one email, returning the provider's ID for it.
    async fn send_email(&self, message: &OutboundMessage) -> UnsendResult<SentEmail>;

    /// Check that the adapter is configured well enough to send.
    async fn health_check(&self) -> Result<(), ConfigError>;
}

/// Sends email through the Unsend REST API.
///
/// Cloning is cheap; clones share the configuration and transport. Calls are
/// independent of each other and may run concurrently.
pub struct UnsendAdapter<T = ReqwestTransport> {
    config: Arc<AdapterConfig>,
    transport: Arc<T>,
}

impl<T> Clone for UnsendAdapter<T> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            transport: Arc::clone(&self.transport),
        }
    }
}

impl UnsendAdapter<ReqwestTransport> {
    /// Create an adapter using a default `reqwest` client
    pub fn new(config: AdapterConfig) -> Self {
        Self::with_transport(config, ReqwestTransport::new())
    }
}

impl<T: HttpTransport> UnsendAdapter<T> {
    /// Create an adapter sending through `transport`
    pub fn with_transport(config: AdapterConfig, transport: T) -> Self {
        Self {
            config: Arc::new(config),
            transport: Arc::new(transport),
        }
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    async fn try_send(&self, message: &OutboundMessage) -> Result<SentEmail, UnsendError> {
        let payload = build_payload(message, &self.config)?;

        debug!(
            recipients = payload.recipient_count(),
            subject = %payload.subject,
            has_html = payload.html.is_some(),
            attachment_count = message.attachments.len(),
            scheduled = payload.scheduled_at.is_some(),
            "Sending email via Unsend"
        );

        let request = Request::builder()
            .method(Method::POST)
            .uri(self.config.emails_url())
            .header(AUTHORIZATION, format!("Bearer {}", self.config.api_key))
            .header(CONTENT_TYPE, "application/json")
            .body(serde_json::to_vec(&payload)?)?;

        let response = self.transport.send(request).await?;
        let status = response.status().as_u16();

        let body: serde_json::Value = serde_json::from_slice(response.body())
            .map_err(|e| UnsendError::Parse(format!("status {}: {}", status, e)))?;

        match UnsendResponse::from_value(body) {
            UnsendResponse::Sent { email_id } => {
                info!(email_id = %email_id, "Email sent successfully via Unsend");
                Ok(SentEmail { email_id })
            }
            UnsendResponse::Failed(error_body) => {
                let message = error_body.describe(status);
                error!(status, error = %message, "Unsend API error");
                Err(UnsendError::Provider { status, message })
            }
        }
    }
}

#[async_trait]
impl<T: HttpTransport> EmailAdapter for UnsendAdapter<T> {
    fn name(&self) -> &'static str {
        ADAPTER_NAME
    }

    fn default_from_address(&self) -> &str {
        &self.config.default_from_address
    }

    fn default_from_name(&self) -> &str {
        &self.config.default_from_name
    }

    async fn send_email(&self, message: &OutboundMessage) -> UnsendResult<SentEmail> {
        self.try_send(message).await.map_err(|err| {
            if !matches!(err, UnsendError::Provider { .. }) {
                warn!(error = %err, kind = ?err.kind(), "Failed to send email via Unsend");
            }
            ApiError::from(err)
        })
    }

    async fn health_check(&self) -> Result<(), ConfigError> {
        self.config.validate()
    }
}
