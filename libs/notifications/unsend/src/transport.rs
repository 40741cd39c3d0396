//! HTTP transport used by the adapter.
//!
//! The adapter never reaches for a global client: it is handed an
//! [`HttpTransport`] and issues exactly one request per send through it.

use async_trait::async_trait;
use http::{Request, Response};
use reqwest::Client;
use thiserror::Error;

/// The network call failed before a response was received.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self(err.to_string())
    }
}

/// Capability to perform one HTTP request.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send the request and return the full response.
    async fn send(&self, request: Request<Vec<u8>>) -> Result<Response<Vec<u8>>, TransportError>;
}

/// Default transport backed by `reqwest`.
///
/// Enforces no timeout of its own; pass a configured client through
/// [`ReqwestTransport::with_client`] to add one.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: Request<Vec<u8>>) -> Result<Response<Vec<u8>>, TransportError> {
        let (parts, body) = request.into_parts();

        let response = self
            .client
            .request(parts.method, parts.uri.to_string())
            .headers(parts.headers)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.bytes().await?;

        let mut builder = Response::builder().status(status);
        if let Some(map) = builder.headers_mut() {
            *map = headers;
        }

        builder
            .body(bytes.to_vec())
            .map_err(|e| TransportError(e.to_string()))
    }
}
