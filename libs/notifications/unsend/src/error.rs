//! Error types for the Unsend adapter.
//!
//! `UnsendError` is the internal taxonomy produced while mapping, sending and
//! reading a response. Every variant is folded into a single [`ApiError`]
//! before it reaches the host.

use thiserror::Error;

/// Result type for adapter operations surfaced to the host.
pub type UnsendResult<T> = Result<T, ApiError>;

/// Status used for every failure that did not come from the provider.
pub const INTERNAL_ERROR_STATUS: u16 = 500;

/// Errors that can occur while sending an email through Unsend.
#[derive(Debug, Error)]
pub enum UnsendError {
    /// An attachment has no filename or no content.
    #[error("Attachment is missing filename or content")]
    AttachmentIncomplete,

    /// An attachment carries content that is neither text nor bytes.
    #[error("Attachment content must be a string or a buffer")]
    AttachmentContentUnsupported,

    /// The wire payload could not be serialized.
    #[error("Failed to serialize request: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The HTTP request could not be built.
    #[error("Invalid request: {0}")]
    Request(#[from] http::Error),

    /// The network call itself failed.
    #[error("Request failed: {0}")]
    Transport(#[from] crate::transport::TransportError),

    /// The response body is not valid JSON.
    #[error("Invalid response body: {0}")]
    Parse(String),

    /// The provider answered without an `emailId`.
    #[error("{message}")]
    Provider { status: u16, message: String },
}

/// Classification of an [`ApiError`], kept so hosts can tell a rejected
/// message apart from an unreachable provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The message could not be mapped to the wire format. No request was made.
    Mapping,
    /// The request never produced a response.
    Transport,
    /// The response could not be read.
    Parse,
    /// The provider rejected the request.
    Provider,
}

impl UnsendError {
    /// Which class of failure this is.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AttachmentIncomplete | Self::AttachmentContentUnsupported => ErrorKind::Mapping,
            Self::Serialization(_) | Self::Request(_) => ErrorKind::Mapping,
            Self::Transport(_) => ErrorKind::Transport,
            Self::Parse(_) => ErrorKind::Parse,
            Self::Provider { .. } => ErrorKind::Provider,
        }
    }
}

/// The single error shape handed back to the host.
///
/// `status` is the provider's HTTP status for provider failures and 500 for
/// everything else. `message` is ready for display or logging.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ApiError {
    pub status: u16,
    pub message: String,
    pub kind: ErrorKind,
}

impl ApiError {
    pub fn new(status: u16, message: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            status,
            message: message.into(),
            kind,
        }
    }

    /// Whether the failure happened before any request was issued.
    pub fn is_mapping(&self) -> bool {
        self.kind == ErrorKind::Mapping
    }
}

impl From<UnsendError> for ApiError {
    fn from(err: UnsendError) -> Self {
        let kind = err.kind();
        match err {
            UnsendError::Provider { status, message } => Self::new(status, message, kind),
            other => Self::new(
                INTERNAL_ERROR_STATUS,
                format!("Error sending email: {}", other),
                kind,
            ),
        }
    }
}

/// Errors raised while loading or validating [`crate::config::AdapterConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Environment variable '{0}' is required but not set")]
    MissingEnvVar(String),

    #[error("Failed to parse environment variable '{key}': {details}")]
    ParseError { key: String, details: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
