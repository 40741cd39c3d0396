//! Email adapter for the [Unsend](https://unsend.dev) REST API
//!
//! Translates a host's generic "send an email" request into Unsend's
//! `POST /api/v1/emails` body, performs the call, and folds every outcome
//! into either a [`SentEmail`] or a single [`ApiError`].
//!
//! ## Components
//!
//! - **Adapter**: `UnsendAdapter` implementing the host-facing `EmailAdapter` trait
//! - **Models**: `OutboundMessage`, `Address`, `Recipients`, `Attachment` as the host sends them
//! - **Payload**: `WireEmailPayload` and the mapping into it
//! - **Transport**: `HttpTransport` capability with a `reqwest` default
//!
//! ## Usage
//!
//! ```ignore
//! use email_unsend::{AdapterConfig, EmailAdapter, OutboundMessage, UnsendAdapter};
//!
//! let config = AdapterConfig::new(api_key, "hello@example.com", "Example", "https://app.unsend.dev");
//! let adapter = UnsendAdapter::new(config);
//!
//! let message = OutboundMessage::new("user@example.com")
//!     .with_subject("Welcome")
//!     .with_html("<p>Hello!</p>");
//! let sent = adapter.send_email(&message).await?;
//! println!("queued as {}", sent.email_id);
//! ```

pub mod adapter;
pub mod config;
pub mod error;
pub mod models;
pub mod payload;
pub mod response;
pub mod transport;

pub use adapter::{ADAPTER_NAME, EmailAdapter, UnsendAdapter};
pub use config::AdapterConfig;
pub use error::{ApiError, ConfigError, ErrorKind, UnsendError, UnsendResult};
pub use models::{Address, Attachment, AttachmentContent, OutboundMessage, Recipients, SentEmail};
pub use payload::WireEmailPayload;
pub use transport::{HttpTransport, ReqwestTransport, TransportError};
