//! Unsend wire format and the mapping from host messages into it.
//!
//! See <https://docs.unsend.dev/api-reference/emails/send-email> for the
//! request body this produces.

use crate::config::AdapterConfig;
use crate::error::UnsendError;
use crate::models::{Address, Attachment, AttachmentContent, OutboundMessage, Recipients};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;
use std::collections::BTreeMap;

/// Subject used when the message has none
pub const NO_SUBJECT: &str = "No subject provided";

/// Plain text body used when the message has no usable text
pub const HTML_ONLY_TEXT: &str = "Please view this email in an HTML-compatible client.";

/// Request body for `POST /api/v1/emails`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WireEmailPayload {
    /// Sender, optionally as `"Name <address>"`
    pub from: String,
    /// Recipients (max 50)
    pub to: WireRecipients,
    pub subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cc: Option<WireRecipients>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bcc: Option<WireRecipients>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<WireRecipients>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<WireAttachment>>,
    /// Delivery time; sent immediately when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<BTreeMap<String, String>>,
}

/// A single address string or a list of address strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum WireRecipients {
    One(String),
    Many(Vec<String>),
}

impl WireRecipients {
    /// Number of addresses carried
    pub fn len(&self) -> usize {
        match self {
            Self::One(_) => 1,
            Self::Many(addresses) => addresses.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl WireEmailPayload {
    /// Addresses across `to`, `cc` and `bcc`
    pub fn recipient_count(&self) -> usize {
        self.to.len()
            + self.cc.as_ref().map_or(0, WireRecipients::len)
            + self.bcc.as_ref().map_or(0, WireRecipients::len)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WireAttachment {
    pub filename: String,
    /// Base64-encoded file content
    pub content: String,
}

/// Build the request body for `message`.
///
/// Fails before anything is sent when an attachment cannot be mapped.
pub fn build_payload(
    message: &OutboundMessage,
    config: &AdapterConfig,
) -> Result<WireEmailPayload, UnsendError> {
    let attachments = if message.attachments.is_empty() {
        None
    } else {
        Some(map_attachments(&message.attachments)?)
    };

    Ok(WireEmailPayload {
        from: format_from(
            message.from.as_ref(),
            &config.default_from_name,
            &config.default_from_address,
        ),
        to: map_recipients(&message.to),
        subject: message
            .subject
            .clone()
            .unwrap_or_else(|| NO_SUBJECT.to_string()),
        html: non_blank(message.html.as_deref()),
        text: Some(
            non_blank(message.text.as_deref()).unwrap_or_else(|| HTML_ONLY_TEXT.to_string()),
        ),
        cc: optional_recipients(message.cc.as_ref()),
        bcc: optional_recipients(message.bcc.as_ref()),
        reply_to: optional_recipients(message.reply_to.as_ref()),
        attachments,
        scheduled_at: config.scheduled_at.clone().filter(|s| !s.is_empty()),
        template_id: config.template_id.clone().filter(|s| !s.is_empty()),
        variables: config.variables.clone(),
    })
}

/// Format the sender, falling back to the configured identity.
pub fn format_from(from: Option<&Address>, default_name: &str, default_address: &str) -> String {
    match from {
        None => format!("{} <{}>", default_name, default_address),
        Some(Address::Plain(address)) => address.clone(),
        Some(Address::Named { name, address }) if name.trim().is_empty() => address.clone(),
        Some(Address::Named { name, address }) => format!("{} <{}>", name, address),
    }
}

/// Reduce recipients to the plain strings Unsend expects.
///
/// A bare string passes through untouched, named entries keep only their
/// address, and a lone named entry becomes a one-element list.
pub fn map_recipients(recipients: &Recipients) -> WireRecipients {
    match recipients {
        Recipients::One(Address::Plain(address)) => WireRecipients::One(address.clone()),
        Recipients::One(Address::Named { address, .. }) => {
            WireRecipients::Many(vec![address.clone()])
        }
        Recipients::Many(addresses) => WireRecipients::Many(
            addresses
                .iter()
                .map(|address| match address {
                    Address::Plain(address) => address.clone(),
                    Address::Named { address, .. } => address.clone(),
                })
                .collect(),
        ),
    }
}

/// Base64-encode every attachment, rejecting incomplete ones.
pub fn map_attachments(attachments: &[Attachment]) -> Result<Vec<WireAttachment>, UnsendError> {
    attachments.iter().map(map_attachment).collect()
}

fn map_attachment(attachment: &Attachment) -> Result<WireAttachment, UnsendError> {
    let filename = match attachment.filename.as_deref() {
        Some(name) if !name.is_empty() => name,
        _ => return Err(UnsendError::AttachmentIncomplete),
    };

    let content = match &attachment.content {
        None => return Err(UnsendError::AttachmentIncomplete),
        Some(AttachmentContent::Text(text)) if text.is_empty() => {
            return Err(UnsendError::AttachmentIncomplete);
        }
        Some(AttachmentContent::Text(text)) => STANDARD.encode(text.as_bytes()),
        Some(AttachmentContent::Binary(bytes)) => STANDARD.encode(bytes),
        Some(AttachmentContent::Other(_)) => return Err(UnsendError::AttachmentContentUnsupported),
    };

    Ok(WireAttachment {
        filename: filename.to_string(),
        content,
    })
}

fn optional_recipients(recipients: Option<&Recipients>) -> Option<WireRecipients> {
    recipients
        .filter(|r| !r.is_empty())
        .map(map_recipients)
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(str::to_string)
}
