use serde::{Deserialize, Deserializer, Serialize};

/// An email address as the host supplies it.
///
/// Hosts pass either a bare string (`"a@example.com"` or
/// `"Name <a@example.com>"`) or a name/address pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Address {
    Plain(String),
    Named {
        #[serde(default)]
        name: String,
        address: String,
    },
}

impl Address {
    /// Create a name/address pair
    pub fn named(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self::Named {
            name: name.into(),
            address: address.into(),
        }
    }
}

impl From<&str> for Address {
    fn from(address: &str) -> Self {
        Self::Plain(address.to_string())
    }
}

impl From<String> for Address {
    fn from(address: String) -> Self {
        Self::Plain(address)
    }
}

/// One recipient or a list of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Recipients {
    One(Address),
    Many(Vec<Address>),
}

impl Recipients {
    /// True for an empty string or an empty list
    pub fn is_empty(&self) -> bool {
        match self {
            Self::One(Address::Plain(address)) => address.is_empty(),
            Self::One(Address::Named { .. }) => false,
            Self::Many(addresses) => addresses.is_empty(),
        }
    }
}

impl From<Address> for Recipients {
    fn from(address: Address) -> Self {
        Self::One(address)
    }
}

impl From<&str> for Recipients {
    fn from(address: &str) -> Self {
        Self::One(address.into())
    }
}

impl From<String> for Recipients {
    fn from(address: String) -> Self {
        Self::One(address.into())
    }
}

impl From<Vec<Address>> for Recipients {
    fn from(addresses: Vec<Address>) -> Self {
        Self::Many(addresses)
    }
}

/// Attachment body as handed over by the host.
///
/// Bytes arrive either as a plain array or as a serialized buffer
/// (`{"type": "Buffer", "data": [...]}`). `Other` holds any JSON value that
/// is none of these; such attachments are rejected when the message is mapped.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttachmentContent {
    Text(String),
    Binary(Vec<u8>),
    Other(serde_json::Value),
}

impl<'de> Deserialize<'de> for AttachmentContent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match ContentShape::deserialize(deserializer)? {
            ContentShape::Text(text) => Self::Text(text),
            ContentShape::Binary(bytes) | ContentShape::Buffer(BufferJson { data: bytes, .. }) => {
                Self::Binary(bytes)
            }
            ContentShape::Other(value) => Self::Other(value),
        })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ContentShape {
    Text(String),
    Binary(Vec<u8>),
    Buffer(BufferJson),
    Other(serde_json::Value),
}

#[derive(Deserialize)]
struct BufferJson {
    #[serde(rename = "type")]
    #[allow(dead_code)]
    kind: BufferTag,
    data: Vec<u8>,
}

#[derive(Deserialize)]
enum BufferTag {
    Buffer,
}

/// File attached to an outbound message
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Attachment {
    /// Name of the attached file
    #[serde(default)]
    pub filename: Option<String>,
    /// File content
    #[serde(default)]
    pub content: Option<AttachmentContent>,
}

impl Attachment {
    /// Attachment with text content
    pub fn text(filename: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            filename: Some(filename.into()),
            content: Some(AttachmentContent::Text(content.into())),
        }
    }

    /// Attachment with raw bytes
    pub fn binary(filename: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: Some(filename.into()),
            content: Some(AttachmentContent::Binary(content.into())),
        }
    }
}

/// Email the host asks the adapter to send.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundMessage {
    /// Sender (defaults to the configured sender identity)
    pub from: Option<Address>,
    pub to: Recipients,
    pub cc: Option<Recipients>,
    pub bcc: Option<Recipients>,
    pub reply_to: Option<Recipients>,
    pub subject: Option<String>,
    /// HTML body
    pub html: Option<String>,
    /// Plain text body
    pub text: Option<String>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

impl OutboundMessage {
    /// Create a message with only recipients set
    pub fn new(to: impl Into<Recipients>) -> Self {
        Self {
            from: None,
            to: to.into(),
            cc: None,
            bcc: None,
            reply_to: None,
            subject: None,
            html: None,
            text: None,
            attachments: Vec::new(),
        }
    }

    pub fn with_from(mut self, from: impl Into<Address>) -> Self {
        self.from = Some(from.into());
        self
    }

    pub fn with_cc(mut self, cc: impl Into<Recipients>) -> Self {
        self.cc = Some(cc.into());
        self
    }

    pub fn with_bcc(mut self, bcc: impl Into<Recipients>) -> Self {
        self.bcc = Some(bcc.into());
        self
    }

    pub fn with_reply_to(mut self, reply_to: impl Into<Recipients>) -> Self {
        self.reply_to = Some(reply_to.into());
        self
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Set plain text body
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set HTML body
    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.html = Some(html.into());
        self
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }
}

/// Result of a successful send
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentEmail {
    /// Provider-assigned email ID
    pub email_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_from_loose_json() {
        let message: OutboundMessage = serde_json::from_value(json!({
            "from": { "name": "Support", "address": "support@example.com" },
            "to": ["a@example.com", { "name": "B", "address": "b@example.com" }],
            "replyTo": "reply@example.com",
            "subject": "Hello",
            "attachments": [
                { "filename": "a.txt", "content": "hi" },
                { "filename": "b.bin", "content": [1, 2, 3] },
                { "filename": "c.bin", "content": { "unexpected": true } }
            ]
        }))
        .unwrap();

        assert_eq!(
            message.from,
            Some(Address::named("Support", "support@example.com"))
        );
        assert_eq!(
            message.to,
            Recipients::Many(vec![
                Address::from("a@example.com"),
                Address::named("B", "b@example.com"),
            ])
        );
        assert_eq!(message.reply_to, Some(Recipients::from("reply@example.com")));
        assert!(message.cc.is_none());
        assert_eq!(
            message.attachments[0].content,
            Some(AttachmentContent::Text("hi".to_string()))
        );
        assert_eq!(
            message.attachments[1].content,
            Some(AttachmentContent::Binary(vec![1, 2, 3]))
        );
        assert!(matches!(
            message.attachments[2].content,
            Some(AttachmentContent::Other(_))
        ));
    }

    #[test]
    fn test_serialized_buffer_is_binary() {
        let attachment: Attachment = serde_json::from_value(json!({
            "filename": "b.bin",
            "content": { "type": "Buffer", "data": [104, 105] }
        }))
        .unwrap();
        assert_eq!(attachment, Attachment::binary("b.bin", b"hi".to_vec()));

        for content in [
            json!({ "type": "Blob", "data": [1, 2] }),
            json!({ "type": "Buffer", "data": "aGk=" }),
            json!({ "type": "Buffer" }),
        ] {
            let parsed: AttachmentContent = serde_json::from_value(content.clone()).unwrap();
            assert_eq!(parsed, AttachmentContent::Other(content));
        }
    }

    #[test]
    fn test_pair_without_name() {
        let address: Address =
            serde_json::from_value(json!({ "address": "a@example.com" })).unwrap();
        assert_eq!(address, Address::named("", "a@example.com"));
    }

    #[test]
    fn test_single_named_recipient() {
        let recipients: Recipients =
            serde_json::from_value(json!({ "name": "A", "address": "a@example.com" })).unwrap();

        assert_eq!(
            recipients,
            Recipients::One(Address::named("A", "a@example.com"))
        );
    }

    #[test]
    fn test_recipients_is_empty() {
        assert!(Recipients::from("").is_empty());
        assert!(Recipients::Many(Vec::new()).is_empty());
        assert!(!Recipients::from("a@example.com").is_empty());
        assert!(!Recipients::from(Address::named("", "")).is_empty());
    }
}
