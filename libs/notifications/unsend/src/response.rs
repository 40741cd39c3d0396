//! Response bodies returned by Unsend.
//!
//! Success is recognised by the presence of `emailId` alone. Unsend has
//! shipped two error schemas, `{ error: { code, message } }` and
//! `{ name, message, statusCode }`, and both are accepted.

use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnsendResponse {
    Sent { email_id: String },
    Failed(ErrorBody),
}

impl UnsendResponse {
    /// Classify an already-parsed JSON body.
    ///
    /// Anything without a string `emailId` is a failure; its descriptive
    /// fields are read one by one so a single odd field does not hide the rest.
    pub fn from_value(body: Value) -> Self {
        match body.get("emailId").and_then(Value::as_str) {
            Some(email_id) => Self::Sent {
                email_id: email_id.to_string(),
            },
            None => Self::Failed(ErrorBody::from_value(&body)),
        }
    }
}

/// Descriptive fields found in an Unsend error body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorBody {
    /// `error.code`, or `error` itself when it is a bare value
    pub code: Option<String>,
    pub name: Option<String>,
    /// `error.message`, falling back to the top-level `message`
    pub message: Option<String>,
    /// Status as reported in the body; may differ from the HTTP status
    pub status_code: Option<u16>,
}

impl ErrorBody {
    /// Collect whatever usable fields `body` carries.
    pub fn from_value(body: &Value) -> Self {
        let (code, nested_message) = match body.get("error") {
            Some(error @ Value::Object(_)) => (
                error.get("code").and_then(scalar_text),
                error.get("message").and_then(scalar_text),
            ),
            Some(error) => (scalar_text(error), None),
            None => (None, None),
        };

        Self {
            code,
            name: body.get("name").and_then(scalar_text),
            message: nested_message.or_else(|| body.get("message").and_then(scalar_text)),
            status_code: body.get("statusCode").and_then(status_number),
        }
    }

    /// Human-readable message for a failed send with HTTP `status`.
    pub fn describe(&self, status: u16) -> String {
        let mut formatted = format!("Error sending email: {}", status);

        let label = self.code.as_deref().or(self.name.as_deref());
        let message = self.message.as_deref();

        let detail = [label, message]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" - ");

        if !detail.is_empty() {
            formatted.push(' ');
            formatted.push_str(&detail);
        }

        if let Some(reported) = self.status_code.filter(|reported| *reported != status) {
            formatted.push_str(&format!(" (provider reported {})", reported));
        }

        formatted
    }
}

/// Text of a string, number or boolean; `None` for blanks and containers.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn status_number(value: &Value) -> Option<u16> {
    match value {
        Value::Number(number) => number.as_u64().and_then(|n| u16::try_from(n).ok()),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}
