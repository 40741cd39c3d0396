//! Adapter configuration.

use crate::error::ConfigError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

/// Public Unsend instance, used when `UNSEND_URL` is not set
pub const DEFAULT_BASE_URL: &str = "https://app.unsend.dev";

const DEFAULT_FROM_NAME: &str = "Notifications";

/// Static configuration the adapter is built from.
///
/// Immutable once handed to [`crate::UnsendAdapter`].
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdapterConfig {
    /// Unsend API key, sent as a bearer token
    pub api_key: String,
    /// Sender address used when a message has no `from`
    pub default_from_address: String,
    /// Sender name used when a message has no `from`
    pub default_from_name: String,
    /// Base URL of the Unsend instance, without the `/api/v1` suffix
    #[serde(alias = "unsendurl")]
    pub base_url: String,
    /// When to deliver every email sent through this adapter
    #[serde(default)]
    pub scheduled_at: Option<String>,
    /// Template applied to every email sent through this adapter
    #[serde(default)]
    pub template_id: Option<String>,
    /// Template variables applied to every email
    #[serde(default)]
    pub variables: Option<BTreeMap<String, String>>,
}

impl AdapterConfig {
    pub fn new(
        api_key: impl Into<String>,
        default_from_address: impl Into<String>,
        default_from_name: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            default_from_address: default_from_address.into(),
            default_from_name: default_from_name.into(),
            base_url: base_url.into(),
            scheduled_at: None,
            template_id: None,
            variables: None,
        }
    }

    pub fn with_scheduled_at(mut self, scheduled_at: impl Into<String>) -> Self {
        self.scheduled_at = Some(scheduled_at.into());
        self
    }

    pub fn with_template_id(mut self, template_id: impl Into<String>) -> Self {
        self.template_id = Some(template_id.into());
        self
    }

    pub fn with_variables<K, V>(mut self, variables: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.variables = Some(
            variables
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    /// Full URL of the send-email endpoint
    pub fn emails_url(&self) -> String {
        format!("{}/api/v1/emails", self.base_url.trim_end_matches('/'))
    }

    /// Create configuration from environment variables.
    ///
    /// Expects:
    /// - `UNSEND_API_KEY`
    /// - `UNSEND_FROM_ADDRESS`
    /// - `UNSEND_FROM_NAME` (defaults to "Notifications")
    /// - `UNSEND_URL` (defaults to [`DEFAULT_BASE_URL`])
    /// - `UNSEND_SCHEDULED_AT`, `UNSEND_TEMPLATE_ID` (optional)
    /// - `UNSEND_VARIABLES` (optional JSON object of strings)
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = env_required("UNSEND_API_KEY")?;
        let from_address = env_required("UNSEND_FROM_ADDRESS")?;
        let from_name = env_or_default("UNSEND_FROM_NAME", DEFAULT_FROM_NAME);
        let base_url = env_or_default("UNSEND_URL", DEFAULT_BASE_URL);

        let mut config = Self::new(api_key, from_address, from_name, base_url);
        config.scheduled_at = env_optional("UNSEND_SCHEDULED_AT");
        config.template_id = env_optional("UNSEND_TEMPLATE_ID");

        if let Some(raw) = env_optional("UNSEND_VARIABLES") {
            let variables = serde_json::from_str(&raw).map_err(|e| ConfigError::ParseError {
                key: "UNSEND_VARIABLES".to_string(),
                details: e.to_string(),
            })?;
            config.variables = Some(variables);
        }

        Ok(config)
    }

    /// Check that the configuration can be used to reach Unsend.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::Invalid("API key is empty".to_string()));
        }

        let url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| ConfigError::Invalid(format!("base URL '{}': {}", self.base_url, e)))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid(format!(
                "base URL '{}' must use http or https",
                self.base_url
            )));
        }

        Ok(())
    }
}

impl fmt::Debug for AdapterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterConfig")
            .field("api_key", &"[redacted]")
            .field("default_from_address", &self.default_from_address)
            .field("default_from_name", &self.default_from_name)
            .field("base_url", &self.base_url)
            .field("scheduled_at", &self.scheduled_at)
            .field("template_id", &self.template_id)
            .field("variables", &self.variables)
            .finish()
    }
}

fn env_required(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

fn env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_optional(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}
