//! Unsend API test infrastructure
//!
//! Provides a `TestUnsend` helper that serves the send-email endpoint from a
//! local mock HTTP server.

use serde_json::{Value, json};
use std::net::TcpListener;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Path of the send-email endpoint
pub const EMAILS_PATH: &str = "/api/v1/emails";

/// API key every `TestUnsend` instance expects
pub const TEST_API_KEY: &str = "test-api-key";

/// Local stand-in for an Unsend instance
///
/// The server shuts down when this struct is dropped.
///
/// # Example
///
/// ```no_run
/// use test_utils::TestUnsend;
///
/// # async fn example() {
/// let unsend = TestUnsend::new().await;
/// unsend.accept("em_123").await;
///
/// // Point the adapter at `unsend.base_url()` using `TEST_API_KEY`
/// let sent = unsend.received_emails().await;
/// # }
/// ```
pub struct TestUnsend {
    server: MockServer,
}

impl TestUnsend {
    /// Start a new server with no mounted responses
    pub async fn new() -> Self {
        let server = MockServer::start().await;
        tracing::info!(uri = %server.uri(), "Test Unsend server ready");
        Self { server }
    }

    /// Base URL to configure the adapter with
    pub fn base_url(&self) -> String {
        self.server.uri()
    }

    /// Answer authorized sends with `200 {"emailId": email_id}`
    pub async fn accept(&self, email_id: &str) {
        self.respond(200, json!({ "emailId": email_id })).await;
    }

    /// Answer authorized sends with `status` and a JSON `body`
    pub async fn respond(&self, status: u16, body: Value) {
        self.mount(ResponseTemplate::new(status).set_body_json(body))
            .await;
    }

    /// Answer authorized sends with `status` and a raw, non-JSON `body`
    pub async fn respond_raw(&self, status: u16, body: &str) {
        self.mount(
            ResponseTemplate::new(status)
                .set_body_raw(body.as_bytes().to_vec(), "text/plain"),
        )
        .await;
    }

    async fn mount(&self, response: ResponseTemplate) {
        Mock::given(method("POST"))
            .and(path(EMAILS_PATH))
            .and(header("Authorization", format!("Bearer {}", TEST_API_KEY)))
            .and(header("Content-Type", "application/json"))
            .respond_with(response)
            .mount(&self.server)
            .await;
    }

    /// JSON bodies of every request received so far, in arrival order
    pub async fn received_emails(&self) -> Vec<Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter_map(|request| request.body_json::<Value>().ok())
            .collect()
    }

    /// Number of requests received so far
    pub async fn request_count(&self) -> usize {
        self.server
            .received_requests()
            .await
            .map(|requests| requests.len())
            .unwrap_or_default()
    }
}

/// Base URL on localhost with nothing listening behind it
pub fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind local port");
    let port = listener
        .local_addr()
        .expect("Failed to read local address")
        .port();
    drop(listener);

    format!("http://127.0.0.1:{}", port)
}
