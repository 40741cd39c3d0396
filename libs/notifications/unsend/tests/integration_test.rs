//! Integration tests for the Unsend adapter over real HTTP

use email_unsend::{
    AdapterConfig, Address, Attachment, EmailAdapter, ErrorKind, OutboundMessage, UnsendAdapter,
};
use serde_json::json;
use test_utils::{TEST_API_KEY, TestDataBuilder, TestUnsend, unreachable_base_url};

const FROM_ADDRESS: &str = "hello@example.com";
const FROM_NAME: &str = "Example Team";

fn adapter_for(base_url: &str) -> UnsendAdapter {
    UnsendAdapter::new(AdapterConfig::new(
        TEST_API_KEY,
        FROM_ADDRESS,
        FROM_NAME,
        base_url,
    ))
}

mod send_tests {
    use super::*;

    #[tokio::test]
    async fn test_send_email_success() {
        let unsend = TestUnsend::new().await;
        let builder = TestDataBuilder::from_test_name("test_send_email_success");
        let email_id = builder.email_id();
        unsend.accept(&email_id).await;

        let adapter = adapter_for(&unsend.base_url());
        let message = OutboundMessage::new("to@example.com")
            .with_from("from@example.com")
            .with_subject("This was sent on init")
            .with_text("This is my message body");

        let sent = adapter.send_email(&message).await.expect("send failed");
        assert_eq!(sent.email_id, email_id);

        let received = unsend.received_emails().await;
        assert_eq!(received.len(), 1);
        assert_eq!(
            received[0],
            json!({
                "from": "from@example.com",
                "to": "to@example.com",
                "subject": "This was sent on init",
                "text": "This is my message body",
            })
        );
    }

    #[tokio::test]
    async fn test_full_message_mapping() {
        let unsend = TestUnsend::new().await;
        unsend.accept("em_full").await;

        let config = AdapterConfig::new(TEST_API_KEY, FROM_ADDRESS, FROM_NAME, unsend.base_url())
            .with_scheduled_at("2026-01-01T09:00:00Z")
            .with_variables([("plan", "pro")]);
        let adapter = UnsendAdapter::new(config);

        let message = OutboundMessage::new(vec![
            Address::from("a@example.com"),
            Address::named("B", "b@example.com"),
        ])
        .with_cc(Address::named("C", "c@example.com"))
        .with_bcc("d@example.com")
        .with_html("<p>Hello</p>")
        .with_attachment(Attachment::text("note.txt", "hello"));

        adapter.send_email(&message).await.expect("send failed");

        let received = unsend.received_emails().await;
        assert_eq!(
            received[0],
            json!({
                "from": "Example Team <hello@example.com>",
                "to": ["a@example.com", "b@example.com"],
                "cc": ["c@example.com"],
                "bcc": "d@example.com",
                "subject": "No subject provided",
                "html": "<p>Hello</p>",
                "text": "Please view this email in an HTML-compatible client.",
                "attachments": [{ "filename": "note.txt", "content": "aGVsbG8=" }],
                "scheduledAt": "2026-01-01T09:00:00Z",
                "variables": { "plan": "pro" },
            })
        );
    }

    #[tokio::test]
    async fn test_identical_sends_issue_two_requests() {
        let unsend = TestUnsend::new().await;
        unsend.accept("em_twice").await;

        let adapter = adapter_for(&unsend.base_url());
        let message = OutboundMessage::new("to@example.com").with_text("Body");

        adapter.send_email(&message).await.expect("first send failed");
        adapter.send_email(&message).await.expect("second send failed");

        assert_eq!(unsend.request_count().await, 2);
    }

    #[tokio::test]
    async fn test_concurrent_sends_share_adapter() {
        let unsend = TestUnsend::new().await;
        unsend.accept("em_concurrent").await;

        let adapter = adapter_for(&unsend.base_url());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let adapter = adapter.clone();
                tokio::spawn(async move {
                    let message = OutboundMessage::new(format!("user{}@example.com", i));
                    adapter.send_email(&message).await
                })
            })
            .collect();

        for handle in handles {
            let sent = handle.await.expect("task panicked").expect("send failed");
            assert_eq!(sent.email_id, "em_concurrent");
        }

        assert_eq!(unsend.request_count().await, 4);
    }
}

mod error_tests {
    use super::*;

    #[tokio::test]
    async fn test_error_code_schema() {
        let unsend = TestUnsend::new().await;
        unsend
            .respond(
                403,
                json!({ "error": { "code": "FORBIDDEN", "message": "Invalid API token" } }),
            )
            .await;

        let adapter = adapter_for(&unsend.base_url());
        let err = adapter
            .send_email(&OutboundMessage::new("to@example.com"))
            .await
            .unwrap_err();

        assert_eq!(err.status, 403);
        assert_eq!(err.kind, ErrorKind::Provider);
        assert_eq!(
            err.message,
            "Error sending email: 403 FORBIDDEN - Invalid API token"
        );
    }

    #[tokio::test]
    async fn test_error_name_schema() {
        let unsend = TestUnsend::new().await;
        unsend
            .respond(
                403,
                json!({
                    "name": "validation_error",
                    "message": "error information",
                    "statusCode": 403
                }),
            )
            .await;

        let adapter = adapter_for(&unsend.base_url());
        let err = adapter
            .send_email(&OutboundMessage::new("to@example.com"))
            .await
            .unwrap_err();

        assert_eq!(err.status, 403);
        assert_eq!(
            err.to_string(),
            "Error sending email: 403 validation_error - error information"
        );
    }

    #[tokio::test]
    async fn test_string_status_code_keeps_detail() {
        let unsend = TestUnsend::new().await;
        unsend
            .respond(
                422,
                json!({
                    "name": "validation_error",
                    "message": "bad from",
                    "statusCode": "403"
                }),
            )
            .await;

        let adapter = adapter_for(&unsend.base_url());
        let err = adapter
            .send_email(&OutboundMessage::new("to@example.com"))
            .await
            .unwrap_err();

        assert_eq!(err.status, 422);
        assert_eq!(err.kind, ErrorKind::Provider);
        assert_eq!(
            err.message,
            "Error sending email: 422 validation_error - bad from (provider reported 403)"
        );
    }

    #[tokio::test]
    async fn test_non_json_response() {
        let unsend = TestUnsend::new().await;
        unsend.respond_raw(502, "Bad Gateway").await;

        let adapter = adapter_for(&unsend.base_url());
        let err = adapter
            .send_email(&OutboundMessage::new("to@example.com"))
            .await
            .unwrap_err();

        assert_eq!(err.status, 500);
        assert_eq!(err.kind, ErrorKind::Parse);
    }

    #[tokio::test]
    async fn test_connection_failure() {
        let adapter = adapter_for(&unreachable_base_url());
        let err = adapter
            .send_email(&OutboundMessage::new("to@example.com"))
            .await
            .unwrap_err();

        assert_eq!(err.status, 500);
        assert_eq!(err.kind, ErrorKind::Transport);
        assert!(err.message.starts_with("Error sending email: Request failed:"));
    }

    #[tokio::test]
    async fn test_bad_attachment_sends_nothing() {
        let unsend = TestUnsend::new().await;
        unsend.accept("em_unused").await;

        let adapter = adapter_for(&unsend.base_url());
        let message = OutboundMessage::new("to@example.com").with_attachment(Attachment {
            filename: None,
            content: None,
        });

        let err = adapter.send_email(&message).await.unwrap_err();
        assert!(err.is_mapping());
        assert!(err.message.contains("Attachment is missing filename or content"));
        assert_eq!(unsend.request_count().await, 0);
    }

    #[tokio::test]
    async fn test_wrong_api_key_is_rejected() {
        let unsend = TestUnsend::new().await;
        unsend.accept("em_unused").await;

        // The stand-in only answers requests carrying TEST_API_KEY
        let adapter = UnsendAdapter::new(AdapterConfig::new(
            "wrong-key",
            FROM_ADDRESS,
            FROM_NAME,
            unsend.base_url(),
        ));
        let err = adapter
            .send_email(&OutboundMessage::new("to@example.com"))
            .await
            .unwrap_err();

        assert_ne!(err.kind, ErrorKind::Mapping);
        assert_eq!(unsend.request_count().await, 1);
    }
}
