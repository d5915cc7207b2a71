use rss_digest::config::MailConfig;
use rss_digest::delivery::{build_digest_message, write_static, Mailer};
use rss_digest::DigestError;
use uuid::Uuid;

#[test]
fn test_build_digest_message_skips_invalid_recipients() {
    let recipients = vec![
        "a@example.com".to_string(),
        "not an address".to_string(),
        "b@example.com".to_string(),
    ];

    let message = build_digest_message(
        "digest@example.com",
        &recipients,
        "Everything Dubai",
        "Switch to HTML view",
        "<p>html</p>",
    )
    .expect("message builds");

    assert_eq!(message.envelope().to().len(), 2);

    let formatted = String::from_utf8(message.formatted()).expect("utf-8 message");
    assert!(formatted.contains("Subject: Everything Dubai"));
    assert!(formatted.contains("multipart/alternative"));
    assert!(formatted.contains("text/plain"));
    assert!(formatted.contains("text/html"));
}

#[test]
fn test_build_digest_message_requires_a_recipient() {
    let recipients = vec!["nope".to_string()];

    let result = build_digest_message("digest@example.com", &recipients, "S", "p", "h");

    assert!(matches!(result, Err(DigestError::Mail(_))));
}

#[test]
fn test_build_digest_message_rejects_bad_sender() {
    let recipients = vec!["a@example.com".to_string()];

    let result = build_digest_message("bad sender", &recipients, "S", "p", "h");

    assert!(matches!(result, Err(DigestError::InvalidAddress { .. })));
}

#[tokio::test]
async fn test_mailer_requires_password() {
    let config = MailConfig::default();
    assert!(matches!(Mailer::new(&config), Err(DigestError::Mail(_))));

    let config = MailConfig {
        password: Some("secret".to_string()),
        ..MailConfig::default()
    };
    assert!(Mailer::new(&config).is_ok());
}

#[tokio::test]
async fn test_write_static_creates_parent_dirs() {
    let dir = std::env::temp_dir().join(format!("rss-digest-{}", Uuid::new_v4()));
    let path = dir.join("site").join("index.html");

    write_static(&path, "<!doctype html><html></html>").await.expect("write succeeds");

    assert_eq!(
        std::fs::read_to_string(&path).expect("file exists"),
        "<!doctype html><html></html>"
    );
    std::fs::remove_dir_all(&dir).ok();
}
