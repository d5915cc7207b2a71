use rss_digest::config::{default_feeds, default_title, parse_feed_arg, DEFAULT_KEYWORD};
use rss_digest::DigestConfig;
use std::collections::HashMap;

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn test_defaults() {
    let config = DigestConfig::default();

    assert_eq!(config.keyword, DEFAULT_KEYWORD);
    assert_eq!(config.title, "Everything Dubai");
    assert_eq!(config.snippet_limit, 200);
    assert_eq!(config.feeds.len(), 8);
    assert_eq!(config.mail.smtp_port, 587);
    assert_eq!(config.mail.timeout_seconds, 30);
    assert!(config.mail.password.is_none());
    assert!(config.send_email);
    assert!(config.scan_inbox);
}

#[test]
fn test_default_feeds_are_unique_http_urls() {
    let feeds = default_feeds();
    let mut urls: Vec<&str> = feeds.iter().map(|f| f.url.as_str()).collect();
    urls.sort();
    urls.dedup();

    assert_eq!(urls.len(), feeds.len());
    assert!(feeds.iter().all(|f| f.url.starts_with("http")));
    assert!(feeds.iter().any(|f| f.name == "BBC ME"));
}

#[test]
fn test_apply_env_password_and_ci() {
    let mut config = DigestConfig::default();
    config.apply_env(env(&[("SMTP_PASSWORD", "app-password"), ("GITHUB_ACTIONS", "true")]));

    assert_eq!(config.mail.password.as_deref(), Some("app-password"));
    assert!(!config.send_email);
}

#[test]
fn test_apply_env_ignores_empty_and_non_ci() {
    let mut config = DigestConfig::default();
    config.apply_env(env(&[("SMTP_PASSWORD", ""), ("GITHUB_ACTIONS", "false")]));

    assert!(config.mail.password.is_none());
    assert!(config.send_email);
}

#[test]
fn test_mail_config_debug_hides_password() {
    let mut config = DigestConfig::default();
    config.apply_env(env(&[("SMTP_PASSWORD", "hunter2")]));

    assert!(!format!("{:?}", config).contains("hunter2"));
}

#[test]
fn test_parse_feed_arg() {
    let feed = parse_feed_arg("Gulf News = https://gulfnews.com/rss?cat=/uae").expect("valid feed");
    assert_eq!(feed.name, "Gulf News");
    assert_eq!(feed.url, "https://gulfnews.com/rss?cat=/uae");

    assert!(parse_feed_arg("https://no-name.example.com").is_err());
    assert!(parse_feed_arg("=https://example.com").is_err());
    assert!(parse_feed_arg("Name=not a url").is_err());
    assert!(parse_feed_arg("Name=ftp://example.com/feed").is_err());
}

#[test]
fn test_default_title() {
    assert_eq!(default_title("Sharjah"), "Everything Sharjah");
}
