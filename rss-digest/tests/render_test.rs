use chrono::{NaiveDate, TimeZone, Utc};
use rss_digest::{render_html, Article, Digest, DigestConfig, RenderOptions};

fn options() -> RenderOptions {
    RenderOptions::from_config(&DigestConfig::default())
}

fn sample_article() -> Article {
    Article {
        title: "Dubai <script>alert(1)</script> & Co".to_string(),
        link: "https://news.example.com/story?a=1&b=2".to_string(),
        source: "Gulf Wire".to_string(),
        published: Utc.with_ymd_and_hms(2025, 10, 14, 8, 5, 0).unwrap(),
        snippet: "Snippet <i>text</i>".to_string(),
        image: Some("https://img.example.com/a.jpg".to_string()),
    }
}

#[test]
fn test_render_article_row() {
    let digest = Digest::new(NaiveDate::from_ymd_opt(2025, 10, 14).unwrap(), vec![sample_article()]);
    let html = render_html(&digest, &options());

    assert!(html.starts_with("<!doctype html>"));
    assert!(html.trim_end().ends_with("</html>"));
    assert!(html.contains("2025-10-14"));
    assert!(html.contains("Dubai &lt;script&gt;alert(1)&lt;/script&gt; &amp; Co"));
    assert!(!html.contains("<script>"));
    assert!(html.contains(r#"href="https://news.example.com/story?a=1&amp;b=2""#));
    assert!(html.contains(r#"<img src="https://img.example.com/a.jpg""#));
    assert!(html.contains("Snippet &lt;i&gt;text&lt;/i&gt;"));
    assert!(html.contains("Gulf Wire • 2025-10-14 08:05"));
    assert!(!html.contains("No Dubai articles today."));
}

#[test]
fn test_render_empty_digest_placeholder() {
    let digest = Digest::new(NaiveDate::from_ymd_opt(2025, 10, 14).unwrap(), Vec::new());
    let html = render_html(&digest, &options());

    assert!(html.contains("No Dubai articles today."));
    assert!(html.contains("Everything&nbsp;Dubai"));
}

#[test]
fn test_render_subscribe_button() {
    let digest = Digest::new(NaiveDate::from_ymd_opt(2025, 10, 14).unwrap(), Vec::new());
    let opts = options();
    let html = render_html(&digest, &opts);

    assert_eq!(
        opts.subscribe_link(),
        "mailto:scottandann@me.com?subject=ADD%20RECIPIENT&body=Please%20add%20me%20to%20Everything%20Dubai"
    );
    assert!(html.contains(
        "mailto:scottandann@me.com?subject=ADD%20RECIPIENT&amp;body=Please%20add%20me%20to%20Everything%20Dubai"
    ));
    assert!(html.contains("Add&nbsp;New&nbsp;Recipient"));
}

#[test]
fn test_render_drops_unsafe_urls() {
    let mut article = sample_article();
    article.link = "javascript:alert(1)".to_string();
    article.image = Some("data:image/png;base64,AAAA".to_string());

    let digest = Digest::new(NaiveDate::from_ymd_opt(2025, 10, 14).unwrap(), vec![article]);
    let html = render_html(&digest, &options());

    assert!(!html.contains("javascript:"));
    assert!(!html.contains("data:image"));
    assert!(html.contains(r##"href="#""##));
}

#[test]
fn test_render_without_header_image() {
    let mut opts = options();
    opts.header_image = None;
    opts.keyword = "Sharjah".to_string();
    opts.title = "Sharjah Daily".to_string();

    let digest = Digest::new(NaiveDate::from_ymd_opt(2025, 10, 14).unwrap(), Vec::new());
    let html = render_html(&digest, &opts);

    assert!(!html.contains("dubai-skyline"));
    assert!(html.contains("No Sharjah articles today."));
    assert!(html.contains("Sharjah&nbsp;Daily"));
    assert_eq!(opts.plain_text_fallback(), "Switch to HTML view to see today's Sharjah headlines.");
}
