use crate::types::{DigestError, FeedSource, FetchConfig, Result};
use std::path::PathBuf;

pub const DEFAULT_KEYWORD: &str = "Dubai";
pub const DEFAULT_SNIPPET_LIMIT: usize = 200;
pub const DEFAULT_OUTPUT: &str = "index.html";
pub const DEFAULT_RECIPIENTS: &str = "recipients.txt";
pub const DEFAULT_HEADER_IMAGE: &str = "assets/dubai-skyline.png";

pub const ENV_SMTP_PASSWORD: &str = "SMTP_PASSWORD";
pub const ENV_GITHUB_ACTIONS: &str = "GITHUB_ACTIONS";

pub fn default_feeds() -> Vec<FeedSource> {
    vec![
        FeedSource::new("Google News", "https://news.google.com/rss/search?q=Dubai&hl=en"),
        FeedSource::new("Gulf News (UAE)", "https://gulfnews.com/rss?cat=/uae"),
        FeedSource::new("Khaleej Times", "https://www.khaleejtimes.com/rss?section=uae"),
        FeedSource::new("Al Jazeera", "https://www.aljazeera.com/xml/rss/all.xml"),
        FeedSource::new("CNN ME", "https://rss.cnn.com/rss/edition_meast.rss"),
        FeedSource::new("Reuters World", "https://feeds.reuters.com/reuters/worldNews"),
        FeedSource::new("BBC ME", "http://feeds.bbci.co.uk/news/world/middle_east/rss.xml"),
        FeedSource::new("The National UAE", "https://www.thenationalnews.com/rss?outputType=xml"),
    ]
}

/// The display title used when none is given: `Everything <keyword>`.
pub fn default_title(keyword: &str) -> String {
    format!("Everything {}", keyword)
}

#[derive(Clone)]
pub struct MailConfig {
    pub from: String,
    pub smtp_server: String,
    pub smtp_port: u16,
    pub imap_server: String,
    pub imap_port: u16,
    pub password: Option<String>,
    pub timeout_seconds: u64,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            from: "scottandann@me.com".to_string(),
            smtp_server: "smtp.mail.me.com".to_string(),
            smtp_port: 587,
            imap_server: "imap.mail.me.com".to_string(),
            imap_port: 993,
            password: None,
            timeout_seconds: 30,
        }
    }
}

impl std::fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailConfig")
            .field("from", &self.from)
            .field("smtp_server", &self.smtp_server)
            .field("smtp_port", &self.smtp_port)
            .field("imap_server", &self.imap_server)
            .field("imap_port", &self.imap_port)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct DigestConfig {
    pub feeds: Vec<FeedSource>,
    pub keyword: String,
    pub title: String,
    pub snippet_limit: usize,
    pub output_path: PathBuf,
    pub recipients_path: PathBuf,
    pub header_image: Option<String>,
    pub fetch: FetchConfig,
    pub mail: MailConfig,
    pub send_email: bool,
    pub scan_inbox: bool,
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            feeds: default_feeds(),
            keyword: DEFAULT_KEYWORD.to_string(),
            title: default_title(DEFAULT_KEYWORD),
            snippet_limit: DEFAULT_SNIPPET_LIMIT,
            output_path: PathBuf::from(DEFAULT_OUTPUT),
            recipients_path: PathBuf::from(DEFAULT_RECIPIENTS),
            header_image: Some(DEFAULT_HEADER_IMAGE.to_string()),
            fetch: FetchConfig::default(),
            mail: MailConfig::default(),
            send_email: true,
            scan_inbox: true,
        }
    }
}

impl DigestConfig {
    /// Defaults plus the process environment.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    /// `SMTP_PASSWORD` supplies the mail credential; `GITHUB_ACTIONS=true`
    /// turns mail delivery off.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(password) = lookup(ENV_SMTP_PASSWORD).filter(|p| !p.is_empty()) {
            self.mail.password = Some(password);
        }
        if lookup(ENV_GITHUB_ACTIONS).as_deref() == Some("true") {
            self.send_email = false;
        }
    }
}

/// Parse a `NAME=URL` feed argument.
pub fn parse_feed_arg(arg: &str) -> Result<FeedSource> {
    let (name, url) = arg
        .split_once('=')
        .ok_or_else(|| DigestError::General(format!("Expected NAME=URL, got {:?}", arg)))?;

    let (name, url) = (name.trim(), url.trim());
    if name.is_empty() {
        return Err(DigestError::General(format!("Feed name missing in {:?}", arg)));
    }

    let parsed = url::Url::parse(url)?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(DigestError::General(format!("Feed URL must be http(s): {}", url)));
    }

    Ok(FeedSource::new(name, url))
}
