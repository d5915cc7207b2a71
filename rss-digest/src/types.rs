use chrono::{DateTime, Utc};
use feed_rs::model::Entry;
// Shared types live in the interfaces crate
pub use interfaces::defs::{Article, FeedSource, SubscriptionInbox};

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub max_feed_size_mb: usize,
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "RSS-Digest/1.0".to_string(),
            timeout_seconds: 30,
            max_feed_size_mb: 10,
            max_redirects: 5,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FetchResult {
    pub url: String,
    pub fetch_time: DateTime<Utc>,
    pub response_time_ms: u64,
    pub http_status: u16,
    pub content: Vec<u8>, // RSS/XML content
}

#[derive(Debug)]
pub struct ParsedFeed {
    pub title: Option<String>,
    pub entries: Vec<ParsedEntry>,
}

#[derive(Debug, Clone)]
pub struct ParsedEntry {
    pub title: Option<String>,
    pub url: String,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub thumbnails: Vec<String>,
    pub media: Vec<MediaRef>,
    pub enclosures: Vec<MediaRef>,
}

/// A media URL with its declared MIME type, if the feed gave one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRef {
    pub url: String,
    pub media_type: Option<String>,
}

impl MediaRef {
    pub fn is_image(&self) -> bool {
        self.media_type
            .as_deref()
            .map(|t| t.to_ascii_lowercase().starts_with("image/"))
            .unwrap_or(false)
    }
}

impl ParsedEntry {
    /// Link-less entries have nothing to point the reader at and are dropped.
    pub fn from_entry(entry: Entry) -> Option<Self> {
        let url = entry.links.first()?.href.trim().to_string();
        if url.is_empty() {
            return None;
        }

        let mut thumbnails = Vec::new();
        let mut media = Vec::new();
        for object in &entry.media {
            thumbnails.extend(object.thumbnails.iter().map(|t| t.image.uri.clone()));
            media.extend(object.content.iter().filter_map(|c| {
                c.url.as_ref().map(|u| MediaRef {
                    url: u.to_string(),
                    media_type: c.content_type.as_ref().map(|m| m.to_string()),
                })
            }));
        }

        let enclosures = entry
            .links
            .iter()
            .filter(|l| l.rel.as_deref().is_some_and(|r| r.eq_ignore_ascii_case("enclosure")))
            .map(|l| MediaRef {
                url: l.href.clone(),
                media_type: l.media_type.clone(),
            })
            .collect();

        Some(Self {
            title: entry.title.map(|t| t.content),
            url,
            summary: entry.summary.map(|s| s.content),
            content: entry.content.and_then(|c| c.body),
            published_at: entry.published,
            updated_at: entry.updated,
            thumbnails,
            media,
            enclosures,
        })
    }

    /// Title, summary and content joined, for keyword matching.
    pub fn text_blob(&self) -> String {
        [self.title.as_deref(), self.summary.as_deref(), self.content.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DigestError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Feed parse error: {0}")]
    Parse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Feed size exceeds limit: {size_mb}MB")]
    FeedTooLarge { size_mb: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid email address {address}: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("Mail error: {0}")]
    Mail(String),

    #[error("General error: {0}")]
    General(String),
}

pub type Result<T> = std::result::Result<T, DigestError>;
