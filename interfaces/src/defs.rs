use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A feed to poll, labelled with the name shown next to each article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSource {
    pub name: String,
    pub url: String,
}

impl FeedSource {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// One matching feed entry, normalized for rendering.
///
/// `link` is the identity of an article: two entries with the same link are
/// the same story, whichever feed they came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub link: String,
    pub source: String,
    pub published: DateTime<Utc>,
    pub snippet: String,
    pub image: Option<String>,
}

// Object style note:
// Implementations run inside a short lived, single-run process. They hold
// connection settings, not state; every call opens and closes its own session.

/// Somewhere people can ask to be added to the digest's mailing list.
pub trait SubscriptionInbox {
    /// Sender addresses of pending subscribe requests. Requests returned here
    /// are consumed: a second call must not return them again.
    fn collect_subscribers(&self) -> anyhow::Result<Vec<String>>;
}
