use crate::types::Article;
use chrono::NaiveDate;
use std::collections::HashSet;
use tracing::{debug, info};

/// One day's rendered aggregate.
#[derive(Debug, Clone)]
pub struct Digest {
    pub date: NaiveDate,
    pub articles: Vec<Article>,
}

impl Digest {
    pub fn new(date: NaiveDate, articles: Vec<Article>) -> Self {
        Self { date, articles }
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}

/// Newest first, one article per link. The sort is stable, so when two copies
/// of a link share a timestamp the one seen first wins.
pub fn dedup_newest_first(mut articles: Vec<Article>) -> Vec<Article> {
    articles.sort_by(|a, b| b.published.cmp(&a.published));

    let total = articles.len();
    let mut seen_links = HashSet::new();
    let unique: Vec<Article> = articles
        .into_iter()
        .filter(|article| {
            let fresh = seen_links.insert(article.link.clone());
            if !fresh {
                debug!("Removing duplicate entry: {} ({})", article.title, article.link);
            }
            fresh
        })
        .collect();

    let removed_count = total - unique.len();
    if removed_count > 0 {
        info!("Removed {} duplicate entries", removed_count);
    }

    unique
}
