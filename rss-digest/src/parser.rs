use crate::types::{DigestError, ParsedEntry, ParsedFeed, Result};
use feed_rs::parser;
use tracing::debug;

pub struct FeedParser;

impl FeedParser {
    /// Parse RSS, Atom or JSON Feed content. Dates the feed gets wrong come
    /// back as `None` rather than failing the whole feed.
    pub fn parse_feed(content: &[u8]) -> Result<ParsedFeed> {
        debug!("Parsing feed content ({} bytes)", content.len());

        let feed = parser::parse(content)
            .map_err(|e| DigestError::Parse(format!("Failed to parse feed: {}", e)))?;

        let title = feed.title.map(|t| t.content);
        let total = feed.entries.len();

        let entries: Vec<ParsedEntry> = feed
            .entries
            .into_iter()
            .filter_map(ParsedEntry::from_entry)
            .collect();

        if entries.len() < total {
            debug!("Skipped {} entries without a link", total - entries.len());
        }

        Ok(ParsedFeed { title, entries })
    }
}
