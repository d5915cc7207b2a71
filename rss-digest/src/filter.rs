use crate::types::{Article, DigestError, ParsedEntry, Result};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

pub const ELLIPSIS: char = '…';
pub const UNTITLED: &str = "(no title)";

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("valid tag pattern"));
static IMG_SRC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)<img[^>]+src="([^"]+)""#).expect("valid img pattern"));

/// Whole-word, case-insensitive keyword match.
#[derive(Debug, Clone)]
pub struct KeywordFilter {
    keyword: String,
    pattern: Regex,
}

impl KeywordFilter {
    pub fn new(keyword: &str) -> Result<Self> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(DigestError::General("Keyword must not be empty".to_string()));
        }

        let pattern = RegexBuilder::new(&format!(r"\b{}\b", regex::escape(keyword)))
            .case_insensitive(true)
            .build()
            .map_err(|e| DigestError::General(format!("Invalid keyword {:?}: {}", keyword, e)))?;

        Ok(Self {
            keyword: keyword.to_string(),
            pattern,
        })
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }

    /// Looks at title, summary and content together.
    pub fn matches(&self, entry: &ParsedEntry) -> bool {
        self.is_match(&entry.text_blob())
    }
}

/// Plain text of an HTML fragment: tags dropped, entities decoded, whitespace
/// collapsed. Markup that was only entity-encoded is dropped as well.
pub fn strip_markup(raw: &str) -> String {
    let without_tags = TAG_RE.replace_all(raw, " ");
    let decoded = html_escape::decode_html_entities(&without_tags);
    let without_tags = TAG_RE.replace_all(&decoded, " ");

    without_tags.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// `strip_markup`, then shortened to at most `limit` characters.
pub fn clean_html(raw: &str, limit: usize) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }
    shorten(&strip_markup(raw), limit)
}

/// Cut at a word boundary so the result, ellipsis included, fits in `limit`
/// characters. A single word longer than the limit is cut mid-word.
pub fn shorten(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    if limit == 0 {
        return String::new();
    }

    let budget = limit - 1;
    let mut out = String::new();
    let mut used = 0;

    for word in text.split(' ') {
        let word_len = word.chars().count();
        let needed = if out.is_empty() { word_len } else { word_len + 1 };
        if used + needed > budget {
            break;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
        used += needed;
    }

    if out.is_empty() {
        out = text.chars().take(budget).collect();
    }
    out.push(ELLIPSIS);
    out
}

/// First usable picture for an entry, in this order: media thumbnail, image
/// media content, image enclosure, `<img>` inside the summary or content.
pub fn first_image(entry: &ParsedEntry) -> Option<String> {
    if let Some(thumb) = entry.thumbnails.iter().find(|t| !t.trim().is_empty()) {
        return Some(thumb.trim().to_string());
    }

    // Untyped media:content is almost always a picture in news feeds
    if let Some(media) = entry
        .media
        .iter()
        .find(|m| m.media_type.is_none() || m.is_image())
    {
        return Some(media.url.clone());
    }

    if let Some(enclosure) = entry.enclosures.iter().find(|e| e.is_image()) {
        return Some(enclosure.url.clone());
    }

    [entry.summary.as_deref(), entry.content.as_deref()]
        .into_iter()
        .flatten()
        .find_map(|html| IMG_SRC_RE.captures(html))
        .map(|caps| caps[1].to_string())
}

/// Turn a parsed entry into an `Article`. Entries with neither a published nor
/// an updated date are stamped with `fetched_at`.
pub fn normalize(
    entry: &ParsedEntry,
    source: &str,
    fetched_at: DateTime<Utc>,
    snippet_limit: usize,
) -> Article {
    let title = entry
        .title
        .as_deref()
        .map(strip_markup)
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| UNTITLED.to_string());

    let snippet_source = entry
        .summary
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .or(entry.content.as_deref())
        .unwrap_or("");

    Article {
        title,
        link: entry.url.clone(),
        source: source.to_string(),
        published: entry.published_at.or(entry.updated_at).unwrap_or(fetched_at),
        snippet: clean_html(snippet_source, snippet_limit),
        image: first_image(entry),
    }
}
