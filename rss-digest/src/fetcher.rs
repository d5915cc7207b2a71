use crate::types::{DigestError, FetchConfig, FetchResult, Result};
use chrono::Utc;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use url::Url;

pub struct Fetcher {
    client: Client,
    config: FetchConfig,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()?;

        Ok(Self { client, config })
    }

    /// One GET per call. Failures go back to the caller, which decides whether
    /// the feed is skipped.
    pub async fn fetch_feed(&self, url: &str) -> Result<FetchResult> {
        let start_time = Instant::now();
        let fetch_time = Utc::now();

        let parsed_url = Url::parse(url)?;
        debug!("Fetching feed: {}", parsed_url);

        let response = self.client.get(parsed_url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(DigestError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        if let Some(content_length) = response.content_length() {
            let size_mb = content_length as usize / (1024 * 1024);
            if size_mb > self.config.max_feed_size_mb {
                return Err(DigestError::FeedTooLarge { size_mb });
            }
        }

        let content = response.bytes().await?.to_vec();
        let response_time_ms = start_time.elapsed().as_millis() as u64;

        info!("Fetched feed: {} ({} bytes in {}ms)", url, content.len(), response_time_ms);

        Ok(FetchResult {
            url: url.to_string(),
            fetch_time,
            response_time_ms,
            http_status: status.as_u16(),
            content,
        })
    }
}
