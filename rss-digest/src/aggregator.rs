use crate::config::DigestConfig;
use crate::delivery::{write_static, Mailer};
use crate::digest::{dedup_newest_first, Digest};
use crate::fetcher::Fetcher;
use crate::filter::{normalize, KeywordFilter};
use crate::parser::FeedParser;
use crate::render::{render_html, RenderOptions};
use crate::types::{Article, FeedSource, Result};
use chrono::{DateTime, Local, Utc};
use email_ingestion::{
    merge_subscribers, EmailIngester, EmailIngesterConfig, RecipientSet, RecipientStore,
};
use std::path::PathBuf;
use tracing::{error, info, warn};

pub struct DigestAggregator {
    feeds: Vec<FeedSource>,
    fetcher: Fetcher,
    filter: KeywordFilter,
    snippet_limit: usize,
}

impl DigestAggregator {
    pub fn new(config: &DigestConfig) -> Result<Self> {
        Ok(Self {
            feeds: config.feeds.clone(),
            fetcher: Fetcher::new(config.fetch.clone())?,
            filter: KeywordFilter::new(&config.keyword)?,
            snippet_limit: config.snippet_limit,
        })
    }

    /// Matching articles from already fetched feed content.
    pub fn articles_from_content(
        &self,
        source: &FeedSource,
        content: &[u8],
        fetched_at: DateTime<Utc>,
    ) -> Result<Vec<Article>> {
        let parsed_feed = FeedParser::parse_feed(content)?;
        let entries_found = parsed_feed.entries.len();

        let articles: Vec<Article> = parsed_feed
            .entries
            .iter()
            .filter(|entry| self.filter.matches(entry))
            .map(|entry| normalize(entry, &source.name, fetched_at, self.snippet_limit))
            .collect();

        info!(
            "{}: {} of {} entries mention {}",
            source.name,
            articles.len(),
            entries_found,
            self.filter.keyword()
        );
        Ok(articles)
    }

    pub async fn fetch_source(&self, source: &FeedSource) -> Result<Vec<Article>> {
        let fetch_result = self.fetcher.fetch_feed(&source.url).await?;
        self.articles_from_content(source, &fetch_result.content, fetch_result.fetch_time)
    }

    /// Every feed in order; a feed that cannot be fetched or parsed is skipped.
    pub async fn collect_articles(&self) -> Vec<Article> {
        let mut articles = Vec::new();
        let mut successful_fetches = 0;

        for source in &self.feeds {
            match self.fetch_source(source).await {
                Ok(found) => {
                    successful_fetches += 1;
                    articles.extend(found);
                }
                Err(e) => error!("Failed to fetch feed {} ({}): {}", source.name, source.url, e),
            }
        }

        info!("Successfully fetched {}/{} feeds", successful_fetches, self.feeds.len());
        dedup_newest_first(articles)
    }
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub articles: usize,
    pub recipients: usize,
    pub new_recipients: usize,
    pub output_path: PathBuf,
    pub email_sent: bool,
}

/// Load the recipient list and fold in subscribe requests from the inbox.
/// Never fails: problems are logged and the best known list is returned.
///
/// A list that cannot be read is left untouched on disk. That run mails the
/// sender alone and does not consume any subscribe requests.
pub async fn refresh_recipients(config: &DigestConfig) -> (RecipientSet, usize) {
    let store = RecipientStore::new(&config.recipients_path, &config.mail.from);

    let mut recipients = match store.load() {
        Ok(recipients) => recipients,
        Err(e) => {
            warn!(
                "Could not load recipients, leaving {} as it is: {:#}",
                store.path().display(),
                e
            );
            let fallback: RecipientSet = [config.mail.from.to_lowercase()].into_iter().collect();
            return (fallback, 0);
        }
    };

    let mut added = 0;
    match (config.scan_inbox, config.mail.password.clone()) {
        (false, _) => info!("Inbox scan disabled"),
        (true, None) => warn!("No SMTP password configured, skipping inbox scan"),
        (true, Some(password)) => {
            let mut imap_config =
                EmailIngesterConfig::new(&config.mail.imap_server, &config.mail.from, password);
            imap_config.port = config.mail.imap_port;
            let ingester = EmailIngester::with_config(imap_config);

            let mut scanned = recipients.clone();
            let task = tokio::task::spawn_blocking(move || {
                let added = merge_subscribers(&mut scanned, &ingester);
                (scanned, added)
            });

            match task.await {
                Ok((scanned, count)) => {
                    recipients = scanned;
                    added = count;
                }
                Err(e) => warn!("Inbox scan task failed: {}", e),
            }
        }
    }

    if let Err(e) = store.save(&recipients) {
        warn!("Could not save recipients: {:#}", e);
    }

    (recipients, added)
}

/// One full digest run. Only failing to write the static file is fatal.
pub async fn run(config: &DigestConfig) -> Result<RunSummary> {
    let (recipients, new_recipients) = refresh_recipients(config).await;

    let aggregator = DigestAggregator::new(config)?;
    let articles = aggregator.collect_articles().await;

    let digest = Digest::new(Local::now().date_naive(), articles);
    let options = RenderOptions::from_config(config);
    let html = render_html(&digest, &options);

    write_static(&config.output_path, &html).await?;
    info!(
        "Saved digest with {} articles → {}",
        digest.articles.len(),
        config.output_path.display()
    );

    let email_sent = if !config.send_email {
        info!("Email delivery disabled, skipping send");
        false
    } else if config.mail.password.is_none() {
        warn!("No SMTP password configured, skipping send");
        false
    } else {
        let sent = match Mailer::new(&config.mail) {
            Ok(mailer) => {
                mailer
                    .send_digest(&config.title, &options.plain_text_fallback(), &html, &recipients)
                    .await
            }
            Err(e) => Err(e),
        };
        match sent {
            Ok(()) => true,
            Err(e) => {
                error!("Email failed: {}", e);
                false
            }
        }
    };

    Ok(RunSummary {
        articles: digest.articles.len(),
        recipients: recipients.len(),
        new_recipients,
        output_path: config.output_path.clone(),
        email_sent,
    })
}
