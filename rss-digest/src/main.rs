use anyhow::Context;
use clap::Parser;
use rss_digest::config::{default_title, parse_feed_arg};
use rss_digest::DigestConfig;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Build the daily keyword digest: fetch feeds, render HTML, mail it out.
#[derive(Debug, Parser)]
#[command(name = "rss-digest", version)]
struct Args {
    /// Keyword an item must mention (whole word, any case)
    #[arg(short, long)]
    keyword: Option<String>,

    /// Digest title; defaults to "Everything <keyword>"
    #[arg(long)]
    title: Option<String>,

    /// Where to write the rendered HTML
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Flat recipient list, one address per line
    #[arg(short, long)]
    recipients: Option<PathBuf>,

    /// Maximum snippet length in characters
    #[arg(long)]
    snippet_limit: Option<usize>,

    /// Header image shown above the title
    #[arg(long)]
    header_image: Option<String>,

    /// Feed as NAME=URL; repeat to replace the built-in list
    #[arg(long = "feed", value_name = "NAME=URL")]
    feeds: Vec<String>,

    /// Write the file only, never send mail
    #[arg(long)]
    no_email: bool,

    /// Do not poll the inbox for subscribe requests
    #[arg(long)]
    no_inbox: bool,
}

impl Args {
    fn into_config(self) -> anyhow::Result<DigestConfig> {
        let mut config = DigestConfig::from_env();

        if let Some(keyword) = self.keyword {
            config.title = default_title(&keyword);
            config.keyword = keyword;
        }
        if let Some(title) = self.title {
            config.title = title;
        }
        if let Some(output) = self.output {
            config.output_path = output;
        }
        if let Some(recipients) = self.recipients {
            config.recipients_path = recipients;
        }
        if let Some(limit) = self.snippet_limit {
            config.snippet_limit = limit;
        }
        if let Some(image) = self.header_image {
            config.header_image = Some(image).filter(|i| !i.is_empty());
        }
        if !self.feeds.is_empty() {
            config.feeds = self
                .feeds
                .iter()
                .map(|arg| parse_feed_arg(arg))
                .collect::<Result<_, _>>()
                .context("invalid --feed")?;
        }
        if self.no_email {
            config.send_email = false;
        }
        if self.no_inbox {
            config.scan_inbox = false;
        }

        Ok(config)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Args::parse().into_config()?;
    info!(
        "Starting digest for {:?} over {} feeds",
        config.keyword,
        config.feeds.len()
    );

    match rss_digest::run(&config).await {
        Ok(summary) => {
            info!(
                "Digest finished: {} articles, {} recipients ({} new), email sent: {}",
                summary.articles, summary.recipients, summary.new_recipients, summary.email_sent
            );
            Ok(())
        }
        Err(e) => {
            error!("Digest run failed: {}", e);
            Err(e.into())
        }
    }
}
