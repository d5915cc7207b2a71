pub mod aggregator;
pub mod config;
pub mod delivery;
pub mod digest;
pub mod fetcher;
pub mod filter;
pub mod parser;
pub mod render;
pub mod types;

pub use types::*;
pub use aggregator::{run, DigestAggregator, RunSummary};
pub use config::{DigestConfig, MailConfig};
pub use digest::{dedup_newest_first, Digest};
pub use fetcher::Fetcher;
pub use filter::{clean_html, first_image, normalize, KeywordFilter};
pub use parser::FeedParser;
pub use render::{render_html, RenderOptions};
