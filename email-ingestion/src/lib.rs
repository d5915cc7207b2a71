pub mod email_ingester;
pub mod recipients;

pub use email_ingester::{EmailIngester, EmailIngesterConfig};
pub use recipients::{merge_subscribers, RecipientSet, RecipientStore};
