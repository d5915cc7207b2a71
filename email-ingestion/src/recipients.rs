use anyhow::{Context, Result};
use interfaces::SubscriptionInbox;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Lowercase recipient addresses. Ordered, so saving always writes them sorted.
pub type RecipientSet = BTreeSet<String>;

/// Flat-file recipient list, one address per line.
pub struct RecipientStore {
    path: PathBuf,
    default_entry: String,
}

impl RecipientStore {
    pub fn new(path: impl Into<PathBuf>, default_entry: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            default_entry: default_entry.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the list, seeding the file with the default entry when it does
    /// not exist yet.
    pub fn load(&self) -> Result<RecipientSet> {
        if !self.path.is_file() {
            info!(
                "Recipient file {} missing, creating it with {}",
                self.path.display(),
                self.default_entry
            );
            fs::write(&self.path, format!("{}\n", self.default_entry))
                .with_context(|| format!("create {}", self.path.display()))?;
        }

        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("read {}", self.path.display()))?;

        let recipients: RecipientSet = raw
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_lowercase)
            .collect();

        debug!("Loaded {} recipients from {}", recipients.len(), self.path.display());
        Ok(recipients)
    }

    /// Rewrite the whole file from `recipients`.
    pub fn save(&self, recipients: &RecipientSet) -> Result<()> {
        let mut out = String::new();
        for recipient in recipients {
            out.push_str(recipient);
            out.push('\n');
        }

        fs::write(&self.path, out).with_context(|| format!("write {}", self.path.display()))?;
        debug!("Saved {} recipients to {}", recipients.len(), self.path.display());
        Ok(())
    }
}

/// Add every new subscriber the inbox knows about. Returns how many were added.
///
/// An unreachable inbox is not fatal: the failure is logged and the set is left
/// as it was.
pub fn merge_subscribers(recipients: &mut RecipientSet, inbox: &dyn SubscriptionInbox) -> usize {
    let senders = match inbox.collect_subscribers() {
        Ok(senders) => senders,
        Err(e) => {
            warn!("IMAP check failed: {:#}", e);
            return 0;
        }
    };

    let mut added = 0;
    for sender in senders {
        let sender = sender.trim().to_lowercase();
        if sender.is_empty() {
            continue;
        }
        if recipients.insert(sender.clone()) {
            info!("Added new recipient: {}", sender);
            added += 1;
        }
    }

    added
}
