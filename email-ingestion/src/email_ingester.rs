use anyhow::{Context, Result};
use interfaces::SubscriptionInbox;
use std::io::{Read, Write};
use std::net::TcpStream;
use tracing::{debug, info, warn};
use url::Url;

pub const DEFAULT_MAILBOX: &str = "INBOX";
pub const DEFAULT_SUBJECT_MARKER: &str = "ADD RECIPIENT";

#[derive(Clone)]
pub struct EmailIngesterConfig {
    pub server: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub mailbox: String,
    pub subject_marker: String,
    pub use_tls: bool,
    /// Only read when `use_tls` is off: upgrade with STARTTLS, or stay plain.
    pub starttls: bool,
    pub accept_invalid_certs: bool,
    pub accept_invalid_hostnames: bool,
}

impl std::fmt::Debug for EmailIngesterConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailIngesterConfig")
            .field("server", &self.server)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"***")
            .field("mailbox", &self.mailbox)
            .field("subject_marker", &self.subject_marker)
            .field("use_tls", &self.use_tls)
            .field("starttls", &self.starttls)
            .finish()
    }
}

impl EmailIngesterConfig {
    /// IMAPS on port 993, `INBOX`, looking for the default subject marker.
    pub fn new(
        server: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            server: server.into(),
            port: 993,
            username: username.into(),
            password: password.into(),
            mailbox: DEFAULT_MAILBOX.to_string(),
            subject_marker: DEFAULT_SUBJECT_MARKER.to_string(),
            use_tls: true,
            starttls: true,
            accept_invalid_certs: false,
            accept_invalid_hostnames: false,
        }
    }

    /// Parse email configuration from a URI plus the account password.
    /// Expected URI format: email://username@server:port/mailbox?tls=true
    ///
    /// For a full address as username, percent-encode the `@`
    /// (`email://me%40example.com@imap.example.com`).
    pub fn from_uri(uri: &str, password: &str) -> Result<Self> {
        let parsed_uri = Url::parse(uri)
            .map_err(|e| anyhow::anyhow!("Invalid email URI '{}': {}", uri, e))?;

        if parsed_uri.scheme() != "email" {
            return Err(anyhow::anyhow!("URI must use 'email://' scheme, got: {}", parsed_uri.scheme()));
        }

        let server = parsed_uri.host_str()
            .ok_or_else(|| anyhow::anyhow!("No server specified in URI: {}", uri))?
            .to_string();

        let username = parsed_uri.username().replace("%40", "@");
        if username.is_empty() {
            return Err(anyhow::anyhow!("No username in URI: {}", uri));
        }

        let mut config = Self::new(server, username, password);
        config.port = parsed_uri.port().unwrap_or(993);

        let path = parsed_uri.path().trim_start_matches('/');
        if !path.is_empty() {
            config.mailbox = path.to_string();
        }

        for (key, value) in parsed_uri.query_pairs() {
            match key.as_ref() {
                "tls" => config.use_tls = value.parse().unwrap_or(true),
                "starttls" => config.starttls = value.parse().unwrap_or(true),
                "accept_invalid_certs" => {
                    config.accept_invalid_certs = value.parse().unwrap_or(false)
                }
                "accept_invalid_hostnames" => {
                    config.accept_invalid_hostnames = value.parse().unwrap_or(false)
                }
                "subject" => config.subject_marker = value.into_owned(),
                _ => debug!("Ignoring unknown email URI parameter: {}", key),
            }
        }

        Ok(config)
    }

    /// IMAP SEARCH criteria selecting unread subscribe requests.
    pub fn search_query(&self) -> String {
        let marker = self.subject_marker.replace('\\', "\\\\").replace('"', "\\\"");
        format!("UNSEEN SUBJECT \"{}\"", marker)
    }
}

pub struct EmailIngester {
    config: EmailIngesterConfig,
}

impl EmailIngester {
    pub fn with_config(config: EmailIngesterConfig) -> Self {
        Self { config }
    }

    /// Senders of every unread message whose subject carries the marker.
    /// Each processed message is flagged `\Seen` so the next run skips it.
    pub fn fetch_subscribe_requests(&self) -> Result<Vec<String>> {
        let config = &self.config;
        let address = (config.server.as_str(), config.port);

        if !config.use_tls && !config.starttls {
            let stream = TcpStream::connect(address)
                .with_context(|| format!("connect to {}:{}", config.server, config.port))?;
            let mut client = imap::Client::new(stream);
            client.read_greeting().context("read IMAP greeting")?;
            return self.scan(client);
        }

        let tls = native_tls::TlsConnector::builder()
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .danger_accept_invalid_hostnames(config.accept_invalid_hostnames)
            .build()?;

        let client = if config.use_tls {
            imap::connect(address, &config.server, &tls)
        } else {
            imap::connect_starttls(address, &config.server, &tls)
        }
        .with_context(|| format!("connect to {}:{}", config.server, config.port))?;

        self.scan(client)
    }

    fn scan<T: Read + Write>(&self, client: imap::Client<T>) -> Result<Vec<String>> {
        let config = &self.config;

        let mut imap_session = client.login(&config.username, &config.password)
            .map_err(|(e, _client)| anyhow::anyhow!("Login failed: {:?}", e))?;
        imap_session.select(&config.mailbox)
            .with_context(|| format!("select mailbox {}", config.mailbox))?;

        let mut message_ids: Vec<u32> = imap_session.search(config.search_query())?
            .into_iter()
            .collect();
        message_ids.sort_unstable();

        debug!("Found {} subscribe requests in {}", message_ids.len(), config.mailbox);

        let mut senders = Vec::new();
        for id in message_ids {
            let sequence = id.to_string();

            let messages = match imap_session.fetch(&sequence, "RFC822") {
                Ok(messages) => messages,
                Err(e) => {
                    warn!("Failed to fetch message {}: {}", id, e);
                    continue;
                }
            };

            for message in messages.iter() {
                match message.body().and_then(sender_address) {
                    Some(sender) => senders.push(sender),
                    None => warn!("Message {} has no usable From address", id),
                }
            }

            if let Err(e) = imap_session.store(&sequence, "+FLAGS (\\Seen)") {
                warn!("Failed to mark message {} as seen: {}", id, e);
            }
        }

        // Messages are already flagged \Seen: keep the senders even if logout fails.
        if let Err(e) = imap_session.logout() {
            warn!("IMAP logout from {} failed: {}", config.server, e);
        }
        info!("Collected {} subscribe requests from {}", senders.len(), config.server);
        Ok(senders)
    }
}

impl SubscriptionInbox for EmailIngester {
    fn collect_subscribers(&self) -> Result<Vec<String>> {
        self.fetch_subscribe_requests()
    }
}

/// Lowercased `From` address of a raw RFC822 message.
pub fn sender_address(raw: &[u8]) -> Option<String> {
    let parsed = mail_parser::MessageParser::default().parse(raw)?;

    parsed.from()
        .and_then(|addrs| addrs.first())
        .and_then(|addr| addr.address.as_ref())
        .map(|addr| addr.trim().to_lowercase())
        .filter(|addr| !addr.is_empty())
}
