use crate::config::MailConfig;
use crate::types::{DigestError, Result};
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

/// Write the rendered digest, creating parent directories as needed.
pub async fn write_static(path: &Path, html: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, html).await?;
    Ok(())
}

/// One multipart/alternative message with every recipient in `To`.
/// Addresses that do not parse are skipped.
pub fn build_digest_message<'a, I>(
    from: &str,
    recipients: I,
    subject: &str,
    plain: &str,
    html: &str,
) -> Result<Message>
where
    I: IntoIterator<Item = &'a String>,
{
    let from = from.parse::<Mailbox>().map_err(|e| DigestError::InvalidAddress {
        address: from.to_string(),
        reason: e.to_string(),
    })?;

    let mut builder = Message::builder().from(from).subject(subject);
    let mut valid = 0;
    for recipient in recipients {
        match recipient.parse::<Mailbox>() {
            Ok(mailbox) => {
                builder = builder.to(mailbox);
                valid += 1;
            }
            Err(e) => warn!("Skipping invalid recipient {}: {}", recipient, e),
        }
    }

    if valid == 0 {
        return Err(DigestError::Mail("No valid recipients".to_string()));
    }

    builder
        .multipart(MultiPart::alternative_plain_html(plain.to_string(), html.to_string()))
        .map_err(|e| DigestError::Mail(format!("build email: {}", e)))
}

pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl Mailer {
    /// STARTTLS relay authenticated as the sender address.
    pub fn new(config: &MailConfig) -> Result<Self> {
        let password = config
            .password
            .clone()
            .ok_or_else(|| DigestError::Mail("No SMTP password configured".to_string()))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_server)
            .map_err(|e| {
                DigestError::Mail(format!("invalid SMTP server {}: {}", config.smtp_server, e))
            })?
            .port(config.smtp_port)
            .credentials(Credentials::new(config.from.clone(), password))
            .timeout(Some(Duration::from_secs(config.timeout_seconds)))
            .build();

        Ok(Self {
            transport,
            from: config.from.clone(),
        })
    }

    pub async fn send_digest<'a, I>(
        &self,
        subject: &str,
        plain: &str,
        html: &str,
        recipients: I,
    ) -> Result<()>
    where
        I: IntoIterator<Item = &'a String>,
    {
        let message = build_digest_message(&self.from, recipients, subject, plain, html)?;
        let count = message.envelope().to().len();

        self.transport
            .send(message)
            .await
            .map_err(|e| DigestError::Mail(format!("send email: {}", e)))?;

        info!("Sent digest to {} recipients", count);
        Ok(())
    }
}
