use anyhow::{Context, Result};
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use sweep_config::{EmailSettings, TlsMode};
use tracing::{debug, warn};

use crate::notifier::{Notification, Notifier};

/// Blocking SMTP delivery over TLS, authenticated with the decoded credential.
pub struct SmtpNotifier {
    settings: EmailSettings,
    password: String,
}

impl SmtpNotifier {
    pub fn new(settings: EmailSettings, password: String) -> Self {
        Self { settings, password }
    }

    pub fn build_message(&self, notification: &Notification) -> Result<Message> {
        let from: Mailbox = self
            .settings
            .from
            .parse()
            .with_context(|| format!("invalid from address {:?}", self.settings.from))?;
        let mut builder = Message::builder().from(from).subject(notification.subject.as_str());
        for to in self.settings.to.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let mailbox: Mailbox = to.parse().with_context(|| format!("invalid to address {:?}", to))?;
            builder = builder.to(mailbox);
        }

        let text = SinglePart::plain(notification.body.clone());
        let attachment = notification.attachment.as_ref().and_then(|path| match std::fs::read(path) {
            Ok(bytes) => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| "sweep.log".to_string());
                Some(Attachment::new(name).body(bytes, ContentType::TEXT_PLAIN))
            }
            Err(e) => {
                warn!("Sending without attachment; cannot read {}: {}", path.display(), e);
                None
            }
        });

        let message = match attachment {
            Some(attachment) => builder.multipart(MultiPart::mixed().singlepart(text).singlepart(attachment)),
            None => builder.singlepart(text),
        }
        .context("build email")?;
        Ok(message)
    }

    fn transport(&self) -> Result<SmtpTransport> {
        let host = self.settings.smtp_host.as_str();
        let builder = match self.settings.tls {
            TlsMode::Starttls => SmtpTransport::starttls_relay(host),
            TlsMode::Implicit => SmtpTransport::relay(host),
        }
        .with_context(|| format!("configure TLS for {}", host))?;
        Ok(builder
            .port(self.settings.port)
            .credentials(Credentials::new(self.settings.username().to_string(), self.password.clone()))
            .build())
    }
}

impl Notifier for SmtpNotifier {
    fn send(&self, notification: &Notification) -> Result<()> {
        let message = self.build_message(notification)?;
        let transport = self.transport()?;
        debug!(
            host = %self.settings.smtp_host,
            port = self.settings.port,
            "sending notification"
        );
        transport
            .send(&message)
            .with_context(|| format!("send via {}:{}", self.settings.smtp_host, self.settings.port))?;
        Ok(())
    }
}
