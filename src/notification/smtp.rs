//! SMTP mailer using Lettre.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

use super::{Mailer, NotificationError, OutgoingMail};
use crate::config::MailConfig;

/// Sends mail through an SMTP relay.
///
/// A transport is built per message; the blocking send runs on the tokio
/// blocking pool.
#[derive(Clone)]
pub struct SmtpMailer {
    smtp_server: String,
    smtp_port: u16,
    credentials: Option<Credentials>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Build a mailer from the mail section of the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if no server is configured or the sender address
    /// does not parse.
    pub fn from_config(config: &MailConfig) -> Result<Self, NotificationError> {
        let smtp_server = config
            .smtp_server
            .clone()
            .ok_or_else(|| NotificationError::Build("no SMTP server configured".to_string()))?;

        let credentials = match (&config.username, &config.password) {
            (Some(user), Some(pass)) => Some(Credentials::new(user.clone(), pass.clone())),
            _ => None,
        };

        let sender = format!("{} <{}>", config.from_name, config.from_email);
        let from = sender
            .parse::<Mailbox>()
            .map_err(|e| NotificationError::InvalidAddress {
                address: sender.clone(),
                message: e.to_string(),
            })?;

        Ok(Self {
            smtp_server,
            smtp_port: config.smtp_port,
            credentials,
            from,
        })
    }

    fn build_transport(&self) -> Result<SmtpTransport, NotificationError> {
        let mut builder = SmtpTransport::relay(&self.smtp_server)
            .map_err(|e| NotificationError::Build(format!("SMTP relay error: {e}")))?
            .port(self.smtp_port);

        if let Some(credentials) = &self.credentials {
            builder = builder.credentials(credentials.clone());
        }

        Ok(builder.build())
    }

    fn build_message(&self, mail: OutgoingMail) -> Result<Message, NotificationError> {
        let to = mail
            .to
            .parse::<Mailbox>()
            .map_err(|e| NotificationError::InvalidAddress {
                address: mail.to.clone(),
                message: e.to_string(),
            })?;

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(mail.subject)
            .header(ContentType::TEXT_HTML)
            .body(mail.html)
            .map_err(|e| NotificationError::Build(e.to_string()))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn deliver(&self, mail: OutgoingMail) -> Result<(), NotificationError> {
        let message = self.build_message(mail)?;
        let transport = self.build_transport()?;

        tokio::task::spawn_blocking(move || {
            transport
                .send(&message)
                .map_err(|e| NotificationError::DeliveryFailed(e.to_string()))
        })
        .await
        .map_err(|e| NotificationError::DeliveryFailed(format!("email task failed: {e}")))?
        .map(|_| ())
    }
}
