//! Order-confirmation notices
//!
//! A [`Mailer`] is the delivery capability: it takes a rendered message and a
//! recipient and reports success or failure. [`Notification`] renders the
//! confirmation for an order and hands it to the configured mailer.

pub mod smtp;

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::core::model::Order;
use crate::views::Views;

pub use smtp::SmtpMailer;

/// Subject line of the order confirmation
pub const CONFIRMATION_SUBJECT: &str = "Order Confirmation - Phew !! Event Management";

/// Errors raised while rendering or delivering a notice
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("failed to render confirmation: {0}")]
    Render(String),

    #[error("invalid address '{address}': {message}")]
    InvalidAddress { address: String, message: String },

    #[error("failed to build message: {0}")]
    Build(String),

    #[error("delivery failed: {0}")]
    DeliveryFailed(String),
}

/// A rendered message ready for delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Delivery capability
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn deliver(&self, mail: OutgoingMail) -> Result<(), NotificationError>;
}

/// Mailer that only logs what it would have sent
///
/// Used when no SMTP server is configured.
#[derive(Clone, Debug, Default)]
pub struct LogMailer;

impl LogMailer {
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn deliver(&self, mail: OutgoingMail) -> Result<(), NotificationError> {
        tracing::info!(
            to = %mail.to,
            subject = %mail.subject,
            bytes = mail.html.len(),
            "confirmation email (not sent, no SMTP server configured)"
        );
        Ok(())
    }
}

/// Mailer that keeps every message in memory
#[derive(Clone, Default)]
pub struct OutboxMailer {
    sent: Arc<RwLock<Vec<OutgoingMail>>>,
}

impl OutboxMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages delivered so far, oldest first
    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.read().map(|sent| sent.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Mailer for OutboxMailer {
    async fn deliver(&self, mail: OutgoingMail) -> Result<(), NotificationError> {
        self.sent
            .write()
            .map_err(|e| NotificationError::DeliveryFailed(e.to_string()))?
            .push(mail);
        Ok(())
    }
}

/// Renders and delivers order confirmations
#[derive(Clone)]
pub struct Notification {
    views: Arc<Views>,
    mailer: Arc<dyn Mailer>,
}

impl Notification {
    pub fn new(views: Arc<Views>, mailer: Arc<dyn Mailer>) -> Self {
        Self { views, mailer }
    }

    /// Render the confirmation for `order` and send it to the customer
    pub async fn send(&self, order: &Order) -> Result<(), NotificationError> {
        let html = self
            .views
            .render_confirmation(order)
            .map_err(|e| NotificationError::Render(e.to_string()))?;

        self.mailer
            .deliver(OutgoingMail {
                to: order.customer_email.clone(),
                subject: CONFIRMATION_SUBJECT.to_string(),
                html,
            })
            .await
    }
}
