//! # Phew Events
//!
//! A small event-management storefront: a fixed catalog of event packages
//! and service providers, a per-visitor cart, a checkout that turns the cart
//! into an order and emails a confirmation, and a feedback board.
//!
//! ## Features
//!
//! - **Catalog**: packages and providers keyed by stable identifiers
//! - **Anonymous sessions**: a cookie scopes every cart operation
//! - **Atomic checkout**: the order is stored and the cart cleared together
//! - **Pluggable storage**: in-memory or SQLite behind the same traits
//! - **Confirmation email**: SMTP via lettre, or logged when unconfigured
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use phew::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     ServerBuilder::new()
//!         .with_store(InMemoryStore::new())
//!         .with_mailer(LogMailer::new())
//!         .serve("127.0.0.1:5000")
//!         .await
//! }
//! ```

pub mod checkout;
pub mod config;
pub mod core;
pub mod notification;
pub mod server;
pub mod storage;
pub mod views;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        catalog::{Catalog, CatalogEntry},
        error::{ShopError, ValidationError},
        flash::{Flash, FlashLevel, Flashes},
        model::{AddOutcome, CartItem, Feedback, Order, OrderLine},
        session::SessionId,
        store::{CartStore, FeedbackStore, OrderStore, ShopStore},
        validation::{CheckoutForm, FeedbackForm},
    };

    // === Checkout ===
    pub use crate::checkout::{CheckoutOutcome, CheckoutReview, CheckoutState, CheckoutWorkflow};

    // === Storage ===
    pub use crate::storage::{InMemoryStore, RetryPolicy};
    #[cfg(feature = "sqlite")]
    pub use crate::storage::SqliteStore;

    // === Notification ===
    pub use crate::notification::{LogMailer, Mailer, Notification, SmtpMailer};

    // === Config ===
    pub use crate::config::AppConfig;

    // === Server ===
    pub use crate::server::{AppState, ServerBuilder};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
}
