//! Storage traits for carts, orders and feedback
//!
//! Implementations are agnostic to the storage engine. Every operation takes
//! the session id explicitly; nothing is read from ambient request state.

use anyhow::Result;
use async_trait::async_trait;

use crate::core::catalog::CatalogEntry;
use crate::core::model::{AddOutcome, CartItem, Feedback, NewFeedback, Order};
use crate::core::session::SessionId;
use crate::core::validation::CustomerDetails;

/// Rows of "item X added by session Y"
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Snapshot an entry into the session's cart
    ///
    /// Adding a service the session already holds returns
    /// [`AddOutcome::AlreadyPresent`] and writes nothing.
    async fn add(&self, session_id: &SessionId, entry: &CatalogEntry) -> Result<AddOutcome>;

    /// Items for the session in insertion order
    async fn list_for_session(&self, session_id: &SessionId) -> Result<Vec<CartItem>>;

    /// Remove an item only if it belongs to the session
    ///
    /// Returns `None` for unknown ids and for ids owned by another session;
    /// in the latter case the row is left untouched.
    async fn remove_item(&self, session_id: &SessionId, item_id: i64) -> Result<Option<CartItem>>;

    /// Delete every row for the session, returning how many were removed
    async fn clear_session(&self, session_id: &SessionId) -> Result<u64>;
}

/// Finalized purchases
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Turn the session's cart into an order as one atomic unit
    ///
    /// The cart is read, the order is built from exactly those rows, and
    /// only those rows are deleted, all under the same transaction. Returns
    /// `None` when the cart is empty at that point, for example because a
    /// concurrent checkout already consumed it. If any write fails nothing is
    /// visible afterwards.
    async fn place_order(
        &self,
        session_id: &SessionId,
        customer: CustomerDetails,
    ) -> Result<Option<Order>>;

    /// Get an order by id
    async fn get(&self, id: i64) -> Result<Option<Order>>;

    /// List every order, oldest first
    async fn list(&self) -> Result<Vec<Order>>;
}

/// Visitor ratings and comments
#[async_trait]
pub trait FeedbackStore: Send + Sync {
    async fn submit(&self, feedback: NewFeedback) -> Result<Feedback>;

    /// At most `limit` entries, newest first
    async fn list_recent(&self, limit: usize) -> Result<Vec<Feedback>>;
}

/// A backend providing all three stores
pub trait ShopStore: CartStore + OrderStore + FeedbackStore {}

impl<T> ShopStore for T where T: CartStore + OrderStore + FeedbackStore {}
