//! In-memory implementation of the shop stores for testing and development

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Arc, RwLock};

use crate::core::catalog::CatalogEntry;
use crate::core::model::{AddOutcome, CartItem, Feedback, NewFeedback, NewOrder, Order};
use crate::core::session::SessionId;
use crate::core::store::{CartStore, FeedbackStore, OrderStore};
use crate::core::validation::CustomerDetails;

#[derive(Default)]
struct Tables {
    cart_items: Vec<CartItem>,
    orders: Vec<Order>,
    feedback: Vec<Feedback>,
    next_cart_id: i64,
    next_order_id: i64,
    next_feedback_id: i64,
}

fn next_id(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

/// In-memory store
///
/// All three tables sit behind one RwLock, so checking for a duplicate and
/// inserting happen under the same write guard, and `place_order` is atomic.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    /// Create a new, empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))
    }
}

#[async_trait]
impl CartStore for InMemoryStore {
    async fn add(&self, session_id: &SessionId, entry: &CatalogEntry) -> Result<AddOutcome> {
        let mut tables = self.write()?;

        if let Some(existing) = tables
            .cart_items
            .iter()
            .find(|item| &item.session_id == session_id && item.service_name == entry.name)
        {
            return Ok(AddOutcome::AlreadyPresent(existing.clone()));
        }

        let item = CartItem {
            id: next_id(&mut tables.next_cart_id),
            session_id: session_id.clone(),
            service_name: entry.name.clone(),
            service_price: entry.price,
            service_description: entry.description.clone(),
            date_added: Utc::now(),
        };
        tables.cart_items.push(item.clone());

        Ok(AddOutcome::Added(item))
    }

    async fn list_for_session(&self, session_id: &SessionId) -> Result<Vec<CartItem>> {
        let tables = self.read()?;

        Ok(tables
            .cart_items
            .iter()
            .filter(|item| &item.session_id == session_id)
            .cloned()
            .collect())
    }

    async fn remove_item(&self, session_id: &SessionId, item_id: i64) -> Result<Option<CartItem>> {
        let mut tables = self.write()?;

        let position = tables
            .cart_items
            .iter()
            .position(|item| item.id == item_id && &item.session_id == session_id);

        Ok(position.map(|index| tables.cart_items.remove(index)))
    }

    async fn clear_session(&self, session_id: &SessionId) -> Result<u64> {
        let mut tables = self.write()?;

        let before = tables.cart_items.len();
        tables.cart_items.retain(|item| &item.session_id != session_id);

        Ok((before - tables.cart_items.len()) as u64)
    }
}

#[async_trait]
impl OrderStore for InMemoryStore {
    async fn place_order(
        &self,
        session_id: &SessionId,
        customer: CustomerDetails,
    ) -> Result<Option<Order>> {
        let mut tables = self.write()?;

        let (ordered, kept): (Vec<CartItem>, Vec<CartItem>) = std::mem::take(&mut tables.cart_items)
            .into_iter()
            .partition(|item| &item.session_id == session_id);
        tables.cart_items = kept;

        if ordered.is_empty() {
            return Ok(None);
        }

        let order = NewOrder::from_cart(customer, &ordered)
            .into_order(next_id(&mut tables.next_order_id), Utc::now());
        tables.orders.push(order.clone());

        Ok(Some(order))
    }

    async fn get(&self, id: i64) -> Result<Option<Order>> {
        let tables = self.read()?;
        Ok(tables.orders.iter().find(|order| order.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<Order>> {
        let tables = self.read()?;
        Ok(tables.orders.clone())
    }
}

#[async_trait]
impl FeedbackStore for InMemoryStore {
    async fn submit(&self, feedback: NewFeedback) -> Result<Feedback> {
        let mut tables = self.write()?;

        let feedback = feedback.into_feedback(next_id(&mut tables.next_feedback_id), Utc::now());
        tables.feedback.push(feedback.clone());

        Ok(feedback)
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<Feedback>> {
        let tables = self.read()?;

        let mut recent = tables.feedback.clone();
        recent.sort_by(|a, b| {
            b.date_submitted
                .cmp(&a.date_submitted)
                .then_with(|| b.id.cmp(&a.id))
        });
        recent.truncate(limit);

        Ok(recent)
    }
}
