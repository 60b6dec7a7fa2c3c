//! Persisted entities: cart items, orders and feedback

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::core::session::SessionId;
use crate::core::validation::{CustomerDetails, FeedbackDetails};

/// A catalog entry snapshot tied to one session, awaiting checkout
///
/// Name, price and description are copied at add-time so later catalog edits
/// never alter an existing cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: i64,
    pub session_id: SessionId,
    pub service_name: String,
    pub service_price: f64,
    pub service_description: String,
    pub date_added: DateTime<Utc>,
}

/// Result of adding a catalog entry to a cart
#[derive(Debug, Clone, PartialEq)]
pub enum AddOutcome {
    /// A new row was persisted
    Added(CartItem),
    /// The session already holds a row for this service; nothing was written
    AlreadyPresent(CartItem),
}

impl AddOutcome {
    pub fn item(&self) -> &CartItem {
        match self {
            AddOutcome::Added(item) | AddOutcome::AlreadyPresent(item) => item,
        }
    }
}

/// One purchased service, serialized into `order.services`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub name: String,
    pub price: f64,
    pub description: String,
}

impl From<&CartItem> for OrderLine {
    fn from(item: &CartItem) -> Self {
        Self {
            name: item.service_name.clone(),
            price: item.service_price,
            description: item.service_description.clone(),
        }
    }
}

/// An immutable record of a completed checkout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub event_date: NaiveDate,
    pub total_amount: f64,
    pub services: Vec<OrderLine>,
    pub order_date: DateTime<Utc>,
}

/// An order that has not been stored yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub customer: CustomerDetails,
    pub total_amount: f64,
    pub services: Vec<OrderLine>,
}

impl NewOrder {
    /// Snapshot the current cart rows into an order
    ///
    /// Prices are taken from the cart, not from the live catalog.
    pub fn from_cart(customer: CustomerDetails, items: &[CartItem]) -> Self {
        let services: Vec<OrderLine> = items.iter().map(OrderLine::from).collect();
        let total_amount = round_cents(services.iter().map(|line| line.price).sum());

        Self {
            customer,
            total_amount,
            services,
        }
    }

    /// Attach the storage-assigned id and timestamp
    pub fn into_order(self, id: i64, order_date: DateTime<Utc>) -> Order {
        Order {
            id,
            customer_name: self.customer.name,
            customer_email: self.customer.email,
            customer_phone: self.customer.phone,
            event_date: self.customer.event_date,
            total_amount: self.total_amount,
            services: self.services,
            order_date,
        }
    }
}

/// A visitor rating, independent of the cart and order flow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub id: i64,
    pub name: String,
    pub rating: i64,
    pub message: String,
    pub date_submitted: DateTime<Utc>,
}

/// Feedback that has not been stored yet
pub type NewFeedback = FeedbackDetails;

impl NewFeedback {
    pub fn into_feedback(self, id: i64, date_submitted: DateTime<Utc>) -> Feedback {
        Feedback {
            id,
            name: self.name,
            rating: self.rating,
            message: self.message,
            date_submitted,
        }
    }
}

/// Sum of item prices, rounded to cents
pub fn cart_total(items: &[CartItem]) -> f64 {
    round_cents(items.iter().map(|item| item.service_price).sum())
}

fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
