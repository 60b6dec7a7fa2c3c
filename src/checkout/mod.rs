//! Checkout workflow
//!
//! Converts a non-empty cart into an order:
//!
//! ```text
//! Browsing -> ReviewingCart -> AwaitingCheckoutForm -> OrderPlaced
//! ```
//!
//! The only guard is a non-empty cart, checked when the form opens and again
//! inside the storage transaction that turns the cart rows into the order.
//! The confirmation is sent afterwards; delivery failures are logged and
//! never undo the order.

use std::sync::Arc;

use crate::core::error::{ShopError, ValidationError};
use crate::core::model::{CartItem, Order, cart_total};
use crate::core::session::SessionId;
use crate::core::store::{CartStore, OrderStore, ShopStore};
use crate::core::validation::CheckoutForm;
use crate::notification::Notification;

/// Where a visitor stands in the checkout flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutState {
    Browsing,
    ReviewingCart,
    AwaitingCheckoutForm,
    OrderPlaced,
}

impl CheckoutState {
    /// Where a visitor viewing these cart rows stands
    pub fn of_cart(items: &[CartItem]) -> Self {
        if items.is_empty() {
            CheckoutState::Browsing
        } else {
            CheckoutState::ReviewingCart
        }
    }
}

/// Result of opening the checkout page
#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutReview {
    /// Nothing to check out; the visitor goes back to browsing
    EmptyCart,
    AwaitingForm { items: Vec<CartItem>, total: f64 },
}

/// Result of submitting the checkout form
#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutOutcome {
    EmptyCart,
    /// The form was rejected; the cart is untouched
    Invalid {
        items: Vec<CartItem>,
        total: f64,
        error: ValidationError,
    },
    Placed {
        order: Order,
        /// Whether the confirmation email was delivered
        notified: bool,
    },
}

impl CheckoutReview {
    pub fn state(&self) -> CheckoutState {
        match self {
            CheckoutReview::EmptyCart => CheckoutState::Browsing,
            CheckoutReview::AwaitingForm { .. } => CheckoutState::AwaitingCheckoutForm,
        }
    }
}

impl CheckoutOutcome {
    pub fn state(&self) -> CheckoutState {
        match self {
            CheckoutOutcome::EmptyCart => CheckoutState::Browsing,
            CheckoutOutcome::Invalid { .. } => CheckoutState::AwaitingCheckoutForm,
            CheckoutOutcome::Placed { .. } => CheckoutState::OrderPlaced,
        }
    }
}

/// Orchestrates the stores and the confirmation notice
#[derive(Clone)]
pub struct CheckoutWorkflow {
    store: Arc<dyn ShopStore>,
    notification: Notification,
}

impl CheckoutWorkflow {
    pub fn new(store: Arc<dyn ShopStore>, notification: Notification) -> Self {
        Self {
            store,
            notification,
        }
    }

    /// Open the checkout form for the session's cart
    pub async fn review(&self, session_id: &SessionId) -> Result<CheckoutReview, ShopError> {
        let items = self.store.list_for_session(session_id).await?;
        if items.is_empty() {
            return Ok(CheckoutReview::EmptyCart);
        }

        let total = cart_total(&items);
        Ok(CheckoutReview::AwaitingForm { items, total })
    }

    /// Validate the form and place the order
    ///
    /// Returns `Err` only when storage fails; the cart is then left as it was.
    pub async fn submit(
        &self,
        session_id: &SessionId,
        form: &CheckoutForm,
    ) -> Result<CheckoutOutcome, ShopError> {
        let items = match self.review(session_id).await? {
            CheckoutReview::EmptyCart => return Ok(CheckoutOutcome::EmptyCart),
            CheckoutReview::AwaitingForm { items, .. } => items,
        };

        let customer = match form.validate_details() {
            Ok(customer) => customer,
            Err(error) => {
                tracing::debug!(session_id = %session_id, %error, "checkout form rejected");
                let total = cart_total(&items);
                return Ok(CheckoutOutcome::Invalid {
                    items,
                    total,
                    error,
                });
            }
        };

        // The order is built from the cart as the store sees it at commit,
        // which may differ from `items` if another tab changed it meanwhile.
        let Some(order) = self.store.place_order(session_id, customer).await? else {
            tracing::info!(session_id = %session_id, "cart emptied before checkout committed");
            return Ok(CheckoutOutcome::EmptyCart);
        };

        tracing::info!(
            session_id = %session_id,
            order_id = order.id,
            total_amount = order.total_amount,
            services = order.services.len(),
            "order placed"
        );

        let notified = match self.notification.send(&order).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(order_id = order.id, error = %e, "failed to send confirmation email");
                false
            }
        };

        Ok(CheckoutOutcome::Placed { order, notified })
    }
}
