//! State shared by every request handler

use std::sync::Arc;

use crate::checkout::CheckoutWorkflow;
use crate::core::catalog::Catalog;
use crate::core::store::ShopStore;
use crate::storage::retry::RetryPolicy;
use crate::views::Views;

/// Application state shared across handlers
///
/// Per-visitor data lives in cookies, never here.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub store: Arc<dyn ShopStore>,
    pub views: Arc<Views>,
    pub checkout: Arc<CheckoutWorkflow>,
    /// Applied to storage calls that are safe to repeat
    pub retry: RetryPolicy,
}
