//! Route table for the storefront

use axum::{Router, middleware, routing::get};
use tower_http::trace::TraceLayer;

use super::handlers::{
    add_to_cart, cart, checkout_page, checkout_submit, contact, feedback_page, feedback_submit,
    index, remove_from_cart, services,
};
use super::state::AppState;
use crate::core::session::session_layer;

/// Build the storefront routes
///
/// - GET /
/// - GET /services
/// - GET /add_to_cart/{service_key}
/// - GET /cart
/// - GET /remove_from_cart/{item_id}
/// - GET|POST /checkout
/// - GET|POST /feedback
/// - GET /contact
pub fn build_shop_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/services", get(services))
        .route("/add_to_cart/{service_key}", get(add_to_cart))
        .route("/cart", get(cart))
        .route("/remove_from_cart/{item_id}", get(remove_from_cart))
        .route("/checkout", get(checkout_page).post(checkout_submit))
        .route("/feedback", get(feedback_page).post(feedback_submit))
        .route("/contact", get(contact))
        .layer(middleware::from_fn(session_layer))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
