//! HTTP handlers for the storefront pages
//!
//! Mutating routes answer with a redirect and leave a notice for the page
//! they redirect to. Storage failures never reach the visitor as an error
//! page; they degrade to an empty listing or a retry notice.

use axum::{
    Form,
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
};

use super::state::AppState;
use crate::checkout::{CheckoutOutcome, CheckoutReview, CheckoutState};
use crate::core::error::{ShopError, ValidationError};
use crate::core::flash::{Flash, Flashes};
use crate::core::model::{AddOutcome, CartItem, Feedback, cart_total};
use crate::core::session::SessionId;
use crate::core::store::{CartStore, FeedbackStore};
use crate::core::validation::{CheckoutForm, FeedbackForm};
use crate::storage::retry::with_backoff;

/// How many feedback entries the feedback page shows
pub const RECENT_FEEDBACK_LIMIT: usize = 10;

const DATABASE_ERROR: &str = "Database error. Please try again.";
const CART_UNAVAILABLE: &str = "Cart temporarily unavailable. Please try again.";
const FEEDBACK_UNAVAILABLE: &str = "Feedback temporarily unavailable. Please try again.";
const ITEM_NOT_FOUND: &str = "Item not found!";
const EMPTY_CART: &str = "Your cart is empty!";

pub async fn index(
    State(state): State<AppState>,
    flashes: Flashes,
) -> Result<Html<String>, ShopError> {
    Ok(Html(state.views.render_index(&state.catalog, &flashes.take())?))
}

pub async fn services(
    State(state): State<AppState>,
    flashes: Flashes,
) -> Result<Html<String>, ShopError> {
    Ok(Html(state.views.render_services(&state.catalog, &flashes.take())?))
}

pub async fn contact(
    State(state): State<AppState>,
    flashes: Flashes,
) -> Result<Html<String>, ShopError> {
    Ok(Html(state.views.render_contact(&flashes.take())?))
}

/// Add a catalog entry to the visitor's cart
pub async fn add_to_cart(
    State(state): State<AppState>,
    session_id: SessionId,
    flashes: Flashes,
    Path(service_key): Path<String>,
) -> Redirect {
    let flash = match state.catalog.get(&service_key) {
        None => {
            tracing::warn!(service_key = %service_key, "add to cart for unknown service");
            Flash::error(ValidationError::UnknownService { key: service_key }.notice())
        }
        Some(entry) => {
            match with_backoff(&state.retry, || state.store.add(&session_id, entry)).await {
                Ok(AddOutcome::Added(item)) => {
                    tracing::info!(
                        session_id = %session_id,
                        service_key = %entry.key,
                        item_id = item.id,
                        "added to cart"
                    );
                    Flash::success("Added to cart successfully!")
                }
                Ok(AddOutcome::AlreadyPresent(_)) => Flash::info("Item already in cart!"),
                Err(e) => {
                    tracing::error!(session_id = %session_id, service_key = %entry.key, error = %e, "failed to add to cart");
                    Flash::error(DATABASE_ERROR)
                }
            }
        }
    };

    flashes.push(flash);
    Redirect::to("/services")
}

pub async fn cart(
    State(state): State<AppState>,
    session_id: SessionId,
    flashes: Flashes,
) -> Result<Html<String>, ShopError> {
    let items = cart_items_or_empty(&state, &session_id, &flashes).await;
    let reviewing = CheckoutState::of_cart(&items) == CheckoutState::ReviewingCart;
    Ok(Html(state.views.render_cart(
        &items,
        cart_total(&items),
        reviewing,
        &flashes.take(),
    )?))
}

/// Remove one of the visitor's own cart items
///
/// Ids that do not parse, do not exist, or belong to another session all
/// produce the same notice.
pub async fn remove_from_cart(
    State(state): State<AppState>,
    session_id: SessionId,
    flashes: Flashes,
    Path(item_id): Path<String>,
) -> Redirect {
    let flash = match item_id.parse::<i64>() {
        Err(_) => Flash::error(ITEM_NOT_FOUND),
        Ok(id) => match with_backoff(&state.retry, || state.store.remove_item(&session_id, id)).await {
            Ok(Some(item)) => {
                tracing::info!(session_id = %session_id, item_id = item.id, "removed from cart");
                Flash::success("Item removed from cart!")
            }
            Ok(None) => Flash::error(ITEM_NOT_FOUND),
            Err(e) => {
                tracing::error!(session_id = %session_id, item_id = id, error = %e, "failed to remove cart item");
                Flash::error(DATABASE_ERROR)
            }
        },
    };

    flashes.push(flash);
    Redirect::to("/cart")
}

pub async fn checkout_page(
    State(state): State<AppState>,
    session_id: SessionId,
    flashes: Flashes,
) -> Result<Response, ShopError> {
    match with_backoff(&state.retry, || state.checkout.review(&session_id)).await {
        Ok(CheckoutReview::EmptyCart) => Ok(empty_cart_redirect(&flashes)),
        Ok(CheckoutReview::AwaitingForm { items, total }) => {
            let html = state
                .views
                .render_checkout(&items, total, &CheckoutForm::default(), &flashes.take())?;
            Ok(Html(html).into_response())
        }
        Err(e) => {
            tracing::warn!(session_id = %session_id, error = %e, "cart unavailable for checkout");
            flashes.push(Flash::info(CART_UNAVAILABLE));
            Ok(Redirect::to("/cart").into_response())
        }
    }
}

pub async fn checkout_submit(
    State(state): State<AppState>,
    session_id: SessionId,
    flashes: Flashes,
    Form(form): Form<CheckoutForm>,
) -> Result<Response, ShopError> {
    match state.checkout.submit(&session_id, &form).await {
        Ok(CheckoutOutcome::EmptyCart) => Ok(empty_cart_redirect(&flashes)),
        Ok(CheckoutOutcome::Invalid {
            items,
            total,
            error,
        }) => {
            flashes.push(Flash::error(error.notice()));
            let html = state.views.render_checkout(&items, total, &form, &flashes.take())?;
            Ok(Html(html).into_response())
        }
        Ok(CheckoutOutcome::Placed { .. }) => {
            flashes.push(Flash::success(
                "Order placed successfully! Check your email for confirmation.",
            ));
            Ok(Redirect::to("/").into_response())
        }
        Err(e) => {
            tracing::error!(session_id = %session_id, error = %e, "failed to place order");
            flashes.push(Flash::error(DATABASE_ERROR));
            Ok(Redirect::to("/checkout").into_response())
        }
    }
}

pub async fn feedback_page(
    State(state): State<AppState>,
    flashes: Flashes,
) -> Result<Html<String>, ShopError> {
    let feedback = recent_feedback_or_empty(&state, &flashes).await;
    Ok(Html(state.views.render_feedback(
        &feedback,
        &FeedbackForm::default(),
        &flashes.take(),
    )?))
}

pub async fn feedback_submit(
    State(state): State<AppState>,
    flashes: Flashes,
    Form(form): Form<FeedbackForm>,
) -> Result<Response, ShopError> {
    let details = match form.validate_details() {
        Ok(details) => details,
        Err(error) => {
            let feedback = recent_feedback_or_empty(&state, &flashes).await;
            flashes.push(Flash::error(error.notice()));
            let html = state.views.render_feedback(&feedback, &form, &flashes.take())?;
            return Ok(Html(html).into_response());
        }
    };

    let flash = match state.store.submit(details).await {
        Ok(feedback) => {
            tracing::info!(feedback_id = feedback.id, rating = feedback.rating, "feedback submitted");
            Flash::success("Thank you for your feedback!")
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to store feedback");
            Flash::error(DATABASE_ERROR)
        }
    };

    flashes.push(flash);
    Ok(Redirect::to("/feedback").into_response())
}

fn empty_cart_redirect(flashes: &Flashes) -> Response {
    flashes.push(Flash::error(EMPTY_CART));
    Redirect::to("/services").into_response()
}

async fn cart_items_or_empty(
    state: &AppState,
    session_id: &SessionId,
    flashes: &Flashes,
) -> Vec<CartItem> {
    match with_backoff(&state.retry, || state.store.list_for_session(session_id)).await {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(session_id = %session_id, error = %e, "cart unavailable");
            flashes.push(Flash::info(CART_UNAVAILABLE));
            Vec::new()
        }
    }
}

async fn recent_feedback_or_empty(state: &AppState, flashes: &Flashes) -> Vec<Feedback> {
    match with_backoff(&state.retry, || state.store.list_recent(RECENT_FEEDBACK_LIMIT)).await {
        Ok(feedback) => feedback,
        Err(e) => {
            tracing::warn!(error = %e, "feedback unavailable");
            flashes.push(Flash::info(FEEDBACK_UNAVAILABLE));
            Vec::new()
        }
    }
}
