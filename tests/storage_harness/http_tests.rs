//! HTTP integration test macro for storage backends.
//!
//! The `shop_http_tests!` macro drives the full storefront through the router:
//! request with session cookie → handler → store → redirect with notice →
//! next page render.

/// Generate the storefront HTTP suite for a storage backend.
///
/// `$factory` must produce an `impl ShopStore + 'static`; it may contain
/// `.await`.
///
/// # Generated Tests
///
/// ## Cart (4 tests)
/// - `test_http_add_then_duplicate`: success notice, then "already in cart"
/// - `test_http_add_unknown_service`
/// - `test_http_remove_foreign_item`: other visitor's row survives
/// - `test_http_remove_invalid_id`
///
/// ## Checkout (5 tests)
/// - `test_http_checkout_empty_cart`
/// - `test_http_checkout_missing_field`
/// - `test_http_checkout_bad_date`
/// - `test_http_checkout_success`: order stored, cart cleared, email sent
/// - `test_http_checkout_resubmission_places_one_order`
///
/// ## Feedback (3 tests)
/// - `test_http_feedback_rejects_non_integer_rating`
/// - `test_http_feedback_accepts_out_of_range_rating`
/// - `test_http_feedback_shows_ten_most_recent`
#[macro_export]
macro_rules! shop_http_tests {
    ($factory:expr) => {
        mod shop_http_tests {
            use super::*;
            use axum::Router;
            use axum::http::StatusCode;
            use phew::core::store::{CartStore, FeedbackStore, OrderStore, ShopStore};
            use phew::notification::{CONFIRMATION_SUBJECT, OutboxMailer};
            use phew::server::ServerBuilder;
            use phew::storage::RetryPolicy;
            use std::sync::Arc;

            struct Shop {
                app: Router,
                store: Arc<dyn ShopStore>,
                outbox: OutboxMailer,
            }

            async fn make_shop() -> Shop {
                let store: Arc<dyn ShopStore> = Arc::new($factory);
                let outbox = OutboxMailer::new();
                let app = ServerBuilder::new()
                    .with_shared_store(store.clone())
                    .with_mailer(outbox.clone())
                    .with_retry_policy(RetryPolicy::none())
                    .build()
                    .unwrap();
                Shop { app, store, outbox }
            }

            const JANE: &[(&str, &str)] = &[
                ("name", "Jane"),
                ("email", "jane@x.com"),
                ("phone", "555-1111"),
                ("event_date", "2025-06-01"),
            ];

            // ==============================================================
            // Cart
            // ==============================================================

            #[tokio::test]
            async fn test_http_add_then_duplicate() {
                let shop = make_shop().await;
                let visitor = Visitor::new();

                visitor.get(&shop.app, "/add_to_cart/birthday").await.assert_redirect("/services");
                let page = visitor.get(&shop.app, "/services").await;
                assert!(page.body.contains("Added to cart successfully!"));

                visitor.get(&shop.app, "/add_to_cart/birthday").await.assert_redirect("/services");
                let page = visitor.get(&shop.app, "/services").await;
                assert!(page.body.contains("Item already in cart!"));
                assert!(!page.body.contains("Added to cart successfully!"));

                let cart = visitor.get(&shop.app, "/cart").await;
                assert_eq!(cart.status, StatusCode::OK);
                assert!(cart.body.contains("Birthday Party Package"));
                assert!(cart.body.contains("299.99"));
                assert_eq!(shop.store.list_for_session(&visitor.session).await.unwrap().len(), 1);
            }

            #[tokio::test]
            async fn test_http_add_unknown_service() {
                let shop = make_shop().await;
                let visitor = Visitor::new();

                visitor.get(&shop.app, "/add_to_cart/yacht").await.assert_redirect("/services");
                let page = visitor.get(&shop.app, "/services").await;

                assert!(page.body.contains("Service not found!"));
                assert!(shop.store.list_for_session(&visitor.session).await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_http_remove_foreign_item() {
                let shop = make_shop().await;
                let owner = Visitor::new();
                let intruder = Visitor::new();

                owner.get(&shop.app, "/add_to_cart/musicians").await;
                let item_id = shop.store.list_for_session(&owner.session).await.unwrap()[0].id;

                let uri = format!("/remove_from_cart/{}", item_id);
                intruder.get(&shop.app, &uri).await.assert_redirect("/cart");
                let page = intruder.get(&shop.app, "/cart").await;
                assert!(page.body.contains("Item not found!"));
                assert_eq!(shop.store.list_for_session(&owner.session).await.unwrap().len(), 1);

                owner.get(&shop.app, &uri).await.assert_redirect("/cart");
                let page = owner.get(&shop.app, "/cart").await;
                assert!(page.body.contains("Item removed from cart!"));
                assert!(shop.store.list_for_session(&owner.session).await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_http_remove_invalid_id() {
                let shop = make_shop().await;
                let visitor = Visitor::new();

                visitor.get(&shop.app, "/remove_from_cart/abc").await.assert_redirect("/cart");
                let page = visitor.get(&shop.app, "/cart").await;
                assert!(page.body.contains("Item not found!"));
            }

            // ==============================================================
            // Checkout
            // ==============================================================

            #[tokio::test]
            async fn test_http_checkout_empty_cart() {
                let shop = make_shop().await;
                let visitor = Visitor::new();

                visitor.get(&shop.app, "/checkout").await.assert_redirect("/services");
                let page = visitor.get(&shop.app, "/services").await;
                assert!(page.body.contains("Your cart is empty!"));

                visitor
                    .post_form(&shop.app, "/checkout", JANE)
                    .await
                    .assert_redirect("/services");
                assert!(shop.store.list().await.unwrap().is_empty());
                assert!(shop.outbox.sent().is_empty());
            }

            #[tokio::test]
            async fn test_http_checkout_missing_field() {
                let shop = make_shop().await;
                let visitor = Visitor::new();
                visitor.get(&shop.app, "/add_to_cart/wedding").await;

                let form = [("name", "Jane"), ("email", "jane@x.com"), ("event_date", "2025-06-01")];
                let page = visitor.post_form(&shop.app, "/checkout", &form).await;

                assert_eq!(page.status, StatusCode::OK);
                assert!(page.body.contains("Please fill in all fields!"));
                assert!(page.body.contains("value=\"Jane\""));
                assert_eq!(shop.store.list_for_session(&visitor.session).await.unwrap().len(), 1);
                assert!(shop.store.list().await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_http_checkout_bad_date() {
                let shop = make_shop().await;
                let visitor = Visitor::new();
                visitor.get(&shop.app, "/add_to_cart/wedding").await;

                let form = [
                    ("name", "Jane"),
                    ("email", "jane@x.com"),
                    ("phone", "555-1111"),
                    ("event_date", "June 1st"),
                ];
                let page = visitor.post_form(&shop.app, "/checkout", &form).await;

                assert_eq!(page.status, StatusCode::OK);
                assert!(page.body.contains("Please enter the event date as YYYY-MM-DD."));
                assert!(shop.store.list().await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_http_checkout_success() {
                let shop = make_shop().await;
                let visitor = Visitor::new();
                visitor.get(&shop.app, "/add_to_cart/birthday").await;
                visitor.get(&shop.app, "/add_to_cart/musicians").await;

                let form_page = visitor.get(&shop.app, "/checkout").await;
                assert_eq!(form_page.status, StatusCode::OK);
                assert!(form_page.body.contains("499.99"));

                visitor.post_form(&shop.app, "/checkout", JANE).await.assert_redirect("/");
                let home = visitor.get(&shop.app, "/").await;
                assert!(home
                    .body
                    .contains("Order placed successfully! Check your email for confirmation."));

                let orders = shop.store.list().await.unwrap();
                assert_eq!(orders.len(), 1);
                assert_eq!(orders[0].total_amount, 499.99);
                assert_eq!(orders[0].customer_name, "Jane");
                assert_eq!(orders[0].services.len(), 2);
                assert!(shop.store.list_for_session(&visitor.session).await.unwrap().is_empty());

                let sent = shop.outbox.sent();
                assert_eq!(sent.len(), 1);
                assert_eq!(sent[0].to, "jane@x.com");
                assert_eq!(sent[0].subject, CONFIRMATION_SUBJECT);
                assert!(sent[0].html.contains("499.99"));
            }

            #[tokio::test]
            async fn test_http_checkout_resubmission_places_one_order() {
                let shop = make_shop().await;
                let visitor = Visitor::new();
                visitor.get(&shop.app, "/add_to_cart/baby_shower").await;

                visitor.post_form(&shop.app, "/checkout", JANE).await.assert_redirect("/");
                visitor
                    .post_form(&shop.app, "/checkout", JANE)
                    .await
                    .assert_redirect("/services");

                assert_eq!(shop.store.list().await.unwrap().len(), 1);
                assert_eq!(shop.outbox.sent().len(), 1);
            }

            // ==============================================================
            // Feedback
            // ==============================================================

            #[tokio::test]
            async fn test_http_feedback_rejects_non_integer_rating() {
                let shop = make_shop().await;
                let visitor = Visitor::new();

                let form = [("name", "Sam"), ("rating", "four"), ("message", "Lovely")];
                let page = visitor.post_form(&shop.app, "/feedback", &form).await;

                assert_eq!(page.status, StatusCode::OK);
                assert!(page.body.contains("Rating must be a whole number."));
                assert!(shop.store.list_recent(10).await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_http_feedback_accepts_out_of_range_rating() {
                let shop = make_shop().await;
                let visitor = Visitor::new();

                let form = [("name", "Sam"), ("rating", "11"), ("message", "Lovely")];
                visitor
                    .post_form(&shop.app, "/feedback", &form)
                    .await
                    .assert_redirect("/feedback");

                let page = visitor.get(&shop.app, "/feedback").await;
                assert!(page.body.contains("Thank you for your feedback!"));
                assert!(page.body.contains("Sam"));
                assert_eq!(shop.store.list_recent(10).await.unwrap()[0].rating, 11);
            }

            #[tokio::test]
            async fn test_http_feedback_shows_ten_most_recent() {
                let shop = make_shop().await;
                for i in 0..12 {
                    shop.store
                        .submit(new_feedback(&format!("guest-{:02}", i), 4))
                        .await
                        .unwrap();
                }

                let page = Visitor::new().get(&shop.app, "/feedback").await;

                assert!(page.body.contains("guest-11"));
                assert!(page.body.contains("guest-02"));
                assert!(!page.body.contains("guest-01"));
                assert!(!page.body.contains("guest-00"));
                let newest = page.body.find("guest-11").unwrap();
                let oldest = page.body.find("guest-02").unwrap();
                assert!(newest < oldest);
            }
        }
    };
}
