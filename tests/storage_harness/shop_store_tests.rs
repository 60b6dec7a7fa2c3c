//! Macro-generated test suite for the `ShopStore` contract.
//!
//! # Usage
//!
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//!
//! use storage_harness::*;
//! use phew::storage::InMemoryStore;
//!
//! shop_store_tests!(InMemoryStore::new());
//! ```
//!
//! # Generated Tests
//!
//! ## Cart
//! - `test_add_and_list`: rows come back in insertion order
//! - `test_duplicate_add_returns_existing_row`
//! - `test_carts_are_scoped_by_session`
//! - `test_remove_own_item` / `test_remove_foreign_item` / `test_remove_unknown_item`
//! - `test_clear_session`
//! - `test_concurrent_duplicate_adds`: parallel adds of one service leave one row
//!
//! ## Orders
//! - `test_place_order_clears_cart`
//! - `test_place_order_leaves_other_carts`
//! - `test_place_order_takes_rows_added_after_review`: the order covers every row it deletes
//! - `test_place_order_on_empty_cart_creates_nothing`
//! - `test_concurrent_checkouts_place_one_order`
//! - `test_get_unknown_order`
//!
//! ## Feedback
//! - `test_list_recent_limit_and_order`

/// Generate a full `ShopStore` conformance test suite.
///
/// `$factory` is re-evaluated for each test to ensure isolation. It may
/// contain `.await`.
#[macro_export]
macro_rules! shop_store_tests {
    ($factory:expr) => {
        mod shop_store_contract_tests {
            use super::*;
            use phew::core::model::AddOutcome;
            use phew::core::session::SessionId;
            use phew::core::store::{CartStore, FeedbackStore, OrderStore};
            use std::sync::Arc;

            // ==================================================================
            // Cart
            // ==================================================================

            #[tokio::test]
            async fn test_add_and_list() {
                let store = $factory;
                let session = SessionId::generate();

                let first = store.add(&session, &entry("birthday")).await.unwrap();
                let second = store.add(&session, &entry("musicians")).await.unwrap();
                assert!(matches!(first, AddOutcome::Added(_)));
                assert!(matches!(second, AddOutcome::Added(_)));

                let items = store.list_for_session(&session).await.unwrap();
                assert_eq!(items.len(), 2);
                assert_eq!(items[0].service_name, "Birthday Party Package");
                assert_eq!(items[0].service_price, 299.99);
                assert_eq!(items[1].service_name, "Live Musicians");
                assert_eq!(items[1].session_id, session);
                assert!(items[0].id < items[1].id);
            }

            #[tokio::test]
            async fn test_duplicate_add_returns_existing_row() {
                let store = $factory;
                let session = SessionId::generate();

                let added = store.add(&session, &entry("wedding")).await.unwrap();
                let again = store.add(&session, &entry("wedding")).await.unwrap();

                assert!(matches!(again, AddOutcome::AlreadyPresent(_)));
                assert_eq!(again.item().id, added.item().id);
                assert_eq!(store.list_for_session(&session).await.unwrap().len(), 1);
            }

            #[tokio::test]
            async fn test_carts_are_scoped_by_session() {
                let store = $factory;
                let alice = SessionId::generate();
                let bob = SessionId::generate();

                store.add(&alice, &entry("waiters")).await.unwrap();
                let outcome = store.add(&bob, &entry("waiters")).await.unwrap();

                assert!(matches!(outcome, AddOutcome::Added(_)));
                assert_eq!(store.list_for_session(&alice).await.unwrap().len(), 1);
                assert_eq!(store.list_for_session(&bob).await.unwrap().len(), 1);
                assert!(store
                    .list_for_session(&SessionId::generate())
                    .await
                    .unwrap()
                    .is_empty());
            }

            #[tokio::test]
            async fn test_remove_own_item() {
                let store = $factory;
                let session = SessionId::generate();
                let item = store.add(&session, &entry("decorators")).await.unwrap().item().clone();

                let removed = store.remove_item(&session, item.id).await.unwrap();
                assert_eq!(removed.map(|i| i.id), Some(item.id));
                assert!(store.list_for_session(&session).await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_remove_foreign_item() {
                let store = $factory;
                let owner = SessionId::generate();
                let item = store.add(&owner, &entry("cleaners")).await.unwrap().item().clone();

                let removed = store
                    .remove_item(&SessionId::generate(), item.id)
                    .await
                    .unwrap();

                assert!(removed.is_none());
                assert_eq!(store.list_for_session(&owner).await.unwrap().len(), 1);
            }

            #[tokio::test]
            async fn test_remove_unknown_item() {
                let store = $factory;
                let removed = store.remove_item(&SessionId::generate(), 9999).await.unwrap();
                assert!(removed.is_none());
            }

            #[tokio::test]
            async fn test_clear_session() {
                let store = $factory;
                let session = SessionId::generate();
                let other = SessionId::generate();
                store.add(&session, &entry("corporate")).await.unwrap();
                store.add(&session, &entry("bartenders")).await.unwrap();
                store.add(&other, &entry("bartenders")).await.unwrap();

                assert_eq!(store.clear_session(&session).await.unwrap(), 2);
                assert_eq!(store.clear_session(&session).await.unwrap(), 0);
                assert_eq!(store.list_for_session(&other).await.unwrap().len(), 1);
            }

            #[tokio::test]
            async fn test_concurrent_duplicate_adds() {
                let store = Arc::new($factory);
                let session = SessionId::generate();

                let mut handles = Vec::new();
                for _ in 0..8 {
                    let store = store.clone();
                    let session = session.clone();
                    handles.push(tokio::spawn(async move {
                        store.add(&session, &entry("house_help")).await.unwrap()
                    }));
                }

                let mut added = 0;
                for handle in handles {
                    if let AddOutcome::Added(_) = handle.await.unwrap() {
                        added += 1;
                    }
                }

                assert_eq!(added, 1);
                assert_eq!(store.list_for_session(&session).await.unwrap().len(), 1);
            }

            // ==================================================================
            // Orders
            // ==================================================================

            #[tokio::test]
            async fn test_place_order_clears_cart() {
                let store = $factory;
                let session = SessionId::generate();
                store.add(&session, &entry("birthday")).await.unwrap();
                store.add(&session, &entry("musicians")).await.unwrap();

                let order = store.place_order(&session, customer()).await.unwrap().unwrap();

                assert_eq!(order.total_amount, 499.99);
                assert_eq!(order.customer_email, "jane@x.com");
                assert_eq!(order.services.len(), 2);
                assert_eq!(order.services[0].name, "Birthday Party Package");
                assert!(store.list_for_session(&session).await.unwrap().is_empty());

                let fetched = store.get(order.id).await.unwrap().unwrap();
                assert_eq!(fetched.services, order.services);
                assert_eq!(fetched.event_date, order.event_date);
                assert_eq!(store.list().await.unwrap().len(), 1);
            }

            #[tokio::test]
            async fn test_place_order_leaves_other_carts() {
                let store = $factory;
                let buyer = SessionId::generate();
                let browser = SessionId::generate();
                store.add(&buyer, &entry("anniversary")).await.unwrap();
                store.add(&browser, &entry("anniversary")).await.unwrap();

                store.place_order(&buyer, customer()).await.unwrap().unwrap();

                assert_eq!(store.list_for_session(&browser).await.unwrap().len(), 1);
            }

            #[tokio::test]
            async fn test_place_order_takes_rows_added_after_review() {
                let store = $factory;
                let session = SessionId::generate();
                store.add(&session, &entry("birthday")).await.unwrap();
                let reviewed = store.list_for_session(&session).await.unwrap();
                assert_eq!(reviewed.len(), 1);

                // A second tab adds to the cart before the form is submitted
                store.add(&session, &entry("musicians")).await.unwrap();
                let order = store.place_order(&session, customer()).await.unwrap().unwrap();

                let names: Vec<&str> = order.services.iter().map(|l| l.name.as_str()).collect();
                assert_eq!(names, vec!["Birthday Party Package", "Live Musicians"]);
                assert_eq!(order.total_amount, 499.99);
                let sum: f64 = order.services.iter().map(|l| l.price).sum();
                assert!((order.total_amount - sum).abs() < 0.005);
                assert!(store.list_for_session(&session).await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_place_order_on_empty_cart_creates_nothing() {
                let store = $factory;
                let session = SessionId::generate();

                assert!(store.place_order(&session, customer()).await.unwrap().is_none());

                store.add(&session, &entry("wedding")).await.unwrap();
                assert!(store.place_order(&session, customer()).await.unwrap().is_some());
                assert!(store.place_order(&session, customer()).await.unwrap().is_none());
                assert_eq!(store.list().await.unwrap().len(), 1);
            }

            #[tokio::test]
            async fn test_concurrent_checkouts_place_one_order() {
                let store = Arc::new($factory);
                let session = SessionId::generate();
                store.add(&session, &entry("corporate")).await.unwrap();
                store.add(&session, &entry("bartenders")).await.unwrap();

                let mut handles = Vec::new();
                for _ in 0..4 {
                    let store = store.clone();
                    let session = session.clone();
                    handles.push(tokio::spawn(async move {
                        store.place_order(&session, customer()).await.unwrap()
                    }));
                }

                let mut placed = Vec::new();
                for handle in handles {
                    placed.extend(handle.await.unwrap());
                }

                assert_eq!(placed.len(), 1);
                assert_eq!(placed[0].services.len(), 2);
                assert_eq!(store.list().await.unwrap().len(), 1);
            }

            #[tokio::test]
            async fn test_get_unknown_order() {
                let store = $factory;
                assert!(store.get(424242).await.unwrap().is_none());
                assert!(store.list().await.unwrap().is_empty());
            }

            // ==================================================================
            // Feedback
            // ==================================================================

            #[tokio::test]
            async fn test_list_recent_limit_and_order() {
                let store = $factory;
                for i in 0..15 {
                    store
                        .submit(new_feedback(&format!("visitor {}", i), 5))
                        .await
                        .unwrap();
                }

                let recent = store.list_recent(10).await.unwrap();
                assert_eq!(recent.len(), 10);
                assert_eq!(recent[0].name, "visitor 14");
                assert_eq!(recent[9].name, "visitor 5");
                for pair in recent.windows(2) {
                    assert!(
                        (pair[0].date_submitted, pair[0].id) > (pair[1].date_submitted, pair[1].id)
                    );
                }
            }

            #[tokio::test]
            async fn test_out_of_range_rating_is_stored() {
                let store = $factory;
                let feedback = store.submit(new_feedback("Sam", 11)).await.unwrap();
                assert_eq!(feedback.rating, 11);
                assert_eq!(store.list_recent(10).await.unwrap()[0].rating, 11);
            }
        }
    };
}
