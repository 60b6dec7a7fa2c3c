//! Core domain types: catalog, sessions, cart and order records, forms

pub mod catalog;
pub mod error;
pub mod flash;
pub mod model;
pub mod session;
pub mod store;
pub mod validation;

pub use catalog::{Catalog, CatalogEntry};
pub use error::{ConfigError, ShopError, StorageError, ValidationError};
pub use flash::{FLASH_COOKIE, Flash, FlashLevel, Flashes};
pub use model::{AddOutcome, CartItem, Feedback, NewFeedback, NewOrder, Order, OrderLine};
pub use session::{SESSION_COOKIE, SessionId};
pub use store::{CartStore, FeedbackStore, OrderStore, ShopStore};
pub use validation::{CheckoutForm, CustomerDetails, FeedbackForm};
