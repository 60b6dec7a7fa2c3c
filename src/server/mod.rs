//! HTTP server for the storefront
//!
//! `ServerBuilder` assembles the shared [`AppState`] and registers every
//! page route behind the session middleware.

pub mod builder;
pub mod handlers;
pub mod router;
pub mod state;

pub use builder::ServerBuilder;
pub use router::build_shop_routes;
pub use state::AppState;
