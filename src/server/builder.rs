//! ServerBuilder for fluent API to build the storefront server

use super::router::build_shop_routes;
use super::state::AppState;
use crate::checkout::CheckoutWorkflow;
use crate::core::catalog::Catalog;
use crate::core::store::ShopStore;
use crate::notification::{LogMailer, Mailer, Notification};
use crate::storage::InMemoryStore;
use crate::storage::retry::RetryPolicy;
use crate::views::Views;
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builder for the storefront router
///
/// Every component has a default: the standard catalog, an in-memory store,
/// a mailer that only logs, and the default retry policy.
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_store(SqliteStore::new(pool))
///     .with_mailer(SmtpMailer::from_config(&config.mail)?)
///     .build()?;
/// ```
pub struct ServerBuilder {
    store: Option<Arc<dyn ShopStore>>,
    mailer: Option<Arc<dyn Mailer>>,
    catalog: Option<Catalog>,
    retry: RetryPolicy,
}

impl ServerBuilder {
    /// Create a new ServerBuilder
    pub fn new() -> Self {
        Self {
            store: None,
            mailer: None,
            catalog: None,
            retry: RetryPolicy::default(),
        }
    }

    /// Set the storage backend
    pub fn with_store(mut self, store: impl ShopStore + 'static) -> Self {
        self.store = Some(Arc::new(store));
        self
    }

    /// Set a storage backend that is already shared
    pub fn with_shared_store(mut self, store: Arc<dyn ShopStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the mailer used for order confirmations
    pub fn with_mailer(mut self, mailer: impl Mailer + 'static) -> Self {
        self.mailer = Some(Arc::new(mailer));
        self
    }

    /// Replace the standard catalog
    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Set the retry policy for repeatable storage calls
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Build the shared application state
    pub fn build_state(self) -> Result<AppState> {
        let views = Arc::new(Views::new()?);
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(InMemoryStore::new()));
        let mailer = self.mailer.unwrap_or_else(|| Arc::new(LogMailer::new()));
        let catalog = self.catalog.unwrap_or_else(Catalog::standard);

        let notification = Notification::new(views.clone(), mailer);
        let checkout = CheckoutWorkflow::new(store.clone(), notification);

        Ok(AppState {
            catalog: Arc::new(catalog),
            store,
            views,
            checkout: Arc::new(checkout),
            retry: self.retry,
        })
    }

    /// Build the final router
    pub fn build(self) -> Result<Router> {
        Ok(build_shop_routes(self.build_state()?))
    }

    /// Serve the application with graceful shutdown
    ///
    /// This will:
    /// - Bind to the provided address
    /// - Start serving requests
    /// - Handle SIGTERM and SIGINT (Ctrl+C) for graceful shutdown
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
