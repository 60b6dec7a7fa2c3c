//! Phew storefront server
//!
//! Reads configuration from `PHEW_CONFIG` (optional YAML) and the
//! environment, prepares storage, then serves until Ctrl+C or SIGTERM.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use phew::config::AppConfig;
use phew::notification::{LogMailer, SmtpMailer};
use phew::server::ServerBuilder;
use phew::storage::InMemoryStore;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("phew=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::load()?;
    let addr = config.server.addr();

    let builder = ServerBuilder::new().with_retry_policy(config.retry);
    let builder = with_storage(builder, &config).await?;

    let builder = match config.mail.smtp_server {
        Some(ref server) => {
            tracing::info!(smtp_server = %server, port = config.mail.smtp_port, "sending confirmations over SMTP");
            builder.with_mailer(SmtpMailer::from_config(&config.mail)?)
        }
        None => {
            tracing::warn!("MAIL_SERVER not set, confirmation emails will only be logged");
            builder.with_mailer(LogMailer::new())
        }
    };

    builder.serve(&addr).await
}

#[cfg(feature = "sqlite")]
async fn with_storage(builder: ServerBuilder, config: &AppConfig) -> Result<ServerBuilder> {
    use phew::storage::SqliteStore;
    use phew::storage::sqlite::{connect, ensure_schema};

    match config.storage.database_url {
        Some(ref url) => {
            let pool = connect(url).await?;
            ensure_schema(&pool).await?;
            tracing::info!(database_url = %url, "SQLite storage ready");
            Ok(builder.with_store(SqliteStore::new(pool)))
        }
        None => {
            tracing::info!("DATABASE_URL not set, using in-memory storage");
            Ok(builder.with_store(InMemoryStore::new()))
        }
    }
}

#[cfg(not(feature = "sqlite"))]
async fn with_storage(builder: ServerBuilder, config: &AppConfig) -> Result<ServerBuilder> {
    if config.storage.database_url.is_some() {
        tracing::warn!("DATABASE_URL ignored, built without the sqlite feature");
    }
    Ok(builder.with_store(InMemoryStore::new()))
}
