//! SQLite storage backend using sqlx.
//!
//! Provides `SqliteStore`, implementing every shop store on top of a
//! `sqlx::SqlitePool`.
//!
//! # Feature flag
//!
//! This module is gated behind the `sqlite` feature flag (on by default).
//!
//! # Schema
//!
//! Three flat tables: `cart_item`, `feedback` and `"order"`. Order line items
//! are kept as JSON text in `"order".services`. A unique index on
//! `cart_item(session_id, service_name)` makes add-to-cart idempotent even
//! under concurrent requests from one session.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::str::FromStr;

use crate::core::catalog::CatalogEntry;
use crate::core::error::StorageError;
use crate::core::model::{AddOutcome, CartItem, Feedback, NewFeedback, NewOrder, Order, OrderLine};
use crate::core::session::SessionId;
use crate::core::store::{CartStore, FeedbackStore, OrderStore};
use crate::core::validation::CustomerDetails;

// ---------------------------------------------------------------------------
// Connection and schema management
// ---------------------------------------------------------------------------

/// Open a pool for the given URL, creating the database file if needed.
///
/// In-memory databases live inside a single connection, so their pool is
/// pinned to one connection that is never recycled.
pub async fn connect(database_url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| anyhow!("Invalid SQLite URL '{}': {}", database_url, e))?
        .create_if_missing(true);

    let in_memory = database_url.contains(":memory:") || database_url.contains("mode=memory");
    let pool_options = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(5)
    };

    pool_options
        .connect_with(options)
        .await
        .map_err(|e| {
            StorageError::ConnectionError {
                backend: "SQLite".to_string(),
                message: e.to_string(),
            }
            .into()
        })
}

fn transaction_error(e: sqlx::Error) -> anyhow::Error {
    StorageError::TransactionError {
        message: e.to_string(),
    }
    .into()
}

/// Apply the required tables and indexes (idempotent).
///
/// Run once at startup, before the server accepts traffic.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS cart_item (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            session_id VARCHAR(100) NOT NULL,
            service_name VARCHAR(100) NOT NULL,
            service_price REAL NOT NULL,
            service_description TEXT,
            date_added TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await
    .map_err(|e| anyhow!("Failed to create cart_item table: {}", e))?;

    sqlx::query(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_cart_item_session_service
            ON cart_item (session_id, service_name)",
    )
    .execute(pool)
    .await
    .map_err(|e| anyhow!("Failed to create cart_item index: {}", e))?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS feedback (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name VARCHAR(100) NOT NULL,
            rating INTEGER NOT NULL,
            message TEXT NOT NULL,
            date_submitted TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await
    .map_err(|e| anyhow!("Failed to create feedback table: {}", e))?;

    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS "order" (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            customer_name VARCHAR(100) NOT NULL,
            customer_email VARCHAR(120) NOT NULL,
            customer_phone VARCHAR(20) NOT NULL,
            event_date TEXT NOT NULL,
            total_amount REAL NOT NULL,
            services TEXT NOT NULL,
            order_date TEXT NOT NULL
        )"#,
    )
    .execute(pool)
    .await
    .map_err(|e| anyhow!("Failed to create order table: {}", e))?;

    Ok(())
}

// ---------------------------------------------------------------------------
// Row mapping
// ---------------------------------------------------------------------------

const CART_COLUMNS: &str =
    "id, session_id, service_name, service_price, service_description, date_added";

const ORDER_COLUMNS: &str = "id, customer_name, customer_email, customer_phone, event_date, \
     total_amount, services, order_date";

fn cart_item_from_row(row: &SqliteRow) -> Result<CartItem> {
    let session_id: String = row.try_get("session_id")?;
    let description: Option<String> = row.try_get("service_description")?;

    Ok(CartItem {
        id: row.try_get("id")?,
        session_id: SessionId::from(session_id),
        service_name: row.try_get("service_name")?,
        service_price: row.try_get("service_price")?,
        service_description: description.unwrap_or_default(),
        date_added: row.try_get::<DateTime<Utc>, _>("date_added")?,
    })
}

fn order_from_row(row: &SqliteRow) -> Result<Order> {
    let services: String = row.try_get("services")?;
    let services: Vec<OrderLine> = serde_json::from_str(&services)
        .map_err(|e| anyhow!("Corrupt services column: {}", e))?;

    Ok(Order {
        id: row.try_get("id")?,
        customer_name: row.try_get("customer_name")?,
        customer_email: row.try_get("customer_email")?,
        customer_phone: row.try_get("customer_phone")?,
        event_date: row.try_get::<NaiveDate, _>("event_date")?,
        total_amount: row.try_get("total_amount")?,
        services,
        order_date: row.try_get::<DateTime<Utc>, _>("order_date")?,
    })
}

fn feedback_from_row(row: &SqliteRow) -> Result<Feedback> {
    Ok(Feedback {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        rating: row.try_get("rating")?,
        message: row.try_get("message")?,
        date_submitted: row.try_get::<DateTime<Utc>, _>("date_submitted")?,
    })
}

// ---------------------------------------------------------------------------
// SqliteStore
// ---------------------------------------------------------------------------

/// Shop storage backed by SQLite.
///
/// # Example
///
/// ```rust,ignore
/// use phew::storage::sqlite::{connect, ensure_schema};
/// use phew::storage::SqliteStore;
///
/// let pool = connect("sqlite://phew.db").await?;
/// ensure_schema(&pool).await?;
/// let store = SqliteStore::new(pool);
/// ```
#[derive(Clone, Debug)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn find_cart_item(&self, session_id: &SessionId, service_name: &str) -> Result<CartItem> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM cart_item WHERE session_id = ? AND service_name = ?",
            CART_COLUMNS
        ))
        .bind(session_id.as_str())
        .bind(service_name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| anyhow!("Failed to fetch cart item: {}", e))?;

        cart_item_from_row(&row)
    }
}

#[async_trait]
impl CartStore for SqliteStore {
    async fn add(&self, session_id: &SessionId, entry: &CatalogEntry) -> Result<AddOutcome> {
        let date_added = Utc::now();

        let result = sqlx::query(
            "INSERT INTO cart_item
                (session_id, service_name, service_price, service_description, date_added)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT (session_id, service_name) DO NOTHING",
        )
        .bind(session_id.as_str())
        .bind(&entry.name)
        .bind(entry.price)
        .bind(&entry.description)
        .bind(date_added)
        .execute(&self.pool)
        .await
        .map_err(|e| anyhow!("Failed to insert cart item: {}", e))?;

        if result.rows_affected() == 0 {
            let existing = self.find_cart_item(session_id, &entry.name).await?;
            return Ok(AddOutcome::AlreadyPresent(existing));
        }

        Ok(AddOutcome::Added(CartItem {
            id: result.last_insert_rowid(),
            session_id: session_id.clone(),
            service_name: entry.name.clone(),
            service_price: entry.price,
            service_description: entry.description.clone(),
            date_added,
        }))
    }

    async fn list_for_session(&self, session_id: &SessionId) -> Result<Vec<CartItem>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM cart_item WHERE session_id = ? ORDER BY id ASC",
            CART_COLUMNS
        ))
        .bind(session_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| anyhow!("Failed to list cart items: {}", e))?;

        rows.iter().map(cart_item_from_row).collect()
    }

    async fn remove_item(&self, session_id: &SessionId, item_id: i64) -> Result<Option<CartItem>> {
        let mut tx = self.pool.begin().await.map_err(transaction_error)?;

        let row = sqlx::query(&format!(
            "SELECT {} FROM cart_item WHERE id = ? AND session_id = ?",
            CART_COLUMNS
        ))
        .bind(item_id)
        .bind(session_id.as_str())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| anyhow!("Failed to fetch cart item: {}", e))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let item = cart_item_from_row(&row)?;

        sqlx::query("DELETE FROM cart_item WHERE id = ? AND session_id = ?")
            .bind(item_id)
            .bind(session_id.as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| anyhow!("Failed to delete cart item: {}", e))?;

        tx.commit().await.map_err(transaction_error)?;
        Ok(Some(item))
    }

    async fn clear_session(&self, session_id: &SessionId) -> Result<u64> {
        let result = sqlx::query("DELETE FROM cart_item WHERE session_id = ?")
            .bind(session_id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| anyhow!("Failed to clear cart: {}", e))?;

        Ok(result.rows_affected())
    }
}

#[async_trait]
impl OrderStore for SqliteStore {
    async fn place_order(
        &self,
        session_id: &SessionId,
        customer: CustomerDetails,
    ) -> Result<Option<Order>> {
        let mut tx = self.pool.begin().await.map_err(transaction_error)?;

        // Deleting first takes the write lock, so a concurrent checkout of
        // the same cart waits here and then finds nothing left.
        let rows = sqlx::query(&format!(
            "DELETE FROM cart_item WHERE session_id = ? RETURNING {}",
            CART_COLUMNS
        ))
        .bind(session_id.as_str())
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| anyhow!("Failed to take cart for checkout: {}", e))?;
        let mut items = rows.iter().map(cart_item_from_row).collect::<Result<Vec<_>>>()?;
        items.sort_by_key(|item| item.id);

        if items.is_empty() {
            return Ok(None);
        }

        let order = NewOrder::from_cart(customer, &items);
        let services = serde_json::to_string(&order.services)
            .map_err(|e| anyhow!("Failed to serialize services: {}", e))?;
        let order_date = Utc::now();

        let result = sqlx::query(
            r#"INSERT INTO "order"
                (customer_name, customer_email, customer_phone, event_date,
                 total_amount, services, order_date)
             VALUES (?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&order.customer.name)
        .bind(&order.customer.email)
        .bind(&order.customer.phone)
        .bind(order.customer.event_date)
        .bind(order.total_amount)
        .bind(&services)
        .bind(order_date)
        .execute(&mut *tx)
        .await
        .map_err(|e| anyhow!("Failed to insert order: {}", e))?;

        tx.commit().await.map_err(transaction_error)?;

        Ok(Some(order.into_order(result.last_insert_rowid(), order_date)))
    }

    async fn get(&self, id: i64) -> Result<Option<Order>> {
        let row = sqlx::query(&format!(r#"SELECT {} FROM "order" WHERE id = ?"#, ORDER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| anyhow!("Failed to fetch order: {}", e))?;

        row.as_ref().map(order_from_row).transpose()
    }

    async fn list(&self) -> Result<Vec<Order>> {
        let rows = sqlx::query(&format!(r#"SELECT {} FROM "order" ORDER BY id ASC"#, ORDER_COLUMNS))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| anyhow!("Failed to list orders: {}", e))?;

        rows.iter().map(order_from_row).collect()
    }
}

#[async_trait]
impl FeedbackStore for SqliteStore {
    async fn submit(&self, feedback: NewFeedback) -> Result<Feedback> {
        let date_submitted = Utc::now();

        let result = sqlx::query(
            "INSERT INTO feedback (name, rating, message, date_submitted) VALUES (?, ?, ?, ?)",
        )
        .bind(&feedback.name)
        .bind(feedback.rating)
        .bind(&feedback.message)
        .bind(date_submitted)
        .execute(&self.pool)
        .await
        .map_err(|e| anyhow!("Failed to insert feedback: {}", e))?;

        Ok(feedback.into_feedback(result.last_insert_rowid(), date_submitted))
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<Feedback>> {
        let rows = sqlx::query(
            "SELECT id, name, rating, message, date_submitted FROM feedback
             ORDER BY date_submitted DESC, id DESC LIMIT ?",
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| anyhow!("Failed to list feedback: {}", e))?;

        rows.iter().map(feedback_from_row).collect()
    }
}
