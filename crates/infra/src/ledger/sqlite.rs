//! SQLite-backed inventory ledger.
//!
//! One long-lived connection pool is owned by the ledger. Every mutation is a
//! single statement or an explicit transaction; sqlx rolls a transaction back
//! when it is dropped without `commit`, so error paths never leave partial work.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use tracing::{Span, instrument};

use stockroom_core::DomainError;
use stockroom_inventory::{
    ItemCode, LedgerError, LedgerResult, StockLedger, StockLevel, in_display_order,
};

/// SQLite ledger over a single `inventory` table.
///
/// ## Schema
///
/// `inventory(code TEXT PRIMARY KEY, quantity INTEGER, updated_at TEXT)`.
/// The `CHECK` on `quantity` keeps SQLite from silently promoting an
/// overflowing sum to REAL.
///
/// ## Concurrency
///
/// `adjust` is one `INSERT … ON CONFLICT DO UPDATE … RETURNING` statement, so
/// the read-modify-write happens inside the engine and concurrent adjustments
/// of the same code serialise on SQLite's write lock.
#[derive(Debug, Clone)]
pub struct SqliteLedger {
    pool: SqlitePool,
}

impl SqliteLedger {
    /// Open (creating if missing) the database at `url`, e.g. `sqlite://warehouse.db`.
    pub async fn connect(url: &str) -> LedgerResult<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| map_sqlx_error("parse_database_url", e))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;

        Ok(Self { pool })
    }

    /// Private in-memory database.
    ///
    /// Each SQLite memory connection is its own database, so the pool is pinned
    /// to exactly one connection that is never recycled.
    pub async fn in_memory() -> LedgerResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| map_sqlx_error("parse_database_url", e))?;

        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;

        Ok(Self { pool })
    }
}

#[async_trait::async_trait]
impl StockLedger for SqliteLedger {
    #[instrument(skip(self), fields(operation = "initialize", inserted = tracing::field::Empty))]
    async fn initialize(&self) -> LedgerResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS inventory (
                code       TEXT PRIMARY KEY,
                quantity   INTEGER NOT NULL DEFAULT 0 CHECK (typeof(quantity) = 'integer'),
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("create_table", e))?;

        let now = Utc::now().to_rfc3339();
        let mut inserted = 0u64;
        for code in ItemCode::all() {
            let result = sqlx::query(
                r#"
                INSERT OR IGNORE INTO inventory (code, quantity, updated_at)
                VALUES (?1, 0, ?2)
                "#,
            )
            .bind(code.as_str())
            .bind(&now)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("seed_catalogue", e))?;
            inserted += result.rows_affected();
        }

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))?;

        Span::current().record("inserted", inserted);
        tracing::info!(inserted, "inventory initialized");
        Ok(())
    }

    #[instrument(skip(self), fields(operation = "adjust"))]
    async fn adjust(&self, code: &str, delta: i64) -> LedgerResult<i64> {
        let item = ItemCode::parse(code)?;
        let now = Utc::now().to_rfc3339();

        // A missing record is created with `delta` as its quantity, which is the
        // same as adjusting a defaulted 0.
        let row = sqlx::query(
            r#"
            INSERT INTO inventory (code, quantity, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(code) DO UPDATE SET
                quantity = quantity + excluded.quantity,
                updated_at = excluded.updated_at
            RETURNING quantity
            "#,
        )
        .bind(item.as_str())
        .bind(delta)
        .bind(&now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("adjust", e))?;

        let quantity: i64 = row
            .try_get("quantity")
            .map_err(|e| map_sqlx_error("read_quantity", e))?;

        tracing::info!(code = %item, delta, quantity, "stock adjusted");
        if quantity < 0 {
            tracing::warn!(code = %item, quantity, "stock is overdrawn");
        }
        Ok(quantity)
    }

    #[instrument(skip(self), fields(operation = "levels"))]
    async fn levels(&self) -> LedgerResult<Vec<StockLevel>> {
        let rows = sqlx::query(
            r#"
            SELECT code, quantity, updated_at
            FROM inventory
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("select_inventory", e))?;

        let mut stored = Vec::with_capacity(rows.len());
        for row in rows {
            let code: String = row
                .try_get("code")
                .map_err(|e| map_sqlx_error("read_code", e))?;
            let Ok(code) = ItemCode::parse(&code) else {
                tracing::warn!(code = %code, "ignoring stored row outside the catalogue");
                continue;
            };
            let quantity: i64 = row
                .try_get("quantity")
                .map_err(|e| map_sqlx_error("read_quantity", e))?;
            let updated_at: String = row
                .try_get("updated_at")
                .map_err(|e| map_sqlx_error("read_updated_at", e))?;
            let updated_at = DateTime::parse_from_rfc3339(&updated_at)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| {
                    LedgerError::Storage(format!("invalid updated_at for {code}: {e}"))
                })?;

            stored.push(StockLevel {
                code,
                quantity,
                updated_at: Some(updated_at),
            });
        }

        Ok(in_display_order(stored))
    }

    #[instrument(skip(self), fields(operation = "reset_all"))]
    async fn reset_all(&self) -> LedgerResult<()> {
        let now = Utc::now().to_rfc3339();
        let result = sqlx::query(
            r#"
            UPDATE inventory
            SET quantity = 0, updated_at = ?1
            "#,
        )
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("reset_all", e))?;

        tracing::info!(rows = result.rows_affected(), "inventory reset");
        Ok(())
    }
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> LedgerError {
    match err {
        sqlx::Error::Database(db_err) if db_err.is_check_violation() => {
            LedgerError::Domain(DomainError::validation(format!(
                "quantity out of range in {operation}"
            )))
        }
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            tracing::error!(operation, "{msg}");
            LedgerError::Storage(msg)
        }
        other => {
            let msg = format!("{} failed: {}", operation, other);
            tracing::error!(operation, "{msg}");
            LedgerError::Storage(msg)
        }
    }
}
