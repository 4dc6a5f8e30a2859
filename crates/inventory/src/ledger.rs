//! Inventory ledger contract.

use std::sync::Arc;

use thiserror::Error;

use stockroom_core::DomainError;

use crate::item::ItemCode;
use crate::level::StockLevel;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The durable store failed (I/O, connection, corrupt row). Not retried.
    #[error("storage failure: {0}")]
    Storage(String),
}

pub type LedgerResult<T> = Result<T, LedgerError>;

/// Durable item-code → quantity mapping over the fixed catalogue.
///
/// ## Atomicity
///
/// `adjust` is a single read-modify-write inside the store: two concurrent
/// adjustments of the same code both apply. Different codes are independent.
///
/// ## Lifecycle
///
/// Records are created once by `initialize` (insert-if-absent), mutated by
/// `adjust`, zeroed by `reset_all` and never deleted individually.
#[async_trait::async_trait]
pub trait StockLedger: Send + Sync {
    /// Create storage if missing and insert every catalogue code with quantity 0
    /// unless it already has a record. Idempotent.
    async fn initialize(&self) -> LedgerResult<()>;

    /// Apply `delta` to `code` and return the post-adjustment quantity.
    ///
    /// Fails with [`DomainError::UnknownItem`] for codes outside the catalogue,
    /// leaving every quantity untouched.
    async fn adjust(&self, code: &str, delta: i64) -> LedgerResult<i64>;

    /// All catalogue items in display order, with their last mutation time.
    async fn levels(&self) -> LedgerResult<Vec<StockLevel>>;

    /// All catalogue items in display order as `(code, quantity)` pairs.
    async fn snapshot(&self) -> LedgerResult<Vec<(ItemCode, i64)>> {
        Ok(self
            .levels()
            .await?
            .into_iter()
            .map(|level| (level.code, level.quantity))
            .collect())
    }

    /// Set every quantity to 0.
    async fn reset_all(&self) -> LedgerResult<()>;
}

#[async_trait::async_trait]
impl<S> StockLedger for Arc<S>
where
    S: StockLedger + ?Sized,
{
    async fn initialize(&self) -> LedgerResult<()> {
        (**self).initialize().await
    }

    async fn adjust(&self, code: &str, delta: i64) -> LedgerResult<i64> {
        (**self).adjust(code, delta).await
    }

    async fn levels(&self) -> LedgerResult<Vec<StockLevel>> {
        (**self).levels().await
    }

    async fn snapshot(&self) -> LedgerResult<Vec<(ItemCode, i64)>> {
        (**self).snapshot().await
    }

    async fn reset_all(&self) -> LedgerResult<()> {
        (**self).reset_all().await
    }
}
