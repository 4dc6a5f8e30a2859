use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;

use stockroom_core::DomainError;
use stockroom_inventory::{
    ItemCode, LedgerError, LedgerResult, StockLedger, StockLevel, in_display_order,
};

/// In-memory ledger for tests/dev.
///
/// The write lock is held across each read-modify-write, which gives the same
/// per-code atomicity as the SQLite ledger. The lock is a `std` one: no guard
/// lives across an `.await`. Nothing survives the process.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    inner: RwLock<HashMap<ItemCode, StockLevel>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> LedgerError {
    LedgerError::Storage("in-memory ledger lock poisoned".to_string())
}

#[async_trait::async_trait]
impl StockLedger for InMemoryLedger {
    async fn initialize(&self) -> LedgerResult<()> {
        let mut guard = self.inner.write().map_err(|_| poisoned())?;
        let now = Utc::now();
        let before = guard.len();
        for code in ItemCode::all() {
            guard.entry(code).or_insert_with(|| StockLevel {
                code,
                quantity: 0,
                updated_at: Some(now),
            });
        }
        tracing::info!(inserted = guard.len() - before, "inventory initialized");
        Ok(())
    }

    async fn adjust(&self, code: &str, delta: i64) -> LedgerResult<i64> {
        let item = ItemCode::parse(code)?;
        let mut guard = self.inner.write().map_err(|_| poisoned())?;

        let level = guard.entry(item).or_insert_with(|| StockLevel::empty(item));
        let quantity = level
            .quantity
            .checked_add(delta)
            .ok_or_else(|| DomainError::validation("quantity out of range in adjust"))?;
        level.quantity = quantity;
        level.updated_at = Some(Utc::now());

        tracing::info!(code = %item, delta, quantity, "stock adjusted");
        if quantity < 0 {
            tracing::warn!(code = %item, quantity, "stock is overdrawn");
        }
        Ok(quantity)
    }

    async fn levels(&self) -> LedgerResult<Vec<StockLevel>> {
        let guard = self.inner.read().map_err(|_| poisoned())?;
        Ok(in_display_order(guard.values().cloned()))
    }

    async fn reset_all(&self) -> LedgerResult<()> {
        let mut guard = self.inner.write().map_err(|_| poisoned())?;
        let now = Utc::now();
        for level in guard.values_mut() {
            level.quantity = 0;
            level.updated_at = Some(now);
        }
        tracing::info!(rows = guard.len(), "inventory reset");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    use stockroom_inventory::STOCK_ITEMS;

    fn block_on<F: std::future::Future>(f: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap()
            .block_on(f)
    }

    #[tokio::test]
    async fn snapshot_before_initialize_defaults_to_zero() {
        let ledger = InMemoryLedger::new();
        let snapshot = ledger.snapshot().await.unwrap();
        assert_eq!(snapshot.len(), STOCK_ITEMS.len());
        assert!(snapshot.iter().all(|(_, q)| *q == 0));
    }

    #[tokio::test]
    async fn initialize_does_not_clobber_existing_quantities() {
        let ledger = InMemoryLedger::new();
        ledger.initialize().await.unwrap();
        ledger.adjust("301", 9).await.unwrap();
        ledger.initialize().await.unwrap();

        assert_eq!(ledger.snapshot().await.unwrap()[14].1, 9);
    }

    #[tokio::test]
    async fn unknown_code_leaves_everything_unchanged() {
        let ledger = InMemoryLedger::new();
        ledger.initialize().await.unwrap();
        ledger.adjust("2", 2).await.unwrap();
        let before = ledger.levels().await.unwrap();

        let err = ledger.adjust("", 1).await.unwrap_err();
        assert!(matches!(err, LedgerError::Domain(DomainError::UnknownItem(_))));
        assert_eq!(ledger.levels().await.unwrap(), before);
    }

    #[tokio::test]
    async fn overdrawn_stock_is_kept_and_flagged() {
        let ledger = InMemoryLedger::new();
        ledger.initialize().await.unwrap();

        assert_eq!(ledger.adjust("33", -2).await.unwrap(), -2);

        let levels = ledger.levels().await.unwrap();
        let overdrawn: Vec<&str> = levels
            .iter()
            .filter(|l| l.is_overdrawn())
            .map(|l| l.code.as_str())
            .collect();
        assert_eq!(overdrawn, vec!["33"]);
    }

    #[tokio::test]
    async fn overflow_is_rejected() {
        let ledger = InMemoryLedger::new();
        ledger.adjust("5", i64::MIN).await.unwrap();
        let err = ledger.adjust("5", -1).await.unwrap_err();
        assert!(matches!(err, LedgerError::Domain(DomainError::Validation(_))));
        assert_eq!(ledger.snapshot().await.unwrap()[9].1, i64::MIN);
    }

    #[tokio::test]
    async fn reset_all_after_adjustments() {
        let ledger = InMemoryLedger::new();
        ledger.initialize().await.unwrap();
        ledger.adjust("05", -4).await.unwrap();
        ledger.adjust("33", 12).await.unwrap();

        ledger.reset_all().await.unwrap();

        let expected: Vec<(ItemCode, i64)> = ItemCode::all().map(|c| (c, 0)).collect();
        assert_eq!(ledger.snapshot().await.unwrap(), expected);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 128,
            ..ProptestConfig::default()
        })]

        /// Property: two adjustments equal one adjustment by their sum.
        #[test]
        fn adjustments_are_additive(
            idx in 0usize..STOCK_ITEMS.len(),
            d1 in -1_000_000i64..1_000_000,
            d2 in -1_000_000i64..1_000_000,
        ) {
            let code = STOCK_ITEMS[idx];
            let (split, combined) = block_on(async {
                let a = InMemoryLedger::new();
                a.initialize().await.unwrap();
                a.adjust(code, d1).await.unwrap();
                let split = a.adjust(code, d2).await.unwrap();

                let b = InMemoryLedger::new();
                b.initialize().await.unwrap();
                let combined = b.adjust(code, d1 + d2).await.unwrap();
                (split, combined)
            });
            prop_assert_eq!(split, combined);
        }
    }
}
