//! Inventory ledger storage backends.

pub mod in_memory;
pub mod sqlite;

use std::sync::Arc;

use stockroom_inventory::{LedgerResult, StockLedger};

use crate::config::DatabaseTarget;

pub use in_memory::InMemoryLedger;
pub use sqlite::SqliteLedger;

/// Open the configured ledger and run `initialize` on it.
pub async fn open_ledger(target: &DatabaseTarget) -> LedgerResult<Arc<dyn StockLedger>> {
    let ledger: Arc<dyn StockLedger> = match target {
        DatabaseTarget::Memory => Arc::new(InMemoryLedger::new()),
        DatabaseTarget::Sqlite(url) => Arc::new(SqliteLedger::connect(url).await?),
    };
    ledger.initialize().await?;
    Ok(ledger)
}
