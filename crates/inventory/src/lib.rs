//! Inventory domain module.
//!
//! This crate contains the item catalogue, stock levels and the ledger
//! contract. Storage backends live in `stockroom-infra`.

pub mod item;
pub mod ledger;
pub mod level;

pub use item::{ItemCode, STOCK_ITEMS};
pub use ledger::{LedgerError, LedgerResult, StockLedger};
pub use level::{StockLevel, in_display_order};
