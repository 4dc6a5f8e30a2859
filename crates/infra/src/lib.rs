//! Infrastructure layer: ledger storage, configuration, tariff loading.

pub mod config;
pub mod ledger;
pub mod tariffs;

pub use config::{Config, DatabaseTarget};
pub use ledger::{InMemoryLedger, SqliteLedger, open_ledger};
pub use tariffs::load_tariffs;
