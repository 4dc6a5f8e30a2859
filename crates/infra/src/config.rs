//! Configuration loading and representation.
//!
//! Everything is read once at startup from `STOCKROOM_*` environment variables.

use std::path::PathBuf;

use anyhow::Context;

use stockroom_core::SessionId;
use stockroom_delivery::OveragePolicy;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://warehouse.db";
pub const DEFAULT_SESSION: &str = "console";

/// Where the inventory ledger lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseTarget {
    /// Process-local ledger; quantities are lost on exit.
    Memory,
    /// SQLite database URL, e.g. `sqlite://warehouse.db`.
    Sqlite(String),
}

impl DatabaseTarget {
    fn parse(value: &str) -> Self {
        match value.trim() {
            "memory" | ":memory:" => DatabaseTarget::Memory,
            url => DatabaseTarget::Sqlite(url.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database: DatabaseTarget,
    /// JSON file with tariff records; the built-in table is used when absent.
    pub tariffs_path: Option<PathBuf>,
    pub overage_policy: OveragePolicy,
    /// Session the console front end speaks as.
    pub session: SessionId,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (tests pass a map).
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database = match lookup("STOCKROOM_DATABASE_URL") {
            Some(url) if !url.trim().is_empty() => DatabaseTarget::parse(&url),
            _ => {
                tracing::info!("STOCKROOM_DATABASE_URL not set; using {DEFAULT_DATABASE_URL}");
                DatabaseTarget::Sqlite(DEFAULT_DATABASE_URL.to_string())
            }
        };

        let tariffs_path = lookup("STOCKROOM_TARIFFS_PATH")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        let overage_policy = match lookup("STOCKROOM_OVERAGE_POLICY") {
            Some(value) => value
                .parse::<OveragePolicy>()
                .context("invalid STOCKROOM_OVERAGE_POLICY")?,
            None => OveragePolicy::default(),
        };

        let session = SessionId::new(
            lookup("STOCKROOM_SESSION").unwrap_or_else(|| DEFAULT_SESSION.to_string()),
        )
        .context("invalid STOCKROOM_SESSION")?;

        Ok(Self {
            database,
            tariffs_path,
            overage_policy,
            session,
        })
    }
}
