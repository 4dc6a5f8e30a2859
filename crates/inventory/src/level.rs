use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::item::ItemCode;

/// Current stock of one catalogue item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockLevel {
    pub code: ItemCode,
    /// Signed: negative values mean more units were written off than received.
    pub quantity: i64,
    /// Last mutation time; `None` when the item has no stored record.
    pub updated_at: Option<DateTime<Utc>>,
}

impl StockLevel {
    pub fn empty(code: ItemCode) -> Self {
        Self {
            code,
            quantity: 0,
            updated_at: None,
        }
    }

    /// Overdrawn stock is a valid state that callers should flag.
    pub fn is_overdrawn(&self) -> bool {
        self.quantity < 0
    }
}

/// Arrange stored levels in catalogue display order.
///
/// Every catalogue code appears exactly once; a code with no stored record
/// gets quantity 0. Duplicate records keep the last one seen.
pub fn in_display_order(stored: impl IntoIterator<Item = StockLevel>) -> Vec<StockLevel> {
    let mut by_code: HashMap<ItemCode, StockLevel> =
        stored.into_iter().map(|level| (level.code, level)).collect();

    ItemCode::all()
        .map(|code| by_code.remove(&code).unwrap_or_else(|| StockLevel::empty(code)))
        .collect()
}
