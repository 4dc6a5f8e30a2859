use core::str::FromStr;

use serde::Serialize;

use stockroom_core::{DomainError, ValueObject};

/// The warehouse item catalogue, in display order.
///
/// The order is significant: balances and item keyboards are always rendered
/// in this sequence.
pub const STOCK_ITEMS: [&str; 16] = [
    "05", "055", "1", "11", "2", "22", "3", "33", "4", "5", "10", "15", "20", "30", "301", "30кв",
];

/// Item code: a member of the closed catalogue.
///
/// Only [`ItemCode::parse`] constructs one, so holding an `ItemCode` proves the
/// code is known.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ItemCode(&'static str);

impl ItemCode {
    pub fn parse(code: &str) -> Result<Self, DomainError> {
        STOCK_ITEMS
            .into_iter()
            .find(|known| *known == code)
            .map(ItemCode)
            .ok_or_else(|| DomainError::unknown_item(code))
    }

    /// All catalogue codes in display order.
    pub fn all() -> impl Iterator<Item = ItemCode> {
        STOCK_ITEMS.into_iter().map(ItemCode)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }

    /// Position of this code in the display order.
    pub fn position(&self) -> usize {
        STOCK_ITEMS
            .into_iter()
            .position(|known| known == self.0)
            .unwrap_or(STOCK_ITEMS.len())
    }
}

impl ValueObject for ItemCode {}

impl core::fmt::Display for ItemCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.0)
    }
}

impl FromStr for ItemCode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for ItemCode {
    fn as_ref(&self) -> &str {
        self.0
    }
}
