//! Delivery cost module.
//!
//! Static tiered tariffs and the pure pricing function over them
//! (no IO, no storage).

pub mod cost;
pub mod tariff;

pub use cost::{OveragePolicy, Weight, calculate_cost};
pub use tariff::{TIER_LIMITS_KG, Tariff, TariffTable};
