use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult, ValueObject};

use crate::cost::{OveragePolicy, calculate_cost};

/// Inclusive upper bounds (kg) of the four fixed weight bands.
pub const TIER_LIMITS_KG: [f64; 4] = [0.10, 0.25, 0.50, 1.00];

/// Delivery tariff for one destination.
///
/// `code` is the stable lookup key; `display_name` is only ever shown to users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tariff {
    pub code: String,
    pub display_name: String,
    /// Prices for the bands in [`TIER_LIMITS_KG`], same currency unit throughout.
    pub tiers: [f64; 4],
    /// Price per kilogram above the top band.
    pub overage_rate: f64,
}

impl ValueObject for Tariff {}

impl Tariff {
    pub fn new(
        code: impl Into<String>,
        display_name: impl Into<String>,
        tiers: [f64; 4],
        overage_rate: f64,
    ) -> Self {
        Self {
            code: code.into(),
            display_name: display_name.into(),
            tiers,
            overage_rate,
        }
    }

    fn validate(&self) -> DomainResult<()> {
        if self.code.trim().is_empty() {
            return Err(DomainError::validation("tariff code cannot be empty"));
        }
        if self.display_name.trim().is_empty() {
            return Err(DomainError::validation(format!(
                "tariff {}: display name cannot be empty",
                self.code
            )));
        }
        let mut prices = self.tiers.iter().chain(std::iter::once(&self.overage_rate));
        if prices.any(|p| !p.is_finite() || *p < 0.0) {
            return Err(DomainError::validation(format!(
                "tariff {}: prices must be finite and non-negative",
                self.code
            )));
        }
        // A heavier parcel never costs less.
        if self.tiers.windows(2).any(|pair| pair[1] < pair[0]) {
            return Err(DomainError::validation(format!(
                "tariff {}: tier prices must not decrease with weight",
                self.code
            )));
        }
        Ok(())
    }
}

/// Read-only destination tariffs, loaded once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct TariffTable {
    tariffs: Vec<Tariff>,
}

impl TariffTable {
    /// Build a table, rejecting empty tables, duplicate codes, invalid prices and
    /// tiers that get cheaper as weight grows.
    pub fn new(tariffs: Vec<Tariff>) -> DomainResult<Self> {
        if tariffs.is_empty() {
            return Err(DomainError::validation("tariff table cannot be empty"));
        }

        let mut seen = HashSet::new();
        for tariff in &tariffs {
            tariff.validate()?;
            if !seen.insert(tariff.code.as_str()) {
                return Err(DomainError::validation(format!(
                    "duplicate tariff code: {}",
                    tariff.code
                )));
            }
        }

        Ok(Self { tariffs })
    }

    /// Built-in destinations used when no tariff file is configured.
    pub fn builtin() -> Self {
        Self {
            tariffs: vec![
                Tariff::new("ru", "Russia", [330.0, 350.0, 370.0, 400.0], 20.0),
                Tariff::new("kz", "Kazakhstan", [450.0, 480.0, 520.0, 600.0], 150.0),
                Tariff::new("by", "Belarus", [420.0, 450.0, 490.0, 560.0], 120.0),
                Tariff::new("uz", "Uzbekistan", [520.0, 560.0, 610.0, 700.0], 200.0),
            ],
        }
    }

    pub fn get(&self, code: &str) -> Option<&Tariff> {
        self.tariffs.iter().find(|t| t.code == code)
    }

    /// Destinations in configuration order.
    pub fn destinations(&self) -> impl Iterator<Item = &Tariff> {
        self.tariffs.iter()
    }

    pub fn len(&self) -> usize {
        self.tariffs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tariffs.is_empty()
    }

    pub fn quote(&self, destination: &str, weight_kg: f64, policy: OveragePolicy) -> DomainResult<f64> {
        calculate_cost(self, destination, weight_kg, policy)
    }
}

impl Default for TariffTable {
    fn default() -> Self {
        Self::builtin()
    }
}
