//! Tiered delivery pricing.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult, ValueObject};

use crate::tariff::{TIER_LIMITS_KG, TariffTable};

/// How weight above the top band is charged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OveragePolicy {
    /// Exact fractional excess: 1.5 kg is charged 0.5 kg of overage.
    #[default]
    Fractional,
    /// Excess rounded up to whole kilograms: 1.5 kg is charged 1 kg of overage.
    #[serde(rename = "ceil")]
    CeilKilogram,
}

impl OveragePolicy {
    fn chargeable_excess(self, excess_kg: f64) -> f64 {
        match self {
            OveragePolicy::Fractional => excess_kg,
            OveragePolicy::CeilKilogram => excess_kg.ceil(),
        }
    }
}

impl FromStr for OveragePolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fractional" => Ok(OveragePolicy::Fractional),
            "ceil" | "ceiling" => Ok(OveragePolicy::CeilKilogram),
            other => Err(DomainError::validation(format!(
                "overage policy must be one of: fractional, ceil (got {other:?})"
            ))),
        }
    }
}

/// Parcel weight in kilograms: finite and strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Weight(f64);

impl ValueObject for Weight {}

impl Weight {
    pub fn new(kg: f64) -> DomainResult<Self> {
        if !kg.is_finite() {
            return Err(DomainError::invalid_weight("weight must be a finite number"));
        }
        if kg <= 0.0 {
            return Err(DomainError::invalid_weight(format!(
                "weight must be positive (got {kg})"
            )));
        }
        Ok(Self(kg))
    }

    /// Parse user input such as `1.5`, `1,5`, `0.3 kg` or `2кг`.
    pub fn parse(text: &str) -> DomainResult<Self> {
        let trimmed = text.trim();
        let number = ["kg", "кг"]
            .iter()
            .find_map(|suffix| trimmed.strip_suffix(suffix))
            .unwrap_or(trimmed)
            .trim()
            .replace(',', ".");

        let kg: f64 = number
            .parse()
            .map_err(|_| DomainError::invalid_weight(format!("not a number: {trimmed:?}")))?;
        Self::new(kg)
    }

    pub fn kg(&self) -> f64 {
        self.0
    }
}

impl FromStr for Weight {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Price a parcel of `weight_kg` to `destination`.
///
/// Bands are inclusive at their upper bound. Above 1 kg the cost is the top
/// band price plus `overage_rate` per chargeable excess kilogram, where the
/// policy decides whether the excess is rounded up.
pub fn calculate_cost(
    table: &TariffTable,
    destination: &str,
    weight_kg: f64,
    policy: OveragePolicy,
) -> DomainResult<f64> {
    let tariff = table
        .get(destination)
        .ok_or_else(|| DomainError::unknown_destination(destination))?;
    let weight = Weight::new(weight_kg)?.kg();

    if let Some(band) = TIER_LIMITS_KG.iter().position(|limit| weight <= *limit) {
        return Ok(tariff.tiers[band]);
    }

    let top = TIER_LIMITS_KG.len() - 1;
    let excess = weight - TIER_LIMITS_KG[top];
    Ok(tariff.tiers[top] + tariff.overage_rate * policy.chargeable_excess(excess))
}
