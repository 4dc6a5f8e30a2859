//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (unknown keys,
/// validation). Storage failures belong to the ledger error type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Stock adjustment requested for a code outside the item catalogue.
    #[error("unknown item code: {0}")]
    UnknownItem(String),

    /// Delivery quote requested for a destination that has no tariff.
    #[error("unknown destination: {0}")]
    UnknownDestination(String),

    /// Parcel weight is non-positive, non-finite or not a number.
    #[error("invalid weight: {0}")]
    InvalidWeight(String),

    /// A value failed validation (e.g. malformed configuration).
    #[error("validation failed: {0}")]
    Validation(String),
}

impl DomainError {
    pub fn unknown_item(code: impl Into<String>) -> Self {
        Self::UnknownItem(code.into())
    }

    pub fn unknown_destination(code: impl Into<String>) -> Self {
        Self::UnknownDestination(code.into())
    }

    pub fn invalid_weight(msg: impl Into<String>) -> Self {
        Self::InvalidWeight(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
