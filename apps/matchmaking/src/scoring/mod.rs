//! Factor-weighted matching score.
//!
//! The registry defines the known factors, business units override their
//! weights, and the aggregator folds provider sub-scores into a single
//! `MatchResult`. The `ScoringEngine` holds all of it as an immutable
//! snapshot that is swapped on every mutation.

pub mod aggregator;
pub mod business_unit;
pub mod engine;
pub mod factor;
pub mod handlers;

use thiserror::Error;

/// Absolute tolerance when checking that a weight map sums to 1.0.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringError {
    #[error("unknown factor '{0}'")]
    UnknownFactor(String),

    #[error("factor '{name}' is already registered as {existing}, cannot re-register as {requested}")]
    DuplicateFactor {
        name: String,
        existing: factor::FactorCategory,
        requested: factor::FactorCategory,
    },

    #[error("invalid factor: {0}")]
    InvalidFactor(String),

    #[error("invalid weight: {0}")]
    InvalidWeight(String),

    #[error("invalid sub-score for '{factor}': {value} is outside [0, 1]")]
    InvalidScore { factor: String, value: f64 },

    #[error("invalid business unit: {0}")]
    InvalidBusinessUnit(String),

    #[error("provider for '{0}' is unavailable")]
    ProviderUnavailable(String),
}

pub type ScoringResult<T> = Result<T, ScoringError>;
