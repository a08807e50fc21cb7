//! Score Aggregator — folds per-factor sub-scores into one `MatchResult`.
//!
//! overall_score = Σ(weight × value) over the resolved weight map only.
//! Weighted factors without a sub-score count as 0.0 and are flagged
//! `missing` instead of failing the request.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::business_unit::{ResolvedWeights, WeightsSource};
use super::{ScoringError, ScoringResult};

const STRONG_THRESHOLD: f64 = 0.8;
const MODERATE_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubScore {
    pub factor_name: String,
    pub value: f64,
    pub computed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorBreakdown {
    pub sub_score: SubScore,
    pub weight: f64,
    pub weighted_contribution: f64,
    pub missing: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    Strong,   // ≥ 0.8
    Moderate, // 0.5 – 0.79
    Weak,
}

impl MatchTier {
    pub fn from_score(score: f64) -> Self {
        if score >= STRONG_THRESHOLD {
            MatchTier::Strong
        } else if score >= MODERATE_THRESHOLD {
            MatchTier::Moderate
        } else {
            MatchTier::Weak
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub business_unit_id: String,
    pub overall_score: f64,
    pub tier: MatchTier,
    pub breakdown: BTreeMap<String, FactorBreakdown>,
    pub missing_factors: Vec<String>,
    /// Sum of the weights whose factors had a sub-score.
    pub coverage: f64,
    pub weights_source: WeightsSource,
}

/// Rejects any sub-score that is not a finite value in [0, 1].
pub fn validate_sub_scores(sub_scores: &BTreeMap<String, f64>) -> ScoringResult<()> {
    for (factor, value) in sub_scores {
        if !value.is_finite() || !(0.0..=1.0).contains(value) {
            return Err(ScoringError::InvalidScore {
                factor: factor.clone(),
                value: *value,
            });
        }
    }
    Ok(())
}

/// Computes a `MatchResult` for already-resolved weights.
pub fn aggregate(
    resolved: &ResolvedWeights,
    sub_scores: &BTreeMap<String, f64>,
    computed_at: DateTime<Utc>,
) -> ScoringResult<MatchResult> {
    validate_sub_scores(sub_scores)?;

    for name in sub_scores.keys() {
        if !resolved.weights.contains_key(name) {
            debug!(
                "Ignoring sub-score '{name}': not weighted for business unit {}",
                resolved.business_unit_id
            );
        }
    }

    let mut breakdown = BTreeMap::new();
    let mut missing_factors = Vec::new();
    let mut total = 0.0_f64;
    let mut coverage = 0.0_f64;

    for (name, &weight) in &resolved.weights {
        let (value, missing) = match sub_scores.get(name) {
            Some(&value) => (value, false),
            None => (0.0, true),
        };

        let weighted_contribution = weight * value;
        total += weighted_contribution;

        if missing {
            missing_factors.push(name.clone());
        } else {
            coverage += weight;
        }

        breakdown.insert(
            name.clone(),
            FactorBreakdown {
                sub_score: SubScore {
                    factor_name: name.clone(),
                    value,
                    computed_at,
                },
                weight,
                weighted_contribution,
                missing,
            },
        );
    }

    // clamp absorbs float drift when weights sum to 1.0 ± tolerance
    let overall_score = total.clamp(0.0, 1.0);

    Ok(MatchResult {
        business_unit_id: resolved.business_unit_id.clone(),
        overall_score,
        tier: MatchTier::from_score(overall_score),
        breakdown,
        missing_factors,
        coverage: coverage.clamp(0.0, 1.0),
        weights_source: resolved.source,
    })
}
