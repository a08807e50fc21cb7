//! Sub-score providers — pluggable, trait-based capabilities that turn a
//! (candidate, vacancy) pair into one [0, 1] sub-score per factor.
//!
//! The aggregator never calls providers itself. `collect_sub_scores` runs
//! them and applies the `FallbackPolicy` whenever a provider is unavailable
//! or fails, so factor-level outages show up as `missing` rather than as a
//! silently wrong score.

pub mod culture;
pub mod experience;
pub mod personality;
pub mod skills;

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::models::profile::{CandidateProfile, VacancyProfile};
use crate::scoring::{ScoringError, ScoringResult};

pub use culture::CultureProvider;
pub use experience::ExperienceProvider;
pub use personality::PersonalityProvider;
pub use skills::SkillsProvider;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider returned a non-finite score")]
    NonFinite,

    #[error("provider failed: {0}")]
    Failed(String),
}

/// A capability that scores one factor. Implement this to plug in a model,
/// a rule engine, or a stub without touching the aggregator.
pub trait SubScoreProvider: Send + Sync {
    /// Registry name of the factor this provider scores.
    fn factor(&self) -> &str;

    /// Whether the backing capability is usable right now.
    fn is_available(&self) -> bool {
        true
    }

    /// `Ok(None)` when the profiles carry no data for this factor.
    fn score(
        &self,
        candidate: &CandidateProfile,
        vacancy: &VacancyProfile,
    ) -> Result<Option<f64>, ProviderError>;
}

/// What to do when a provider is unavailable or errors out.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "policy", content = "value", rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Leave the factor out; the aggregator flags it missing.
    #[default]
    TreatAsMissing,
    /// Substitute a fixed value in [0, 1].
    Neutral(f64),
    /// Fail the whole request with `ProviderUnavailable`.
    Fail,
}

pub type ProviderSet = Vec<Arc<dyn SubScoreProvider>>;

/// The four reference providers, keyed to the standard registry factors.
pub fn standard_providers() -> ProviderSet {
    vec![
        Arc::new(SkillsProvider::default()),
        Arc::new(ExperienceProvider::default()),
        Arc::new(PersonalityProvider::default()),
        Arc::new(CultureProvider::default()),
    ]
}

/// Runs every provider and builds the sub-score map consumed by `compute`.
pub fn collect_sub_scores(
    providers: &[Arc<dyn SubScoreProvider>],
    candidate: &CandidateProfile,
    vacancy: &VacancyProfile,
    policy: FallbackPolicy,
) -> ScoringResult<BTreeMap<String, f64>> {
    let mut sub_scores = BTreeMap::new();

    for provider in providers {
        let factor = provider.factor();

        let outcome = if provider.is_available() {
            match provider.score(candidate, vacancy) {
                Ok(Some(value)) if value.is_finite() => Ok(Some(value)),
                Ok(Some(_)) => Err(ProviderError::NonFinite),
                Ok(None) => Ok(None),
                Err(e) => Err(e),
            }
        } else {
            Err(ProviderError::Failed("capability not available".to_string()))
        };

        match outcome {
            Ok(Some(value)) => {
                if !(0.0..=1.0).contains(&value) {
                    warn!("Provider for '{factor}' returned {value}, clamping to [0, 1]");
                }
                sub_scores.insert(factor.to_string(), value.clamp(0.0, 1.0));
            }
            Ok(None) => {}
            Err(e) => {
                warn!("Sub-score provider for '{factor}' unusable: {e}");
                match policy {
                    FallbackPolicy::TreatAsMissing => {}
                    FallbackPolicy::Neutral(value) => {
                        sub_scores.insert(factor.to_string(), value.clamp(0.0, 1.0));
                    }
                    FallbackPolicy::Fail => {
                        return Err(ScoringError::ProviderUnavailable(factor.to_string()));
                    }
                }
            }
        }
    }

    Ok(sub_scores)
}

/// Lowercased, trimmed, non-empty entries.
pub(crate) fn normalize_terms(terms: &[String]) -> Vec<String> {
    terms
        .iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}
