use crate::models::profile::{CandidateProfile, VacancyProfile};

use super::{ProviderError, SubScoreProvider};

/// Trait-profile closeness: 1 − mean |candidate − vacancy| over shared traits.
///
/// Trait values are expected in [0, 1]; anything else is a provider error.
pub struct PersonalityProvider {
    pub factor: String,
}

impl Default for PersonalityProvider {
    fn default() -> Self {
        Self {
            factor: "personality".to_string(),
        }
    }
}

impl SubScoreProvider for PersonalityProvider {
    fn factor(&self) -> &str {
        &self.factor
    }

    fn score(
        &self,
        candidate: &CandidateProfile,
        vacancy: &VacancyProfile,
    ) -> Result<Option<f64>, ProviderError> {
        let mut total_diff = 0.0_f64;
        let mut shared = 0usize;

        for (name, ideal) in &vacancy.personality {
            let Some(actual) = candidate.personality.get(name) else {
                continue;
            };
            for value in [ideal, actual] {
                if !(0.0..=1.0).contains(value) {
                    return Err(ProviderError::Failed(format!(
                        "trait '{name}' value {value} is outside [0, 1]"
                    )));
                }
            }
            total_diff += (ideal - actual).abs();
            shared += 1;
        }

        if shared == 0 {
            return Ok(None);
        }
        Ok(Some(1.0 - total_diff / shared as f64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn traits(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn score(
        candidate: &[(&str, f64)],
        vacancy: &[(&str, f64)],
    ) -> Result<Option<f64>, ProviderError> {
        PersonalityProvider::default().score(
            &CandidateProfile {
                personality: traits(candidate),
                ..Default::default()
            },
            &VacancyProfile {
                personality: traits(vacancy),
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_identical_profiles_score_one() {
        let profile = [("openness", 0.7), ("conscientiousness", 0.9)];
        assert_eq!(score(&profile, &profile).unwrap(), Some(1.0));
    }

    #[test]
    fn test_mean_absolute_difference_over_shared_traits() {
        let s = score(
            &[("openness", 0.5), ("extraversion", 0.2), ("neuroticism", 0.1)],
            &[("openness", 0.9), ("extraversion", 0.4)],
        )
        .unwrap()
        .unwrap();
        // diffs 0.4 and 0.2 → mean 0.3 → 0.7
        assert!((s - 0.7).abs() < 1e-12, "score was {s}");
    }

    #[test]
    fn test_no_shared_traits_is_no_data() {
        assert_eq!(
            score(&[("openness", 0.5)], &[("agreeableness", 0.5)]).unwrap(),
            None
        );
    }

    #[test]
    fn test_out_of_range_trait_is_an_error() {
        assert!(score(&[("openness", 7.0)], &[("openness", 0.5)]).is_err());
    }
}
