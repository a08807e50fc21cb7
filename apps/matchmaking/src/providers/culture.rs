use std::collections::HashSet;

use crate::models::profile::{CandidateProfile, VacancyProfile};

use super::{normalize_terms, ProviderError, SubScoreProvider};

/// Jaccard overlap of candidate and vacancy value tags.
pub struct CultureProvider {
    pub factor: String,
}

impl Default for CultureProvider {
    fn default() -> Self {
        Self {
            factor: "culture".to_string(),
        }
    }
}

impl SubScoreProvider for CultureProvider {
    fn factor(&self) -> &str {
        &self.factor
    }

    fn score(
        &self,
        candidate: &CandidateProfile,
        vacancy: &VacancyProfile,
    ) -> Result<Option<f64>, ProviderError> {
        let ours: HashSet<String> = normalize_terms(&candidate.values).into_iter().collect();
        let theirs: HashSet<String> = normalize_terms(&vacancy.values).into_iter().collect();
        if ours.is_empty() || theirs.is_empty() {
            return Ok(None);
        }

        let intersection = ours.intersection(&theirs).count();
        let union = ours.union(&theirs).count();
        Ok(Some(intersection as f64 / union as f64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(candidate: &[&str], vacancy: &[&str]) -> Option<f64> {
        CultureProvider::default()
            .score(
                &CandidateProfile {
                    values: candidate.iter().map(|s| s.to_string()).collect(),
                    ..Default::default()
                },
                &VacancyProfile {
                    values: vacancy.iter().map(|s| s.to_string()).collect(),
                    ..Default::default()
                },
            )
            .unwrap()
    }

    #[test]
    fn test_jaccard_overlap() {
        // {autonomy, ownership} ∩ {ownership, remote-first, Autonomy} = 2, ∪ = 3
        let s = score(&["autonomy", "ownership"], &["Ownership", "remote-first", "Autonomy"]);
        assert!((s.unwrap() - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_disjoint_values_score_zero() {
        assert_eq!(score(&["hierarchy"], &["flat"]), Some(0.0));
    }

    #[test]
    fn test_empty_side_is_no_data() {
        assert_eq!(score(&[], &["flat"]), None);
        assert_eq!(score(&["flat"], &["  "]), None);
    }
}
