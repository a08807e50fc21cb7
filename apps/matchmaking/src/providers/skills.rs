use std::collections::HashSet;

use crate::models::profile::{CandidateProfile, VacancyProfile};

use super::{normalize_terms, ProviderError, SubScoreProvider};

const REQUIRED_SHARE: f64 = 0.8;
const NICE_TO_HAVE_SHARE: f64 = 0.2;

/// Share of the vacancy's skills the candidate lists. Case-insensitive.
///
/// With both lists present: 0.8 × required coverage + 0.2 × nice-to-have coverage.
pub struct SkillsProvider {
    pub factor: String,
}

impl Default for SkillsProvider {
    fn default() -> Self {
        Self {
            factor: "skills".to_string(),
        }
    }
}

impl SubScoreProvider for SkillsProvider {
    fn factor(&self) -> &str {
        &self.factor
    }

    fn score(
        &self,
        candidate: &CandidateProfile,
        vacancy: &VacancyProfile,
    ) -> Result<Option<f64>, ProviderError> {
        let have: HashSet<String> = normalize_terms(&candidate.skills).into_iter().collect();
        let required = coverage(&have, &normalize_terms(&vacancy.required_skills));
        let nice = coverage(&have, &normalize_terms(&vacancy.nice_to_have_skills));

        Ok(match (required, nice) {
            (Some(r), Some(n)) => Some(REQUIRED_SHARE * r + NICE_TO_HAVE_SHARE * n),
            (Some(r), None) => Some(r),
            (None, Some(n)) => Some(n),
            (None, None) => None,
        })
    }
}

fn coverage(have: &HashSet<String>, wanted: &[String]) -> Option<f64> {
    let wanted: HashSet<&String> = wanted.iter().collect();
    if wanted.is_empty() {
        return None;
    }
    let hits = wanted.iter().filter(|w| have.contains(w.as_str())).count();
    Some(hits as f64 / wanted.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn candidate(skills: &[&str]) -> CandidateProfile {
        CandidateProfile {
            skills: strings(skills),
            ..Default::default()
        }
    }

    #[test]
    fn test_full_required_coverage_is_one() {
        let vacancy = VacancyProfile {
            required_skills: strings(&["Rust", "PostgreSQL"]),
            ..Default::default()
        };
        let score = SkillsProvider::default()
            .score(&candidate(&["rust", " postgresql ", "docker"]), &vacancy)
            .unwrap();
        assert_eq!(score, Some(1.0));
    }

    #[test]
    fn test_partial_required_with_nice_to_have() {
        let vacancy = VacancyProfile {
            required_skills: strings(&["rust", "kafka"]),
            nice_to_have_skills: strings(&["terraform"]),
            ..Default::default()
        };
        let score = SkillsProvider::default()
            .score(&candidate(&["Rust", "Terraform"]), &vacancy)
            .unwrap()
            .unwrap();
        // 0.8*0.5 + 0.2*1.0 = 0.6
        assert!((score - 0.6).abs() < 1e-12, "score was {score}");
    }

    #[test]
    fn test_duplicate_requirements_count_once() {
        let vacancy = VacancyProfile {
            required_skills: strings(&["Rust", "rust", "go"]),
            ..Default::default()
        };
        let score = SkillsProvider::default()
            .score(&candidate(&["rust"]), &vacancy)
            .unwrap();
        assert_eq!(score, Some(0.5));
    }

    #[test]
    fn test_no_requirements_is_no_data() {
        let score = SkillsProvider::default()
            .score(&candidate(&["rust"]), &VacancyProfile::default())
            .unwrap();
        assert_eq!(score, None);
    }
}
