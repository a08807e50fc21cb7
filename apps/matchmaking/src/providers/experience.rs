use crate::models::profile::{CandidateProfile, VacancyProfile};

use super::{ProviderError, SubScoreProvider};

/// Candidate years over required years, capped at 1.0.
pub struct ExperienceProvider {
    pub factor: String,
}

impl Default for ExperienceProvider {
    fn default() -> Self {
        Self {
            factor: "experience".to_string(),
        }
    }
}

impl SubScoreProvider for ExperienceProvider {
    fn factor(&self) -> &str {
        &self.factor
    }

    fn score(
        &self,
        candidate: &CandidateProfile,
        vacancy: &VacancyProfile,
    ) -> Result<Option<f64>, ProviderError> {
        let required = match vacancy.min_years_experience {
            Some(years) if years > 0.0 => years,
            // no requirement: anyone qualifies
            _ => return Ok(Some(1.0)),
        };

        let Some(years) = candidate.years_experience else {
            return Ok(None);
        };
        if years < 0.0 {
            return Err(ProviderError::Failed(format!(
                "negative years of experience: {years}"
            )));
        }

        Ok(Some((years / required).min(1.0)))
    }
}
