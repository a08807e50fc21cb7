use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Candidate data the sub-score providers read. Fetched by the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CandidateProfile {
    #[serde(default)]
    pub candidate_id: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub years_experience: Option<f64>,
    /// trait name → value in [0, 1]
    #[serde(default)]
    pub personality: BTreeMap<String, f64>,
    #[serde(default)]
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VacancyProfile {
    #[serde(default)]
    pub vacancy_id: Option<String>,
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub nice_to_have_skills: Vec<String>,
    #[serde(default)]
    pub min_years_experience: Option<f64>,
    /// ideal trait profile for the role, values in [0, 1]
    #[serde(default)]
    pub personality: BTreeMap<String, f64>,
    #[serde(default)]
    pub values: Vec<String>,
}
