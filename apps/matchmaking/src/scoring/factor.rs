use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{ScoringError, ScoringResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorCategory {
    Skills,
    Experience,
    Personality,
    Culture,
    Other,
}

impl FactorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FactorCategory::Skills => "skills",
            FactorCategory::Experience => "experience",
            FactorCategory::Personality => "personality",
            FactorCategory::Culture => "culture",
            FactorCategory::Other => "other",
        }
    }
}

impl fmt::Display for FactorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named dimension of compatibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Factor {
    pub name: String,
    pub category: FactorCategory,
    pub default_weight: f64,
}

impl Factor {
    pub fn new(name: impl Into<String>, category: FactorCategory, default_weight: f64) -> Self {
        Self {
            name: name.into(),
            category,
            default_weight,
        }
    }
}

/// Documented default split: 40% skills, 30% experience, 20% personality, 10% culture.
const STANDARD_FACTORS: &[(&str, FactorCategory, f64)] = &[
    ("skills", FactorCategory::Skills, 0.40),
    ("experience", FactorCategory::Experience, 0.30),
    ("personality", FactorCategory::Personality, 0.20),
    ("culture", FactorCategory::Culture, 0.10),
];

/// Canonical set of factors, kept in registration order.
#[derive(Debug, Clone, Default)]
pub struct FactorRegistry {
    factors: Vec<Factor>,
}

impl FactorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the four standard factors.
    pub fn standard() -> Self {
        Self {
            factors: STANDARD_FACTORS
                .iter()
                .map(|(name, category, weight)| Factor::new(*name, *category, *weight))
                .collect(),
        }
    }

    /// Adds a factor, or replaces an existing one with the same name and category.
    ///
    /// A replacement keeps its original position so `list` stays stable.
    pub fn register(&mut self, factor: Factor) -> ScoringResult<()> {
        if factor.name.trim().is_empty() {
            return Err(ScoringError::InvalidFactor(
                "factor name cannot be empty".to_string(),
            ));
        }
        if !factor.default_weight.is_finite() || !(0.0..=1.0).contains(&factor.default_weight) {
            return Err(ScoringError::InvalidWeight(format!(
                "default weight {} for '{}' must be within [0, 1]",
                factor.default_weight, factor.name
            )));
        }

        match self.factors.iter().position(|f| f.name == factor.name) {
            Some(i) if self.factors[i].category != factor.category => {
                Err(ScoringError::DuplicateFactor {
                    existing: self.factors[i].category,
                    requested: factor.category,
                    name: factor.name,
                })
            }
            Some(i) => {
                self.factors[i] = factor;
                Ok(())
            }
            None => {
                self.factors.push(factor);
                Ok(())
            }
        }
    }

    pub fn get(&self, name: &str) -> ScoringResult<&Factor> {
        self.factors
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| ScoringError::UnknownFactor(name.to_string()))
    }

    pub fn list(&self) -> &[Factor] {
        &self.factors
    }

    pub fn list_by_category(&self, category: FactorCategory) -> Vec<&Factor> {
        self.factors
            .iter()
            .filter(|f| f.category == category)
            .collect()
    }

    /// Default weights of every factor, rescaled to sum to 1.0.
    pub fn default_weights(&self) -> ScoringResult<BTreeMap<String, f64>> {
        let total: f64 = self.factors.iter().map(|f| f.default_weight).sum();
        if total <= 0.0 {
            return Err(ScoringError::InvalidWeight(
                "registry has no factor with a positive default weight".to_string(),
            ));
        }

        Ok(self
            .factors
            .iter()
            .map(|f| (f.name.clone(), f.default_weight / total))
            .collect())
    }
}
