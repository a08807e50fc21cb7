use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::factor::FactorRegistry;
use super::{ScoringError, ScoringResult, WEIGHT_SUM_TOLERANCE};

/// Weight overrides for one business unit. Replaced wholesale, never patched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessUnitConfig {
    pub business_unit_id: String,
    pub factor_weights: BTreeMap<String, f64>,
}

impl BusinessUnitConfig {
    pub fn new(business_unit_id: impl Into<String>, factor_weights: BTreeMap<String, f64>) -> Self {
        Self {
            business_unit_id: business_unit_id.into(),
            factor_weights,
        }
    }

    /// Checks referential integrity against the registry and that the weights
    /// are non-negative and sum to 1.0.
    pub fn validate(&self, registry: &FactorRegistry) -> ScoringResult<()> {
        if self.business_unit_id.trim().is_empty() {
            return Err(ScoringError::InvalidBusinessUnit(
                "business_unit_id cannot be empty".to_string(),
            ));
        }

        for (name, weight) in &self.factor_weights {
            registry.get(name)?;
            if !weight.is_finite() || *weight < 0.0 {
                return Err(ScoringError::InvalidWeight(format!(
                    "weight {weight} for '{name}' in business unit '{}' must be a non-negative number",
                    self.business_unit_id
                )));
            }
        }

        let sum: f64 = self.factor_weights.values().sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ScoringError::InvalidWeight(format!(
                "weights for business unit '{}' sum to {sum}, expected 1.0",
                self.business_unit_id
            )));
        }

        Ok(())
    }
}

/// Where a resolved weight map came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightsSource {
    Configured,
    RegistryDefault,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedWeights {
    pub business_unit_id: String,
    pub weights: BTreeMap<String, f64>,
    pub source: WeightsSource,
}

/// All explicit business-unit configurations, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct BusinessUnitConfigs {
    units: BTreeMap<String, BusinessUnitConfig>,
}

impl BusinessUnitConfigs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and stores a weight map, replacing any prior config for the unit.
    pub fn load(
        &mut self,
        registry: &FactorRegistry,
        business_unit_id: &str,
        weight_map: BTreeMap<String, f64>,
    ) -> ScoringResult<()> {
        let config = BusinessUnitConfig::new(business_unit_id, weight_map);
        config.validate(registry)?;
        self.units.insert(config.business_unit_id.clone(), config);
        Ok(())
    }

    /// Builds a full replacement set. Fails on the first invalid entry.
    pub fn from_configs(
        registry: &FactorRegistry,
        configs: Vec<BusinessUnitConfig>,
    ) -> ScoringResult<Self> {
        let mut units = BTreeMap::new();
        for config in configs {
            config.validate(registry)?;
            units.insert(config.business_unit_id.clone(), config);
        }
        Ok(Self { units })
    }

    pub fn remove(&mut self, business_unit_id: &str) -> bool {
        self.units.remove(business_unit_id).is_some()
    }

    pub fn get(&self, business_unit_id: &str) -> Option<&BusinessUnitConfig> {
        self.units.get(business_unit_id)
    }

    pub fn ids(&self) -> Vec<String> {
        self.units.keys().cloned().collect()
    }

    /// The unit's explicit weights, or the registry defaults normalized to 1.0.
    pub fn resolve(
        &self,
        registry: &FactorRegistry,
        business_unit_id: &str,
    ) -> ScoringResult<ResolvedWeights> {
        match self.units.get(business_unit_id) {
            Some(config) => Ok(ResolvedWeights {
                business_unit_id: business_unit_id.to_string(),
                weights: config.factor_weights.clone(),
                source: WeightsSource::Configured,
            }),
            None => Ok(ResolvedWeights {
                business_unit_id: business_unit_id.to_string(),
                weights: registry.default_weights()?,
                source: WeightsSource::RegistryDefault,
            }),
        }
    }
}
