//! Scoring Engine — versioned, immutable snapshots of the registry and the
//! business-unit weights.
//!
//! Readers clone the current `Arc<ScoringSnapshot>` and score against it
//! without holding any lock. Writers are serialized, build the next snapshot
//! off to the side, validate it, and swap it in. A failed mutation leaves the
//! published snapshot untouched.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, RwLock};

use chrono::{DateTime, Utc};
use tracing::info;

use super::aggregator::{aggregate, MatchResult};
use super::business_unit::{BusinessUnitConfig, BusinessUnitConfigs, ResolvedWeights};
use super::factor::{Factor, FactorRegistry};
use super::ScoringResult;

#[derive(Debug, Clone)]
pub struct ScoringSnapshot {
    pub version: u64,
    pub registry: FactorRegistry,
    pub business_units: BusinessUnitConfigs,
}

impl ScoringSnapshot {
    pub fn resolve(&self, business_unit_id: &str) -> ScoringResult<ResolvedWeights> {
        self.business_units.resolve(&self.registry, business_unit_id)
    }

    pub fn compute(
        &self,
        business_unit_id: &str,
        sub_scores: &BTreeMap<String, f64>,
        computed_at: DateTime<Utc>,
    ) -> ScoringResult<MatchResult> {
        let resolved = self.resolve(business_unit_id)?;
        aggregate(&resolved, sub_scores, computed_at)
    }
}

#[derive(Debug)]
pub struct ScoringEngine {
    current: RwLock<Arc<ScoringSnapshot>>,
    writer: Mutex<()>,
}

impl ScoringEngine {
    pub fn new(registry: FactorRegistry) -> Self {
        Self {
            current: RwLock::new(Arc::new(ScoringSnapshot {
                version: 1,
                registry,
                business_units: BusinessUnitConfigs::new(),
            })),
            writer: Mutex::new(()),
        }
    }

    /// The currently published snapshot.
    pub fn snapshot(&self) -> Arc<ScoringSnapshot> {
        // snapshots are immutable, so a poisoned lock still guards a whole one
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    pub fn version(&self) -> u64 {
        self.snapshot().version
    }

    pub fn register(&self, factor: Factor) -> ScoringResult<u64> {
        let name = factor.name.clone();
        let version = self.mutate(|next| next.registry.register(factor))?;
        info!("Registered factor '{name}' (snapshot v{version})");
        Ok(version)
    }

    pub fn load(
        &self,
        business_unit_id: &str,
        weight_map: BTreeMap<String, f64>,
    ) -> ScoringResult<u64> {
        let version = self.mutate(|next| {
            next.business_units
                .load(&next.registry, business_unit_id, weight_map)
        })?;
        info!("Loaded weights for business unit '{business_unit_id}' (snapshot v{version})");
        Ok(version)
    }

    /// Replaces every business-unit config at once. All or nothing.
    pub fn load_all(&self, configs: Vec<BusinessUnitConfig>) -> ScoringResult<u64> {
        let count = configs.len();
        let version = self.mutate(|next| {
            next.business_units = BusinessUnitConfigs::from_configs(&next.registry, configs)?;
            Ok(())
        })?;
        info!("Loaded {count} business unit configs (snapshot v{version})");
        Ok(version)
    }

    /// Drops an explicit config. Returns `None` when the unit had none.
    pub fn remove(&self, business_unit_id: &str) -> Option<u64> {
        self.snapshot().business_units.get(business_unit_id)?;

        let mut removed = false;
        let version = self
            .mutate(|next| {
                removed = next.business_units.remove(business_unit_id);
                Ok(())
            })
            .ok()?;
        removed.then_some(version)
    }

    pub fn resolve(&self, business_unit_id: &str) -> ScoringResult<ResolvedWeights> {
        self.snapshot().resolve(business_unit_id)
    }

    pub fn compute(
        &self,
        business_unit_id: &str,
        sub_scores: &BTreeMap<String, f64>,
        computed_at: DateTime<Utc>,
    ) -> ScoringResult<MatchResult> {
        self.snapshot()
            .compute(business_unit_id, sub_scores, computed_at)
    }

    fn mutate<F>(&self, apply: F) -> ScoringResult<u64>
    where
        F: FnOnce(&mut ScoringSnapshot) -> ScoringResult<()>,
    {
        let _writer = self.writer.lock().unwrap_or_else(|e| e.into_inner());

        let mut next = (*self.snapshot()).clone();
        apply(&mut next)?;
        next.version += 1;
        let version = next.version;

        let mut current = self.current.write().unwrap_or_else(|e| e.into_inner());
        *current = Arc::new(next);
        Ok(version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::business_unit::WeightsSource;
    use crate::scoring::factor::FactorCategory;
    use crate::scoring::ScoringError;
    use std::thread;

    fn weights(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_mutations_bump_version() {
        let engine = ScoringEngine::new(FactorRegistry::standard());
        assert_eq!(engine.version(), 1);

        engine.load("bu1", weights(&[("skills", 1.0)])).unwrap();
        assert_eq!(engine.version(), 2);

        engine
            .register(Factor::new("languages", FactorCategory::Other, 0.1))
            .unwrap();
        assert_eq!(engine.version(), 3);
    }

    #[test]
    fn test_failed_mutation_keeps_snapshot() {
        let engine = ScoringEngine::new(FactorRegistry::standard());
        engine.load("bu1", weights(&[("skills", 1.0)])).unwrap();

        let err = engine
            .load("bu1", weights(&[("nonexistent", 1.0)]))
            .unwrap_err();
        assert_eq!(err, ScoringError::UnknownFactor("nonexistent".to_string()));
        assert_eq!(engine.version(), 2);
        assert_eq!(engine.resolve("bu1").unwrap().weights, weights(&[("skills", 1.0)]));
    }

    #[test]
    fn test_load_all_is_all_or_nothing() {
        let engine = ScoringEngine::new(FactorRegistry::standard());
        engine.load("kept", weights(&[("culture", 1.0)])).unwrap();

        let result = engine.load_all(vec![
            BusinessUnitConfig::new("a", weights(&[("skills", 1.0)])),
            BusinessUnitConfig::new("b", weights(&[("skills", 0.9)])),
        ]);
        assert!(matches!(result, Err(ScoringError::InvalidWeight(_))));
        assert_eq!(engine.snapshot().business_units.ids(), vec!["kept".to_string()]);

        engine
            .load_all(vec![BusinessUnitConfig::new("a", weights(&[("skills", 1.0)]))])
            .unwrap();
        assert_eq!(engine.snapshot().business_units.ids(), vec!["a".to_string()]);
    }

    #[test]
    fn test_remove_falls_back_to_defaults() {
        let engine = ScoringEngine::new(FactorRegistry::standard());
        engine.load("bu1", weights(&[("skills", 1.0)])).unwrap();

        assert_eq!(engine.remove("bu1"), Some(3));
        assert_eq!(engine.remove("bu1"), None);
        assert_eq!(
            engine.resolve("bu1").unwrap().source,
            WeightsSource::RegistryDefault
        );
    }

    #[test]
    fn test_compute_uses_unit_weights() {
        let engine = ScoringEngine::new(FactorRegistry::standard());
        engine
            .load("bu1", weights(&[("skills", 0.4), ("experience", 0.6)]))
            .unwrap();

        let result = engine
            .compute("bu1", &weights(&[("skills", 0.8)]), Utc::now())
            .unwrap();
        assert!((result.overall_score - 0.32).abs() < 1e-12);
        assert_eq!(result.missing_factors, vec!["experience".to_string()]);
    }

    #[test]
    fn test_compute_is_bit_identical_for_identical_inputs() {
        let engine = ScoringEngine::new(FactorRegistry::standard());
        let at = Utc::now();
        let sub_scores = weights(&[("skills", 0.7), ("culture", 0.3), ("personality", 0.9)]);

        let first = engine.compute("bu1", &sub_scores, at).unwrap();
        let second = engine.compute("bu1", &sub_scores, at).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_readers_never_observe_torn_config() {
        let engine = Arc::new(ScoringEngine::new(FactorRegistry::standard()));
        engine.load("bu1", weights(&[("skills", 1.0)])).unwrap();

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let engine = Arc::clone(&engine);
                thread::spawn(move || {
                    for _ in 0..500 {
                        let resolved = engine.resolve("bu1").unwrap();
                        let sum: f64 = resolved.weights.values().sum();
                        assert!((sum - 1.0).abs() < 1e-6, "torn weights: {resolved:?}");
                    }
                })
            })
            .collect();

        for i in 0..200 {
            let map = if i % 2 == 0 {
                weights(&[("experience", 0.5), ("culture", 0.5)])
            } else {
                weights(&[("skills", 1.0)])
            };
            engine.load("bu1", map).unwrap();
        }

        for reader in readers {
            reader.join().unwrap();
        }
        assert_eq!(engine.version(), 202);
    }
}
