//! Weight sources — where business-unit weight maps come from at startup and
//! on reload. The storage format is a deployment concern; the engine only
//! ever sees `Vec<BusinessUnitConfig>`.

pub mod file;
pub mod pg;

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::scoring::business_unit::BusinessUnitConfig;
use crate::scoring::engine::ScoringEngine;

pub use file::FileWeightSource;
pub use pg::PgWeightSource;

#[async_trait]
pub trait WeightSource: Send + Sync {
    /// Human-readable origin, for logs and the reload response.
    fn describe(&self) -> String;

    async fn fetch(&self) -> Result<Vec<BusinessUnitConfig>>;
}

#[derive(Debug, Clone, Serialize)]
pub struct ReloadSummary {
    pub source: String,
    pub business_units: usize,
    pub version: u64,
}

/// Fetches every config from `source` and swaps them into the engine as one
/// snapshot. Nothing changes if any entry fails validation.
pub async fn reload(
    engine: &ScoringEngine,
    source: &dyn WeightSource,
) -> Result<ReloadSummary, AppError> {
    let configs = source.fetch().await?;
    let business_units = configs.len();
    let version = engine.load_all(configs)?;

    info!(
        "Reloaded {business_units} business unit configs from {} (snapshot v{version})",
        source.describe()
    );
    Ok(ReloadSummary {
        source: source.describe(),
        business_units,
        version,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::factor::FactorRegistry;
    use crate::scoring::ScoringError;
    use std::collections::BTreeMap;

    struct StaticSource(Vec<BusinessUnitConfig>);

    #[async_trait]
    impl WeightSource for StaticSource {
        fn describe(&self) -> String {
            "static".to_string()
        }

        async fn fetch(&self) -> Result<Vec<BusinessUnitConfig>> {
            Ok(self.0.clone())
        }
    }

    fn config(bu: &str, pairs: &[(&str, f64)]) -> BusinessUnitConfig {
        let weights: BTreeMap<String, f64> =
            pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect();
        BusinessUnitConfig::new(bu, weights)
    }

    #[tokio::test]
    async fn test_reload_swaps_all_configs() {
        let engine = ScoringEngine::new(FactorRegistry::standard());
        let source = StaticSource(vec![
            config("staffing", &[("skills", 0.5), ("experience", 0.5)]),
            config("executive_search", &[("culture", 1.0)]),
        ]);

        let summary = reload(&engine, &source).await.unwrap();
        assert_eq!(summary.business_units, 2);
        assert_eq!(summary.version, 2);
        assert_eq!(summary.source, "static");
        assert_eq!(
            engine.snapshot().business_units.ids(),
            vec!["executive_search".to_string(), "staffing".to_string()]
        );
    }

    #[tokio::test]
    async fn test_reload_with_invalid_entry_changes_nothing() {
        let engine = ScoringEngine::new(FactorRegistry::standard());
        let source = StaticSource(vec![config("staffing", &[("charisma", 1.0)])]);

        let err = reload(&engine, &source).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Scoring(ScoringError::UnknownFactor(ref name)) if name == "charisma"
        ));
        assert_eq!(engine.version(), 1);
    }
}
