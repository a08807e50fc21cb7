use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::info;

use super::WeightSource;
use crate::scoring::business_unit::BusinessUnitConfig;

/// JSON file shaped as `{ "<business_unit_id>": { "<factor>": weight, ... } }`.
pub struct FileWeightSource {
    path: PathBuf,
}

impl FileWeightSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl WeightSource for FileWeightSource {
    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }

    async fn fetch(&self) -> Result<Vec<BusinessUnitConfig>> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read weights file '{}'", self.path.display()))?;

        let configs = parse_weights_json(&raw)
            .with_context(|| format!("Invalid weights file '{}'", self.path.display()))?;

        info!(
            "Read {} business unit configs from {}",
            configs.len(),
            self.path.display()
        );
        Ok(configs)
    }
}

pub fn parse_weights_json(raw: &str) -> Result<Vec<BusinessUnitConfig>> {
    let parsed: BTreeMap<String, BTreeMap<String, f64>> = serde_json::from_str(raw)?;
    Ok(parsed
        .into_iter()
        .map(|(business_unit_id, factor_weights)| {
            BusinessUnitConfig::new(business_unit_id, factor_weights)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_groups_by_business_unit() {
        let configs = parse_weights_json(
            r#"{
                "staffing": {"skills": 0.5, "experience": 0.5},
                "executive_search": {"skills": 0.2, "experience": 0.4, "culture": 0.4}
            }"#,
        )
        .unwrap();

        assert_eq!(configs.len(), 2);
        assert_eq!(configs[0].business_unit_id, "executive_search");
        assert_eq!(configs[0].factor_weights["culture"], 0.4);
        assert_eq!(configs[1].business_unit_id, "staffing");
    }

    #[test]
    fn test_parse_rejects_non_numeric_weight() {
        assert!(parse_weights_json(r#"{"staffing": {"skills": "high"}}"#).is_err());
    }

    #[tokio::test]
    async fn test_fetch_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"bu1": {{"skills": 1.0}}}}"#).unwrap();

        let source = FileWeightSource::new(file.path());
        let configs = source.fetch().await.unwrap();
        assert_eq!(configs.len(), 1);
        assert_eq!(configs[0].factor_weights["skills"], 1.0);
        assert!(source.describe().starts_with("file "));
    }

    #[tokio::test]
    async fn test_fetch_missing_file_errors() {
        let source = FileWeightSource::new("/nonexistent/weights.json");
        let err = source.fetch().await.unwrap_err();
        assert!(err.to_string().contains("Failed to read weights file"));
    }
}
