use std::collections::BTreeMap;

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use super::WeightSource;
use crate::models::business_unit::BusinessUnitWeightRow;
use crate::scoring::business_unit::BusinessUnitConfig;

/// Reads `business_unit_weights(business_unit_id, factor_name, weight)`.
pub struct PgWeightSource {
    pool: PgPool,
}

impl PgWeightSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WeightSource for PgWeightSource {
    fn describe(&self) -> String {
        "postgres table business_unit_weights".to_string()
    }

    async fn fetch(&self) -> Result<Vec<BusinessUnitConfig>> {
        let rows = sqlx::query_as::<_, BusinessUnitWeightRow>(
            r#"
            SELECT business_unit_id, factor_name, weight
            FROM business_unit_weights
            ORDER BY business_unit_id, factor_name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let configs = group_rows(rows);
        info!("Read {} business unit configs from postgres", configs.len());
        Ok(configs)
    }
}

/// Folds flat rows into one config per business unit.
pub fn group_rows(rows: Vec<BusinessUnitWeightRow>) -> Vec<BusinessUnitConfig> {
    let mut grouped: BTreeMap<String, BTreeMap<String, f64>> = BTreeMap::new();
    for row in rows {
        grouped
            .entry(row.business_unit_id)
            .or_default()
            .insert(row.factor_name, row.weight);
    }
    grouped
        .into_iter()
        .map(|(id, weights)| BusinessUnitConfig::new(id, weights))
        .collect()
}
