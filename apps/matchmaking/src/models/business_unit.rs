use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One row of the `business_unit_weights` table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BusinessUnitWeightRow {
    pub business_unit_id: String,
    pub factor_name: String,
    pub weight: f64,
}
