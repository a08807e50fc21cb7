//! Axum route handlers for the Scoring API.

use std::collections::BTreeMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::profile::{CandidateProfile, VacancyProfile};
use crate::providers::collect_sub_scores;
use crate::scoring::aggregator::MatchResult;
use crate::scoring::business_unit::ResolvedWeights;
use crate::scoring::factor::{Factor, FactorCategory};
use crate::state::AppState;
use crate::weights::{reload, ReloadSummary};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CategoryQuery {
    pub category: Option<FactorCategory>,
}

#[derive(Debug, Serialize)]
pub struct FactorRegisteredResponse {
    pub factor: Factor,
    pub version: u64,
}

#[derive(Debug, Serialize)]
pub struct BusinessUnitListResponse {
    pub business_units: Vec<String>,
    pub version: u64,
}

#[derive(Debug, Deserialize)]
pub struct WeightMapRequest {
    pub factor_weights: BTreeMap<String, f64>,
}

#[derive(Debug, Serialize)]
pub struct WeightsUpdatedResponse {
    pub business_unit_id: String,
    pub version: u64,
}

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    pub business_unit_id: String,
    pub sub_scores: BTreeMap<String, f64>,
    /// Defaults to now. Pass it explicitly to get reproducible results.
    pub computed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct EvaluateRequest {
    pub business_unit_id: String,
    pub candidate: CandidateProfile,
    pub vacancy: VacancyProfile,
    pub computed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct EvaluateResponse {
    pub sub_scores: BTreeMap<String, f64>,
    pub match_result: MatchResult,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/factors
pub async fn handle_list_factors(
    State(state): State<AppState>,
    Query(params): Query<CategoryQuery>,
) -> Json<Vec<Factor>> {
    let snapshot = state.engine.snapshot();
    let factors: Vec<Factor> = match params.category {
        Some(category) => snapshot
            .registry
            .list_by_category(category)
            .into_iter()
            .cloned()
            .collect(),
        None => snapshot.registry.list().to_vec(),
    };
    Json(factors)
}

/// GET /api/v1/factors/:name
pub async fn handle_get_factor(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Factor>, AppError> {
    let snapshot = state.engine.snapshot();
    Ok(Json(snapshot.registry.get(&name)?.clone()))
}

/// POST /api/v1/factors
pub async fn handle_register_factor(
    State(state): State<AppState>,
    Json(factor): Json<Factor>,
) -> Result<(StatusCode, Json<FactorRegisteredResponse>), AppError> {
    let version = state.engine.register(factor.clone())?;
    Ok((
        StatusCode::CREATED,
        Json(FactorRegisteredResponse { factor, version }),
    ))
}

/// GET /api/v1/business-units
pub async fn handle_list_business_units(
    State(state): State<AppState>,
) -> Json<BusinessUnitListResponse> {
    let snapshot = state.engine.snapshot();
    Json(BusinessUnitListResponse {
        business_units: snapshot.business_units.ids(),
        version: snapshot.version,
    })
}

/// GET /api/v1/business-units/:id/weights
///
/// Explicit weights, or the registry defaults when the unit has none.
pub async fn handle_get_weights(
    State(state): State<AppState>,
    Path(business_unit_id): Path<String>,
) -> Result<Json<ResolvedWeights>, AppError> {
    Ok(Json(state.engine.resolve(&business_unit_id)?))
}

/// PUT /api/v1/business-units/:id/weights
pub async fn handle_put_weights(
    State(state): State<AppState>,
    Path(business_unit_id): Path<String>,
    Json(request): Json<WeightMapRequest>,
) -> Result<Json<WeightsUpdatedResponse>, AppError> {
    let version = state
        .engine
        .load(&business_unit_id, request.factor_weights)?;
    Ok(Json(WeightsUpdatedResponse {
        business_unit_id,
        version,
    }))
}

/// DELETE /api/v1/business-units/:id/weights
pub async fn handle_delete_weights(
    State(state): State<AppState>,
    Path(business_unit_id): Path<String>,
) -> Result<StatusCode, AppError> {
    state
        .engine
        .remove(&business_unit_id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "Business unit {business_unit_id} has no explicit weights"
            ))
        })
}

/// POST /api/v1/match/score
///
/// Aggregates caller-supplied sub-scores.
pub async fn handle_score(
    State(state): State<AppState>,
    Json(request): Json<ScoreRequest>,
) -> Result<Json<MatchResult>, AppError> {
    if request.business_unit_id.trim().is_empty() {
        return Err(AppError::Validation(
            "business_unit_id cannot be empty".to_string(),
        ));
    }

    let computed_at = request.computed_at.unwrap_or_else(Utc::now);
    let result = state
        .engine
        .compute(&request.business_unit_id, &request.sub_scores, computed_at)?;
    Ok(Json(result))
}

/// POST /api/v1/match/evaluate
///
/// Runs the sub-score providers against the given profiles, then aggregates.
/// Providers are synchronous, so they run on the blocking pool.
pub async fn handle_evaluate(
    State(state): State<AppState>,
    Json(request): Json<EvaluateRequest>,
) -> Result<Json<EvaluateResponse>, AppError> {
    if request.business_unit_id.trim().is_empty() {
        return Err(AppError::Validation(
            "business_unit_id cannot be empty".to_string(),
        ));
    }

    let providers = state.providers.clone();
    let policy = state.config.provider_fallback;
    let EvaluateRequest {
        business_unit_id,
        candidate,
        vacancy,
        computed_at,
    } = request;

    let sub_scores = tokio::task::spawn_blocking(move || {
        collect_sub_scores(&providers, &candidate, &vacancy, policy)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("provider task failed: {e}")))??;

    let match_result = state.engine.compute(
        &business_unit_id,
        &sub_scores,
        computed_at.unwrap_or_else(Utc::now),
    )?;

    Ok(Json(EvaluateResponse {
        sub_scores,
        match_result,
    }))
}

/// POST /api/v1/admin/reload
pub async fn handle_reload(State(state): State<AppState>) -> Result<Json<ReloadSummary>, AppError> {
    let source = state
        .weight_source
        .as_ref()
        .ok_or_else(|| AppError::Validation("No weight source configured".to_string()))?;
    Ok(Json(reload(&state.engine, source.as_ref()).await?))
}
