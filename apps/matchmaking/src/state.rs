use std::sync::Arc;

use crate::config::Config;
use crate::providers::ProviderSet;
use crate::scoring::engine::ScoringEngine;
use crate::weights::WeightSource;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ScoringEngine>,
    /// Pluggable sub-score providers. Default: the four rule-based reference providers.
    pub providers: Arc<ProviderSet>,
    /// `None` when weights come from the registry defaults only.
    pub weight_source: Option<Arc<dyn WeightSource>>,
    pub config: Config,
}
