pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::scoring::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Factor registry
        .route(
            "/api/v1/factors",
            get(handlers::handle_list_factors).post(handlers::handle_register_factor),
        )
        .route("/api/v1/factors/:name", get(handlers::handle_get_factor))
        // Business-unit weights
        .route(
            "/api/v1/business-units",
            get(handlers::handle_list_business_units),
        )
        .route(
            "/api/v1/business-units/:id/weights",
            get(handlers::handle_get_weights)
                .put(handlers::handle_put_weights)
                .delete(handlers::handle_delete_weights),
        )
        // Scoring
        .route("/api/v1/match/score", post(handlers::handle_score))
        .route("/api/v1/match/evaluate", post(handlers::handle_evaluate))
        .route("/api/v1/admin/reload", post(handlers::handle_reload))
        .with_state(state)
}
