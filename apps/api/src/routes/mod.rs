pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::optimizer::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/resumes/optimize", post(handlers::handle_optimize))
        .route(
            "/api/v1/resumes/optimize-section",
            post(handlers::handle_optimize_section),
        )
        .route("/api/v1/resumes/ats-score", post(handlers::handle_ats_score))
        .with_state(state)
}
