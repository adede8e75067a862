//! Axum route handlers for the Optimizer API.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::resume::ResumeDocument;
use crate::optimizer::assembler::OptimizationResult;
use crate::optimizer::ats::{ats_breakdown, AtsReport};
use crate::optimizer::pipeline::OptimizeRequest;
use crate::optimizer::section::{
    OptimizationContext, OptimizationOutcome, SectionContent, SectionKind,
};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct OptimizeSectionRequest {
    pub kind: SectionKind,
    pub content: SectionContent,
    #[serde(default)]
    pub context: OptimizationContext,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtsScoreRequest {
    pub resume_data: Option<ResumeDocument>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resumes/optimize
///
/// Runs the full pipeline. Backend trouble only degrades sections; the
/// response is always a complete result unless the request itself is invalid.
pub async fn handle_optimize(
    State(state): State<AppState>,
    Json(request): Json<OptimizeRequest>,
) -> Result<Json<OptimizationResult>, AppError> {
    // Own task so a panic in one run cannot take down the connection.
    let optimizer = state.optimizer.clone();
    let result = tokio::spawn(async move { optimizer.optimize_resume(&request).await })
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Optimization task failed: {e}")))??;

    Ok(Json(result))
}

/// POST /api/v1/resumes/optimize-section
pub async fn handle_optimize_section(
    State(state): State<AppState>,
    Json(request): Json<OptimizeSectionRequest>,
) -> Result<Json<OptimizationOutcome>, AppError> {
    let outcome = state
        .optimizer
        .optimize_section(request.kind, &request.content, &request.context)
        .await;

    Ok(Json(outcome))
}

/// POST /api/v1/resumes/ats-score
///
/// Scores a document as-is, with a per-rule breakdown. No backend calls.
pub async fn handle_ats_score(
    Json(request): Json<AtsScoreRequest>,
) -> Result<Json<AtsReport>, AppError> {
    let doc = request
        .resume_data
        .ok_or_else(|| AppError::Validation("resumeData is required".to_string()))?;

    Ok(Json(ats_breakdown(&doc)))
}
