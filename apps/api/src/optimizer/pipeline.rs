//! Pipeline Orchestrator — runs every section of a resume through the
//! Section Optimizer and merges the results into a new document.
//!
//! Flow: validate → plan sections in document order → run (serialized or
//!       concurrent) → merge by position → score → assemble.
//!
//! The caller's document is never touched: the merge writes into a clone.
//! A run never fails once validation passes; every section that cannot be
//! optimized keeps its fallback value.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::errors::AppError;
use crate::llm_client::TextGenerator;
use crate::models::resume::ResumeDocument;
use crate::optimizer::assembler::{
    assemble, ImprovementReporting, OptimizationResult, SectionTally,
};
use crate::optimizer::pacing::{FixedDelay, RateLimiter, Unpaced};
use crate::optimizer::section::{
    OptimizationContext, OptimizationOutcome, SectionContent, SectionKind, SectionOptimizer,
};

/// Hard ceiling on orchestrator-level retries per section.
pub const MAX_RETRY_CAP: u32 = 3;

// ────────────────────────────────────────────────────────────────────────────
// Configuration
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExecutionMode {
    /// One call at a time in document order, paced by `call_delay`.
    #[default]
    Serialized,
    /// Up to `max_concurrency` calls in flight; results re-applied by position.
    Concurrent,
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub mode: ExecutionMode,
    pub call_delay: Duration,
    pub max_concurrency: usize,
    pub call_timeout: Duration,
    /// Whole-run budget; when it expires the run is cancelled.
    pub pipeline_timeout: Option<Duration>,
    pub max_retries: u32,
    pub reporting: ImprovementReporting,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            mode: ExecutionMode::Serialized,
            call_delay: Duration::from_millis(1000),
            max_concurrency: 4,
            call_timeout: Duration::from_secs(30),
            pipeline_timeout: None,
            max_retries: 0,
            reporting: ImprovementReporting::Attempted,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Request / plan
// ────────────────────────────────────────────────────────────────────────────

/// Input to a full-resume run.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OptimizeRequest {
    pub resume_data: Option<ResumeDocument>,
    pub target_role: Option<String>,
}

/// Where a section's outcome lands in the merged document.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Slot {
    Summary,
    Experience(usize),
    Project(usize),
    Skills,
}

#[derive(Debug)]
struct SectionTask {
    slot: Slot,
    kind: SectionKind,
    content: SectionContent,
    context: OptimizationContext,
}

/// Lists the sections worth a backend call, in document order:
/// summary, experience entries, projects, then skill suggestions.
fn plan(doc: &ResumeDocument, target_role: Option<&str>) -> Vec<SectionTask> {
    let base = OptimizationContext::for_document(doc, target_role);
    let mut tasks = Vec::new();

    if let Some(summary) = doc
        .personal_info
        .summary
        .as_deref()
        .filter(|s| !s.trim().is_empty())
    {
        tasks.push(SectionTask {
            slot: Slot::Summary,
            kind: SectionKind::Summary,
            content: SectionContent::Text(summary.to_string()),
            context: base.clone(),
        });
    }

    for (idx, entry) in doc.experience.iter().enumerate() {
        if entry.description.iter().any(|b| !b.trim().is_empty()) {
            tasks.push(SectionTask {
                slot: Slot::Experience(idx),
                kind: SectionKind::ExperienceBullets,
                content: SectionContent::List(entry.description.clone()),
                context: base.for_experience(entry),
            });
        }
    }

    for (idx, project) in doc.projects.iter().enumerate() {
        if !project.description.trim().is_empty() {
            tasks.push(SectionTask {
                slot: Slot::Project(idx),
                kind: SectionKind::ProjectDescription,
                content: SectionContent::Text(project.description.clone()),
                context: base.for_project(project),
            });
        }
    }

    tasks.push(SectionTask {
        slot: Slot::Skills,
        kind: SectionKind::SkillSuggestions,
        content: SectionContent::List(base.existing_skills.clone()),
        context: base,
    });

    tasks
}

// ────────────────────────────────────────────────────────────────────────────
// Orchestrator
// ────────────────────────────────────────────────────────────────────────────

/// Orchestrator over an injected backend. Holds no per-run state: pacing is
/// created fresh for every run, so one instance serves concurrent requests.
pub struct ResumeOptimizer {
    sections: SectionOptimizer,
    config: PipelineConfig,
}

impl ResumeOptimizer {
    pub fn new(backend: Arc<dyn TextGenerator>, config: PipelineConfig) -> Self {
        Self {
            sections: SectionOptimizer::new(backend, config.call_timeout),
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Pacing policy for one run, as implied by `config.mode`.
    fn pacer(&self) -> Box<dyn RateLimiter> {
        match self.config.mode {
            ExecutionMode::Serialized => Box::new(FixedDelay::new(self.config.call_delay)),
            ExecutionMode::Concurrent => Box::new(Unpaced),
        }
    }

    /// Optimizes one section on its own, under the same pacing and retry
    /// policy as a full run.
    pub async fn optimize_section(
        &self,
        kind: SectionKind,
        content: &SectionContent,
        context: &OptimizationContext,
    ) -> OptimizationOutcome {
        let pacer = self.pacer();
        self.run_section(kind, content, context, pacer.as_ref(), &CancellationToken::new())
            .await
    }

    pub async fn optimize_resume(
        &self,
        request: &OptimizeRequest,
    ) -> Result<OptimizationResult, AppError> {
        self.optimize_resume_with_cancel(request, &CancellationToken::new())
            .await
    }

    /// Full run. Cancelling `cancel` (or hitting the pipeline timeout)
    /// abandons in-flight calls; unfinished sections fall back.
    pub async fn optimize_resume_with_cancel(
        &self,
        request: &OptimizeRequest,
        cancel: &CancellationToken,
    ) -> Result<OptimizationResult, AppError> {
        let doc = request
            .resume_data
            .as_ref()
            .ok_or_else(|| AppError::Validation("resumeData is required".to_string()))?;

        let cancel = cancel.child_token();
        let pacer = self.pacer();

        let tasks = plan(doc, request.target_role.as_deref());
        info!(
            sections = tasks.len(),
            mode = ?self.config.mode,
            "Starting resume optimization"
        );

        let run = async {
            match self.config.mode {
                ExecutionMode::Serialized => {
                    self.run_serialized(&tasks, pacer.as_ref(), &cancel).await
                }
                ExecutionMode::Concurrent => {
                    self.run_concurrent(&tasks, pacer.as_ref(), &cancel).await
                }
            }
        };

        // The deadline lives inside this future: dropping the run drops it too.
        let outcomes = match self.config.pipeline_timeout {
            None => run.await,
            Some(budget) => {
                tokio::pin!(run);
                tokio::select! {
                    outcomes = &mut run => outcomes,
                    _ = tokio::time::sleep(budget) => {
                        warn!(
                            budget_ms = budget.as_millis() as u64,
                            "Pipeline deadline reached, cancelling unfinished sections"
                        );
                        cancel.cancel();
                        run.await
                    }
                }
            }
        };

        let (optimized, suggested_skills, tally) = merge(doc, &tasks, outcomes);
        let result = assemble(optimized, suggested_skills, &tally, self.config.reporting);

        info!(
            optimized = result.sections_optimized,
            fallen_back = result.sections_fallen_back,
            ats_score = result.ats_score,
            cancelled = cancel.is_cancelled(),
            "Resume optimization complete"
        );

        Ok(result)
    }

    async fn run_serialized(
        &self,
        tasks: &[SectionTask],
        pacer: &dyn RateLimiter,
        cancel: &CancellationToken,
    ) -> Vec<OptimizationOutcome> {
        let mut outcomes = Vec::with_capacity(tasks.len());
        for task in tasks {
            outcomes.push(
                self.run_section(task.kind, &task.content, &task.context, pacer, cancel)
                    .await,
            );
        }
        outcomes
    }

    async fn run_concurrent(
        &self,
        tasks: &[SectionTask],
        pacer: &dyn RateLimiter,
        cancel: &CancellationToken,
    ) -> Vec<OptimizationOutcome> {
        // Indexed: a closure over `(usize, &SectionTask)` fails the `Send` bound.
        let mut finished: Vec<(usize, OptimizationOutcome)> =
            stream::iter((0..tasks.len()).map(|idx| {
                let task = &tasks[idx];
                async move {
                    let outcome = self
                        .run_section(task.kind, &task.content, &task.context, pacer, cancel)
                        .await;
                    (idx, outcome)
                }
            }))
            .buffer_unordered(self.config.max_concurrency.max(1))
            .collect()
            .await;

        // Completion order is arbitrary; restore plan order.
        finished.sort_by_key(|(idx, _)| *idx);
        finished.into_iter().map(|(_, outcome)| outcome).collect()
    }

    /// Paces, calls, and retries one section up to the capped retry budget.
    async fn run_section(
        &self,
        kind: SectionKind,
        content: &SectionContent,
        context: &OptimizationContext,
        pacer: &dyn RateLimiter,
        cancel: &CancellationToken,
    ) -> OptimizationOutcome {
        let max_retries = self.config.max_retries.min(MAX_RETRY_CAP);
        let mut attempt = 0;

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {}
                _ = pacer.acquire() => {}
            }

            let outcome = self
                .sections
                .optimize_section_with_cancel(kind, content, context, cancel)
                .await;

            if !outcome.retryable() || attempt >= max_retries || cancel.is_cancelled() {
                return outcome;
            }

            attempt += 1;
            debug!(kind = ?kind, attempt, max_retries, "Retrying section");
        }
    }
}

/// Writes each outcome into its slot of a clone of `doc`. Fields no section
/// targeted are carried over as-is.
fn merge(
    doc: &ResumeDocument,
    tasks: &[SectionTask],
    outcomes: Vec<OptimizationOutcome>,
) -> (ResumeDocument, Vec<String>, SectionTally) {
    let mut optimized = doc.clone();
    let mut suggested_skills = Vec::new();
    let mut tally = SectionTally::default();

    for (task, outcome) in tasks.iter().zip(outcomes) {
        tally.record(task.kind, &outcome);

        match task.slot {
            Slot::Summary => {
                if let Some(summary) = outcome.into_text() {
                    optimized.personal_info.summary = Some(summary);
                }
            }
            Slot::Experience(idx) => {
                if let Some(bullets) = outcome.into_list() {
                    optimized.experience[idx].description = bullets;
                }
            }
            Slot::Project(idx) => {
                if let Some(description) = outcome.into_text() {
                    optimized.projects[idx].description = description;
                }
            }
            Slot::Skills => {
                if let Some(skills) = outcome.into_list() {
                    suggested_skills = skills;
                }
            }
        }
    }

    (optimized, suggested_skills, tally)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
