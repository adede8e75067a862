//! Section Optimizer — one backend call per section, with a fallback for
//! every way that call can go wrong.
//!
//! Backend and extraction failures are caught here and turned into an
//! `OptimizationOutcome` whose status says what happened. Nothing in this
//! module returns an error to its caller.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::llm_client::prompts::{
    FACTUALITY_INSTRUCTION, JSON_ARRAY_INSTRUCTION, PLAIN_TEXT_INSTRUCTION,
};
use crate::llm_client::{LlmError, TextGenerator};
use crate::models::resume::{ExperienceEntry, ProjectEntry, ResumeDocument};
use crate::optimizer::extractor::{extract_array, extract_text, ExtractionError};
use crate::optimizer::prompts::{
    fill_template, EXPERIENCE_PROMPT_TEMPLATE, PROJECT_PROMPT_TEMPLATE, SKILLS_PROMPT_TEMPLATE,
    SUMMARY_PROMPT_TEMPLATE,
};

/// Summaries shorter than this get the heuristic touch-up on failure.
const SHORT_SUMMARY_CHARS: usize = 50;
/// Cap on suggested skills returned to the caller.
pub const MAX_SUGGESTED_SKILLS: usize = 10;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Summary,
    ExperienceBullets,
    ProjectDescription,
    SkillSuggestions,
}

/// Section content: free text for summaries and project descriptions, a list
/// for bullets and skills.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SectionContent {
    Text(String),
    List(Vec<String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizationStatus {
    Optimized,
    FallbackOriginal,
    FallbackHeuristic,
}

/// Result of optimizing one section.
///
/// When `status` is not `Optimized`, `value` is derived from the input alone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizationOutcome {
    pub value: SectionContent,
    pub status: OptimizationStatus,
    /// Why the backend path was abandoned, for logs only.
    #[serde(skip)]
    pub failure: Option<String>,
    /// Whether another attempt could succeed.
    #[serde(skip)]
    pub retryable: bool,
}

impl OptimizationOutcome {
    fn optimized(value: SectionContent) -> Self {
        Self {
            value,
            status: OptimizationStatus::Optimized,
            failure: None,
            retryable: false,
        }
    }

    fn original(value: SectionContent) -> Self {
        Self {
            value,
            status: OptimizationStatus::FallbackOriginal,
            failure: None,
            retryable: false,
        }
    }

    pub fn is_optimized(&self) -> bool {
        self.status == OptimizationStatus::Optimized
    }

    /// True when the backend path was tried and failed (as opposed to a
    /// section that had nothing to optimize).
    pub fn failed(&self) -> bool {
        self.failure.is_some()
    }

    /// True when the failure came from the backend or its output, so a later
    /// call may succeed.
    pub fn retryable(&self) -> bool {
        self.failed() && self.retryable
    }

    pub fn into_text(self) -> Option<String> {
        match self.value {
            SectionContent::Text(t) => Some(t),
            SectionContent::List(_) => None,
        }
    }

    pub fn into_list(self) -> Option<Vec<String>> {
        match self.value {
            SectionContent::List(l) => Some(l),
            SectionContent::Text(_) => None,
        }
    }
}

/// Hints embedded in prompts. Built per section by the pipeline, or supplied
/// directly for single-section calls.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OptimizationContext {
    pub target_role: Option<String>,
    /// Position title or project name of the section being rewritten.
    pub title: Option<String>,
    pub company: Option<String>,
    pub technologies: Vec<String>,
    pub existing_skills: Vec<String>,
    pub positions: Vec<String>,
    pub experience_count: usize,
}

impl OptimizationContext {
    /// Document-wide hints shared by every section of `doc`.
    pub fn for_document(doc: &ResumeDocument, target_role: Option<&str>) -> Self {
        Self {
            target_role: target_role
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(str::to_string),
            existing_skills: doc.skills.all().cloned().collect(),
            positions: doc.experience.iter().map(|e| e.position.clone()).collect(),
            experience_count: doc.experience.len(),
            ..Default::default()
        }
    }

    pub fn for_experience(&self, entry: &ExperienceEntry) -> Self {
        Self {
            title: Some(entry.position.clone()),
            company: Some(entry.company.clone()),
            ..self.clone()
        }
    }

    pub fn for_project(&self, entry: &ProjectEntry) -> Self {
        Self {
            title: Some(entry.name.clone()),
            technologies: entry.technologies.clone(),
            ..self.clone()
        }
    }
}

#[derive(Debug, Error)]
enum SectionFailure {
    #[error(transparent)]
    Backend(#[from] LlmError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error("{0:?} expects {1} content")]
    Shape(SectionKind, &'static str),
}

impl SectionFailure {
    fn is_retryable(&self) -> bool {
        !matches!(self, SectionFailure::Shape(..))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Optimizer
// ────────────────────────────────────────────────────────────────────────────

/// Optimizes single sections against an injected backend.
#[derive(Clone)]
pub struct SectionOptimizer {
    backend: Arc<dyn TextGenerator>,
    call_timeout: Duration,
}

impl SectionOptimizer {
    pub fn new(backend: Arc<dyn TextGenerator>, call_timeout: Duration) -> Self {
        Self {
            backend,
            call_timeout,
        }
    }

    pub async fn optimize_section(
        &self,
        kind: SectionKind,
        content: &SectionContent,
        context: &OptimizationContext,
    ) -> OptimizationOutcome {
        self.optimize_section_with_cancel(kind, content, context, &CancellationToken::new())
            .await
    }

    /// Like `optimize_section`, but abandons the backend call as soon as
    /// `cancel` fires. A cancelled section falls back exactly as a failed one.
    pub async fn optimize_section_with_cancel(
        &self,
        kind: SectionKind,
        content: &SectionContent,
        context: &OptimizationContext,
        cancel: &CancellationToken,
    ) -> OptimizationOutcome {
        // Nothing to rewrite: no backend call at all.
        if is_blank(kind, content) {
            return OptimizationOutcome::original(fallback_value(kind, content));
        }

        match self.attempt(kind, content, context, cancel).await {
            Ok(value) => OptimizationOutcome::optimized(value),
            Err(failure) => {
                warn!(kind = ?kind, reason = %failure, "Section optimization fell back");
                fallback(kind, content, context, &failure)
            }
        }
    }

    async fn attempt(
        &self,
        kind: SectionKind,
        content: &SectionContent,
        context: &OptimizationContext,
        cancel: &CancellationToken,
    ) -> Result<SectionContent, SectionFailure> {
        let prompt = build_prompt(kind, content, context)?;
        debug!(kind = ?kind, prompt_chars = prompt.len(), "Invoking backend");

        let raw = self.invoke(&prompt, cancel).await?;

        match kind {
            SectionKind::Summary | SectionKind::ProjectDescription => {
                Ok(SectionContent::Text(extract_text(&raw)?))
            }
            SectionKind::ExperienceBullets => {
                let bullets: Vec<String> = extract_array(&raw)?
                    .into_iter()
                    .map(|b| b.trim().to_string())
                    .filter(|b| !b.is_empty())
                    .collect();
                if bullets.is_empty() {
                    return Err(ExtractionError::Empty.into());
                }
                Ok(SectionContent::List(bullets))
            }
            SectionKind::SkillSuggestions => {
                let suggested = extract_array(&raw)?;
                Ok(SectionContent::List(dedupe_skills(
                    suggested,
                    &context.existing_skills,
                )))
            }
        }
    }

    async fn invoke(&self, prompt: &str, cancel: &CancellationToken) -> Result<String, LlmError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(LlmError::Cancelled),
            result = tokio::time::timeout(self.call_timeout, self.backend.generate(prompt)) => {
                result.unwrap_or(Err(LlmError::Timeout))
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Prompt construction
// ────────────────────────────────────────────────────────────────────────────

fn build_prompt(
    kind: SectionKind,
    content: &SectionContent,
    context: &OptimizationContext,
) -> Result<String, SectionFailure> {
    let role_line = context
        .target_role
        .as_deref()
        .map(|r| format!("Target role: {r}."))
        .unwrap_or_default();
    let skills = join_or(&context.existing_skills, "none listed");
    let experience_count = context.experience_count.to_string();
    let technologies = join_or(&context.technologies, "not specified");
    let positions = join_or(&context.positions, "none listed");

    let prompt = match (kind, content) {
        (SectionKind::Summary, SectionContent::Text(summary)) => fill_template(
            SUMMARY_PROMPT_TEMPLATE,
            &[
                ("role_line", role_line.as_str()),
                ("experience_count", experience_count.as_str()),
                ("skills", skills.as_str()),
                ("factuality", FACTUALITY_INSTRUCTION),
                ("summary", summary.trim()),
                ("format", PLAIN_TEXT_INSTRUCTION),
            ],
        ),
        (SectionKind::ExperienceBullets, SectionContent::List(bullets)) => {
            let bullets = bullets
                .iter()
                .map(|b| format!("- {}", b.trim()))
                .collect::<Vec<_>>()
                .join("\n");
            fill_template(
                EXPERIENCE_PROMPT_TEMPLATE,
                &[
                    ("position", context.title.as_deref().unwrap_or("Unknown")),
                    ("company", context.company.as_deref().unwrap_or("Unknown")),
                    ("role_line", role_line.as_str()),
                    ("factuality", FACTUALITY_INSTRUCTION),
                    ("bullets", bullets.as_str()),
                    ("format", JSON_ARRAY_INSTRUCTION),
                ],
            )
        }
        (SectionKind::ProjectDescription, SectionContent::Text(description)) => fill_template(
            PROJECT_PROMPT_TEMPLATE,
            &[
                ("name", context.title.as_deref().unwrap_or("Untitled")),
                ("technologies", technologies.as_str()),
                ("role_line", role_line.as_str()),
                ("factuality", FACTUALITY_INSTRUCTION),
                ("description", description.trim()),
                ("format", PLAIN_TEXT_INSTRUCTION),
            ],
        ),
        (SectionKind::SkillSuggestions, SectionContent::List(_)) => fill_template(
            SKILLS_PROMPT_TEMPLATE,
            &[
                ("role_line", role_line.as_str()),
                ("positions", positions.as_str()),
                ("skills", skills.as_str()),
                ("format", JSON_ARRAY_INSTRUCTION),
            ],
        ),
        (kind @ (SectionKind::Summary | SectionKind::ProjectDescription), _) => {
            return Err(SectionFailure::Shape(kind, "text"))
        }
        (kind, _) => return Err(SectionFailure::Shape(kind, "list")),
    };

    Ok(prompt)
}

fn join_or(items: &[String], empty: &str) -> String {
    if items.is_empty() {
        empty.to_string()
    } else {
        items.join(", ")
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Fallbacks
// ────────────────────────────────────────────────────────────────────────────

fn is_blank(kind: SectionKind, content: &SectionContent) -> bool {
    match (kind, content) {
        // Skill suggestions are still worth asking for with no skills listed.
        (SectionKind::SkillSuggestions, _) => false,
        (_, SectionContent::Text(t)) => t.trim().is_empty(),
        (_, SectionContent::List(items)) => items.iter().all(|i| i.trim().is_empty()),
    }
}

fn fallback_value(kind: SectionKind, content: &SectionContent) -> SectionContent {
    match kind {
        SectionKind::SkillSuggestions => SectionContent::List(Vec::new()),
        _ => content.clone(),
    }
}

fn fallback(
    kind: SectionKind,
    content: &SectionContent,
    context: &OptimizationContext,
    failure: &SectionFailure,
) -> OptimizationOutcome {
    let (value, status) = match (kind, content) {
        (SectionKind::Summary, SectionContent::Text(summary)) => {
            match enhance_short_summary(summary, context.target_role.as_deref()) {
                Some(enhanced) => (
                    SectionContent::Text(enhanced),
                    OptimizationStatus::FallbackHeuristic,
                ),
                None => (fallback_value(kind, content), OptimizationStatus::FallbackOriginal),
            }
        }
        _ => (fallback_value(kind, content), OptimizationStatus::FallbackOriginal),
    };

    OptimizationOutcome {
        value,
        status,
        failure: Some(failure.to_string()),
        retryable: failure.is_retryable(),
    }
}

/// Offline touch-up for a present-but-short summary: capitalised, terminated
/// with a period, and naming the target role when it is not mentioned yet.
fn enhance_short_summary(summary: &str, target_role: Option<&str>) -> Option<String> {
    let trimmed = summary.trim();
    if trimmed.is_empty() || trimmed.chars().count() >= SHORT_SUMMARY_CHARS {
        return None;
    }

    let mut chars = trimmed.chars();
    let mut enhanced: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => return None,
    };
    if !enhanced.ends_with(['.', '!', '?']) {
        enhanced.push('.');
    }

    if let Some(role) = target_role {
        if !enhanced.to_lowercase().contains(&role.to_lowercase()) {
            enhanced.push_str(&format!(" Targeting {role} roles."));
        }
    }

    Some(enhanced)
}

/// Drops blanks, skills the candidate already lists, and repeats (all
/// case-insensitive), then caps the list.
fn dedupe_skills(suggested: Vec<String>, existing: &[String]) -> Vec<String> {
    let mut seen: HashSet<String> = existing.iter().map(|s| s.trim().to_lowercase()).collect();

    suggested
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && seen.insert(s.to_lowercase()))
        .take(MAX_SUGGESTED_SKILLS)
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimizer::testing::StubBackend;

    fn optimizer(backend: StubBackend) -> (SectionOptimizer, Arc<StubBackend>) {
        let backend = Arc::new(backend);
        (
            SectionOptimizer::new(backend.clone(), Duration::from_secs(5)),
            backend,
        )
    }

    fn text(s: &str) -> SectionContent {
        SectionContent::Text(s.to_string())
    }

    fn list(items: &[&str]) -> SectionContent {
        SectionContent::List(items.iter().map(|s| s.to_string()).collect())
    }

    #[tokio::test]
    async fn test_short_summary_gets_heuristic_when_backend_fails() {
        let (opt, _) = optimizer(StubBackend::failing(LlmError::Network("down".into())));
        let outcome = opt
            .optimize_section(SectionKind::Summary, &text("short"), &OptimizationContext::default())
            .await;

        assert_eq!(outcome.status, OptimizationStatus::FallbackHeuristic);
        let value = outcome.into_text().unwrap();
        assert_eq!(value, "Short.");
    }

    #[tokio::test]
    async fn test_heuristic_mentions_missing_target_role() {
        let (opt, _) = optimizer(StubBackend::failing(LlmError::Timeout));
        let context = OptimizationContext {
            target_role: Some("Data Engineer".to_string()),
            ..Default::default()
        };
        let outcome = opt
            .optimize_section(SectionKind::Summary, &text("i build pipelines"), &context)
            .await;

        assert_eq!(
            outcome.into_text().unwrap(),
            "I build pipelines. Targeting Data Engineer roles."
        );
    }

    #[tokio::test]
    async fn test_long_summary_falls_back_to_original() {
        let original = "Backend engineer with eight years of experience building payment systems";
        let (opt, _) = optimizer(StubBackend::failing(LlmError::QuotaExceeded("quota".into())));
        let outcome = opt
            .optimize_section(SectionKind::Summary, &text(original), &OptimizationContext::default())
            .await;

        assert_eq!(outcome.status, OptimizationStatus::FallbackOriginal);
        assert!(outcome.failed());
        assert_eq!(outcome.into_text().unwrap(), original);
    }

    #[tokio::test]
    async fn test_summary_is_trimmed_on_success() {
        let (opt, backend) = optimizer(StubBackend::always("  Polished summary.  \n"));
        let outcome = opt
            .optimize_section(SectionKind::Summary, &text("draft"), &OptimizationContext::default())
            .await;

        assert!(outcome.is_optimized());
        assert_eq!(outcome.into_text().unwrap(), "Polished summary.");
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_summary_skips_backend() {
        let (opt, backend) = optimizer(StubBackend::always("never used"));
        let outcome = opt
            .optimize_section(SectionKind::Summary, &text("   "), &OptimizationContext::default())
            .await;

        assert_eq!(outcome.status, OptimizationStatus::FallbackOriginal);
        assert!(!outcome.failed());
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_bullets_parsed_from_fenced_response() {
        let (opt, _) = optimizer(StubBackend::always(
            "Here you go:\n```json\n[\"Led the migration\", \" Cut costs 20% \"]\n```",
        ));
        let outcome = opt
            .optimize_section(
                SectionKind::ExperienceBullets,
                &list(&["did migration", "saved money"]),
                &OptimizationContext::default(),
            )
            .await;

        assert!(outcome.is_optimized());
        assert_eq!(
            outcome.into_list().unwrap(),
            vec!["Led the migration", "Cut costs 20%"]
        );
    }

    #[tokio::test]
    async fn test_malformed_bullets_fall_back_to_original() {
        let original = list(&["did migration"]);
        let (opt, _) = optimizer(StubBackend::always("I could not do that."));
        let outcome = opt
            .optimize_section(
                SectionKind::ExperienceBullets,
                &original,
                &OptimizationContext::default(),
            )
            .await;

        assert_eq!(outcome.status, OptimizationStatus::FallbackOriginal);
        assert_eq!(outcome.value, original);
    }

    #[tokio::test]
    async fn test_empty_bullet_array_counts_as_failure() {
        let original = list(&["did migration"]);
        let (opt, _) = optimizer(StubBackend::always("[]"));
        let outcome = opt
            .optimize_section(
                SectionKind::ExperienceBullets,
                &original,
                &OptimizationContext::default(),
            )
            .await;

        assert_eq!(outcome.status, OptimizationStatus::FallbackOriginal);
        assert_eq!(outcome.value, original);
    }

    #[tokio::test]
    async fn test_skill_suggestions_fall_back_to_empty() {
        let (opt, _) = optimizer(StubBackend::failing(LlmError::Service {
            status: 500,
            message: "boom".into(),
        }));
        let outcome = opt
            .optimize_section(
                SectionKind::SkillSuggestions,
                &list(&["Rust"]),
                &OptimizationContext::default(),
            )
            .await;

        assert_eq!(outcome.status, OptimizationStatus::FallbackOriginal);
        assert_eq!(outcome.into_list().unwrap(), Vec::<String>::new());
    }

    #[tokio::test]
    async fn test_skill_suggestions_exclude_existing_and_repeats() {
        let (opt, _) = optimizer(StubBackend::always(
            "[\"rust\", \"Docker\", \"docker\", \" \", \"Terraform\"]",
        ));
        let context = OptimizationContext {
            existing_skills: vec!["Rust".to_string()],
            ..Default::default()
        };
        let outcome = opt
            .optimize_section(SectionKind::SkillSuggestions, &list(&["Rust"]), &context)
            .await;

        assert_eq!(outcome.into_list().unwrap(), vec!["Docker", "Terraform"]);
    }

    #[test]
    fn test_dedupe_caps_suggestions() {
        let many: Vec<String> = (0..15).map(|i| format!("Skill{i}")).collect();
        assert_eq!(dedupe_skills(many, &[]).len(), MAX_SUGGESTED_SKILLS);
    }

    #[tokio::test]
    async fn test_project_description_falls_back_to_original() {
        let (opt, _) = optimizer(StubBackend::failing(LlmError::EmptyContent));
        let outcome = opt
            .optimize_section(
                SectionKind::ProjectDescription,
                &text("a todo app"),
                &OptimizationContext::default(),
            )
            .await;

        // No heuristic for projects, even when short.
        assert_eq!(outcome.status, OptimizationStatus::FallbackOriginal);
        assert_eq!(outcome.into_text().unwrap(), "a todo app");
    }

    #[tokio::test]
    async fn test_shape_mismatch_falls_back_without_calling_backend() {
        let (opt, backend) = optimizer(StubBackend::always("[\"x\"]"));
        let original = text("not a list");
        let outcome = opt
            .optimize_section(
                SectionKind::ExperienceBullets,
                &original,
                &OptimizationContext::default(),
            )
            .await;

        assert_eq!(outcome.status, OptimizationStatus::FallbackOriginal);
        assert!(outcome.failed());
        assert!(!outcome.retryable());
        assert_eq!(outcome.value, original);
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_backend_failure_is_retryable() {
        let (opt, _) = optimizer(StubBackend::failing(LlmError::Timeout));
        let outcome = opt
            .optimize_section(
                SectionKind::ProjectDescription,
                &text("a compiler"),
                &OptimizationContext::default(),
            )
            .await;

        assert!(outcome.retryable());
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_backend_times_out_into_fallback() {
        let backend = Arc::new(StubBackend::always("late").with_delay(Duration::from_secs(60)));
        let opt = SectionOptimizer::new(backend, Duration::from_secs(1));
        let outcome = opt
            .optimize_section(
                SectionKind::ProjectDescription,
                &text("a compiler"),
                &OptimizationContext::default(),
            )
            .await;

        assert_eq!(outcome.status, OptimizationStatus::FallbackOriginal);
        assert_eq!(outcome.failure.as_deref(), Some("backend call timed out"));
    }

    #[tokio::test]
    async fn test_cancelled_call_falls_back() {
        let (opt, _) = optimizer(StubBackend::always("fine"));
        let cancel = CancellationToken::new();
        cancel.cancel();
        let outcome = opt
            .optimize_section_with_cancel(
                SectionKind::ProjectDescription,
                &text("a compiler"),
                &OptimizationContext::default(),
                &cancel,
            )
            .await;

        assert_eq!(outcome.status, OptimizationStatus::FallbackOriginal);
        assert_eq!(outcome.into_text().unwrap(), "a compiler");
    }

    #[test]
    fn test_prompt_construction_is_deterministic() {
        let context = OptimizationContext {
            target_role: Some("SRE".to_string()),
            title: Some("Engineer".to_string()),
            company: Some("Acme".to_string()),
            ..Default::default()
        };
        let content = list(&["kept servers up"]);
        let a = build_prompt(SectionKind::ExperienceBullets, &content, &context).unwrap();
        let b = build_prompt(SectionKind::ExperienceBullets, &content, &context).unwrap();

        assert_eq!(a, b);
        assert!(a.contains("\"Engineer\" at \"Acme\""));
        assert!(a.contains("Target role: SRE."));
        assert!(a.contains("- kept servers up"));
    }

    #[test]
    fn test_prompt_embeds_user_text_verbatim() {
        let context = OptimizationContext {
            target_role: Some("{summary} lead".to_string()),
            ..Default::default()
        };
        let prompt = build_prompt(
            SectionKind::Summary,
            &text("Expert in {format} strings"),
            &context,
        )
        .unwrap();

        assert!(prompt.contains("ORIGINAL SUMMARY:\nExpert in {format} strings\n"));
        assert!(prompt.contains("Target role: {summary} lead."));
        assert_eq!(prompt.matches(PLAIN_TEXT_INSTRUCTION).count(), 1);
        assert_eq!(prompt.matches("Expert in").count(), 1);
    }

    #[test]
    fn test_position_with_braces_keeps_company() {
        let context = OptimizationContext {
            title: Some("Lead {company} engineer".to_string()),
            company: Some("Acme".to_string()),
            ..Default::default()
        };
        let prompt =
            build_prompt(SectionKind::ExperienceBullets, &list(&["ran builds"]), &context)
                .unwrap();

        assert!(prompt.contains("\"Lead {company} engineer\" at \"Acme\""));
    }

    #[test]
    fn test_context_for_document_collects_hints() {
        let doc = ResumeDocument {
            experience: vec![ExperienceEntry {
                position: "Engineer".to_string(),
                company: "Acme".to_string(),
                description: vec![],
            }],
            ..Default::default()
        };
        let context = OptimizationContext::for_document(&doc, Some("  "));
        assert_eq!(context.target_role, None);
        assert_eq!(context.experience_count, 1);
        assert_eq!(context.positions, vec!["Engineer"]);
    }
}
