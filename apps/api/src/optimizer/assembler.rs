//! Result Assembler — packages the merged document, score, suggestions, and
//! improvement notes into the caller-facing result.

use std::collections::HashSet;

use serde::Serialize;

use crate::models::resume::ResumeDocument;
use crate::optimizer::ats::score_resume;
use crate::optimizer::section::{OptimizationOutcome, OptimizationStatus, SectionKind};

pub const SUMMARY_IMPROVEMENT: &str = "Enhanced professional summary";
pub const BULLETS_IMPROVEMENT: &str = "Improved bullet points";
pub const PROJECTS_IMPROVEMENT: &str = "Refined project descriptions";
pub const ATS_IMPROVEMENT: &str = "Optimized for ATS scanning";
pub const SKILLS_IMPROVEMENT: &str = "Added relevant technical skills";

/// How the `improvements` list is produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImprovementReporting {
    /// Every category attempted, whether or not the backend delivered.
    #[default]
    Attempted,
    /// Only categories where at least one section actually changed.
    Applied,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationResult {
    pub optimized_data: ResumeDocument,
    pub ats_score: u32,
    pub suggested_skills: Vec<String>,
    pub improvements: Vec<String>,
    pub sections_optimized: usize,
    pub sections_fallen_back: usize,
}

/// Running count of section outcomes for one pipeline run.
#[derive(Debug, Clone, Default)]
pub struct SectionTally {
    changed: HashSet<SectionKind>,
    optimized: usize,
    fallen_back: usize,
}

impl SectionTally {
    pub fn record(&mut self, kind: SectionKind, outcome: &OptimizationOutcome) {
        if outcome.is_optimized() {
            self.optimized += 1;
        } else {
            self.fallen_back += 1;
        }
        // Suggestions are returned on the side and never touch the document.
        if kind != SectionKind::SkillSuggestions
            && outcome.status != OptimizationStatus::FallbackOriginal
        {
            self.changed.insert(kind);
        }
    }

    pub fn optimized(&self) -> usize {
        self.optimized
    }

    pub fn fallen_back(&self) -> usize {
        self.fallen_back
    }

    fn has_changed(&self, kind: SectionKind) -> bool {
        self.changed.contains(&kind)
    }
}

/// Scores the merged document and builds the final result.
pub fn assemble(
    optimized_data: ResumeDocument,
    suggested_skills: Vec<String>,
    tally: &SectionTally,
    reporting: ImprovementReporting,
) -> OptimizationResult {
    let ats_score = score_resume(&optimized_data);
    let improvements = improvements(tally, !suggested_skills.is_empty(), reporting);

    OptimizationResult {
        optimized_data,
        ats_score,
        suggested_skills,
        improvements,
        sections_optimized: tally.optimized(),
        sections_fallen_back: tally.fallen_back(),
    }
}

fn improvements(
    tally: &SectionTally,
    has_suggestions: bool,
    reporting: ImprovementReporting,
) -> Vec<String> {
    let applied = [
        (SUMMARY_IMPROVEMENT, tally.has_changed(SectionKind::Summary)),
        (BULLETS_IMPROVEMENT, tally.has_changed(SectionKind::ExperienceBullets)),
        (PROJECTS_IMPROVEMENT, tally.has_changed(SectionKind::ProjectDescription)),
        (ATS_IMPROVEMENT, !tally.changed.is_empty()),
        (SKILLS_IMPROVEMENT, has_suggestions),
    ];

    applied
        .into_iter()
        .filter(|(_, changed)| reporting == ImprovementReporting::Attempted || *changed)
        .map(|(text, _)| text.to_string())
        .collect()
}
