//! ATS Scorer — fixed heuristic rules mapping a resume to a 0–100 score.
//!
//! Pure and deterministic: no I/O, no backend, no clock. Always evaluated on
//! the document as it stands after optimization.

use serde::Serialize;

use crate::models::resume::ResumeDocument;

const MAX_SCORE: u32 = 100;
const SUBSTANTIAL_SUMMARY_CHARS: usize = 50;
const DETAILED_ENTRY_BULLETS: usize = 3;
const SOME_HARD_SKILLS: usize = 5;
const MANY_HARD_SKILLS: usize = 10;

/// One scoring rule and what it contributed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AtsCheck {
    pub rule: &'static str,
    pub points: u32,
    pub passed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AtsReport {
    pub score: u32,
    pub checks: Vec<AtsCheck>,
}

type Rule = (&'static str, u32, fn(&ResumeDocument) -> bool);

const RULES: &[Rule] = &[
    ("Summary longer than 50 characters", 15, |d| {
        d.personal_info
            .summary
            .as_deref()
            .map(|s| s.chars().count() > SUBSTANTIAL_SUMMARY_CHARS)
            .unwrap_or(false)
    }),
    ("Work experience listed", 15, |d| !d.experience.is_empty()),
    ("An experience entry with at least 3 bullets", 10, |d| {
        d.experience
            .iter()
            .any(|e| e.description.len() >= DETAILED_ENTRY_BULLETS)
    }),
    ("Education listed", 15, |d| !d.education.is_empty()),
    ("At least 5 technical skills and tools", 10, |d| {
        d.skills.hard_skill_count() >= SOME_HARD_SKILLS
    }),
    ("At least 10 technical skills and tools", 10, |d| {
        d.skills.hard_skill_count() >= MANY_HARD_SKILLS
    }),
    ("Projects listed", 10, |d| !d.projects.is_empty()),
    ("A project with a description", 5, |d| {
        d.projects.iter().any(|p| !p.description.is_empty())
    }),
    ("Email present", 5, |d| d.personal_info.has_email()),
    ("Phone present", 5, |d| d.personal_info.has_phone()),
];

/// Scores `doc`, clamped to 100.
pub fn score_resume(doc: &ResumeDocument) -> u32 {
    ats_breakdown(doc).score
}

/// Evaluates every rule independently and reports each one.
pub fn ats_breakdown(doc: &ResumeDocument) -> AtsReport {
    let checks: Vec<AtsCheck> = RULES
        .iter()
        .map(|(rule, points, check)| {
            let passed = check(doc);
            AtsCheck {
                rule: *rule,
                points: if passed { *points } else { 0 },
                passed,
            }
        })
        .collect();

    let score = checks.iter().map(|c| c.points).sum::<u32>().min(MAX_SCORE);

    AtsReport { score, checks }
}
