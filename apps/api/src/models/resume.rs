use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A structured resume as supplied by the caller.
///
/// The optimizer never mutates the caller's copy: the pipeline clones the
/// document, replaces only the targeted fields, and returns the clone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeDocument {
    pub personal_info: PersonalInfo,
    pub experience: Vec<ExperienceEntry>,
    pub projects: Vec<ProjectEntry>,
    pub skills: Skills,
    pub education: Vec<EducationEntry>,
    /// Passed through untouched; never scored or rewritten.
    pub certifications: Vec<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub summary: Option<String>,
    pub links: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExperienceEntry {
    pub position: String,
    pub company: String,
    /// User-facing bullet points, in display order.
    pub description: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectEntry {
    pub name: String,
    pub description: String,
    pub technologies: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Skills {
    pub technical: Vec<String>,
    pub tools: Vec<String>,
    pub soft: Vec<String>,
}

impl Skills {
    /// Iterates every skill label across all three buckets.
    pub fn all(&self) -> impl Iterator<Item = &String> {
        self.technical
            .iter()
            .chain(self.tools.iter())
            .chain(self.soft.iter())
    }

    /// Count used by the ATS scorer: technical plus tools, soft skills excluded.
    pub fn hard_skill_count(&self) -> usize {
        self.technical.len() + self.tools.len()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EducationEntry {
    pub institution: String,
    pub degree: String,
    pub field: Option<String>,
    pub graduation_date: Option<String>,
}

impl PersonalInfo {
    /// True when the field holds something other than whitespace.
    pub fn has_email(&self) -> bool {
        is_present(self.email.as_deref())
    }

    pub fn has_phone(&self) -> bool {
        is_present(self.phone.as_deref())
    }
}

fn is_present(value: Option<&str>) -> bool {
    value.map(|v| !v.trim().is_empty()).unwrap_or(false)
}
