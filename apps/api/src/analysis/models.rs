use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What the caller submitted for analysis. Immutable once built.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisInput {
    pub resume_text: String,
    #[serde(default)]
    pub job_description: Option<String>,
}

impl AnalysisInput {
    pub fn new(resume_text: impl Into<String>, job_description: Option<String>) -> Self {
        Self {
            resume_text: resume_text.into(),
            job_description,
        }
    }

    /// The job description, if one was supplied and is not blank.
    pub fn job_description(&self) -> Option<&str> {
        self.job_description
            .as_deref()
            .map(str::trim)
            .filter(|jd| !jd.is_empty())
    }

    pub fn is_job_targeted(&self) -> bool {
        self.job_description().is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub linkedin: String,
    pub github: String,
    pub website: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub company: String,
    pub position: String,
    pub start_date: String,
    pub end_date: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub institution: String,
    pub degree: String,
    pub graduation_date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillGroup {
    pub category: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectEntry {
    pub name: String,
    pub description: String,
    pub technologies: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CertificationEntry {
    pub name: String,
    pub issuer: String,
    pub date: String,
}

/// Structured candidate data mined from the raw resume text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedContent {
    pub personal_info: PersonalInfo,
    pub summary: String,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub skills: Vec<SkillGroup>,
    pub projects: Vec<ProjectEntry>,
    pub certifications: Vec<CertificationEntry>,
}

impl ExtractedContent {
    /// All skill names across groups, in group order.
    pub fn skill_names(&self) -> impl Iterator<Item = &str> {
        self.skills
            .iter()
            .flat_map(|group| group.items.iter().map(String::as_str))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Keywords {
    pub found: Vec<String>,
    pub missing: Vec<String>,
    pub suggested: Vec<String>,
}

/// Categorized feedback. This is the canonical copy; `DetailedAnalysis` is a view of it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Suggestions {
    pub critical: Vec<String>,
    pub recommended: Vec<String>,
    pub excellent: Vec<String>,
}

/// The same feedback as `Suggestions`, under the field names older consumers expect.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetailedAnalysis {
    pub critical_improvements: Vec<String>,
    pub recommended_improvements: Vec<String>,
    pub strengths: Vec<String>,
}

impl From<&Suggestions> for DetailedAnalysis {
    fn from(suggestions: &Suggestions) -> Self {
        Self {
            critical_improvements: suggestions.critical.clone(),
            recommended_improvements: suggestions.recommended.clone(),
            strengths: suggestions.excellent.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionFeedback {
    pub score: u8,
    pub feedback: String,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobMatching {
    pub match_percentage: u8,
    pub missing_skills: Vec<String>,
    pub aligned_experience: Vec<String>,
    pub recommended_keywords: Vec<String>,
}

/// The structured output of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub overall_score: u8,
    pub ats_score: u8,
    pub readability_score: u8,
    pub keyword_score: u8,
    /// Only present when the analysis was run against a job description.
    pub job_match_score: Option<u8>,
    pub extracted_content: ExtractedContent,
    pub keywords: Keywords,
    pub suggestions: Suggestions,
    #[serde(default)]
    pub section_analysis: BTreeMap<String, SectionFeedback>,
    #[serde(default)]
    pub job_matching: Option<JobMatching>,
    pub analyzed_at: DateTime<Utc>,
}

impl AnalysisResult {
    pub fn detailed_analysis(&self) -> DetailedAnalysis {
        DetailedAnalysis::from(&self.suggestions)
    }
}
