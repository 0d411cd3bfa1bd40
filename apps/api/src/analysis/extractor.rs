//! Field Extractor — mines contact details, summary, date ranges and skills out of raw resume text.
//!
//! Best-effort pattern matching only. Nothing here returns an error: a pattern that
//! does not match leaves its field empty so the editing form can always render.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::analysis::models::{
    CertificationEntry, EducationEntry, ExperienceEntry, ExtractedContent, PersonalInfo,
    SkillGroup,
};

pub const NAME_PLACEHOLDER: &str = "Name not found";
pub const SKILL_CATEGORY: &str = "Technical Skills";

const MAX_SKILLS: usize = 10;
const MAX_EDUCATION: usize = 5;
const MAX_CERTIFICATIONS: usize = 5;

/// Heading words that introduce the summary, in priority order.
const SUMMARY_HEADINGS: &[&str] = &["summary", "objective", "profile"];
/// How many lines after a summary heading are considered.
const SUMMARY_WINDOW: usize = 5;
const SUMMARY_MAX_LINES: usize = 3;

/// Fixed skill vocabulary, matched case-insensitively anywhere in the document.
/// Order here is the order skills are reported in.
pub const SKILL_VOCABULARY: &[&str] = &[
    "JavaScript",
    "TypeScript",
    "Python",
    "Java",
    "Rust",
    "C++",
    "C#",
    "Golang",
    "Ruby",
    "PHP",
    "Swift",
    "Kotlin",
    "React",
    "Angular",
    "Vue",
    "Node.js",
    "Django",
    "Flask",
    "Spring",
    "HTML",
    "CSS",
    "SQL",
    "PostgreSQL",
    "MySQL",
    "MongoDB",
    "Redis",
    "GraphQL",
    "REST",
    "AWS",
    "Azure",
    "GCP",
    "Docker",
    "Kubernetes",
    "Terraform",
    "Git",
    "Linux",
    "CI/CD",
    "Machine Learning",
    "Data Analysis",
    "Excel",
    "Agile",
    "Scrum",
    "Project Management",
    "Leadership",
    "Communication",
    "Teamwork",
    "Problem Solving",
];

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap());

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\+?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4,6}").unwrap());

static DATE_RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(\d{4})\s*[-–—]\s*(\d{4}|present|current)\b").unwrap()
});

static LINKEDIN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:https?://)?(?:www\.)?linkedin\.com/in/[A-Za-z0-9_-]+/?").unwrap()
});

static GITHUB_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:https?://)?(?:www\.)?github\.com/[A-Za-z0-9_-]+/?").unwrap());

static URL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://[^\s,;)]+").unwrap());

// "Austin, TX" / "San Francisco, CA"
static LOCATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([A-Z][a-z]+(?: [A-Z][a-z]+)*, [A-Z]{2})\b").unwrap());

static DEGREE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(bachelor(?:'s)?|master(?:'s)?|ph\.?d|mba|diploma|associate degree)\b")
        .unwrap()
});

static GRAD_YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(19|20)\d{2}\b").unwrap());

static CERTIFICATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bcertified\b|\bcertificate\b|\bcertification:").unwrap());

static INSTITUTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"((?:[A-Z][A-Za-z&.]*\s)*(?:University|College|Institute|School)(?:\sof(?:\s[A-Z][A-Za-z&.]*)+)?)")
        .unwrap()
});

/// Everything the extractor could find in one resume.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedFields {
    pub personal_info: PersonalInfo,
    pub summary: String,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub skills: Vec<String>,
    pub certifications: Vec<CertificationEntry>,
}

impl ExtractedFields {
    pub fn into_content(self) -> ExtractedContent {
        let skills = if self.skills.is_empty() {
            vec![]
        } else {
            vec![SkillGroup {
                category: SKILL_CATEGORY.to_string(),
                items: self.skills,
            }]
        };

        ExtractedContent {
            personal_info: self.personal_info,
            summary: self.summary,
            experience: self.experience,
            education: self.education,
            skills,
            projects: vec![],
            certifications: self.certifications,
        }
    }
}

/// Runs every extraction rule over the resume text.
pub fn extract_fields(text: &str) -> ExtractedFields {
    let lines: Vec<&str> = text.lines().collect();
    let linkedin = first_match(&LINKEDIN_RE, text);
    let github = first_match(&GITHUB_RE, text);
    let website = extract_website(text);

    ExtractedFields {
        personal_info: PersonalInfo {
            name: extract_name(&lines),
            email: first_match(&EMAIL_RE, text),
            phone: first_match(&PHONE_RE, text),
            location: first_match(&LOCATION_RE, text),
            linkedin,
            github,
            website,
        },
        summary: extract_summary(&lines),
        experience: extract_experience(text),
        education: extract_education(&lines),
        skills: detect_skills(text),
        certifications: extract_certifications(&lines),
    }
}

fn first_match(re: &Regex, text: &str) -> String {
    re.find(text)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// First non-blank line, kept verbatim including surrounding whitespace.
pub fn extract_name(lines: &[&str]) -> String {
    lines
        .iter()
        .find(|line| !line.trim().is_empty())
        .map(|line| line.to_string())
        .unwrap_or_else(|| NAME_PLACEHOLDER.to_string())
}

pub fn extract_summary(lines: &[&str]) -> String {
    for heading in SUMMARY_HEADINGS {
        let Some(anchor) = lines
            .iter()
            .position(|line| line.to_lowercase().contains(heading))
        else {
            continue;
        };

        return lines
            .iter()
            .skip(anchor + 1)
            .take(SUMMARY_WINDOW)
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .take(SUMMARY_MAX_LINES)
            .collect::<Vec<_>>()
            .join(" ");
    }
    String::new()
}

/// One entry per `YYYY - YYYY|present|current` range. Employers are not segmented,
/// so company and position are numbered placeholders.
pub fn extract_experience(text: &str) -> Vec<ExperienceEntry> {
    DATE_RANGE_RE
        .captures_iter(text)
        .enumerate()
        .map(|(i, caps)| ExperienceEntry {
            company: format!("Company {}", i + 1),
            position: format!("Position {}", i + 1),
            start_date: caps[1].to_string(),
            end_date: caps[2].to_string(),
            description: String::new(),
        })
        .collect()
}

pub fn detect_skills(text: &str) -> Vec<String> {
    let text_lower = text.to_lowercase();
    SKILL_VOCABULARY
        .iter()
        .filter(|skill| text_lower.contains(&skill.to_lowercase()))
        .take(MAX_SKILLS)
        .map(|skill| skill.to_string())
        .collect()
}

fn extract_website(text: &str) -> String {
    URL_RE
        .find_iter(text)
        .map(|m| m.as_str())
        .find(|url| {
            let lower = url.to_lowercase();
            !lower.contains("linkedin.com") && !lower.contains("github.com")
        })
        .map(String::from)
        .unwrap_or_default()
}

fn extract_education(lines: &[&str]) -> Vec<EducationEntry> {
    lines
        .iter()
        .map(|line| line.trim())
        .filter(|line| DEGREE_RE.is_match(line))
        .take(MAX_EDUCATION)
        .map(|line| EducationEntry {
            institution: INSTITUTION_RE
                .find(line)
                .map(|m| m.as_str().trim().to_string())
                .unwrap_or_default(),
            degree: line.to_string(),
            graduation_date: GRAD_YEAR_RE
                .find_iter(line)
                .last()
                .map(|m| m.as_str().to_string())
                .unwrap_or_default(),
        })
        .collect()
}

fn extract_certifications(lines: &[&str]) -> Vec<CertificationEntry> {
    lines
        .iter()
        .map(|line| line.trim().trim_start_matches(['-', '•', '*']).trim())
        .filter(|line| CERTIFICATION_RE.is_match(line))
        .take(MAX_CERTIFICATIONS)
        .map(|line| CertificationEntry {
            name: line.to_string(),
            issuer: String::new(),
            date: GRAD_YEAR_RE
                .find(line)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default(),
        })
        .collect()
}
