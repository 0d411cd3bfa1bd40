//! Editable-Resume Projector — maps extracted content onto the form-bound document shape.
//!
//! Total and pure: no validation, every field defaults. Entry ids are positional
//! (`exp-1`, `edu-1`, ...) so the same content always projects to the same document.

use serde::{Deserialize, Serialize};

use crate::analysis::models::ExtractedContent;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditablePersonalInfo {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub linkedin: String,
    pub github: String,
    pub website: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditableExperience {
    pub id: String,
    pub company: String,
    pub position: String,
    pub start_date: String,
    pub end_date: String,
    pub current: bool,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditableEducation {
    pub id: String,
    pub institution: String,
    pub degree: String,
    pub graduation_date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditableSkill {
    pub id: String,
    pub name: String,
    pub category: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditableProject {
    pub id: String,
    pub name: String,
    pub description: String,
    pub technologies: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditableCertification {
    pub id: String,
    pub name: String,
    pub issuer: String,
    pub date: String,
}

/// The document the editing UI binds its inputs to. Replaced wholesale on every analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditableResume {
    pub personal_info: EditablePersonalInfo,
    pub summary: String,
    pub experiences: Vec<EditableExperience>,
    pub education: Vec<EditableEducation>,
    pub skills: Vec<EditableSkill>,
    pub projects: Vec<EditableProject>,
    pub certifications: Vec<EditableCertification>,
}

fn entry_id(prefix: &str, index: usize) -> String {
    format!("{prefix}-{}", index + 1)
}

fn is_ongoing(end_date: &str) -> bool {
    matches!(
        end_date.trim().to_lowercase().as_str(),
        "present" | "current"
    )
}

impl From<&ExtractedContent> for EditableResume {
    fn from(content: &ExtractedContent) -> Self {
        let info = &content.personal_info;

        let skills = content
            .skills
            .iter()
            .flat_map(|group| {
                group
                    .items
                    .iter()
                    .map(move |item| (group.category.as_str(), item.as_str()))
            })
            .enumerate()
            .map(|(i, (category, name))| EditableSkill {
                id: entry_id("skill", i),
                name: name.to_string(),
                category: category.to_string(),
            })
            .collect();

        EditableResume {
            personal_info: EditablePersonalInfo {
                full_name: info.name.clone(),
                email: info.email.clone(),
                phone: info.phone.clone(),
                location: info.location.clone(),
                linkedin: info.linkedin.clone(),
                github: info.github.clone(),
                website: info.website.clone(),
            },
            summary: content.summary.clone(),
            experiences: content
                .experience
                .iter()
                .enumerate()
                .map(|(i, exp)| EditableExperience {
                    id: entry_id("exp", i),
                    company: exp.company.clone(),
                    position: exp.position.clone(),
                    start_date: exp.start_date.clone(),
                    end_date: exp.end_date.clone(),
                    current: is_ongoing(&exp.end_date),
                    description: exp.description.clone(),
                })
                .collect(),
            education: content
                .education
                .iter()
                .enumerate()
                .map(|(i, edu)| EditableEducation {
                    id: entry_id("edu", i),
                    institution: edu.institution.clone(),
                    degree: edu.degree.clone(),
                    graduation_date: edu.graduation_date.clone(),
                })
                .collect(),
            skills,
            projects: content
                .projects
                .iter()
                .enumerate()
                .map(|(i, project)| EditableProject {
                    id: entry_id("proj", i),
                    name: project.name.clone(),
                    description: project.description.clone(),
                    technologies: project.technologies.clone(),
                })
                .collect(),
            certifications: content
                .certifications
                .iter()
                .enumerate()
                .map(|(i, cert)| EditableCertification {
                    id: entry_id("cert", i),
                    name: cert.name.clone(),
                    issuer: cert.issuer.clone(),
                    date: cert.date.clone(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::models::{ExperienceEntry, PersonalInfo, SkillGroup};

    fn sample_content() -> ExtractedContent {
        ExtractedContent {
            personal_info: PersonalInfo {
                name: "Jane Smith".to_string(),
                email: "jane@example.com".to_string(),
                ..Default::default()
            },
            summary: "Backend engineer.".to_string(),
            experience: vec![
                ExperienceEntry {
                    company: "Company 1".to_string(),
                    position: "Position 1".to_string(),
                    start_date: "2019".to_string(),
                    end_date: "Present".to_string(),
                    description: String::new(),
                },
                ExperienceEntry {
                    company: "Company 2".to_string(),
                    position: "Position 2".to_string(),
                    start_date: "2015".to_string(),
                    end_date: "2019".to_string(),
                    description: String::new(),
                },
            ],
            skills: vec![
                SkillGroup {
                    category: "Technical Skills".to_string(),
                    items: vec!["Rust".to_string(), "SQL".to_string()],
                },
                SkillGroup {
                    category: "Soft Skills".to_string(),
                    items: vec!["Leadership".to_string()],
                },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_personal_info_copied() {
        let resume = EditableResume::from(&sample_content());
        assert_eq!(resume.personal_info.full_name, "Jane Smith");
        assert_eq!(resume.personal_info.email, "jane@example.com");
        assert!(resume.personal_info.phone.is_empty());
        assert_eq!(resume.summary, "Backend engineer.");
    }

    #[test]
    fn test_current_flag_from_end_date() {
        let resume = EditableResume::from(&sample_content());
        assert!(resume.experiences[0].current);
        assert!(!resume.experiences[1].current);
    }

    #[test]
    fn test_ids_are_positional() {
        let resume = EditableResume::from(&sample_content());
        assert_eq!(resume.experiences[0].id, "exp-1");
        assert_eq!(resume.experiences[1].id, "exp-2");
        let skill_ids: Vec<&str> = resume.skills.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(skill_ids, vec!["skill-1", "skill-2", "skill-3"]);
    }

    #[test]
    fn test_skills_flattened_with_category() {
        let resume = EditableResume::from(&sample_content());
        assert_eq!(resume.skills[2].name, "Leadership");
        assert_eq!(resume.skills[2].category, "Soft Skills");
    }

    #[test]
    fn test_projection_is_stable() {
        let content = sample_content();
        assert_eq!(EditableResume::from(&content), EditableResume::from(&content));
    }

    #[test]
    fn test_empty_content_projects_to_empty_resume() {
        assert_eq!(
            EditableResume::from(&ExtractedContent::default()),
            EditableResume::default()
        );
    }
}
