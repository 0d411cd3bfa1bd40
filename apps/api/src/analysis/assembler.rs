//! Analysis Assembler — merges extractor, sectionizer and normalizer output into one `AnalysisResult`.
//!
//! Guarantees every feedback and keyword list is non-empty by injecting fixed fallback
//! entries. The only failure is a response that is not text at all; in that case no
//! partial result is produced.

use std::collections::BTreeMap;

use chrono::Utc;
use rand::Rng;
use thiserror::Error;
use tracing::debug;

use crate::analysis::extractor::{detect_skills, extract_fields, NAME_PLACEHOLDER};
use crate::analysis::models::{
    AnalysisInput, AnalysisResult, ExtractedContent, JobMatching, Keywords, SectionFeedback,
    Suggestions,
};
use crate::analysis::scores::{normalize_scores, ScoreFallback};
use crate::analysis::sectionizer::sectionize;

pub const CRITICAL_FALLBACK: &str = "Improve keyword optimization for better ATS compatibility";
pub const RECOMMENDED_FALLBACK: &str =
    "Add quantifiable achievements to demonstrate measurable impact";
pub const EXCELLENT_FALLBACK: &str = "Resume follows a clear, readable structure";
pub const FOUND_KEYWORD_FALLBACK: &str = "Relevant experience";

pub const MISSING_KEYWORD_FALLBACK: &[&str] = &[
    "Quantifiable achievements",
    "Industry-specific terminology",
    "Action verbs",
];

pub const SUGGESTED_KEYWORD_FALLBACK: &[&str] = &[
    "Cross-functional collaboration",
    "Process optimization",
    "Stakeholder communication",
];

/// Detected skills promoted to found keywords when the response listed none.
const FOUND_FROM_SKILLS: usize = 5;

#[derive(Debug, Error, PartialEq)]
pub enum AnalysisError {
    #[error("AI response is not valid text: {0}")]
    MalformedResponse(String),
}

/// Assembles an analysis with a thread-local RNG for score fallbacks.
pub fn analyze(
    input: &AnalysisInput,
    response: &str,
    fallback: ScoreFallback,
) -> Result<AnalysisResult, AnalysisError> {
    assemble(input, response, fallback, &mut rand::thread_rng())
}

pub fn assemble<R: Rng + ?Sized>(
    input: &AnalysisInput,
    response: &str,
    fallback: ScoreFallback,
    rng: &mut R,
) -> Result<AnalysisResult, AnalysisError> {
    check_text(response)?;

    let job_description = input.job_description();
    let fields = extract_fields(&input.resume_text);
    let detected_skills = fields.skills.clone();
    let sectionized = sectionize(response, job_description.is_some());
    let scores = normalize_scores(&sectionized.scores, fallback, rng);

    let suggestions = fill_suggestions(sectionized.suggestions);
    let keywords = fill_keywords(sectionized.keywords, &detected_skills);
    let extracted_content = fields.into_content();
    let section_analysis = analyze_sections(&extracted_content);

    let job_matching = job_description.map(|jd| {
        build_job_matching(
            jd,
            &input.resume_text,
            sectionized.scores.job_match,
            scores.keyword,
            &keywords.suggested,
        )
    });

    Ok(AnalysisResult {
        overall_score: scores.overall,
        ats_score: scores.ats,
        readability_score: scores.readability,
        keyword_score: scores.keyword,
        job_match_score: job_matching.as_ref().map(|m| m.match_percentage),
        extracted_content,
        keywords,
        suggestions,
        section_analysis,
        job_matching,
        analyzed_at: Utc::now(),
    })
}

fn check_text(response: &str) -> Result<(), AnalysisError> {
    match response
        .char_indices()
        .find(|(_, c)| c.is_control() && !c.is_whitespace())
    {
        Some((offset, c)) => Err(AnalysisError::MalformedResponse(format!(
            "control character U+{:04X} at byte {offset}",
            c as u32
        ))),
        None => Ok(()),
    }
}

fn fill_list(list: &mut Vec<String>, fallback: &[&str], family: &str) {
    if list.is_empty() {
        debug!("No {family} entries in AI response, using fallback");
        list.extend(fallback.iter().map(|s| s.to_string()));
    }
}

fn fill_suggestions(mut suggestions: Suggestions) -> Suggestions {
    fill_list(&mut suggestions.critical, &[CRITICAL_FALLBACK], "critical");
    fill_list(&mut suggestions.recommended, &[RECOMMENDED_FALLBACK], "recommended");
    fill_list(&mut suggestions.excellent, &[EXCELLENT_FALLBACK], "excellent");
    suggestions
}

fn fill_keywords(mut keywords: Keywords, detected_skills: &[String]) -> Keywords {
    if keywords.found.is_empty() {
        keywords
            .found
            .extend(detected_skills.iter().take(FOUND_FROM_SKILLS).cloned());
    }
    fill_list(&mut keywords.found, &[FOUND_KEYWORD_FALLBACK], "found keyword");
    fill_list(&mut keywords.missing, MISSING_KEYWORD_FALLBACK, "missing keyword");
    fill_list(&mut keywords.suggested, SUGGESTED_KEYWORD_FALLBACK, "suggested keyword");
    keywords
}

fn feedback(score: u8, text: &str, suggestions: &[&str]) -> SectionFeedback {
    SectionFeedback {
        score,
        feedback: text.to_string(),
        suggestions: suggestions.iter().map(|s| s.to_string()).collect(),
    }
}

/// Per-section completeness of what the extractor found.
pub fn analyze_sections(content: &ExtractedContent) -> BTreeMap<String, SectionFeedback> {
    let mut sections = BTreeMap::new();
    sections.insert("contact".to_string(), contact_feedback(content));

    let summary_words = content.summary.split_whitespace().count();
    let summary = match summary_words {
        0 => feedback(
            0,
            "No summary section found",
            &["Add a 2-3 sentence professional summary at the top"],
        ),
        1..=19 => feedback(
            60,
            "Summary is present but brief",
            &["Expand the summary with your focus area and a headline achievement"],
        ),
        _ => feedback(90, "Summary gives a clear overview", &[]),
    };
    sections.insert("summary".to_string(), summary);

    let experience = match content.experience.len() {
        0 => feedback(
            0,
            "No dated experience entries detected",
            &["List each role with a start and end year, e.g. 2019 - Present"],
        ),
        1 => feedback(
            60,
            "One dated experience entry detected",
            &["Add earlier roles, internships or relevant projects"],
        ),
        _ => feedback(85, "Multiple dated experience entries detected", &[]),
    };
    sections.insert("experience".to_string(), experience);

    let skills = match content.skill_names().count() {
        0 => feedback(
            0,
            "No recognizable skills detected",
            &["Add a dedicated skills section with concrete tools and technologies"],
        ),
        1..=4 => feedback(
            60,
            "A few recognizable skills detected",
            &["List more of the tools and technologies you use day to day"],
        ),
        _ => feedback(90, "Skills section covers a broad set of tools", &[]),
    };
    sections.insert("skills".to_string(), skills);

    let education = if content.education.is_empty() {
        feedback(
            40,
            "No degree or diploma detected",
            &["Add an education section, even if it only lists your highest degree"],
        )
    } else {
        feedback(85, "Education section detected", &[])
    };
    sections.insert("education".to_string(), education);

    sections
}

fn contact_feedback(content: &ExtractedContent) -> SectionFeedback {
    let info = &content.personal_info;
    let has_name = !info.name.is_empty() && info.name != NAME_PLACEHOLDER;
    let has_links = !(info.linkedin.is_empty() && info.github.is_empty() && info.website.is_empty());

    let weighted: [(bool, u8, &str); 5] = [
        (has_name, 25, "Put your full name on the first line"),
        (!info.email.is_empty(), 30, "Add a professional email address"),
        (!info.phone.is_empty(), 25, "Add a phone number"),
        (!info.location.is_empty(), 10, "Add your city and state"),
        (has_links, 10, "Link your LinkedIn profile or portfolio"),
    ];

    let score = weighted
        .iter()
        .filter(|(present, _, _)| *present)
        .map(|(_, weight, _)| weight)
        .sum();
    let suggestions: Vec<&str> = weighted
        .iter()
        .filter(|(present, _, _)| !*present)
        .map(|(_, _, hint)| *hint)
        .collect();

    let text = if suggestions.is_empty() {
        "Contact details are complete"
    } else {
        "Some contact details are missing"
    };
    feedback(score, text, &suggestions)
}

/// Compares vocabulary skills named in the job description against the resume.
///
/// Match percentage: the AI's job-match score if it gave a non-zero one, else the
/// share of job skills the resume mentions, else the keyword score.
pub fn build_job_matching(
    job_description: &str,
    resume_text: &str,
    parsed_job_match: Option<u8>,
    keyword_score: u8,
    suggested_keywords: &[String],
) -> JobMatching {
    let resume_lower = resume_text.to_lowercase();
    let (aligned, missing): (Vec<String>, Vec<String>) = detect_skills(job_description)
        .into_iter()
        .partition(|skill| resume_lower.contains(&skill.to_lowercase()));

    let job_skill_count = aligned.len() + missing.len();
    let match_percentage = match parsed_job_match {
        Some(score) if score > 0 => score,
        _ if job_skill_count > 0 => {
            ((aligned.len() as f32 / job_skill_count as f32) * 100.0).round() as u8
        }
        _ => keyword_score,
    };

    JobMatching {
        match_percentage,
        missing_skills: missing,
        aligned_experience: aligned,
        recommended_keywords: suggested_keywords.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::scores::{ATS_RANGE, KEYWORD_RANGE, OVERALL_RANGE, READABILITY_RANGE};
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const RESUME: &str = "\
Jane Smith
jane@example.com | 512-555-0147
Summary
Backend engineer focused on Rust, PostgreSQL and AWS.
Experience
2019 - Present
2015 - 2019
";

    const RESPONSE: &str = "\
Overall Resume Quality Score: 82
ATS Compatibility Score: 74
Readability Score: 88
Keyword Optimization Score: 65
Critical Improvements
- Add more metrics
Recommended Improvements
- Shorten the summary
Strengths
- Clear layout
Found Keywords: rust, postgresql
Missing Keywords: kubernetes
Suggested Keywords: terraform
";

    fn run(input: &AnalysisInput, response: &str) -> AnalysisResult {
        let mut rng = StdRng::seed_from_u64(42);
        assemble(input, response, ScoreFallback::Randomized, &mut rng).unwrap()
    }

    fn assert_lists_non_empty(result: &AnalysisResult) {
        assert!(!result.suggestions.critical.is_empty());
        assert!(!result.suggestions.recommended.is_empty());
        assert!(!result.suggestions.excellent.is_empty());
        assert!(!result.keywords.found.is_empty());
        assert!(!result.keywords.missing.is_empty());
        assert!(!result.keywords.suggested.is_empty());
    }

    #[test]
    fn test_full_response_is_used_verbatim() {
        let result = run(&AnalysisInput::new(RESUME, None), RESPONSE);
        assert_eq!(result.overall_score, 82);
        assert_eq!(result.ats_score, 74);
        assert_eq!(result.readability_score, 88);
        assert_eq!(result.keyword_score, 65);
        assert_eq!(result.job_match_score, None);
        assert!(result.job_matching.is_none());
        assert_eq!(result.suggestions.critical, vec!["Add more metrics"]);
        assert_eq!(result.suggestions.excellent, vec!["Clear layout"]);
        assert_eq!(result.keywords.found, vec!["rust", "postgresql"]);
        assert_eq!(result.keywords.missing, vec!["kubernetes"]);
        assert_eq!(result.keywords.suggested, vec!["terraform"]);
        assert_eq!(result.extracted_content.personal_info.name, "Jane Smith");
        assert_eq!(result.extracted_content.experience.len(), 2);
    }

    #[test]
    fn test_scenario_empty_inputs_still_complete() {
        let result = run(&AnalysisInput::new("", None), "");
        assert_lists_non_empty(&result);
        assert_eq!(result.suggestions.critical, vec![CRITICAL_FALLBACK]);
        assert_eq!(result.suggestions.recommended, vec![RECOMMENDED_FALLBACK]);
        assert_eq!(result.suggestions.excellent, vec![EXCELLENT_FALLBACK]);
        assert_eq!(result.keywords.found, vec![FOUND_KEYWORD_FALLBACK]);
        assert_eq!(result.keywords.missing.len(), MISSING_KEYWORD_FALLBACK.len());
        assert_eq!(result.keywords.suggested.len(), SUGGESTED_KEYWORD_FALLBACK.len());
        assert!(OVERALL_RANGE.contains(&result.overall_score));
        assert!(ATS_RANGE.contains(&result.ats_score));
        assert!(READABILITY_RANGE.contains(&result.readability_score));
        assert!(KEYWORD_RANGE.contains(&result.keyword_score));
        assert_eq!(result.extracted_content.personal_info.name, NAME_PLACEHOLDER);
    }

    #[test]
    fn test_found_keywords_fall_back_to_detected_skills() {
        let resume = "Dev\nPython Java Rust SQL Docker Kubernetes Git Linux";
        let result = run(&AnalysisInput::new(resume, None), "");
        assert_eq!(result.keywords.found.len(), 5);
        assert_eq!(result.keywords.found[0], "Python");
    }

    #[test]
    fn test_control_characters_fail_assembly() {
        let err = assemble(
            &AnalysisInput::new(RESUME, None),
            "Overall score: 80\u{0}\u{1}",
            ScoreFallback::Midpoint,
            &mut StdRng::seed_from_u64(1),
        )
        .unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedResponse(_)));
    }

    #[test]
    fn test_tabs_and_crlf_are_fine() {
        let result = run(
            &AnalysisInput::new(RESUME, None),
            "Overall score:\t91\r\nCritical issues\r\n- Add more metrics\r\n",
        );
        assert_eq!(result.overall_score, 91);
        assert_eq!(result.suggestions.critical, vec!["Add more metrics"]);
    }

    #[test]
    fn test_job_targeted_uses_parsed_match_score() {
        let input = AnalysisInput::new(RESUME, Some("Rust and Kubernetes engineer".to_string()));
        let response = format!("{RESPONSE}Job Match Score: 71\n");
        let result = run(&input, &response);
        assert_eq!(result.job_match_score, Some(71));
        let matching = result.job_matching.unwrap();
        assert_eq!(matching.match_percentage, 71);
        assert_eq!(matching.aligned_experience, vec!["Rust"]);
        assert_eq!(matching.missing_skills, vec!["Kubernetes"]);
        assert_eq!(matching.recommended_keywords, vec!["terraform"]);
    }

    #[test]
    fn test_job_match_computed_from_skill_overlap() {
        let matching = build_job_matching(
            "Need Python, Docker, AWS and Terraform",
            "I use python and docker",
            None,
            60,
            &[],
        );
        assert_eq!(matching.aligned_experience, vec!["Python", "Docker"]);
        assert_eq!(matching.missing_skills, vec!["AWS", "Terraform"]);
        assert_eq!(matching.match_percentage, 50);
    }

    #[test]
    fn test_job_match_without_known_skills_uses_keyword_score() {
        let matching = build_job_matching("Friendly barista wanted", "Anything", Some(0), 63, &[]);
        assert_eq!(matching.match_percentage, 63);
        assert!(matching.missing_skills.is_empty());
    }

    #[test]
    fn test_blank_job_description_is_not_job_targeted() {
        let input = AnalysisInput::new(RESUME, Some("  ".to_string()));
        let result = run(&input, "Job Match Score: 90");
        assert_eq!(result.job_match_score, None);
        assert!(result.job_matching.is_none());
    }

    #[test]
    fn test_section_analysis_contact_scoring() {
        let result = run(&AnalysisInput::new(RESUME, None), RESPONSE);
        let contact = &result.section_analysis["contact"];
        // name + email + phone, no location or links
        assert_eq!(contact.score, 80);
        assert_eq!(contact.suggestions.len(), 2);
        assert_eq!(result.section_analysis["experience"].score, 85);
        assert_eq!(result.section_analysis["summary"].score, 60);
        assert_eq!(result.section_analysis["education"].score, 40);
    }

    #[test]
    fn test_section_analysis_empty_resume() {
        let sections = analyze_sections(&ExtractedContent::default());
        assert_eq!(sections.len(), 5);
        assert_eq!(sections["contact"].score, 0);
        assert_eq!(sections["skills"].score, 0);
        assert!(sections.values().all(|s| s.score <= 100));
    }

    proptest! {
        #[test]
        fn prop_lists_never_empty_and_scores_bounded(
            resume in "(?s).{0,200}",
            response in "[a-zA-Z0-9 :,\\-•*\n]{0,300}",
        ) {
            let mut rng = StdRng::seed_from_u64(3);
            let result = assemble(
                &AnalysisInput::new(resume, None),
                &response,
                ScoreFallback::Randomized,
                &mut rng,
            ).unwrap();
            prop_assert!(!result.suggestions.critical.is_empty());
            prop_assert!(!result.suggestions.recommended.is_empty());
            prop_assert!(!result.suggestions.excellent.is_empty());
            prop_assert!(!result.keywords.found.is_empty());
            prop_assert!(!result.keywords.missing.is_empty());
            prop_assert!(!result.keywords.suggested.is_empty());
            for score in [result.overall_score, result.ats_score, result.readability_score, result.keyword_score] {
                prop_assert!(score > 0 && score <= 100);
            }
        }
    }
}
