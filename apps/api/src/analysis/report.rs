//! Flattens an `AnalysisResult` into the plain-text report offered for download.
//!
//! Section order is fixed: scores, critical, recommended, excellent, keyword lists,
//! then the job-match block when the analysis was job-targeted.

use std::fmt;

use crate::analysis::models::AnalysisResult;

const RULE: &str = "========================================";

/// Plain-text rendering of one analysis.
pub struct TextReport<'a>(pub &'a AnalysisResult);

fn write_list(f: &mut fmt::Formatter<'_>, title: &str, items: &[String]) -> fmt::Result {
    writeln!(f, "{title}")?;
    for item in items {
        writeln!(f, "- {item}")?;
    }
    writeln!(f)
}

fn write_inline(f: &mut fmt::Formatter<'_>, label: &str, items: &[String]) -> fmt::Result {
    writeln!(f, "{label}: {}", items.join(", "))
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.0;

        writeln!(f, "RESUME ANALYSIS REPORT")?;
        writeln!(f, "{RULE}")?;
        let name = &result.extracted_content.personal_info.name;
        if !name.is_empty() {
            writeln!(f, "Candidate: {name}")?;
        }
        writeln!(
            f,
            "Generated: {}",
            result.analyzed_at.format("%Y-%m-%d %H:%M UTC")
        )?;
        writeln!(f)?;

        writeln!(f, "SCORES")?;
        writeln!(f, "Overall Score: {}/100", result.overall_score)?;
        writeln!(f, "ATS Compatibility: {}/100", result.ats_score)?;
        writeln!(f, "Readability: {}/100", result.readability_score)?;
        writeln!(f, "Keyword Optimization: {}/100", result.keyword_score)?;
        if let Some(job_match) = result.job_match_score {
            writeln!(f, "Job Match: {job_match}/100")?;
        }
        writeln!(f)?;

        write_list(f, "CRITICAL IMPROVEMENTS", &result.suggestions.critical)?;
        write_list(f, "RECOMMENDED IMPROVEMENTS", &result.suggestions.recommended)?;
        write_list(f, "STRENGTHS", &result.suggestions.excellent)?;

        writeln!(f, "KEYWORDS")?;
        write_inline(f, "Found", &result.keywords.found)?;
        write_inline(f, "Missing", &result.keywords.missing)?;
        write_inline(f, "Suggested", &result.keywords.suggested)?;

        if let Some(matching) = &result.job_matching {
            writeln!(f)?;
            writeln!(f, "JOB MATCH")?;
            writeln!(f, "Match: {}%", matching.match_percentage)?;
            write_inline(f, "Aligned skills", &matching.aligned_experience)?;
            write_inline(f, "Missing skills", &matching.missing_skills)?;
            write_inline(f, "Recommended keywords", &matching.recommended_keywords)?;
        }

        Ok(())
    }
}

pub fn render_text_report(result: &AnalysisResult) -> String {
    TextReport(result).to_string()
}

/// File name for the downloaded report, e.g. `jane-smith-resume-analysis.txt`.
pub fn report_file_name(result: &AnalysisResult) -> String {
    let slug: String = result
        .extracted_content
        .personal_info
        .name
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-");

    if slug.is_empty() || slug == "name-not-found" {
        "resume-analysis.txt".to_string()
    } else {
        format!("{slug}-resume-analysis.txt")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::assembler::assemble;
    use crate::analysis::models::AnalysisInput;
    use crate::analysis::scores::ScoreFallback;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample(job_description: Option<&str>) -> AnalysisResult {
        let response = "\
Overall Score: 82
ATS Score: 74
Readability Score: 88
Keyword Score: 65
Job Match Score: 70
Critical Improvements
- Add more metrics
Found Keywords: rust, sql
";
        assemble(
            &AnalysisInput::new("Jane Smith\nRust developer", job_description.map(String::from)),
            response,
            ScoreFallback::Midpoint,
            &mut StdRng::seed_from_u64(0),
        )
        .unwrap()
    }

    #[test]
    fn test_sections_in_fixed_order() {
        let report = render_text_report(&sample(None));
        let positions: Vec<usize> = [
            "SCORES",
            "CRITICAL IMPROVEMENTS",
            "RECOMMENDED IMPROVEMENTS",
            "STRENGTHS",
            "KEYWORDS",
        ]
        .iter()
        .map(|heading| report.find(heading).unwrap())
        .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_scores_and_lists_rendered() {
        let report = render_text_report(&sample(None));
        assert!(report.contains("Candidate: Jane Smith"));
        assert!(report.contains("Overall Score: 82/100"));
        assert!(report.contains("- Add more metrics"));
        assert!(report.contains("Found: rust, sql"));
        assert!(!report.contains("JOB MATCH"));
        assert!(!report.contains("Job Match:"));
    }

    #[test]
    fn test_job_match_block_only_when_targeted() {
        let report = render_text_report(&sample(Some("Rust and Go engineer")));
        assert!(report.contains("Job Match: 70/100"));
        let block = report.find("JOB MATCH").unwrap();
        assert!(block > report.find("KEYWORDS").unwrap());
        assert!(report.contains("Aligned skills: Rust"));
    }

    #[test]
    fn test_display_matches_rendered_report() {
        let result = sample(Some("Rust engineer"));
        let report = render_text_report(&result);
        assert_eq!(format!("{}", TextReport(&result)), report);
        assert!(report.starts_with("RESUME ANALYSIS REPORT\n"));
        assert!(report.contains("STRENGTHS\n- "));
        assert!(report.ends_with("Stakeholder communication\n"));
    }

    #[test]
    fn test_report_file_name() {
        assert_eq!(report_file_name(&sample(None)), "jane-smith-resume-analysis.txt");
        let empty = assemble(
            &AnalysisInput::new("", None),
            "",
            ScoreFallback::Midpoint,
            &mut StdRng::seed_from_u64(0),
        )
        .unwrap();
        assert_eq!(report_file_name(&empty), "resume-analysis.txt");
    }
}
