// Prompt constants for the resume review call.
// The layout requested here is what the sectionizer recognizes; the model does not always
// follow it exactly, so the sectionizer stays tolerant of wording changes.

pub const REVIEW_SYSTEM: &str = "\
You are an expert resume reviewer and ATS (applicant tracking system) specialist. \
Review resumes honestly and concretely. \
Respond in plain text using the exact headings and bullet style you are given. \
Do NOT wrap the answer in code fences. Do NOT return JSON.";

/// Review prompt. Replace `{resume_text}` and `{job_section}` before sending.
pub const REVIEW_PROMPT_TEMPLATE: &str = r#"Review the following resume.

RESUME:
{resume_text}
{job_section}
Respond using EXACTLY this layout. Scores are integers from 0 to 100.

## Scores
Overall Resume Quality Score: <number>
ATS Compatibility Score: <number>
Readability Score: <number>
Keyword Optimization Score: <number>
{job_score_line}
## Critical Improvements
- <issue that must be fixed, one per bullet>

## Recommended Improvements
- <improvement that would help, one per bullet>

## Excellent Areas
- <strength worth keeping, one per bullet>

## Keyword Analysis
Found Keywords: <comma-separated keywords present in the resume>
Missing Keywords: <comma-separated keywords the resume should contain>
Suggested Keywords: <comma-separated keywords to add>
"#;

const JOB_SCORE_LINE: &str = "Job Match Score: <number>\n";

/// Fills in the review prompt. The job-match score is only requested for job-targeted reviews.
pub fn build_review_prompt(resume_text: &str, job_description: Option<&str>) -> String {
    let (job_section, job_score_line) = match job_description {
        Some(jd) => (format!("\nJOB DESCRIPTION:\n{jd}\n"), JOB_SCORE_LINE),
        None => (String::new(), ""),
    };

    fill_template(
        REVIEW_PROMPT_TEMPLATE,
        &[
            ("{resume_text}", resume_text),
            ("{job_section}", job_section.as_str()),
            ("{job_score_line}", job_score_line),
        ],
    )
}

/// Substitutes placeholders in one left-to-right pass; inserted values are never rescanned.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        match values.iter().find(|(key, _)| tail.starts_with(key)) {
            Some((key, value)) => {
                out.push_str(value);
                rest = &tail[key.len()..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
