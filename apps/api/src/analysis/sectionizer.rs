//! Response Sectionizer — classifies lines of the AI review into feedback and keyword buckets.
//!
//! Single pass, no backtracking. The active section is an explicit `Section` value
//! threaded through a fold over the lines, so the same text always produces the
//! same buckets in the same order.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::analysis::models::{Keywords, Suggestions};

/// Bullet text at or below this many characters is treated as noise.
const MIN_CONTENT_CHARS: usize = 3;
const MAX_SCORE: u32 = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Section {
    #[default]
    None,
    Critical,
    Recommended,
    Excellent,
    FoundKeywords,
    MissingKeywords,
    SuggestedKeywords,
}

/// A heading is recognized when the line contains one topic word AND one qualifier word.
struct HeadingRule {
    section: Section,
    topics: &'static [&'static str],
    qualifiers: &'static [&'static str],
}

// Keyword rules first: "recommended keywords" must not open the recommended-improvements bucket.
const HEADING_RULES: &[HeadingRule] = &[
    HeadingRule {
        section: Section::FoundKeywords,
        topics: &["found", "present"],
        qualifiers: &["keyword"],
    },
    HeadingRule {
        section: Section::MissingKeywords,
        topics: &["missing"],
        qualifiers: &["keyword"],
    },
    HeadingRule {
        section: Section::SuggestedKeywords,
        topics: &["suggested", "recommended"],
        qualifiers: &["keyword"],
    },
    HeadingRule {
        section: Section::Critical,
        topics: &["critical"],
        qualifiers: &["improvement", "issue"],
    },
    HeadingRule {
        section: Section::Recommended,
        topics: &["recommended"],
        qualifiers: &["improvement", "suggestion"],
    },
    HeadingRule {
        section: Section::Excellent,
        topics: &["excellent", "strength"],
        qualifiers: &["area", "point", "aspect", "strength"],
    },
];

/// Inline "Label: a, b, c" keyword lines.
const INLINE_KEYWORD_LABELS: &[(&str, Section)] = &[
    ("found keywords:", Section::FoundKeywords),
    ("missing keywords:", Section::MissingKeywords),
    ("suggested keywords:", Section::SuggestedKeywords),
    ("recommended keywords:", Section::SuggestedKeywords),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreFamily {
    Overall,
    Ats,
    Readability,
    Keyword,
    JobMatch,
}

// Tested in this order; the first family whose label matches claims the line.
static SCORE_LABELS: Lazy<Vec<(ScoreFamily, Regex)>> = Lazy::new(|| {
    vec![
        (
            ScoreFamily::JobMatch,
            Regex::new(r"(?i)job[\s-]*match|match\s*(score|percentage)").unwrap(),
        ),
        (
            ScoreFamily::Ats,
            Regex::new(r"(?i)\bats\b.*(score|compatib|rating)").unwrap(),
        ),
        (ScoreFamily::Readability, Regex::new(r"(?i)readability").unwrap()),
        (
            ScoreFamily::Keyword,
            Regex::new(r"(?i)keyword.*(score|optimi[sz]ation|rating)").unwrap(),
        ),
        (
            ScoreFamily::Overall,
            Regex::new(r"(?i)overall.*(score|quality|rating)").unwrap(),
        ),
    ]
});

static DIGITS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

/// Scores as read from the response. `None` means no labelled number was seen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawScores {
    pub overall: Option<u8>,
    pub ats: Option<u8>,
    pub readability: Option<u8>,
    pub keyword: Option<u8>,
    pub job_match: Option<u8>,
}

impl RawScores {
    fn slot(&mut self, family: ScoreFamily) -> &mut Option<u8> {
        match family {
            ScoreFamily::Overall => &mut self.overall,
            ScoreFamily::Ats => &mut self.ats,
            ScoreFamily::Readability => &mut self.readability,
            ScoreFamily::Keyword => &mut self.keyword,
            ScoreFamily::JobMatch => &mut self.job_match,
        }
    }

    /// Keeps the first non-zero value seen for a family.
    fn record(&mut self, family: ScoreFamily, value: u8) {
        let slot = self.slot(family);
        if slot.map_or(true, |existing| existing == 0) {
            *slot = Some(value);
        }
    }
}

/// Everything the sectionizer pulled out of one AI response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionizedResponse {
    pub scores: RawScores,
    pub suggestions: Suggestions,
    pub keywords: Keywords,
}

impl SectionizedResponse {
    fn bucket(&mut self, section: Section) -> Option<&mut Vec<String>> {
        match section {
            Section::None => None,
            Section::Critical => Some(&mut self.suggestions.critical),
            Section::Recommended => Some(&mut self.suggestions.recommended),
            Section::Excellent => Some(&mut self.suggestions.excellent),
            Section::FoundKeywords => Some(&mut self.keywords.found),
            Section::MissingKeywords => Some(&mut self.keywords.missing),
            Section::SuggestedKeywords => Some(&mut self.keywords.suggested),
        }
    }

    /// Applies one line and returns the section that is active afterwards.
    fn absorb(&mut self, section: Section, line: &str, job_targeted: bool) -> Section {
        if let Some((family, value)) = parse_score_line(line) {
            if family != ScoreFamily::JobMatch || job_targeted {
                self.scores.record(family, value);
            }
        }

        if let Some((target, tokens)) = parse_inline_keywords(line) {
            if let Some(bucket) = self.bucket(target) {
                bucket.extend(tokens);
            }
        }

        match classify_line(line) {
            LineKind::Heading(next) => next,
            LineKind::Bullet(content) => {
                if content.chars().count() > MIN_CONTENT_CHARS {
                    if let Some(bucket) = self.bucket(section) {
                        bucket.push(content.to_string());
                    }
                }
                section
            }
            LineKind::Text => section,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    Heading(Section),
    /// Bullet text with the marker stripped.
    Bullet(&'a str),
    Text,
}

/// Classifies a single line on its own, without any scan state.
/// Heading rules win over bullet markers, so `- **Critical Improvements**` opens a section.
pub fn classify_line(line: &str) -> LineKind<'_> {
    if let Some(section) = heading_section(line) {
        return LineKind::Heading(section);
    }
    match bullet_content(line) {
        Some(content) => LineKind::Bullet(content),
        None => LineKind::Text,
    }
}

fn bullet_content(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    // "**Bold heading**" is emphasis, not a bullet.
    if trimmed.starts_with("**") {
        return None;
    }
    ['-', '•', '*']
        .iter()
        .find_map(|marker| trimmed.strip_prefix(*marker))
        .map(str::trim)
}

fn heading_section(line: &str) -> Option<Section> {
    let lower = line.to_lowercase();
    HEADING_RULES
        .iter()
        .find(|rule| {
            rule.topics.iter().any(|t| lower.contains(t))
                && rule.qualifiers.iter().any(|q| lower.contains(q))
        })
        .map(|rule| rule.section)
}

/// Reads a labelled score, e.g. "Overall Resume Quality Score: 82" → (Overall, 82).
pub fn parse_score_line(line: &str) -> Option<(ScoreFamily, u8)> {
    let (family, _) = SCORE_LABELS.iter().find(|(_, re)| re.is_match(line))?;
    let digits = DIGITS_RE.find(line)?;
    // Runs too long for u32 are not scores.
    let value = digits.as_str().parse::<u32>().ok()?.min(MAX_SCORE);
    Some((*family, value as u8))
}

/// Splits "Found Keywords: react, sql" style lines into their target bucket and tokens.
pub fn parse_inline_keywords(line: &str) -> Option<(Section, Vec<String>)> {
    let lower = line.to_lowercase();
    let (_, section) = INLINE_KEYWORD_LABELS
        .iter()
        .find(|(label, _)| lower.contains(label))?;
    let (_, rest) = line.split_once(':')?;
    let tokens = rest
        .split(',')
        .map(|token| token.trim().trim_matches('*').trim())
        .filter(|token| !token.is_empty())
        .map(String::from)
        .collect();
    Some((*section, tokens))
}

/// Sectionizes a full AI response. `job_targeted` controls whether a job-match score is kept.
pub fn sectionize(response: &str, job_targeted: bool) -> SectionizedResponse {
    let (_, sectionized) = response.lines().fold(
        (Section::None, SectionizedResponse::default()),
        |(section, mut acc), line| {
            let next = acc.absorb(section, line, job_targeted);
            (next, acc)
        },
    );
    sectionized
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SAMPLE_RESPONSE: &str = "\
## Resume Analysis

Overall Resume Quality Score: 82
ATS Compatibility Score: 74/100
Readability Score: 88
Keyword Optimization Score: 65
Job Match Score: 71

### Critical Improvements
- Add more metrics
- Remove the photo
-  ok

### Recommended Improvements
• Shorten the summary to three lines
* Group skills by domain

### Excellent Areas
- Clear chronological layout

### Keyword Analysis
Found Keywords: react, sql, aws
Missing Keywords: docker,  , kubernetes
Recommended Keywords: terraform
";

    #[test]
    fn test_scenario_overall_score_line() {
        let out = sectionize("Overall Resume Quality Score: 82", false);
        assert_eq!(out.scores.overall, Some(82));
    }

    #[test]
    fn test_scenario_critical_bullet() {
        let out = sectionize("Critical Improvements Needed\n- Add more metrics\n", false);
        assert_eq!(out.suggestions.critical, vec!["Add more metrics".to_string()]);
    }

    #[test]
    fn test_scenario_found_keywords_inline() {
        let out = sectionize("Found Keywords: react, sql, aws", false);
        assert_eq!(out.keywords.found, vec!["react", "sql", "aws"]);
    }

    #[test]
    fn test_full_sample_buckets() {
        let out = sectionize(SAMPLE_RESPONSE, true);
        assert_eq!(out.scores.overall, Some(82));
        assert_eq!(out.scores.ats, Some(74));
        assert_eq!(out.scores.readability, Some(88));
        assert_eq!(out.scores.keyword, Some(65));
        assert_eq!(out.scores.job_match, Some(71));
        assert_eq!(
            out.suggestions.critical,
            vec!["Add more metrics", "Remove the photo"]
        );
        assert_eq!(
            out.suggestions.recommended,
            vec!["Shorten the summary to three lines", "Group skills by domain"]
        );
        assert_eq!(out.suggestions.excellent, vec!["Clear chronological layout"]);
        assert_eq!(out.keywords.found, vec!["react", "sql", "aws"]);
        assert_eq!(out.keywords.missing, vec!["docker", "kubernetes"]);
        assert_eq!(out.keywords.suggested, vec!["terraform"]);
    }

    #[test]
    fn test_job_match_ignored_without_job_description() {
        let out = sectionize(SAMPLE_RESPONSE, false);
        assert_eq!(out.scores.job_match, None);
        assert_eq!(out.scores.overall, Some(82));
    }

    #[test]
    fn test_bullets_before_any_heading_are_dropped() {
        let out = sectionize("- Stray bullet text\n- Another one", false);
        assert_eq!(out, SectionizedResponse::default());
    }

    #[test]
    fn test_short_bullets_are_noise() {
        let out = sectionize("Critical issues\n- abc\n- abcd\n*\n", false);
        assert_eq!(out.suggestions.critical, vec!["abcd"]);
    }

    #[test]
    fn test_heading_needs_topic_and_qualifier() {
        assert_eq!(classify_line("Critical thinking"), LineKind::Text);
        assert_eq!(
            classify_line("CRITICAL ISSUES"),
            LineKind::Heading(Section::Critical)
        );
        assert_eq!(classify_line("Improvements"), LineKind::Text);
    }

    #[test]
    fn test_recommended_keywords_heading_is_keyword_bucket() {
        assert_eq!(
            classify_line("### Recommended Keywords"),
            LineKind::Heading(Section::SuggestedKeywords)
        );
        assert_eq!(
            classify_line("### Recommended Improvements"),
            LineKind::Heading(Section::Recommended)
        );
    }

    #[test]
    fn test_strengths_heading() {
        assert_eq!(
            classify_line("**Strengths**"),
            LineKind::Heading(Section::Excellent)
        );
    }

    #[test]
    fn test_bold_heading_is_not_bullet() {
        assert_eq!(
            classify_line("**Critical Improvements:**"),
            LineKind::Heading(Section::Critical)
        );
        assert_eq!(
            classify_line("  * Use active verbs"),
            LineKind::Bullet("Use active verbs")
        );
    }

    #[test]
    fn test_bullet_mentioning_heading_words_switches_section() {
        assert_eq!(
            classify_line("- Critical issue: no improvement metrics"),
            LineKind::Heading(Section::Critical)
        );
        let out = sectionize(
            "Excellent Areas\n- Clear layout\n- Critical issue: no improvement metrics\n- Add more metrics\n",
            false,
        );
        assert_eq!(out.suggestions.excellent, vec!["Clear layout"]);
        assert_eq!(out.suggestions.critical, vec!["Add more metrics"]);
    }

    #[test]
    fn test_headings_written_as_bullets_open_sections() {
        let out = sectionize(
            "Overall Resume Quality Score: 82\n\
             - **Critical Improvements**\n  - Add more metrics\n\
             * Recommended Improvements:\n  * Shorten the summary\n",
            false,
        );
        assert_eq!(out.scores.overall, Some(82));
        assert_eq!(out.suggestions.critical, vec!["Add more metrics"]);
        assert_eq!(out.suggestions.recommended, vec!["Shorten the summary"]);
    }

    #[test]
    fn test_keyword_section_bullets() {
        let out = sectionize("Missing Keywords\n- Kubernetes\n- GraphQL\n", false);
        assert_eq!(out.keywords.missing, vec!["Kubernetes", "GraphQL"]);
    }

    #[test]
    fn test_duplicates_preserved_in_order() {
        let out = sectionize(
            "Critical Improvements\n- Add more metrics\n- Add more metrics\n",
            false,
        );
        assert_eq!(out.suggestions.critical.len(), 2);
    }

    #[test]
    fn test_inline_keywords_strip_emphasis() {
        let (section, tokens) = parse_inline_keywords("**Found Keywords:** Rust, *SQL*").unwrap();
        assert_eq!(section, Section::FoundKeywords);
        assert_eq!(tokens, vec!["Rust", "SQL"]);
    }

    #[test]
    fn test_inline_keywords_inside_bullet() {
        let out = sectionize("## Keywords\n- Missing keywords: docker, helm\n", false);
        assert_eq!(out.keywords.missing, vec!["docker", "helm"]);
    }

    #[test]
    fn test_score_line_clamped_to_100() {
        assert_eq!(
            parse_score_line("Overall score: 250"),
            Some((ScoreFamily::Overall, 100))
        );
    }

    #[test]
    fn test_score_line_without_digits_is_ignored() {
        assert_eq!(parse_score_line("Overall score: excellent"), None);
        assert_eq!(parse_score_line("Readability is fine"), None);
    }

    #[test]
    fn test_ats_label_not_matched_inside_words() {
        assert_eq!(parse_score_line("Stats formats score: 12"), None);
    }

    #[test]
    fn test_first_nonzero_score_wins() {
        let out = sectionize(
            "Overall score: 0\nOverall score: 77\nOverall rating: 40",
            false,
        );
        assert_eq!(out.scores.overall, Some(77));
    }

    #[test]
    fn test_zero_score_is_recorded_as_zero() {
        let out = sectionize("Readability Score: 0", false);
        assert_eq!(out.scores.readability, Some(0));
    }

    proptest! {
        #[test]
        fn prop_sectionize_is_idempotent(text in "(?s).{0,400}") {
            prop_assert_eq!(sectionize(&text, true), sectionize(&text, true));
        }

        #[test]
        fn prop_scores_never_exceed_100(text in "(Overall|ATS|Readability|Keyword) score: [0-9]{1,12}") {
            let out = sectionize(&text, false);
            for score in [out.scores.overall, out.scores.ats, out.scores.readability, out.scores.keyword]
                .into_iter()
                .flatten()
            {
                prop_assert!(score <= 100);
            }
        }
    }
}
