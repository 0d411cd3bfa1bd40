//! Score Normalizer — replaces missing or zero scores with a plausible default.
//!
//! A zero from the sectionizer means "no parseable score", not a zero-quality resume.

use std::ops::RangeInclusive;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::analysis::sectionizer::RawScores;

pub const OVERALL_RANGE: RangeInclusive<u8> = 60..=90;
pub const ATS_RANGE: RangeInclusive<u8> = 65..=90;
pub const READABILITY_RANGE: RangeInclusive<u8> = 70..=90;
pub const KEYWORD_RANGE: RangeInclusive<u8> = 55..=90;

/// How a missing score is filled in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreFallback {
    /// Uniform draw from the family's range.
    #[default]
    Randomized,
    /// Middle of the family's range. Deterministic.
    Midpoint,
}

impl FromStr for ScoreFallback {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "random" | "randomized" => Ok(ScoreFallback::Randomized),
            "midpoint" | "deterministic" => Ok(ScoreFallback::Midpoint),
            other => Err(format!(
                "unknown score fallback '{other}' (expected 'random' or 'midpoint')"
            )),
        }
    }
}

impl ScoreFallback {
    pub fn pick<R: Rng + ?Sized>(self, range: RangeInclusive<u8>, rng: &mut R) -> u8 {
        match self {
            ScoreFallback::Randomized => rng.gen_range(range),
            ScoreFallback::Midpoint => {
                let (lo, hi) = range.into_inner();
                lo + (hi - lo) / 2
            }
        }
    }
}

/// The four mandatory scores after normalization, each in 0..=100 and never 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedScores {
    pub overall: u8,
    pub ats: u8,
    pub readability: u8,
    pub keyword: u8,
}

pub fn normalize_scores<R: Rng + ?Sized>(
    raw: &RawScores,
    fallback: ScoreFallback,
    rng: &mut R,
) -> NormalizedScores {
    NormalizedScores {
        overall: normalize(raw.overall, OVERALL_RANGE, fallback, rng),
        ats: normalize(raw.ats, ATS_RANGE, fallback, rng),
        readability: normalize(raw.readability, READABILITY_RANGE, fallback, rng),
        keyword: normalize(raw.keyword, KEYWORD_RANGE, fallback, rng),
    }
}

fn normalize<R: Rng + ?Sized>(
    value: Option<u8>,
    range: RangeInclusive<u8>,
    fallback: ScoreFallback,
    rng: &mut R,
) -> u8 {
    match value {
        Some(score) if score > 0 => score.min(100),
        _ => fallback.pick(range, rng),
    }
}
