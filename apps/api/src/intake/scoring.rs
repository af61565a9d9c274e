//! ATS scoring: deterministic placeholder scorer keyed by owner identity.
//!
//! No text analysis happens here. The owner id seeds a 48-bit linear
//! congruential generator with the same constants and hashing as
//! `java.util.Random` seeded by `String.hashCode`, so a given owner always
//! gets the same scores as any JVM-based portal sharing the profile store.
//!
//! `IntakeService` holds an `Arc<dyn AtsScorer>`; tests swap in failing scorers.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ────────────────────────────────────────────────────────────────────────────
// Result model
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtsScoreResult {
    pub overall_score: u32, // 0 – 100
    pub category_scores: BTreeMap<String, u32>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub improvements: Vec<String>,
}

impl AtsScoreResult {
    /// Zero-score result substituted when a resume cannot be scored.
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            overall_score: 0,
            category_scores: BTreeMap::from([("error".to_string(), 0)]),
            strengths: vec![],
            weaknesses: vec![reason.into()],
            improvements: vec!["Upload a valid resume file".to_string()],
        }
    }

    /// Plain-text feedback stored on the profile. Improvements are not included.
    pub fn summary(&self) -> String {
        let mut out = format!("Overall ATS Score: {} out of 100\n\n", self.overall_score);

        out.push_str("Strengths:\n");
        for s in &self.strengths {
            let _ = writeln!(out, "- {s}");
        }
        out.push('\n');

        out.push_str("Areas for Improvement:\n");
        for w in &self.weaknesses {
            let _ = writeln!(out, "- {w}");
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoringError {
    #[error("owner id is blank")]
    BlankOwner,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

pub trait AtsScorer: Send + Sync {
    fn score(&self, owner_id: &str) -> Result<AtsScoreResult, ScoringError>;
}

// ────────────────────────────────────────────────────────────────────────────
// DeterministicAtsScorer
// ────────────────────────────────────────────────────────────────────────────

/// Threshold above which a category is a strength and below which it is a weakness.
/// A score of exactly 80 lands in neither list.
const STRENGTH_THRESHOLD: u32 = 80;

struct Category {
    name: &'static str,
    floor: u32,
    range: i32,
    strength: &'static str,
    weakness: &'static str,
}

/// Drawn from the stream in this order.
const CATEGORIES: &[Category] = &[
    Category {
        name: "format",
        floor: 70,
        range: 30,
        strength: "Well-formatted resume with clear sections",
        weakness: "Resume formatting could be improved",
    },
    Category {
        name: "content",
        floor: 65,
        range: 35,
        strength: "Strong content with quantifiable achievements",
        weakness: "Content lacks specific achievements",
    },
    Category {
        name: "keywords",
        floor: 60,
        range: 40,
        strength: "Good use of industry-specific keywords",
        weakness: "Missing important industry keywords",
    },
    Category {
        name: "skills",
        floor: 75,
        range: 25,
        strength: "Relevant skills highlighted effectively",
        weakness: "Technical skills section needs enhancement",
    },
];

const IMPROVEMENTS: &[&str] = &[
    "Add more quantifiable achievements",
    "Include relevant industry keywords",
    "Highlight technical skills more prominently",
    "Use a clearer section structure",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct DeterministicAtsScorer;

impl AtsScorer for DeterministicAtsScorer {
    fn score(&self, owner_id: &str) -> Result<AtsScoreResult, ScoringError> {
        if owner_id.trim().is_empty() {
            return Err(ScoringError::BlankOwner);
        }
        Ok(generate_score(owner_id))
    }
}

fn generate_score(owner_id: &str) -> AtsScoreResult {
    let mut rng = JavaRandom::new(i64::from(java_string_hash(owner_id)));

    let overall_score = 60 + rng.next_int(40);

    let mut category_scores = BTreeMap::new();
    let mut strengths = Vec::new();
    let mut weaknesses = Vec::new();

    for category in CATEGORIES {
        let score = category.floor + rng.next_int(category.range);
        category_scores.insert(category.name.to_string(), score);

        if score > STRENGTH_THRESHOLD {
            strengths.push(category.strength.to_string());
        }
        if score < STRENGTH_THRESHOLD {
            weaknesses.push(category.weakness.to_string());
        }
    }

    AtsScoreResult {
        overall_score,
        category_scores,
        strengths,
        weaknesses,
        improvements: IMPROVEMENTS.iter().map(|s| s.to_string()).collect(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Seeded generator
// ────────────────────────────────────────────────────────────────────────────

/// `String.hashCode`: `s[0]*31^(n-1) + ... + s[n-1]` over UTF-16 code units, wrapping.
pub fn java_string_hash(s: &str) -> i32 {
    s.encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

const MULTIPLIER: u64 = 0x5_DEEC_E66D;
const ADDEND: u64 = 0xB;
const MASK: u64 = (1 << 48) - 1;

/// 48-bit LCG matching `java.util.Random` output for the same seed.
#[derive(Debug, Clone)]
pub struct JavaRandom {
    seed: u64,
}

impl JavaRandom {
    pub fn new(seed: i64) -> Self {
        Self {
            seed: (seed as u64 ^ MULTIPLIER) & MASK,
        }
    }

    fn next(&mut self, bits: u32) -> i32 {
        self.seed = self.seed.wrapping_mul(MULTIPLIER).wrapping_add(ADDEND) & MASK;
        (self.seed >> (48 - bits)) as i32
    }

    /// Uniform in `[0, bound)`. `bound` must be positive.
    pub fn next_int(&mut self, bound: i32) -> u32 {
        debug_assert!(bound > 0);
        let m = bound - 1;
        let mut r = self.next(31);
        if bound & m == 0 {
            r = ((i64::from(bound) * i64::from(r)) >> 31) as i32;
        } else {
            let mut u = r;
            loop {
                r = u % bound;
                // rejects the biased tail; the sum overflows negative exactly there
                if u.wrapping_sub(r).wrapping_add(m) >= 0 {
                    break;
                }
                u = self.next(31);
            }
        }
        r as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(owner: &str) -> AtsScoreResult {
        DeterministicAtsScorer.score(owner).unwrap()
    }

    #[test]
    fn test_java_string_hash() {
        assert_eq!(java_string_hash(""), 0);
        assert_eq!(java_string_hash("u1"), 3676);
        assert_eq!(java_string_hash("abc"), 96354);
        assert_eq!(java_string_hash("user123"), -147_178_873);
    }

    #[test]
    fn test_java_random_known_sequence() {
        // new java.util.Random(42).nextInt(10) x3
        let mut rng = JavaRandom::new(42);
        assert_eq!(rng.next_int(10), 0);
        assert_eq!(rng.next_int(10), 3);
        assert_eq!(rng.next_int(10), 8);
    }

    #[test]
    fn test_matches_reference_scores() {
        let r = score("user123");
        assert_eq!(r.overall_score, 91);
        assert_eq!(r.category_scores["format"], 73);
        assert_eq!(r.category_scores["content"], 70);
        assert_eq!(r.category_scores["keywords"], 66);
        assert_eq!(r.category_scores["skills"], 93);
        assert_eq!(r.strengths, vec!["Relevant skills highlighted effectively"]);
        assert_eq!(
            r.weaknesses,
            vec![
                "Resume formatting could be improved",
                "Content lacks specific achievements",
                "Missing important industry keywords",
            ]
        );
    }

    #[test]
    fn test_score_of_exactly_80_in_neither_list() {
        let r = score("abc");
        assert_eq!(r.overall_score, 84);
        assert_eq!(r.category_scores["format"], 80);
        assert!(!r.strengths.iter().any(|s| s.contains("Well-formatted")));
        assert!(!r.weaknesses.iter().any(|s| s.contains("formatting")));
        assert_eq!(r.strengths.len(), 3);
        assert!(r.weaknesses.is_empty());
    }

    #[test]
    fn test_deterministic_per_owner() {
        for owner in ["u1", "user123", "student-42", "ünïcode"] {
            assert_eq!(score(owner), score(owner));
        }
    }

    #[test]
    fn test_scores_within_ranges() {
        for i in 0..500 {
            let r = score(&format!("owner-{i}"));
            assert!((60..=99).contains(&r.overall_score));
            assert!((70..=99).contains(&r.category_scores["format"]));
            assert!((65..=99).contains(&r.category_scores["content"]));
            assert!((60..=99).contains(&r.category_scores["keywords"]));
            assert!((75..=99).contains(&r.category_scores["skills"]));
            assert_eq!(r.category_scores.len(), 4);
            assert!(r.strengths.len() + r.weaknesses.len() <= 4);
            assert_eq!(r.improvements.len(), 4);
        }
    }

    #[test]
    fn test_blank_owner_is_error() {
        assert_eq!(
            DeterministicAtsScorer.score("  "),
            Err(ScoringError::BlankOwner)
        );
    }

    #[test]
    fn test_failed_result_shape() {
        let r = AtsScoreResult::failed("Resume file not found");
        assert_eq!(r.overall_score, 0);
        assert_eq!(r.category_scores, BTreeMap::from([("error".to_string(), 0)]));
        assert!(r.strengths.is_empty());
        assert_eq!(r.weaknesses, vec!["Resume file not found"]);
        assert_eq!(r.improvements, vec!["Upload a valid resume file"]);
    }

    #[test]
    fn test_summary_format() {
        let r = AtsScoreResult {
            overall_score: 77,
            category_scores: BTreeMap::new(),
            strengths: vec!["A".to_string(), "B".to_string()],
            weaknesses: vec!["C".to_string()],
            improvements: vec!["never shown".to_string()],
        };
        assert_eq!(
            r.summary(),
            "Overall ATS Score: 77 out of 100\n\nStrengths:\n- A\n- B\n\nAreas for Improvement:\n- C\n"
        );
    }

    #[test]
    fn test_summary_of_failed_result() {
        let r = AtsScoreResult::failed("boom");
        assert_eq!(
            r.summary(),
            "Overall ATS Score: 0 out of 100\n\nStrengths:\n\nAreas for Improvement:\n- boom\n"
        );
    }
}
