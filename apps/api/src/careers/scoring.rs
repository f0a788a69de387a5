//! Career Scoring — pluggable scorer that ranks catalog careers against a user's skills.
//!
//! Two backends exist because callers rely on both formulas:
//! - `WeightedCountScorer`: Σ repo-count of matched skills × career weight
//! - `MatchedCountScorer`:  |matched skills| × career weight
//!
//! `AppState` holds an `Arc<dyn CareerScorer>` chosen from `SCORING_MODE` at startup.

use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::careers::catalog::{CareerCatalog, CareerProfile};
use crate::careers::skills::AggregatedSkills;
use crate::careers::CareerError;

// ────────────────────────────────────────────────────────────────────────────
// Output data model
// ────────────────────────────────────────────────────────────────────────────

/// Score of one career for one user. Built per request, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    pub career: String,
    pub score: f64,
    /// Catalog spelling, in the career's required order.
    pub matched_skills: Vec<String>,
    /// Echoed so the client can request a learning plan without a catalog lookup.
    pub all_required_skills: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMode {
    Weighted,
    Matched,
}

impl ScoringMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoringMode::Weighted => "weighted",
            ScoringMode::Matched => "matched",
        }
    }
}

impl FromStr for ScoringMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weighted" | "weighted_count" => Ok(ScoringMode::Weighted),
            "matched" | "matched_count" | "cardinality" => Ok(ScoringMode::Matched),
            other => Err(format!(
                "unknown scoring mode '{other}' (expected 'weighted' or 'matched')"
            )),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Implement `raw_score` to add a scoring formula; ranking, filtering and
/// tie-breaking are shared through `score_all`.
pub trait CareerScorer: Send + Sync {
    fn mode(&self) -> ScoringMode;

    /// Unweighted score of the matched skills, before the career multiplier.
    fn raw_score(&self, matched: &[String], skills: &AggregatedSkills) -> f64;

    /// Scores every career, drops careers with no match, and sorts by score
    /// descending. Ties keep catalog declaration order.
    fn score_all(
        &self,
        skills: &AggregatedSkills,
        catalog: &CareerCatalog,
    ) -> Result<Vec<ScoreResult>, CareerError> {
        let mut results: Vec<ScoreResult> = catalog
            .careers()
            .iter()
            .filter_map(|career| {
                let matched = matched_skills(career, skills);
                if matched.is_empty() {
                    return None;
                }
                let score = self.raw_score(&matched, skills) * career.weight;
                (score > 0.0).then(|| ScoreResult {
                    career: career.name.clone(),
                    score,
                    matched_skills: matched,
                    all_required_skills: career.required.clone(),
                })
            })
            .collect();

        if results.is_empty() {
            return Err(CareerError::NoMatchingCareer);
        }

        // Vec::sort_by is stable, so equal scores keep declaration order.
        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        Ok(results)
    }
}

/// Required skills of `career` that the user has, case-insensitively.
pub fn matched_skills(career: &CareerProfile, skills: &AggregatedSkills) -> Vec<String> {
    let mut matched: Vec<String> = Vec::new();
    for required in &career.required {
        if skills.skills.contains(required)
            && !matched.iter().any(|m| m.eq_ignore_ascii_case(required))
        {
            matched.push(required.clone());
        }
    }
    matched
}

// ────────────────────────────────────────────────────────────────────────────
// Backends
// ────────────────────────────────────────────────────────────────────────────

/// Sums GitHub repository counts of matched skills; résumé-only skills count once.
pub struct WeightedCountScorer;

impl CareerScorer for WeightedCountScorer {
    fn mode(&self) -> ScoringMode {
        ScoringMode::Weighted
    }

    fn raw_score(&self, matched: &[String], skills: &AggregatedSkills) -> f64 {
        matched
            .iter()
            .map(|skill| f64::from(skills.weight_of(skill)))
            .sum()
    }
}

/// Counts matched skills; occurrence counts are ignored.
pub struct MatchedCountScorer;

impl CareerScorer for MatchedCountScorer {
    fn mode(&self) -> ScoringMode {
        ScoringMode::Matched
    }

    fn raw_score(&self, matched: &[String], _skills: &AggregatedSkills) -> f64 {
        matched.len() as f64
    }
}

pub fn scorer_for(mode: ScoringMode) -> Arc<dyn CareerScorer> {
    match mode {
        ScoringMode::Weighted => Arc::new(WeightedCountScorer),
        ScoringMode::Matched => Arc::new(MatchedCountScorer),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
