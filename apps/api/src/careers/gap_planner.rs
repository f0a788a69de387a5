//! Gap Planner — picks one missing skill for a target career and recommends
//! beginner resources for it.
//!
//! Flow: gaps = required \ user → random pick → resource lookup → plan items.
//!
//! One gap is recommended per call so repeated calls explore different gaps.
//! The random source is injected; handlers seed a fresh `StdRng` per request.

use async_trait::async_trait;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use tracing::debug;

use crate::careers::skills::SkillSet;
use crate::careers::CareerError;
use crate::errors::AppError;
use crate::models::learning::{Difficulty, LearningResourceRow};

/// Difficulty tier requested for every recommendation.
pub const RECOMMENDED_DIFFICULTY: Difficulty = Difficulty::Beginner;

pub const ALL_SATISFIED_TITLE: &str =
    "Congratulations! You already have every skill this career requires.";

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanItem {
    pub title: String,
    pub url: String,
    pub xp_points: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GapPlanResult {
    /// None when the user already covers every required skill.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skill_to_learn: Option<String>,
    pub plan: Vec<PlanItem>,
}

/// Outcome of the gap computation, before any resource lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum GapSelection {
    AllSatisfied,
    Learn { skill: String, gaps: Vec<String> },
}

// ────────────────────────────────────────────────────────────────────────────
// Resource lookup seam
// ────────────────────────────────────────────────────────────────────────────

/// Source of learning resources for a skill at a difficulty tier.
/// The difficulty filter is the implementor's responsibility.
#[async_trait]
pub trait ResourceLookup: Send + Sync {
    async fn find_resources(
        &self,
        skill: &str,
        difficulty: Difficulty,
    ) -> Result<Vec<LearningResourceRow>, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Planning
// ────────────────────────────────────────────────────────────────────────────

/// Required skills the user lacks, in required order.
pub fn compute_gaps(user_skills: &SkillSet, required_skills: &[String]) -> Vec<String> {
    let mut gaps: Vec<String> = Vec::new();
    for skill in required_skills {
        if skill.trim().is_empty() || user_skills.contains(skill) {
            continue;
        }
        if !gaps.iter().any(|g| g.eq_ignore_ascii_case(skill.trim())) {
            gaps.push(skill.trim().to_string());
        }
    }
    gaps
}

/// Computes the gaps and draws one uniformly from them.
pub fn select_gap<R: Rng + ?Sized>(
    user_skills: &SkillSet,
    required_skills: &[String],
    rng: &mut R,
) -> Result<GapSelection, CareerError> {
    if user_skills.is_empty() {
        return Err(CareerError::MissingInput(
            "user_skills must not be empty".to_string(),
        ));
    }
    if required_skills.iter().all(|s| s.trim().is_empty()) {
        return Err(CareerError::MissingInput(
            "required_skills must not be empty".to_string(),
        ));
    }

    let gaps = compute_gaps(user_skills, required_skills);
    match gaps.choose(rng) {
        None => Ok(GapSelection::AllSatisfied),
        Some(skill) => Ok(GapSelection::Learn {
            skill: skill.clone(),
            gaps: gaps.clone(),
        }),
    }
}

/// Recommends the next learning step toward a career.
///
/// Returns a single zero-xp item when nothing is missing or when no resource
/// exists for the chosen skill; both are terminal results, not errors.
pub async fn plan_next_step<R: Rng + Send>(
    user_skills: &SkillSet,
    required_skills: &[String],
    lookup: &dyn ResourceLookup,
    rng: &mut R,
) -> Result<GapPlanResult, AppError> {
    let (skill, gaps) = match select_gap(user_skills, required_skills, rng)? {
        GapSelection::AllSatisfied => {
            return Ok(GapPlanResult {
                skill_to_learn: None,
                plan: vec![PlanItem {
                    title: ALL_SATISFIED_TITLE.to_string(),
                    url: String::new(),
                    xp_points: Some(0),
                }],
            })
        }
        GapSelection::Learn { skill, gaps } => (skill, gaps),
    };

    debug!("Selected '{skill}' from {} gap(s): {:?}", gaps.len(), gaps);

    let resources = lookup
        .find_resources(&skill, RECOMMENDED_DIFFICULTY)
        .await?;

    let plan = if resources.is_empty() {
        vec![PlanItem {
            title: format!(
                "No {} resources found for {skill} yet. Try searching online!",
                RECOMMENDED_DIFFICULTY.as_str()
            ),
            url: String::new(),
            xp_points: Some(0),
        }]
    } else {
        resources
            .into_iter()
            .map(|resource| PlanItem {
                title: format!("Learn {skill}: {}", resource.title),
                url: resource.url,
                xp_points: Some(resource.xp_points),
            })
            .collect()
    };

    Ok(GapPlanResult {
        skill_to_learn: Some(skill),
        plan,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
