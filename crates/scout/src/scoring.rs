//! Scoring & ranking — weighted multi-factor score out of 100 per candidate,
//! descending stable sort, truncated to the result budget.
//!
//! Components: required-skill overlap ×40, preferred ×20, experience-level
//! match +20 (adjacent-below +10), years-in-range +10, activity up to +10,
//! availability +5. Additive bonuses can push past 100 before the final
//! clamp.

use std::cmp::Ordering;

use tracing::debug;

use crate::models::candidate::{CandidateProfile, ScoredCandidate, SkillsMatch};
use crate::models::requirements::JobRequirements;

pub const DEFAULT_RESULT_BUDGET: usize = 20;

const REQUIRED_WEIGHT: f64 = 40.0;
const PREFERRED_WEIGHT: f64 = 20.0;
const LEVEL_EXACT_BONUS: f64 = 20.0;
const LEVEL_ADJACENT_BONUS: f64 = 10.0;
const YEARS_IN_RANGE_BONUS: f64 = 10.0;
const ACTIVITY_STARS_BONUS: f64 = 5.0;
const ACTIVITY_REPOS_BONUS: f64 = 5.0;
const AVAILABILITY_BONUS: f64 = 5.0;

const ACTIVITY_STARS_THRESHOLD: u32 = 50;
const ACTIVITY_REPOS_THRESHOLD: usize = 10;

/// Scores every profile against the requirements and returns at most
/// `result_budget` candidates, best first. The sort is stable, so ties keep
/// the input ordering.
pub fn rank(
    profiles: Vec<CandidateProfile>,
    requirements: &JobRequirements,
    result_budget: usize,
) -> Vec<ScoredCandidate> {
    let mut scored: Vec<ScoredCandidate> = profiles
        .into_iter()
        .map(|profile| score_candidate(profile, requirements))
        .collect();

    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    scored.truncate(result_budget);
    scored
}

/// Computes one candidate's score. Always in [0, 100].
pub fn score_candidate(
    profile: CandidateProfile,
    requirements: &JobRequirements,
) -> ScoredCandidate {
    let required_matches = count_matches(&requirements.required_skills, &profile);
    let preferred_matches = count_matches(&requirements.preferred_skills, &profile);

    let mut score = 0.0;
    score += overlap_fraction(required_matches, requirements.required_skills.len()) * REQUIRED_WEIGHT;
    score += overlap_fraction(preferred_matches, requirements.preferred_skills.len()) * PREFERRED_WEIGHT;

    if profile.experience.level == requirements.level {
        score += LEVEL_EXACT_BONUS;
    } else if requirements.level.one_below() == Some(profile.experience.level) {
        score += LEVEL_ADJACENT_BONUS;
    }

    if requirements.years_experience.contains(profile.experience.years_active) {
        score += YEARS_IN_RANGE_BONUS;
    }

    if profile.experience.total_stars > ACTIVITY_STARS_THRESHOLD {
        score += ACTIVITY_STARS_BONUS;
    }
    if profile.experience.repo_count > ACTIVITY_REPOS_THRESHOLD {
        score += ACTIVITY_REPOS_BONUS;
    }

    if profile.hireable {
        score += AVAILABILITY_BONUS;
    }

    let score = score.clamp(0.0, 100.0);
    debug!(
        login = %profile.identity.login,
        score,
        required_matches,
        preferred_matches,
        "candidate scored"
    );

    ScoredCandidate {
        profile,
        score,
        skills_match: SkillsMatch {
            required: required_matches,
            preferred: preferred_matches,
        },
    }
}

/// Empty requirement lists contribute 0 instead of dividing by zero.
fn overlap_fraction(matches: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        matches as f64 / total as f64
    }
}

fn count_matches(skills: &[String], profile: &CandidateProfile) -> usize {
    skills
        .iter()
        .filter(|skill| skill_matches(skill, profile))
        .count()
}

/// Case-insensitive substring containment in both directions, tolerating
/// naming variants ("SQL" matches "postgresql", "TensorFlow" matches
/// "tensorflow"). Intentionally permissive.
fn skill_matches(skill: &str, profile: &CandidateProfile) -> bool {
    let wanted = skill.to_lowercase();
    if wanted.is_empty() {
        return false;
    }
    profile
        .derived_skills
        .iter()
        .any(|derived| derived.contains(&wanted) || wanted.contains(derived.as_str()))
}
