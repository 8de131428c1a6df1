//! Job requirements — the structured input that drives query construction
//! and scoring. Produced outside this crate (see `extract`), treated as
//! read-only and already validated.

use serde::{Deserialize, Serialize};

/// Seniority level of a role or a candidate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    Junior,
    #[default]
    Mid,
    Senior,
}

impl ExperienceLevel {
    /// One level below, used for the adjacent-match scoring bonus.
    pub fn one_below(self) -> Option<ExperienceLevel> {
        match self {
            ExperienceLevel::Senior => Some(ExperienceLevel::Mid),
            ExperienceLevel::Mid => Some(ExperienceLevel::Junior),
            ExperienceLevel::Junior => None,
        }
    }
}

/// Inclusive years-of-experience window requested by the role.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct YearsRange {
    pub min: f64,
    pub max: f64,
}

impl YearsRange {
    pub fn contains(&self, years: f64) -> bool {
        years >= self.min && years <= self.max
    }
}

/// Structured requirements extracted from a job description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRequirements {
    pub required_skills: Vec<String>,
    pub preferred_skills: Vec<String>,
    pub level: ExperienceLevel,
    pub years_experience: YearsRange,
}
