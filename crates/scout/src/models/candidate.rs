//! Candidate data as it moves through the pipeline: search identity →
//! enriched profile → scored candidate. Profiles are immutable once built;
//! re-enrichment constructs a fresh instance.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::requirements::ExperienceLevel;

/// Minimal identity produced by the search stage. Deduplicated by `login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateIdentity {
    /// Unique handle within the remote source.
    pub login: String,
    /// Relevance score reported by the search endpoint, for traceability.
    pub search_score: f64,
}

/// One repository, reduced to the fields skill and experience derivation use.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoSummary {
    pub name: String,
    pub description: Option<String>,
    pub primary_language: Option<String>,
    pub star_count: u32,
    pub fork_count: u32,
    pub topics: Vec<String>,
}

/// Aggregate experience signals derived from a profile and its repositories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperienceSummary {
    pub years_active: f64,
    pub total_stars: u32,
    pub total_forks: u32,
    pub repo_count: usize,
    pub level: ExperienceLevel,
}

/// Fully enriched candidate record produced by the enrichment engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub identity: CandidateIdentity,
    pub display_name: String,
    pub location: Option<String>,
    /// "Open to opportunities" flag from the profile, when the source exposes it.
    pub hireable: bool,
    pub joined_at: DateTime<Utc>,
    pub repositories: Vec<RepoSummary>,
    /// Recent public event types, secondary signal only.
    pub activity_events: Vec<String>,
    /// Lower-cased skill tokens derived from languages, names, descriptions
    /// and topics. BTreeSet keeps derivation output deterministic.
    pub derived_skills: BTreeSet<String>,
    pub experience: ExperienceSummary,
}

/// How many required / preferred skills a candidate matched.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SkillsMatch {
    pub required: usize,
    pub preferred: usize,
}

/// Final ranked output: a profile plus its requirement-dependent score.
/// Never cached — scores change with the requirements, not the candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub profile: CandidateProfile,
    /// Weighted score in [0, 100].
    pub score: f64,
    pub skills_match: SkillsMatch,
}
