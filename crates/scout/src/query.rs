//! Query builder — turns job requirements into a bounded list of GitHub
//! user-search query strings. Pure and deterministic for a given set of
//! requirements: no randomness, no hidden state beyond the static tables.

use std::collections::HashSet;

use chrono::{Datelike, Utc};

use crate::models::requirements::{ExperienceLevel, JobRequirements};
use crate::vocab::{implied_skills, language_filters};

/// Upper bound on generated queries, keeping total request volume
/// predictable regardless of how many skills the requirements list.
pub const MAX_QUERIES: usize = 6;

/// Builds at most `MAX_QUERIES` search queries, one per leading skill.
///
/// Each query combines the skill token, its implied foundational skills, and
/// `language:` ecosystem filters. A skill already implied by an earlier query
/// is skipped rather than searched redundantly. Seniority appends coarse
/// follower and account-age filters, as a quality heuristic only.
pub fn build_queries(requirements: &JobRequirements) -> Vec<String> {
    let seniority_filter = seniority_filter(requirements.level);
    let mut covered: HashSet<String> = HashSet::new();
    let mut queries = Vec::new();

    let skills = requirements
        .required_skills
        .iter()
        .chain(requirements.preferred_skills.iter());

    for skill in skills {
        if queries.len() >= MAX_QUERIES {
            break;
        }
        let token = skill.trim().to_lowercase();
        if token.is_empty() || covered.contains(&token) {
            continue;
        }

        let mut terms: Vec<String> = vec![token.clone()];
        covered.insert(token.clone());

        for implied in implied_skills(&token) {
            if covered.insert(implied.to_string()) {
                terms.push(implied.to_string());
            }
        }
        for language in language_filters(&token) {
            terms.push(format!("language:{language}"));
        }
        if let Some(filter) = &seniority_filter {
            terms.push(filter.clone());
        }

        queries.push(terms.join(" "));
    }

    queries
}

/// Follower and account-age qualifiers per seniority level. Account age is
/// expressed as a `created:<` year cutoff.
fn seniority_filter(level: ExperienceLevel) -> Option<String> {
    let (min_followers, min_account_years) = match level {
        ExperienceLevel::Senior => (40, 4),
        ExperienceLevel::Mid => (10, 2),
        ExperienceLevel::Junior => return None,
    };
    let cutoff_year = Utc::now().year() - min_account_years;
    Some(format!("followers:>={min_followers} created:<{cutoff_year}-01-01"))
}
