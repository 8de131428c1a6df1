//! Enrichment engine — fans each candidate out into three concurrent
//! sub-fetches (profile, repositories, activity events), derives a skill set
//! and experience summary, and assembles an immutable `CandidateProfile`.
//!
//! Candidates are processed in fixed-size batches with a fixed delay between
//! batches to stay under the remote quota. Within one batch candidates run
//! concurrently; the delay is skipped after the final batch.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::cache::{cache_key, CacheStore};
use crate::errors::ScoutError;
use crate::models::candidate::{
    CandidateIdentity, CandidateProfile, ExperienceSummary, RepoSummary,
};
use crate::models::requirements::ExperienceLevel;
use crate::source::types::{EventResponse, RepoResponse, UserResponse};
use crate::source::CandidateSource;
use crate::vocab::SKILL_VOCABULARY;

pub const DEFAULT_BATCH_SIZE: usize = 5;

pub struct EnrichmentEngine {
    source: Arc<dyn CandidateSource>,
    cache: Arc<CacheStore>,
    ttl: Duration,
    batch_size: usize,
    batch_delay: Duration,
}

impl EnrichmentEngine {
    pub fn new(
        source: Arc<dyn CandidateSource>,
        cache: Arc<CacheStore>,
        ttl: Duration,
        batch_size: usize,
        batch_delay: Duration,
    ) -> Self {
        EnrichmentEngine {
            source,
            cache,
            ttl,
            batch_size: batch_size.max(1),
            batch_delay,
        }
    }

    /// Enriches every identity, dropping candidates whose profile fetch
    /// failed. Never fails as a whole: the worst case is an empty result.
    pub async fn enrich(&self, identities: Vec<CandidateIdentity>) -> Vec<CandidateProfile> {
        let total = identities.len();
        let batches: Vec<Vec<CandidateIdentity>> = identities
            .chunks(self.batch_size)
            .map(|c| c.to_vec())
            .collect();
        let batch_count = batches.len();

        let mut profiles = Vec::with_capacity(total);
        for (index, batch) in batches.into_iter().enumerate() {
            debug!(batch = index + 1, of = batch_count, size = batch.len(), "enriching batch");

            let mut handles = Vec::with_capacity(batch.len());
            for identity in batch {
                let source = Arc::clone(&self.source);
                let cache = Arc::clone(&self.cache);
                let ttl = self.ttl;
                handles.push(tokio::spawn(async move {
                    enrich_candidate(source, cache, ttl, identity).await
                }));
            }

            for handle in handles {
                match handle.await {
                    Ok(Some(profile)) => profiles.push(profile),
                    Ok(None) => {} // dropped, already logged
                    Err(e) => warn!(error = %e, "enrichment task panicked, dropping candidate"),
                }
            }

            if index + 1 < batch_count {
                tokio::time::sleep(self.batch_delay).await;
            }
        }

        info!(requested = total, enriched = profiles.len(), "enrichment complete");
        profiles
    }
}

/// Enriches one candidate. Returns `None` when the required profile fetch
/// failed; repository and event failures degrade instead of dropping.
async fn enrich_candidate(
    source: Arc<dyn CandidateSource>,
    cache: Arc<CacheStore>,
    ttl: Duration,
    identity: CandidateIdentity,
) -> Option<CandidateProfile> {
    let login = identity.login.clone();

    let (profile_res, repos_res, events_res) = tokio::join!(
        cached_fetch(&*source, &cache, ttl, "profile", &login),
        cached_fetch(&*source, &cache, ttl, "repos", &login),
        cached_fetch(&*source, &cache, ttl, "events", &login),
    );

    let user: UserResponse = match profile_res.and_then(parse_payload) {
        Ok(user) => user,
        Err(e) => {
            warn!(login = %login, error = %e, "profile fetch failed, dropping candidate");
            return None;
        }
    };

    // Repositories and events are secondary signals: degrade to empty.
    let repos: Vec<RepoResponse> = match repos_res.and_then(parse_payload) {
        Ok(repos) => repos,
        Err(e) => {
            warn!(login = %login, error = %e, "repository fetch failed, continuing without repos");
            Vec::new()
        }
    };
    let events: Vec<EventResponse> = match events_res.and_then(parse_payload) {
        Ok(events) => events,
        Err(e) => {
            debug!(login = %login, error = %e, "events fetch failed, continuing without events");
            Vec::new()
        }
    };

    let repositories: Vec<RepoSummary> = repos
        .into_iter()
        .map(|r| RepoSummary {
            name: r.name,
            description: r.description,
            primary_language: r.language,
            star_count: r.stargazers_count,
            fork_count: r.forks_count,
            topics: r.topics,
        })
        .collect();

    let derived_skills = derive_skills(&repositories);
    let experience = derive_experience(user.created_at, &repositories, Utc::now());

    Some(CandidateProfile {
        display_name: user.name.unwrap_or_else(|| user.login.clone()),
        location: user.location,
        hireable: user.hireable.unwrap_or(false),
        joined_at: user.created_at,
        identity,
        repositories,
        activity_events: events.into_iter().map(|e| e.event_type).collect(),
        derived_skills,
        experience,
    })
}

async fn cached_fetch(
    source: &dyn CandidateSource,
    cache: &CacheStore,
    ttl: Duration,
    namespace: &str,
    login: &str,
) -> Result<Value, ScoutError> {
    let key = cache_key(namespace, &[login]);
    if let Some(payload) = cache.get(&key) {
        return Ok(payload);
    }
    let payload = match namespace {
        "profile" => source.user(login).await?,
        "repos" => source.user_repos(login).await?,
        _ => source.user_events(login).await?,
    };
    cache.set(&key, payload.clone(), ttl);
    Ok(payload)
}

fn parse_payload<T: serde::de::DeserializeOwned>(payload: Value) -> Result<T, ScoutError> {
    Ok(serde_json::from_value(payload)?)
}

/// Skill derivation: the union of every repository's primary language
/// (lower-cased) with vocabulary tokens found as substrings of the
/// concatenated names, descriptions, and topics. Case-insensitive and
/// substring-based; false positives from token collisions are accepted.
pub fn derive_skills(repositories: &[RepoSummary]) -> BTreeSet<String> {
    let mut skills = BTreeSet::new();
    let mut haystack = String::new();

    for repo in repositories {
        if let Some(language) = &repo.primary_language {
            skills.insert(language.to_lowercase());
        }
        haystack.push_str(&repo.name.to_lowercase());
        haystack.push(' ');
        if let Some(description) = &repo.description {
            haystack.push_str(&description.to_lowercase());
            haystack.push(' ');
        }
        for topic in &repo.topics {
            haystack.push_str(&topic.to_lowercase());
            haystack.push(' ');
        }
    }

    for token in SKILL_VOCABULARY {
        if haystack.contains(token) {
            skills.insert(token.to_string());
        }
    }
    skills
}

/// Experience derivation. Thresholds are OR-combined: any single strong
/// signal is enough to promote a level (sensitivity over precision).
pub fn derive_experience(
    joined_at: DateTime<Utc>,
    repositories: &[RepoSummary],
    now: DateTime<Utc>,
) -> ExperienceSummary {
    let total_stars: u32 = repositories.iter().map(|r| r.star_count).sum();
    let total_forks: u32 = repositories.iter().map(|r| r.fork_count).sum();
    let repo_count = repositories.len();

    let years_active =
        (now.signed_duration_since(joined_at).num_days() as f64 / 365.25).max(0.0);

    ExperienceSummary {
        years_active,
        total_stars,
        total_forks,
        repo_count,
        level: classify_level(years_active, total_stars, repo_count),
    }
}

pub fn classify_level(years_active: f64, total_stars: u32, repo_count: usize) -> ExperienceLevel {
    if years_active > 5.0 || total_stars > 100 || repo_count > 20 {
        ExperienceLevel::Senior
    } else if years_active > 2.0 || total_stars > 20 || repo_count > 10 {
        ExperienceLevel::Mid
    } else {
        ExperienceLevel::Junior
    }
}
