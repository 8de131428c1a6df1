//! Pipeline — explicit wiring of the acquisition stages.
//!
//! Flow: build_queries → search → enrich (batched) → rank.
//!
//! All shared state (cache store, fetch client, perf sink) is constructed
//! here and injected into the stages; there are no process-wide singletons.
//! A `Pipeline` lives for one or more runs and is closed explicitly.

use std::sync::Arc;
use std::time::Instant;

use tracing::info;

use crate::cache::{CacheStats, CacheStore};
use crate::config::Config;
use crate::enrich::EnrichmentEngine;
use crate::errors::ScoutError;
use crate::extract::RequirementsExtractor;
use crate::models::candidate::ScoredCandidate;
use crate::models::requirements::JobRequirements;
use crate::query::build_queries;
use crate::scoring::rank;
use crate::search::search;
use crate::source::{CandidateSource, GithubClient};
use crate::telemetry::PerfSink;

pub struct Pipeline {
    config: Config,
    cache: Arc<CacheStore>,
    source: Arc<dyn CandidateSource>,
    sink: Arc<dyn PerfSink>,
    enrichment: EnrichmentEngine,
}

impl Pipeline {
    /// Production constructor: GitHub client built from the configuration.
    pub fn new(config: Config, sink: Arc<dyn PerfSink>) -> Result<Self, ScoutError> {
        let source: Arc<dyn CandidateSource> = Arc::new(GithubClient::new(
            config.github_token.clone(),
            Arc::clone(&sink),
        ));
        Self::with_source(config, source, sink)
    }

    /// Constructor with an injected source, used by tests and alternate
    /// backends.
    pub fn with_source(
        config: Config,
        source: Arc<dyn CandidateSource>,
        sink: Arc<dyn PerfSink>,
    ) -> Result<Self, ScoutError> {
        let cache = Arc::new(CacheStore::open(
            &config.cache_dir,
            config.memory_cache_capacity,
        )?);
        let enrichment = EnrichmentEngine::new(
            Arc::clone(&source),
            Arc::clone(&cache),
            config.default_ttl,
            config.batch_size,
            config.batch_delay,
        );
        Ok(Pipeline {
            config,
            cache,
            source,
            sink,
            enrichment,
        })
    }

    /// Runs the full pipeline for one set of requirements. Always returns
    /// whatever candidates could be enriched and scored, even when that set
    /// is empty; per-query and per-candidate failures never surface here.
    pub async fn run(
        &self,
        requirements: &JobRequirements,
    ) -> Result<Vec<ScoredCandidate>, ScoutError> {
        let queries = self.timed("stage_query", || build_queries(requirements));
        info!(queries = queries.len(), "queries built");

        let started = Instant::now();
        let identities = search(
            &*self.source,
            &self.cache,
            self.config.default_ttl,
            &queries,
        )
        .await;
        self.record("stage_search", started);

        let started = Instant::now();
        let profiles = self.enrichment.enrich(identities).await;
        self.record("stage_enrich", started);

        let ranked = self.timed("stage_score", || {
            rank(profiles, requirements, self.config.result_budget)
        });

        info!(results = ranked.len(), "pipeline run complete");
        Ok(ranked)
    }

    /// Extracts requirements from raw job text, then runs the pipeline.
    pub async fn run_from_text(
        &self,
        extractor: &dyn RequirementsExtractor,
        job_text: &str,
    ) -> Result<Vec<ScoredCandidate>, ScoutError> {
        let requirements = extractor.extract(job_text).await?;
        info!(
            required = requirements.required_skills.len(),
            preferred = requirements.preferred_skills.len(),
            "requirements extracted"
        );
        self.run(&requirements).await
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// End of lifecycle: purge stale cache entries and log the final cache
    /// statistics.
    pub fn close(self) -> CacheStats {
        self.cache.invalidate_expired();
        let stats = self.cache.stats();
        info!(
            hit_rate = stats.hit_rate(),
            memory_entries = stats.memory_entries,
            "pipeline closed"
        );
        stats
    }

    fn timed<T>(&self, operation: &str, f: impl FnOnce() -> T) -> T {
        let started = Instant::now();
        let result = f();
        self.record(operation, started);
        result
    }

    fn record(&self, operation: &str, started: Instant) {
        self.sink
            .record(operation, started.elapsed().as_millis() as u64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::requirements::{ExperienceLevel, YearsRange};
    use crate::source::testing::StubSource;
    use crate::telemetry::PerfRecorder;
    use serde_json::json;
    use std::time::Duration;
    use tempfile::TempDir;

    fn test_config(dir: &TempDir) -> Config {
        Config {
            cache_dir: dir.path().to_path_buf(),
            batch_delay: Duration::from_millis(0),
            ..Config::default()
        }
    }

    fn requirements() -> JobRequirements {
        JobRequirements {
            required_skills: vec!["python".to_string()],
            preferred_skills: vec![],
            level: ExperienceLevel::Senior,
            years_experience: YearsRange { min: 3.0, max: 10.0 },
        }
    }

    fn user(login: &str, created_at: &str, hireable: bool) -> serde_json::Value {
        json!({
            "login": login,
            "name": login,
            "location": null,
            "hireable": hireable,
            "created_at": created_at,
        })
    }

    #[tokio::test]
    async fn test_end_to_end_ranks_matching_senior_first() {
        let dir = TempDir::new().unwrap();
        let reqs = requirements();
        let queries = build_queries(&reqs);

        let source = StubSource::new()
            .with_search(
                &queries[0],
                json!({
                    "total_count": 2,
                    "items": [
                        {"login": "ml_senior", "score": 5.0},
                        {"login": "java_junior", "score": 4.0},
                    ],
                }),
            )
            .with_user("ml_senior", user("ml_senior", "2015-01-01T00:00:00Z", false))
            .with_repos(
                "ml_senior",
                json!([{
                    "name": "trainer",
                    "description": "tensorflow models",
                    "language": "Python",
                    "stargazers_count": 5,
                    "forks_count": 0,
                    "topics": [],
                }]),
            )
            .with_user("java_junior", user("java_junior", "2025-06-01T00:00:00Z", false))
            .with_repos(
                "java_junior",
                json!([{
                    "name": "hello",
                    "description": null,
                    "language": "Java",
                    "stargazers_count": 0,
                    "forks_count": 0,
                    "topics": [],
                }]),
            );

        let sink = Arc::new(PerfRecorder::new());
        let pipeline =
            Pipeline::with_source(test_config(&dir), Arc::new(source), sink.clone()).unwrap();

        let ranked = pipeline.run(&reqs).await.unwrap();
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].profile.identity.login, "ml_senior");
        assert!(ranked[0].score > ranked[1].score);
        assert_eq!(ranked[0].skills_match.required, 1);
        assert_eq!(ranked[1].skills_match.required, 0);

        // Every stage reported a timing.
        let snapshot = sink.snapshot();
        for stage in ["stage_query", "stage_search", "stage_enrich", "stage_score"] {
            assert!(snapshot.contains_key(stage), "missing timing for {stage}");
        }
    }

    #[tokio::test]
    async fn test_empty_search_yields_empty_results_not_error() {
        let dir = TempDir::new().unwrap();
        let pipeline = Pipeline::with_source(
            test_config(&dir),
            Arc::new(StubSource::new()),
            Arc::new(PerfRecorder::new()),
        )
        .unwrap();

        let ranked = pipeline.run(&requirements()).await.unwrap();
        assert!(ranked.is_empty());
    }

    #[tokio::test]
    async fn test_second_run_is_served_from_cache() {
        let dir = TempDir::new().unwrap();
        let reqs = requirements();
        let queries = build_queries(&reqs);
        let source = StubSource::new()
            .with_search(
                &queries[0],
                json!({"total_count": 1, "items": [{"login": "dev", "score": 1.0}]}),
            )
            .with_user("dev", user("dev", "2018-01-01T00:00:00Z", true));

        let pipeline = Pipeline::with_source(
            test_config(&dir),
            Arc::new(source),
            Arc::new(PerfRecorder::new()),
        )
        .unwrap();

        pipeline.run(&reqs).await.unwrap();
        let stats_after_first = pipeline.cache_stats();
        pipeline.run(&reqs).await.unwrap();
        let stats_after_second = pipeline.cache_stats();

        assert_eq!(stats_after_first.total_hits(), 0);
        // Second run: search + profile + repos + events all hit.
        assert_eq!(stats_after_second.total_hits(), 4);

        let final_stats = pipeline.close();
        assert!(final_stats.hit_rate() > 0.0);
    }

    #[tokio::test]
    async fn test_run_from_text_uses_injected_extractor() {
        struct FixedExtractor(JobRequirements);

        #[async_trait::async_trait]
        impl RequirementsExtractor for FixedExtractor {
            async fn extract(&self, _job_text: &str) -> Result<JobRequirements, ScoutError> {
                Ok(self.0.clone())
            }
        }

        let dir = TempDir::new().unwrap();
        let pipeline = Pipeline::with_source(
            test_config(&dir),
            Arc::new(StubSource::new()),
            Arc::new(PerfRecorder::new()),
        )
        .unwrap();

        let extractor = FixedExtractor(requirements());
        let ranked = pipeline
            .run_from_text(&extractor, "Senior Python engineer wanted")
            .await
            .unwrap();
        assert!(ranked.is_empty());
    }
}
