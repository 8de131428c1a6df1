//! Search stage — runs the built queries through the cache-then-fetch path
//! and deduplicates the merged results by identity handle.

use std::collections::HashSet;
use std::time::Duration;

use serde_json::Value;
use tracing::{info, warn};

use crate::cache::{cache_key, CacheStore};
use crate::models::candidate::CandidateIdentity;
use crate::source::types::SearchUsersResponse;
use crate::source::CandidateSource;

/// Executes each query, merging results into a deduplicated identity list.
///
/// Search is best-effort: a failing query is logged and skipped, and the
/// remaining queries still run. Deduplication keeps the first occurrence of
/// a handle, so query order decides which search score wins.
pub async fn search(
    source: &dyn CandidateSource,
    cache: &CacheStore,
    ttl: Duration,
    queries: &[String],
) -> Vec<CandidateIdentity> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut identities: Vec<CandidateIdentity> = Vec::new();

    for query in queries {
        let payload = match cached_search(source, cache, ttl, query).await {
            Ok(payload) => payload,
            Err(e) => {
                warn!(query = %query, error = %e, "search query failed, continuing with remaining queries");
                continue;
            }
        };

        let response: SearchUsersResponse = match serde_json::from_value(payload) {
            Ok(response) => response,
            Err(e) => {
                warn!(query = %query, error = %e, "unexpected search response shape, skipping query");
                continue;
            }
        };

        for item in response.items {
            if seen.insert(item.login.clone()) {
                identities.push(CandidateIdentity {
                    login: item.login,
                    search_score: item.score,
                });
            }
        }
    }

    info!(
        queries = queries.len(),
        candidates = identities.len(),
        "search complete"
    );
    identities
}

async fn cached_search(
    source: &dyn CandidateSource,
    cache: &CacheStore,
    ttl: Duration,
    query: &str,
) -> Result<Value, crate::errors::ScoutError> {
    let key = cache_key("search", &[query]);
    if let Some(payload) = cache.get(&key) {
        return Ok(payload);
    }
    let payload = source.search_users(query).await?;
    cache.set(&key, payload.clone(), ttl);
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ScoutError;
    use crate::source::testing::StubSource;
    use serde_json::json;
    use tempfile::TempDir;

    const TTL: Duration = Duration::from_secs(60);

    fn search_payload(logins: &[(&str, f64)]) -> Value {
        json!({
            "total_count": logins.len(),
            "items": logins
                .iter()
                .map(|(login, score)| json!({"login": login, "score": score}))
                .collect::<Vec<_>>(),
        })
    }

    fn open_cache(dir: &TempDir) -> CacheStore {
        CacheStore::open(dir.path(), 16).unwrap()
    }

    #[tokio::test]
    async fn test_duplicate_handles_collapse_to_first_seen() {
        let dir = TempDir::new().unwrap();
        let cache = open_cache(&dir);
        let source = StubSource::new()
            .with_search("q1", search_payload(&[("alice", 9.0), ("bob", 5.0)]))
            .with_search("q2", search_payload(&[("alice", 2.0), ("carol", 4.0)]));

        let identities = search(&source, &cache, TTL, &["q1".into(), "q2".into()]).await;

        let logins: Vec<&str> = identities.iter().map(|i| i.login.as_str()).collect();
        assert_eq!(logins, vec!["alice", "bob", "carol"]);
        // First occurrence wins: alice keeps q1's score.
        assert_eq!(identities[0].search_score, 9.0);
    }

    #[tokio::test]
    async fn test_failed_query_does_not_abort_search() {
        let dir = TempDir::new().unwrap();
        let cache = open_cache(&dir);
        let source = StubSource::new()
            .with_search_error("broken", || ScoutError::Remote {
                status: 422,
                message: "Validation Failed".to_string(),
            })
            .with_search("ok", search_payload(&[("dave", 1.0)]));

        let identities = search(&source, &cache, TTL, &["broken".into(), "ok".into()]).await;
        assert_eq!(identities.len(), 1);
        assert_eq!(identities[0].login, "dave");
    }

    #[tokio::test]
    async fn test_cache_hit_skips_network_call() {
        let dir = TempDir::new().unwrap();
        let cache = open_cache(&dir);
        let source = StubSource::new().with_search("q", search_payload(&[("erin", 3.0)]));

        search(&source, &cache, TTL, &["q".into()]).await;
        search(&source, &cache, TTL, &["q".into()]).await;

        assert_eq!(source.search_calls(), 1, "second run must be served from cache");
    }

    #[tokio::test]
    async fn test_all_queries_failing_yields_empty_result() {
        let dir = TempDir::new().unwrap();
        let cache = open_cache(&dir);
        let source = StubSource::new();

        let identities = search(&source, &cache, TTL, &["unknown".into()]).await;
        assert!(identities.is_empty());
    }
}
