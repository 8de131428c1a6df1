//! GitHub REST client with quota handling.
//!
//! On a quota-exhaustion response (403/429 with rate-limit semantics) the
//! client sleeps for a fixed cooldown window and retries the request exactly
//! once; a second quota failure is fatal for that request so a run always
//! terminates. Every call reports its latency to the `PerfSink`.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use super::types::ApiErrorBody;
use super::CandidateSource;
use crate::errors::ScoutError;
use crate::telemetry::PerfSink;

const GITHUB_API_URL: &str = "https://api.github.com";
const USER_AGENT: &str = concat!("scout/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const QUOTA_COOLDOWN: Duration = Duration::from_secs(60);
const SEARCH_PAGE_SIZE: u32 = 30;
const REPOS_PAGE_SIZE: u32 = 100;
const EVENTS_PAGE_SIZE: u32 = 30;

pub struct GithubClient {
    client: Client,
    base_url: String,
    token: Option<String>,
    cooldown: Duration,
    sink: Arc<dyn PerfSink>,
}

impl GithubClient {
    /// `token = None` runs against the unauthenticated quota.
    pub fn new(token: Option<String>, sink: Arc<dyn PerfSink>) -> Self {
        Self::with_base_url(GITHUB_API_URL.to_string(), token, QUOTA_COOLDOWN, sink)
    }

    /// Constructor with an explicit base URL and cooldown, for tests and
    /// GitHub Enterprise hosts.
    pub fn with_base_url(
        base_url: String,
        token: Option<String>,
        cooldown: Duration,
        sink: Arc<dyn PerfSink>,
    ) -> Self {
        GithubClient {
            client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .user_agent(USER_AGENT)
                .build()
                .expect("failed to build HTTP client"),
            base_url,
            token,
            cooldown,
            sink,
        }
    }

    /// Issues one GET with the quota-retry policy and telemetry recording.
    async fn fetch(
        &self,
        operation: &str,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Value, ScoutError> {
        let started = Instant::now();
        let result = self.fetch_with_quota_retry(path, params).await;
        self.sink
            .record(operation, started.elapsed().as_millis() as u64);
        result
    }

    async fn fetch_with_quota_retry(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Value, ScoutError> {
        match self.fetch_once(path, params).await {
            Err(e) if e.is_quota() => {
                warn!(
                    path,
                    cooldown_secs = self.cooldown.as_secs(),
                    "quota exhausted, cooling down before single retry"
                );
                tokio::time::sleep(self.cooldown).await;
                match self.fetch_once(path, params).await {
                    Err(e) if e.is_quota() => Err(ScoutError::QuotaExhausted),
                    other => other,
                }
            }
            other => other,
        }
    }

    async fn fetch_once(&self, path: &str, params: &[(&str, String)]) -> Result<Value, ScoutError> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), path);
        let mut request = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github+json")
            .query(params);

        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|e| e.message)
                .unwrap_or(body);
            return Err(ScoutError::Remote {
                status: status.as_u16(),
                message,
            });
        }

        debug!(path, "GitHub request succeeded");
        Ok(response.json::<Value>().await?)
    }
}

#[async_trait]
impl CandidateSource for GithubClient {
    async fn search_users(&self, query: &str) -> Result<Value, ScoutError> {
        self.fetch(
            "github_search",
            "search/users",
            &[
                ("q", query.to_string()),
                ("per_page", SEARCH_PAGE_SIZE.to_string()),
                ("sort", "followers".to_string()),
                ("order", "desc".to_string()),
            ],
        )
        .await
    }

    async fn user(&self, login: &str) -> Result<Value, ScoutError> {
        self.fetch("github_profile", &format!("users/{login}"), &[])
            .await
    }

    async fn user_repos(&self, login: &str) -> Result<Value, ScoutError> {
        self.fetch(
            "github_repos",
            &format!("users/{login}/repos"),
            &[
                ("per_page", REPOS_PAGE_SIZE.to_string()),
                ("sort", "updated".to_string()),
            ],
        )
        .await
    }

    async fn user_events(&self, login: &str) -> Result<Value, ScoutError> {
        self.fetch(
            "github_events",
            &format!("users/{login}/events/public"),
            &[("per_page", EVENTS_PAGE_SIZE.to_string())],
        )
        .await
    }
}
