//! Remote candidate source — the trait seam every pipeline stage fetches
//! through, plus the GitHub implementation.
//!
//! ARCHITECTURAL RULE: no other module may talk to the GitHub API directly.
//! All remote calls go through a `CandidateSource`.

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::ScoutError;

pub mod github;
#[cfg(test)]
pub mod testing;
pub mod types;

pub use github::GithubClient;

/// The four endpoints the pipeline needs, returned as raw JSON so callers
/// can cache the payload before deserializing.
#[async_trait]
pub trait CandidateSource: Send + Sync {
    /// Search endpoint: query string, sorted by follower count.
    async fn search_users(&self, query: &str) -> Result<Value, ScoutError>;

    /// Profile-by-handle endpoint.
    async fn user(&self, login: &str) -> Result<Value, ScoutError>;

    /// Repository list for a handle.
    async fn user_repos(&self, login: &str) -> Result<Value, ScoutError>;

    /// Recent public activity events for a handle.
    async fn user_events(&self, login: &str) -> Result<Value, ScoutError>;
}
