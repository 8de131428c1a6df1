//! Wire types for the GitHub REST API, reduced to the fields the pipeline
//! reads. Unknown fields are ignored on deserialization.

use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct SearchUsersResponse {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub items: Vec<SearchUserItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchUserItem {
    pub login: String,
    /// Relevance score; absent when the API omits text-match scoring.
    #[serde(default)]
    pub score: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserResponse {
    pub login: String,
    pub name: Option<String>,
    pub location: Option<String>,
    pub hireable: Option<bool>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepoResponse {
    pub name: String,
    pub description: Option<String>,
    pub language: Option<String>,
    #[serde(default)]
    pub stargazers_count: u32,
    #[serde(default)]
    pub forks_count: u32,
    #[serde(default)]
    pub topics: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventResponse {
    #[serde(rename = "type")]
    pub event_type: String,
}

/// Error body shape GitHub returns for non-2xx responses.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_response_tolerates_missing_score() {
        let json = r#"{"total_count": 1, "items": [{"login": "octocat"}]}"#;
        let parsed: SearchUsersResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.items[0].login, "octocat");
        assert_eq!(parsed.items[0].score, 0.0);
    }

    #[test]
    fn test_user_response_parses_github_shape() {
        let json = r#"{
            "login": "octocat",
            "id": 583231,
            "name": "The Octocat",
            "location": "San Francisco",
            "hireable": null,
            "created_at": "2011-01-25T18:44:36Z",
            "followers": 3938
        }"#;
        let user: UserResponse = serde_json::from_str(json).unwrap();
        assert_eq!(user.login, "octocat");
        assert_eq!(user.hireable, None);
        assert_eq!(user.created_at.timestamp(), 1295981076);
    }

    #[test]
    fn test_repo_response_defaults_topics() {
        let json = r#"{"name": "x", "description": null, "language": "Rust", "stargazers_count": 7, "forks_count": 2}"#;
        let repo: RepoResponse = serde_json::from_str(json).unwrap();
        assert!(repo.topics.is_empty());
        assert_eq!(repo.stargazers_count, 7);
    }

    #[test]
    fn test_event_type_field_renamed() {
        let json = r#"{"type": "PushEvent", "public": true}"#;
        let event: EventResponse = serde_json::from_str(json).unwrap();
        assert_eq!(event.event_type, "PushEvent");
    }
}
