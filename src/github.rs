use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::header::{ACCEPT, LINK};
use reqwest::{Client, Response};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::Credentials;
use crate::error::{RepositoryListError, TrafficFetchError};

pub const DEFAULT_API_URL: &str = "https://api.github.com";
const USER_AGENT: &str = "repo-traffic";

/// One element of the `GET /users/{account}/repos` array.
#[derive(Debug, Deserialize)]
pub struct RepositoryEntry {
    pub full_name: String,
}

pub type RepositoryListResponse = Vec<RepositoryEntry>;

/// Body of `GET /repos/{owner}/{repo}/traffic/views`.
#[derive(Debug, Deserialize)]
pub struct TrafficResponse {
    pub count: u64,
    pub uniques: u64,
    /// Absent or `null` for repositories without any recorded history.
    #[serde(default)]
    pub views: Option<Vec<ViewSample>>,
}

#[derive(Debug, Deserialize)]
pub struct ViewSample {
    pub timestamp: String,
    pub count: u64,
    #[serde(default)]
    pub uniques: u64,
}

#[derive(Clone)]
pub struct GithubClient {
    token: Arc<String>,
    http: Arc<Client>,
    base_url: Arc<String>,
}

impl GithubClient {
    /// Create a REST client for the public GitHub API.
    pub fn new(credentials: &Credentials) -> Result<Self> {
        Self::with_base_url(credentials, DEFAULT_API_URL)
    }

    /// Create a client against another API root (GitHub Enterprise, a local mock).
    pub fn with_base_url(credentials: &Credentials, base_url: &str) -> Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            token: Arc::new(credentials.token.clone()),
            http: Arc::new(http),
            base_url: Arc::new(base_url.trim_end_matches('/').to_string()),
        })
    }

    /// Authenticated GET relative to the API root.
    async fn get(&self, path: &str) -> reqwest::Result<Response> {
        let url = format!("{}{path}", self.base_url);
        debug!(%url, "GET");

        self.http
            .get(url)
            .bearer_auth(&*self.token)
            .header(ACCEPT, "application/vnd.github+json")
            .send()
            .await
    }

    /// Full names (`owner/repo`) of the first page of repositories owned by `account`,
    /// in the order the API returns them.
    pub async fn list_repositories(
        &self,
        account: &str,
    ) -> Result<Vec<String>, RepositoryListError> {
        let resp = self
            .get(&format!("/users/{account}/repos"))
            .await
            .map_err(|source| RepositoryListError::Transport {
                account: account.to_string(),
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(RepositoryListError::Status {
                account: account.to_string(),
                status,
            });
        }

        if has_next_page(&resp) {
            warn!(
                account,
                "repository listing has more pages; only the first page is reported"
            );
        }

        let body = resp
            .text()
            .await
            .map_err(|source| RepositoryListError::Transport {
                account: account.to_string(),
                source,
            })?;

        let parsed: RepositoryListResponse =
            serde_json::from_str(&body).map_err(|source| RepositoryListError::Decode {
                account: account.to_string(),
                source,
            })?;

        Ok(parsed.into_iter().map(|r| r.full_name).collect())
    }

    /// Page-view traffic for one repository, validated against the record invariant.
    pub async fn repo_traffic(
        &self,
        repository: &str,
    ) -> Result<TrafficResponse, TrafficFetchError> {
        let transport = |source| TrafficFetchError::Transport {
            repository: repository.to_string(),
            source,
        };

        let resp = self
            .get(&format!("/repos/{repository}/traffic/views"))
            .await
            .map_err(transport)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(TrafficFetchError::Status {
                repository: repository.to_string(),
                status,
            });
        }

        let body = resp.text().await.map_err(transport)?;
        let parsed: TrafficResponse =
            serde_json::from_str(&body).map_err(|source| TrafficFetchError::Decode {
                repository: repository.to_string(),
                source,
            })?;

        if parsed.uniques > parsed.count {
            return Err(TrafficFetchError::Invalid {
                repository: repository.to_string(),
                count: parsed.count,
                uniques: parsed.uniques,
            });
        }

        Ok(parsed)
    }
}

fn has_next_page(resp: &Response) -> bool {
    resp.headers()
        .get_all(LINK)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|v| v.contains("rel=\"next\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn traffic_without_views_decodes() {
        let parsed: TrafficResponse = serde_json::from_str(r#"{"count":0,"uniques":0}"#).unwrap();
        assert!(parsed.views.is_none());

        let parsed: TrafficResponse =
            serde_json::from_str(r#"{"count":0,"uniques":0,"views":null}"#).unwrap();
        assert!(parsed.views.is_none());
    }

    #[test]
    fn traffic_missing_count_fails() {
        let parsed = serde_json::from_str::<TrafficResponse>(r#"{"uniques":3,"views":[]}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn repository_entries_ignore_extra_fields() {
        let parsed: RepositoryListResponse = serde_json::from_str(
            r#"[{"id":1,"full_name":"acct/a","private":false},{"full_name":"acct/b"}]"#,
        )
        .unwrap();
        let names: Vec<_> = parsed.into_iter().map(|r| r.full_name).collect();
        assert_eq!(names, ["acct/a", "acct/b"]);
    }

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let creds = Credentials {
            token: "t".into(),
            account: "a".into(),
        };
        let client = GithubClient::with_base_url(&creds, "http://localhost:1234/").unwrap();
        assert_eq!(client.base_url.as_str(), "http://localhost:1234");
    }
}
