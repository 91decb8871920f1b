//! GitHub API client.

use reqwest::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;

use crate::auth::Auth;
use crate::error::{Error, Result};
use crate::types::{
    ApiPullRequest, CommitStatus, CreateComment, IssueComment, PullRequest, Repository,
};

/// Page size used for list endpoints (GitHub's maximum).
const PER_PAGE: usize = 100;

/// GitHub API client.
pub struct GitHubClient {
    client: Client,
    base_url: String,
    token: SecretString,
}

impl GitHubClient {
    /// Default GitHub API URL.
    pub const DEFAULT_API_URL: &'static str = "https://api.github.com";

    /// Create a GitHub client for `base_url` ([`Self::DEFAULT_API_URL`] or a
    /// GitHub Enterprise endpoint).
    ///
    /// # Errors
    /// Returns error if authentication fails.
    pub fn with_base_url(auth: &Auth, base_url: impl Into<String>) -> Result<Self> {
        let token = auth.resolve()?;

        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static("retest-bot"));
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        })
    }

    /// API base URL this client talks to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn bearer(&self) -> Result<HeaderValue> {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", self.token.expose_secret()))?;
        value.set_sensitive(true);
        Ok(value)
    }

    /// Make a GET request.
    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .header(AUTHORIZATION, self.bearer()?)
            .send()
            .await?;

        self.handle_response(path, response).await
    }

    /// GET every page of a list endpoint.
    async fn get_all<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let separator = if path.contains('?') { '&' } else { '?' };
        let mut items = Vec::new();

        for page in 1.. {
            let batch: Vec<T> = self
                .get(&format!("{path}{separator}per_page={PER_PAGE}&page={page}"))
                .await?;
            let last = batch.len() < PER_PAGE;
            items.extend(batch);
            if last {
                break;
            }
        }

        Ok(items)
    }

    /// Make a POST request.
    async fn post<T: DeserializeOwned, B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, self.bearer()?)
            .json(body)
            .send()
            .await?;

        self.handle_response(path, response).await
    }

    /// Handle API response.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        path: &str,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();

        if status.is_success() {
            let body = response.json().await?;
            return Ok(body);
        }

        // Handle error responses
        let status_code = status.as_u16();

        match status_code {
            401 => Err(Error::AuthenticationFailed),
            403 if response
                .headers()
                .get("x-ratelimit-remaining")
                .is_some_and(|v| v == "0") =>
            {
                Err(Error::RateLimited)
            }
            404 => Err(Error::NotFound(path.to_string())),
            _ => {
                let text = response.text().await.unwrap_or_default();
                Err(Error::ApiError {
                    status: status_code,
                    message: text,
                })
            }
        }
    }

    // === Repository ===

    /// Get repository metadata.
    ///
    /// # Errors
    /// Returns error if the repository is not visible or the API call fails.
    pub async fn get_repository(&self, owner: &str, repo: &str) -> Result<Repository> {
        self.get(&format!("/repos/{owner}/{repo}")).await
    }

    // === PR Operations ===

    /// List open pull requests.
    ///
    /// # Errors
    /// Returns error if API call fails.
    pub async fn list_pull_requests(&self, owner: &str, repo: &str) -> Result<Vec<PullRequest>> {
        let prs: Vec<ApiPullRequest> = self
            .get_all(&format!("/repos/{owner}/{repo}/pulls?state=open"))
            .await?;

        Ok(prs.into_iter().map(PullRequest::from).collect())
    }

    // === Commit Statuses ===

    /// List statuses for a commit, newest first.
    ///
    /// # Errors
    /// Returns error if API call fails.
    pub async fn list_statuses(
        &self,
        owner: &str,
        repo: &str,
        commit_sha: &str,
    ) -> Result<Vec<CommitStatus>> {
        self.get_all(&format!(
            "/repos/{owner}/{repo}/commits/{commit_sha}/statuses"
        ))
        .await
    }

    // === Comment Operations ===

    /// List comments on a pull request.
    ///
    /// # Errors
    /// Returns error if request fails.
    pub async fn list_pr_comments(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> Result<Vec<IssueComment>> {
        self.get_all(&format!(
            "/repos/{owner}/{repo}/issues/{pr_number}/comments"
        ))
        .await
    }

    /// Create a comment on a pull request.
    ///
    /// # Errors
    /// Returns error if request fails.
    pub async fn create_pr_comment(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
        comment: CreateComment,
    ) -> Result<IssueComment> {
        self.post(
            &format!("/repos/{owner}/{repo}/issues/{pr_number}/comments"),
            &comment,
        )
        .await
    }
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("base_url", &self.base_url)
            .field("token", &"[redacted]")
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn token(value: &str) -> Auth {
        Auth::Token(SecretString::from(value.to_string()))
    }

    #[test]
    fn test_client_requires_token() {
        let result = GitHubClient::with_base_url(&token(""), GitHubClient::DEFAULT_API_URL);
        assert!(matches!(result, Err(Error::NoToken)));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client =
            GitHubClient::with_base_url(&token("t"), "https://ghe.example.com/api/v3/").unwrap();
        assert_eq!(client.base_url(), "https://ghe.example.com/api/v3");
    }

    #[test]
    fn test_debug_redacts_token() {
        let client =
            GitHubClient::with_base_url(&token("ghp_supersecret"), GitHubClient::DEFAULT_API_URL)
                .unwrap();
        let debug = format!("{client:?}");
        assert!(debug.contains("[redacted]"));
        assert!(!debug.contains("ghp_supersecret"));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_http_error() {
        // Port 9 (discard) on localhost is not an HTTP server.
        let client = GitHubClient::with_base_url(&token("t"), "http://127.0.0.1:9").unwrap();
        let err = client.list_pull_requests("octo", "widgets").await.unwrap_err();
        assert!(matches!(err, Error::Http(_)));
    }
}
