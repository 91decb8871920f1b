//! [`RepoHost`] backed by the GitHub REST API.

use retest_core::{Comment, PullRequest, PullRequestState, RepoHost, RepoSlug, StatusCheck};
use retest_github::{CreateComment, GitHubClient};

/// One GitHub repository seen through [`RepoHost`].
#[derive(Debug)]
pub struct GitHubHost {
    client: GitHubClient,
    repo: RepoSlug,
}

impl GitHubHost {
    pub const fn new(client: GitHubClient, repo: RepoSlug) -> Self {
        Self { client, repo }
    }
}

impl RepoHost for GitHubHost {
    type Error = retest_github::Error;

    async fn list_pull_requests(&self) -> Result<Vec<PullRequest>, Self::Error> {
        let prs = self
            .client
            .list_pull_requests(self.repo.owner(), self.repo.name())
            .await?;

        Ok(prs
            .into_iter()
            .map(|pr| PullRequest {
                number: pr.number,
                title: pr.title,
                state: match pr.state {
                    retest_github::PullRequestState::Open => PullRequestState::Open,
                    retest_github::PullRequestState::Closed => PullRequestState::Closed,
                },
                labels: pr.labels,
                head_sha: pr.head_sha,
                author: pr.author,
            })
            .collect())
    }

    async fn list_statuses(&self, commit_sha: &str) -> Result<Vec<StatusCheck>, Self::Error> {
        let statuses = self
            .client
            .list_statuses(self.repo.owner(), self.repo.name(), commit_sha)
            .await?;

        Ok(statuses
            .into_iter()
            .map(|s| StatusCheck {
                context: s.context,
                state: s.state,
                target_url: s.target_url,
            })
            .collect())
    }

    async fn list_comments(&self, pr_number: u64) -> Result<Vec<Comment>, Self::Error> {
        let comments = self
            .client
            .list_pr_comments(self.repo.owner(), self.repo.name(), pr_number)
            .await?;

        Ok(comments
            .into_iter()
            .map(|c| Comment::new(c.body.unwrap_or_default()))
            .collect())
    }

    async fn create_comment(&self, pr_number: u64, body: &str) -> Result<(), Self::Error> {
        self.client
            .create_pr_comment(
                self.repo.owner(),
                self.repo.name(),
                pr_number,
                CreateComment {
                    body: body.to_string(),
                },
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use retest_github::Auth;
    use secrecy::SecretString;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn host_for(server: &MockServer) -> GitHubHost {
        let auth = Auth::Token(SecretString::from("t".to_string()));
        let client = GitHubClient::with_base_url(&auth, server.uri()).unwrap();
        GitHubHost::new(client, RepoSlug::parse("octo/widgets").unwrap())
    }

    #[tokio::test]
    async fn test_pull_requests_map_to_domain() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/widgets/pulls"))
            .and(query_param("state", "open"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "number": 12,
                    "title": "Add widgets",
                    "state": "open",
                    "labels": [{"name": "Ready-To-Test"}, {"name": "area/ui"}],
                    "head": {"ref": "feature", "sha": "deadbeef"},
                    "user": {"login": "alice"}
                },
                {
                    "number": 13,
                    "title": null,
                    "state": "closed",
                    "head": {"sha": "cafe"},
                    "user": null
                }
            ])))
            .mount(&server)
            .await;

        let prs = host_for(&server).list_pull_requests().await.unwrap();

        assert_eq!(prs.len(), 2);
        assert_eq!(prs[0].number, 12);
        assert_eq!(prs[0].labels, ["Ready-To-Test", "area/ui"]);
        assert!(prs[0].has_label("ready-to-test"));
        assert_eq!(prs[0].head_sha, "deadbeef");
        assert_eq!(prs[0].author, "alice");
        assert!(prs[0].is_open());

        assert_eq!(prs[1].title, "");
        assert_eq!(prs[1].author, "");
        assert!(!prs[1].is_open());
    }

    #[tokio::test]
    async fn test_statuses_and_comments_map_to_domain() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/widgets/commits/deadbeef/statuses"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"context": "ci/build", "state": "failure", "target_url": "http://logs/1"},
                {"context": "ci/lint", "state": "success", "target_url": null}
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/widgets/issues/12/comments"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "body": "/retest ci/build"},
                {"id": 2, "body": null}
            ])))
            .mount(&server)
            .await;

        let host = host_for(&server);
        let statuses = host.list_statuses("deadbeef").await.unwrap();
        let comments = host.list_comments(12).await.unwrap();

        assert_eq!(statuses[0].context, "ci/build");
        assert_eq!(statuses[0].target_url_or_empty(), "http://logs/1");
        assert_eq!(statuses[1].target_url_or_empty(), "");
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].body, "/retest ci/build");
        assert_eq!(comments[1].body, "");
    }

    #[tokio::test]
    async fn test_create_comment_posts_to_issue_thread() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/repos/octo/widgets/issues/12/comments"))
            .and(body_json(json!({"body": "/retest ci/build"})))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(json!({"id": 9, "body": "/retest ci/build"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        host_for(&server)
            .create_comment(12, "/retest ci/build")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_missing_repository_surfaces_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/widgets/pulls"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = host_for(&server).list_pull_requests().await.unwrap_err();
        assert!(matches!(err, retest_github::Error::NotFound(_)));
    }
}
