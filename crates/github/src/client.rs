use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

use commands::{
    CommitSha, DispatchEventType, DispatchPayload, IssueNumber, Joke, NewIssue, OwnerName,
    PullRequestHead, RepoClient, RepoClientError, RepositoryName, WorkflowRun, WorkflowRunId,
};

use crate::wire::{
    AssigneesRequest, CommentRequest, DispatchRequest, PullRequest, WorkflowRunsPage,
};

/// Public GitHub REST endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

const API_VERSION: &str = "2022-11-28";
const RUNS_PER_PAGE: usize = 100;
const ERROR_BODY_LIMIT: usize = 800;

/// Errors raised while constructing a [`GithubClient`].
#[derive(Debug, Error)]
pub enum GithubClientError {
    /// The token or user agent contains characters not valid in an HTTP header.
    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    /// The underlying HTTP client could not be built (e.g. TLS backend setup).
    #[error("failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

/// Connection settings for [`GithubClient`].
#[derive(Debug, Clone)]
pub struct GithubClientSettings {
    /// REST base URL, e.g. [`DEFAULT_API_BASE`] or a GitHub Enterprise `/api/v3` URL.
    pub api_base: String,
    /// Token sent as `Authorization: Bearer <token>`.
    pub token: String,
    /// Applied to every request, GitHub and joke service alike.
    pub timeout: Duration,
    pub user_agent: String,
}

impl GithubClientSettings {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            token: token.into(),
            timeout: Duration::from_secs(30),
            user_agent: concat!("repobot/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// [`RepoClient`] over the GitHub REST API.
#[derive(Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    /// No GitHub credentials; used for third-party URLs.
    anonymous: reqwest::Client,
    api_base: String,
}

impl std::fmt::Debug for GithubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubClient")
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}

impl GithubClient {
    pub fn new(settings: GithubClientSettings) -> Result<Self, GithubClientError> {
        let user_agent = HeaderValue::from_str(&settings.user_agent)?;

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, user_agent.clone());
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert("x-github-api-version", HeaderValue::from_static(API_VERSION));
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", settings.token.trim()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(settings.timeout)
            .build()?;

        let mut anonymous_headers = HeaderMap::new();
        anonymous_headers.insert(USER_AGENT, user_agent);
        anonymous_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let anonymous = reqwest::Client::builder()
            .default_headers(anonymous_headers)
            .timeout(settings.timeout)
            .build()?;

        Ok(Self {
            http,
            anonymous,
            api_base: settings.api_base.trim_end_matches('/').to_string(),
        })
    }

    fn repo_url(&self, owner: &OwnerName, repo: &RepositoryName, path: &str) -> String {
        format!("{}/repos/{owner}/{repo}{path}", self.api_base)
    }

    /// Sends `request` once and fails on any non-success status.
    async fn send(
        &self,
        operation: &str,
        request: RequestBuilder,
    ) -> Result<Response, RepoClientError> {
        let response = request
            .send()
            .await
            .map_err(|error| transport_error(operation, error))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        Err(status_error(operation, response).await)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        operation: &str,
        request: RequestBuilder,
    ) -> Result<T, RepoClientError> {
        self.send(operation, request)
            .await?
            .json::<T>()
            .await
            .map_err(|error| RepoClientError::Decode {
                operation: operation.to_string(),
                message: error.to_string(),
            })
    }
}

#[async_trait]
impl RepoClient for GithubClient {
    #[tracing::instrument(level = "debug", skip_all, fields(owner = %owner, repo = %repo, number = %number))]
    async fn get_pull_request(
        &self,
        owner: &OwnerName,
        repo: &RepositoryName,
        number: IssueNumber,
    ) -> Result<Option<PullRequestHead>, RepoClientError> {
        const OPERATION: &str = "get pull request";
        let response = self
            .http
            .get(self.repo_url(owner, repo, &format!("/pulls/{number}")))
            .send()
            .await
            .map_err(|error| transport_error(OPERATION, error))?;
        if response.status() == StatusCode::NOT_FOUND {
            debug!("pull request does not exist");
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(status_error(OPERATION, response).await);
        }

        let pull: PullRequest = response
            .json()
            .await
            .map_err(|error| RepoClientError::Decode {
                operation: OPERATION.to_string(),
                message: error.to_string(),
            })?;
        let head = pull.into_head();
        if head.is_none() {
            warn!("pull request head has no repository or sha");
        }
        Ok(head)
    }

    #[tracing::instrument(level = "debug", skip_all, fields(owner = %owner, repo = %repo, head_sha = %head_sha))]
    async fn list_failed_workflow_runs(
        &self,
        owner: &OwnerName,
        repo: &RepositoryName,
        head_sha: &CommitSha,
    ) -> Result<Vec<WorkflowRun>, RepoClientError> {
        let url = self.repo_url(owner, repo, "/actions/runs");
        let per_page = RUNS_PER_PAGE.to_string();
        let mut runs = Vec::new();
        let mut page = 1_u32;
        loop {
            let page_value = page.to_string();
            let chunk: WorkflowRunsPage = self
                .send_json(
                    "list workflow runs",
                    self.http.get(&url).query(&[
                        ("head_sha", head_sha.as_str()),
                        ("event", "pull_request"),
                        ("status", "failure"),
                        ("per_page", per_page.as_str()),
                        ("page", page_value.as_str()),
                    ]),
                )
                .await?;
            let chunk_len = chunk.workflow_runs.len();
            runs.extend(chunk.workflow_runs.into_iter().map(WorkflowRun::from));
            if chunk_len < RUNS_PER_PAGE || runs.len() as u64 >= chunk.total_count {
                break;
            }
            page = page.saturating_add(1);
        }
        debug!(count = runs.len(), "listed failed workflow runs");
        Ok(runs)
    }

    #[tracing::instrument(level = "debug", skip_all, fields(owner = %owner, repo = %repo, run_id = %run_id))]
    async fn rerun_failed_jobs(
        &self,
        owner: &OwnerName,
        repo: &RepositoryName,
        run_id: WorkflowRunId,
    ) -> Result<(), RepoClientError> {
        let url = self.repo_url(owner, repo, &format!("/actions/runs/{run_id}/rerun-failed-jobs"));
        self.send("re-run failed jobs", self.http.post(url)).await?;
        Ok(())
    }

    #[tracing::instrument(level = "debug", skip_all, fields(owner = %owner, repo = %repo, issue = %issue))]
    async fn add_assignees(
        &self,
        owner: &OwnerName,
        repo: &RepositoryName,
        issue: IssueNumber,
        assignees: &[String],
    ) -> Result<(), RepoClientError> {
        let url = self.repo_url(owner, repo, &format!("/issues/{issue}/assignees"));
        self.send(
            "add assignees",
            self.http.post(url).json(&AssigneesRequest { assignees }),
        )
        .await?;
        Ok(())
    }

    #[tracing::instrument(level = "debug", skip_all, fields(owner = %owner, repo = %repo, issue = %issue))]
    async fn create_comment(
        &self,
        owner: &OwnerName,
        repo: &RepositoryName,
        issue: IssueNumber,
        body: &str,
    ) -> Result<(), RepoClientError> {
        let url = self.repo_url(owner, repo, &format!("/issues/{issue}/comments"));
        self.send(
            "create comment",
            self.http.post(url).json(&CommentRequest { body }),
        )
        .await?;
        Ok(())
    }

    #[tracing::instrument(level = "debug", skip_all, fields(owner = %owner, repo = %repo, event_type = %event_type))]
    async fn create_dispatch_event(
        &self,
        owner: &OwnerName,
        repo: &RepositoryName,
        event_type: &DispatchEventType,
        payload: &DispatchPayload,
    ) -> Result<(), RepoClientError> {
        let url = self.repo_url(owner, repo, "/dispatches");
        let request = DispatchRequest {
            event_type: event_type.as_str(),
            client_payload: payload,
        };
        self.send(
            "create dispatch event",
            self.http.post(url).json(&request),
        )
        .await?;
        Ok(())
    }

    #[tracing::instrument(level = "debug", skip_all, fields(owner = %owner, repo = %repo, title = %issue.title))]
    async fn create_issue(
        &self,
        owner: &OwnerName,
        repo: &RepositoryName,
        issue: &NewIssue,
    ) -> Result<(), RepoClientError> {
        let url = self.repo_url(owner, repo, "/issues");
        self.send("create issue", self.http.post(url).json(issue))
            .await?;
        Ok(())
    }

    #[tracing::instrument(level = "debug", skip_all, fields(url = %url))]
    async fn fetch_joke(&self, url: &str) -> Result<Joke, RepoClientError> {
        const OPERATION: &str = "fetch joke";
        let response = self.send(OPERATION, self.anonymous.get(url)).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|error| transport_error(OPERATION, error))?;
        match serde_json::from_slice::<Joke>(&bytes) {
            Ok(joke) => Ok(joke),
            Err(error) => {
                debug!(%error, "joke response is not a joke");
                Ok(Joke::default())
            }
        }
    }
}

fn transport_error(operation: &str, error: reqwest::Error) -> RepoClientError {
    RepoClientError::Transport {
        operation: operation.to_string(),
        message: error.to_string(),
    }
}

async fn status_error(operation: &str, response: Response) -> RepoClientError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    RepoClientError::Status {
        operation: operation.to_string(),
        status,
        body: truncate_for_error(&body, ERROR_BODY_LIMIT),
    }
}

fn truncate_for_error(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let truncated: String = text.chars().take(limit).collect();
    format!("{truncated}...")
}
