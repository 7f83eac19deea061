//! The `RepoClient` port.
//!
//! Everything the router does to the outside world goes through this trait.
//! The `github` crate implements it over the GitHub REST API; tests implement
//! it in memory.

use async_trait::async_trait;

use crate::{
    CommitSha, DispatchEventType, DispatchPayload, IssueNumber, Joke, NewIssue, OwnerName,
    PullRequestHead, RepoClientError, RepositoryName, WorkflowRun, WorkflowRunId,
};

/// Repository operations used by the command handlers.
///
/// Every method is a single request/response exchange. Implementations must
/// not retry on their own.
#[async_trait]
pub trait RepoClient: Send + Sync {
    /// Looks up a pull request. Returns `Ok(None)` when it does not exist or
    /// carries no usable head.
    async fn get_pull_request(
        &self,
        owner: &OwnerName,
        repo: &RepositoryName,
        number: IssueNumber,
    ) -> Result<Option<PullRequestHead>, RepoClientError>;

    /// Lists the workflow runs for `head_sha` that were triggered by a
    /// `pull_request` event and finished with `status=failure`.
    async fn list_failed_workflow_runs(
        &self,
        owner: &OwnerName,
        repo: &RepositoryName,
        head_sha: &CommitSha,
    ) -> Result<Vec<WorkflowRun>, RepoClientError>;

    /// Re-runs only the failed jobs of a workflow run.
    async fn rerun_failed_jobs(
        &self,
        owner: &OwnerName,
        repo: &RepositoryName,
        run_id: WorkflowRunId,
    ) -> Result<(), RepoClientError>;

    async fn add_assignees(
        &self,
        owner: &OwnerName,
        repo: &RepositoryName,
        issue: IssueNumber,
        assignees: &[String],
    ) -> Result<(), RepoClientError>;

    async fn create_comment(
        &self,
        owner: &OwnerName,
        repo: &RepositoryName,
        issue: IssueNumber,
        body: &str,
    ) -> Result<(), RepoClientError>;

    /// Fires a `repository_dispatch` event.
    async fn create_dispatch_event(
        &self,
        owner: &OwnerName,
        repo: &RepositoryName,
        event_type: &DispatchEventType,
        payload: &DispatchPayload,
    ) -> Result<(), RepoClientError>;

    async fn create_issue(
        &self,
        owner: &OwnerName,
        repo: &RepositoryName,
        issue: &NewIssue,
    ) -> Result<(), RepoClientError>;

    /// Fetches a joke from `url`.
    ///
    /// A response that cannot be read as a joke is returned as a [`Joke`] with
    /// missing fields rather than as an error.
    async fn fetch_joke(&self, url: &str) -> Result<Joke, RepoClientError>;
}
