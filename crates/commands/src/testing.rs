//! In-memory [`RepoClient`] that records every call.

use std::collections::BTreeSet;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::{
    CommitSha, DispatchEventType, DispatchPayload, IssueNumber, Joke, NewIssue, OwnerName,
    PullRequestHead, RepoClient, RepoClientError, RepositoryName, WorkflowRun, WorkflowRunId,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    GetPullRequest(String),
    ListFailedRuns(String),
    Rerun(u64),
    AddAssignees(u64, Vec<String>),
    CreateComment(u64, String),
    Dispatch(String, DispatchPayload),
    CreateIssue(String, NewIssue),
    FetchJoke(String),
}

#[derive(Default)]
pub(crate) struct RecordingClient {
    pub(crate) pull_request: Option<PullRequestHead>,
    pub(crate) failed_runs: Vec<WorkflowRun>,
    pub(crate) joke: Joke,
    /// `owner/repo` targets whose `create_issue` call fails.
    pub(crate) failing_issue_repos: BTreeSet<String>,
    pub(crate) failing_runs: BTreeSet<u64>,
    calls: Mutex<Vec<Call>>,
}

impl RecordingClient {
    pub(crate) fn with_pull_request(mut self) -> Self {
        self.pull_request = Some(PullRequestHead {
            head_sha: CommitSha::new("0123abcd").unwrap(),
            head_repo_full_name: "contributor/dapr".to_string(),
        });
        self
    }

    pub(crate) fn with_joke(mut self, joke: Joke) -> Self {
        self.joke = joke;
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

fn server_error(operation: &str) -> RepoClientError {
    RepoClientError::Status {
        operation: operation.to_string(),
        status: 500,
        body: "boom".to_string(),
    }
}

#[async_trait]
impl RepoClient for RecordingClient {
    async fn get_pull_request(
        &self,
        owner: &OwnerName,
        repo: &RepositoryName,
        number: IssueNumber,
    ) -> Result<Option<PullRequestHead>, RepoClientError> {
        self.record(Call::GetPullRequest(format!("{owner}/{repo}#{number}")));
        Ok(self.pull_request.clone())
    }

    async fn list_failed_workflow_runs(
        &self,
        _owner: &OwnerName,
        _repo: &RepositoryName,
        head_sha: &CommitSha,
    ) -> Result<Vec<WorkflowRun>, RepoClientError> {
        self.record(Call::ListFailedRuns(head_sha.to_string()));
        Ok(self.failed_runs.clone())
    }

    async fn rerun_failed_jobs(
        &self,
        _owner: &OwnerName,
        _repo: &RepositoryName,
        run_id: WorkflowRunId,
    ) -> Result<(), RepoClientError> {
        self.record(Call::Rerun(run_id.as_u64()));
        if self.failing_runs.contains(&run_id.as_u64()) {
            return Err(server_error("re-run failed jobs"));
        }
        Ok(())
    }

    async fn add_assignees(
        &self,
        _owner: &OwnerName,
        _repo: &RepositoryName,
        issue: IssueNumber,
        assignees: &[String],
    ) -> Result<(), RepoClientError> {
        self.record(Call::AddAssignees(issue.as_u64(), assignees.to_vec()));
        Ok(())
    }

    async fn create_comment(
        &self,
        _owner: &OwnerName,
        _repo: &RepositoryName,
        issue: IssueNumber,
        body: &str,
    ) -> Result<(), RepoClientError> {
        self.record(Call::CreateComment(issue.as_u64(), body.to_string()));
        Ok(())
    }

    async fn create_dispatch_event(
        &self,
        _owner: &OwnerName,
        _repo: &RepositoryName,
        event_type: &DispatchEventType,
        payload: &DispatchPayload,
    ) -> Result<(), RepoClientError> {
        self.record(Call::Dispatch(event_type.to_string(), payload.clone()));
        Ok(())
    }

    async fn create_issue(
        &self,
        owner: &OwnerName,
        repo: &RepositoryName,
        issue: &NewIssue,
    ) -> Result<(), RepoClientError> {
        let target = format!("{owner}/{repo}");
        self.record(Call::CreateIssue(target.clone(), issue.clone()));
        if self.failing_issue_repos.contains(&target) {
            return Err(server_error("create issue"));
        }
        Ok(())
    }

    async fn fetch_joke(&self, url: &str) -> Result<Joke, RepoClientError> {
        self.record(Call::FetchJoke(url.to_string()));
        Ok(self.joke.clone())
    }
}
