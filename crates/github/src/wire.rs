//! GitHub REST response and request bodies.
//!
//! Only the fields the bot reads are modelled; serde ignores the rest.

use serde::{Deserialize, Serialize};

use commands::{CommitSha, DispatchPayload, PullRequestHead, WorkflowRun, WorkflowRunId};

#[derive(Debug, Deserialize)]
pub(crate) struct PullRequest {
    pub(crate) head: PullRequestHeadRef,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PullRequestHeadRef {
    pub(crate) sha: String,
    /// `null` when the fork the pull request came from has been deleted.
    pub(crate) repo: Option<Repository>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Repository {
    pub(crate) full_name: String,
}

impl PullRequest {
    /// Converts to the domain type; `None` when the head cannot be targeted.
    pub(crate) fn into_head(self) -> Option<PullRequestHead> {
        Some(PullRequestHead {
            head_sha: CommitSha::new(self.head.sha)?,
            head_repo_full_name: self.head.repo?.full_name,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WorkflowRunsPage {
    pub(crate) total_count: u64,
    pub(crate) workflow_runs: Vec<WorkflowRunRow>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WorkflowRunRow {
    pub(crate) id: u64,
    #[serde(default)]
    pub(crate) name: Option<String>,
}

impl From<WorkflowRunRow> for WorkflowRun {
    fn from(row: WorkflowRunRow) -> Self {
        WorkflowRun {
            id: WorkflowRunId::new(row.id),
            name: row.name.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct AssigneesRequest<'a> {
    pub(crate) assignees: &'a [String],
}

#[derive(Debug, Serialize)]
pub(crate) struct CommentRequest<'a> {
    pub(crate) body: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct DispatchRequest<'a> {
    pub(crate) event_type: &'a str,
    pub(crate) client_payload: &'a DispatchPayload,
}
