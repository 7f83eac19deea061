//! Shared value types for the bot domain.
//!
//! Where [`crate::identifiers`] holds single scalar names and numbers, these
//! are the composite values: the inbound [`Event`], the issue it targets, and the
//! data exchanged with [`crate::RepoClient`].

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    CommentId, CommitSha, IssueNumber, LabelName, OwnerName, RepositoryName, UserId,
    WorkflowRunId,
};

// ---------------------------------------------------------------------------
// Issue reference
// ---------------------------------------------------------------------------

/// The issue (or pull request) an event refers to, mirrored from the webhook.
///
/// Embedded in every dispatch payload as `{owner, repo, number}`; the
/// assignee set is only consulted by `/assign` and is not serialised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueRef {
    /// Owner of the repository the issue lives in.
    pub owner: OwnerName,
    /// Repository the issue lives in.
    pub repo: RepositoryName,
    /// Issue or pull request number.
    pub number: IssueNumber,
    /// Logins currently assigned to the issue.
    #[serde(skip_serializing)]
    pub assignees: BTreeSet<String>,
}

impl IssueRef {
    /// Creates a reference with no assignees.
    pub fn new(owner: OwnerName, repo: RepositoryName, number: IssueNumber) -> Self {
        Self {
            owner,
            repo,
            number,
            assignees: BTreeSet::new(),
        }
    }

    /// Returns the same reference with `assignees` replaced.
    pub fn with_assignees<I, S>(mut self, assignees: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.assignees = assignees.into_iter().map(Into::into).collect();
        self
    }

    /// Returns `true` if at least one user is assigned.
    pub fn has_assignees(&self) -> bool {
        !self.assignees.is_empty()
    }
}

impl std::fmt::Display for IssueRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repo, self.number)
    }
}

// ---------------------------------------------------------------------------
// Inbound events
// ---------------------------------------------------------------------------

/// Diagnostic details of the comment that carried a command.
///
/// Only used for the trace line emitted when a comment event arrives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentMetadata {
    pub comment_id: Option<CommentId>,
    pub commenter_id: Option<UserId>,
    pub created_at: Option<Timestamp>,
}

/// A normalised inbound event.
///
/// Constructed once per invocation by the `listener` crate and handed to
/// [`crate::CommandRouter::handle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A comment was created on an issue or pull request.
    CommentCreated {
        issue: IssueRef,
        /// Raw comment body as delivered by GitHub.
        comment_body: String,
        /// Login of the commenter, in whatever case GitHub reported it.
        actor: String,
        /// `true` when the commented issue is a pull request.
        is_pull_request: bool,
        metadata: CommentMetadata,
    },

    /// A label was added to an issue.
    IssueLabeled { issue: IssueRef, label: LabelName },
}

impl Event {
    /// Returns the issue the event refers to.
    pub fn issue(&self) -> &IssueRef {
        match self {
            Event::CommentCreated { issue, .. } | Event::IssueLabeled { issue, .. } => issue,
        }
    }
}

// ---------------------------------------------------------------------------
// RepoClient data
// ---------------------------------------------------------------------------

/// The head of a pull request, as needed to trigger CI against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestHead {
    /// SHA of the head commit.
    pub head_sha: CommitSha,
    /// `owner/repo` of the repository the head branch lives in (may be a fork).
    pub head_repo_full_name: String,
}

/// A workflow run that finished with a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowRun {
    pub id: WorkflowRunId,
    pub name: String,
}

/// A joke as returned by the joke service.
///
/// Either field may be missing when the service answers with something
/// unexpected; see [`Joke::render`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Joke {
    #[serde(default)]
    pub setup: Option<String>,
    #[serde(default)]
    pub punchline: Option<String>,
}

impl Joke {
    /// Formats the joke as `"<setup> - <punchline>"`.
    ///
    /// Returns `None` if either part is missing or empty.
    pub fn render(&self) -> Option<String> {
        let setup = self.setup.as_deref().filter(|s| !s.is_empty())?;
        let punchline = self.punchline.as_deref().filter(|s| !s.is_empty())?;
        Some(format!("{setup} - {punchline}"))
    }
}

/// An issue to be opened by the label fanout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewIssue {
    pub title: String,
    pub labels: Vec<String>,
    pub body: String,
}

/// The `client_payload` of a `repository_dispatch` event.
///
/// The downstream workflows read `pull_head_ref` to check out the commit under
/// test and `issue` to report back to the originating pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchPayload {
    /// Head commit SHA of the pull request.
    pub pull_head_ref: CommitSha,
    /// `owner/repo` the head commit lives in.
    pub pull_head_repo: String,
    /// Command name without the leading `/`.
    pub command: String,
    /// Free-form arguments following the command, joined with single spaces.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub args: Option<String>,
    /// Release to test against, for version-skew runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_version: Option<String>,
    pub issue: IssueRef,
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// When a comment was written, as reported by GitHub (always UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Parses GitHub's RFC 3339 `created_at` form; `None` if it does not parse.
    pub fn parse_rfc3339(value: &str) -> Option<Self> {
        let parsed = DateTime::parse_from_rfc3339(value).ok()?;
        Some(Self(parsed.with_timezone(&Utc)))
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0.to_rfc3339())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn issue() -> IssueRef {
        IssueRef::new(
            OwnerName::new("dapr").unwrap(),
            RepositoryName::new("dapr").unwrap(),
            IssueNumber::new(7),
        )
    }

    #[test]
    fn joke_renders_only_when_complete() {
        let joke = Joke {
            setup: Some("Why?".into()),
            punchline: Some("Because.".into()),
        };
        assert_eq!(joke.render().as_deref(), Some("Why? - Because."));

        let missing = Joke {
            setup: Some("Why?".into()),
            punchline: None,
        };
        assert_eq!(missing.render(), None);

        let empty = Joke {
            setup: Some(String::new()),
            punchline: Some("Because.".into()),
        };
        assert_eq!(empty.render(), None);
    }

    #[test]
    fn dispatch_payload_omits_absent_fields_and_assignees() {
        let payload = DispatchPayload {
            pull_head_ref: CommitSha::new("abc123").unwrap(),
            pull_head_repo: "someone/dapr".into(),
            command: "ok-to-test".into(),
            args: None,
            previous_version: None,
            issue: issue().with_assignees(["alice"]),
        };

        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "pull_head_ref": "abc123",
                "pull_head_repo": "someone/dapr",
                "command": "ok-to-test",
                "issue": {"owner": "dapr", "repo": "dapr", "number": 7}
            })
        );
    }

    #[test]
    fn issue_ref_displays_as_github_shorthand() {
        assert_eq!(issue().to_string(), "dapr/dapr#7");
        assert!(!issue().has_assignees());
    }

    #[test]
    fn timestamp_parses_github_format() {
        let ts = Timestamp::parse_rfc3339("2024-03-01T10:00:00Z").unwrap();
        assert_eq!(ts.to_string(), "2024-03-01T10:00:00+00:00");
        assert!(Timestamp::parse_rfc3339("yesterday").is_none());
    }
}
