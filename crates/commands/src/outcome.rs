//! The decision taken for one event.

use crate::{DispatchEventType, LabelName, RepositoryName};

/// Why an event resulted in no action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The comment does not start with `/`.
    NotACommand,
    /// The comment names a command the bot does not know.
    UnknownCommand(String),
    /// A pull-request-only command was used on a plain issue.
    NotFromPullRequest,
    /// `/assign` was used on a pull request.
    PullRequestUnsupported,
    /// The pull request could not be looked up.
    PullRequestNotFound,
    /// `/assign` was used on an issue that already has an assignee.
    AlreadyAssigned,
    /// `/retest-failed` found nothing to re-run.
    NoFailedRuns,
    /// The label has no action attached.
    UnsupportedLabel(LabelName),
    /// The labelled issue lives outside the configured organisation.
    ForeignRepository,
}

impl std::fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotACommand => write!(f, "comment is not a command"),
            Self::UnknownCommand(name) => write!(f, "command {name} not found"),
            Self::NotFromPullRequest => write!(f, "only pull requests supported"),
            Self::PullRequestUnsupported => write!(f, "pull requests unsupported"),
            Self::PullRequestNotFound => write!(f, "pull request not found"),
            Self::AlreadyAssigned => write!(f, "issue already has assignees"),
            Self::NoFailedRuns => write!(f, "no failed workflow found"),
            Self::UnsupportedLabel(label) => write!(f, "label {label} not supported"),
            Self::ForeignRepository => write!(f, "not running in the home organisation"),
        }
    }
}

/// Result of a successfully handled event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing was done.
    Ignored(IgnoreReason),
    /// The actor may not run the command; a refusal comment was posted.
    NotAllowed { actor: String, command: String },
    /// The actor was assigned to the issue.
    Assigned { assignee: String },
    /// A `repository_dispatch` event was fired.
    Dispatched { event_type: DispatchEventType },
    /// Failed jobs were re-run for this many workflow runs.
    RerunTriggered { runs: usize },
    /// A joke comment was posted; `fallback` is set when the service answer
    /// was unusable.
    JokePosted { fallback: bool },
    /// Issues were opened in these repositories, in order.
    IssuesCreated { repositories: Vec<RepositoryName> },
}

impl Outcome {
    pub(crate) fn ignored(reason: IgnoreReason) -> Self {
        Self::Ignored(reason)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ignored(reason) => write!(f, "ignored: {reason}"),
            Self::NotAllowed { actor, command } => {
                write!(f, "user {actor} is not allowed to run {command}")
            }
            Self::Assigned { assignee } => write!(f, "assigned {assignee}"),
            Self::Dispatched { event_type } => write!(f, "dispatched {event_type}"),
            Self::RerunTriggered { runs } => write!(f, "re-ran {runs} failed workflow run(s)"),
            Self::JokePosted { fallback } => {
                write!(f, "posted a joke{}", if *fallback { " (fallback)" } else { "" })
            }
            Self::IssuesCreated { repositories } => {
                write!(f, "created {} issue(s)", repositories.len())
            }
        }
    }
}
